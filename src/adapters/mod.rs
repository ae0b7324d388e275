// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod storage;

pub use http::{Session, SessionSettings, DEFAULT_USER_AGENT};
pub use storage::LocalStorage;
