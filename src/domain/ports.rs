use crate::domain::model::{HttpResponse, RunReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

/// A GET-only HTTP session.
#[async_trait]
pub trait HttpTransport: Send + Sync + Sized {
    async fn get(&self, url: &Url) -> Result<HttpResponse>;

    /// Builds a brand-new session with the same settings. Used after a
    /// server error, when the old connection or cookies may be stale.
    fn renew(&self) -> Result<Self>;
}

/// Where downloaded documents are written. Paths are relative to the root.
pub trait Storage: Send + Sync {
    fn locate(&self, path: &str) -> PathBuf;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn create_dir(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self) -> Result<RunReport>;
}
