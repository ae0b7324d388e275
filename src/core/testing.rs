//! Scripted transport for unit tests that need exact response sequences.

use crate::domain::model::HttpResponse;
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    requests: Arc<Mutex<Vec<String>>>,
    renewals: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.push(HttpResponse {
            status,
            content_disposition: None,
            body: body.as_bytes().to_vec(),
        })
    }

    pub(crate) fn respond_document(self, filename: &str, body: &[u8]) -> Self {
        self.push(HttpResponse {
            status: 200,
            content_disposition: Some(format!("attachment; filename=\"{}\"", filename)),
            body: body.to_vec(),
        })
    }

    pub(crate) fn push(self, response: HttpResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn renewals(&self) -> usize {
        self.renewals.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| panic!("unexpected request to {}", url)))
    }

    fn renew(&self) -> Result<Self> {
        self.renewals.fetch_add(1, Ordering::SeqCst);
        Ok(self.clone())
    }
}

/// A results page with one row per `(draft_date, document_number)` and an
/// optional "Next" link.
pub(crate) fn results_page(rows: &[(&str, &str)], next_href: Option<&str>) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (date, number))| {
            format!(
                r#"<tr><td><a href="display-full.jsp?rid={i}&amp;dt=2532">View</a></td><td>{date}</td><td>{number}</td><td>D77-{i}</td><td>SECSTATE WASHDC</td><td>SUBJECT  {i}</td><td>PFOR</td><td>AMEMBASSY ROME</td><td>{i}</td></tr>"#
            )
        })
        .collect();
    let pager = next_href
        .map(|href| format!(r#"<a href="{}">Next &gt;</a>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body><table id="queryResults"><tbody>{}</tbody></table><div>{}</div></body></html>"#,
        body, pager
    )
}
