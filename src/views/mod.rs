//! Server-rendered dashboard and roster views.
//!
//! Each page mounts a view that issues exactly one request to the JSON API
//! through [`ApiClient`]. The load runs as its own task behind a
//! [`ViewHandle`]; dropping the handle aborts the request and closes the state
//! channel, so a late response is never applied to a view that is gone.

mod client;
mod dashboard;
mod roster;

pub use client::*;
pub use dashboard::*;
pub use roster::*;

use std::future::Future;

use axum::http::StatusCode;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Lifecycle of a single view load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    NotFound,
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// HTTP status a page rendered from this state is served with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            LoadState::Loading | LoadState::Loaded(_) => StatusCode::OK,
            LoadState::NotFound => StatusCode::NOT_FOUND,
            LoadState::Failed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// A mounted view whose data is being (or has been) loaded.
pub struct ViewHandle<T> {
    state: watch::Receiver<LoadState<T>>,
    task: JoinHandle<()>,
}

impl<T> ViewHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Mount a view and start its single load.
    pub fn mount<F>(load: F) -> Self
    where
        F: Future<Output = LoadState<T>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(LoadState::Loading);
        let task = tokio::spawn(async move {
            let outcome = load.await;
            if tx.send(outcome).is_err() {
                tracing::debug!("Discarded load result for an unmounted view");
            }
        });
        Self { state: rx, task }
    }

    /// The state as of now.
    #[cfg(test)]
    pub fn current(&self) -> LoadState<T> {
        self.state.borrow().clone()
    }

    /// Wait until the load has finished one way or the other.
    pub async fn settled(&mut self) -> LoadState<T> {
        match self.state.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => LoadState::Failed("View load was interrupted".to_string()),
        }
    }
}

impl<T> Drop for ViewHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const STYLESHEET: &str = r#"
body { margin: 0; background: #f8fafc; color: #0f172a; font-family: system-ui, sans-serif; }
main { max-width: 80rem; margin: 0 auto; padding: 2rem; }
.status { padding: 2.5rem; font-size: 1.25rem; font-family: monospace; }
.status.error { color: #dc2626; font-family: inherit; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(24rem, 1fr)); gap: 2rem; }
.card { background: #fff; border: 1px solid #e2e8f0; border-radius: 0.75rem; overflow: hidden; }
.card h2, .card-header { background: #0f172a; color: #fff; margin: 0; padding: 1rem 1.5rem; }
.card ul { list-style: none; margin: 0; padding: 1.5rem; }
.card li { display: flex; justify-content: space-between; padding: 0.75rem; }
.league-id { font-size: 0.75rem; font-family: monospace; color: #cbd5e1; }
.empty { color: #94a3b8; font-style: italic; }
table { width: 100%; border-collapse: collapse; text-align: left; }
th, td { padding: 0.75rem 1.5rem; border-bottom: 1px solid #f1f5f9; }
.status-pill { border-radius: 9999px; padding: 0.125rem 0.625rem; background: #dcfce7; color: #166534; }
"#;

/// Wrap a rendered body in the shared page shell.
fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        STYLESHEET,
        body
    )
}
