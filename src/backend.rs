//! Row-oriented access to the remote content store.
//!
//! The store only needs to support `select *`, equality filters, ascending
//! order, and a row limit. [`PostgrestBackend`] speaks that over the PostgREST
//! HTTP dialect used by Supabase.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::config::BackendConfig;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("backend returned {status}: {message}")]
  Status { status: u16, message: String },

  #[error("malformed rows: {0}")]
  Decode(#[from] serde_json::Error),
}

/// A `select *` over one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
  pub table: String,
  /// Column sorted ascending.
  pub order_by: Option<String>,
  /// Equality filters, all of which must hold.
  pub filters: Vec<(String, String)>,
  pub limit: Option<usize>,
}

impl Query {
  pub fn table(table: impl Into<String>) -> Self {
    Self { table: table.into(), order_by: None, filters: Vec::new(), limit: None }
  }

  pub fn order_by(mut self, column: impl Into<String>) -> Self {
    self.order_by = Some(column.into());
    self
  }

  pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
    self.filters.push((column.into(), value.to_string()));
    self
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  /// Value of the equality filter on `column`, if any.
  pub fn filter_value(&self, column: &str) -> Option<&str> {
    self.filters.iter().find(|(c, _)| c == column).map(|(_, v)| v.as_str())
  }

  /// PostgREST query-string parameters.
  pub fn params(&self) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for (column, value) in &self.filters {
      params.push((column.clone(), format!("eq.{value}")));
    }
    if let Some(column) = &self.order_by {
      params.push(("order".to_string(), format!("{column}.asc")));
    }
    if let Some(limit) = self.limit {
      params.push(("limit".to_string(), limit.to_string()));
    }
    params
  }
}

/// The remote store boundary. Implementations return raw JSON rows; typing
/// happens in the gateway.
pub trait Backend {
  fn select(&self, query: &Query) -> impl Future<Output = Result<Vec<Value>, BackendError>>;
}

/// Error body PostgREST sends alongside non-2xx statuses.
#[derive(Deserialize)]
struct ErrorBody {
  message: String,
}

pub struct PostgrestBackend {
  http_client: Client,
  base_url: String,
  key: String,
}

impl PostgrestBackend {
  pub fn new(base_url: &str, key: &str, timeout: Duration) -> Result<Self, BackendError> {
    let http_client = Client::builder().timeout(timeout).build()?;
    Ok(Self { http_client, base_url: base_url.trim_end_matches('/').to_string(), key: key.to_string() })
  }

  /// `None` when the configuration is absent or a placeholder.
  pub fn from_config(backend: &BackendConfig, timeout: Duration) -> Option<Result<Self, BackendError>> {
    let (url, key) = backend.credentials()?;
    Some(Self::new(url, key, timeout))
  }

  fn endpoint(&self, table: &str) -> String {
    format!("{}/rest/v1/{}", self.base_url, table)
  }
}

impl Backend for PostgrestBackend {
  async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
    debug!(table = %query.table, "backend: select");
    let response = self
      .http_client
      .get(self.endpoint(&query.table))
      .query(&query.params())
      .header("apikey", &self.key)
      .bearer_auth(&self.key)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ErrorBody>(&body).map(|b| b.message).unwrap_or(body);
      return Err(BackendError::Status { status: status.as_u16(), message });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use super::*;
  use std::sync::Mutex as StdMutex;

  type Responder = Box<dyn Fn(&Query) -> Result<Vec<Value>, BackendError>>;

  /// In-memory backend answering each query through a closure and recording
  /// every query it receives.
  pub(crate) struct ScriptedBackend {
    respond: Responder,
    pub(crate) calls: StdMutex<Vec<Query>>,
    /// `start <table>` / `end <table>` markers, in the order they happened.
    pub(crate) events: StdMutex<Vec<String>>,
  }

  impl ScriptedBackend {
    pub(crate) fn new(respond: impl Fn(&Query) -> Result<Vec<Value>, BackendError> + 'static) -> Self {
      Self { respond: Box::new(respond), calls: StdMutex::new(Vec::new()), events: StdMutex::new(Vec::new()) }
    }

    pub(crate) fn call_count(&self) -> usize {
      self.calls.lock().unwrap().len()
    }

    pub(crate) fn calls_to(&self, table: &str) -> usize {
      self.calls.lock().unwrap().iter().filter(|q| q.table == table).count()
    }
  }

  impl Backend for ScriptedBackend {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
      self.calls.lock().unwrap().push(query.clone());
      self.events.lock().unwrap().push(format!("start {}", query.table));
      // Let sibling requests interleave the way real I/O would.
      tokio::task::yield_now().await;
      self.events.lock().unwrap().push(format!("end {}", query.table));
      (self.respond)(query)
    }
  }

  pub(crate) fn backend_failure(message: &str) -> BackendError {
    BackendError::Status { status: 503, message: message.to_string() }
  }
}
