//! Typed, failure-tolerant access to the portfolio collections.
//!
//! Every fetch resolves. When the backend is unconfigured or a request fails,
//! the gateway serves the collection's fixed fallback rows and says so in the
//! returned [`Fetched`] value; errors never reach the caller.

use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::{Backend, BackendError, PostgrestBackend, Query};
use crate::config::Config;
use crate::constants::constants;
use crate::model::{Client, GalleryGroup, MediaItem, Project, Service};

/// The logical collections served by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Services,
  Clients,
  Projects,
  CreativePursuits,
  CreativePursuitsMedia,
}

impl Collection {
  pub fn table(self) -> &'static str {
    match self {
      Collection::Services => "services",
      Collection::Clients => "clients",
      Collection::Projects => "projects",
      Collection::CreativePursuits => "creative_pursuits",
      Collection::CreativePursuitsMedia => "creative_pursuits_media",
    }
  }
}

/// A row type stored in one collection, with the rows served in its place
/// when the backend can't be reached.
pub trait Record: DeserializeOwned {
  const COLLECTION: Collection;

  fn fallback() -> Vec<Self> {
    Vec::new()
  }

  fn query() -> Query {
    Query::table(Self::COLLECTION.table())
  }
}

impl Record for Service {
  const COLLECTION: Collection = Collection::Services;
}

impl Record for Client {
  const COLLECTION: Collection = Collection::Clients;
}

impl Record for Project {
  const COLLECTION: Collection = Collection::Projects;
}

impl Record for GalleryGroup {
  const COLLECTION: Collection = Collection::CreativePursuits;

  fn fallback() -> Vec<Self> {
    constants().fallback_gallery.clone()
  }
}

impl Record for MediaItem {
  const COLLECTION: Collection = Collection::CreativePursuitsMedia;
}

/// Why fallback rows were served.
#[derive(Debug)]
pub enum DegradeReason {
  /// Credentials missing or placeholders; no request was made.
  NotConfigured,
  Backend(BackendError),
}

impl fmt::Display for DegradeReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DegradeReason::NotConfigured => f.write_str("backend not configured"),
      DegradeReason::Backend(e) => write!(f, "{e}"),
    }
  }
}

/// Outcome of a collection fetch. `Live` rows came from the backend, possibly
/// zero of them; `Degraded` rows are the fixed fallback set.
#[derive(Debug)]
pub enum Fetched<T> {
  Live(Vec<T>),
  Degraded { items: Vec<T>, reason: DegradeReason },
}

impl<T> Fetched<T> {
  pub fn items(&self) -> &[T] {
    match self {
      Fetched::Live(items) | Fetched::Degraded { items, .. } => items,
    }
  }

  pub fn into_items(self) -> Vec<T> {
    match self {
      Fetched::Live(items) | Fetched::Degraded { items, .. } => items,
    }
  }

  pub fn is_degraded(&self) -> bool {
    matches!(self, Fetched::Degraded { .. })
  }

  pub fn degrade_reason(&self) -> Option<&DegradeReason> {
    match self {
      Fetched::Live(_) => None,
      Fetched::Degraded { reason, .. } => Some(reason),
    }
  }

  pub fn map<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Fetched<U> {
    match self {
      Fetched::Live(items) => Fetched::Live(f(items)),
      Fetched::Degraded { items, reason } => Fetched::Degraded { items: f(items), reason },
    }
  }
}

/// Entry point to the remote store. The backend handle is fixed at
/// construction and never replaced; share the gateway by reference.
pub struct Gateway<B> {
  backend: Option<B>,
}

impl Gateway<PostgrestBackend> {
  /// Build the HTTP backend from configuration. Absent credentials, or a
  /// client that fails to build, leave the gateway in fallback mode.
  pub fn connect(config: &Config) -> Self {
    let timeout = Duration::from_secs(config.request_timeout_secs());
    let backend = match PostgrestBackend::from_config(&config.backend(), timeout) {
      Some(Ok(backend)) => Some(backend),
      Some(Err(e)) => {
        warn!(err = %e, "gateway: failed to build backend client, serving fallback content");
        None
      }
      None => {
        debug!("gateway: backend not configured, serving fallback content");
        None
      }
    };
    Self { backend }
  }
}

impl<B: Backend> Gateway<B> {
  pub fn new(backend: B) -> Self {
    Self { backend: Some(backend) }
  }

  pub fn unconfigured() -> Self {
    Self { backend: None }
  }

  pub fn is_configured(&self) -> bool {
    self.backend.is_some()
  }

  pub fn backend(&self) -> Option<&B> {
    self.backend.as_ref()
  }

  /// All rows of `T`'s collection, ascending by `order_key`.
  pub async fn fetch_collection<T: Record>(&self, order_key: &str) -> Fetched<T> {
    self.fetch_rows(T::query().order_by(order_key)).await
  }

  /// Rows matching an arbitrary query over `T`'s collection.
  pub async fn fetch_rows<T: Record>(&self, query: Query) -> Fetched<T> {
    let Some(backend) = &self.backend else {
      debug!(table = %query.table, "gateway: not configured, serving fallback");
      return Fetched::Degraded { items: T::fallback(), reason: DegradeReason::NotConfigured };
    };

    match select_typed(backend, &query).await {
      Ok(items) => {
        debug!(table = %query.table, rows = items.len(), "gateway: fetched");
        Fetched::Live(items)
      }
      Err(e) => {
        warn!(table = %query.table, err = %e, "gateway: request failed, serving fallback");
        Fetched::Degraded { items: T::fallback(), reason: DegradeReason::Backend(e) }
      }
    }
  }

  pub async fn services(&self) -> Fetched<Service> {
    self.fetch_collection(&constants().default_order_key).await
  }

  pub async fn clients(&self) -> Fetched<Client> {
    self.fetch_collection(&constants().default_order_key).await
  }

  pub async fn projects(&self) -> Fetched<Project> {
    self.fetch_collection(&constants().default_order_key).await
  }

  /// Projects flagged `featured`, in order, capped at the featured limit.
  pub async fn featured_projects(&self) -> Fetched<Project> {
    let c = constants();
    let query = Project::query().eq("featured", true).order_by(&c.default_order_key).limit(c.featured_limit);
    self.fetch_rows(query).await
  }
}

async fn select_typed<B: Backend, T: DeserializeOwned>(backend: &B, query: &Query) -> Result<Vec<T>, BackendError> {
  let rows = backend.select(query).await?;
  rows.into_iter().map(|row| serde_json::from_value(row).map_err(BackendError::from)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::testing::{ScriptedBackend, backend_failure};
  use serde_json::json;

  // --- Record ---

  #[test]
  fn records_query_their_tables() {
    assert_eq!(Service::query().table, "services");
    assert_eq!(Client::query().table, "clients");
    assert_eq!(Project::query().table, "projects");
    assert_eq!(GalleryGroup::query().table, "creative_pursuits");
    assert_eq!(MediaItem::query().table, "creative_pursuits_media");
  }

  // --- unconfigured ---

  #[tokio::test]
  async fn unconfigured_services_degrade_to_empty() {
    let gateway = Gateway::<ScriptedBackend>::unconfigured();
    let fetched = gateway.fetch_collection::<Service>("order").await;
    assert!(fetched.is_degraded());
    assert!(fetched.items().is_empty());
    assert!(matches!(fetched.degrade_reason(), Some(DegradeReason::NotConfigured)));
  }

  #[tokio::test]
  async fn unconfigured_gallery_serves_seed() {
    let gateway = Gateway::<ScriptedBackend>::unconfigured();
    let fetched = gateway.fetch_collection::<GalleryGroup>("order").await;
    assert!(fetched.is_degraded());
    assert_eq!(fetched.items().len(), 3);
  }

  #[test]
  fn connect_without_credentials_is_unconfigured() {
    let gateway = Gateway::connect(&Config::default());
    assert!(!gateway.is_configured());
  }

  // --- configured ---

  #[tokio::test]
  async fn fetch_orders_by_requested_key() {
    let backend = ScriptedBackend::new(|_| Ok(vec![json!({ "id": 1, "title": "Motion Design" })]));
    let gateway = Gateway::new(backend);
    let fetched = gateway.fetch_collection::<Service>("order").await;

    assert!(!fetched.is_degraded());
    assert_eq!(fetched.items()[0].title, "Motion Design");
    let calls = gateway.backend().unwrap().calls.lock().unwrap().clone();
    assert_eq!(calls, vec![Query::table("services").order_by("order")]);
  }

  #[tokio::test]
  async fn empty_result_is_not_degraded() {
    let gateway = Gateway::new(ScriptedBackend::new(|_| Ok(Vec::new())));
    let fetched = gateway.projects().await;
    assert!(matches!(fetched, Fetched::Live(ref items) if items.is_empty()));
  }

  #[tokio::test]
  async fn backend_error_degrades() {
    let gateway = Gateway::new(ScriptedBackend::new(|_| Err(backend_failure("connection reset"))));
    let fetched = gateway.services().await;
    assert!(fetched.is_degraded());
    assert!(fetched.items().is_empty());
    assert!(matches!(fetched.degrade_reason(), Some(DegradeReason::Backend(_))));
  }

  #[tokio::test]
  async fn backend_error_on_gallery_serves_seed() {
    let gateway = Gateway::new(ScriptedBackend::new(|_| Err(backend_failure("timeout"))));
    let fetched = gateway.fetch_collection::<GalleryGroup>("order").await;
    assert!(fetched.is_degraded());
    assert_eq!(fetched.into_items(), constants().fallback_gallery);
  }

  #[tokio::test]
  async fn malformed_row_degrades() {
    let gateway = Gateway::new(ScriptedBackend::new(|_| Ok(vec![json!({ "id": "not-a-number" })])));
    let fetched = gateway.clients().await;
    assert!(fetched.is_degraded());
  }

  #[tokio::test]
  async fn featured_projects_query() {
    let gateway = Gateway::new(ScriptedBackend::new(|_| {
      let video_url = "https://youtu.be/dQw4w9WgXcQ";
      Ok(vec![json!({ "id": 3, "title": "Launch Film", "featured": true, "video_url": video_url })])
    }));
    let fetched = gateway.featured_projects().await;
    assert_eq!(fetched.items().len(), 1);

    let calls = gateway.backend().unwrap().calls.lock().unwrap().clone();
    assert_eq!(calls[0].filter_value("featured"), Some("true"));
    assert_eq!(calls[0].limit, Some(3));
    assert_eq!(calls[0].order_by.as_deref(), Some("order"));
  }

  #[tokio::test]
  async fn null_text_columns_stay_live() {
    let gateway = Gateway::new(ScriptedBackend::new(|_| {
      Ok(vec![
        json!({ "id": 1, "client": "DIGITAL MARTX", "description": "ok" }),
        json!({ "id": 2, "client": "TECHNOVA", "description": null }),
      ])
    }));
    let fetched = gateway.fetch_collection::<GalleryGroup>("order").await;
    assert!(!fetched.is_degraded());
    let names: Vec<&str> = fetched.items().iter().map(|g| g.client_name.as_str()).collect();
    assert_eq!(names, vec!["DIGITAL MARTX", "TECHNOVA"]);
    assert_eq!(fetched.items()[1].description, "");
  }

  // --- Fetched ---

  #[test]
  fn fetched_map_keeps_degraded_flag() {
    let fetched = Fetched::Degraded { items: vec![1, 2], reason: DegradeReason::NotConfigured };
    let mapped = fetched.map(|items| items.into_iter().map(|n| n * 10).collect::<Vec<_>>());
    assert!(mapped.is_degraded());
    assert_eq!(mapped.items(), &[10, 20]);
  }
}
