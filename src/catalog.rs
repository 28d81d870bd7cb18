//! Snapshot of every collection the site shows, reloaded on demand.
//!
//! `refresh()` always issues fresh requests, including when another refresh
//! or fetch of the same collection is still in flight. Nothing is coalesced
//! or cached between refreshes; the newest completed refresh wins.

use tracing::info;

use crate::backend::Backend;
use crate::filter::categories_of;
use crate::gallery::fetch_gallery_groups;
use crate::gateway::{Fetched, Gateway};
use crate::model::{Client, GalleryGroup, Project, Service};

#[derive(Debug)]
pub struct Snapshot {
  pub services: Fetched<Service>,
  pub clients: Fetched<Client>,
  pub projects: Fetched<Project>,
  pub featured: Fetched<Project>,
  pub gallery: Fetched<GalleryGroup>,
}

impl Snapshot {
  /// True if any collection is showing fallback content.
  pub fn is_degraded(&self) -> bool {
    self.services.is_degraded()
      || self.clients.is_degraded()
      || self.projects.is_degraded()
      || self.featured.is_degraded()
      || self.gallery.is_degraded()
  }

  pub fn categories(&self) -> Vec<String> {
    categories_of(self.projects.items())
  }
}

pub struct Catalog<'g, B> {
  gateway: &'g Gateway<B>,
  snapshot: Option<Snapshot>,
}

impl<'g, B: Backend> Catalog<'g, B> {
  pub fn new(gateway: &'g Gateway<B>) -> Self {
    Self { gateway, snapshot: None }
  }

  /// Fetch every collection concurrently and replace the snapshot.
  pub async fn refresh(&mut self) -> &Snapshot {
    let gateway = self.gateway;
    let (services, clients, projects, featured, gallery) = futures::join!(
      gateway.services(),
      gateway.clients(),
      gateway.projects(),
      gateway.featured_projects(),
      fetch_gallery_groups(gateway),
    );
    let snapshot = Snapshot { services, clients, projects, featured, gallery };
    info!(
      services = snapshot.services.items().len(),
      clients = snapshot.clients.items().len(),
      projects = snapshot.projects.items().len(),
      groups = snapshot.gallery.items().len(),
      degraded = snapshot.is_degraded(),
      "catalog: refreshed"
    );
    self.snapshot.insert(snapshot)
  }

  /// Latest snapshot; `None` before the first refresh.
  pub fn snapshot(&self) -> Option<&Snapshot> {
    self.snapshot.as_ref()
  }
}
