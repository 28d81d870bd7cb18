//! Gallery aggregation: each client group with its own ordered media.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::constants::constants;
use crate::gateway::{Fetched, Gateway, Record};
use crate::model::{GalleryGroup, MediaItem, MediaKind};
use crate::youtube::{ThumbnailQuality, to_thumbnail_url};

/// Fetch the gallery groups, then each group's media.
///
/// Media requests run concurrently on the calling task and the result is
/// assembled only after every one has settled, in parent order. A failed
/// media request empties that group alone; the overall result is degraded
/// only when the parent collection itself fell back.
pub async fn fetch_gallery_groups<B: Backend>(gateway: &Gateway<B>) -> Fetched<GalleryGroup> {
  let c = constants();
  let groups = match gateway.fetch_collection::<GalleryGroup>(&c.default_order_key).await {
    Fetched::Live(groups) => groups,
    degraded @ Fetched::Degraded { .. } => {
      return degraded.map(|groups| groups.into_iter().map(with_thumbnails).collect());
    }
  };

  let groups: Vec<GalleryGroup> = stream::iter(groups)
    .map(|group| async move {
      let media = fetch_group_media(gateway, group.id).await;
      with_thumbnails(GalleryGroup { media, ..group })
    })
    .buffered(c.child_fetch_concurrency.max(1))
    .collect()
    .await;

  debug!(groups = groups.len(), "gallery: assembled");
  Fetched::Live(groups)
}

async fn fetch_group_media<B: Backend>(gateway: &Gateway<B>, group_id: i64) -> Vec<MediaItem> {
  let c = constants();
  let query = MediaItem::query().eq(&c.media_parent_column, group_id).order_by(&c.default_order_key);
  let fetched = gateway.fetch_rows::<MediaItem>(query).await;
  if let Some(reason) = fetched.degrade_reason() {
    warn!(group_id, reason = %reason, "gallery: media unavailable, showing group without media");
    return Vec::new();
  }
  fetched.into_items()
}

/// Give videos without a stored thumbnail the host's rendition.
fn with_thumbnails(mut group: GalleryGroup) -> GalleryGroup {
  for item in group.media.iter_mut().filter(|item| item.kind == MediaKind::Video && item.thumbnail.is_none()) {
    item.thumbnail = to_thumbnail_url(&item.src, ThumbnailQuality::HqDefault);
  }
  group
}
