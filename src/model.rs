use serde::{Deserialize, Deserializer, Serialize};

use crate::youtube::{ThumbnailQuality, to_thumbnail_url};

/// Icon shown for services that don't name one.
pub const DEFAULT_SERVICE_ICON: &str = "fas fa-lightbulb";

/// Nullable backend columns come back as `null`, not as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
  Image,
  Video,
}

/// One image or video in a gallery group.
///
/// For videos `src` holds a raw video reference as stored by the backend; the
/// viewer canonicalizes its own working copy on open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
  pub id: i64,
  #[serde(rename = "type")]
  pub kind: MediaKind,
  pub title: Option<String>,
  pub src: String,
  pub thumbnail: Option<String>,
}

impl MediaItem {
  /// Image shown in a gallery grid: stored thumbnail, else the video host's
  /// rendition for videos, else the image itself.
  pub fn display_thumbnail(&self) -> Option<String> {
    match self.kind {
      MediaKind::Image => Some(self.src.clone()),
      MediaKind::Video => {
        self.thumbnail.clone().or_else(|| to_thumbnail_url(&self.src, ThumbnailQuality::HqDefault))
      }
    }
  }
}

/// A client or collection bundling a description with its ordered media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryGroup {
  pub id: i64,
  #[serde(alias = "client")]
  pub client_name: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub description: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub media: Vec<MediaItem>,
}

/// A portfolio project from the flat `projects` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub id: i64,
  pub title: String,
  pub category: Option<String>,
  pub description: Option<String>,
  pub client: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub tags: Vec<String>,
  pub video_url: Option<String>,
  pub thumbnail: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub featured: bool,
}

impl Project {
  /// Full-resolution rendition of the project video, else the stored
  /// thumbnail. `None` means there is nothing to show.
  pub fn display_thumbnail(&self) -> Option<String> {
    self
      .video_url
      .as_deref()
      .and_then(|url| to_thumbnail_url(url, ThumbnailQuality::MaxResDefault))
      .or_else(|| self.thumbnail.clone())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
  pub id: i64,
  pub title: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub description: String,
  pub icon: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub details: Vec<String>,
}

impl Service {
  pub fn icon(&self) -> &str {
    self.icon.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SERVICE_ICON)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  pub id: i64,
  pub name: String,
  pub logo: Option<String>,
  pub industry: Option<String>,
  pub services_provided: Option<String>,
  pub testimonial: Option<String>,
  pub contact_person: Option<String>,
}
