//! Video reference canonicalization.
//!
//! Maps any supported YouTube reference (watch URL, `youtu.be` short link,
//! shorts URL, embed URL, or bare identifier) to one embeddable player URL and
//! one thumbnail URL. Pure string derivation: nothing here touches the network,
//! so the URLs produced may point at videos that do not exist.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::constants::constants;

/// Markers tried in order against a reference. The text following the first
/// marker present, up to the next delimiter, is the identifier candidate.
const ID_MARKERS: [&str; 5] = ["watch?v=", "&v=", "youtu.be/", "/shorts/", "/embed/"];

/// Characters that end an identifier candidate.
const ID_TERMINATORS: [char; 4] = ['?', '&', '#', '/'];

/// A validated 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Thumbnail renditions published by the video host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailQuality {
  #[value(name = "default")]
  Default,
  #[default]
  #[value(name = "hqdefault")]
  HqDefault,
  #[value(name = "mqdefault")]
  MqDefault,
  #[value(name = "sddefault")]
  SdDefault,
  #[value(name = "maxresdefault")]
  MaxResDefault,
}

impl ThumbnailQuality {
  pub const ALL: [ThumbnailQuality; 5] = [
    ThumbnailQuality::Default,
    ThumbnailQuality::HqDefault,
    ThumbnailQuality::MqDefault,
    ThumbnailQuality::SdDefault,
    ThumbnailQuality::MaxResDefault,
  ];

  /// File stem used by the thumbnail host.
  pub fn as_str(self) -> &'static str {
    match self {
      ThumbnailQuality::Default => "default",
      ThumbnailQuality::HqDefault => "hqdefault",
      ThumbnailQuality::MqDefault => "mqdefault",
      ThumbnailQuality::SdDefault => "sddefault",
      ThumbnailQuality::MaxResDefault => "maxresdefault",
    }
  }
}

fn candidate_after<'a>(reference: &'a str, marker: &str) -> Option<&'a str> {
  let start = reference.find(marker)? + marker.len();
  let rest = &reference[start..];
  let end = rest.find(ID_TERMINATORS).unwrap_or(rest.len());
  Some(&rest[..end])
}

fn validate(candidate: &str) -> Option<VideoId> {
  (candidate.chars().count() == constants().video_id_len).then(|| VideoId(candidate.to_string()))
}

/// Extract the video identifier from any supported reference shape.
///
/// The first marker found decides the outcome: a candidate of the wrong length
/// yields `None` rather than falling through to later shapes. A reference with
/// no marker and no path separator is treated as a bare identifier.
pub fn identify(reference: &str) -> Option<VideoId> {
  let reference = reference.trim();
  if reference.is_empty() {
    return None;
  }
  if let Some(candidate) = ID_MARKERS.iter().find_map(|marker| candidate_after(reference, marker)) {
    return validate(candidate);
  }
  if reference.contains('/') {
    return None;
  }
  validate(reference)
}

/// Returns true if `reference` is already in embeddable-player form.
pub fn is_embed_url(reference: &str) -> bool {
  reference.contains(constants().embed_marker.as_str())
}

/// Canonical embeddable-player URL for a reference.
///
/// Embed-form input is returned unchanged, which makes this idempotent.
pub fn to_embed_url(reference: &str) -> Option<String> {
  if is_embed_url(reference) {
    return Some(reference.to_string());
  }
  let id = identify(reference)?;
  Some(constants().embed_url_template.replace("{id}", id.as_str()))
}

/// Canonical JPEG thumbnail URL for a reference at the given quality.
pub fn to_thumbnail_url(reference: &str, quality: ThumbnailQuality) -> Option<String> {
  let id = identify(reference)?;
  Some(constants().thumbnail_url_template.replace("{id}", id.as_str()).replace("{quality}", quality.as_str()))
}
