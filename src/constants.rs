//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

use crate::model::GalleryGroup;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Video host
  pub embed_url_template: String,
  /// Substring identifying a src the embedded player can host.
  pub embed_marker: String,
  pub thumbnail_url_template: String,
  pub video_id_len: usize,

  // Backend
  pub placeholder_url: String,
  pub placeholder_key: String,
  pub default_order_key: String,
  pub media_parent_column: String,
  pub child_fetch_concurrency: usize,
  pub featured_limit: usize,
  pub request_timeout_secs: u64,

  // Image CDN
  pub cloudinary_base: String,

  /// Seed gallery served in degraded mode.
  pub fallback_gallery: Vec<GalleryGroup>,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
