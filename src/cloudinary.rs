//! Image CDN delivery URLs.
//!
//! Builds Cloudinary `image/upload` URLs with transformation parameters.
//! Like the video canonicalizer, this is string construction only.

use crate::config::Config;
use crate::constants::constants;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
  Auto,
  Level(u8),
}

/// Transformation parameters. Unset fields are omitted from the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transform {
  pub width: Option<u32>,
  pub crop: Option<&'static str>,
  pub quality: Option<Quality>,
  /// `"auto"` lets the CDN negotiate the format per browser.
  pub format: Option<&'static str>,
  pub blur: Option<u32>,
}

impl Transform {
  /// Comma-joined parameter segment, keys in alphabetical order.
  fn segment(&self) -> String {
    let mut parts = Vec::new();
    if let Some(crop) = self.crop {
      parts.push(format!("c_{crop}"));
    }
    if let Some(blur) = self.blur {
      parts.push(format!("e_blur:{blur}"));
    }
    if let Some(format) = self.format {
      parts.push(format!("f_{format}"));
    }
    match self.quality {
      Some(Quality::Auto) => parts.push("q_auto".to_string()),
      Some(Quality::Level(level)) => parts.push(format!("q_{level}")),
      None => {}
    }
    if let Some(width) = self.width {
      parts.push(format!("w_{width}"));
    }
    parts.join(",")
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloudinary {
  cloud_name: String,
}

impl Cloudinary {
  pub fn new(cloud_name: impl Into<String>) -> Self {
    Self { cloud_name: cloud_name.into() }
  }

  pub fn from_config(config: &Config) -> Option<Self> {
    config.cloudinary_cloud_name.as_deref().map(str::trim).filter(|name| !name.is_empty()).map(Self::new)
  }

  /// Delivery URL for `public_id`. Absolute URLs are returned unchanged.
  pub fn image_url(&self, public_id: &str, transform: &Transform) -> String {
    if public_id.starts_with("http://") || public_id.starts_with("https://") {
      return public_id.to_string();
    }
    let base = constants().cloudinary_base.trim_end_matches('/');
    let public_id = public_id.trim_start_matches('/');
    let segment = transform.segment();
    if segment.is_empty() {
      format!("{base}/{}/image/upload/{public_id}", self.cloud_name)
    } else {
      format!("{base}/{}/image/upload/{segment}/{public_id}", self.cloud_name)
    }
  }

  /// Width-fitted rendition with automatic quality and format.
  pub fn responsive_url(&self, public_id: &str, width: u32) -> String {
    let transform = Transform {
      width: Some(width),
      crop: Some("fill"),
      quality: Some(Quality::Auto),
      format: Some("auto"),
      ..Transform::default()
    };
    self.image_url(public_id, &transform)
  }

  /// Tiny blurred rendition shown while the full image loads.
  pub fn placeholder_url(&self, public_id: &str) -> String {
    let transform =
      Transform { width: Some(50), quality: Some(Quality::Level(10)), blur: Some(1000), ..Transform::default() };
    self.image_url(public_id, &transform)
  }
}
