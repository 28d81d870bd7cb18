//! Modal media viewer state.
//!
//! At most one item is open at a time. Opening takes a working copy of the
//! item, canonicalizes its video reference once, and resolves how it renders;
//! the collection the item came from is never touched.

use serde::Serialize;
use tracing::debug;

use crate::model::{MediaItem, MediaKind, Project};
use crate::youtube::{is_embed_url, to_embed_url};

/// Anything the viewer can show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerItem {
  Media(MediaItem),
  Project(Project),
}

impl From<MediaItem> for ViewerItem {
  fn from(item: MediaItem) -> Self {
    ViewerItem::Media(item)
  }
}

impl From<&MediaItem> for ViewerItem {
  fn from(item: &MediaItem) -> Self {
    ViewerItem::Media(item.clone())
  }
}

impl From<Project> for ViewerItem {
  fn from(project: Project) -> Self {
    ViewerItem::Project(project)
  }
}

impl From<&Project> for ViewerItem {
  fn from(project: &Project) -> Self {
    ViewerItem::Project(project.clone())
  }
}

impl ViewerItem {
  pub fn title(&self) -> Option<&str> {
    match self {
      ViewerItem::Media(item) => item.title.as_deref(),
      ViewerItem::Project(project) => Some(&project.title),
    }
  }

  /// Rewrite video references to embed form. References that can't be
  /// canonicalized are left as they are.
  fn canonicalize(self) -> Self {
    match self {
      ViewerItem::Media(mut item) => {
        if item.kind == MediaKind::Video
          && let Some(embed) = to_embed_url(&item.src)
        {
          item.src = embed;
        }
        ViewerItem::Media(item)
      }
      ViewerItem::Project(mut project) => {
        if let Some(embed) = project.video_url.as_deref().and_then(to_embed_url) {
          project.video_url = Some(embed);
        }
        ViewerItem::Project(project)
      }
    }
  }

  /// How the (canonicalized) item renders. `None` only for a project with
  /// neither a video nor a thumbnail.
  fn render_mode(&self) -> Option<RenderMode> {
    match self {
      ViewerItem::Media(item) => Some(RenderMode::resolve(item.kind, &item.src)),
      ViewerItem::Project(project) => match (&project.video_url, &project.thumbnail) {
        (Some(video), _) => Some(RenderMode::resolve(MediaKind::Video, video)),
        (None, Some(thumbnail)) => Some(RenderMode::resolve(MediaKind::Image, thumbnail)),
        (None, None) => None,
      },
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenderMode {
  Image { src: String },
  /// Hosted player in an iframe.
  EmbeddedVideo { src: String },
  /// Direct media file in a native player with controls.
  NativeVideo { src: String },
}

impl RenderMode {
  pub fn resolve(kind: MediaKind, src: &str) -> Self {
    let src = src.to_string();
    match kind {
      MediaKind::Image => RenderMode::Image { src },
      MediaKind::Video if is_embed_url(&src) => RenderMode::EmbeddedVideo { src },
      MediaKind::Video => RenderMode::NativeVideo { src },
    }
  }

  pub fn src(&self) -> &str {
    match self {
      RenderMode::Image { src } | RenderMode::EmbeddedVideo { src } | RenderMode::NativeVideo { src } => src,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewerState {
  #[default]
  Closed,
  Open {
    item: ViewerItem,
    render: Option<RenderMode>,
  },
}

#[derive(Debug, Default)]
pub struct ModalViewer {
  state: ViewerState,
}

impl ModalViewer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Open `item`, replacing whatever is open.
  pub fn open(&mut self, item: impl Into<ViewerItem>) {
    let item = item.into().canonicalize();
    let render = item.render_mode();
    debug!(title = item.title().unwrap_or_default(), render = ?render, "viewer: open");
    self.state = ViewerState::Open { item, render };
  }

  pub fn close(&mut self) {
    if self.is_open() {
      debug!("viewer: close");
    }
    self.state = ViewerState::Closed;
  }

  pub fn state(&self) -> &ViewerState {
    &self.state
  }

  pub fn is_open(&self) -> bool {
    matches!(self.state, ViewerState::Open { .. })
  }

  pub fn active_item(&self) -> Option<&ViewerItem> {
    match &self.state {
      ViewerState::Open { item, .. } => Some(item),
      ViewerState::Closed => None,
    }
  }

  pub fn render_mode(&self) -> Option<&RenderMode> {
    match &self.state {
      ViewerState::Open { render, .. } => render.as_ref(),
      ViewerState::Closed => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn media(kind: MediaKind, src: &str) -> MediaItem {
    MediaItem { id: 1, kind, title: Some("Reel".to_string()), src: src.to_string(), thumbnail: None }
  }

  fn project(video_url: Option<&str>, thumbnail: Option<&str>) -> Project {
    Project {
      id: 9,
      title: "Launch Film".to_string(),
      category: Some("Motion".to_string()),
      description: None,
      client: None,
      tags: vec!["3D".to_string()],
      video_url: video_url.map(str::to_string),
      thumbnail: thumbnail.map(str::to_string),
      featured: false,
    }
  }

  fn open_src(viewer: &ModalViewer) -> &str {
    match viewer.active_item() {
      Some(ViewerItem::Media(item)) => &item.src,
      other => panic!("expected open media, got {other:?}"),
    }
  }

  // --- open / close ---

  #[test]
  fn starts_closed() {
    let viewer = ModalViewer::new();
    assert_eq!(viewer.state(), &ViewerState::Closed);
    assert!(viewer.render_mode().is_none());
  }

  #[test]
  fn open_video_canonicalizes_then_image_untouched() {
    let mut viewer = ModalViewer::new();
    viewer.open(media(MediaKind::Video, "https://youtu.be/dQw4w9WgXcQ"));
    assert!(viewer.is_open());
    assert_eq!(open_src(&viewer), "https://www.youtube.com/embed/dQw4w9WgXcQ");

    viewer.close();
    assert!(!viewer.is_open());

    viewer.open(media(MediaKind::Image, "a.jpg"));
    assert_eq!(open_src(&viewer), "a.jpg");
    assert_eq!(viewer.render_mode(), Some(&RenderMode::Image { src: "a.jpg".to_string() }));
  }

  #[test]
  fn open_is_copy_on_open() {
    let stored = media(MediaKind::Video, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    let mut viewer = ModalViewer::new();
    viewer.open(&stored);
    assert_eq!(stored.src, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    assert_ne!(open_src(&viewer), stored.src);
  }

  #[test]
  fn reopen_replaces_active_item() {
    let mut viewer = ModalViewer::new();
    viewer.open(media(MediaKind::Image, "a.jpg"));
    viewer.open(media(MediaKind::Image, "b.jpg"));
    assert_eq!(open_src(&viewer), "b.jpg");
  }

  #[test]
  fn close_from_closed_is_noop() {
    let mut viewer = ModalViewer::new();
    viewer.close();
    assert_eq!(viewer.state(), &ViewerState::Closed);
  }

  // --- render mode ---

  #[test]
  fn youtube_video_embeds() {
    let mut viewer = ModalViewer::new();
    viewer.open(media(MediaKind::Video, "https://www.youtube.com/shorts/dQw4w9WgXcQ"));
    assert_eq!(
      viewer.render_mode(),
      Some(&RenderMode::EmbeddedVideo { src: "https://www.youtube.com/embed/dQw4w9WgXcQ".to_string() })
    );
  }

  #[test]
  fn unrecognized_video_plays_natively() {
    let mut viewer = ModalViewer::new();
    viewer.open(media(MediaKind::Video, "https://cdn.example.com/reel.mp4"));
    assert_eq!(open_src(&viewer), "https://cdn.example.com/reel.mp4");
    assert_eq!(
      viewer.render_mode(),
      Some(&RenderMode::NativeVideo { src: "https://cdn.example.com/reel.mp4".to_string() })
    );
  }

  #[test]
  fn malformed_youtube_reference_kept_raw() {
    let mut viewer = ModalViewer::new();
    viewer.open(media(MediaKind::Video, "https://youtu.be/short"));
    assert_eq!(open_src(&viewer), "https://youtu.be/short");
    assert!(matches!(viewer.render_mode(), Some(RenderMode::NativeVideo { .. })));
  }

  #[test]
  fn resolve_is_total() {
    let embed = "https://www.youtube.com/embed/x";
    assert!(matches!(RenderMode::resolve(MediaKind::Image, embed), RenderMode::Image { .. }));
    assert!(matches!(RenderMode::resolve(MediaKind::Video, embed), RenderMode::EmbeddedVideo { .. }));
    assert!(matches!(RenderMode::resolve(MediaKind::Video, ""), RenderMode::NativeVideo { .. }));
  }

  // --- projects ---

  #[test]
  fn project_video_embeds() {
    let stored = project(Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), Some("cover.jpg"));
    let mut viewer = ModalViewer::new();
    viewer.open(&stored);

    match viewer.active_item() {
      Some(ViewerItem::Project(p)) => {
        assert_eq!(p.video_url.as_deref(), Some("https://www.youtube.com/embed/dQw4w9WgXcQ"));
      }
      other => panic!("expected open project, got {other:?}"),
    }
    assert!(matches!(viewer.render_mode(), Some(RenderMode::EmbeddedVideo { .. })));
    assert_eq!(stored.video_url.as_deref(), Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
  }

  #[test]
  fn project_thumbnail_only_renders_image() {
    let mut viewer = ModalViewer::new();
    viewer.open(project(None, Some("cover.jpg")));
    assert_eq!(viewer.render_mode(), Some(&RenderMode::Image { src: "cover.jpg".to_string() }));
  }

  #[test]
  fn project_without_media_opens_with_nothing_to_render() {
    let mut viewer = ModalViewer::new();
    viewer.open(project(None, None));
    assert!(viewer.is_open());
    assert_eq!(viewer.render_mode(), None);
  }
}
