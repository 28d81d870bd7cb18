//! Content layer for a creative portfolio site.
//!
//! Fetches the portfolio collections from a PostgREST store with fallback
//! content when the store is unavailable, canonicalizes video references, and
//! models category filtering and the single-item media viewer.

pub mod backend;
pub mod catalog;
pub mod cloudinary;
pub mod config;
pub mod constants;
pub mod filter;
pub mod gallery;
pub mod gateway;
pub mod model;
pub mod viewer;
pub mod youtube;

pub use backend::{Backend, BackendError, PostgrestBackend, Query};
pub use catalog::{Catalog, Snapshot};
pub use filter::{ALL_CATEGORIES, categories_of, filter};
pub use gallery::fetch_gallery_groups;
pub use gateway::{Collection, DegradeReason, Fetched, Gateway, Record};
pub use model::{Client, GalleryGroup, MediaItem, MediaKind, Project, Service};
pub use viewer::{ModalViewer, RenderMode, ViewerItem, ViewerState};
pub use youtube::{ThumbnailQuality, VideoId, identify, to_embed_url, to_thumbnail_url};
