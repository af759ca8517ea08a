//! Data layer for a movie and TV catalog browser.
//!
//! [`catalog`] talks to the remote API, [`repository`] turns every call into
//! a `Loading` then `Success`/`Error` stream of [`Resource`]s, and [`store`]
//! holds one observable state record per screen.

pub mod catalog;
pub mod logging;
pub mod media;
pub mod playback;
pub mod repository;
pub mod resource;
pub mod settings;
pub mod store;

pub use catalog::{ApiError, CatalogApi, CatalogClient};
pub use playback::{PlaybackRequest, PlaybackTarget};
pub use repository::{Producer, Repository};
pub use resource::Resource;
pub use settings::{AppSettings, SettingsError};
pub use store::Slice;
