//! Client side of the showcase photo collections.
//!
//! [`ResourceManager`] keeps one user's list of a collection in memory and
//! patches it as uploads, deletes and renames succeed. The network goes
//! through an injected [`ResourceApi`] and user-facing messages through an
//! injected [`Notifier`].

pub mod api;
pub mod config;
pub mod error;
pub mod manager;
pub mod media;
pub mod model;
pub mod notify;

pub use api::{HttpResourceApi, ResourceApi};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use manager::{filter_by_name, Operation, Patch, PatchPolicy, ResourceManager};
pub use media::resolve_image_src;
pub use model::{Resource, SortKey, UploadFile};
pub use notify::{ChannelNotifier, Notice, Notifier, TracingNotifier};
