// Re-export model types and service functions
pub mod form;
pub mod http;
pub mod model;
pub mod service;

pub use form::parse_upload_form;
pub use http::*;
pub use model::{Collection, NewUpload, Photo, RenamePhotoPayload, SortType, UploadForm};
pub use service::*;
