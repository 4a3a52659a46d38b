// ========== PHOTOS ==========
pub use showcase_atoms::media::model::{Collection, Photo, SortType};

// ========== PROFILES ==========
pub use showcase_atoms::users::model::{Profile, UsernameResponse};

// ========== REVIEWS ==========
pub use food_block::types::{CreateReviewPayload, Review, UpdateReviewPayload};
