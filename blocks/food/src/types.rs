use serde::{Deserialize, Serialize};

// ========== REVIEWS ==========
pub const MAX_REVIEW_LENGTH: usize = 250;
pub const UNKNOWN_USERNAME: &str = "Unknown";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Review {
    pub id: String,
    pub food_photo_id: String,
    pub user_id: String,
    pub review: String,
    pub rating: u8,
    pub created_at: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewPayload {
    #[serde(default, rename = "foodPhotoId")]
    pub food_photo_id: String,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub rating: i64,
    #[serde(default, rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "foodPhotoId")]
    pub food_photo_id: String,
    #[serde(default, rename = "newReview")]
    pub new_review: String,
    #[serde(default, rename = "newRating")]
    pub new_rating: i64,
    #[serde(default, rename = "userId")]
    pub user_id: String,
}

/// Text must be non-blank and short enough; rating is 1 to 5
pub fn validate_review(review: &str, rating: i64) -> Result<u8, String> {
    if review.trim().is_empty() || rating == 0 {
        return Err("Missing required fields".to_string());
    }
    if review.chars().count() > MAX_REVIEW_LENGTH {
        return Err("Review too long".to_string());
    }
    match u8::try_from(rating) {
        Ok(r @ 1..=5) => Ok(r),
        _ => Err("Rating must be between 1 and 5".to_string()),
    }
}

// ========== PHOTOS ==========
// Re-export from shared atoms
pub use showcase_atoms::media::model::Photo as FoodPhoto;
