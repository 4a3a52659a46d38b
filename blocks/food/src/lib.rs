//! Food feed block: food photos plus the reviews attached to them.
//!
//! Builds on the `media` and `users` atoms. Deleting a food photo also
//! removes its reviews, and review listings are joined with usernames.

pub mod photos;
pub mod reviews;
pub mod types;
