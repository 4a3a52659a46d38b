use serde::{Deserialize, Serialize};

/// Public profile row, created by the sign-up flow
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    pub user_id: String,
    pub username: String,
}

/// Body of `GET /api/user`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UsernameResponse {
    pub username: String,
}
