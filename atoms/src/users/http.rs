use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::UsernameResponse;
use super::service::get_profile;
use crate::respond;

/// HTTP Handler: GET /api/user?userId=..
pub async fn get_username_handler(
    client: &DynamoClient,
    table_name: &str,
    user_id: Option<&str>,
) -> Result<Response<Body>, Error> {
    let user_id = match user_id {
        Some(id) if !id.is_empty() => id,
        _ => return respond::error(StatusCode::BAD_REQUEST, "Missing userId"),
    };

    match get_profile(client, table_name, user_id).await {
        Ok(Some(profile)) => respond::json(
            StatusCode::OK,
            &UsernameResponse {
                username: profile.username,
            },
        ),
        Ok(None) => respond::error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            tracing::error!("❌ get_username_handler failed: user_id={}, error={}", user_id, e);
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}
