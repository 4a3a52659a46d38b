use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{http::StatusCode, Body, Error, Response};
use showcase_atoms::media::{self, Collection};
use showcase_atoms::respond;

use crate::reviews::delete_reviews_for_photo;

/// Delete a food photo, then sweep up its reviews.
/// The photo goes first: if it cannot be removed its reviews stay intact.
/// Reviews that fail to delete afterwards are logged and left for a retry.
pub async fn delete_food_photo(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    photo_id: &str,
    photo_url: &str,
) -> Result<(), String> {
    media::delete_photo(
        client,
        s3_client,
        table_name,
        bucket_name,
        Collection::Food,
        photo_id,
        photo_url,
    )
    .await?;

    match delete_reviews_for_photo(client, table_name, photo_id).await {
        Ok(removed) => {
            tracing::info!("🗑️ removed {} reviews of food photo {}", removed, photo_id);
        }
        Err(e) => {
            tracing::warn!(
                "⚠️ food photo {} deleted but its reviews were left behind: {}",
                photo_id,
                e
            );
        }
    }

    Ok(())
}

/// HTTP Handler: DELETE /api/food?id=..&photo_url=..
pub async fn delete_food_photo_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    photo_id: Option<&str>,
    photo_url: Option<&str>,
) -> Result<Response<Body>, Error> {
    let (photo_id, photo_url) = match (photo_id, photo_url) {
        (Some(id), Some(url)) if !id.is_empty() && !url.is_empty() => (id, url),
        _ => return respond::error(StatusCode::BAD_REQUEST, "Missing parameters"),
    };

    match delete_food_photo(client, s3_client, table_name, bucket_name, photo_id, photo_url).await {
        Ok(()) => respond::message("Photo deleted successfully"),
        Err(e) => {
            tracing::error!(
                "❌ delete_food_photo_handler failed: photo_id={}, error={}",
                photo_id,
                e
            );
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
