use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::form::parse_upload_form;
use super::model::{Collection, RenamePhotoPayload, SortType};
use super::service::{create_photo, delete_photo, load_photos, rename_photo};
use crate::respond;

/// HTTP Handler: GET /api/{collection}?userId=..&sortType=..
pub async fn list_photos_handler(
    client: &DynamoClient,
    table_name: &str,
    collection: Collection,
    user_id: Option<&str>,
    sort_type: Option<&str>,
) -> Result<Response<Body>, LambdaError> {
    let user_id = user_id.unwrap_or_default();
    if user_id.is_empty() && !collection.is_shared_feed() {
        return respond::error(StatusCode::BAD_REQUEST, "User ID is required");
    }

    let sort = SortType::from_query(sort_type);
    match load_photos(client, table_name, collection, user_id, sort).await {
        Ok(photos) => respond::json(StatusCode::OK, &photos),
        Err(e) => {
            tracing::error!(
                "❌ list_photos_handler failed: collection={}, user_id={}, error={}",
                collection,
                user_id,
                e
            );
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// HTTP Handler: POST /api/{collection} (multipart: userId + files)
/// Files are stored one at a time; the first failure ends the request.
pub async fn upload_photos_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    collection: Collection,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let form = match parse_upload_form(content_type.unwrap_or_default(), body.to_vec()).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("⚠️ upload_photos_handler rejected body: {}", e);
            return respond::error(StatusCode::BAD_REQUEST, e);
        }
    };

    if form.user_id.is_empty() {
        return respond::error(StatusCode::BAD_REQUEST, "User ID is required");
    }
    if form.files.is_empty() {
        return respond::error(StatusCode::BAD_REQUEST, "No files uploaded");
    }

    tracing::info!(
        "📥 upload_photos_handler: collection={}, user_id={}, files={}",
        collection,
        form.user_id,
        form.files.len()
    );

    let mut uploaded = Vec::with_capacity(form.files.len());
    for upload in form.files {
        let file_name = upload.file_name.clone();
        match create_photo(
            client,
            s3_client,
            table_name,
            bucket_name,
            collection,
            &form.user_id,
            upload,
        )
        .await
        {
            Ok(photo) => uploaded.push(photo),
            Err(e) => {
                tracing::error!(
                    "❌ upload_photos_handler failed: collection={}, file={}, error={}",
                    collection,
                    file_name,
                    e
                );
                return respond::error(StatusCode::INTERNAL_SERVER_ERROR, e);
            }
        }
    }

    respond::json(StatusCode::OK, &uploaded)
}

/// HTTP Handler: DELETE /api/{collection}?id=..&photo_url=..
pub async fn delete_photo_handler(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    collection: Collection,
    photo_id: Option<&str>,
    photo_url: Option<&str>,
) -> Result<Response<Body>, LambdaError> {
    let (photo_id, photo_url) = match (photo_id, photo_url) {
        (Some(id), Some(url)) if !id.is_empty() && !url.is_empty() => (id, url),
        _ => return respond::error(StatusCode::BAD_REQUEST, "Missing parameters"),
    };

    match delete_photo(client, s3_client, table_name, bucket_name, collection, photo_id, photo_url).await {
        Ok(()) => respond::message("Photo deleted successfully"),
        Err(e) => {
            tracing::error!(
                "❌ delete_photo_handler failed: collection={}, photo_id={}, error={}",
                collection,
                photo_id,
                e
            );
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// HTTP Handler: PATCH /api/{collection} with `{id, newName}`
pub async fn rename_photo_handler(
    client: &DynamoClient,
    table_name: &str,
    collection: Collection,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: RenamePhotoPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(_) => return respond::error(StatusCode::BAD_REQUEST, "Missing parameters"),
    };
    if payload.id.is_empty() || payload.new_name.trim().is_empty() {
        return respond::error(StatusCode::BAD_REQUEST, "Missing parameters");
    }

    match rename_photo(client, table_name, collection, &payload.id, &payload.new_name).await {
        Ok(photo) => respond::json(StatusCode::OK, &photo),
        Err(e) if e == "Photo not found" => respond::error(StatusCode::NOT_FOUND, e),
        Err(e) => {
            tracing::error!(
                "❌ rename_photo_handler failed: collection={}, photo_id={}, error={}",
                collection,
                payload.id,
                e
            );
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
