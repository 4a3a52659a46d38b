use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, ReturnValue, WriteRequest};
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};
use showcase_atoms::paging::{collect_pages, Page};
use showcase_atoms::{respond, users};
use std::collections::HashMap;
use tokio::time::{sleep, Duration};

use crate::types::{
    validate_review, CreateReviewPayload, Review, UpdateReviewPayload, UNKNOWN_USERNAME,
};

const REVIEW_NOT_FOUND: &str = "Review not found";
const NOT_AUTHOR: &str = "Only the author can edit this review";

/// Reviews live under their photo:
/// PK = "FOOD_PHOTO#{food_photo_id}"
/// SK = "REVIEW#{review_id}"
pub fn review_partition_key(food_photo_id: &str) -> String {
    format!("FOOD_PHOTO#{}", food_photo_id)
}

pub fn review_sort_key(review_id: &str) -> String {
    format!("REVIEW#{}", review_id)
}

/// Decode a review row; `username` is filled in by the caller
pub fn review_from_item(food_photo_id: &str, item: &HashMap<String, AttributeValue>) -> Option<Review> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let id = sk.strip_prefix("REVIEW#")?;

    Some(Review {
        id: id.to_string(),
        food_photo_id: food_photo_id.to_string(),
        user_id: item
            .get("user_id")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        review: item
            .get("review")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        rating: item
            .get("rating")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
        created_at: item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        username: String::new(),
    })
}

/// Attach usernames, "Unknown" when the author has no profile
pub fn attach_usernames(reviews: &mut [Review], usernames: &HashMap<String, String>) {
    for review in reviews {
        review.username = usernames
            .get(&review.user_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_USERNAME.to_string());
    }
}

/// Newest first
pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Load all reviews of a food photo, joined with usernames
pub async fn load_reviews(
    client: &DynamoClient,
    table_name: &str,
    food_photo_id: &str,
) -> Result<Vec<Review>, String> {
    let mut reviews = query_reviews(client, table_name, food_photo_id).await?;

    let usernames = users::load_usernames(
        client,
        table_name,
        reviews.iter().map(|r| r.user_id.as_str()),
    )
    .await;
    attach_usernames(&mut reviews, &usernames);
    sort_newest_first(&mut reviews);

    Ok(reviews)
}

/// Every review row of a photo, across all query pages
async fn query_reviews(
    client: &DynamoClient,
    table_name: &str,
    food_photo_id: &str,
) -> Result<Vec<Review>, String> {
    let items = collect_pages(|start_key| {
        let query = client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(review_partition_key(food_photo_id)))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("REVIEW#".to_string()))
            .set_exclusive_start_key(start_key);

        async move {
            let result = query
                .send()
                .await
                .map_err(|e| format!("DynamoDB query error: {}", e))?;
            Ok::<Page, String>(Page {
                items: result.items().to_vec(),
                last_evaluated_key: result.last_evaluated_key().cloned(),
            })
        }
    })
    .await?;

    Ok(items
        .iter()
        .filter_map(|item| review_from_item(food_photo_id, item))
        .collect())
}

async fn username_or_unknown(client: &DynamoClient, table_name: &str, user_id: &str) -> String {
    match users::get_profile(client, table_name, user_id).await {
        Ok(Some(profile)) => profile.username,
        Ok(None) => UNKNOWN_USERNAME.to_string(),
        Err(e) => {
            tracing::warn!("⚠️ username lookup failed for user_id={}: {}", user_id, e);
            UNKNOWN_USERNAME.to_string()
        }
    }
}

/// Create a review (rating already validated)
pub async fn create_review(
    client: &DynamoClient,
    table_name: &str,
    food_photo_id: &str,
    user_id: &str,
    text: &str,
    rating: u8,
) -> Result<Review, String> {
    let review_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(review_partition_key(food_photo_id)))
        .item("SK", AttributeValue::S(review_sort_key(&review_id)))
        .item("user_id", AttributeValue::S(user_id.to_string()))
        .item("review", AttributeValue::S(text.to_string()))
        .item("rating", AttributeValue::N(rating.to_string()))
        .item("created_at", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(Review {
        id: review_id,
        food_photo_id: food_photo_id.to_string(),
        user_id: user_id.to_string(),
        review: text.to_string(),
        rating,
        created_at: now,
        username: username_or_unknown(client, table_name, user_id).await,
    })
}

/// Get a single review, without username
pub async fn get_review(
    client: &DynamoClient,
    table_name: &str,
    food_photo_id: &str,
    review_id: &str,
) -> Result<Review, String> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(review_partition_key(food_photo_id)))
        .key("SK", AttributeValue::S(review_sort_key(review_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    result
        .item()
        .and_then(|item| review_from_item(food_photo_id, item))
        .ok_or_else(|| REVIEW_NOT_FOUND.to_string())
}

/// Update text and rating; only the author may edit
pub async fn update_review(
    client: &DynamoClient,
    table_name: &str,
    food_photo_id: &str,
    review_id: &str,
    user_id: &str,
    text: &str,
    rating: u8,
) -> Result<Review, String> {
    let existing = get_review(client, table_name, food_photo_id, review_id).await?;
    if existing.user_id != user_id {
        return Err(NOT_AUTHOR.to_string());
    }

    let result = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(review_partition_key(food_photo_id)))
        .key("SK", AttributeValue::S(review_sort_key(review_id)))
        .update_expression("SET review = :review, rating = :rating")
        .expression_attribute_values(":review", AttributeValue::S(text.to_string()))
        .expression_attribute_values(":rating", AttributeValue::N(rating.to_string()))
        .return_values(ReturnValue::AllNew)
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    let mut review = result
        .attributes()
        .and_then(|item| review_from_item(food_photo_id, item))
        .ok_or_else(|| "DynamoDB update_item returned no attributes".to_string())?;
    review.username = username_or_unknown(client, table_name, user_id).await;

    Ok(review)
}

/// Delete a review
pub async fn delete_review(
    client: &DynamoClient,
    table_name: &str,
    food_photo_id: &str,
    review_id: &str,
) -> Result<(), String> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(review_partition_key(food_photo_id)))
        .key("SK", AttributeValue::S(review_sort_key(review_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}

/// Delete every review of a photo; returns how many were removed
pub async fn delete_reviews_for_photo(
    client: &DynamoClient,
    table_name: &str,
    food_photo_id: &str,
) -> Result<usize, String> {
    let reviews = query_reviews(client, table_name, food_photo_id).await?;
    let pk = review_partition_key(food_photo_id);

    let delete_keys: Vec<HashMap<String, AttributeValue>> = reviews
        .iter()
        .map(|review| {
            let mut key = HashMap::new();
            key.insert("PK".to_string(), AttributeValue::S(pk.clone()));
            key.insert("SK".to_string(), AttributeValue::S(review_sort_key(&review.id)));
            key
        })
        .collect();

    batch_delete_items(client, table_name, &delete_keys).await?;
    Ok(delete_keys.len())
}

// PRIVATE FUNCTIONS

/// Batch deletes in chunks of 25, retrying unprocessed items a few times
async fn batch_delete_items(
    client: &DynamoClient,
    table_name: &str,
    delete_keys: &[HashMap<String, AttributeValue>],
) -> Result<(), String> {
    for chunk in delete_keys.chunks(25) {
        let mut write_reqs = Vec::with_capacity(chunk.len());
        for key in chunk {
            let delete = DeleteRequest::builder()
                .set_key(Some(key.clone()))
                .build()
                .map_err(|e| format!("Failed to build delete request: {}", e))?;
            write_reqs.push(WriteRequest::builder().delete_request(delete).build());
        }

        let mut pending = write_reqs;
        let mut attempts: u64 = 0;
        while !pending.is_empty() {
            attempts += 1;
            let result = client
                .batch_write_item()
                .request_items(table_name, pending)
                .send()
                .await
                .map_err(|e| format!("DynamoDB batch_write_item error: {}", e))?;

            pending = result
                .unprocessed_items()
                .and_then(|m| m.get(table_name))
                .cloned()
                .unwrap_or_default();

            if pending.is_empty() {
                break;
            }
            if attempts >= 5 {
                return Err(format!("{} review deletes left unprocessed", pending.len()));
            }
            sleep(Duration::from_millis(100 * attempts)).await;
        }
    }

    Ok(())
}

// HTTP HANDLERS

/// GET /api/food/reviews?foodPhotoId=..
pub async fn list_reviews_handler(
    client: &DynamoClient,
    table_name: &str,
    food_photo_id: Option<&str>,
) -> Result<Response<Body>, Error> {
    let food_photo_id = match food_photo_id {
        Some(id) if !id.is_empty() => id,
        _ => return respond::error(StatusCode::BAD_REQUEST, "Missing foodPhotoId"),
    };

    match load_reviews(client, table_name, food_photo_id).await {
        Ok(reviews) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Cache-Control", "no-store, must-revalidate")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&reviews)?.into())
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!(
                "❌ list_reviews_handler failed: food_photo_id={}, error={}",
                food_photo_id,
                e
            );
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// POST /api/food/reviews with `{foodPhotoId, review, rating, userId}`
pub async fn create_review_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateReviewPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(_) => return respond::error(StatusCode::BAD_REQUEST, "Missing required fields"),
    };
    if payload.food_photo_id.is_empty() || payload.user_id.is_empty() {
        return respond::error(StatusCode::BAD_REQUEST, "Missing required fields");
    }
    let rating = match validate_review(&payload.review, payload.rating) {
        Ok(rating) => rating,
        Err(e) => return respond::error(StatusCode::BAD_REQUEST, e),
    };

    match create_review(
        client,
        table_name,
        &payload.food_photo_id,
        &payload.user_id,
        &payload.review,
        rating,
    )
    .await
    {
        Ok(review) => {
            tracing::info!(
                "✅ create_review_handler success: review_id={}, food_photo_id={}",
                review.id,
                review.food_photo_id
            );
            respond::json(StatusCode::CREATED, &review)
        }
        Err(e) => {
            tracing::error!(
                "❌ create_review_handler failed: food_photo_id={}, error={}",
                payload.food_photo_id,
                e
            );
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add review")
        }
    }
}

/// PATCH /api/food/reviews with `{id, foodPhotoId, newReview, newRating, userId}`
pub async fn update_review_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateReviewPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(_) => return respond::error(StatusCode::BAD_REQUEST, "Missing required fields"),
    };
    if payload.id.is_empty() || payload.food_photo_id.is_empty() || payload.user_id.is_empty() {
        return respond::error(StatusCode::BAD_REQUEST, "Missing required fields");
    }
    let rating = match validate_review(&payload.new_review, payload.new_rating) {
        Ok(rating) => rating,
        Err(e) => return respond::error(StatusCode::BAD_REQUEST, e),
    };

    match update_review(
        client,
        table_name,
        &payload.food_photo_id,
        &payload.id,
        &payload.user_id,
        &payload.new_review,
        rating,
    )
    .await
    {
        Ok(review) => respond::json(StatusCode::OK, &review),
        Err(e) if e == REVIEW_NOT_FOUND => respond::error(StatusCode::NOT_FOUND, e),
        Err(e) if e == NOT_AUTHOR => respond::error(StatusCode::FORBIDDEN, e),
        Err(e) => {
            tracing::error!("❌ update_review_handler failed: review_id={}, error={}", payload.id, e);
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update review")
        }
    }
}

/// DELETE /api/food/reviews?id=..&foodPhotoId=..
pub async fn delete_review_handler(
    client: &DynamoClient,
    table_name: &str,
    review_id: Option<&str>,
    food_photo_id: Option<&str>,
) -> Result<Response<Body>, Error> {
    let (review_id, food_photo_id) = match (review_id, food_photo_id) {
        (Some(id), Some(photo)) if !id.is_empty() && !photo.is_empty() => (id, photo),
        _ => return respond::error(StatusCode::BAD_REQUEST, "Missing review ID"),
    };

    match delete_review(client, table_name, food_photo_id, review_id).await {
        Ok(()) => respond::message("Review deleted"),
        Err(e) => {
            tracing::error!("❌ delete_review_handler failed: review_id={}, error={}", review_id, e);
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete review")
        }
    }
}
