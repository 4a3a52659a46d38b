use food_block::{photos as food_photos, reviews};
use lambda_http::http::header::CONTENT_TYPE;
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use showcase_atoms::{media, respond, users};
use showcase_shared::cors::with_cors_headers;
use showcase_shared::types::Collection;
use showcase_shared::AppState;
use std::sync::Arc;

/// Every path the API serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiRoute {
    /// /api/photos, /api/food
    Photos(Collection),
    /// /api/food/reviews
    FoodReviews,
    /// /api/user
    User,
}

pub(crate) fn resolve_route(path: &str) -> Option<ApiRoute> {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match parts.as_slice() {
        ["api", "food", "reviews"] => Some(ApiRoute::FoodReviews),
        ["api", "user"] => Some(ApiRoute::User),
        ["api", segment] => Collection::from_segment(segment).map(ApiRoute::Photos),
        _ => None,
    }
}

fn query<'a>(event: &'a Request, key: &str) -> Option<&'a str> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(key))
}

fn finalize_response(
    resp: Result<Response<Body>, Error>,
    request_origin: Option<&str>,
    allowed_origins: &[String],
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, request_origin, allowed_origins))
}

/// Main Lambda handler - routes requests to the collection, review and user endpoints
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    let request_origin = event.headers().get("Origin").and_then(|v| v.to_str().ok());
    let allowed_origins = state.config.allowed_origins.as_slice();
    tracing::info!("🚀 API Lambda invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, request_origin, allowed_origins));
    }

    let Some(route) = resolve_route(path) else {
        tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
        return finalize_response(not_found(), request_origin, allowed_origins);
    };

    let dynamo = &state.dynamo_client;
    let s3 = &state.s3_client;
    let table_name = state.config.table_name.as_str();
    let bucket_name = state.config.bucket_name.as_str();

    let resp = match (route, method) {
        // --- PHOTO COLLECTIONS ---
        // GET /api/{collection}?userId=..&sortType=..
        (ApiRoute::Photos(collection), &Method::GET) => {
            media::list_photos_handler(
                dynamo,
                table_name,
                collection,
                query(&event, "userId"),
                query(&event, "sortType"),
            )
            .await
        }
        // POST /api/{collection} - multipart upload
        (ApiRoute::Photos(collection), &Method::POST) => {
            let content_type = event.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
            media::upload_photos_handler(
                dynamo,
                s3,
                table_name,
                bucket_name,
                collection,
                content_type,
                body,
            )
            .await
        }
        // DELETE /api/food?id=..&photo_url=.. - cascades to reviews
        (ApiRoute::Photos(Collection::Food), &Method::DELETE) => {
            food_photos::delete_food_photo_handler(
                dynamo,
                s3,
                table_name,
                bucket_name,
                query(&event, "id"),
                query(&event, "photo_url"),
            )
            .await
        }
        // DELETE /api/{collection}?id=..&photo_url=..
        (ApiRoute::Photos(collection), &Method::DELETE) => {
            media::delete_photo_handler(
                dynamo,
                s3,
                table_name,
                bucket_name,
                collection,
                query(&event, "id"),
                query(&event, "photo_url"),
            )
            .await
        }
        // PATCH /api/{collection} - rename
        (ApiRoute::Photos(collection), &Method::PATCH) => {
            media::rename_photo_handler(dynamo, table_name, collection, body).await
        }

        // --- FOOD REVIEWS ---
        (ApiRoute::FoodReviews, &Method::GET) => {
            reviews::list_reviews_handler(dynamo, table_name, query(&event, "foodPhotoId")).await
        }
        (ApiRoute::FoodReviews, &Method::POST) => {
            reviews::create_review_handler(dynamo, table_name, body).await
        }
        (ApiRoute::FoodReviews, &Method::PATCH) => {
            reviews::update_review_handler(dynamo, table_name, body).await
        }
        (ApiRoute::FoodReviews, &Method::DELETE) => {
            reviews::delete_review_handler(
                dynamo,
                table_name,
                query(&event, "id"),
                query(&event, "foodPhotoId"),
            )
            .await
        }

        // --- PROFILES ---
        (ApiRoute::User, &Method::GET) => {
            users::get_username_handler(dynamo, table_name, query(&event, "userId")).await
        }

        _ => {
            tracing::warn!("⚠️ Method not allowed - Method: {} Path: {}", method, path);
            method_not_allowed()
        }
    };

    finalize_response(resp, request_origin, allowed_origins)
}

fn not_found() -> Result<Response<Body>, Error> {
    respond::error(StatusCode::NOT_FOUND, "Not found")
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    respond::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
