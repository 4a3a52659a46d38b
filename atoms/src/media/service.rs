use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use image::ImageFormat;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::model::{Collection, NewUpload, Photo, SortType};
use crate::paging::{collect_pages, Page};

/// Storage prefix every uploaded object lands under
pub const STORAGE_PREFIX: &str = "drive";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub fn photo_sort_key(photo_id: &str) -> String {
    format!("PHOTO#{}", photo_id)
}

/// Object key for a new upload: `drive/{millis}_{file name}`
pub fn storage_path(file_name: &str, timestamp_millis: i64) -> String {
    format!("{}/{}_{}", STORAGE_PREFIX, timestamp_millis, file_name)
}

/// Declared content type if any, otherwise sniffed from the bytes
pub fn detect_content_type(declared: Option<&str>, bytes: &[u8]) -> String {
    if let Some(declared) = declared.filter(|c| !c.trim().is_empty()) {
        return declared.to_string();
    }

    let mime = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Tiff) => "image/tiff",
        Ok(ImageFormat::Ico) => "image/x-icon",
        Ok(ImageFormat::Avif) => "image/avif",
        _ => FALLBACK_CONTENT_TYPE,
    };
    mime.to_string()
}

/// Build a photo from a DynamoDB item; `None` when the item is not a photo row
/// or has no RFC 3339 `created_at`
pub fn photo_from_item(item: &HashMap<String, AttributeValue>) -> Option<Photo> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let id = sk.strip_prefix("PHOTO#")?;
    let created_at = item.get("created_at").and_then(|v| v.as_s().ok())?;
    if chrono::DateTime::parse_from_rfc3339(created_at).is_err() {
        tracing::warn!("⚠️ skipping photo {} with unreadable created_at {:?}", id, created_at);
        return None;
    }
    let text = |key: &str| {
        item.get(key)
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    Some(Photo {
        id: id.to_string(),
        user_id: text("user_id"),
        photo_url: text("photo_url"),
        photo_name: text("photo_name"),
        created_at: created_at.to_string(),
    })
}

/// Ascending by name or by creation time (RFC 3339 strings order chronologically)
pub fn sort_photos(photos: &mut [Photo], sort: SortType) {
    photos.sort_by(|a, b| match sort {
        SortType::Name => a
            .photo_name
            .cmp(&b.photo_name)
            .then_with(|| a.created_at.cmp(&b.created_at)),
        SortType::Date => match a.created_at.cmp(&b.created_at) {
            Ordering::Equal => a.photo_name.cmp(&b.photo_name),
            other => other,
        },
    });
}

/// Load photos of a collection (pure domain logic, no HTTP).
/// Shared feeds ignore `user_id`; personal collections filter on it.
pub async fn load_photos(
    client: &DynamoClient,
    table_name: &str,
    collection: Collection,
    user_id: &str,
    sort: SortType,
) -> Result<Vec<Photo>, String> {
    let items = collect_pages(|start_key| {
        let mut builder = client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(collection.partition_key().to_string()))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("PHOTO#".to_string()))
            .set_exclusive_start_key(start_key);

        if !collection.is_shared_feed() {
            builder = builder
                .filter_expression("user_id = :uid")
                .expression_attribute_values(":uid", AttributeValue::S(user_id.to_string()));
        }

        async move {
            let result = builder
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

    let mut photos: Vec<Photo> = items.iter().filter_map(photo_from_item).collect();
    sort_photos(&mut photos, sort);
    Ok(photos)
}

/// Store the object, then the row. The object is written first so a row
/// never points at nothing.
pub async fn create_photo(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    collection: Collection,
    user_id: &str,
    upload: NewUpload,
) -> Result<Photo, String> {
    let now = chrono::Utc::now();
    let photo_id = uuid::Uuid::new_v4().to_string();
    let photo_url = storage_path(&upload.file_name, now.timestamp_millis());
    let content_type = detect_content_type(upload.content_type.as_deref(), &upload.bytes);

    s3_client
        .put_object()
        .bucket(bucket_name)
        .key(&photo_url)
        .content_type(content_type)
        .body(ByteStream::from(upload.bytes))
        .send()
        .await
        .map_err(|e| format!("S3 put_object error: {}", e))?;

    let created_at = now.to_rfc3339();
    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(collection.partition_key().to_string()))
        .item("SK", AttributeValue::S(photo_sort_key(&photo_id)))
        .item("user_id", AttributeValue::S(user_id.to_string()))
        .item("photo_url", AttributeValue::S(photo_url.clone()))
        .item("photo_name", AttributeValue::S(upload.file_name.clone()))
        .item("created_at", AttributeValue::S(created_at.clone()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(Photo {
        id: photo_id,
        user_id: user_id.to_string(),
        photo_url,
        photo_name: upload.file_name,
        created_at,
    })
}

/// Rename a photo; fails with "Photo not found" when the row is absent
pub async fn rename_photo(
    client: &DynamoClient,
    table_name: &str,
    collection: Collection,
    photo_id: &str,
    new_name: &str,
) -> Result<Photo, String> {
    let result = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(collection.partition_key().to_string()))
        .key("SK", AttributeValue::S(photo_sort_key(photo_id)))
        .condition_expression("attribute_exists(SK)")
        .update_expression("SET photo_name = :name")
        .expression_attribute_values(":name", AttributeValue::S(new_name.to_string()))
        .return_values(ReturnValue::AllNew)
        .send()
        .await
        .map_err(|e| {
            let missing = e
                .as_service_error()
                .map(|se| se.is_conditional_check_failed_exception())
                .unwrap_or(false);
            if missing {
                "Photo not found".to_string()
            } else {
                format!("DynamoDB update_item error: {}", e)
            }
        })?;

    result
        .attributes()
        .and_then(photo_from_item)
        .ok_or_else(|| "DynamoDB update_item returned no attributes".to_string())
}

/// Delete the stored object, then the row
pub async fn delete_photo(
    client: &DynamoClient,
    s3_client: &S3Client,
    table_name: &str,
    bucket_name: &str,
    collection: Collection,
    photo_id: &str,
    photo_url: &str,
) -> Result<(), String> {
    s3_client
        .delete_object()
        .bucket(bucket_name)
        .key(photo_url)
        .send()
        .await
        .map_err(|e| format!("S3 delete_object error: {}", e))?;

    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(collection.partition_key().to_string()))
        .key("SK", AttributeValue::S(photo_sort_key(photo_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, created_at: &str) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert("PK".to_string(), AttributeValue::S("COLLECTION#PHOTOS".to_string()));
        item.insert("SK".to_string(), AttributeValue::S(format!("PHOTO#{}", id)));
        item.insert("user_id".to_string(), AttributeValue::S("u1".to_string()));
        item.insert("photo_url".to_string(), AttributeValue::S(format!("drive/1_{}", name)));
        item.insert("photo_name".to_string(), AttributeValue::S(name.to_string()));
        item.insert("created_at".to_string(), AttributeValue::S(created_at.to_string()));
        item
    }

    fn photo(id: &str, name: &str, created_at: &str) -> Photo {
        photo_from_item(&item(id, name, created_at)).unwrap()
    }

    #[test]
    fn decodes_photo_rows() {
        let p = photo("p1", "Vacation", "2023-01-01T00:00:00+00:00");
        assert_eq!(p.id, "p1");
        assert_eq!(p.user_id, "u1");
        assert_eq!(p.photo_url, "drive/1_Vacation");
        assert_eq!(p.photo_name, "Vacation");
    }

    #[test]
    fn skips_non_photo_rows() {
        let mut review = item("x", "x", "x");
        review.insert("SK".to_string(), AttributeValue::S("REVIEW#x".to_string()));
        assert!(photo_from_item(&review).is_none());
    }

    #[test]
    fn missing_attributes_default_to_empty() {
        let mut bare = HashMap::new();
        bare.insert("SK".to_string(), AttributeValue::S("PHOTO#p9".to_string()));
        bare.insert(
            "created_at".to_string(),
            AttributeValue::S("2023-01-01T00:00:00+00:00".to_string()),
        );
        let p = photo_from_item(&bare).unwrap();
        assert_eq!(p.id, "p9");
        assert!(p.photo_name.is_empty());
    }

    #[test]
    fn skips_rows_without_a_readable_timestamp() {
        let mut missing = item("p1", "Vacation", "x");
        missing.remove("created_at");
        assert!(photo_from_item(&missing).is_none());

        assert!(photo_from_item(&item("p2", "Beach", "")).is_none());
        assert!(photo_from_item(&item("p3", "Alps", "yesterday")).is_none());
        assert!(photo_from_item(&item("p4", "Zoo", "2023-01-01T00:00:00Z")).is_some());
    }

    #[test]
    fn sorts_by_date_then_name() {
        let mut photos = vec![
            photo("b", "Beach", "2023-02-01T00:00:00+00:00"),
            photo("a", "Alps", "2023-01-01T00:00:00+00:00"),
        ];
        sort_photos(&mut photos, SortType::Date);
        assert_eq!(photos[0].id, "a");

        sort_photos(&mut photos, SortType::Name);
        assert_eq!(photos[0].photo_name, "Alps");

        let mut photos = vec![
            photo("z", "Zoo", "2023-02-01T00:00:00+00:00"),
            photo("a", "Apple", "2023-03-01T00:00:00+00:00"),
        ];
        sort_photos(&mut photos, SortType::Name);
        assert_eq!(photos[0].id, "a");
        sort_photos(&mut photos, SortType::Date);
        assert_eq!(photos[0].id, "z");
    }

    #[test]
    fn storage_path_is_prefixed_and_timestamped() {
        assert_eq!(storage_path("Trip.jpg", 1700000000000), "drive/1700000000000_Trip.jpg");
    }

    #[test]
    fn declared_content_type_wins() {
        assert_eq!(detect_content_type(Some("image/heic"), b"\x89PNG\r\n\x1a\n"), "image/heic");
    }

    #[test]
    fn sniffs_content_type_when_undeclared() {
        assert_eq!(detect_content_type(None, b"\x89PNG\r\n\x1a\n0000"), "image/png");
        assert_eq!(detect_content_type(Some("  "), b"\xff\xd8\xff\xe0"), "image/jpeg");
        assert_eq!(detect_content_type(None, b"plain text"), "application/octet-stream");
    }
}
