use serde::{Deserialize, Serialize};
use std::fmt;

/// Photo record - one stored object plus its display metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Photo {
    pub id: String,
    pub user_id: String,
    pub photo_url: String,
    pub photo_name: String,
    pub created_at: String,
}

/// Named partition of photos. Both share the bucket, not the table partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Personal drive, listed per user
    Photos,
    /// Food feed, listed for everyone
    Food,
}

impl Collection {
    /// Resolve the `{collection}` path segment of `/api/{collection}`
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "photos" => Some(Collection::Photos),
            "food" => Some(Collection::Food),
            _ => None,
        }
    }

    pub fn segment(&self) -> &'static str {
        match self {
            Collection::Photos => "photos",
            Collection::Food => "food",
        }
    }

    /// Partition key for every photo in this collection
    pub fn partition_key(&self) -> &'static str {
        match self {
            Collection::Photos => "COLLECTION#PHOTOS",
            Collection::Food => "COLLECTION#FOOD",
        }
    }

    /// Whether listings ignore the caller's user id
    pub fn is_shared_feed(&self) -> bool {
        matches!(self, Collection::Food)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    Name,
    #[default]
    Date,
}

impl SortType {
    /// `sortType` query value: "name" sorts by name, anything else by date
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("name") => SortType::Name,
            _ => SortType::Date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenamePhotoPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "newName")]
    pub new_name: String,
}

/// One `files` part of an upload form
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Parsed multipart body of `POST /api/{collection}`
#[derive(Debug, Default)]
pub struct UploadForm {
    pub user_id: String,
    pub files: Vec<NewUpload>,
}
