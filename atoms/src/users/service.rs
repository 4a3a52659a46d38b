use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};

use super::model::Profile;

pub const PROFILE_SORT_KEY: &str = "PROFILE";

pub fn user_partition_key(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

pub fn profile_from_item(user_id: &str, item: &HashMap<String, AttributeValue>) -> Option<Profile> {
    let username = item.get("username").and_then(|v| v.as_s().ok())?;
    Some(Profile {
        user_id: user_id.to_string(),
        username: username.to_string(),
    })
}

/// Get a profile; `Ok(None)` when the user has none
pub async fn get_profile(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Option<Profile>, String> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(user_partition_key(user_id)))
        .key("SK", AttributeValue::S(PROFILE_SORT_KEY.to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    Ok(result.item().and_then(|item| profile_from_item(user_id, item)))
}

/// Usernames for a set of users, fetched concurrently.
/// Users without a profile (or whose lookup failed) are left out.
pub async fn load_usernames(
    client: &DynamoClient,
    table_name: &str,
    user_ids: impl IntoIterator<Item = &str>,
) -> HashMap<String, String> {
    let unique: BTreeSet<&str> = user_ids.into_iter().filter(|id| !id.is_empty()).collect();

    let lookups = unique
        .into_iter()
        .map(|user_id| async move { (user_id, get_profile(client, table_name, user_id).await) });

    let mut usernames = HashMap::new();
    for (user_id, result) in join_all(lookups).await {
        match result {
            Ok(Some(profile)) => {
                usernames.insert(profile.user_id, profile.username);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("⚠️ username lookup failed for user_id={}: {}", user_id, e),
        }
    }
    usernames
}
