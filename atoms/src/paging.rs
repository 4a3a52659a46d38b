use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use std::future::Future;

pub type Item = HashMap<String, AttributeValue>;

/// One page of a query: its rows plus where the next page starts
#[derive(Debug, Default)]
pub struct Page {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

/// Keep calling `fetch` with the previous page's `last_evaluated_key`
/// until a page comes back without one. Returns every row in page order.
pub async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<Item>, String>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<Page, String>>,
{
    let mut items = Vec::new();
    let mut start_key: Option<Item> = None;

    loop {
        let page = fetch(start_key.take()).await?;
        items.extend(page.items);

        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn row(sk: &str) -> Item {
        let mut item = HashMap::new();
        item.insert("SK".to_string(), AttributeValue::S(sk.to_string()));
        item
    }

    fn sk(item: &Item) -> String {
        item["SK"].as_s().unwrap().clone()
    }

    #[tokio::test]
    async fn follows_last_evaluated_key_to_the_end() {
        let mut pages = VecDeque::from([
            Page {
                items: vec![row("REVIEW#1"), row("REVIEW#2")],
                last_evaluated_key: Some(row("REVIEW#2")),
            },
            Page {
                items: vec![row("REVIEW#3")],
                last_evaluated_key: Some(row("REVIEW#3")),
            },
            Page {
                items: vec![row("REVIEW#4")],
                last_evaluated_key: None,
            },
        ]);
        let mut start_keys = Vec::new();

        let items = collect_pages(|start_key: Option<Item>| {
            start_keys.push(start_key.as_ref().map(sk));
            let page = pages.pop_front().unwrap_or_default();
            async move { Ok::<Page, String>(page) }
        })
        .await
        .unwrap();

        assert_eq!(
            items.iter().map(sk).collect::<Vec<_>>(),
            vec!["REVIEW#1", "REVIEW#2", "REVIEW#3", "REVIEW#4"]
        );
        assert_eq!(
            start_keys,
            vec![None, Some("REVIEW#2".to_string()), Some("REVIEW#3".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_last_key_ends_paging() {
        let mut calls = 0;
        let items = collect_pages(|_| {
            calls += 1;
            async {
                Ok::<Page, String>(Page {
                    items: vec![row("PHOTO#1")],
                    last_evaluated_key: Some(HashMap::new()),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn page_errors_stop_the_query() {
        let mut calls = 0;
        let result = collect_pages(|start_key| {
            calls += 1;
            async move {
                match start_key {
                    None => Ok::<Page, String>(Page {
                        items: vec![row("PHOTO#1")],
                        last_evaluated_key: Some(row("PHOTO#1")),
                    }),
                    Some(_) => Err("DynamoDB query error: throttled".to_string()),
                }
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "DynamoDB query error: throttled");
        assert_eq!(calls, 2);
    }
}
