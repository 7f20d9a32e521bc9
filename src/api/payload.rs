//! Normalization of the raw subscriptions payload.
//!
//! The backend forwards the video platform's subscription resources more or
//! less verbatim, and nested objects (`snippet`, `thumbnails`, `resourceId`,
//! `contentDetails`) are not guaranteed to be present. The payload is kept as
//! a loosely-typed [`serde_json::Value`] tree and every optional path is read
//! with a default, so a malformed entry degrades to empty strings instead of
//! failing the whole page.
use crate::model::{channel_url, FetchOutcome, SubscriptionItem};
use serde_json::Value;

/// Read a string at a JSON pointer, defaulting to empty.
fn str_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Extract the subscription id. Numeric ids are accepted and stringified.
fn item_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalize a single raw item.
///
/// Returns `None` only when the item has no usable id: such an entry could
/// never be selected or unsubscribed.
pub fn normalize_item(raw: &Value) -> Option<SubscriptionItem> {
    let id = item_id(raw)?;
    let channel_id = str_at(raw, "/snippet/resourceId/channelId");

    Some(SubscriptionItem {
        id,
        title: str_at(raw, "/snippet/title"),
        channel_title: str_at(raw, "/snippet/channelTitle"),
        thumbnail_url: str_at(raw, "/snippet/thumbnails/default/url"),
        channel_url: channel_url(&channel_id),
        channel_id,
        total_item_count: raw
            .pointer("/contentDetails/totalItemCount")
            .and_then(Value::as_u64),
    })
}

/// Normalize a whole page response.
///
/// The total is read from `totalResults`, then `pageInfo.totalResults`, then 0.
pub fn normalize_page(raw: &Value) -> FetchOutcome {
    let entries = raw
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut items = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for entry in entries {
        match normalize_item(entry) {
            Some(item) => items.push(item),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Subscription entries without an id skipped");
    }

    let total = raw
        .get("totalResults")
        .and_then(Value::as_u64)
        .or_else(|| raw.pointer("/pageInfo/totalResults").and_then(Value::as_u64))
        .unwrap_or(0);

    FetchOutcome { items, total }
}
