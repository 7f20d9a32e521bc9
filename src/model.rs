//! Display model for the subscription list.
//!
//! These types are what the rest of the client works with once a raw API
//! payload has been normalized by [`crate::api::normalize_page`]. Items are
//! immutable once fetched; a successful fetch replaces the whole list.
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Page size requested from the backend. Fixed for the lifetime of the client.
pub const ITEMS_PER_PAGE: u32 = 25;

/// Prefix used to build a channel link from its id.
pub const CHANNEL_URL_PREFIX: &str = "https://www.youtube.com/channel/";

// ============================================================================
// Subscription Item
// ============================================================================

/// A single subscription as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionItem {
    /// Server-assigned subscription id (unique, used for selection and unsubscribe).
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    /// Channel id of the subscribed channel, empty if the payload had none.
    pub channel_id: String,
    /// Derived link to the channel, empty when `channel_id` is empty.
    pub channel_url: String,
    /// Number of uploads reported by the subscription resource, if any.
    pub total_item_count: Option<u64>,
}

impl SubscriptionItem {
    /// Name shown to the user: the channel title, falling back to the subscription title.
    pub fn display_name(&self) -> &str {
        if self.channel_title.is_empty() {
            &self.title
        } else {
            &self.channel_title
        }
    }
}

/// Build the channel link for a channel id.
///
/// Returns an empty string for an empty id so callers never link to the bare prefix.
pub fn channel_url(channel_id: &str) -> String {
    if channel_id.is_empty() {
        String::new()
    } else {
        format!("{}{}", CHANNEL_URL_PREFIX, channel_id)
    }
}

// ============================================================================
// Sort Order
// ============================================================================

/// Server-side sort order by item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Value sent in the `sort` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Short label for the header.
    pub fn label(self) -> &'static str {
        match self {
            Self::Asc => "ascending",
            Self::Desc => "descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("Unknown sort order '{}' (expected asc or desc)", other)),
        }
    }
}

// ============================================================================
// Query State
// ============================================================================

/// Parameters of one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Channel-name filter the server applies. Empty means no filter.
    pub applied_filter: String,
    /// 1-based page number.
    pub page: u32,
    pub items_per_page: u32,
    pub sort_order: SortOrder,
}

impl QueryState {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            applied_filter: String::new(),
            page: 1,
            items_per_page: ITEMS_PER_PAGE,
            sort_order,
        }
    }

    /// Query string pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("query", self.applied_filter.clone()),
            ("page", self.page.to_string()),
            ("limit", self.items_per_page.to_string()),
            ("sort", self.sort_order.as_str().to_string()),
        ]
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(SortOrder::default())
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// One page of normalized results plus the server's total count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub items: Vec<SubscriptionItem>,
    pub total: u64,
}
