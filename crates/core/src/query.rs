//! Query-string construction for list endpoints
//!
//! Only defined, non-empty values are appended, in the order the caller
//! pushes them. Keys and values are percent-encoded.

use opsdeck_domain::{RoomFilters, ServerFilters, UserFilters};

/// Ordered set of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value` when `value` is present and not blank.
    pub fn push<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.pairs.push((key.to_string(), value));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `path` with the query string appended, or `path` unchanged when empty.
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.to_query_string())
        }
    }
}

/// Conversion of a filter struct into query parameters
pub trait ToQuery {
    fn to_query(&self) -> QueryParams;
}

impl ToQuery for UserFilters {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("page", self.page)
            .push("limit", self.limit)
            .push("search", self.search.as_deref())
            .push("role", self.role)
            .push("status", self.status)
    }
}

impl ToQuery for ServerFilters {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("page", self.page)
            .push("limit", self.limit)
            .push("status", self.status)
            .push("region", self.region.as_deref())
            .push("search", self.search.as_deref())
    }
}

impl ToQuery for RoomFilters {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("page", self.page)
            .push("limit", self.limit)
            .push("serverId", self.server_id.as_deref())
            .push("status", self.status)
    }
}
