//! OData system query options.

use std::collections::HashMap;
use std::fmt;

/// Value for the `ConsistencyLevel` request header.
///
/// Advanced directory queries (`$count`, `$search`, `endsWith`, ...) require
/// `ConsistencyLevel: eventual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyLevel {
    /// Eventually consistent reads from the directory index.
    Eventual,
}

impl ConsistencyLevel {
    /// Returns the header value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eventual => "eventual",
        }
    }
}

/// Response format requested with `$format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Atom,
    Xml,
}

impl Format {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Atom => "atom",
            Self::Xml => "xml",
        }
    }
}

/// A navigation property to expand, optionally selecting its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expand {
    pub relationship: String,
    pub select: Vec<String>,
}

impl fmt::Display for Expand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relationship)?;
        if !self.select.is_empty() {
            write!(f, "($select={})", self.select.join(","))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderByDirection {
    Ascending,
    Descending,
}

impl OrderByDirection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Sort order for `$orderby`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Option<OrderByDirection>,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.as_str())?;
        }
        Ok(())
    }
}

/// OData query options for list and get operations.
///
/// Unset options are omitted from the request. `skip` and `top` are only sent
/// when greater than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Sends the `ConsistencyLevel` header.
    pub consistency_level: Option<ConsistencyLevel>,
    /// Requests `@odata.count` in collection responses.
    pub count: bool,
    pub expand: Option<Expand>,
    pub filter: Option<String>,
    pub format: Option<Format>,
    pub order_by: Option<OrderBy>,
    /// Free-text search; quoted automatically.
    pub search: Option<String>,
    pub select: Vec<String>,
    pub skip: Option<u32>,
    /// Page size. Setting it also disables automatic paging on list calls.
    pub top: Option<u32>,
}

impl Query {
    /// Returns the query string parameters for this query.
    #[must_use]
    pub fn values(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();

        if self.count {
            params.insert("$count".to_string(), "true".to_string());
        }
        if let Some(expand) = self.expand.as_ref().filter(|e| !e.relationship.is_empty()) {
            params.insert("$expand".to_string(), expand.to_string());
        }
        if let Some(filter) = self.filter.as_ref().filter(|f| !f.is_empty()) {
            params.insert("$filter".to_string(), filter.clone());
        }
        if let Some(format) = self.format {
            params.insert("$format".to_string(), format.as_str().to_string());
        }
        if let Some(order_by) = self.order_by.as_ref().filter(|o| !o.field.is_empty()) {
            params.insert("$orderby".to_string(), order_by.to_string());
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            params.insert("$search".to_string(), format!("\"{search}\""));
        }
        if !self.select.is_empty() {
            params.insert("$select".to_string(), self.select.join(","));
        }
        if let Some(skip) = self.skip.filter(|s| *s > 0) {
            params.insert("$skip".to_string(), skip.to_string());
        }
        if let Some(top) = self.top.filter(|t| *t > 0) {
            params.insert("$top".to_string(), top.to_string());
        }

        params
    }

    /// Returns the request headers implied by this query.
    #[must_use]
    pub fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(level) = self.consistency_level {
            headers.insert("ConsistencyLevel".to_string(), level.as_str().to_string());
        }
        headers
    }

    /// Returns `true` when the caller asked for a single page of results.
    #[must_use]
    pub fn disables_paging(&self) -> bool {
        self.top.is_some_and(|t| t > 0)
    }
}
