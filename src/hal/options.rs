//! Query options for GET requests.
//!
//! Every option type flattens into an ordered list of query pairs:
//!
//! | Option                    | Query                         |
//! |---------------------------|-------------------------------|
//! | [`RequestParams`] entry   | `key=value` (refs: their href) |
//! | [`Sort`] entry            | `sort=field,ASC`              |
//! | `projection`              | `projection=name`             |
//! | [`PageParam`]             | `page=0&size=20`              |
//!
//! Paged requests without a [`PageParam`] use page 0 with the configured
//! default page size.
//!
//! # Example
//!
//! ```rust
//! use hal_client::hal::{GetOption, PagedGetOption, PageParam, SortOrder};
//!
//! let options = PagedGetOption::new(
//!     GetOption::new()
//!         .with_param("status", "active")
//!         .sort_by("name", SortOrder::Asc)
//!         .with_projection("summary"),
//! )
//! .with_page(PageParam::new(2, 10));
//!
//! let query = options.to_query(20);
//! assert_eq!(query[1], ("sort".to_string(), "name,ASC".to_string()));
//! assert_eq!(query.last(), Some(&("size".to_string(), "10".to_string())));
//! ```

use std::fmt;

use crate::hal::body::ResourceRef;

/// Query parameter carrying the projection name.
pub const PROJECTION_PARAM: &str = "projection";

/// A query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Plain text.
    Text(String),
    /// A resource, sent as its href.
    Ref(ResourceRef),
}

impl ParamValue {
    /// Returns the text sent on the wire.
    #[must_use]
    pub fn as_query_value(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Ref(resource) => resource.href(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ResourceRef> for ParamValue {
    fn from(value: ResourceRef) -> Self {
        Self::Ref(value)
    }
}

macro_rules! param_value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

param_value_from_display!(bool, i32, i64, u32, u64, f64);

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    entries: Vec<(String, ParamValue)>,
}

impl RequestParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a parameter, consuming and returning `self`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Appends a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Returns `true` if a parameter with this key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == key)
    }

    /// Iterates parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens into query pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.as_query_value().to_string()))
            .collect()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the wire form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered sort criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    entries: Vec<(String, SortOrder)>,
}

impl Sort {
    /// Creates an empty sort.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a criterion.
    #[must_use]
    pub fn by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.entries.push((field.into(), order));
        self
    }

    /// Returns `true` if no criteria are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens into repeated `sort=field,ORDER` pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(field, order)| ("sort".to_string(), format!("{field},{order}")))
            .collect()
    }
}

/// Options for a single GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOption {
    /// Extra query parameters.
    pub params: RequestParams,
    /// Sort criteria.
    pub sort: Sort,
    /// Projection name; marks built resources as projections.
    pub projection: Option<String>,
}

impl GetOption {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Appends a sort criterion.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = self.sort.by(field, order);
        self
    }

    /// Sets the projection.
    #[must_use]
    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = Some(projection.into());
        self
    }

    /// Flattens into query pairs: params, sort, then projection.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.params.to_query();
        query.extend(self.sort.to_query());
        if let Some(projection) = &self.projection {
            query.push((PROJECTION_PARAM.to_string(), projection.clone()));
        }
        query
    }
}

/// Page number and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParam {
    /// Zero-based page number.
    pub page: u64,
    /// Page size.
    pub size: u64,
}

impl PageParam {
    /// Creates a page parameter.
    #[must_use]
    pub const fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    /// The first page with the given size.
    #[must_use]
    pub const fn first(size: u64) -> Self {
        Self { page: 0, size }
    }

    /// Flattens into `page` and `size` pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

/// Options for a paged GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagedGetOption {
    /// Non-paging options.
    pub get: GetOption,
    /// Requested page; defaults to page 0 with the configured size.
    pub page: Option<PageParam>,
}

impl PagedGetOption {
    /// Wraps non-paging options.
    #[must_use]
    pub const fn new(get: GetOption) -> Self {
        Self { get, page: None }
    }

    /// Sets the requested page.
    #[must_use]
    pub fn with_page(mut self, page: PageParam) -> Self {
        self.page = Some(page);
        self
    }

    /// Flattens into query pairs.
    ///
    /// Without an explicit page, `page=0&size={default_page_size}` is
    /// appended unless the params already carry `page` or `size`.
    #[must_use]
    pub fn to_query(&self, default_page_size: u32) -> Vec<(String, String)> {
        let mut query = self.get.to_query();
        match self.page {
            Some(page) => query.extend(page.to_query()),
            None if self.get.params.contains("page") || self.get.params.contains("size") => {}
            None => query.extend(PageParam::first(u64::from(default_page_size)).to_query()),
        }
        query
    }
}

impl From<GetOption> for PagedGetOption {
    fn from(get: GetOption) -> Self {
        Self::new(get)
    }
}

/// Flattens optional single-GET options.
pub(crate) fn get_query(options: Option<&GetOption>) -> Vec<(String, String)> {
    options.map(GetOption::to_query).unwrap_or_default()
}

/// Flattens optional paged options, applying the default page.
pub(crate) fn paged_query(
    options: Option<&PagedGetOption>,
    default_page_size: u32,
) -> Vec<(String, String)> {
    options.map_or_else(
        || PageParam::first(u64::from(default_page_size)).to_query(),
        |options| options.to_query(default_page_size),
    )
}
