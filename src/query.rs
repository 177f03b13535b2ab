//! INSPIRE search expressions and literature query parameters.
//!
//! # Example
//!
//! ```
//! use inspire_client::QueryBuilder;
//!
//! let query = QueryBuilder::new()
//!     .author("Steven.Weinberg.1")
//!     .and()
//!     .date_range(1967, 1970)
//!     .build();
//! assert_eq!(query, "a Steven.Weinberg.1 and date 1967->1970");
//! ```

use crate::error::{InspireError, Result};
use url::Url;

/// Number of records requested for an author by default; enough for a full career.
pub const DEFAULT_MAX_RECORDS: u32 = 1000;

/// Builder for INSPIRE search expressions (the `q` parameter).
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    parts: Vec<String>,
}

impl QueryBuilder {
    /// Create a new empty query builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records by author identifier (BAI, ORCID or name).
    pub fn author(mut self, identifier: &str) -> Self {
        self.parts.push(format!("a {}", identifier));
        self
    }

    /// Records with the given texkey.
    pub fn texkey(mut self, texkey: &str) -> Self {
        self.parts.push(format!("texkeys:{}", texkey));
        self
    }

    /// Title search term.
    pub fn title(mut self, text: &str) -> Self {
        self.parts.push(format!("t \"{}\"", text));
        self
    }

    /// Exact year filter.
    pub fn date(mut self, year: u16) -> Self {
        self.parts.push(format!("date {}", year));
        self
    }

    /// Year range filter (inclusive).
    pub fn date_range(mut self, from: u16, to: u16) -> Self {
        self.parts.push(format!("date {}->{}", from, to));
        self
    }

    /// arXiv eprint filter.
    pub fn arxiv(mut self, arxiv_id: &str) -> Self {
        self.parts.push(format!("arxiv:{}", arxiv_id));
        self
    }

    /// Records citing the record with the given control number.
    pub fn refers_to(mut self, recid: u64) -> Self {
        self.parts.push(format!("refersto:recid:{}", recid));
        self
    }

    pub fn and(mut self) -> Self {
        self.parts.push("and".to_string());
        self
    }

    pub fn or(mut self) -> Self {
        self.parts.push("or".to_string());
        self
    }

    /// Exclude the following term.
    pub fn exclude(mut self) -> Self {
        self.parts.push("not".to_string());
        self
    }

    /// Add a raw query fragment (no escaping).
    pub fn raw(mut self, query: &str) -> Self {
        self.parts.push(query.to_string());
        self
    }

    /// Build the final query string.
    pub fn build(self) -> String {
        self.parts.join(" ")
    }
}

impl std::fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.parts.join(" "))
    }
}

/// Result ordering understood by the literature endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    MostRecent,
    MostCited,
}

impl Sort {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::MostRecent => "mostrecent",
            Self::MostCited => "mostcited",
        }
    }
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Full parameter set for one `/literature` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub sort: Option<Sort>,
    pub size: Option<u32>,
    /// Response format; `None` means JSON.
    pub format: Option<String>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sort: None,
            size: None,
            format: None,
        }
    }

    /// All records of an author, most recent first, capped at `max_records`.
    pub fn author(identifier: &str, max_records: u32) -> Self {
        Self::new(QueryBuilder::new().author(identifier).build())
            .with_sort(Sort::MostRecent)
            .with_size(max_records)
    }

    /// The record carrying `texkey`.
    pub fn texkey(texkey: &str) -> Self {
        Self::new(QueryBuilder::new().texkey(texkey).build())
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Query pairs in the order INSPIRE documents them.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        pairs.push(("q", self.query.clone()));
        if let Some(format) = &self.format {
            pairs.push(("format", format.clone()));
        }
        pairs
    }

    /// Render the complete, percent-encoded literature URL under `base_url`.
    pub fn to_url(&self, base_url: &str) -> Result<Url> {
        let endpoint = format!("{}/literature", base_url.trim_end_matches('/'));
        let pairs = self.to_pairs();
        Url::parse_with_params(&endpoint, pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| InspireError::Config(format!("Invalid base URL '{}': {}", base_url, e)))
    }
}
