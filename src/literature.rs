//! Literature search endpoints.
//!
//! Covers: free search, all records of an author, a record by texkey and
//! server-side BibTeX export.

use crate::client::InspireClient;
use crate::error::{InspireError, Result};
use crate::parse::{parse_literature_response, LiteratureResponse};
use crate::query::SearchParams;
use serde_json::Value;

impl InspireClient {
    /// Run a literature search and return the decoded hits.
    pub async fn search_literature(&self, params: &SearchParams) -> Result<LiteratureResponse> {
        let body = self.get_literature(params).await?;
        parse_literature_response(&body)
    }

    async fn get_literature(&self, params: &SearchParams) -> Result<String> {
        let pairs = params.to_pairs();
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.get("/literature", &borrowed).await
    }

    /// All records of an author, most recent first, capped at `max_records`.
    ///
    /// Only the first page is fetched; when INSPIRE reports more matches the
    /// result is truncated. An unknown identifier yields
    /// [`InspireError::NotFound`].
    pub async fn author_hits(&self, identifier: &str, max_records: u32) -> Result<LiteratureResponse> {
        let params = SearchParams::author(identifier, max_records);
        let response = self.search_literature(&params).await?;

        if response.hits.is_empty() {
            return Err(InspireError::NotFound(format!(
                "no literature records for author '{}'",
                identifier
            )));
        }
        if response.total > response.hits.len() as u64 {
            tracing::warn!(
                identifier,
                total = response.total,
                returned = response.hits.len(),
                "author has more records than requested; list is truncated"
            );
        }
        Ok(response)
    }

    /// The first hit for `texkey`.
    pub async fn record_hit(&self, texkey: &str) -> Result<Value> {
        let response = self.search_literature(&SearchParams::texkey(texkey)).await?;

        if response.hits.len() > 1 {
            tracing::warn!(
                texkey,
                hits = response.hits.len(),
                "more than one record carries this texkey; using the first"
            );
        }
        response
            .hits
            .into_iter()
            .next()
            .ok_or_else(|| InspireError::NotFound(format!("no record with texkey '{}'", texkey)))
    }

    /// BibTeX as rendered by INSPIRE itself.
    pub async fn fetch_bibtex(&self, texkey: &str) -> Result<String> {
        let params = SearchParams::texkey(texkey).with_format("bibtex");
        let body = self.get_literature(&params).await?;

        if body.trim().is_empty() {
            return Err(InspireError::NotFound(format!(
                "no BibTeX for texkey '{}'",
                texkey
            )));
        }
        Ok(body)
    }
}
