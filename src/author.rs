//! An author's corpus and the statistics derived from it.

use crate::client::InspireClient;
use crate::coauthors::{coauthor_table, collect_coauthors, Coauthor, CoauthorFormat};
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::parse::LiteratureResponse;
use crate::query::DEFAULT_MAX_RECORDS;
use crate::record::{DisplayOptions, Record};
use crate::types::PublicationCounts;
use serde_json::Value;

const PEER_REVIEWED_HEADING: &str = "Peer-reviewed publications";
const NON_PEER_REVIEWED_HEADING: &str = "Under review or non-peer reviewed publications";

/// Options for [`Author::nice_publication_list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationListOptions {
    /// Emit a LaTeX `enumerate` environment instead of a numbered plain list.
    pub latex_itemize: bool,
    /// Produce separate peer-reviewed and non-peer-reviewed sections.
    pub split_peer_review: bool,
    /// Start each entry with the record title.
    pub include_title: bool,
    /// Append `[citations: N]` to each entry.
    pub include_citations: bool,
    /// In LaTeX mode, counts above this are set in bold.
    pub well_cited_threshold: u64,
    /// Leave out records with more authors than this.
    pub max_authors: Option<usize>,
    /// How each record is rendered.
    pub display: DisplayOptions,
}

impl Default for PublicationListOptions {
    fn default() -> Self {
        Self {
            latex_itemize: false,
            split_peer_review: false,
            include_title: true,
            include_citations: true,
            well_cited_threshold: 10,
            max_authors: None,
            display: DisplayOptions::default(),
        }
    }
}

/// All literature records of one author, most recent first.
///
/// ```no_run
/// # async fn example() -> inspire_client::error::Result<()> {
/// use inspire_client::{Author, InspireClient, PublicationListOptions};
///
/// let client = InspireClient::new();
/// let author = Author::fetch(&client, "Steven.Weinberg.1").await?;
/// println!("{} citations", author.total_citations());
///
/// let options = PublicationListOptions {
///     latex_itemize: true,
///     split_peer_review: true,
///     ..Default::default()
/// };
/// println!("{}", author.nice_publication_list(&options)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Author {
    identifier: String,
    records: Vec<Record>,
    total_hits: u64,
}

impl Author {
    /// Fetch up to [`DEFAULT_MAX_RECORDS`] records with a single request.
    pub async fn fetch(client: &InspireClient, identifier: &str) -> Result<Self> {
        Self::fetch_with_limit(client, identifier, DEFAULT_MAX_RECORDS).await
    }

    /// Fetch up to `max_records` records with a single request.
    pub async fn fetch_with_limit(
        client: &InspireClient,
        identifier: &str,
        max_records: u32,
    ) -> Result<Self> {
        let response = client.author_hits(identifier, max_records).await?;
        Self::from_response(identifier, response)
    }

    /// Build from already-fetched hits. Fails if any hit is not a valid record.
    pub fn from_hits(identifier: impl Into<String>, hits: Vec<Value>) -> Result<Self> {
        let total_hits = hits.len() as u64;
        let records = hits
            .into_iter()
            .map(Record::from_json)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            identifier: identifier.into(),
            records,
            total_hits,
        })
    }

    fn from_response(identifier: &str, response: LiteratureResponse) -> Result<Self> {
        let total = response.total;
        let mut author = Self::from_hits(identifier, response.hits)?;
        author.total_hits = total.max(author.total_hits);
        Ok(author)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Records in API order (most recent first).
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record by texkey.
    pub fn record(&self, texkey: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.texkey() == texkey)
    }

    /// Number of matches INSPIRE reported for the query.
    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// True when INSPIRE holds more records than were fetched.
    pub fn is_truncated(&self) -> bool {
        self.total_hits > self.records.len() as u64
    }

    /// Sum of citation counts; records without a count add zero.
    pub fn total_citations(&self) -> u64 {
        self.records.iter().map(Record::citation_count).sum()
    }

    pub fn total_citations_without_self(&self) -> u64 {
        self.records
            .iter()
            .map(Record::citation_count_without_self_citations)
            .sum()
    }

    /// Citations of the records passing `filter`.
    pub fn citations_matching(&self, filter: &RecordFilter, self_citations: bool) -> u64 {
        self.records
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| {
                if self_citations {
                    r.citation_count()
                } else {
                    r.citation_count_without_self_citations()
                }
            })
            .sum()
    }

    /// Number of records per publication type.
    pub fn publication_counts(&self) -> PublicationCounts {
        let mut counts = PublicationCounts::default();
        for record in &self.records {
            counts.add(record.publication_type());
        }
        counts
    }

    /// Records split into (peer-reviewed, not peer-reviewed), order preserved.
    pub fn split_by_peer_review(&self) -> (Vec<&Record>, Vec<&Record>) {
        self.records.iter().partition(|r| r.is_peer_reviewed())
    }

    /// Formatted publication list, recomputed on every call.
    ///
    /// Fails with [`crate::InspireError::MissingField`] if a listed record
    /// cannot be displayed.
    pub fn nice_publication_list(&self, options: &PublicationListOptions) -> Result<String> {
        let listed: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| options.max_authors.map_or(true, |max| r.author_count() <= max))
            .collect();

        if !options.split_peer_review {
            let entries = render_entries(&listed, options)?;
            return Ok(render_section(None, &entries, options.latex_itemize));
        }

        let (reviewed, other): (Vec<&Record>, Vec<&Record>) =
            listed.into_iter().partition(|r| r.is_peer_reviewed());
        let reviewed = render_entries(&reviewed, options)?;
        let other = render_entries(&other, options)?;

        let separator = if options.latex_itemize { "" } else { "\n" };
        Ok(format!(
            "{}{}{}",
            render_section(Some(PEER_REVIEWED_HEADING), &reviewed, options.latex_itemize),
            separator,
            render_section(Some(NON_PEER_REVIEWED_HEADING), &other, options.latex_itemize),
        ))
    }

    /// Unique co-authors over the records passing `filter`.
    pub fn coauthors(&self, filter: &RecordFilter) -> Vec<Coauthor> {
        collect_coauthors(&self.records, &self.identifier, filter)
    }

    /// Co-authors as a CSV table.
    pub fn coauthor_table(&self, filter: &RecordFilter, format: CoauthorFormat) -> Result<String> {
        coauthor_table(&self.coauthors(filter), format)
    }
}

fn render_entries(records: &[&Record], options: &PublicationListOptions) -> Result<Vec<String>> {
    records.iter().map(|r| render_entry(r, options)).collect()
}

/// "<title>, <display>, [citations: N]."
fn render_entry(record: &Record, options: &PublicationListOptions) -> Result<String> {
    let mut entry = String::new();
    if options.include_title {
        if let Some(title) = record.title() {
            entry.push_str(title.trim());
            entry.push_str(", ");
        }
    }

    let display = record.display_with(&options.display)?;
    entry.push_str(display.strip_suffix('.').unwrap_or(&display));

    if options.include_citations {
        let count = record.citation_count();
        if options.latex_itemize && count > options.well_cited_threshold {
            entry.push_str(&format!(", [citations: \\textbf{{{}}}]", count));
        } else {
            entry.push_str(&format!(", [citations: {}]", count));
        }
    }

    entry.push('.');
    Ok(entry)
}

fn render_section(heading: Option<&str>, entries: &[String], latex: bool) -> String {
    let mut out = String::new();

    if latex {
        if let Some(heading) = heading {
            out.push_str(&format!("\\textbf{{{}}}\n", heading));
        }
        // An enumerate without items does not compile.
        if !entries.is_empty() {
            out.push_str("\\begin{enumerate}\n");
            for entry in entries {
                out.push_str(&format!("\\item {}\n", entry));
            }
            out.push_str("\\end{enumerate}\n");
        }
    } else {
        if let Some(heading) = heading {
            out.push_str(heading);
            out.push('\n');
        }
        for (i, entry) in entries.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, entry));
        }
    }

    out
}
