//! A single INSPIRE literature record.
//!
//! [`Record`] keeps the raw metadata object exactly as INSPIRE sent it and
//! derives display strings, BibTeX and classification from it on demand.
//!
//! ```
//! use inspire_client::{PublicationType, Record};
//!
//! let record = Record::from_json(serde_json::json!({
//!     "texkeys": ["Weinberg:1967tq"],
//!     "titles": [{"title": "A Model of Leptons"}],
//!     "authors": [{"full_name": "Weinberg, Steven"}],
//!     "publication_info": [{"journal_title": "Phys.Rev.Lett.", "journal_volume": "19", "year": 1967}],
//!     "earliest_date": "1967-11-20",
//!     "citation_count": 15000
//! }))
//! .unwrap();
//!
//! assert_eq!(record.display().unwrap(), "Weinberg, Phys.Rev.Lett. 19 (1967), 1967.");
//! assert_eq!(record.publication_type(), PublicationType::Published);
//! assert_eq!(record.field("citation_count"), Some(&serde_json::json!(15000)));
//! ```

use crate::bibtex::{balance_braces, BibtexEntry};
use crate::client::InspireClient;
use crate::error::{InspireError, Result};
use crate::format::{bibtex_list, display_list, link, surname_list, tidy};
use crate::parse::{hit_metadata, parse_partial_date, year_from_texkey};
use crate::types::{ArxivEprint, AuthorName, LinkFormat, PublicationInfo, PublicationType};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Author count above which the display shows "<first surname> et al".
pub const DEFAULT_AUTHOR_CAP: usize = 5;

/// Number of surnames listed when a record is under the author cap.
const SHOWN_SURNAMES: usize = 3;

/// How [`Record::display_with`] renders a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Records with more authors than this show only the first surname.
    pub author_cap: usize,
    /// Append the arXiv identifier when the record has one.
    pub arxiv: bool,
    /// Append the primary arXiv category after the identifier.
    pub arxiv_category: bool,
    /// Render the arXiv part as a link.
    pub arxiv_link: Option<LinkFormat>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            author_cap: DEFAULT_AUTHOR_CAP,
            arxiv: true,
            arxiv_category: true,
            arxiv_link: None,
        }
    }
}

/// Typed view of the fields derived values depend on, computed once.
#[derive(Debug, Clone)]
struct Summary {
    authors: Vec<AuthorName>,
    publication_info: Option<PublicationInfo>,
    arxiv: Option<ArxivEprint>,
    date: Option<NaiveDate>,
    publication_type: PublicationType,
}

/// One INSPIRE literature record.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Map<String, Value>,
    texkey: String,
    summary: OnceLock<Summary>,
}

impl Record {
    /// Wrap an already-fetched hit or bare metadata object. No HTTP traffic.
    ///
    /// Fails with [`InspireError::MissingField`] when the record has no texkey.
    pub fn from_json(value: Value) -> Result<Self> {
        Self::from_metadata(hit_metadata(value)?)
    }

    /// Like [`Record::from_json`], from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| InspireError::Parse(format!("Invalid record JSON: {}", e)))?;
        Self::from_json(value)
    }

    /// Wrap a metadata map.
    pub fn from_metadata(fields: Map<String, Value>) -> Result<Self> {
        let texkey = fields
            .get("texkeys")
            .and_then(Value::as_array)
            .and_then(|keys| keys.first())
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InspireError::missing("texkeys"))?
            .to_string();

        Ok(Self {
            fields,
            texkey,
            summary: OnceLock::new(),
        })
    }

    /// Fetch the record carrying `texkey` with a single request.
    pub async fn fetch(client: &InspireClient, texkey: &str) -> Result<Self> {
        let hit = client.record_hit(texkey).await?;
        Self::from_json(hit)
    }

    /// Primary texkey, the BibTeX cite key.
    pub fn texkey(&self) -> &str {
        &self.texkey
    }

    /// Raw value of a top-level API field, unmodified.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Raw value at a dotted path; numeric segments index arrays.
    ///
    /// `record.field_path("publication_info.0.journal_title")`
    pub fn field_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Every raw field of the record.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    fn summary(&self) -> &Summary {
        self.summary.get_or_init(|| {
            let authors: Vec<AuthorName> = self
                .fields
                .get("authors")
                .and_then(Value::as_array)
                .map(|list| list.iter().filter_map(AuthorName::from_json).collect())
                .unwrap_or_default();

            let publication_info = self
                .field_path("publication_info.0")
                .and_then(|v| serde_json::from_value::<PublicationInfo>(v.clone()).ok());

            let arxiv = self
                .field_path("arxiv_eprints.0")
                .and_then(|v| serde_json::from_value::<ArxivEprint>(v.clone()).ok())
                .filter(|e| !e.value.is_empty());

            let date = self.derive_date(publication_info.as_ref());
            let publication_type = classify(
                publication_info.as_ref(),
                arxiv.is_some(),
                self.document_type(),
            );

            Summary {
                authors,
                publication_info,
                arxiv,
                date,
                publication_type,
            }
        })
    }

    fn derive_date(&self, info: Option<&PublicationInfo>) -> Option<NaiveDate> {
        ["earliest_date", "preprint_date"]
            .iter()
            .filter_map(|key| self.fields.get(*key).and_then(Value::as_str))
            .find_map(parse_partial_date)
            .or_else(|| {
                info.and_then(|i| i.year)
                    .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            })
            .or_else(|| {
                year_from_texkey(&self.texkey).and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            })
    }

    /// First title.
    pub fn title(&self) -> Option<&str> {
        self.field_path("titles.0.title").and_then(Value::as_str)
    }

    /// Named authors, in record order.
    pub fn authors(&self) -> &[AuthorName] {
        &self.summary().authors
    }

    /// Collaboration names ("ATLAS", "CMS").
    pub fn collaborations(&self) -> Vec<&str> {
        self.fields
            .get("collaborations")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(|c| c["value"].as_str()).collect())
            .unwrap_or_default()
    }

    /// Declared author count, falling back to the length of the author list.
    pub fn author_count(&self) -> usize {
        self.fields
            .get("author_count")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or_else(|| self.authors().len())
    }

    pub fn publication_info(&self) -> Option<&PublicationInfo> {
        self.summary().publication_info.as_ref()
    }

    /// Journal title when the record carries a journal entry.
    pub fn journal(&self) -> Option<&str> {
        self.publication_info()
            .filter(|i| i.has_journal())
            .and_then(|i| i.journal_title.as_deref())
    }

    pub fn arxiv_eprint(&self) -> Option<&ArxivEprint> {
        self.summary().arxiv.as_ref()
    }

    /// `primary_arxiv_category` when present, else the eprint's first category.
    pub fn primary_arxiv_category(&self) -> Option<&str> {
        match self.fields.get("primary_arxiv_category") {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(Value::Array(list)) => list.first().and_then(Value::as_str),
            _ => self
                .arxiv_eprint()
                .and_then(|e| e.categories.first())
                .map(String::as_str),
        }
    }

    /// First document type ("article", "conference paper", "thesis", ...).
    pub fn document_type(&self) -> Option<&str> {
        match self.fields.get("document_type") {
            Some(Value::Array(list)) => list.first().and_then(Value::as_str),
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn doi(&self) -> Option<&str> {
        self.field_path("dois.0.value").and_then(Value::as_str)
    }

    /// Citations, zero when INSPIRE omits the count.
    pub fn citation_count(&self) -> u64 {
        self.fields
            .get("citation_count")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    pub fn citation_count_without_self_citations(&self) -> u64 {
        self.fields
            .get("citation_count_without_self_citations")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Whether INSPIRE considers the record reliably trackable.
    pub fn citeable(&self) -> bool {
        self.fields
            .get("citeable")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Best known date: earliest date, preprint date, journal year, texkey year.
    pub fn date(&self) -> Option<NaiveDate> {
        self.summary().date
    }

    pub fn year(&self) -> Option<i32> {
        self.date().map(|d| d.year())
    }

    pub fn publication_type(&self) -> PublicationType {
        self.summary().publication_type
    }

    pub fn is_peer_reviewed(&self) -> bool {
        self.publication_type().is_peer_reviewed()
    }

    pub fn arxiv_url(&self) -> Option<String> {
        self.arxiv_eprint().map(ArxivEprint::abs_url)
    }

    /// "Weinberg, Steven" style name of the first author, or the
    /// collaboration for collaboration-only records.
    pub fn first_author_name(&self) -> Result<String> {
        match self.authors().first() {
            Some(author) => Ok(author.citation_name()),
            None => self.collaboration_label(),
        }
    }

    /// "S. Weinberg, A. Salam", capped at `cap` authors.
    pub fn author_list(&self, cap: usize) -> Result<String> {
        if self.authors().is_empty() {
            return self.collaboration_label();
        }
        Ok(display_list(self.authors(), cap))
    }

    /// Authors in BibTeX form ("Surname, Given and ..."), the collaboration
    /// name when no author is named, `None` when neither exists.
    pub fn bibtex_author_list(&self) -> Option<String> {
        if !self.authors().is_empty() {
            return Some(bibtex_list(self.authors()));
        }
        let collaborations = self.collaborations();
        (!collaborations.is_empty()).then(|| collaborations.join(" and "))
    }

    fn collaboration_label(&self) -> Result<String> {
        let collaborations = self.collaborations();
        if collaborations.is_empty() {
            return Err(InspireError::missing("authors"));
        }
        Ok(collaborations.join(", "))
    }

    /// Authors as shown in the display string.
    fn shown_authors(&self, cap: usize) -> Result<String> {
        let authors = self.authors();
        if authors.is_empty() {
            return self.collaboration_label();
        }
        if self.author_count() > cap {
            Ok(format!("{} et al", authors[0].family_name))
        } else {
            Ok(surname_list(authors, SHOWN_SURNAMES))
        }
    }

    /// "Phys.Rev.Lett. 19 (1967) 1264, 1967" for records with a journal entry.
    pub fn pub_info(&self) -> Option<String> {
        let info = self.publication_info().filter(|i| i.has_journal())?;
        let mut parts: Vec<String> = Vec::new();
        parts.extend(info.journal_title.clone());
        parts.extend(info.journal_volume.clone());
        if let Some(year) = info.year {
            parts.push(format!("({})", year));
        }
        parts.extend(info.journal_issue.clone());
        parts.extend(info.artid.clone());

        let mut out = parts.join(" ");
        if let Some(year) = self.year() {
            out.push_str(&format!(", {}", year));
        }
        Some(tidy(&out))
    }

    fn arxiv_suffix(&self, options: &DisplayOptions) -> String {
        let Some(eprint) = self.arxiv_eprint().filter(|_| options.arxiv) else {
            return String::new();
        };
        let mut label = format!("arXiv:{}", eprint.value);
        if options.arxiv_category {
            if let Some(category) = self.primary_arxiv_category() {
                label.push_str(&format!(" [{}]", category));
            }
        }
        match options.arxiv_link {
            Some(format) => format!(", {}", link(&label, &eprint.abs_url(), format)),
            None => format!(", {}", label),
        }
    }

    /// Human-readable one-liner with default options.
    ///
    /// `Weinberg, Phys.Rev.Lett. 19 (1967), 1967.`
    pub fn display(&self) -> Result<String> {
        self.display_with(&DisplayOptions::default())
    }

    /// Human-readable one-liner.
    ///
    /// Needs an author (or collaboration) and a year; fails with
    /// [`InspireError::MissingField`] otherwise.
    pub fn display_with(&self, options: &DisplayOptions) -> Result<String> {
        let authors = self.shown_authors(options.author_cap)?;
        let suffix = self.arxiv_suffix(options);

        let line = match self.pub_info() {
            Some(info) => format!("{}, {}{}.", authors, info, suffix),
            None => {
                let year = self.year().ok_or_else(|| InspireError::missing("earliest_date"))?;
                match self.publication_type() {
                    PublicationType::Other => format!("{}, {}{}.", authors, year, suffix),
                    kind => format!("{}, {}, {}{}.", authors, kind, year, suffix),
                }
            }
        };
        Ok(tidy(&line))
    }

    /// BibTeX entry keyed by the texkey, with absent fields omitted.
    pub fn bibtex_entry(&self) -> BibtexEntry {
        let kind = self.publication_type();
        let info = self.publication_info().filter(|i| i.has_journal());
        let pages = info.and_then(|i| match (&i.page_start, &i.page_end) {
            (Some(start), Some(end)) => Some(format!("{}--{}", start, end)),
            (Some(start), None) => Some(start.clone()),
            _ => i.artid.clone(),
        });
        // The journal year, not the preprint date, goes with volume and pages.
        let year = info
            .and_then(|i| i.year)
            .or_else(|| self.year())
            .map(|y| y.to_string());
        let eprint = self.arxiv_eprint();

        BibtexEntry::new(BibtexEntry::entry_type_for(kind), self.texkey.clone())
            .field("author", self.bibtex_author_list())
            .field("title", self.title().map(|t| format!("{{{}}}", balance_braces(t))))
            .field("journal", info.and_then(|i| i.journal_title.as_deref()))
            .field("volume", info.and_then(|i| i.journal_volume.as_deref()))
            .field("number", info.and_then(|i| i.journal_issue.as_deref()))
            .field("pages", pages)
            .field("year", year)
            .field("doi", self.doi())
            .field("eprint", eprint.map(|e| e.value.as_str()))
            .field("archivePrefix", eprint.map(|_| "arXiv"))
            .field("primaryClass", eprint.and(self.primary_arxiv_category()))
    }

    /// Rendered BibTeX entry.
    pub fn bibtex(&self) -> String {
        self.bibtex_entry().to_string()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Journal entries win; otherwise an arXiv eprint makes a preprint; otherwise
/// the document type decides.
fn classify(
    info: Option<&PublicationInfo>,
    has_arxiv: bool,
    document_type: Option<&str>,
) -> PublicationType {
    let conference = matches!(document_type, Some("conference paper" | "proceedings"));
    if info.is_some_and(PublicationInfo::has_journal) {
        return if conference {
            PublicationType::Proceedings
        } else {
            PublicationType::Published
        };
    }
    if has_arxiv {
        return PublicationType::Preprint;
    }
    match document_type {
        Some("conference paper" | "proceedings" | "report") => PublicationType::Proceedings,
        Some("thesis") => PublicationType::Thesis,
        _ => PublicationType::Other,
    }
}
