//! Public types shared by records, authors and the CLI.

use crate::format::force_initials;
use crate::parse::deserialize_year_option;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Publication category derived from a record's journal, eprint and document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationType {
    Published,
    Proceedings,
    Preprint,
    Thesis,
    Other,
}

impl PublicationType {
    pub const ALL: [PublicationType; 5] = [
        Self::Published,
        Self::Proceedings,
        Self::Preprint,
        Self::Thesis,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Proceedings => "proceedings",
            Self::Preprint => "preprint",
            Self::Thesis => "thesis",
            Self::Other => "other",
        }
    }

    /// Only published journal articles count as peer-reviewed.
    pub fn is_peer_reviewed(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl std::fmt::Display for PublicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of records per [`PublicationType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationCounts {
    pub published: usize,
    pub proceedings: usize,
    pub preprint: usize,
    pub thesis: usize,
    pub other: usize,
}

impl PublicationCounts {
    pub fn get(&self, kind: PublicationType) -> usize {
        match kind {
            PublicationType::Published => self.published,
            PublicationType::Proceedings => self.proceedings,
            PublicationType::Preprint => self.preprint,
            PublicationType::Thesis => self.thesis,
            PublicationType::Other => self.other,
        }
    }

    pub(crate) fn add(&mut self, kind: PublicationType) {
        let slot = match kind {
            PublicationType::Published => &mut self.published,
            PublicationType::Proceedings => &mut self.proceedings,
            PublicationType::Preprint => &mut self.preprint,
            PublicationType::Thesis => &mut self.thesis,
            PublicationType::Other => &mut self.other,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.published + self.proceedings + self.preprint + self.thesis + self.other
    }
}

/// An author entry of a literature record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    /// Name as INSPIRE spells it ("Weinberg, Steven").
    pub full_name: String,
    /// Family (last) name.
    pub family_name: String,
    /// Given (first) names and initials.
    pub given_name: Option<String>,
    /// INSPIRE author identifier, e.g. "S.Weinberg.1".
    pub bai: Option<String>,
    /// ORCID iD, e.g. "0000-0002-9584-8877".
    pub orcid: Option<String>,
    /// Control number of the author profile.
    pub recid: Option<u64>,
    /// First listed affiliation.
    pub affiliation: Option<String>,
}

impl AuthorName {
    /// Read an author object from a literature record.
    ///
    /// Uses `last_name`/`first_name` when present and otherwise splits
    /// `full_name` on its first comma. Returns `None` for entries without any
    /// usable name.
    pub fn from_json(value: &Value) -> Option<Self> {
        let full_name = value["full_name"].as_str().map(str::trim).unwrap_or("");
        let last = value["last_name"].as_str().map(str::trim).filter(|s| !s.is_empty());
        let first = value["first_name"].as_str().map(str::trim).filter(|s| !s.is_empty());

        let (family_name, given_name) = match last {
            Some(last) => (last.to_string(), first.map(String::from)),
            None if full_name.is_empty() => return None,
            None => split_full_name(full_name),
        };

        let full_name = if full_name.is_empty() {
            match &given_name {
                Some(given) => format!("{}, {}", family_name, given),
                None => family_name.clone(),
            }
        } else {
            full_name.to_string()
        };

        let id_with_schema = |schema: &str| {
            value["ids"].as_array().and_then(|ids| {
                ids.iter()
                    .find(|id| id["schema"].as_str() == Some(schema))
                    .and_then(|id| id["value"].as_str())
                    .map(String::from)
            })
        };
        let bai = value["bai"]
            .as_str()
            .map(String::from)
            .or_else(|| id_with_schema("INSPIRE BAI"));
        let orcid = id_with_schema("ORCID");

        let recid = value["recid"]
            .as_u64()
            .or_else(|| value["recid"].as_str().and_then(|s| s.parse().ok()));

        let affiliation = ["affiliations", "raw_affiliations"].iter().find_map(|key| {
            value[*key]
                .as_array()
                .and_then(|list| list.first())
                .and_then(|a| a["value"].as_str())
                .map(String::from)
        });

        Some(AuthorName {
            full_name,
            family_name,
            given_name,
            bai,
            orcid,
            recid,
            affiliation,
        })
    }

    /// True if `identifier` is this author's BAI, ORCID or profile recid.
    pub fn has_identifier(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        self.bai.as_deref() == Some(identifier)
            || self.orcid.as_deref() == Some(identifier)
            || self.recid.is_some_and(|r| r.to_string() == identifier)
    }

    /// "Weinberg, Steven" for BibTeX author fields.
    pub fn bibtex_name(&self) -> String {
        match &self.given_name {
            Some(given) => format!("{}, {}", self.family_name, given),
            None => self.family_name.clone(),
        }
    }

    /// "Steven Weinberg", initials spaced as "S. W.".
    pub fn display_name(&self) -> String {
        match &self.given_name {
            Some(given) => format!("{} {}", force_initials(given), self.family_name),
            None => self.family_name.clone(),
        }
    }

    /// "Feynman, Richard P.": first given name kept, later ones abbreviated.
    pub fn citation_name(&self) -> String {
        let Some(given) = &self.given_name else {
            return self.family_name.clone();
        };
        let given = force_initials(given);
        let mut words = given.split_whitespace();
        let mut out = match words.next() {
            Some(first) => first.to_string(),
            None => return self.family_name.clone(),
        };
        for word in words {
            out.push(' ');
            match word.chars().next() {
                Some(c) if !word.ends_with('.') => {
                    out.push(c);
                    out.push('.');
                }
                _ => out.push_str(word),
            }
        }
        format!("{}, {}", self.family_name, out)
    }
}

fn split_full_name(full_name: &str) -> (String, Option<String>) {
    if let Some((family, given)) = full_name.split_once(',') {
        let given = given.trim();
        let given = (!given.is_empty()).then(|| given.to_string());
        return (family.trim().to_string(), given);
    }
    let words: Vec<&str> = full_name.split_whitespace().collect();
    match words.split_last() {
        Some((last, rest)) if !rest.is_empty() => (last.to_string(), Some(rest.join(" "))),
        _ => (full_name.to_string(), None),
    }
}

/// First `publication_info` entry of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationInfo {
    pub journal_title: Option<String>,
    pub journal_volume: Option<String>,
    pub journal_issue: Option<String>,
    pub artid: Option<String>,
    pub page_start: Option<String>,
    pub page_end: Option<String>,
    #[serde(deserialize_with = "deserialize_year_option")]
    pub year: Option<i32>,
}

impl PublicationInfo {
    /// A journal entry is only meaningful with a non-empty title.
    pub fn has_journal(&self) -> bool {
        self.journal_title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// First `arxiv_eprints` entry of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArxivEprint {
    pub value: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ArxivEprint {
    pub fn abs_url(&self) -> String {
        format!("https://arxiv.org/abs/{}", self.value)
    }
}

/// Markup used when the arXiv identifier is rendered as a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFormat {
    /// `\href{label}{url}`
    Latex,
    /// `\url{url}`
    LatexUrl,
    /// `[label](url)`
    Markdown,
    /// bare url
    MarkdownUrl,
    /// `<a href="url">label</a>`
    Html,
    /// `<a href="url">url</a>`
    HtmlUrl,
}

impl LinkFormat {
    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "latex" => Some(Self::Latex),
            "latex_url" => Some(Self::LatexUrl),
            "markdown" => Some(Self::Markdown),
            "markdown_url" => Some(Self::MarkdownUrl),
            "html" => Some(Self::Html),
            "html_url" => Some(Self::HtmlUrl),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_author_from_full_name() {
        let author = AuthorName::from_json(&json!({"full_name": "Weinberg, Steven"})).unwrap();
        assert_eq!(author.family_name, "Weinberg");
        assert_eq!(author.given_name.as_deref(), Some("Steven"));
        assert_eq!(author.bibtex_name(), "Weinberg, Steven");
        assert_eq!(author.display_name(), "Steven Weinberg");
    }

    #[test]
    fn test_author_prefers_explicit_parts() {
        let author = AuthorName::from_json(&json!({
            "full_name": "'t Hooft, Gerard",
            "first_name": "Gerard",
            "last_name": "'t Hooft",
            "ids": [{"schema": "INSPIRE BAI", "value": "G.t.Hooft.1"}],
            "affiliations": [{"value": "Utrecht U."}],
            "recid": 984232
        }))
        .unwrap();
        assert_eq!(author.family_name, "'t Hooft");
        assert_eq!(author.bai.as_deref(), Some("G.t.Hooft.1"));
        assert_eq!(author.recid, Some(984232));
        assert_eq!(author.affiliation.as_deref(), Some("Utrecht U."));
    }

    #[test]
    fn test_author_identifiers_from_ids() {
        let author = AuthorName::from_json(&json!({
            "full_name": "Doe, Jane",
            "ids": [
                {"schema": "ORCID", "value": "0000-0002-9584-8877"},
                {"schema": "INSPIRE BAI", "value": "J.Doe.1"}
            ],
            "recid": 1012345
        }))
        .unwrap();
        assert_eq!(author.orcid.as_deref(), Some("0000-0002-9584-8877"));
        assert!(author.has_identifier("0000-0002-9584-8877"));
        assert!(author.has_identifier("J.Doe.1"));
        assert!(author.has_identifier("1012345"));
        assert!(!author.has_identifier("Jane.Doe.1"));
    }

    #[test]
    fn test_author_without_name_is_skipped() {
        assert!(AuthorName::from_json(&json!({"affiliations": []})).is_none());
    }

    #[test]
    fn test_citation_name_abbreviates_middle_names() {
        let author = AuthorName::from_json(&json!({"full_name": "Feynman, Richard Phillips"})).unwrap();
        assert_eq!(author.citation_name(), "Feynman, Richard P.");

        let initials = AuthorName::from_json(&json!({"full_name": "Salam, A."})).unwrap();
        assert_eq!(initials.citation_name(), "Salam, A.");
    }

    #[test]
    fn test_display_name_spaces_initials() {
        let author = AuthorName::from_json(&json!({"full_name": "Glashow, S.L."})).unwrap();
        assert_eq!(author.display_name(), "S. L. Glashow");
    }

    #[test]
    fn test_publication_info_year_as_string() {
        let info: PublicationInfo = serde_json::from_value(json!({
            "journal_title": "Phys.Rev.Lett.",
            "journal_volume": "19",
            "year": "1967"
        }))
        .unwrap();
        assert_eq!(info.year, Some(1967));
        assert!(info.has_journal());
    }

    #[test]
    fn test_publication_counts() {
        let mut counts = PublicationCounts::default();
        counts.add(PublicationType::Published);
        counts.add(PublicationType::Published);
        counts.add(PublicationType::Thesis);
        assert_eq!(counts.get(PublicationType::Published), 2);
        assert_eq!(counts.total(), 3);
    }
}
