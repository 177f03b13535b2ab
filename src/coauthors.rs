//! Co-author lists for grant and conflict-of-interest paperwork.

use crate::error::{InspireError, Result};
use crate::filter::RecordFilter;
use crate::record::Record;
use crate::types::AuthorName;
use serde::Serialize;
use std::collections::HashMap;

/// Column layout of the exported co-author table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CoauthorFormat {
    /// `"Author","Affiliation","Last Active"`
    #[default]
    Nsf,
    /// `"Last Name","First Name","Affiliation","Last Active"`
    Doe,
}

impl CoauthorFormat {
    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nsf" => Some(Self::Nsf),
            "doe" => Some(Self::Doe),
            _ => None,
        }
    }
}

/// A co-author and the year of the latest shared record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coauthor {
    pub name: AuthorName,
    pub last_active: Option<i32>,
}

impl Coauthor {
    pub fn affiliation(&self) -> &str {
        self.name.affiliation.as_deref().unwrap_or("Unknown")
    }
}

/// Identity used to merge the same person across records.
fn identity(author: &AuthorName) -> String {
    match (&author.bai, author.recid) {
        (Some(bai), _) => format!("bai:{}", bai),
        (None, Some(recid)) => format!("recid:{}", recid),
        (None, None) => format!("name:{}", author.full_name.to_lowercase()),
    }
}

/// Identity of the queried author within `records`.
///
/// An author entry carrying `identifier` as BAI, ORCID or recid wins. Other
/// identifier forms (a name-style BAI such as "Steven.Weinberg.1") resolve to
/// the person present on every record, narrowed by the surname in the
/// identifier when several people are.
fn own_identity(records: &[Record], identifier: &str) -> Option<String> {
    let direct = records
        .iter()
        .flat_map(Record::authors)
        .find(|a| a.has_identifier(identifier));
    if let Some(author) = direct {
        return Some(identity(author));
    }

    let mut common: Option<HashMap<String, &AuthorName>> = None;
    for record in records.iter().filter(|r| !r.authors().is_empty()) {
        let here: HashMap<String, &AuthorName> =
            record.authors().iter().map(|a| (identity(a), a)).collect();
        common = Some(match common {
            Some(common) => common
                .into_iter()
                .filter(|(key, _)| here.contains_key(key))
                .collect(),
            None => here,
        });
    }

    let mut candidates: Vec<(String, &AuthorName)> = common?.into_iter().collect();
    if candidates.len() > 1 {
        let parts: Vec<String> = identifier.split('.').map(simplify).collect();
        candidates.retain(|(_, author)| parts.contains(&simplify(&author.family_name)));
    }

    if candidates.len() == 1 {
        candidates.pop().map(|(key, _)| key)
    } else {
        tracing::debug!(
            identifier,
            candidates = candidates.len(),
            "could not tell the author apart from co-authors"
        );
        None
    }
}

/// Lowercase letters and digits only, so "'t Hooft" compares equal to "tHooft".
fn simplify(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Unique co-authors across `records` that pass `filter`, in order of first
/// appearance.
///
/// For each person the latest activity year is kept, along with the
/// affiliation from that record and the longest spelling of the name.
pub fn collect_coauthors(records: &[Record], identifier: &str, filter: &RecordFilter) -> Vec<Coauthor> {
    let mut order: Vec<Coauthor> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let own = own_identity(records, identifier);

    for record in records.iter().filter(|r| filter.matches(r)) {
        let year = record.year();
        for author in record.authors() {
            let key = identity(author);
            if author.has_identifier(identifier) || own.as_ref() == Some(&key) {
                continue;
            }
            let Some(&slot) = index.get(&key) else {
                index.insert(key, order.len());
                order.push(Coauthor {
                    name: author.clone(),
                    last_active: year,
                });
                continue;
            };

            let known = &mut order[slot];
            if year > known.last_active {
                known.last_active = year;
                if author.affiliation.is_some() {
                    known.name.affiliation = author.affiliation.clone();
                }
            }
            if author.full_name.len() > known.name.full_name.len() {
                let affiliation = known.name.affiliation.take();
                known.name = AuthorName {
                    affiliation: affiliation.or_else(|| author.affiliation.clone()),
                    ..author.clone()
                };
            }
        }
    }

    order
}

/// Render co-authors as a fully quoted CSV table with a header row.
pub fn coauthor_table(coauthors: &[Coauthor], format: CoauthorFormat) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    match format {
        CoauthorFormat::Nsf => writer.write_record(["Author", "Affiliation", "Last Active"])?,
        CoauthorFormat::Doe => {
            writer.write_record(["Last Name", "First Name", "Affiliation", "Last Active"])?
        }
    }

    for coauthor in coauthors {
        let year = coauthor
            .last_active
            .map(|y| y.to_string())
            .unwrap_or_default();
        match format {
            CoauthorFormat::Nsf => writer.write_record([
                coauthor.name.full_name.as_str(),
                coauthor.affiliation(),
                year.as_str(),
            ])?,
            CoauthorFormat::Doe => writer.write_record([
                coauthor.name.family_name.as_str(),
                coauthor.name.given_name.as_deref().unwrap_or(""),
                coauthor.affiliation(),
                year.as_str(),
            ])?,
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| InspireError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|e| InspireError::Parse(format!("CSV is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            Record::from_json(json!({
                "texkeys": ["Weinberg:1979sa"],
                "earliest_date": "1979-03-01",
                "authors": [
                    {"full_name": "Weinberg, Steven", "bai": "S.Weinberg.1"},
                    {"full_name": "Salam, Abdus", "bai": "A.Salam.1", "affiliations": [{"value": "ICTP, Trieste"}]}
                ]
            }))
            .unwrap(),
            Record::from_json(json!({
                "texkeys": ["Weinberg:1972ab"],
                "earliest_date": "1972",
                "authors": [
                    {"full_name": "Weinberg, S.", "bai": "S.Weinberg.1"},
                    {"full_name": "Salam, A.", "bai": "A.Salam.1", "affiliations": [{"value": "Imperial Coll., London"}]},
                    {"full_name": "Glashow, Sheldon Lee", "bai": "S.L.Glashow.1", "affiliations": [{"value": "Harvard U."}]}
                ]
            }))
            .unwrap(),
        ]
    }

    #[test]
    fn test_coauthors_merged_and_self_excluded() {
        let coauthors = collect_coauthors(&records(), "S.Weinberg.1", &RecordFilter::new());
        assert_eq!(coauthors.len(), 2);

        let salam = &coauthors[0];
        assert_eq!(salam.name.full_name, "Salam, Abdus");
        assert_eq!(salam.last_active, Some(1979));
        assert_eq!(salam.affiliation(), "ICTP, Trieste");

        assert_eq!(coauthors[1].name.family_name, "Glashow");
        assert_eq!(coauthors[1].last_active, Some(1972));
    }

    fn doe_records() -> Vec<Record> {
        vec![
            Record::from_json(json!({
                "texkeys": ["Doe:2022aa"],
                "earliest_date": "2022",
                "authors": [
                    {"full_name": "Doe, Jane", "ids": [
                        {"schema": "ORCID", "value": "0000-0002-9584-8877"},
                        {"schema": "INSPIRE BAI", "value": "J.Doe.1"}
                    ]},
                    {"full_name": "Roe, Rick", "ids": [{"schema": "INSPIRE BAI", "value": "R.Roe.1"}]}
                ]
            }))
            .unwrap(),
            Record::from_json(json!({
                "texkeys": ["Doe:2023bb"],
                "earliest_date": "2023",
                "authors": [
                    {"full_name": "Poe, Edgar", "ids": [{"schema": "INSPIRE BAI", "value": "E.Poe.1"}]},
                    {"full_name": "Doe, Jane", "ids": [{"schema": "INSPIRE BAI", "value": "J.Doe.1"}]}
                ]
            }))
            .unwrap(),
        ]
    }

    fn names(coauthors: &[Coauthor]) -> Vec<&str> {
        coauthors.iter().map(|c| c.name.full_name.as_str()).collect()
    }

    #[test]
    fn test_orcid_identifier_excludes_self() {
        let coauthors = collect_coauthors(&doe_records(), "0000-0002-9584-8877", &RecordFilter::new());
        assert_eq!(names(&coauthors), ["Roe, Rick", "Poe, Edgar"]);
    }

    #[test]
    fn test_orcid_on_single_record_excludes_self() {
        let records = &doe_records()[..1];
        let coauthors = collect_coauthors(records, "0000-0002-9584-8877", &RecordFilter::new());
        assert_eq!(names(&coauthors), ["Roe, Rick"]);
    }

    #[test]
    fn test_name_style_identifier_resolves_to_shared_author() {
        let coauthors = collect_coauthors(&doe_records(), "Jane.Doe.1", &RecordFilter::new());
        assert_eq!(names(&coauthors), ["Roe, Rick", "Poe, Edgar"]);

        let coauthors = collect_coauthors(&records(), "Steven.Weinberg.1", &RecordFilter::new());
        assert_eq!(names(&coauthors), ["Salam, Abdus", "Glashow, Sheldon Lee"]);
    }

    #[test]
    fn test_filter_applies() {
        let filter = RecordFilter::new().in_year(1972);
        let coauthors = collect_coauthors(&records(), "S.Weinberg.1", &filter);
        assert_eq!(coauthors.len(), 2);
        assert!(coauthors.iter().all(|c| c.last_active == Some(1972)));
    }

    #[test]
    fn test_nsf_table() {
        let coauthors = collect_coauthors(&records(), "S.Weinberg.1", &RecordFilter::new());
        let table = coauthor_table(&coauthors, CoauthorFormat::Nsf).unwrap();
        assert_eq!(
            table,
            "\"Author\",\"Affiliation\",\"Last Active\"\n\
             \"Salam, Abdus\",\"ICTP, Trieste\",\"1979\"\n\
             \"Glashow, Sheldon Lee\",\"Harvard U.\",\"1972\"\n"
        );
    }

    #[test]
    fn test_doe_table() {
        let coauthors = collect_coauthors(&records(), "S.Weinberg.1", &RecordFilter::new());
        let table = coauthor_table(&coauthors, CoauthorFormat::Doe).unwrap();
        let mut lines = table.lines();
        assert_eq!(
            lines.next(),
            Some("\"Last Name\",\"First Name\",\"Affiliation\",\"Last Active\"")
        );
        assert_eq!(lines.next(), Some("\"Salam\",\"Abdus\",\"ICTP, Trieste\",\"1979\""));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(CoauthorFormat::from_str_loose("NSF"), Some(CoauthorFormat::Nsf));
        assert_eq!(CoauthorFormat::from_str_loose("doe"), Some(CoauthorFormat::Doe));
        assert_eq!(CoauthorFormat::from_str_loose("ris"), None);
    }
}
