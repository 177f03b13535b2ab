//! Record selection criteria for author statistics.

use crate::record::Record;
use chrono::{Datelike, NaiveDate};

/// Conditions a record has to meet to be counted.
///
/// The default filter accepts every record. Records without a known date fail
/// every date condition.
///
/// ```
/// use inspire_client::RecordFilter;
///
/// let filter = RecordFilter::new().only_published().in_year(2019).max_authors(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub only_citeable: bool,
    pub only_published: bool,
    pub before: Option<NaiveDate>,
    pub after: Option<NaiveDate>,
    pub in_year: Option<i32>,
    pub max_authors: Option<usize>,
    pub include_keys: Option<Vec<String>>,
    pub exclude_keys: Vec<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records INSPIRE marks as citeable.
    pub fn only_citeable(mut self) -> Self {
        self.only_citeable = true;
        self
    }

    /// Keep records with a journal entry.
    pub fn only_published(mut self) -> Self {
        self.only_published = true;
        self
    }

    /// Keep records dated on or before `date`.
    pub fn before(mut self, date: NaiveDate) -> Self {
        self.before = Some(date);
        self
    }

    /// Keep records dated on or after `date`.
    pub fn after(mut self, date: NaiveDate) -> Self {
        self.after = Some(date);
        self
    }

    pub fn in_year(mut self, year: i32) -> Self {
        self.in_year = Some(year);
        self
    }

    /// Keep records with at most `count` authors.
    pub fn max_authors(mut self, count: usize) -> Self {
        self.max_authors = Some(count);
        self
    }

    /// Keep only these texkeys.
    pub fn from_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Drop these texkeys.
    pub fn exclude_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    fn has_date_condition(&self) -> bool {
        self.before.is_some() || self.after.is_some() || self.in_year.is_some()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if self.only_citeable && !record.citeable() {
            return false;
        }
        if self.only_published && record.journal().is_none() {
            return false;
        }
        if self.max_authors.is_some_and(|max| record.author_count() > max) {
            return false;
        }
        if let Some(keys) = &self.include_keys {
            if !keys.iter().any(|k| k == record.texkey()) {
                return false;
            }
        }
        if self.exclude_keys.iter().any(|k| k == record.texkey()) {
            return false;
        }

        if !self.has_date_condition() {
            return true;
        }
        let Some(date) = record.date() else {
            return false;
        };
        self.before.map_or(true, |b| date <= b)
            && self.after.map_or(true, |a| date >= a)
            && self.in_year.map_or(true, |y| date.year() == y)
    }
}
