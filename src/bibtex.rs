//! BibTeX entry construction.

use crate::types::PublicationType;

/// A BibTeX entry: type, cite key and ordered `field = {value}` pairs.
///
/// Fields without a value are never stored, so they never show up as empty
/// strings in the rendered entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibtexEntry {
    entry_type: String,
    key: String,
    fields: Vec<(String, String)>,
}

impl BibtexEntry {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Entry type conventionally used for a publication category.
    pub fn entry_type_for(kind: PublicationType) -> &'static str {
        match kind {
            PublicationType::Published | PublicationType::Preprint => "article",
            PublicationType::Proceedings => "inproceedings",
            PublicationType::Thesis => "phdthesis",
            PublicationType::Other => "misc",
        }
    }

    /// Add a field if it has a non-blank value.
    ///
    /// Unmatched braces in the value are escaped so the entry stays parseable.
    pub fn field<S: AsRef<str>>(mut self, name: &str, value: Option<S>) -> Self {
        if let Some(value) = value {
            let value = value.as_ref().trim();
            if !value.is_empty() {
                self.fields.push((name.to_string(), balance_braces(value)));
            }
        }
        self
    }

    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value of a field as stored (without the surrounding braces).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Escape every `{` or `}` that has no partner, leaving matched pairs and
/// already escaped braces alone.
pub(crate) fn balance_braces(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut escape = vec![false; chars.len()];
    let mut open: Vec<usize> = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => open.push(i),
            '}' => {
                if open.pop().is_none() {
                    escape[i] = true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    for i in open {
        escape[i] = true;
    }

    let mut out = String::with_capacity(value.len());
    for (c, escaped) in chars.into_iter().zip(escape) {
        if escaped {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl std::fmt::Display for BibtexEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}{{{}", self.entry_type, self.key)?;
        for (name, value) in &self.fields {
            write!(f, ",\n    {} = {{{}}}", name, value)?;
        }
        f.write_str("\n}\n")
    }
}
