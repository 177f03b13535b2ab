//! Text helpers for author lists, arXiv links and entry cleanup.

use crate::types::{AuthorName, LinkFormat};

/// Space initials evenly: "S.L." and "S. L." both become "S. L.".
pub fn force_initials(name: &str) -> String {
    name.replace(". ", ".").replace('.', ". ").trim_end().to_string()
}

/// Collapse runs of spaces and drop spaces before `,` and `.`.
pub fn tidy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' if out.ends_with(' ') => {}
            ',' | '.' if out.ends_with(' ') => {
                out.pop();
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Surnames of the first `cap` authors: "Glashow, Salam, Weinberg".
pub fn surname_list(authors: &[AuthorName], cap: usize) -> String {
    authors
        .iter()
        .take(cap)
        .map(|a| a.family_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// "S. L. Glashow, A. Salam, S. Weinberg", capped at `cap` authors.
pub fn display_list(authors: &[AuthorName], cap: usize) -> String {
    authors
        .iter()
        .take(cap)
        .map(AuthorName::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// "Glashow, S. L. and Salam, A." joined the BibTeX way.
pub fn bibtex_list(authors: &[AuthorName]) -> String {
    authors
        .iter()
        .map(AuthorName::bibtex_name)
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Render `label` as a link to `url` in the requested markup.
pub fn link(label: &str, url: &str, format: LinkFormat) -> String {
    match format {
        LinkFormat::Latex => format!("\\href{{{}}}{{{}}}", url, label),
        LinkFormat::LatexUrl => format!("\\url{{{}}}", url),
        LinkFormat::Markdown => format!("[{}]({})", label, url),
        LinkFormat::MarkdownUrl => url.to_string(),
        LinkFormat::Html => format!("<a href=\"{}\">{}</a>", url, label),
        LinkFormat::HtmlUrl => format!("<a href=\"{}\">{}</a>", url, url),
    }
}
