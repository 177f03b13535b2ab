//! # inspire-client
//!
//! A Rust client for the INSPIRE-HEP literature API.
//!
//! Provides:
//! - **Library**: [`Record`] for single publications (raw field access, display
//!   strings, BibTeX) and [`Author`] for a researcher's corpus (citation totals,
//!   publication breakdowns, publication lists, co-authors)
//! - **CLI**: `inspire` binary for terminal use (`cli` feature)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> inspire_client::error::Result<()> {
//! use inspire_client::{Author, InspireClient, Record};
//!
//! let client = InspireClient::new();
//!
//! let record = Record::fetch(&client, "Weinberg:1967tq").await?;
//! println!("{}", record.display()?);
//! println!("{}", record.bibtex());
//!
//! let author = Author::fetch(&client, "Steven.Weinberg.1").await?;
//! println!("{} records, {} citations", author.len(), author.total_citations());
//! # Ok(())
//! # }
//! ```
//!
//! ## Query Builder
//!
//! ```
//! use inspire_client::QueryBuilder;
//!
//! let query = QueryBuilder::new()
//!     .author("Steven.Weinberg.1")
//!     .and()
//!     .title("leptons")
//!     .build();
//! assert_eq!(query, "a Steven.Weinberg.1 and t \"leptons\"");
//! ```

pub mod author;
pub mod bibtex;
pub mod client;
pub mod coauthors;
pub mod error;
pub mod filter;
pub mod format;
pub mod literature;
pub mod parse;
pub mod query;
pub mod rate_limit;
pub mod record;
pub mod types;

// Re-export key types at the crate root.
pub use author::{Author, PublicationListOptions};
pub use bibtex::BibtexEntry;
pub use client::InspireClient;
pub use coauthors::{Coauthor, CoauthorFormat};
pub use error::InspireError;
pub use filter::RecordFilter;
pub use parse::LiteratureResponse;
pub use query::{QueryBuilder, SearchParams, Sort, DEFAULT_MAX_RECORDS};
pub use record::{DisplayOptions, Record};
pub use types::*;
