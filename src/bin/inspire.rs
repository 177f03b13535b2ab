//! CLI binary for the INSPIRE client.
//!
//! Usage: inspire author Steven.Weinberg.1 --list --split

#[cfg(feature = "cli")]
mod cli {
    use clap::{Parser, Subcommand};
    use inspire_client::{
        Author, CoauthorFormat, InspireClient, PublicationListOptions, PublicationType, Record,
        RecordFilter, SearchParams, Sort, DEFAULT_MAX_RECORDS,
    };

    #[derive(Parser)]
    #[command(name = "inspire", about = "INSPIRE-HEP literature client", version)]
    struct Cli {
        /// API base URL (overrides INSPIRE_BASE_URL)
        #[arg(long, global = true)]
        base_url: Option<String>,

        /// Output format
        #[arg(long, global = true, default_value = "table")]
        output: OutputFormat,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Summarize an author's records and citations
        Author {
            /// Author identifier (e.g. Steven.Weinberg.1)
            identifier: String,
            /// Maximum number of records to fetch
            #[arg(short, long, default_value_t = DEFAULT_MAX_RECORDS)]
            max: u32,
            /// Print the publication list instead of the summary
            #[arg(long)]
            list: bool,
            /// Format the list as a LaTeX enumerate
            #[arg(long)]
            latex: bool,
            /// Split the list into peer-reviewed and other records
            #[arg(long)]
            split: bool,
            /// Leave titles out of list entries
            #[arg(long)]
            no_titles: bool,
            /// Skip records with more authors than this
            #[arg(long)]
            max_authors: Option<usize>,
        },
        /// Show a single record
        Record {
            /// Texkey (e.g. Weinberg:1967tq)
            texkey: String,
            /// Print the BibTeX entry
            #[arg(long)]
            bibtex: bool,
            /// Ask INSPIRE to render the BibTeX instead of building it locally
            #[arg(long, requires = "bibtex")]
            server: bool,
        },
        /// List an author's co-authors as CSV
        Coauthors {
            /// Author identifier
            identifier: String,
            /// Table layout
            #[arg(short, long, value_enum, default_value = "nsf")]
            format: CoauthorFormat,
            /// Only records from this year on
            #[arg(long)]
            since: Option<i32>,
            /// Skip records with more authors than this
            #[arg(long)]
            max_authors: Option<usize>,
        },
        /// Free literature search
        Search {
            /// INSPIRE search expression
            query: String,
            /// Maximum results to return
            #[arg(short, long, default_value = "10")]
            size: u32,
            /// Order by citations instead of date
            #[arg(long)]
            most_cited: bool,
        },
    }

    fn make_client(base_url: Option<String>) -> inspire_client::error::Result<InspireClient> {
        let client = InspireClient::from_env()?;
        Ok(match base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        })
    }

    fn print_records_table(records: &[Record]) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Texkey", "Year", "Type", "Title", "Cites"]);

        for record in records {
            let year = record.year().map(|y| y.to_string()).unwrap_or_default();
            let title = record.title().unwrap_or("-");
            let title = if title.chars().count() > 60 {
                format!("{}...", title.chars().take(57).collect::<String>())
            } else {
                title.to_string()
            };

            table.add_row(vec![
                record.texkey().to_string(),
                year,
                record.publication_type().to_string(),
                title,
                record.citation_count().to_string(),
            ]);
        }

        println!("{table}");
    }

    fn print_author_summary(author: &Author) {
        use comfy_table::{ContentArrangement, Table};

        println!("Author identifier: {}", author.identifier());
        if author.is_truncated() {
            println!(
                "Showing {} of {} records",
                author.len(),
                author.total_hits()
            );
        }
        println!("Total number of citations: {}", author.total_citations());
        println!(
            "Excluding self-citations: {}",
            author.total_citations_without_self()
        );

        let counts = author.publication_counts();
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Type", "Records"]);
        for kind in PublicationType::ALL {
            table.add_row(vec![kind.to_string(), counts.get(kind).to_string()]);
        }
        println!("{table}");
    }

    pub async fn run() -> inspire_client::error::Result<()> {
        let cli = Cli::parse();
        let client = make_client(cli.base_url)?;

        match cli.command {
            Commands::Author {
                identifier,
                max,
                list,
                latex,
                split,
                no_titles,
                max_authors,
            } => {
                let author = Author::fetch_with_limit(&client, &identifier, max).await?;

                if list {
                    let options = PublicationListOptions {
                        latex_itemize: latex,
                        split_peer_review: split,
                        include_title: !no_titles,
                        max_authors,
                        ..Default::default()
                    };
                    print!("{}", author.nice_publication_list(&options)?);
                    return Ok(());
                }

                match cli.output {
                    OutputFormat::Json => {
                        let summary = serde_json::json!({
                            "identifier": author.identifier(),
                            "records": author.len(),
                            "total_hits": author.total_hits(),
                            "citations": author.total_citations(),
                            "citations_without_self": author.total_citations_without_self(),
                            "publication_counts": author.publication_counts(),
                        });
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    }
                    OutputFormat::Table => {
                        print_author_summary(&author);
                        print_records_table(author.records());
                    }
                }
            }

            Commands::Record {
                texkey,
                bibtex,
                server,
            } => {
                if server {
                    print!("{}", client.fetch_bibtex(&texkey).await?);
                    return Ok(());
                }

                let record = Record::fetch(&client, &texkey).await?;
                if bibtex {
                    print!("{}", record.bibtex());
                    return Ok(());
                }

                match cli.output {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                    OutputFormat::Table => {
                        println!("{}", record.display()?);
                        println!(
                            "{} | {} citations | peer-reviewed: {}",
                            record.publication_type(),
                            record.citation_count(),
                            record.is_peer_reviewed()
                        );
                    }
                }
            }

            Commands::Coauthors {
                identifier,
                format,
                since,
                max_authors,
            } => {
                let mut filter = RecordFilter::new();
                if let Some(year) = since {
                    if let Some(date) = chrono::NaiveDate::from_ymd_opt(year, 1, 1) {
                        filter = filter.after(date);
                    }
                }
                if let Some(max) = max_authors {
                    filter = filter.max_authors(max);
                }

                let author = Author::fetch(&client, &identifier).await?;
                match cli.output {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&author.coauthors(&filter))?)
                    }
                    OutputFormat::Table => print!("{}", author.coauthor_table(&filter, format)?),
                }
            }

            Commands::Search {
                query,
                size,
                most_cited,
            } => {
                let sort = if most_cited {
                    Sort::MostCited
                } else {
                    Sort::MostRecent
                };
                let params = SearchParams::new(query).with_sort(sort).with_size(size);
                let response = client.search_literature(&params).await?;

                match cli.output {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&response.hits)?)
                    }
                    OutputFormat::Table => {
                        let records = response
                            .hits
                            .into_iter()
                            .map(Record::from_json)
                            .collect::<inspire_client::error::Result<Vec<_>>>()?;
                        println!("Found {} results:", response.total);
                        print_records_table(&records);
                    }
                }
            }
        }

        Ok(())
    }

}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
