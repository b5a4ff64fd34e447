//! tenq CLI binary.
//!
//! Lists a form's filings from the EDGAR quarterly indexes and extracts
//! (optionally summarized) sections from filing documents.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tenq::summary::Summarizer;
use tenq::{ChatCompletionsClient, Config, ExtractRequest, FilingQuery, extract_section, fetch_filings};
use tenq_data::edgar::{DEFAULT_FORM_TYPE, DocumentResolver, EdgarClient, IndexFetcher};
use tenq_output::{ExportFormat, Exporter, export_file_name, render_table};

#[derive(Parser)]
#[command(name = "tenq")]
#[command(about = "tenq: SEC quarterly filing listings and section extraction", long_about = None)]
#[command(version)]
struct Cli {
    /// User-Agent sent to the archive (overrides TENQ_USER_AGENT)
    #[arg(long, global = true)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List filings of one form type from the quarterly indexes
    Filings {
        /// Calendar year
        #[arg(long)]
        year: i32,

        /// Quarter to fetch (repeat for several)
        #[arg(long = "quarter", short = 'q', required = true,
              value_parser = clap::value_parser!(u8).range(1..=4))]
        quarters: Vec<u8>,

        /// Form type to keep
        #[arg(long, default_value = DEFAULT_FORM_TYPE)]
        form: String,

        /// Keep only filings containing this text (any field, case-insensitive)
        #[arg(long)]
        filter: Option<String>,

        /// Also write the listing to a file (csv, json or text)
        #[arg(long)]
        export: Option<ExportFormat>,

        /// Export path (defaults to e.g. 10Q_filings_2024_Q1-2.csv)
        #[arg(long, requires = "export")]
        output: Option<PathBuf>,
    },

    /// Print the primary document URL of a filing listing page
    Resolve {
        /// Filing listing (index) page URL
        url: String,

        /// Form type of the primary document
        #[arg(long, default_value = DEFAULT_FORM_TYPE)]
        form: String,
    },

    /// Extract the text between two markers from a filing document
    Extract {
        /// Document URL, or a listing page URL with --resolve
        url: String,

        /// Section start marker, e.g. "Item 2"
        #[arg(long)]
        start: Option<String>,

        /// Section end marker, e.g. "Item 3"
        #[arg(long)]
        end: Option<String>,

        /// Treat URL as a listing page and resolve the primary document first
        #[arg(long)]
        resolve: bool,

        /// Form type used with --resolve
        #[arg(long, default_value = DEFAULT_FORM_TYPE)]
        form: String,

        /// Summarize the section through the configured chat-completions endpoint
        #[arg(long)]
        summarize: bool,

        /// Model for --summarize (overrides TENQ_SUMMARY_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(user_agent) = cli.user_agent {
        config.user_agent = user_agent;
    }
    debug!("Using {:?}", config);

    match cli.command {
        Commands::Filings {
            year,
            quarters,
            form,
            filter,
            export,
            output,
        } => {
            let mut query = FilingQuery::new(year, quarters).with_form_type(form);
            if let Some(filter) = filter {
                query = query.with_filter(filter);
            }
            list_filings(&config, &query, export, output).await?;
        }
        Commands::Resolve { url, form } => {
            let client = EdgarClient::with_user_agent(&config.user_agent)?;
            let resolved = DocumentResolver::new(&client)
                .with_form_type(form)
                .resolve(&url)
                .await?;
            println!("{}", resolved.document_url);
        }
        Commands::Extract {
            url,
            start,
            end,
            resolve,
            form,
            summarize,
            model,
        } => {
            if let Some(model) = model {
                config.summary.model = model;
            }
            let mut request = ExtractRequest::new(url).between(start, end);
            if resolve {
                request = request.resolving(form);
            }
            extract(&config, &request, summarize).await?;
        }
    }

    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

async fn list_filings(
    config: &Config,
    query: &FilingQuery,
    export: Option<ExportFormat>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = EdgarClient::with_user_agent(&config.user_agent)?;
    let fetcher = IndexFetcher::new(&client).with_archive_base(config.archive_base.as_str());

    let quarters: Vec<String> = query.quarters.iter().map(|q| format!("Q{q}")).collect();
    let pb = spinner(format!(
        "Fetching {} filings for {} {}...",
        query.form_type,
        query.year,
        quarters.join(", ")
    ));
    let report = match fetch_filings(&fetcher, query).await {
        Ok(report) => {
            pb.finish_with_message(format!("Found {} filings", report.records.len()));
            report
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    for (period, e) in &report.failures {
        eprintln!("Warning: {} skipped: {}", period, e);
    }

    if report.records.is_empty() {
        println!("No filings found for the selected criteria");
        return Ok(());
    }
    print!("{}", render_table(&report.records));

    if let Some(format) = export {
        let path = output.unwrap_or_else(|| {
            PathBuf::from(export_file_name(
                &query.form_type,
                query.year,
                &query.quarters,
                format,
            ))
        });
        report.records.export_to_file(&path, format)?;
        println!("\nSaved {} filings to {}", report.records.len(), path.display());
    }

    Ok(())
}

async fn extract(
    config: &Config,
    request: &ExtractRequest,
    summarize: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Fail on a missing API key before any archive traffic.
    let summarizer = if summarize {
        Some(ChatCompletionsClient::new(&config.summary)?)
    } else {
        None
    };

    let client = EdgarClient::with_user_agent(&config.user_agent)?;
    let extraction = extract_section(&client, request).await?;

    if extraction.section.used_fallback() {
        eprintln!("Warning: a marker was not found; the section runs to the document boundary");
    }
    println!("{}", extraction.text());

    if let Some(summarizer) = summarizer {
        let pb = spinner(format!("Summarizing with {}...", summarizer.model()));
        let summary = summarizer.summarize(&extraction.text()).await;
        pb.finish_and_clear();
        match summary? {
            Some(summary) => {
                println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
                println!("SUMMARY");
                println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
                println!("{}", summary);
            }
            None => eprintln!("Warning: summarization returned no content"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filings() {
        let cli = Cli::try_parse_from([
            "tenq", "filings", "--year", "2024", "-q", "1", "--quarter", "2", "--export", "csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Filings {
                year,
                quarters,
                form,
                export,
                output,
                ..
            } => {
                assert_eq!(year, 2024);
                assert_eq!(quarters, vec![1, 2]);
                assert_eq!(form, "10-Q");
                assert_eq!(export, Some(ExportFormat::Csv));
                assert!(output.is_none());
            }
            _ => panic!("expected filings"),
        }
    }

    #[rstest]
    #[case(&["tenq", "filings", "--year", "2024"])]
    #[case(&["tenq", "filings", "--year", "2024", "-q", "5"])]
    #[case(&["tenq", "filings", "--year", "2024", "-q", "1", "--output", "x.csv"])]
    #[case(&["tenq", "filings", "--year", "2024", "-q", "1", "--export", "xlsx"])]
    fn test_rejects_bad_filings_args(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "tenq",
            "--user-agent",
            "Jane Doe jane@example.com",
            "extract",
            "https://www.sec.gov/Archives/edgar/data/1/x-index.htm",
            "--start",
            "Item 2",
            "--end",
            "Item 3",
            "--resolve",
        ])
        .unwrap();
        assert_eq!(cli.user_agent.as_deref(), Some("Jane Doe jane@example.com"));
        match cli.command {
            Commands::Extract {
                start,
                end,
                resolve,
                summarize,
                ..
            } => {
                assert_eq!(start.as_deref(), Some("Item 2"));
                assert_eq!(end.as_deref(), Some("Item 3"));
                assert!(resolve);
                assert!(!summarize);
            }
            _ => panic!("expected extract"),
        }
    }
}
