//! xcmp: semantic XML comparison from the command line.
//!
//! Prints one line per difference found between two documents. Exits with 0
//! when they are equivalent, 1 when differences were found and 2 on errors.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xml_cmp::{CompareOptions, XmlComparator, DEFAULT_MAX_VERTICES};

/// Compare two XML documents semantically
#[derive(Parser)]
#[command(name = "xcmp")]
#[command(version)]
#[command(
    about = "Report structural and textual differences between two XML documents",
    long_about = None
)]
struct Cli {
    /// First document
    first: PathBuf,
    /// Second document
    second: PathBuf,

    /// Stop at the first difference
    #[arg(short = 's', long)]
    stop_on_first: bool,

    /// Drop differences whose message matches this regular expression
    /// (repeatable)
    #[arg(short = 'i', long = "ignore", value_name = "REGEX")]
    ignore: Vec<String>,

    /// Cap on edit graph vertices explored per alignment
    #[arg(long, default_value_t = DEFAULT_MAX_VERTICES)]
    max_vertices: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xcmp=warn,xml_cmp=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Compares the two documents and prints the differences. Returns whether
/// they are equivalent.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let options = CompareOptions::default()
        .with_stop_on_first(cli.stop_on_first)
        .with_ignore_patterns(cli.ignore.iter().cloned())
        .with_max_vertices(cli.max_vertices);

    tracing::debug!(
        first = %cli.first.display(),
        second = %cli.second.display(),
        "comparing files"
    );

    let recorder = XmlComparator::new(options).compare_files(&cli.first, &cli.second)?;
    for message in recorder.messages() {
        println!("{}", message);
    }

    Ok(recorder.is_empty())
}
