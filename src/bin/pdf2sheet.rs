use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use pdf_table_merge::{
    BatchError, BatchOptions, BatchReport, ExtractOptions, FailurePolicy, HeaderPolicy,
    PageSelection, process_directory,
};
use tracing_subscriber::EnvFilter;

const INPUT_PROMPT: &str = "Enter the path to the folder containing your PDF files: ";
const OUTPUT_PROMPT: &str = "Enter the full path for the output file (Excel or CSV): ";

#[derive(Debug, Parser)]
#[command(
    name = "pdf2sheet",
    version,
    about = "Combine the tables of every PDF in a folder into one CSV or Excel file"
)]
struct Cli {
    /// Folder containing the PDF files. Prompted for when omitted.
    input_dir: Option<PathBuf>,

    /// Output file ending in .csv or .xlsx. Prompted for when omitted.
    output: Option<PathBuf>,

    /// Page selection applied to every PDF, like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// Rename blank and repeated header labels instead of keeping them as-is.
    #[arg(long)]
    dedupe_headers: bool,

    /// What to do with a PDF that cannot be read: skip or abort.
    #[arg(long, default_value = "skip", value_parser = FailurePolicy::from_str)]
    on_error: FailurePolicy,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<PathBuf> {
    print!("{message}");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read answer from stdin")?;
    Ok(PathBuf::from(line.trim()))
}

fn parse_options(cli: &Cli) -> Result<BatchOptions> {
    let pages = cli
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!(BatchError::InvalidPageSelection(error)))
        .context("failed to parse --pages")?;

    if cli.min_cols < 2 {
        anyhow::bail!(BatchError::InvalidOption(
            "--min-cols must be at least 2".to_string()
        ));
    }

    Ok(BatchOptions {
        extract: ExtractOptions {
            pages,
            min_cols: cli.min_cols,
        },
        header_policy: if cli.dedupe_headers {
            HeaderPolicy::Dedupe
        } else {
            HeaderPolicy::Verbatim
        },
        on_error: cli.on_error,
    })
}

fn user_message(error: &BatchError) -> String {
    match error {
        BatchError::InvalidInputDirectory { .. } => {
            "The directory you entered does not exist. Please try again.".to_string()
        }
        BatchError::InvalidOutputExtension { .. } => {
            "The output file must end with .xlsx or .csv. Please try again.".to_string()
        }
        BatchError::NoDataExtracted { directory } => format!(
            "No tables were found in the PDF files in {}. Nothing was saved.",
            directory.display()
        ),
        other => format!("error: {other}"),
    }
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    error
        .downcast_ref::<BatchError>()
        .map_or(ExitCode::FAILURE, |error| ExitCode::from(error.exit_code()))
}

fn print_report(report: &BatchReport, output: &Path, json: bool) -> Result<()> {
    for skipped in &report.skipped {
        eprintln!("warning: skipped {}: {}", skipped.file, skipped.reason);
    }
    println!("All done! Your data is saved in {}", output.display());
    if json {
        let summary = serde_json::to_string_pretty(report).context("failed to encode summary")?;
        println!("{summary}");
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(PathBuf, BatchReport)> {
    let options = parse_options(cli)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let input_dir = match &cli.input_dir {
        Some(path) => path.clone(),
        None => prompt(&mut input, INPUT_PROMPT)?,
    };
    let output = match &cli.output {
        Some(path) => path.clone(),
        None => prompt(&mut input, OUTPUT_PROMPT)?,
    };

    let report = process_directory(&input_dir, &output, &options)?;
    Ok((output, report))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "pdf_table_merge=debug"
    } else {
        "pdf_table_merge=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .without_time()
        .init();

    match run(&cli) {
        Ok((output, report)) => match print_report(&report, &output, cli.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::FAILURE
            }
        },
        Err(error) => {
            match error.downcast_ref::<BatchError>() {
                Some(batch_error) if error.chain().count() == 1 => {
                    eprintln!("{}", user_message(batch_error));
                }
                _ => eprintln!("error: {error:#}"),
            }
            exit_code_for(&error)
        }
    }
}
