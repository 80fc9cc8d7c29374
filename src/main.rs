use clap::Parser as ClapParser;
use jove::render::paint;
use jove::{Options, Pipeline, PipelineError};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(name = "jove")]
#[command(about = "Jove - a JSON inspector: navigate, filter, and project JSON documents")]
#[command(version)]
struct Cli {
    /// JSON files to inspect (reads from stdin if none are given)
    files: Vec<PathBuf>,

    /// No pretty formatting
    #[arg(long = "no-pretty", action = clap::ArgAction::SetTrue)]
    no_pretty: bool,

    /// No color
    #[arg(long = "no-color", action = clap::ArgAction::SetTrue)]
    no_color: bool,

    /// Max length for rendered strings
    #[arg(short = 'm', long = "max-length", value_name = "n")]
    max_length: Option<usize>,

    /// Set dot notated root field
    #[arg(short = 'r', long = "root", value_name = "path")]
    root: Option<String>,

    /// Comma separated fields
    #[arg(short = 'f', long = "fields", value_name = "fields")]
    fields: Option<String>,

    /// Query data with expr (ala mongo)
    #[arg(short = 'q', long = "query", value_name = "expr")]
    query: Option<String>,

    /// Disable JSON output
    #[arg(long = "no-json", action = clap::ArgAction::SetTrue)]
    no_json: bool,

    /// Disable JSON output (alias for --no-json)
    #[arg(long = "js", action = clap::ArgAction::SetTrue)]
    js: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let options = Options {
        color: !cli.no_color,
        pretty: !cli.no_pretty,
        json: !(cli.no_json || cli.js),
        root: cli.root,
        fields: cli.fields,
        query: cli.query,
        max_length: cli.max_length,
        hide_functions: false,
    };
    let color = options.color;

    match run(options, &cli.files) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match &e {
                PipelineError::Parse(_) => "ERROR: Invalid JSON".to_string(),
                other => format!("ERROR: {}", other),
            };
            if color {
                eprintln!("{}", paint(&message, "31"));
            } else {
                eprintln!("{}", message);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(options: Options, files: &[PathBuf]) -> Result<(), PipelineError> {
    let mut pipeline = Pipeline::new(options)?;

    if !files.is_empty() {
        pipeline.for_files(files)
    } else if atty::is(atty::Stream::Stdin) {
        Err(PipelineError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no input provided: name a file or pipe JSON to stdin",
        )))
    } else {
        pipeline.from_reader(io::stdin())
    }
}
