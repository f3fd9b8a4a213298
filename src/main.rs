use facereg::camera;
use facereg::common::Config;
use facereg::core::{enroll, recognize, train};
use facereg::storage::PersonRecord;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "facereg")]
#[command(about = "Face enrollment and recognition demo")]
struct Cli {
    /// Path to a TOML config file (defaults to ./facereg.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run without preview windows
    #[arg(long, global = true)]
    headless: bool,

    /// Verbose (debug) logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a person and capture face samples from the camera
    Enroll {
        /// Person identifier (prompted for when omitted)
        #[arg(short, long)]
        id: Option<i32>,
        /// Person name (prompted for when omitted)
        #[arg(short, long)]
        name: Option<String>,
        /// Person age (prompted for when omitted)
        #[arg(short, long)]
        age: Option<u32>,
    },
    /// Train the recognition model from captured samples
    Train,
    /// Recognize faces live and overlay the matched person
    Recognize,
    /// Capture a single frame to check the camera works
    TestCamera,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Enroll { id, name, age } => {
            let person = PersonRecord {
                id: match id {
                    Some(id) => id,
                    None => prompt_parsed("Enter user id: ")?,
                },
                name: match name {
                    Some(name) => name,
                    None => prompt("Enter user name: ")?,
                },
                age: match age {
                    Some(age) => age,
                    None => prompt_parsed("Enter user age: ")?,
                },
            };
            enroll::run(&config, &person, cli.headless)?;
        }
        Commands::Train => {
            train::run(&config)?;
        }
        Commands::Recognize => {
            recognize::run(&config, cli.headless)?;
        }
        Commands::TestCamera => {
            let path = PathBuf::from("capture.jpg");
            camera::capture::capture_test_frame(&config, &path)?;
            println!("Saved test frame to {}", path.display());
        }
    }

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_parsed<T>(message: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let line = prompt(message)?;
    line.parse()
        .map_err(|e| anyhow::anyhow!("Invalid input {:?}: {}", line, e))
}

fn setup_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }
}
