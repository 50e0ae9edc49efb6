use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use draftdown::Config;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "draftdown")]
#[command(about = "Convert Draft.js raw content JSON to Markdown")]
struct Cli {
    /// Input JSON file, or `-` for stdin
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to draftdown.toml in the current directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render the Markdown to HTML instead
    #[arg(long)]
    html: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(Path::new("draftdown.toml")),
    };

    // Read input
    let json = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(&cli.input)
            .with_context(|| format!("Failed to read {}", cli.input.display()))?
    };

    let markdown = draftdown::json_to_markdown_with_config(&json, &config)?;
    let rendered = if cli.html {
        draftdown::markdown_to_html(&markdown)
    } else {
        markdown
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Created {}", path.display());
        }
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("Failed to write stdout")?,
    }

    Ok(())
}
