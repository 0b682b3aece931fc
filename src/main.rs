use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use rss_reader::config::Config;
use rss_reader::feed::{build_client, fetch_feed, parse_feed_bytes};
use rss_reader::format::{render, FormatError, OutputMode};

#[derive(Parser, Debug)]
#[command(
    name = "rss_reader",
    version,
    about = "Command-line RSS reader printing feeds as plain text or JSON"
)]
struct Args {
    /// RSS feed URL (falls back to `default_source` from the config file)
    source: Option<String>,

    /// Print result as JSON (overrides --format and the config file)
    #[arg(long)]
    json: bool,

    /// Output format: "standard" or "json"
    #[arg(long, value_name = "MODE")]
    format: Option<String>,

    /// Limit the number of printed items
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Config file (default: ~/.config/rss-reader/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// `--json` beats `--format`, which beats the config file.
fn resolve_mode(args: &Args, config: &Config) -> Result<OutputMode, FormatError> {
    if args.json {
        return Ok(OutputMode::Json);
    }
    match &args.format {
        Some(selector) => selector.parse(),
        None => config.output_mode(),
    }
}

fn load_config(args: &Args) -> Result<Config> {
    match args.config.as_ref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display())),
        None => match Config::default_path() {
            Some(path) => Config::load(&path)
                .with_context(|| format!("Failed to load config file: {}", path.display())),
            None => Ok(Config::default()),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the rendered feed
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let mode = resolve_mode(&args, &config).context("Invalid output format")?;

    let mut render_options = config.render_options();
    if args.limit.is_some() {
        render_options.limit = args.limit;
    }
    if args.compact {
        render_options.pretty = false;
    }

    let source = args
        .source
        .clone()
        .or_else(|| config.default_source.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No feed URL given. Pass one as an argument or set default_source in the config file")
        })?;

    let client = build_client(&config.user_agent).context("Failed to build HTTP client")?;
    let bytes = fetch_feed(&client, &source, &config.fetch_options())
        .await
        .with_context(|| format!("Failed to fetch feed: {}", source))?;

    let feed = parse_feed_bytes(&bytes).with_context(|| format!("Failed to parse feed: {}", source))?;
    tracing::info!(
        url = %source,
        items = feed.items.len(),
        mode = %mode,
        "Rendering feed"
    );

    let output = render(&feed, mode, &render_options).context("Failed to render feed")?;
    write_output(&mut std::io::stdout().lock(), &output).context("Failed to write output")?;
    Ok(())
}

/// Writes the rendered feed. A reader that closed the pipe early (`| head`)
/// is not an error.
fn write_output<W: Write>(out: &mut W, output: &str) -> std::io::Result<()> {
    match writeln!(out, "{}", output).and_then(|()| out.flush()) {
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!("Output pipe closed early");
            Ok(())
        }
        result => result,
    }
}
