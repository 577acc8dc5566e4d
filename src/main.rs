use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

use linked_text::reader::{AsyncInputReader, ReaderConfig};
use linked_text::{
    dispatch, Action, AnsiRenderer, DataDetector, DetectionRules, GridLayout, JsonRenderer, LinkedText,
    LoggingHandler, OverlapPolicy, PlainRenderer, Point, Renderer, CharPos, DEFAULT_DIAL_PREFIX,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Plain,
    Ansi,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OverlapArg {
    Reject,
    FirstWins,
}

impl From<OverlapArg> for OverlapPolicy {
    fn from(arg: OverlapArg) -> Self {
        match arg {
            OverlapArg::Reject => OverlapPolicy::Reject,
            OverlapArg::FirstWins => OverlapPolicy::FirstWins,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "linked-text")]
#[command(about = "Highlight links and phone numbers in text and resolve taps on them")]
#[command(version)]
struct Args {
    /// Text files to annotate; reads stdin when none are given
    files: Vec<PathBuf>,

    /// Output format for the annotated segments
    #[arg(long, value_enum, default_value_t = OutputFormat::Ansi)]
    format: OutputFormat,

    /// Emit OSC 8 hyperlinks in ansi output
    #[arg(long)]
    hyperlinks: bool,

    /// How overlapping link and phone matches are handled
    #[arg(long, value_enum, default_value_t = OverlapArg::Reject)]
    overlap: OverlapArg,

    /// JSON file with detection rules; missing fields keep their defaults
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Resolve a tap at this character offset
    #[arg(long)]
    tap_offset: Option<usize>,

    /// Resolve a tap at this X,Y point in grid coordinates
    #[arg(long, conflicts_with = "tap_offset")]
    tap_point: Option<Point>,

    /// Wrap lines at this many columns when resolving tap points
    #[arg(long)]
    wrap_width: Option<usize>,

    /// Width of one character cell
    #[arg(long, default_value_t = 1.0)]
    cell_width: f64,

    /// Height of one line
    #[arg(long, default_value_t = 1.0)]
    line_height: f64,

    /// Prefix turning a phone number into a dial URL
    #[arg(long, default_value = DEFAULT_DIAL_PREFIX)]
    dial_prefix: String,

    /// Abort on first unreadable input
    #[arg(long)]
    fail_fast: bool,

    /// Reject inputs larger than this many bytes
    #[arg(long)]
    max_bytes: Option<u64>,

    /// Log verbosity (logs go to stderr as JSON)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: stdout carries the rendered text, so structured logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(tracing::Level::from(args.log_level))
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    let rules = match &args.rules {
        Some(path) => DetectionRules::from_json_file(path)?,
        None => DetectionRules::default(),
    };
    let detector = DataDetector::new(rules)?;

    let reader = AsyncInputReader::new(ReaderConfig {
        fail_fast: args.fail_fast,
        max_bytes: args.max_bytes,
        ..ReaderConfig::default()
    });

    let inputs = if args.files.is_empty() {
        vec![reader.read_stdin().await?]
    } else {
        reader.read_files_batch(&args.files).await?
    };

    let renderer: Box<dyn Renderer> = match args.format {
        OutputFormat::Plain => Box::new(PlainRenderer),
        OutputFormat::Ansi => Box::new(AnsiRenderer::new(args.hyperlinks, args.dial_prefix.clone())),
        OutputFormat::Json => Box::new(JsonRenderer { pretty: false }),
    };
    let layout = GridLayout::new(args.cell_width, args.line_height, args.wrap_width);

    let multiple = inputs.len() > 1;
    let mut annotated = 0usize;
    let mut failed = 0usize;

    for (text, stats) in inputs {
        if let Some(ref error) = stats.read_error {
            warn!("Skipping {}: {}", stats.source, error);
            failed += 1;
            continue;
        }

        if let Some(header) = input_header(&stats.source, args.format, multiple) {
            println!("{header}");
        }

        let linked = LinkedText::new(text, &detector)
            .with_overlap_policy(args.overlap.into())
            .with_dial_prefix(args.dial_prefix.clone());

        // The CLI reports malformed match sets instead of silently rendering plain text
        let segments = linked
            .try_segments()
            .with_context(|| format!("Failed to build segments for {}", stats.source))?;

        let rendered = renderer.render(&segments)?;
        if rendered.ends_with('\n') {
            print!("{rendered}");
        } else {
            println!("{rendered}");
        }

        let action = match (args.tap_offset, args.tap_point) {
            (Some(offset), _) => Some(linked.action_at_offset(CharPos::new(offset))),
            (None, Some(point)) => Some(linked.action_at_point(&layout, point)),
            (None, None) => None,
        };

        if let Some(action) = action {
            report_tap(action.as_ref(), args.format)?;
            if let Some(action) = action {
                dispatch(&action, &mut LoggingHandler);
            }
        }

        annotated += 1;
    }

    info!("Annotated {} inputs, {} unreadable", annotated, failed);

    if failed > 0 {
        anyhow::bail!("{} input(s) could not be read", failed);
    }
    Ok(())
}

/// Separator line between inputs; json output stays one JSON value per line
fn input_header(source: &str, format: OutputFormat, multiple: bool) -> Option<String> {
    match format {
        OutputFormat::Json => None,
        _ if multiple => Some(format!("==> {source} <==")),
        _ => None,
    }
}

fn report_tap(action: Option<&Action>, format: OutputFormat) -> Result<()> {
    match (action, format) {
        (Some(action), OutputFormat::Json) => println!("{}", serde_json::to_string(action)?),
        (None, OutputFormat::Json) => println!("null"),
        (Some(Action::OpenLink { url }), _) => println!("open {url}"),
        (Some(Action::Dial { url }), _) => println!("dial {url}"),
        (None, _) => println!("no match"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_only_for_multiple_text_inputs() {
        assert_eq!(input_header("a.txt", OutputFormat::Plain, true).as_deref(), Some("==> a.txt <=="));
        assert_eq!(input_header("a.txt", OutputFormat::Ansi, true).as_deref(), Some("==> a.txt <=="));
        assert_eq!(input_header("a.txt", OutputFormat::Plain, false), None);
    }

    #[test]
    fn test_json_output_has_no_headers() {
        assert_eq!(input_header("a.txt", OutputFormat::Json, true), None);
    }
}
