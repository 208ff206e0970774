//! CLI entry point for the subway arrivals tool.
//!
//! Provides subcommands for inspecting a realtime feed and for listing the
//! upcoming arrivals of one route, stop by stop.

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use subway_arrivals::config::parse_timezone;
use subway_arrivals::output::{
    FeedSummary, parse_time_format, print_pretty, print_summary, route_stop_lines, to_json,
};
use subway_arrivals::routes::canonical_route_id;
use subway_arrivals::{Config, Feed, FeedSelector, Timestamp};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "subway_arrivals")]
#[command(about = "Upcoming subway arrivals from GTFS-RT trip updates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a feed and summarize it
    Feed {
        /// Route id, legacy feed id, URL, or path to a .pb file
        #[arg(value_name = "SELECTOR_OR_FILE")]
        source: String,

        /// Print the decoded feed as JSON instead of a summary
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Timezone for displayed times (defaults to SUBWAY_TIMEZONE)
        #[arg(short, long)]
        timezone: Option<String>,
    },
    /// List upcoming arrivals for every stop of a route
    Stops {
        /// Route id, e.g. `Q` or `5X`
        #[arg(value_name = "ROUTE")]
        route: String,

        /// Read the feed from a file or URL instead of the route's feed
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// strftime format for arrival times
        #[arg(short, long, default_value = "%H:%M")]
        format: String,

        /// Maximum number of times per stop
        #[arg(short, long, default_value_t = 10)]
        num_times: usize,

        /// Timezone for displayed times (defaults to SUBWAY_TIMEZONE)
        #[arg(short, long)]
        timezone: Option<String>,

        /// Include arrivals that are already in the past
        #[arg(long, default_value_t = false)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/subway_arrivals.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("subway_arrivals.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Feed {
            source,
            json,
            timezone,
        } => {
            let tz = resolve_timezone(timezone.as_deref(), &config)?;
            let feed = load_feed(&source, &config).await?;
            print_pretty(&feed.header);

            if json {
                println!("{}", to_json(&feed)?);
            } else {
                print_summary(&FeedSummary::from_feed(&feed, tz));
            }
        }
        Commands::Stops {
            route,
            source,
            format,
            num_times,
            timezone,
            all,
        } => {
            let tz = resolve_timezone(timezone.as_deref(), &config)?;
            parse_time_format(&format)?;
            let route_upper = route.to_ascii_uppercase();
            let route_id = canonical_route_id(&route_upper);
            let feed = load_feed(source.as_deref().unwrap_or(route_id), &config).await?;
            let index = feed.extract();

            let after = if all {
                None
            } else {
                Some(Timestamp::from(Utc::now()))
            };
            let lines = route_stop_lines(&index, route_id, tz, &format, num_times, after)?;
            if lines.is_empty() {
                warn!(route = route_id, "No upcoming arrivals for route");
            }
            for line in lines {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn resolve_timezone(flag: Option<&str>, config: &Config) -> Result<Tz> {
    Ok(match flag {
        Some(name) => parse_timezone(name)?,
        None => config.timezone,
    })
}

/// Whether `source` names a local file rather than a selector or URL.
///
/// Route ids and feed ids never carry an extension or a directory, so a file
/// that happens to be called `7` does not shadow the 7 train.
fn looks_like_path(source: &str) -> bool {
    if source.starts_with("http://") || source.starts_with("https://") {
        return false;
    }
    let path = Path::new(source);
    path.extension().is_some() || path.components().count() > 1
}

/// Loads feed data from a local file path, or fetches it by selector or URL.
#[tracing::instrument(skip(config))]
async fn load_feed(source: &str, config: &Config) -> Result<Feed> {
    let path = Path::new(source);
    let feed = if looks_like_path(source) {
        debug!("Reading feed from file");
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read {source}"))?;
        Feed::from_bytes(&bytes)?
    } else {
        let selector: FeedSelector = source.parse()?;
        let client = config.http_client()?;
        Feed::get(&*client, &selector, config).await?
    };

    info!(
        entity_count = feed.entities.len(),
        feed_time = %feed.header.timestamp.in_timezone(config.timezone),
        "Feed loaded"
    );
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_are_not_paths() {
        for source in ["7", "Q", "5X", "16", "https://example.com/feed.pb", "http://localhost/gtfs"] {
            assert!(!looks_like_path(source), "{source}");
        }
    }

    #[test]
    fn test_paths_are_recognized() {
        for source in ["sample.pb", "feeds/ace", "./7", "/tmp/feed.bin"] {
            assert!(looks_like_path(source), "{source}");
        }
    }
}
