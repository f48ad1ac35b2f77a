//! Process logging: stdout always, plus an optional daily-rolled file.

use std::path::Path;

use tracing::{Level, Subscriber};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_log::LogTracer;
use tracing_subscriber::{
    fmt::time::ChronoUtc,
    layer::{Layered, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DEFAULT_LOG_TARGET: &str = "waste_classifier";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;
type FilteredRegistry = Layered<EnvFilter, Registry>;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub json_format: bool,
    pub log_dir: Option<String>,
    pub colorize: bool,
    pub log_file_name: String,
    pub log_targets: Option<Vec<String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_dir: None,
            colorize: true,
            log_file_name: "waste-classifier".to_string(),
            log_targets: Some(vec![DEFAULT_LOG_TARGET.to_string()]),
        }
    }
}

/// Keeps the non-blocking file writer alive; drop it last.
pub struct LogGuard {
    file_guard: Option<WorkerGuard>,
}

impl LogGuard {
    pub fn has_file_writer(&self) -> bool {
        self.file_guard.is_some()
    }
}

/// Parse a CLI log level, falling back to INFO for unknown strings.
pub fn parse_level(level: Option<&str>) -> Level {
    level
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// `target=level` directives joined with commas.
fn build_filter_string(targets: &[String], level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    targets
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// `RUST_LOG` when set, otherwise the configured targets at the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let targets = match &config.log_targets {
            Some(targets) if !targets.is_empty() => targets.clone(),
            _ => vec![DEFAULT_LOG_TARGET.to_string()],
        };
        EnvFilter::new(build_filter_string(&targets, config.level))
    })
}

fn stdout_layer<S>(config: &LoggingConfig) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(config.colorize)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::new(TIME_FORMAT.to_string()));

    if config.json_format {
        layer.json().flatten_event(true).boxed()
    } else {
        layer.boxed()
    }
}

/// Daily-rolled file layer under `log_dir`. Fails if the directory or file
/// cannot be created.
fn file_layer<S>(
    config: &LoggingConfig,
    log_dir: &Path,
) -> Result<(BoxedLayer<S>, WorkerGuard), String>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("cannot create log directory {}: {}", log_dir.display(), e))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.log_file_name.clone())
        .build(log_dir)
        .map_err(|e| format!("cannot open log file in {}: {}", log_dir.display(), e))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::new(TIME_FORMAT.to_string()))
        .with_writer(writer);

    let layer = if config.json_format {
        layer.json().flatten_event(true).boxed()
    } else {
        layer.boxed()
    };
    Ok((layer, guard))
}

/// Install the global subscriber. Stdout logging is always installed; a log
/// directory that cannot be used only disables the file layer.
pub fn init_logging(config: LoggingConfig) -> LogGuard {
    let _ = LogTracer::init();

    let mut layers: Vec<BoxedLayer<FilteredRegistry>> = vec![stdout_layer(&config)];
    let mut file_guard = None;
    let mut file_error = None;

    if let Some(log_dir) = config.log_dir.as_deref() {
        match file_layer(&config, Path::new(log_dir)) {
            Ok((layer, guard)) => {
                layers.push(layer);
                file_guard = Some(guard);
            }
            Err(e) => file_error = Some(e),
        }
    }

    let _ = tracing_subscriber::registry()
        .with(env_filter(&config))
        .with(layers)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!("File logging disabled, {}", e);
    }

    LogGuard { file_guard }
}
