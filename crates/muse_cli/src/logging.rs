use anyhow::{Context, Result};
use muse_core::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str =
    "warn,muse_cli=info,muse_core=info,muse_memory=info,muse_reasoning=info,muse_voice=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber: stderr (filtered by `RUST_LOG`) plus an
/// optional daily-rotated file under `config.dir`.
///
/// Keep the returned guard alive for the program lifetime or buffered file
/// logs are lost.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_filter = env_filter();
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);
    layers.push(if config.json {
        console.json().with_filter(console_filter).boxed()
    } else {
        console.with_filter(console_filter).boxed()
    });

    let mut guard = None;
    if let Some(dir) = &config.dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let (writer, file_guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "muse.log"));
        guard = Some(file_guard);

        let file = fmt::layer().with_writer(writer).with_ansi(false);
        let file_filter = env_filter();
        layers.push(if config.json {
            file.json().with_filter(file_filter).boxed()
        } else {
            file.with_filter(file_filter).boxed()
        });
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(guard)
}
