//! Output layers built from appender configuration.

use logconf_types::config::{AppenderConfig, AppenderKind, LogFormat, Rotation};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::Layer;
use super::BoxedLayer;

/// A ready-to-install output layer.
pub(crate) struct BuiltAppender {
    pub layer: BoxedLayer,
    /// Keeps the background writer of file appenders alive
    pub guard: Option<WorkerGuard>,
}

/// Build the layer for an appender. `path` is the already-substituted file
/// path for file-backed kinds.
pub(crate) fn build(
    name: &str,
    config: &AppenderConfig,
    path: Option<&str>,
) -> Result<BuiltAppender, String> {
    match config.kind {
        AppenderKind::Stdout => Ok(BuiltAppender {
            layer: formatted(config, std::io::stdout),
            guard: None,
        }),
        AppenderKind::Stderr => Ok(BuiltAppender {
            layer: formatted(config, std::io::stderr),
            guard: None,
        }),
        AppenderKind::File | AppenderKind::Rolling => {
            let path = path.ok_or_else(|| {
                format!("Appender [{}] of kind {:?} requires a path", name, config.kind)
            })?;
            let rotation = match config.kind {
                AppenderKind::File => Rotation::Never,
                _ => config.rotation,
            };
            let appender = file_appender(Path::new(path), rotation)
                .map_err(|e| format!("Appender [{}] cannot open {}: {}", name, path, e))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            Ok(BuiltAppender {
                layer: formatted(config, writer),
                guard: Some(guard),
            })
        }
    }
}

fn file_appender(path: &Path, rotation: Rotation) -> Result<RollingFileAppender, String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| "path has no file name".to_string())?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory).map_err(|e| e.to_string())?;

    let rotation = match rotation {
        Rotation::Minutely => rolling::Rotation::MINUTELY,
        Rotation::Hourly => rolling::Rotation::HOURLY,
        Rotation::Daily => rolling::Rotation::DAILY,
        Rotation::Never => rolling::Rotation::NEVER,
    };

    RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| e.to_string())
}

fn formatted<W>(config: &AppenderConfig, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(config.ansi)
        .with_target(config.target)
        .with_file(config.caller)
        .with_line_number(config.caller)
        .with_thread_names(config.thread_names);

    match config.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: AppenderKind) -> AppenderConfig {
        serde_yaml::from_str(&format!("kind: {}", serde_yaml::to_string(&kind).unwrap())).unwrap()
    }

    #[test]
    fn test_console_appenders_have_no_guard() {
        let built = build("console", &config(AppenderKind::Stderr), None).unwrap();
        assert!(built.guard.is_none());
    }

    #[test]
    fn test_file_appender_requires_path() {
        let err = build("file", &config(AppenderKind::File), None).err().unwrap();
        assert!(err.contains("requires a path"));
    }

    #[test]
    fn test_file_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/app.log");
        let built = build("file", &config(AppenderKind::File), path.to_str()).unwrap();
        assert!(built.guard.is_some());
        assert!(dir.path().join("nested/logs").is_dir());
    }
}
