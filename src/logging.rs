//! Logging setup.
//!
//! Console output goes through a standard fmt layer. The reorganization log
//! sink is a separate append-only file layer writing one line per event,
//! `[timestamp] [LEVEL] message`, gated by the level names enabled in the
//! settings rather than by a maximum level.

use crate::Result;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Append-only file sink layer.
pub struct FileLogLayer {
    file: Mutex<std::fs::File>,
    enabled_levels: HashSet<String>,
}

impl FileLogLayer {
    /// Open (or create) the log file in append mode.
    ///
    /// The file is restricted to owner/group read-write on Unix. An empty
    /// level set disables the sink entirely.
    pub fn new(path: &Path, enabled_levels: &[String]) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut permissions = file.metadata()?.permissions();
            permissions.set_mode(0o660);
            std::fs::set_permissions(path, permissions)?;
        }

        Ok(Self {
            file: Mutex::new(file),
            enabled_levels: enabled_levels
                .iter()
                .map(|level| level.to_lowercase())
                .collect(),
        })
    }
}

impl<S: Subscriber> Layer<S> for FileLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = event.metadata().level().as_str().to_lowercase();
        if !self.enabled_levels.contains(&level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = format!(
            "[{}] [{}] {}\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
            level.to_uppercase(),
            visitor.rendered()
        );

        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

/// Collects an event's message field plus any extra fields.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    extra: Vec<String>,
}

impl MessageVisitor {
    fn rendered(&self) -> String {
        if self.extra.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, self.extra.join(", "))
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.extra.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.extra.push(format!("{}={}", field.name(), value));
        }
    }
}

/// Initialize the logging system.
pub fn init(verbose: bool, file_layer: Option<FileLogLayer>) {
    let filter = if verbose {
        EnvFilter::new("uploads_organizer=debug")
    } else {
        EnvFilter::new("uploads_organizer=info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_filter(filter),
        )
        .with(file_layer)
        .init();
}
