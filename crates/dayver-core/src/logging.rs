//! Console logging setup and event capture.
//!
//! [`init`] installs the `tracing` subscriber used by the CLI. Diagnostics go
//! to stderr so the version printed on stdout stays machine-readable.
//! [`EventCapture`] records events in memory so callers can check which
//! diagnostics a run surfaced.

use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::{EnvFilter, Layer};

/// Console logging options.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSettings {
    /// Only errors are printed.
    pub silent: bool,
    /// Extra verbosity (`-v` count).
    pub verbose: u8,
}

impl LogSettings {
    /// The default filter directive for these settings.
    pub fn filter_directive(&self) -> &'static str {
        if self.silent {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global console subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity level, except in silent
/// mode which always limits output to errors. Later calls are ignored.
pub fn init(settings: LogSettings) {
    let directive = settings.filter_directive();
    let filter = if settings.silent {
        EnvFilter::new(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// A single captured event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// The formatted message.
    pub message: String,
}

/// A `tracing` layer that records every event it sees.
#[derive(Debug, Clone, Default)]
pub struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured events.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Captured events at exactly `level`.
    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    /// Whether any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.at_level(Level::WARN).is_empty()
    }
}

impl<S: Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if let Ok(mut events) = self.events.lock() {
            events.push(CapturedEvent {
                level: *event.metadata().level(),
                message: visitor.message,
            });
        }
    }
}

/// Visitor that extracts the `message` field from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    #[test]
    fn test_filter_directive() {
        assert_eq!(LogSettings::default().filter_directive(), "info");
        let verbose = LogSettings {
            silent: false,
            verbose: 1,
        };
        assert_eq!(verbose.filter_directive(), "debug");
        let very = LogSettings {
            silent: false,
            verbose: 3,
        };
        assert_eq!(very.filter_directive(), "trace");
        let silent = LogSettings {
            silent: true,
            verbose: 2,
        };
        assert_eq!(silent.filter_directive(), "error");
    }

    #[test]
    fn test_capture_records_levels() {
        let capture = EventCapture::new();
        let _guard = tracing_subscriber::registry()
            .with(capture.clone())
            .set_default();

        tracing::info!("hello from test");
        tracing::warn!("a warning");

        let events = capture.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, Level::INFO);
        assert_eq!(events[1].message, "a warning");
        assert!(capture.has_warnings());
    }

    #[test]
    fn test_empty_capture() {
        let capture = EventCapture::new();
        assert!(capture.events().is_empty());
        assert!(!capture.has_warnings());
    }
}
