// src/signal.rs
//! Signal types in the host applet protocol shape, plus the sink seam the
//! polling loop hands finished signals to.

use anyhow::{Context, Result};
use serde::Serialize;

pub const SIGNAL_NAME: &str = "Teamwork";
pub const LINK_LABEL: &str = "Show in Teamwork";

/// One render point on the notification surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Point {
    pub color: String,
    pub effect: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub label: String,
}

/// One event per cycle, emitted or discarded as a whole. The error variant
/// carries human-readable detail strings instead of a render payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Signal {
    Notify {
        name: String,
        /// Message lines joined with `<br>`.
        message: String,
        points: Vec<Vec<Point>>,
        link: Link,
    },
    Error {
        name: String,
        errors: Vec<String>,
    },
}

impl Signal {
    pub fn notify(message: String, point: Point, link: Link) -> Self {
        Signal::Notify {
            name: SIGNAL_NAME.to_string(),
            message,
            points: vec![vec![point]],
            link,
        }
    }

    pub fn error(errors: Vec<String>) -> Self {
        Signal::Error {
            name: SIGNAL_NAME.to_string(),
            errors,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Signal::Error { .. })
    }

    pub fn link(&self) -> Option<&Link> {
        match self {
            Signal::Notify { link, .. } => Some(link),
            Signal::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Signal::Notify { message, .. } => Some(message),
            Signal::Error { .. } => None,
        }
    }
}

#[async_trait::async_trait]
pub trait SignalSink: Send + Sync {
    async fn send(&self, signal: &Signal) -> Result<()>;
}

/// Writes one JSON-encoded signal per line to stdout, where the applet host
/// picks it up.
pub struct StdoutSink;

#[async_trait::async_trait]
impl SignalSink for StdoutSink {
    async fn send(&self, signal: &Signal) -> Result<()> {
        let line = serde_json::to_string(signal).context("encode signal")?;
        println!("{line}");
        Ok(())
    }
}

/// Tracing-only sink for headless runs and demos.
pub struct LogSink;

#[async_trait::async_trait]
impl SignalSink for LogSink {
    async fn send(&self, signal: &Signal) -> Result<()> {
        match signal {
            Signal::Notify { message, link, .. } => {
                tracing::info!(message = %message, url = %link.url, "signal");
            }
            Signal::Error { errors, .. } => {
                tracing::error!(detail = %errors.join(" | "), "error signal");
            }
        }
        Ok(())
    }
}
