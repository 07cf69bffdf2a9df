//! Scan history log.
//!
//! Service starts, binary fetches, health checks and scan steps are appended
//! to `.clairscan/events.ndjson` inside the working directory, one JSON
//! object per line:
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`service_create`, `fetch`, `scan`, ...)
//! - `actor`: the owner string (`user@HOST`)
//! - `image`: optional image the action applied to
//! - `details`: freeform object with action-specific details

use crate::context::ScanContext;
use crate::error::{Result, ScanError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

/// Actions that can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Service container created from its image
    ServiceCreate,
    /// Stopped service container started again
    ServiceResume,
    /// Scanner binary downloaded
    Fetch,
    /// Scanner health check passed
    Health,
    /// Image pushed to the engine
    Push,
    /// Image analysis requested
    Analyze,
    /// HTML report generated
    Report,
    /// JSON scan finished
    Scan,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::ServiceCreate => write!(f, "service_create"),
            EventAction::ServiceResume => write!(f, "service_resume"),
            EventAction::Fetch => write!(f, "fetch"),
            EventAction::Health => write!(f, "health"),
            EventAction::Push => write!(f, "push"),
            EventAction::Analyze => write!(f, "analyze"),
            EventAction::Report => write!(f, "report"),
            EventAction::Scan => write!(f, "scan"),
        }
    }
}

/// A history record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Image the action applied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Freeform details object with action-specific information.
    #[serde(default)]
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            image: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ScanError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the history log, creating it if needed.
pub fn append_event(ctx: &ScanContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_path();
    let json_line = event.to_ndjson_line()?;

    fs::create_dir_all(&ctx.state_dir).map_err(|e| {
        ScanError::UserError(format!(
            "failed to create state directory '{}': {}",
            ctx.state_dir.display(),
            e
        ))
    })?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            ScanError::UserError(format!(
                "failed to open history file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        ScanError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    tracing::debug!(action = %event.action, "recorded event");
    Ok(())
}

/// Append an event, logging a warning instead of failing.
///
/// History is a side record; an unwritable log never aborts the operation
/// it describes.
pub fn record_event(ctx: &ScanContext, event: &Event) {
    if let Err(e) = append_event(ctx, event) {
        tracing::warn!(action = %event.action, error = %e, "could not record history event");
    }
}

/// Read all recorded events, oldest first.
///
/// A missing log is empty. Lines that do not parse are skipped with a warning.
pub fn read_events(ctx: &ScanContext) -> Result<Vec<Event>> {
    let events_file = ctx.events_path();
    let content = match fs::read_to_string(&events_file) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(ScanError::UserError(format!(
                "failed to read history file '{}': {}",
                events_file.display(),
                e
            )));
        }
    };

    let mut events = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(line) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!(line = lineno + 1, error = %e, "skipping unreadable event"),
        }
    }
    Ok(events)
}
