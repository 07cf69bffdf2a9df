//! Implementation of the `clairscan history` command.

use crate::cli::HistoryArgs;
use crate::context::ScanContext;
use crate::error::Result;
use crate::events::{Event, read_events};

pub fn cmd_history(ctx: &ScanContext, args: HistoryArgs) -> Result<()> {
    let events = read_events(ctx)?;
    if events.is_empty() {
        println!("No history recorded.");
        return Ok(());
    }

    let skip = if args.tail == 0 {
        0
    } else {
        events.len().saturating_sub(args.tail)
    };
    for event in &events[skip..] {
        println!("{}", format_event(event));
    }
    Ok(())
}

/// One line per event: time, action, actor, optional image, details.
pub(crate) fn format_event(event: &Event) -> String {
    let mut line = format!(
        "{}  {:<14} {}",
        event.ts.format("%Y-%m-%d %H:%M:%S"),
        event.action.to_string(),
        event.actor
    );
    if let Some(image) = &event.image {
        line.push_str(&format!("  {}", image));
    }
    if event.details.as_object().is_some_and(|d| !d.is_empty()) {
        line.push_str(&format!("  {}", event.details));
    }
    line
}
