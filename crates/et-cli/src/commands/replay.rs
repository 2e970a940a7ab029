//! Replay command: applies a recorded host event log and persists totals.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use et_core::{IdlePrompt, TrackingPolicy, duration_from_seconds, format_elapsed};
use et_db::Database;

use crate::host::{ReplayHost, read_events};

pub fn run<W: Write, P: IdlePrompt>(
    writer: &mut W,
    db: &mut Database,
    log_path: &Path,
    policy: TrackingPolicy,
    prompt: P,
) -> Result<()> {
    let file = File::open(log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;
    let events = read_events(BufReader::new(file))
        .with_context(|| format!("failed to read {}", log_path.display()))?;
    tracing::debug!(count = events.len(), "loaded host events");

    let mut host = ReplayHost::new(db, policy, prompt);
    for (line, event) in &events {
        host.apply(*line, event)?;
    }

    writeln!(writer, "Replayed {} events.", events.len())?;
    if host.saved().is_empty() {
        writeln!(writer, "No documents saved.")?;
    } else {
        writeln!(writer, "Saved documents:")?;
        for (document, seconds) in host.saved() {
            writeln!(
                writer,
                "- {document}: {}",
                format_elapsed(duration_from_seconds(*seconds))
            )?;
        }
    }
    let open = host.open_documents();
    if open > 0 {
        writeln!(writer, "Documents left open: {open}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use et_core::IdleAnswer;
    use insta::assert_snapshot;

    #[test]
    fn replay_reports_saved_documents() {
        let temp = tempfile::tempdir().unwrap();
        let log_path = temp.path().join("events.jsonl");
        std::fs::write(
            &log_path,
            r#"{"at":"2025-01-01T09:00:00Z","event":"opened","document":"/docs/a.xlsx"}
{"at":"2025-01-01T09:00:00Z","event":"opened","document":"/docs/b.xlsx"}
{"at":"2025-01-01T09:05:09Z","event":"changed","document":"/docs/a.xlsx"}
{"at":"2025-01-01T09:05:09Z","event":"before_save","document":"/docs/a.xlsx"}
{"at":"2025-01-01T09:05:10Z","event":"after_save","document":"/docs/a.xlsx"}
{"at":"2025-01-01T09:06:00Z","event":"closing","document":"/docs/a.xlsx"}
"#,
        )
        .unwrap();

        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(
            &mut output,
            &mut db,
            &log_path,
            TrackingPolicy::default(),
            IdleAnswer::Include,
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Replayed 6 events.
        Saved documents:
        - /docs/a.xlsx: 5:09
        Documents left open: 1
        ");
        assert_eq!(db.elapsed_seconds("/docs/a.xlsx").unwrap(), Some(309.0));
    }

    #[test]
    fn missing_log_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let result = run(
            &mut output,
            &mut db,
            &temp.path().join("missing.jsonl"),
            TrackingPolicy::default(),
            IdleAnswer::Include,
        );
        assert!(result.is_err());
    }
}
