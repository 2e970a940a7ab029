//! Elapsed command: prints a document's stored editing time.

use std::io::Write;

use anyhow::Result;
use et_core::{duration_from_seconds, format_elapsed};
use et_db::Database;

/// Writes the stored total for `document` as `m:ss`, `0:00` if none.
pub fn run<W: Write>(writer: &mut W, db: &Database, document: &str) -> Result<()> {
    let seconds = db.elapsed_seconds(document)?.unwrap_or_default();
    writeln!(writer, "{}", format_elapsed(duration_from_seconds(seconds)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(db: &Database, document: &str) -> String {
        let mut out = Vec::new();
        run(&mut out, db, document).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_stored_total() {
        let mut db = Database::open_in_memory().unwrap();
        db.set_elapsed_seconds("/docs/a.xlsx", 309.4).unwrap();
        assert_eq!(output(&db, "/docs/a.xlsx"), "5:09\n");
    }

    #[test]
    fn unknown_document_prints_zero() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(output(&db, "/docs/missing.xlsx"), "0:00\n");
    }
}
