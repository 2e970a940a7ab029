//! Status command for showing stored editing time per document.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use et_core::{duration_from_seconds, format_elapsed};
use et_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, database_path: &Path) -> Result<()> {
    let documents = db.list_elapsed()?;

    writeln!(writer, "Editing timer status")?;
    writeln!(writer, "Database: {}", database_path.display())?;

    if documents.is_empty() {
        writeln!(writer, "No documents recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Documents:")?;
    for document in documents {
        writeln!(
            writer,
            "- {}: {} (updated {})",
            document.document,
            format_elapsed(duration_from_seconds(document.seconds)),
            document.updated_at
        )?;
    }

    Ok(())
}
