//! CSV output for extracted place records.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::types::PlaceRecord;
use crate::SinkError;

/// Column order of the output table.
pub const CSV_HEADER: [&str; 3] = ["name", "website", "address"];

/// Writes `records` to `destination` as UTF-8 CSV, replacing any existing file.
///
/// The header row is always written, so an empty run still produces a valid
/// table. Missing fields are written as their sentinel defaults.
///
/// # Errors
///
/// Returns [`SinkError::Io`] if the file cannot be created or written.
pub fn write_records(destination: &Path, records: &[PlaceRecord]) -> Result<(), SinkError> {
    let io_err = |source: io::Error| SinkError::Io {
        path: destination.display().to_string(),
        source,
    };

    let file = File::create(destination).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_table(&mut writer, records).map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    tracing::info!(
        path = %destination.display(),
        rows = records.len(),
        "records written"
    );
    Ok(())
}

fn write_table<W: Write>(w: &mut W, records: &[PlaceRecord]) -> io::Result<()> {
    write_row(w, &CSV_HEADER)?;
    for record in records {
        write_row(w, &record.to_row())?;
    }
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}
