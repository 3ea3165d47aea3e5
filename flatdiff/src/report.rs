//! CSV difference reports.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::diff::DifferenceRecord;
use crate::error::Result;

const RECORD_HEADER: [&str; 4] = ["attribute", "difference type", "left value", "right value"];
const PAIR_HEADER: [&str; 2] = ["left document", "right document"];

/// Column layout of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLayout {
    /// Pair identifiers in two leading columns.
    #[default]
    Columns,
    /// Four columns; the identifier reads `left vs right::attribute`.
    Prefixed,
    /// Four columns without pair context.
    Plain,
}

/// A difference together with the pair it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDifference {
    /// Left document identifier.
    pub left_id: String,
    /// Right document identifier.
    pub right_id: String,
    /// The difference.
    pub record: DifferenceRecord,
}

/// Writes difference rows as CSV.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
    layout: ReportLayout,
    rows: usize,
}

impl<W: Write> ReportWriter<W> {
    /// Creates a writer and emits the header row.
    pub fn new(inner: W, layout: ReportLayout) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        match layout {
            ReportLayout::Columns => {
                writer.write_record(PAIR_HEADER.iter().chain(RECORD_HEADER.iter()))?
            }
            ReportLayout::Prefixed | ReportLayout::Plain => writer.write_record(RECORD_HEADER)?,
        }
        Ok(ReportWriter {
            writer,
            layout,
            rows: 0,
        })
    }

    /// Writes one difference row.
    pub fn write_row(&mut self, row: &PairDifference) -> Result<()> {
        let record = &row.record;
        let kind = record.kind.label();
        match self.layout {
            ReportLayout::Columns => self.writer.write_record([
                row.left_id.as_str(),
                row.right_id.as_str(),
                record.identifier.as_str(),
                kind,
                record.left.as_str(),
                record.right.as_str(),
            ])?,
            ReportLayout::Prefixed => {
                let identifier =
                    format!("{} vs {}::{}", row.left_id, row.right_id, record.identifier);
                self.writer.write_record([
                    identifier.as_str(),
                    kind,
                    record.left.as_str(),
                    record.right.as_str(),
                ])?
            }
            ReportLayout::Plain => self.writer.write_record([
                record.identifier.as_str(),
                kind,
                record.left.as_str(),
                record.right.as_str(),
            ])?,
        }
        self.rows += 1;
        Ok(())
    }

    /// Flushes the output and returns the number of rows written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}

/// Writes a complete report file.
pub fn write_report<P: AsRef<Path>>(
    path: P,
    rows: &[PairDifference],
    layout: ReportLayout,
) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = ReportWriter::new(File::create(path)?, layout)?;
    for row in rows {
        writer.write_row(row)?;
    }
    let written = writer.finish()?;
    info!("{} difference rows written to {}", written, path.display());
    Ok(written)
}
