use std::fs::{self, File};
use std::path::Path;

use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::conversion::mapping::{CategoryMapping, MappingDraft};
use crate::conversion::pipeline::ConvertedTables;
use crate::conversion::reconciler::ReconciliationReport;
use crate::conversion::summary::ConversionSummary;
use crate::conversion::table::{Table, Value};

/// Written next to the six import files.
pub const SUMMARY_FILE_NAME: &str = "relatorio_conversao.txt";

/// One line of the operator's mapping file.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    #[serde(rename = "categoria_antiga")]
    pub old: String,
    #[serde(rename = "categoria_nova", default)] // Blank until the operator fills it
    pub new: String,
}

/// A mapping line still waiting for the operator, with the proposed target.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    #[serde(rename = "categoria_antiga")]
    pub old: String,
    #[serde(rename = "categoria_nova")]
    pub new: String,
    #[serde(rename = "sugestao")]
    pub suggestion: String,
}

/// Reads a CSV with a header row. Empty cells become `Value::Blank`, every
/// other cell is kept as trimmed text.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let file = File::open(path)?;
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(columns);
    for record in csv_reader.records() {
        let row = record?
            .iter()
            .map(|field| if field.is_empty() { Value::Blank } else { Value::text(field) })
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

pub fn write_table<P: AsRef<Path>>(path: P, table: &Table) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_path(path)?;
    csv_writer.write_record(table.columns())?;
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(|value| value.to_string()))?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Writes the six tables into `dir`, one import file each.
pub fn write_tables<P: AsRef<Path>>(dir: P, tables: &ConvertedTables) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    for (kind, table) in tables.iter() {
        let path = dir.join(kind.file_name());
        write_table(&path, table)?;
        info!("wrote table, table={}, rows={}, path={}", kind.name(), table.len(), path.display());
    }

    Ok(())
}

/// Fills `draft` from a mapping file and returns how many entries were taken.
/// Unreadable lines, blank targets and labels the draft does not expect are
/// skipped.
pub fn load_mapping<P: AsRef<Path>>(path: P, draft: &mut MappingDraft) -> Result<usize> {
    let file = File::open(path)?;
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut loaded = 0;
    for record in csv_reader.deserialize::<MappingRecord>() {
        match record {
            Ok(record) if record.new.is_empty() => debug!("mapping entry has no target, label={}", record.old),
            Ok(record) => match draft.assign(&record.old, record.new) {
                Ok(()) => loaded += 1,
                Err(err) => debug!("skipping mapping entry, err={}", err),
            },
            Err(err) => debug!("failed to deserialize record, err={}", err),
        }
    }

    Ok(loaded)
}

pub fn save_mapping<P: AsRef<Path>>(path: P, mapping: &CategoryMapping) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_path(path)?;
    for (old, new) in mapping.iter() {
        csv_writer.serialize(MappingRecord {
            old: old.to_string(),
            new: new.to_string(),
        })?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Writes one line per inconsistent label: its current target (blank when
/// none yet) and the suggested one. `load_mapping` reads the file back and
/// ignores the suggestion column.
pub fn save_mapping_draft<P: AsRef<Path>>(path: P, report: &ReconciliationReport, draft: &MappingDraft) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_path(path)?;
    for label in report.inconsistent() {
        csv_writer.serialize(DraftRecord {
            old: label.clone(),
            new: draft.get(label).unwrap_or_default().to_string(),
            suggestion: report.suggestion(label).unwrap_or_default().to_string(),
        })?;
    }

    csv_writer.flush()?;

    Ok(())
}

pub fn write_summary<P: AsRef<Path>>(path: P, summary: &ConversionSummary) -> Result<()> {
    fs::write(path, summary.to_string())?;

    Ok(())
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
