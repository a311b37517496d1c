use std::fmt;

use super::mapping::CategoryMapping;
use super::normalizer::TableKind;
use super::pipeline::{ConvertedTables, SourceData};
use super::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    pub rows: usize,
    pub columns: usize,
    pub blank_cells: usize,
}

impl TableStats {
    pub fn of(table: &Table) -> TableStats {
        TableStats {
            rows: table.len(),
            columns: table.columns().len(),
            blank_cells: table.rows().iter().flatten().filter(|value| value.is_blank()).count(),
        }
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows={}, columns={}, blank={}", self.rows, self.columns, self.blank_cells)
    }
}

/// What one run read, produced and remapped. Holds no clock value, so the
/// same inputs always give the same summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub sources: Vec<(&'static str, TableStats)>,
    pub outputs: Vec<(TableKind, TableStats)>,
    pub mapping: CategoryMapping,
    pub warnings: usize,
}

impl ConversionSummary {
    pub fn new(
        source: &SourceData,
        tables: &ConvertedTables,
        mapping: &CategoryMapping,
        warnings: usize,
    ) -> ConversionSummary {
        ConversionSummary {
            sources: vec![
                ("transactions", TableStats::of(&source.transactions)),
                ("transfers", TableStats::of(&source.transfers)),
                ("chart", TableStats::of(&source.chart)),
            ],
            outputs: tables.iter().map(|(kind, table)| (kind, TableStats::of(table))).collect(),
            mapping: mapping.clone(),
            warnings,
        }
    }

    pub fn source(&self, name: &str) -> Option<TableStats> {
        self.sources
            .iter()
            .find(|(source, _)| *source == name)
            .map(|(_, stats)| *stats)
    }

    pub fn output(&self, kind: TableKind) -> Option<TableStats> {
        self.outputs
            .iter()
            .find(|(output, _)| *output == kind)
            .map(|(_, stats)| *stats)
    }
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "source tables:")?;
        for (name, stats) in &self.sources {
            writeln!(f, "  {}: {}", name, stats)?;
        }

        writeln!(f, "output tables:")?;
        for (kind, stats) in &self.outputs {
            writeln!(f, "  {} ({}): {}", kind.name(), kind.file_name(), stats)?;
        }

        writeln!(f, "category mapping:")?;
        if self.mapping.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (old, new) in self.mapping.iter() {
            writeln!(f, "  {} -> {}", old, new)?;
        }

        writeln!(f, "coercion warnings: {}", self.warnings)
    }
}
