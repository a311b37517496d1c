use log::{debug, info};

use super::entities::{Accounts, Contacts, CostCenters, EntityExtractor, Extractor};
use super::mapping::{check_completeness, CategoryMapping};
use super::normalizer::{self, TableKind};
use super::options::ConversionOptions;
use super::reconciler::{self, ReconciliationReport};
use super::summary::ConversionSummary;
use super::table::Table;
use super::transformer;
use super::{CoercionWarning, ConversionError};

/// The three raw datasets of one migration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceData {
    pub transactions: Table,
    pub transfers: Table,
    pub chart: Table,
}

/// The six import tables, each already in its final schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvertedTables {
    pub categories: Table,
    pub cost_centers: Table,
    pub accounts: Table,
    pub contacts: Table,
    pub transactions: Table,
    pub transfers: Table,
}

impl ConvertedTables {
    pub fn get(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Categories => &self.categories,
            TableKind::CostCenters => &self.cost_centers,
            TableKind::Accounts => &self.accounts,
            TableKind::Contacts => &self.contacts,
            TableKind::Transactions => &self.transactions,
            TableKind::Transfers => &self.transfers,
        }
    }

    fn get_mut(&mut self, kind: TableKind) -> &mut Table {
        match kind {
            TableKind::Categories => &mut self.categories,
            TableKind::CostCenters => &mut self.cost_centers,
            TableKind::Accounts => &mut self.accounts,
            TableKind::Contacts => &mut self.contacts,
            TableKind::Transactions => &mut self.transactions,
            TableKind::Transfers => &mut self.transfers,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TableKind, &Table)> {
        TableKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub tables: ConvertedTables,
    pub warnings: Vec<CoercionWarning>,
    pub summary: ConversionSummary,
}

/// Runs one migration: reconcile, then convert with a frozen mapping.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConversionOptions,
}

impl Converter {
    pub fn new(options: ConversionOptions) -> Converter {
        Converter { options }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn reconcile(&self, source: &SourceData) -> Result<ReconciliationReport, ConversionError> {
        Ok(reconciler::reconcile(
            &source.transactions,
            &source.chart,
            self.options.transaction_category_column(),
            self.options.chart_category_column().as_deref(),
        )?)
    }

    /// Builds all six tables. Fails before producing anything when the mapping
    /// leaves an inconsistent label unmapped.
    pub fn convert(&self, source: &SourceData, mapping: &CategoryMapping) -> Result<Conversion, ConversionError> {
        let report = self.reconcile(source)?;
        check_completeness(mapping.entries(), report.inconsistent())?;

        let category_column = self.options.transaction_category_column();
        let transactions = transformer::apply_mapping(&source.transactions, mapping, category_column)?;

        let mut warnings = Vec::new();
        let mut tables = ConvertedTables {
            categories: transformer::build_categories(&source.chart, Some(report.chart_category_column().as_str())),
            cost_centers: Extractor::from(CostCenters).derive(&transactions, &self.options),
            accounts: Extractor::from(Accounts).derive(&transactions, &self.options),
            contacts: Extractor::from(Contacts).derive(&transactions, &self.options),
            transactions: transformer::build_transactions(&transactions, &self.options, &mut warnings),
            transfers: transformer::build_transfers(&source.transfers, &self.options, &mut warnings),
        };

        for kind in TableKind::ALL {
            let table = tables.get_mut(kind);
            *table = normalizer::enforce_columns(table, kind.columns());
            normalizer::render_dates(table, self.options.date_output_format());
            debug!("table ready, table={}, rows={}", kind.name(), table.len());
        }

        let summary = ConversionSummary::new(source, &tables, mapping, warnings.len());
        for (kind, stats) in &summary.outputs {
            info!("converted table, table={}, {}", kind.name(), stats);
        }
        info!(
            "conversion finished, mapped_labels={}, warnings={}",
            summary.mapping.len(),
            summary.warnings
        );

        Ok(Conversion {
            tables,
            warnings,
            summary,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
