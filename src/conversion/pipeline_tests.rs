use std::collections::BTreeSet;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::*;
use crate::conversion::summary::TableStats;
use crate::conversion::table::Value;
use crate::conversion::{ConfigurationError, IncompleteMappingError};

fn table(columns: &[&str], rows: &[&[&str]]) -> Result<Table> {
    Ok(Table::from_rows(
        columns.iter().copied(),
        rows.iter()
            .map(|row| row.iter().map(|value| Value::text(*value)).collect())
            .collect(),
    )?)
}

fn column_labels(table: &Table, column: &str) -> Vec<String> {
    table
        .column(column)
        .map(|values| values.map(|value| value.to_string()).collect())
        .unwrap_or_default()
}

fn source() -> Result<SourceData> {
    Ok(SourceData {
        transactions: table(
            &["Data", "Valor", "Categoria", "Conta Corrente", "Contato", "Centro de Custo"],
            &[
                &["05/01/2024", "100,00", "Receita Vendas", "Banco A", "Cliente X", "Comercial"],
                &["06/01/2024", "50", "Despesa X", "Banco B", "Fornecedor Y", "Administrativo"],
                &["08/01/2024", "75,10", "Receita Vendas", "Banco A", "Cliente X", "Comercial"],
            ],
        )?,
        transfers: table(
            &["Data", "Valor", "Movimentação"],
            &[&["07/01/2024", "30", "Banco A para Banco B"]],
        )?,
        chart: table(&["Nome"], &[&["1.01 - Receita de Vendas"], &["2.01 - Despesa X"]])?,
    })
}

fn complete_mapping(converter: &Converter, source: &SourceData) -> Result<CategoryMapping> {
    let report = converter.reconcile(source)?;
    let mut draft = report.draft();
    draft.assign("Receita Vendas", "Receita de Vendas")?;

    Ok(draft.freeze()?)
}

#[test]
fn test_reconcile_reports_unmatched_labels() -> Result<()> {
    let report = Converter::default().reconcile(&source()?)?;

    assert_eq!(report.chart_category_column(), "Nome");
    assert_eq!(report.inconsistent(), &BTreeSet::from(["Receita Vendas".to_string()]));
    assert_eq!(report.suggestion("Receita Vendas"), Some("Receita de Vendas"));

    Ok(())
}

#[test]
fn test_convert_end_to_end() -> Result<()> {
    let source = source()?;
    let converter = Converter::default();
    let mapping = complete_mapping(&converter, &source)?;

    let Conversion { tables, warnings, .. } = converter.convert(&source, &mapping)?;

    assert_eq!(
        column_labels(&tables.transactions, "Categoria"),
        vec!["Receita de Vendas", "Despesa X", "Receita de Vendas"]
    );
    assert_eq!(column_labels(&tables.transactions, "Valor"), vec!["100.00", "50.00", "75.10"]);
    assert_eq!(column_labels(&tables.categories, "Código"), vec!["1.01", "2.01"]);
    assert_eq!(column_labels(&tables.categories, "Nome"), vec!["Receita de Vendas", "Despesa X"]);
    assert_eq!(column_labels(&tables.cost_centers, "Nome"), vec!["Comercial", "Administrativo"]);
    assert_eq!(column_labels(&tables.accounts, "Nome"), vec!["Banco A", "Banco B"]);
    assert_eq!(column_labels(&tables.accounts, "Data Inicial"), vec!["04/01/2024", "05/01/2024"]);
    assert_eq!(column_labels(&tables.contacts, "Nome"), vec!["Cliente X", "Fornecedor Y"]);
    assert_eq!(column_labels(&tables.transfers, "Conta Débito"), vec!["Banco A"]);
    assert_eq!(column_labels(&tables.transfers, "Conta Crédito"), vec!["Banco B"]);
    assert_eq!(warnings.is_empty(), true);

    Ok(())
}

#[test]
fn test_converted_tables_follow_their_schemas() -> Result<()> {
    let source = source()?;
    let converter = Converter::default();
    let mapping = complete_mapping(&converter, &source)?;

    let conversion = converter.convert(&source, &mapping)?;

    let kinds: Vec<TableKind> = conversion.tables.iter().map(|(kind, _)| kind).collect();
    assert_eq!(kinds, TableKind::ALL.to_vec());
    for (kind, table) in conversion.tables.iter() {
        assert_eq!(table.columns(), kind.columns());
    }

    Ok(())
}

#[test]
fn test_convert_rejects_incomplete_mapping() -> Result<()> {
    let source = source()?;

    if let Err(err) = Converter::default().convert(&source, &CategoryMapping::default()) {
        assert_eq!(
            err,
            ConversionError::IncompleteMapping(IncompleteMappingError {
                missing: BTreeSet::from(["Receita Vendas".to_string()]),
            })
        );
    } else {
        bail!("conversion with an incomplete mapping should fail");
    }

    Ok(())
}

#[test]
fn test_convert_consistent_data_without_mapping() -> Result<()> {
    let mut source = source()?;
    source.chart = table(&["Nome"], &[&["Receita Vendas"], &["Despesa X"]])?;

    let conversion = Converter::default().convert(&source, &CategoryMapping::default())?;

    assert_eq!(
        column_labels(&conversion.tables.transactions, "Categoria"),
        vec!["Receita Vendas", "Despesa X", "Receita Vendas"]
    );

    Ok(())
}

#[test]
fn test_convert_missing_category_column() -> Result<()> {
    let source = source()?;
    let converter = Converter::new(ConversionOptions::new().with_transaction_category_column("Plano"));

    if let Err(err) = converter.convert(&source, &CategoryMapping::default()) {
        assert_eq!(
            err,
            ConversionError::Configuration(ConfigurationError::MissingColumn {
                table: "transactions",
                column: "Plano".to_string(),
            })
        );
    } else {
        bail!("conversion without the category column should fail");
    }

    Ok(())
}

#[test]
fn test_convert_is_repeatable() -> Result<()> {
    let source = source()?;
    let converter = Converter::default();
    let mapping = complete_mapping(&converter, &source)?;

    let first = converter.convert(&source, &mapping)?;
    let second = converter.convert(&source, &mapping)?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_summary_counts_sources_outputs_and_mapping() -> Result<()> {
    let source = source()?;
    let converter = Converter::default();
    let mapping = complete_mapping(&converter, &source)?;

    let summary = converter.convert(&source, &mapping)?.summary;

    assert_eq!(
        summary.source("transactions"),
        Some(TableStats {
            rows: 3,
            columns: 6,
            blank_cells: 0,
        })
    );
    assert_eq!(summary.source("chart").map(|stats| stats.rows), Some(2));
    assert_eq!(summary.output(TableKind::Transactions).map(|stats| stats.columns), Some(12));
    assert_eq!(summary.output(TableKind::Categories).map(|stats| stats.rows), Some(2));
    assert_eq!(summary.outputs.len(), 6);
    assert_eq!(summary.mapping, mapping);
    assert_eq!(summary.warnings, 0);

    let report = summary.to_string();
    assert_eq!(report.contains("  transactions: rows=3, columns=6, blank=0\n"), true);
    assert_eq!(report.contains("  Receita Vendas -> Receita de Vendas\n"), true);

    Ok(())
}

#[test]
fn test_copied_dates_use_configured_format() -> Result<()> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 3).ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    let source = SourceData {
        transactions: Table::from_rows(
            ["Data", "Categoria", "Descrição"],
            vec![vec![Value::text("05/01/2024"), Value::text("Despesa X"), Value::Date(date)]],
        )?,
        transfers: Table::default(),
        chart: table(&["Nome"], &[&["Despesa X"]])?,
    };
    let converter = Converter::new(ConversionOptions::new().with_date_output_format("%Y-%m-%d"));

    let tables = converter.convert(&source, &CategoryMapping::default())?.tables;

    assert_eq!(tables.transactions.value(0, "Data"), Some(&Value::text("2024-01-05")));
    assert_eq!(tables.transactions.value(0, "Descrição"), Some(&Value::text("2024-01-03")));

    Ok(())
}

#[test]
fn test_categories_take_names_from_chart_labels() -> Result<()> {
    let mut source = source()?;
    source.chart = table(
        &["Código", "Descrição"],
        &[&["1.01", "Receita de Vendas"], &["2.01", "Despesa X"]],
    )?;
    let converter = Converter::default();
    let mapping = complete_mapping(&converter, &source)?;

    let tables = converter.convert(&source, &mapping)?.tables;

    assert_eq!(column_labels(&tables.categories, "Nome"), vec!["Receita de Vendas", "Despesa X"]);
    assert_eq!(
        column_labels(&tables.transactions, "Categoria"),
        vec!["Receita de Vendas", "Despesa X", "Receita de Vendas"]
    );

    Ok(())
}
