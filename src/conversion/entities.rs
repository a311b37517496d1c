use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use enum_dispatch::enum_dispatch;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::columns::{self, ColumnRule, ACCOUNT_RULES, CONTACT_RULES, COST_CENTER_RULES, DATE_RULES};
use super::normalizer::{DateOrder, TableKind};
use super::options::ConversionOptions;
use super::table::{Table, Value};

#[enum_dispatch]
pub trait EntityExtractor {
    fn kind(&self) -> TableKind;

    fn rules(&self) -> &'static [ColumnRule];

    fn extract(&self, transactions: &Table, column: usize, options: &ConversionOptions) -> Table;

    /// Locates the entity column and extracts from it. Without a matching
    /// column the table is empty but keeps its schema.
    fn derive(&self, transactions: &Table, options: &ConversionOptions) -> Table {
        match columns::locate_index(transactions.columns(), self.rules()) {
            Some(column) => self.extract(transactions, column, options),
            None => {
                debug!("no source column found, table={}", self.kind().name());
                self.kind().empty_table()
            },
        }
    }
}

#[enum_dispatch(EntityExtractor)]
#[derive(Debug, Clone, Copy)]
pub enum Extractor {
    CostCenters,
    Accounts,
    Contacts,
}

impl Extractor {
    pub const ALL: [Extractor; 3] = [
        Extractor::CostCenters(CostCenters),
        Extractor::Accounts(Accounts),
        Extractor::Contacts(Contacts),
    ];
}

/// Distinct non-blank values of a column, trimmed, in first-seen order.
fn first_seen(table: &Table, column: usize) -> Vec<String> {
    let mut seen = HashSet::new();

    table
        .rows()
        .iter()
        .filter_map(|row| row[column].as_label())
        .map(|label| label.trim().to_string())
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

fn sequence(position: usize) -> Value {
    Value::Number(Decimal::from(position + 1))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CostCenters;

impl EntityExtractor for CostCenters {
    fn kind(&self) -> TableKind {
        TableKind::CostCenters
    }

    fn rules(&self) -> &'static [ColumnRule] {
        COST_CENTER_RULES
    }

    fn extract(&self, transactions: &Table, column: usize, _options: &ConversionOptions) -> Table {
        let mut table = self.kind().empty_table();
        for (position, name) in first_seen(transactions, column).into_iter().enumerate() {
            table.append_with(|field| match field {
                "Codigo" => sequence(position),
                "Nome" => Value::text(name.as_str()),
                "Ativo" => Value::text("Sim"),
                _ => Value::Blank,
            });
        }

        table
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Accounts;

impl Accounts {
    /// Earliest parseable transaction date per account. Empty when the
    /// transactions carry no date column.
    fn earliest_dates(transactions: &Table, column: usize) -> HashMap<String, NaiveDate> {
        let mut earliest = HashMap::new();

        let date_column = match columns::locate_index(transactions.columns(), DATE_RULES) {
            Some(date_column) => date_column,
            None => return earliest,
        };
        let order = DateOrder::detect(transactions.rows().iter().map(|row| &row[date_column]));
        debug!("parsing account dates, column={}, order={:?}", transactions.columns()[date_column], order);

        for row in transactions.rows() {
            if let (Some(account), Some(date)) = (row[column].as_label(), order.parse(&row[date_column])) {
                earliest
                    .entry(account.trim().to_string())
                    .and_modify(|first: &mut NaiveDate| *first = (*first).min(date))
                    .or_insert(date);
            }
        }

        earliest
    }
}

impl EntityExtractor for Accounts {
    fn kind(&self) -> TableKind {
        TableKind::Accounts
    }

    fn rules(&self) -> &'static [ColumnRule] {
        ACCOUNT_RULES
    }

    fn extract(&self, transactions: &Table, column: usize, options: &ConversionOptions) -> Table {
        let earliest = Accounts::earliest_dates(transactions, column);

        let mut table = self.kind().empty_table();
        for name in first_seen(transactions, column) {
            // The account opens the day before its first movement.
            let opening = earliest
                .get(&name)
                .and_then(|first| first.pred_opt())
                .map(|date| Value::text(date.format(options.date_output_format()).to_string()))
                .unwrap_or(Value::Blank);

            table.append_with(|field| match field {
                "Nome" => Value::text(name.as_str()),
                "Tipo" => Value::Number(dec!(1)),
                "Data Inicial" => opening.clone(),
                "Valor Inicial" => Value::Number(dec!(0.00)),
                _ => Value::Blank,
            });
        }

        table
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Contacts;

impl EntityExtractor for Contacts {
    fn kind(&self) -> TableKind {
        TableKind::Contacts
    }

    fn rules(&self) -> &'static [ColumnRule] {
        CONTACT_RULES
    }

    fn extract(&self, transactions: &Table, column: usize, _options: &ConversionOptions) -> Table {
        let mut table = self.kind().empty_table();
        for name in first_seen(transactions, column) {
            // Type 0 is "not identified" in the target system.
            table.append_with(|field| match field {
                "Nome" => Value::text(name.as_str()),
                "Tipo" => Value::Number(dec!(0)),
                _ => Value::Blank,
            });
        }

        table
    }
}

#[cfg(test)]
#[path = "entities_tests.rs"]
mod tests;
