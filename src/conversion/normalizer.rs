use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::table::{Table, Value};

/// Scale every currency value is normalized to.
pub const CURRENCY_SCALE: u32 = 2;

/// The six schemas the target system imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableKind {
    Categories,
    CostCenters,
    Accounts,
    Contacts,
    Transactions,
    Transfers,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Categories,
        TableKind::CostCenters,
        TableKind::Accounts,
        TableKind::Contacts,
        TableKind::Transactions,
        TableKind::Transfers,
    ];

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Categories => &[
                "Código",
                "Nome",
                "Código Pai",
                "Competência por Parcela",
                "Desconto %",
                "Desconto R$",
                "Dias para vencimento",
                "Gera Boleto",
                "Gera Nota Fiscal",
                "Gera Recibo",
            ],
            TableKind::CostCenters => &["Codigo", "Nome", "Ativo"],
            TableKind::Accounts => &["Nome", "Tipo", "Data Inicial", "Valor Inicial"],
            TableKind::Contacts => &[
                "Nome",
                "Tipo",
                "Documento",
                "E-mail",
                "Enviar e-mail?",
                "Telefone Residencial",
                "Telefone Comercial",
                "Telefone Celular",
                "Contribuinte ICMS?",
                "Inscrição Estadual",
                "Inscrição Municipal",
            ],
            TableKind::Transactions => &[
                "Confirmado",
                "Data Emissão",
                "Data",
                "Valor Emissão",
                "Valor",
                "Repetição",
                "Total Parcelas",
                "Descrição",
                "Categoria",
                "Centro de Custo",
                "Conta Corrente",
                "Contato",
            ],
            TableKind::Transfers => &["Data", "Valor", "Descrição", "Conta Débito", "Conta Crédito"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Categories => "categories",
            TableKind::CostCenters => "cost_centers",
            TableKind::Accounts => "accounts",
            TableKind::Contacts => "contacts",
            TableKind::Transactions => "transactions",
            TableKind::Transfers => "transfers",
        }
    }

    /// File name of the target system's import template.
    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::Categories => "Cadastros - Categorias.csv",
            TableKind::CostCenters => "Cadastros - Centros de Custo.csv",
            TableKind::Accounts => "Cadastros - Contas Corrente.csv",
            TableKind::Contacts => "Cadastros - Contatos.csv",
            TableKind::Transactions => "Financeiro - Lançamentos.csv",
            TableKind::Transfers => "Financeiro - Transferências.csv",
        }
    }

    pub fn empty_table(&self) -> Table {
        Table::new(self.columns().iter().copied())
    }
}

/// Adds missing columns as blanks, then projects to exactly `required`, in order.
pub fn enforce_columns(table: &Table, required: &[&str]) -> Table {
    let sources: Vec<Option<usize>> = required.iter().map(|column| table.column_index(column)).collect();

    let mut enforced = Table::new(required.iter().copied());
    for row in table.rows() {
        let mut source = sources.iter();
        enforced.append_with(|_| match source.next() {
            Some(Some(index)) => row[*index].clone(),
            _ => Value::Blank,
        });
    }

    enforced
}

/// `"2.1.1"` has parent `"2.1"`; a code without a dot has no parent.
pub fn parent_code(code: &str) -> String {
    match code.trim().rsplit_once('.') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

/// Coerces a cell to an amount with two decimals. `None` marks a value that is
/// not a number; callers decide how to fill it.
pub fn normalize_currency(value: &Value) -> Option<Decimal> {
    let amount = match value {
        Value::Number(number) => *number,
        Value::Text(text) => parse_amount(text)?,
        Value::Blank | Value::Date(_) => return None,
    };

    let mut amount = amount.round_dp(CURRENCY_SCALE);
    amount.rescale(CURRENCY_SCALE);

    Some(amount)
}

pub fn parse_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.trunc().to_i64(),
        Value::Text(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<Decimal>().ok().and_then(|number| number.trunc().to_i64()))
        },
        Value::Blank | Value::Date(_) => None,
    }
}

/// Coerces a counter cell (installments, repetition) to an integer.
pub fn normalize_count(value: &Value, default: i64) -> i64 {
    parse_count(value).unwrap_or(default)
}

fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    // -R$ 100,00
    let (signed, text) = match text.strip_prefix('-') {
        Some(rest) if rest.trim_start().starts_with("R$") => (true, rest.trim_start()),
        _ => (false, text),
    };
    let text = text.strip_prefix("R$").unwrap_or(text).trim();

    // (100.00) is accountant notation for -100.00
    let (negative, text) = match text.strip_prefix('(').and_then(|inner| inner.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (signed, text),
    };

    let cleaned = match (text.rfind(','), text.rfind('.')) {
        // 1.234,56
        (Some(comma), Some(dot)) if comma > dot => text.replace('.', "").replace(',', "."),
        // 1,234.56
        (Some(_), Some(_)) => text.replace(',', ""),
        // 1234,56
        (Some(_), None) => text.replace(',', "."),
        _ => text.to_string(),
    };

    let amount = cleaned.parse::<Decimal>().ok()?;

    Some(if negative { -amount } else { amount })
}

/// Day-first, then month-first, then anything recognizable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    DayFirst,
    MonthFirst,
    Auto,
}

/// Earliest year accepted from a four-digit year field. chrono reads `%Y`
/// from as few as one digit, so `05/01/24` would otherwise land in year 24.
const MIN_FULL_YEAR: i32 = 1000;

const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%d-%m-%y"];
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%m-%d-%y"];
const AUTO_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y", "%m-%d-%Y", "%d.%m.%Y", "%Y%m%d", "%d/%m/%y",
    "%d.%m.%y",
];
const AUTO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

impl DateOrder {
    pub const PRIORITY: [DateOrder; 3] = [DateOrder::DayFirst, DateOrder::MonthFirst, DateOrder::Auto];

    /// Picks, for a whole column, the first order that parses at least one of
    /// its values. Falls back to `Auto` when nothing parses.
    pub fn detect<'a, I>(values: I) -> DateOrder
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let values: Vec<&Value> = values.into_iter().filter(|value| !value.is_blank()).collect();

        DateOrder::PRIORITY
            .into_iter()
            .find(|order| values.iter().any(|value| order.parse(value).is_some()))
            .unwrap_or(DateOrder::Auto)
    }

    pub fn parse(&self, value: &Value) -> Option<NaiveDate> {
        let text = match value {
            Value::Date(date) => return Some(*date),
            Value::Text(text) => text.trim(),
            Value::Blank | Value::Number(_) => return None,
        };

        match self {
            DateOrder::DayFirst => parse_with(text, DAY_FIRST_FORMATS),
            DateOrder::MonthFirst => parse_with(text, MONTH_FIRST_FORMATS),
            DateOrder::Auto => parse_with(text, AUTO_DATE_FORMATS).or_else(|| {
                AUTO_DATETIME_FORMATS
                    .iter()
                    .find_map(|format| {
                        NaiveDateTime::parse_from_str(text, format)
                            .ok()
                            .map(|datetime| datetime.date())
                            .filter(full_year)
                    })
            }),
        }
    }
}

fn parse_with(text: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok().filter(full_year))
}

fn full_year(date: &NaiveDate) -> bool {
    date.year() >= MIN_FULL_YEAR
}

/// Reformats a date cell. Blank or unparsable input stays blank; a date is
/// never invented for a missing value.
pub fn normalize_date(value: &Value, order: DateOrder, format: &str) -> String {
    order
        .parse(value)
        .map(|date| date.format(format).to_string())
        .unwrap_or_default()
}

/// Turns every `Value::Date` cell into text in `format`, so copied dates are
/// written like the normalized ones.
pub fn render_dates(table: &mut Table, format: &str) {
    for value in table.rows_mut().iter_mut().flatten() {
        if let Value::Date(date) = value {
            let text = date.format(format).to_string();
            *value = Value::Text(text);
        }
    }
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
