use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::columns::{self, MOVEMENT_RULES, NAME_RULES};
use super::mapping::CategoryMapping;
use super::normalizer::{self, DateOrder, TableKind};
use super::options::ConversionOptions;
use super::reconciler::decompose_value;
use super::table::{Table, Value};
use super::{CoercionWarning, ConfigurationError};

/// Code columns tried, in order, when the chart has no `Codigo` column.
pub const CODE_ALIASES: [&str; 5] = ["Codigo", "Código", "Code", "ID", "Código Pai"];

/// Separator of the legacy "movement" column: `"Banco A para Banco B"`.
pub const MOVEMENT_SEPARATOR: &str = " para ";

/// Replaces mapped labels in `category_column`. Row count, row order and
/// every other cell stay untouched.
pub fn apply_mapping(
    transactions: &Table,
    mapping: &CategoryMapping,
    category_column: &str,
) -> Result<Table, ConfigurationError> {
    if mapping.is_empty() {
        return Ok(transactions.clone());
    }

    let index = columns::require(transactions, category_column, "transactions")?;

    let mut mapped = transactions.clone();
    let mut replaced = 0;
    for row in mapped.rows_mut() {
        let replacement = row[index]
            .as_label()
            .and_then(|old| mapping.get(&old).map(str::to_string));
        if let Some(new) = replacement {
            row[index] = Value::Text(new);
            replaced += 1;
        }
    }
    debug!("applied category mapping, labels={}, rows={}", mapping.len(), replaced);

    Ok(mapped)
}

fn cell_label(row: &[Value], index: Option<usize>) -> String {
    index
        .and_then(|index| row[index].as_label())
        .map(|label| label.trim().to_string())
        .unwrap_or_default()
}

/// (code, name) per chart row, before blanks are filled in.
fn category_entries(chart: &Table, category_column: Option<&str>) -> Vec<(String, String)> {
    let name_column = columns::locate_index(chart.columns(), NAME_RULES);
    let label_column = category_column.and_then(|column| chart.column_index(column));

    if let Some(code_column) = columns::first_present_index(chart, &CODE_ALIASES) {
        // no name column: names come from the chart category labels
        let label_column = label_column.filter(|index| *index != code_column);
        return chart
            .rows()
            .iter()
            .map(|row| {
                let name = match (name_column, label_column) {
                    (None, Some(index)) => decompose_value(&row[index]).1,
                    _ => cell_label(row, name_column),
                };
                (cell_label(row, Some(code_column)), name)
            })
            .collect();
    }

    let compound_column = name_column.or(label_column);
    if let Some(compound_column) = compound_column {
        return chart
            .rows()
            .iter()
            .map(|row| decompose_value(&row[compound_column]))
            .collect();
    }

    (1..=chart.len()).map(|code| (code.to_string(), String::new())).collect()
}

/// Categories table from the chart of accounts. Every row gets a code (its
/// position when none can be found) and a name.
pub fn build_categories(chart: &Table, category_column: Option<&str>) -> Table {
    let mut table = TableKind::Categories.empty_table();

    for (position, (code, name)) in category_entries(chart, category_column).into_iter().enumerate() {
        let code = if code.is_empty() { (position + 1).to_string() } else { code };
        let name = if name.is_empty() { format!("Categoria {}", code) } else { name };
        let parent = normalizer::parent_code(&code);

        table.append_with(|field| match field {
            "Código" => Value::text(code.as_str()),
            "Nome" => Value::text(name.as_str()),
            "Código Pai" => Value::text(parent.as_str()),
            "Desconto %" | "Desconto R$" => Value::Number(dec!(0.0)),
            "Dias para vencimento" => Value::Number(dec!(0)),
            "Gera Boleto" | "Gera Nota Fiscal" | "Gera Recibo" => Value::text("Não"),
            _ => Value::Blank,
        });
    }

    table
}

/// Source columns feeding each transaction field, first present wins. The
/// configured category column is tried before these.
fn transaction_sources(field: &str) -> &'static [&'static str] {
    match field {
        "Confirmado" => &["Confirmado"],
        "Data Emissão" => &["Data Emissão"],
        "Data" => &["Data"],
        "Valor Emissão" => &["Valor Emissão"],
        "Valor" => &["Valor"],
        "Repetição" => &["Repetição"],
        "Total Parcelas" => &["Total Parcelas", "Parcela", "Parcelas"],
        "Descrição" => &["Descrição", "Descricao"],
        "Categoria" => &["Categoria"],
        "Centro de Custo" => &["Centro de Custo", "CentroDeCusto"],
        "Conta Corrente" => &["Conta Corrente", "Conta"],
        "Contato" => &["Contato"],
        _ => &[],
    }
}

/// Per-field conversion of one table, with the warnings it raised.
struct CellWriter<'a> {
    table: &'static str,
    date_format: &'a str,
    warnings: &'a mut Vec<CoercionWarning>,
}

impl CellWriter<'_> {
    fn warn(&mut self, column: &'static str, row: usize, value: &Value) {
        let warning = CoercionWarning {
            table: self.table,
            column,
            row,
            value: value.to_string(),
        };
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn date(&mut self, column: &'static str, row: usize, value: &Value, order: DateOrder) -> Value {
        if value.is_blank() {
            return Value::Blank;
        }

        match normalizer::normalize_date(value, order, self.date_format) {
            date if date.is_empty() => {
                self.warn(column, row, value);
                Value::Blank
            },
            date => Value::Text(date),
        }
    }

    fn currency(&mut self, column: &'static str, row: usize, value: &Value) -> Value {
        if value.is_blank() {
            return Value::Blank;
        }

        match normalizer::normalize_currency(value) {
            Some(amount) => Value::Number(amount),
            None => {
                self.warn(column, row, value);
                Value::Blank
            },
        }
    }

    fn count(&mut self, column: &'static str, row: usize, value: &Value, default: i64) -> Value {
        let count = match normalizer::parse_count(value) {
            Some(count) => count,
            None => {
                if !value.is_blank() {
                    self.warn(column, row, value);
                }
                default
            },
        };

        Value::Number(Decimal::from(count))
    }
}

static BLANK: Value = Value::Blank;

fn cell(row: &[Value], index: Option<usize>) -> &Value {
    index.map(|index| &row[index]).unwrap_or(&BLANK)
}

fn detect_order(table: &Table, index: Option<usize>) -> DateOrder {
    match index {
        Some(index) => DateOrder::detect(table.rows().iter().map(|row| &row[index])),
        None => DateOrder::Auto,
    }
}

/// Target-schema transactions from the (already mapped) source rows. Present
/// values are copied and normalized; only absent ones get defaults.
pub fn build_transactions(
    transactions: &Table,
    options: &ConversionOptions,
    warnings: &mut Vec<CoercionWarning>,
) -> Table {
    let fields = TableKind::Transactions.columns();
    let category_column = options.transaction_category_column().as_str();
    let sources: Vec<Option<usize>> = fields
        .iter()
        .map(|field| match *field {
            "Categoria" => columns::first_present_index(transactions, &[category_column])
                .or_else(|| columns::first_present_index(transactions, transaction_sources(field))),
            _ => columns::first_present_index(transactions, transaction_sources(field)),
        })
        .collect();
    let orders: Vec<DateOrder> = fields
        .iter()
        .zip(&sources)
        .map(|(field, source)| match *field {
            "Data" | "Data Emissão" => detect_order(transactions, *source),
            _ => DateOrder::Auto,
        })
        .collect();

    let mut writer = CellWriter {
        table: TableKind::Transactions.name(),
        date_format: options.date_output_format(),
        warnings,
    };

    let mut table = TableKind::Transactions.empty_table();
    for (row_number, row) in transactions.rows().iter().enumerate() {
        let mut position = 0;
        table.append_with(|field| {
            let value = cell(row, sources[position]);
            let order = orders[position];
            position += 1;

            match field {
                "Confirmado" if value.is_blank() => Value::text("Sim"),
                "Data" => writer.date("Data", row_number, value, order),
                "Data Emissão" => writer.date("Data Emissão", row_number, value, order),
                "Valor" if value.is_blank() => Value::Number(dec!(0.00)),
                "Valor" => writer.currency("Valor", row_number, value),
                "Valor Emissão" => writer.currency("Valor Emissão", row_number, value),
                "Repetição" => writer.count("Repetição", row_number, value, 0),
                "Total Parcelas" => writer.count("Total Parcelas", row_number, value, 1),
                _ if value.is_blank() => Value::Blank,
                _ => value.clone(),
            }
        });
    }

    table
}

/// Splits `"Banco A para Banco B"` into its debit and credit accounts. Values
/// without the separator give two blanks.
pub fn split_movement(value: &Value) -> (String, String) {
    value
        .as_label()
        .and_then(|movement| {
            movement
                .split_once(MOVEMENT_SEPARATOR)
                .map(|(from, to)| (from.trim().to_string(), to.trim().to_string()))
        })
        .unwrap_or_default()
}

/// Target-schema transfers. A missing date stays blank and a missing amount
/// becomes zero.
pub fn build_transfers(
    transfers: &Table,
    options: &ConversionOptions,
    warnings: &mut Vec<CoercionWarning>,
) -> Table {
    let mut table = TableKind::Transfers.empty_table();
    if transfers.is_empty() {
        return table;
    }

    let movement_column = columns::locate_index(transfers.columns(), MOVEMENT_RULES);
    let date_column = columns::first_present_index(transfers, &["Data"]);
    let amount_column = columns::first_present_index(transfers, &["Valor"]);
    let description_column = columns::first_present_index(transfers, &["Descrição", "Descricao"]);
    let debit_column = columns::first_present_index(transfers, &["Conta Débito", "Conta Origem"]);
    let credit_column = columns::first_present_index(transfers, &["Conta Crédito", "Conta Destino"]);

    if movement_column.is_none() && debit_column.is_none() && credit_column.is_none() {
        debug!("transfers carry no account columns, accounts left blank");
    }

    let order = detect_order(transfers, date_column);
    let mut writer = CellWriter {
        table: TableKind::Transfers.name(),
        date_format: options.date_output_format(),
        warnings,
    };

    for (row_number, row) in transfers.rows().iter().enumerate() {
        let (debit, credit) = match movement_column {
            Some(index) => split_movement(&row[index]),
            None => (cell_label(row, debit_column), cell_label(row, credit_column)),
        };

        let date = writer.date("Data", row_number, cell(row, date_column), order);
        let amount = match amount_column {
            Some(_) if !cell(row, amount_column).is_blank() => writer.currency("Valor", row_number, cell(row, amount_column)),
            _ => Value::Number(dec!(0.00)),
        };
        let description = cell(row, description_column);

        table.append_with(|field| match field {
            "Data" => date.clone(),
            "Valor" => amount.clone(),
            "Descrição" => description.clone(),
            "Conta Débito" => Value::text(debit.as_str()),
            "Conta Crédito" => Value::text(credit.as_str()),
            _ => Value::Blank,
        });
    }

    table
}

#[cfg(test)]
#[path = "transformer_tests.rs"]
mod tests;
