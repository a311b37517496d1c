use anyhow::Result;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use super::*;

#[test]
fn test_parent_code() {
    assert_eq!(parent_code("2.1.1.1"), "2.1.1");
    assert_eq!(parent_code("2.1.1"), "2.1");
    assert_eq!(parent_code("2.1"), "2");
    assert_eq!(parent_code("2"), "");
    assert_eq!(parent_code(""), "");
    assert_eq!(parent_code(" 1.01 "), "1");
}

#[test]
fn test_enforce_columns_adds_drops_and_reorders() -> Result<()> {
    let table = Table::from_rows(
        ["Nome", "Extra", "Codigo"],
        vec![vec![Value::text("Loja"), Value::text("x"), Value::text("1")]],
    )?;

    let enforced = enforce_columns(&table, &["Codigo", "Nome", "Ativo"]);

    assert_eq!(enforced.columns(), &["Codigo", "Nome", "Ativo"]);
    assert_eq!(
        enforced.rows(),
        &[vec![Value::text("1"), Value::text("Loja"), Value::Blank]]
    );

    Ok(())
}

#[test]
fn test_enforce_columns_is_idempotent() -> Result<()> {
    let table = Table::from_rows(
        ["B", "Z", "A"],
        vec![
            vec![Value::text("b1"), Value::text("z1"), Value::text("a1")],
            vec![Value::Blank, Value::text("z2"), Value::Number(dec!(2))],
        ],
    )?;
    let required = ["A", "B", "C"];

    let once = enforce_columns(&table, &required);
    let twice = enforce_columns(&once, &required);

    assert_eq!(once, twice);

    Ok(())
}

#[test]
fn test_enforce_columns_on_empty_table() {
    let enforced = enforce_columns(&Table::default(), TableKind::Transfers.columns());

    assert_eq!(enforced, TableKind::Transfers.empty_table());
    assert_eq!(enforced.is_empty(), true);
}

#[test]
fn test_normalize_currency() {
    assert_eq!(normalize_currency(&Value::Number(dec!(3.14159))), Some(dec!(3.14)));
    assert_eq!(normalize_currency(&Value::text("1500")), Some(dec!(1500.00)));
    assert_eq!(normalize_currency(&Value::text("-800.456")), Some(dec!(-800.46)));
    assert_eq!(normalize_currency(&Value::text("R$ 1.234,56")), Some(dec!(1234.56)));
    assert_eq!(normalize_currency(&Value::text("1,234.5")), Some(dec!(1234.50)));
    assert_eq!(normalize_currency(&Value::text("25,9")), Some(dec!(25.90)));
    assert_eq!(normalize_currency(&Value::text("(100.00)")), Some(dec!(-100)));
}

#[test]
fn test_normalize_currency_sign_before_prefix() {
    assert_eq!(normalize_currency(&Value::text("-R$ 100,00")), Some(dec!(-100.00)));
    assert_eq!(normalize_currency(&Value::text("- R$1.234,56")), Some(dec!(-1234.56)));
    assert_eq!(normalize_currency(&Value::text("R$ -50,10")), Some(dec!(-50.10)));
    assert_eq!(normalize_currency(&Value::text("-abc")), None);
}

#[test]
fn test_normalize_currency_keeps_two_decimals() -> Result<()> {
    let amount = normalize_currency(&Value::text("1500")).ok_or_else(|| anyhow::anyhow!("not a number"))?;

    assert_eq!(amount.to_string(), "1500.00");

    Ok(())
}

#[test]
fn test_normalize_currency_not_a_number() {
    assert_eq!(normalize_currency(&Value::text("abc")), None);
    assert_eq!(normalize_currency(&Value::Blank), None);
    assert_eq!(normalize_currency(&Value::text("")), None);
}

#[test]
fn test_normalize_count() {
    assert_eq!(normalize_count(&Value::text("3"), 1), 3);
    assert_eq!(normalize_count(&Value::text("2.0"), 1), 2);
    assert_eq!(normalize_count(&Value::Number(dec!(4)), 1), 4);
    assert_eq!(normalize_count(&Value::text("n/a"), 1), 1);
    assert_eq!(normalize_count(&Value::Blank, 0), 0);
}

#[test]
fn test_date_order_prefers_day_first() {
    let values = [Value::text("01/02/2024"), Value::text("15/03/2024")];

    assert_eq!(DateOrder::detect(&values), DateOrder::DayFirst);
    assert_eq!(
        DateOrder::DayFirst.parse(&values[0]),
        NaiveDate::from_ymd_opt(2024, 2, 1)
    );
}

#[test]
fn test_date_order_falls_back_to_month_first() {
    let values = [Value::text("12/31/2023"), Value::Blank];

    assert_eq!(DateOrder::detect(&values), DateOrder::MonthFirst);
    assert_eq!(
        DateOrder::MonthFirst.parse(&values[0]),
        NaiveDate::from_ymd_opt(2023, 12, 31)
    );
}

#[test]
fn test_date_order_falls_back_to_auto() {
    let values = [Value::text("2024-01-05 00:00:00")];

    assert_eq!(DateOrder::detect(&values), DateOrder::Auto);
    assert_eq!(
        DateOrder::Auto.parse(&values[0]),
        NaiveDate::from_ymd_opt(2024, 1, 5)
    );
}

#[test]
fn test_two_digit_years_are_not_read_as_ancient_dates() {
    let values = [Value::text("05/01/24"), Value::text("28/02/23")];

    assert_eq!(DateOrder::detect(&values), DateOrder::DayFirst);
    assert_eq!(DateOrder::DayFirst.parse(&values[0]), NaiveDate::from_ymd_opt(2024, 1, 5));
    assert_eq!(DateOrder::MonthFirst.parse(&Value::text("12/31/23")), NaiveDate::from_ymd_opt(2023, 12, 31));
    assert_eq!(DateOrder::Auto.parse(&Value::text("05/01/24")), NaiveDate::from_ymd_opt(2024, 1, 5));
    assert_eq!(normalize_date(&values[1], DateOrder::DayFirst, "%d/%m/%Y"), "28/02/2023");
}

#[test]
fn test_short_years_in_full_year_formats_are_rejected() {
    assert_eq!(DateOrder::Auto.parse(&Value::text("24-01-05")), None);
    assert_eq!(DateOrder::Auto.parse(&Value::text("0024-01-05")), None);
    assert_eq!(DateOrder::Auto.parse(&Value::text("24-01-05 10:00:00")), None);
}

#[test]
fn test_normalize_date() {
    assert_eq!(
        normalize_date(&Value::text("2024-01-05"), DateOrder::Auto, "%d/%m/%Y"),
        "05/01/2024"
    );
    assert_eq!(
        normalize_date(&Value::text("05/01/2024"), DateOrder::DayFirst, "%Y-%m-%d"),
        "2024-01-05"
    );
}

#[test]
fn test_normalize_date_never_invents_a_date() {
    assert_eq!(normalize_date(&Value::Blank, DateOrder::Auto, "%d/%m/%Y"), "");
    assert_eq!(normalize_date(&Value::text("soon"), DateOrder::Auto, "%d/%m/%Y"), "");
    assert_eq!(normalize_date(&Value::text("31/31/2024"), DateOrder::DayFirst, "%d/%m/%Y"), "");
}

#[test]
fn test_table_kind_schemas() {
    assert_eq!(TableKind::CostCenters.columns(), &["Codigo", "Nome", "Ativo"]);
    assert_eq!(TableKind::Accounts.columns(), &["Nome", "Tipo", "Data Inicial", "Valor Inicial"]);
    assert_eq!(TableKind::Categories.columns().len(), 10);
    assert_eq!(TableKind::Contacts.columns().len(), 11);
    assert_eq!(TableKind::Transactions.columns().len(), 12);
    assert_eq!(TableKind::Transfers.file_name(), "Financeiro - Transferências.csv");
}
