use super::table::Table;
use super::ConfigurationError;

/// A keyword predicate over a source column name. Keywords are lower case and
/// are matched against the trimmed, lower-cased column name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnRule {
    Exact(&'static str),
    ContainsAny(&'static [&'static str]),
    ContainsAll(&'static [&'static str]),
    ContainsAnyExcept {
        any: &'static [&'static str],
        except: &'static [&'static str],
    },
}

impl ColumnRule {
    pub fn matches(&self, column: &str) -> bool {
        let lower = column.trim().to_lowercase();
        let contains = |word: &&str| lower.contains(*word);

        match self {
            ColumnRule::Exact(name) => column == *name,
            ColumnRule::ContainsAny(words) => words.iter().any(contains),
            ColumnRule::ContainsAll(words) => words.iter().all(contains),
            ColumnRule::ContainsAnyExcept { any, except } => any.iter().any(contains) && !except.iter().any(contains),
        }
    }
}

pub const COST_CENTER_RULES: &[ColumnRule] = &[ColumnRule::ContainsAll(&["centro", "custo"])];

pub const ACCOUNT_RULES: &[ColumnRule] = &[ColumnRule::ContainsAnyExcept {
    any: &["conta", "banco"],
    except: &["contato"],
}];

pub const CONTACT_RULES: &[ColumnRule] = &[
    ColumnRule::ContainsAny(&["contato", "cliente", "fornecedor", "pessoa", "empresa"]),
    ColumnRule::Exact("Contato"),
];

pub const DATE_RULES: &[ColumnRule] = &[ColumnRule::ContainsAnyExcept {
    any: &["data"],
    except: &["datacompetencia"],
}];

pub const MOVEMENT_RULES: &[ColumnRule] = &[ColumnRule::ContainsAny(&["movimenta"])];

pub const NAME_RULES: &[ColumnRule] = &[ColumnRule::Exact("Nome"), ColumnRule::ContainsAny(&["nome"])];

pub const CHART_CATEGORY_RULES: &[ColumnRule] = &[ColumnRule::ContainsAny(&[
    "categoria",
    "plano",
    "conta",
    "classificacao",
    "classificação",
    "nome",
    "descricao",
    "descrição",
    "grupo",
    "tipo",
    "receita",
    "despesa",
    "centro",
    "custo",
])];

/// Evaluates `rules` in order. The first rule that matches any column wins,
/// and within a rule the leftmost matching column wins.
pub fn locate<'a>(columns: &'a [String], rules: &[ColumnRule]) -> Option<&'a str> {
    locate_index(columns, rules).map(|index| columns[index].as_str())
}

pub fn locate_index(columns: &[String], rules: &[ColumnRule]) -> Option<usize> {
    rules
        .iter()
        .find_map(|rule| columns.iter().position(|column| rule.matches(column)))
}

/// First column of `names` present in the table, compared exactly.
pub fn first_present<'a>(table: &'a Table, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| table.columns().iter().find(|column| column.as_str() == *name))
        .map(String::as_str)
}

pub fn first_present_index(table: &Table, names: &[&str]) -> Option<usize> {
    first_present(table, names).and_then(|column| table.column_index(column))
}

pub fn require(table: &Table, column: &str, table_name: &'static str) -> Result<usize, ConfigurationError> {
    table
        .column_index(column)
        .ok_or_else(|| ConfigurationError::MissingColumn {
            table: table_name,
            column: column.to_string(),
        })
}

#[cfg(test)]
#[path = "columns_tests.rs"]
mod tests;
