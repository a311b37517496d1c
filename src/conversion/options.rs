use getset::Getters;

pub const DEFAULT_CATEGORY_COLUMN: &str = "Categoria";
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Knobs for one conversion run. The chart's category column is discovered
/// from its headers unless set explicitly.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct ConversionOptions {
    transaction_category_column: String,
    chart_category_column: Option<String>,
    date_output_format: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            transaction_category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            chart_category_column: None,
            date_output_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ConversionOptions {
    pub fn new() -> ConversionOptions {
        ConversionOptions::default()
    }

    pub fn with_transaction_category_column(mut self, column: impl Into<String>) -> Self {
        self.transaction_category_column = column.into();
        self
    }

    pub fn with_chart_category_column(mut self, column: impl Into<String>) -> Self {
        self.chart_category_column = Some(column.into());
        self
    }

    pub fn with_date_output_format(mut self, format: impl Into<String>) -> Self {
        self.date_output_format = format.into();
        self
    }
}
