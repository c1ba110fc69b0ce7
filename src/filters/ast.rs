/// Fields a result filter can test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Case-insensitive substring of any party name, email or tel
    Party,
    /// Presence of a derived section: summary, transcript, recording or attachment
    Has,
    /// Records created on or after a date (YYYY-MM-DD)
    Since,
    /// Case-insensitive substring of any analysis vendor
    Vendor,
}

impl FilterField {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Party => "party",
            FilterField::Has => "has",
            FilterField::Since => "since",
            FilterField::Vendor => "vendor",
        }
    }
}

/// Logical operators for combining filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Both conditions must match (default between different fields)
    And,
    /// Either condition matches (default within same field)
    Or,
}

/// Single field:value filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: FilterField,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }
}

/// Field filters joined by operators, evaluated left to right
///
/// There is no grouping: `a OR b AND c` is `(a OR b) AND c`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpr {
    pub filters: Vec<FieldFilter>,
    pub operators: Vec<FilterOperator>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(&mut self, filter: FieldFilter) {
        self.filters.push(filter);
    }

    pub fn add_operator(&mut self, operator: FilterOperator) {
        self.operators.push(operator);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
