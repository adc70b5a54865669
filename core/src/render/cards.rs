//! View models for the result panes

use serde_json::Value;
use stratfin_types::{Driver, DriverValue, Model, Projection};

use super::NOT_AVAILABLE;
use crate::format::{format_currency, format_label, format_number};

/// Header shown above the result panes.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub model_id: String,
    /// Number of projected months
    pub horizon_months: usize,
    /// Total revenue of the final month, formatted
    pub terminal_revenue: String,
}

pub fn summarize(model: &Model) -> Summary {
    Summary {
        model_id: model.model_id.clone(),
        horizon_months: model.horizon_months(),
        terminal_revenue: format_currency(model.terminal_revenue()),
    }
}

/// One formatted row of the projection table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub month: String,
    pub sales_people: String,
    pub large_customers: String,
    pub small_customers: String,
    pub large_customer_revenue: String,
    pub small_customer_revenue: String,
    pub total_revenue: String,
    pub marketing_spend: String,
}

impl TableRow {
    pub const HEADERS: [&'static str; 8] = [
        "Month",
        "Sales People",
        "Large Customers",
        "Small Customers",
        "Large Customer Revenue",
        "Small Customer Revenue",
        "Total Revenue",
        "Marketing Spend",
    ];

    /// Cells in [`TableRow::HEADERS`] order
    pub fn cells(&self) -> [&str; 8] {
        [
            self.month.as_str(),
            self.sales_people.as_str(),
            self.large_customers.as_str(),
            self.small_customers.as_str(),
            self.large_customer_revenue.as_str(),
            self.small_customer_revenue.as_str(),
            self.total_revenue.as_str(),
            self.marketing_spend.as_str(),
        ]
    }
}

/// Format a projection; missing metrics show as "0" or "$0".
pub fn table_row(index: usize, projection: &Projection) -> TableRow {
    TableRow {
        month: projection.month_or(index).to_string(),
        sales_people: format_number(projection.sales_people()),
        large_customers: format_number(projection.large_customers_cumulative()),
        small_customers: format_number(projection.small_customers_cumulative()),
        large_customer_revenue: format_currency(projection.large_customer_revenue()),
        small_customer_revenue: format_currency(projection.small_customer_revenue()),
        total_revenue: format_currency(projection.total_revenue()),
        marketing_spend: format_currency(projection.marketing_spend()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverCard {
    /// Human-readable driver name
    pub title: String,
    pub kind: String,
    pub value: String,
    pub unit: String,
    /// Only present when the driver carries a formula
    pub formula: Option<String>,
    pub business_unit: Option<String>,
}

pub fn driver_card(driver: &Driver) -> DriverCard {
    let value = match &driver.value {
        Some(DriverValue::Number(n)) => format_number(*n),
        Some(DriverValue::Text(text)) => text.clone(),
        None => NOT_AVAILABLE.to_string(),
    };
    DriverCard {
        title: format_label(&driver.name),
        kind: or_not_available(driver.kind.as_deref()),
        value,
        unit: or_not_available(driver.unit.as_deref()),
        formula: driver.formula.clone().filter(|f| !f.is_empty()),
        business_unit: driver.business_unit.clone().filter(|b| !b.is_empty()),
    }
}

fn or_not_available(field: Option<&str>) -> String {
    field.unwrap_or(NOT_AVAILABLE).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssumptionCard {
    pub label: String,
    pub value: String,
}

/// Numbers go through [`format_number`]; anything else is shown as-is.
pub fn assumption_card(key: &str, value: &Value) -> AssumptionCard {
    let value = match value {
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    AssumptionCard {
        label: format_label(key),
        value,
    }
}
