//! Chart series derivation
//!
//! Turns projections into the three revenue charts. All series share the same
//! x-axis labels ("M1", "M2", ...).

use stratfin_types::Projection;

use super::ChartSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    /// Bars of each series stacked per label
    StackedBar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name: &'static str,
    pub values: Vec<f64>,
    /// CSS color for line/bar
    pub color: &'static str,
}

/// Backend-neutral description of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub title: &'static str,
    pub kind: ChartKind,
    pub y_axis_name: &'static str,
    pub labels: Vec<String>,
    pub series: Vec<SeriesSpec>,
}

/// Parallel revenue series derived from a projection sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueSeries {
    pub labels: Vec<String>,
    pub total: Vec<f64>,
    pub large_customers: Vec<f64>,
    pub small_customers: Vec<f64>,
    /// `total` in millions, two decimals
    pub total_millions: Vec<f64>,
}

pub fn revenue_series(projections: &[Projection]) -> RevenueSeries {
    let mut series = RevenueSeries::default();
    for (index, p) in projections.iter().enumerate() {
        series.labels.push(p.axis_label(index));
        series.total.push(p.total_revenue());
        series.large_customers.push(p.large_customer_revenue());
        series.small_customers.push(p.small_customer_revenue());
        series.total_millions.push(to_millions(p.total_revenue()));
    }
    series
}

/// Dollars to millions rounded to two decimals, matching the spreadsheet export.
///
/// `round(value / 1_000_000 * 100) / 100` with halves rounded towards
/// positive infinity.
pub fn to_millions(value: f64) -> f64 {
    round_half_up(value / 1_000_000.0 * 100.0) / 100.0
}

fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

const TOTAL_COLOR: &str = "#2e86de";
const LARGE_COLOR: &str = "#10ac84";
const SMALL_COLOR: &str = "#f39c12";

/// Specs for all three slots, in [`ChartSlot::all`] order.
pub fn chart_specs(series: &RevenueSeries) -> [ChartSpec; 3] {
    [
        ChartSpec {
            slot: ChartSlot::RevenueLine,
            title: "Total Revenue",
            kind: ChartKind::Line,
            y_axis_name: "USD",
            labels: series.labels.clone(),
            series: vec![SeriesSpec {
                name: "Total Revenue",
                values: series.total.clone(),
                color: TOTAL_COLOR,
            }],
        },
        ChartSpec {
            slot: ChartSlot::RevenueBreakdown,
            title: "Revenue by Customer Segment",
            kind: ChartKind::StackedBar,
            y_axis_name: "USD",
            labels: series.labels.clone(),
            series: vec![
                SeriesSpec {
                    name: "Large Customers",
                    values: series.large_customers.clone(),
                    color: LARGE_COLOR,
                },
                SeriesSpec {
                    name: "Small Customers",
                    values: series.small_customers.clone(),
                    color: SMALL_COLOR,
                },
            ],
        },
        ChartSpec {
            slot: ChartSlot::RevenueMillion,
            title: "Total Revenue ($ Mn)",
            kind: ChartKind::Line,
            y_axis_name: "$ Mn",
            labels: series.labels.clone(),
            series: vec![SeriesSpec {
                name: "Total Revenue ($ Mn)",
                values: series.total_millions.clone(),
                color: TOTAL_COLOR,
            }],
        },
    ]
}
