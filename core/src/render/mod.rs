//! Result rendering
//!
//! Projects a [`Model`] into the table, driver cards, assumption cards and
//! summary header, and writes them into a [`ResultSink`].
//!
//! ```text
//!   Model ──► render_results ──► sink.clear()
//!                               sink.summary(..)
//!                               sink.table_row(..)        × projections
//!                               sink.driver_card(..)      × drivers   | empty_state(Drivers)
//!                               sink.assumption_card(..)  × entries   | empty_state(Assumptions)
//! ```
//!
//! Every render starts with `clear()`, so rendering the same model twice
//! leaves the sink in the same state as rendering it once.

mod cards;
mod view;


pub use cards::{
    AssumptionCard, DriverCard, Summary, TableRow, assumption_card, driver_card, summarize,
    table_row,
};
pub use view::{Listing, ResultsView};

use stratfin_types::Model;

/// Placeholder shown instead of an empty driver list
pub const NO_DRIVERS_MESSAGE: &str = "No revenue drivers available";
/// Placeholder shown instead of an empty assumption mapping
pub const NO_ASSUMPTIONS_MESSAGE: &str = "No assumptions available";
/// Shown for absent driver value, unit or type
pub const NOT_AVAILABLE: &str = "N/A";

/// Card sections that have an explicit empty state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Drivers,
    Assumptions,
}

/// Display target for rendered results.
pub trait ResultSink {
    /// Remove everything previously written
    fn clear(&mut self);
    fn summary(&mut self, summary: Summary);
    fn table_row(&mut self, row: TableRow);
    fn driver_card(&mut self, card: DriverCard);
    fn assumption_card(&mut self, card: AssumptionCard);
    /// Placeholder for a section with no entries
    fn empty_state(&mut self, section: Section, message: &'static str);
}

/// Write the full result view of `model` into `sink`, replacing prior content.
pub fn render_results<S: ResultSink + ?Sized>(model: &Model, sink: &mut S) {
    sink.clear();
    sink.summary(summarize(model));

    for (index, projection) in model.monthly_projections.iter().enumerate() {
        sink.table_row(table_row(index, projection));
    }

    if model.revenue_drivers.is_empty() {
        sink.empty_state(Section::Drivers, NO_DRIVERS_MESSAGE);
    } else {
        for driver in &model.revenue_drivers {
            sink.driver_card(driver_card(driver));
        }
    }

    if model.assumptions.is_empty() {
        sink.empty_state(Section::Assumptions, NO_ASSUMPTIONS_MESSAGE);
    } else {
        for (key, value) in model.assumptions.iter() {
            sink.assumption_card(assumption_card(key, value));
        }
    }

    tracing::debug!(
        model_id = %model.model_id,
        rows = model.monthly_projections.len(),
        drivers = model.revenue_drivers.len(),
        assumptions = model.assumptions.len(),
        "rendered results"
    );
}

/// Remove all rendered results.
pub fn clear_results<S: ResultSink + ?Sized>(sink: &mut S) {
    sink.clear();
}
