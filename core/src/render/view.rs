//! In-memory result sink
//!
//! Collects the rendered view models so a declarative frontend can draw them.

use super::{AssumptionCard, DriverCard, ResultSink, Section, Summary, TableRow};

/// A card list, or the placeholder that replaces it when there is nothing to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Items(Vec<T>),
    Empty(&'static str),
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing::Items(Vec::new())
    }
}

impl<T> Listing<T> {
    fn push(&mut self, item: T) {
        match self {
            Listing::Items(items) => items.push(item),
            Listing::Empty(_) => *self = Listing::Items(vec![item]),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Items(items) => items,
            Listing::Empty(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Listing::Items(_) => None,
            Listing::Empty(message) => Some(*message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsView {
    pub summary: Option<Summary>,
    pub rows: Vec<TableRow>,
    pub drivers: Listing<DriverCard>,
    pub assumptions: Listing<AssumptionCard>,
}

impl ResultsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been rendered since the last clear
    pub fn is_blank(&self) -> bool {
        self == &ResultsView::default()
    }
}

impl ResultSink for ResultsView {
    fn clear(&mut self) {
        *self = ResultsView::default();
    }

    fn summary(&mut self, summary: Summary) {
        self.summary = Some(summary);
    }

    fn table_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    fn driver_card(&mut self, card: DriverCard) {
        self.drivers.push(card);
    }

    fn assumption_card(&mut self, card: AssumptionCard) {
        self.assumptions.push(card);
    }

    fn empty_state(&mut self, section: Section, message: &'static str) {
        match section {
            Section::Drivers => self.drivers = Listing::Empty(message),
            Section::Assumptions => self.assumptions = Listing::Empty(message),
        }
    }
}
