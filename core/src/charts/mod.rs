//! Chart coordination
//!
//! Owns the three revenue chart widgets and keeps them in step with the
//! current model's projections.
//!
//! ```text
//!   projections ──► revenue_series ──► chart_specs ──┬─► RevenueLine
//!                                                    ├─► RevenueBreakdown
//!                                                    └─► RevenueMillion
//! ```
//!
//! Each slot holds at most one live widget. A slot's previous widget is
//! disposed before its replacement is created, and all widgets are released
//! when the coordinator is dropped.

mod series;


pub use series::{
    ChartKind, ChartSpec, RevenueSeries, SeriesSpec, chart_specs, revenue_series, to_millions,
};

use stratfin_types::Projection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    /// Total revenue in dollars
    RevenueLine,
    /// Large vs small customer revenue
    RevenueBreakdown,
    /// Total revenue in millions
    RevenueMillion,
}

impl ChartSlot {
    pub fn all() -> &'static [ChartSlot] {
        &[
            ChartSlot::RevenueLine,
            ChartSlot::RevenueBreakdown,
            ChartSlot::RevenueMillion,
        ]
    }

    /// DOM id of the container the widget is drawn into
    pub fn element_id(&self) -> &'static str {
        match self {
            ChartSlot::RevenueLine => "chart-revenue",
            ChartSlot::RevenueBreakdown => "chart-revenue-breakdown",
            ChartSlot::RevenueMillion => "chart-revenue-millions",
        }
    }
}

/// Drawing surface for chart widgets (ECharts in the browser, text in the terminal).
pub trait ChartBackend {
    type Widget;

    /// Create a widget for `slot`. Returns `None` when the slot's target is unavailable.
    fn create(&mut self, slot: ChartSlot) -> Option<Self::Widget>;

    fn draw(&mut self, widget: &mut Self::Widget, spec: &ChartSpec);

    /// Fit the widget to its container after a layout change
    fn resize(&mut self, widget: &mut Self::Widget);

    /// Release the widget and everything it holds
    fn dispose(&mut self, widget: Self::Widget);
}

/// Live widget per slot.
#[derive(Debug)]
pub struct ChartHandles<W> {
    pub revenue_line: Option<W>,
    pub revenue_breakdown: Option<W>,
    pub revenue_million: Option<W>,
}

impl<W> Default for ChartHandles<W> {
    fn default() -> Self {
        Self {
            revenue_line: None,
            revenue_breakdown: None,
            revenue_million: None,
        }
    }
}

impl<W> ChartHandles<W> {
    pub fn get(&self, slot: ChartSlot) -> Option<&W> {
        match slot {
            ChartSlot::RevenueLine => self.revenue_line.as_ref(),
            ChartSlot::RevenueBreakdown => self.revenue_breakdown.as_ref(),
            ChartSlot::RevenueMillion => self.revenue_million.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: ChartSlot) -> &mut Option<W> {
        match slot {
            ChartSlot::RevenueLine => &mut self.revenue_line,
            ChartSlot::RevenueBreakdown => &mut self.revenue_breakdown,
            ChartSlot::RevenueMillion => &mut self.revenue_million,
        }
    }

    pub fn live_count(&self) -> usize {
        ChartSlot::all()
            .iter()
            .filter(|slot| self.get(**slot).is_some())
            .count()
    }
}

pub struct ChartCoordinator<B: ChartBackend> {
    backend: B,
    handles: ChartHandles<B::Widget>,
}

impl<B: ChartBackend> ChartCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handles: ChartHandles::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn handles(&self) -> &ChartHandles<B::Widget> {
        &self.handles
    }

    /// True when at least one widget is live
    pub fn is_live(&self) -> bool {
        self.handles.live_count() > 0
    }

    /// Rebuild every chart from `projections`.
    ///
    /// An empty sequence is a no-op: existing widgets are left as they are.
    /// Returns the number of widgets drawn.
    pub fn render(&mut self, projections: &[Projection]) -> usize {
        if projections.is_empty() {
            tracing::debug!("no projections, skipping chart render");
            return 0;
        }

        let specs = chart_specs(&revenue_series(projections));
        let mut drawn = 0;
        for spec in &specs {
            let slot = self.handles.slot_mut(spec.slot);
            if let Some(previous) = slot.take() {
                self.backend.dispose(previous);
            }
            match self.backend.create(spec.slot) {
                Some(mut widget) => {
                    self.backend.draw(&mut widget, spec);
                    *slot = Some(widget);
                    drawn += 1;
                }
                None => {
                    tracing::warn!(slot = ?spec.slot, "chart target unavailable");
                }
            }
        }
        tracing::debug!(drawn, points = projections.len(), "rendered charts");
        drawn
    }

    /// Resize live widgets without rebuilding them.
    pub fn resize(&mut self) {
        for slot in ChartSlot::all() {
            if let Some(widget) = self.handles.slot_mut(*slot).as_mut() {
                self.backend.resize(widget);
            }
        }
    }

    /// Dispose every live widget.
    pub fn dispose_all(&mut self) {
        for slot in ChartSlot::all() {
            if let Some(widget) = self.handles.slot_mut(*slot).take() {
                self.backend.dispose(widget);
            }
        }
    }
}

impl<B: ChartBackend> Drop for ChartCoordinator<B> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
