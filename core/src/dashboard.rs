//! Dashboard composition
//!
//! One [`Dashboard`] exists per view. It owns the [`ModelStore`], the result
//! sink and the [`ChartCoordinator`], and after each mutation performs exactly
//! the renders needed to keep them consistent.
//!
//! ```text
//!   begin_request ──► loading on, error cleared
//!   show_model    ──► store.set_model ──► render_results ──► charts (render | release)
//!   show_error    ──► store.set_error                         (views untouched)
//!   finish_request──► loading off
//!   select_tab    ──► tabs::transition ──► ChartAction
//!   reset         ──► store.reset ──► clear_results ──► charts.dispose_all
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use stratfin_types::{Model, ResultTab};

use crate::charts::{ChartBackend, ChartCoordinator};
use crate::render::{ResultSink, clear_results, render_results};
use crate::store::{ModelStore, UiState};
use crate::tabs::{ChartAction, transition};

pub struct Dashboard<S: ResultSink, B: ChartBackend> {
    store: ModelStore,
    sink: S,
    charts: ChartCoordinator<B>,
}

impl<S: ResultSink, B: ChartBackend> Dashboard<S, B> {
    pub fn new(sink: S, backend: B) -> Self {
        Self {
            store: ModelStore::new(),
            sink,
            charts: ChartCoordinator::new(backend),
        }
    }

    pub fn state(&self) -> &UiState {
        self.store.state()
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn charts(&self) -> &ChartCoordinator<B> {
        &self.charts
    }

    pub fn model(&self) -> Option<&Rc<Model>> {
        self.store.model()
    }

    /// Id of the model currently displayed
    pub fn model_id(&self) -> Option<String> {
        self.store.model().map(|m| m.model_id.clone())
    }

    pub fn begin_request(&mut self) {
        self.store.set_loading(true);
        self.store.set_error(None);
    }

    /// Replace the model and redraw everything that depends on it.
    pub fn show_model(&mut self, model: Model) {
        let model = self.store.set_model(model);
        render_results(&model, &mut self.sink);

        if self.store.state().active_tab == ResultTab::Charts
            && !model.monthly_projections.is_empty()
        {
            self.charts.render(&model.monthly_projections);
        } else {
            // Rebuilt from the new data on the next visit to the charts tab
            self.charts.dispose_all();
        }
    }

    /// Record an error. The displayed model, if any, stays.
    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "showing error");
        self.store.set_error(Some(message));
    }

    pub fn clear_error(&mut self) {
        self.store.set_error(None);
    }

    pub fn finish_request(&mut self) {
        self.store.set_loading(false);
    }

    /// Activate `tab` and run whatever the chart coordinator needs for it.
    pub fn select_tab(&mut self, tab: ResultTab) -> ChartAction {
        let step = transition(
            self.store.state().active_tab,
            tab,
            self.store.model().is_some(),
            self.charts.is_live(),
        );
        self.store.set_active_tab(step.next);

        match step.charts {
            ChartAction::Render => {
                if let Some(model) = self.store.model().cloned() {
                    self.charts.render(&model.monthly_projections);
                }
            }
            ChartAction::Resize => self.charts.resize(),
            ChartAction::None => {}
        }
        step.charts
    }

    /// Fit live chart widgets to their containers.
    pub fn resize_charts(&mut self) {
        self.charts.resize();
    }

    /// Release every chart widget, e.g. when the chart containers unmount.
    pub fn release_charts(&mut self) {
        self.charts.dispose_all();
    }

    /// Drop the model and everything rendered from it.
    pub fn reset(&mut self) {
        self.store.reset();
        clear_results(&mut self.sink);
        self.charts.dispose_all();
    }
}

/// Shared access to a [`Dashboard`] that can be re-borrowed after an await.
///
/// Request flows only hold the dashboard for the duration of a closure, so no
/// borrow is ever held across a suspension point.
pub trait DashboardHandle {
    type Sink: ResultSink;
    type Backend: ChartBackend;

    fn with_dashboard<R>(&self, f: impl FnOnce(&mut Dashboard<Self::Sink, Self::Backend>) -> R)
    -> R;
}

impl<S: ResultSink, B: ChartBackend> DashboardHandle for RefCell<Dashboard<S, B>> {
    type Sink = S;
    type Backend = B;

    fn with_dashboard<R>(&self, f: impl FnOnce(&mut Dashboard<S, B>) -> R) -> R {
        let mut dashboard = self.borrow_mut();
        f(&mut *dashboard)
    }
}

impl<H: DashboardHandle + ?Sized> DashboardHandle for Rc<H> {
    type Sink = H::Sink;
    type Backend = H::Backend;

    fn with_dashboard<R>(
        &self,
        f: impl FnOnce(&mut Dashboard<Self::Sink, Self::Backend>) -> R,
    ) -> R {
        (**self).with_dashboard(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartSlot, ChartSpec};
    use crate::render::{NO_DRIVERS_MESSAGE, ResultsView};
    use serde_json::json;

    /// Counts live widgets and creations
    #[derive(Default)]
    struct CountingBackend {
        live: usize,
        created: usize,
        resized: usize,
    }

    impl ChartBackend for CountingBackend {
        type Widget = ChartSlot;

        fn create(&mut self, slot: ChartSlot) -> Option<ChartSlot> {
            self.live += 1;
            self.created += 1;
            Some(slot)
        }
        fn draw(&mut self, _: &mut ChartSlot, _: &ChartSpec) {}
        fn resize(&mut self, _: &mut ChartSlot) {
            self.resized += 1;
        }
        fn dispose(&mut self, _: ChartSlot) {
            self.live -= 1;
        }
    }

    fn dashboard() -> Dashboard<ResultsView, CountingBackend> {
        Dashboard::new(ResultsView::new(), CountingBackend::default())
    }

    fn model(id: &str, months: u32) -> Model {
        let projections: Vec<_> = (1..=months)
            .map(|m| json!({ "month": m, "total_revenue": m * 1000 }))
            .collect();
        serde_json::from_value(json!({
            "model_id": id,
            "monthly_projections": projections,
        }))
        .unwrap()
    }

    #[test]
    fn show_model_renders_results() {
        let mut d = dashboard();
        d.show_model(model("a", 3));

        assert_eq!(d.sink().rows.len(), 3);
        assert_eq!(d.sink().drivers.placeholder(), Some(NO_DRIVERS_MESSAGE));
        assert_eq!(d.model_id().as_deref(), Some("a"));
    }

    #[test]
    fn charts_are_built_lazily_on_first_visit() {
        let mut d = dashboard();
        d.show_model(model("a", 2));
        assert_eq!(d.charts().backend().created, 0);

        assert_eq!(d.select_tab(ResultTab::Charts), ChartAction::Render);
        assert_eq!(d.charts().backend().live, 3);

        d.select_tab(ResultTab::Table);
        assert_eq!(d.select_tab(ResultTab::Charts), ChartAction::Resize);
        assert_eq!(d.charts().backend().created, 3);
        assert_eq!(d.charts().backend().resized, 3);
    }

    #[test]
    fn new_model_on_charts_tab_replaces_widgets() {
        let mut d = dashboard();
        d.show_model(model("a", 2));
        d.select_tab(ResultTab::Charts);
        d.show_model(model("b", 4));

        assert_eq!(d.charts().backend().live, 3);
        assert_eq!(d.charts().backend().created, 6);
    }

    #[test]
    fn model_without_projections_clears_charts() {
        let mut d = dashboard();
        d.show_model(model("a", 1));
        d.select_tab(ResultTab::Charts);
        d.show_model(model("b", 0));

        assert_eq!(d.model_id().as_deref(), Some("b"));
        assert!(d.sink().rows.is_empty());
        assert!(!d.charts().is_live());
        assert_eq!(d.charts().backend().live, 0);
    }

    #[test]
    fn new_model_elsewhere_releases_stale_widgets() {
        let mut d = dashboard();
        d.show_model(model("a", 2));
        d.select_tab(ResultTab::Charts);
        d.select_tab(ResultTab::Drivers);
        d.show_model(model("b", 4));

        assert!(!d.charts().is_live());
        assert_eq!(d.select_tab(ResultTab::Charts), ChartAction::Render);
    }

    #[test]
    fn error_keeps_model_and_rendered_rows() {
        let mut d = dashboard();
        d.show_model(model("a", 2));
        d.begin_request();
        d.show_error("server said no");
        d.finish_request();

        assert_eq!(d.state().error_message.as_deref(), Some("server said no"));
        assert!(!d.state().is_loading);
        assert_eq!(d.model_id().as_deref(), Some("a"));
        assert_eq!(d.sink().rows.len(), 2);
    }

    #[test]
    fn begin_request_clears_previous_error() {
        let mut d = dashboard();
        d.show_error("old");
        d.begin_request();
        assert!(d.state().is_loading);
        assert_eq!(d.state().error_message, None);
    }

    #[test]
    fn reset_releases_everything() {
        let mut d = dashboard();
        d.show_model(model("a", 2));
        d.select_tab(ResultTab::Charts);
        d.reset();

        assert_eq!(d.state(), &UiState::default());
        assert!(d.sink().is_blank());
        assert_eq!(d.charts().backend().live, 0);
    }

    #[test]
    fn refcell_handle_gives_scoped_access() {
        let handle = RefCell::new(dashboard());
        handle.with_dashboard(|d| d.show_model(model("a", 1)));
        let id = handle.with_dashboard(|d| d.model_id());
        assert_eq!(id.as_deref(), Some("a"));
    }
}
