//! Tests for request orchestration
//!
//! Drives [`RequestController`] against a scripted [`ModelApi`] and checks
//! the loading/error/model sequence each outcome leaves on the dashboard.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::json;
use stratfin_types::ResultTab;

use super::*;
use crate::charts::{ChartBackend, ChartSlot, ChartSpec};
use crate::dashboard::Dashboard;
use crate::render::ResultsView;

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct NullCharts;

impl ChartBackend for NullCharts {
    type Widget = ChartSlot;

    fn create(&mut self, slot: ChartSlot) -> Option<ChartSlot> {
        Some(slot)
    }
    fn draw(&mut self, _: &mut ChartSlot, _: &ChartSpec) {}
    fn resize(&mut self, _: &mut ChartSlot) {}
    fn dispose(&mut self, _: ChartSlot) {}
}

type TestDashboard = RefCell<Dashboard<ResultsView, NullCharts>>;

fn dashboard() -> Rc<TestDashboard> {
    Rc::new(RefCell::new(Dashboard::new(ResultsView::new(), NullCharts)))
}

fn model(id: &str) -> Model {
    serde_json::from_value(json!({
        "model_id": id,
        "monthly_projections": [
            { "month": 1, "total_revenue": 25000 },
            { "month": 2, "total_revenue": 50000 }
        ],
        "revenue_drivers": [ { "name": "marketing_spend", "value": 200000 } ],
        "assumptions": { "months": 2 }
    }))
    .unwrap()
}

fn server_error(detail: Option<&str>) -> ApiError {
    ApiError::Status {
        status: 400,
        detail: detail.map(str::to_string),
    }
}

/// Scripted service. Records every call and, when given a dashboard, the
/// loading flag seen while the search was in flight.
#[derive(Default)]
struct FakeApi {
    searches: RefCell<VecDeque<Result<Model, ApiError>>>,
    export: RefCell<Option<Result<ExportFile, ApiError>>>,
    calls: RefCell<Vec<String>>,
    observed: Option<Rc<TestDashboard>>,
    loading_during_search: Cell<Option<bool>>,
}

impl FakeApi {
    fn with_search(result: Result<Model, ApiError>) -> Self {
        let api = FakeApi::default();
        api.searches.borrow_mut().push_back(result);
        api
    }

    fn observing(mut self, dashboard: &Rc<TestDashboard>) -> Self {
        self.observed = Some(Rc::clone(dashboard));
        self
    }
}

impl ModelApi for FakeApi {
    async fn search(&self, query: &str, params: &SearchParams) -> Result<Model, ApiError> {
        let pairs: Vec<String> = params
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        self.calls
            .borrow_mut()
            .push(format!("search:{query}:{}", pairs.join("&")));

        if let Some(observed) = &self.observed {
            self.loading_during_search
                .set(Some(observed.borrow().state().is_loading));
        }

        self.searches
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(server_error(None)))
    }

    async fn export_excel(
        &self,
        model_id: &str,
        options: ExportOptions,
    ) -> Result<ExportFile, ApiError> {
        self.calls
            .borrow_mut()
            .push(format!("export:{model_id}:{:?}", options.auto_open));
        self.export.borrow_mut().take().unwrap_or_else(|| {
            Err(ApiError::Transport {
                endpoint: "/api/v1/export/excel".into(),
                reason: "unscripted".into(),
            })
        })
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "healthy".into(),
            message: "Service is running".into(),
        })
    }

    async fn revenue_drivers(&self) -> Result<DriverCatalog, ApiError> {
        Err(ApiError::Decode {
            endpoint: "/api/v1/revenue-drivers".into(),
            reason: "unexpected".into(),
        })
    }
}

/// In-memory save target
#[derive(Default)]
struct MemorySave {
    saved: RefCell<Vec<ExportFile>>,
    fail: bool,
}

impl SaveTarget for MemorySave {
    fn save(&self, file: &ExportFile) -> Result<String, SaveError> {
        if self.fail {
            return Err(SaveError::Browser("download blocked".into()));
        }
        self.saved.borrow_mut().push(file.clone());
        Ok(file.file_name.clone())
    }
}

fn workbook(model_id: &str) -> ExportFile {
    ExportFile {
        file_name: stratfin_types::export_file_name(model_id),
        content_type: None,
        bytes: vec![0x50, 0x4b, 0x03, 0x04],
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Search
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn empty_query_fails_fast_without_network() {
    let dashboard = dashboard();
    let controller = RequestController::new(FakeApi::default());

    let result = controller
        .submit_query(&dashboard, "   \n", &SearchParams::default())
        .await;

    assert!(matches!(result, Err(RequestError::EmptyQuery)));
    assert!(controller.api().calls.borrow().is_empty());
    let state = dashboard.borrow().state().clone();
    assert_eq!(state.error_message.as_deref(), Some(EMPTY_QUERY_MESSAGE));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn successful_search_shows_model_and_clears_loading() {
    let dashboard = dashboard();
    let api = FakeApi::with_search(Ok(model("m-1"))).observing(&dashboard);
    let controller = RequestController::new(api);

    controller
        .submit_query(&dashboard, "  SaaS startup  ", &SearchParams::default())
        .await
        .unwrap();

    assert_eq!(controller.api().loading_during_search.get(), Some(true));
    let d = dashboard.borrow();
    assert!(!d.state().is_loading);
    assert_eq!(d.state().error_message, None);
    assert_eq!(d.model_id().as_deref(), Some("m-1"));
    assert_eq!(d.sink().rows.len(), 2);
    assert_eq!(controller.api().calls.borrow()[0], "search:SaaS startup:");
}

#[tokio::test]
async fn failed_search_keeps_previous_model() {
    let dashboard = dashboard();
    dashboard.borrow_mut().show_model(model("good"));

    let api = FakeApi::with_search(Err(server_error(Some("Could not parse query"))));
    let controller = RequestController::new(api);
    let result = controller
        .submit_query(&dashboard, "nonsense", &SearchParams::default())
        .await;

    assert!(matches!(result, Err(RequestError::Search(_))));
    let d = dashboard.borrow();
    assert_eq!(d.model_id().as_deref(), Some("good"));
    assert_eq!(d.state().error_message.as_deref(), Some("Could not parse query"));
    assert!(!d.state().is_loading);
    assert_eq!(d.sink().rows.len(), 2);
}

#[tokio::test]
async fn failure_without_detail_uses_generic_message() {
    let dashboard = dashboard();
    let controller = RequestController::new(FakeApi::with_search(Err(server_error(None))));

    let _ = controller
        .submit_query(&dashboard, "q", &SearchParams::default())
        .await;

    assert_eq!(
        dashboard.borrow().state().error_message.as_deref(),
        Some(SEARCH_FAILED_MESSAGE)
    );
}

#[tokio::test]
async fn transport_failure_uses_network_message() {
    let dashboard = dashboard();
    let controller = RequestController::new(FakeApi::with_search(Err(ApiError::Transport {
        endpoint: "/api/v1/search".into(),
        reason: "connection refused".into(),
    })));

    let _ = controller
        .submit_query(&dashboard, "q", &SearchParams::default())
        .await;

    let d = dashboard.borrow();
    assert_eq!(d.state().error_message.as_deref(), Some(NETWORK_ERROR_MESSAGE));
    assert!(!d.state().is_loading);
}

#[tokio::test]
async fn next_search_clears_previous_error() {
    let dashboard = dashboard();
    let api = FakeApi::default();
    api.searches.borrow_mut().push_back(Err(server_error(Some("bad"))));
    api.searches.borrow_mut().push_back(Ok(model("second")));
    let controller = RequestController::new(api);

    let _ = controller
        .submit_query(&dashboard, "first", &SearchParams::default())
        .await;
    controller
        .submit_query(&dashboard, "second", &SearchParams::default())
        .await
        .unwrap();

    let d = dashboard.borrow();
    assert_eq!(d.state().error_message, None);
    assert_eq!(d.model_id().as_deref(), Some("second"));
}

#[tokio::test]
async fn only_supplied_overrides_are_sent() {
    let dashboard = dashboard();
    let controller = RequestController::new(FakeApi::with_search(Ok(model("m"))))
        .with_defaults(SearchParams {
            months: Some(12),
            ..Default::default()
        });

    let params = SearchParams {
        initial_sales_people: Some(3),
        ..Default::default()
    };
    controller
        .submit_query(&dashboard, "q", &params)
        .await
        .unwrap();

    assert_eq!(
        controller.api().calls.borrow()[0],
        "search:q:months=12&initial_sales_people=3"
    );
}

#[tokio::test]
async fn search_result_rebuilds_charts_when_tab_is_active() {
    let dashboard = dashboard();
    dashboard.borrow_mut().show_model(model("first"));
    dashboard.borrow_mut().select_tab(ResultTab::Charts);

    let controller = RequestController::new(FakeApi::with_search(Ok(model("second"))));
    controller
        .submit_query(&dashboard, "q", &SearchParams::default())
        .await
        .unwrap();

    let d = dashboard.borrow();
    assert_eq!(d.state().active_tab, ResultTab::Charts);
    assert_eq!(d.charts().handles().live_count(), 3);
}

// ═══════════════════════════════════════════════════════════════════════════
// Export
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn export_saves_named_workbook() {
    let api = FakeApi::default();
    *api.export.borrow_mut() = Some(Ok(workbook("m-9")));
    let controller = RequestController::new(api);
    let target = MemorySave::default();

    let location = controller
        .export_excel("m-9", ExportOptions::default(), &target)
        .await
        .unwrap();

    assert_eq!(location, "financial_model_m-9.xlsx");
    assert_eq!(target.saved.borrow().len(), 1);
    assert_eq!(target.saved.borrow()[0].content_type(), XLSX_CONTENT_TYPE);
    assert_eq!(controller.api().calls.borrow()[0], "export:m-9:None");
}

#[tokio::test]
async fn export_failure_delivers_no_file() {
    let controller = RequestController::new(FakeApi::default());
    let target = MemorySave::default();

    let err = controller
        .export_excel("m-9", ExportOptions { auto_open: Some(false) }, &target)
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::Export { .. }));
    assert_eq!(err.user_message(), EXPORT_FAILED_MESSAGE);
    assert!(target.saved.borrow().is_empty());
    assert_eq!(controller.api().calls.borrow()[0], "export:m-9:Some(false)");
}

#[tokio::test]
async fn save_failure_is_reported() {
    let api = FakeApi::default();
    *api.export.borrow_mut() = Some(Ok(workbook("m-9")));
    let controller = RequestController::new(api);
    let target = MemorySave {
        fail: true,
        ..Default::default()
    };

    let err = controller
        .export_excel("m-9", ExportOptions::default(), &target)
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::Save { .. }));
}

#[tokio::test]
async fn export_current_requires_a_model() {
    let dashboard = dashboard();
    let controller = RequestController::new(FakeApi::default());

    let err = controller
        .export_current(&dashboard, ExportOptions::default(), &MemorySave::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::NoModel));
    assert!(controller.api().calls.borrow().is_empty());
}

#[tokio::test]
async fn export_current_uses_displayed_model_and_leaves_error_state() {
    let dashboard = dashboard();
    dashboard.borrow_mut().show_model(model("shown"));
    let controller = RequestController::new(FakeApi::default());

    let result = controller
        .export_current(&dashboard, ExportOptions::default(), &MemorySave::default())
        .await;

    assert!(result.is_err());
    assert_eq!(controller.api().calls.borrow()[0], "export:shown:None");
    assert_eq!(dashboard.borrow().state().error_message, None);
}

// ═══════════════════════════════════════════════════════════════════════════
// Service Metadata
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn health_passes_through() {
    let controller = RequestController::new(FakeApi::default());
    let health = controller.check_health().await.unwrap();
    assert!(health.is_healthy());
}

#[tokio::test]
async fn driver_catalogue_failure_is_wrapped() {
    let controller = RequestController::new(FakeApi::default());
    let err = controller.revenue_drivers().await.unwrap_err();
    assert!(matches!(err, RequestError::Drivers(ApiError::Decode { .. })));
    assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
}
