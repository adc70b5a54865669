use std::cell::RefCell;

use stratfin_core::{ApiError, Dashboard, HttpModelApi, RequestController, ResultsView};
use stratfin_types::{ClientConfig, SearchParams};

use crate::charts::TextCharts;

pub type CliDashboard = Dashboard<ResultsView, TextCharts>;

/// Holds all state for one CLI session.
/// The dashboard keeps the last model so `show` and `export` can reuse it.
pub struct CliContext {
    pub config: ClientConfig,
    pub controller: RequestController<HttpModelApi>,
    pub dashboard: RefCell<CliDashboard>,
}

impl CliContext {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let api = HttpModelApi::from_config(&config)?;
        let controller = RequestController::new(api).with_defaults(SearchParams {
            months: config.default_months,
            ..Default::default()
        });

        Ok(Self {
            config,
            controller,
            dashboard: RefCell::new(Dashboard::new(ResultsView::new(), TextCharts::from_env())),
        })
    }
}
