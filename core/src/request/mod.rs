//! Request orchestration
//!
//! [`RequestController`] is the only component that talks to the modeling
//! service. It drives a [`Dashboard`] through each request:
//!
//! ```text
//!   submit_query:  validate ──► begin_request ──► api.search ──┬─► show_model ──┐
//!                                                              └─► show_error ──┴─► finish_request
//!   export_excel:  model id ──► api.export_excel ──► SaveTarget::save
//! ```
//!
//! The dashboard is only borrowed inside [`DashboardHandle::with_dashboard`]
//! closures, never across an await. Concurrent submissions are not sequenced:
//! whichever search resolves last decides the displayed model.

mod error;
mod http;

#[cfg(test)]
mod request_tests;

pub use error::{
    ApiError, EMPTY_QUERY_MESSAGE, EXPORT_FAILED_MESSAGE, NETWORK_ERROR_MESSAGE, RequestError,
    SEARCH_FAILED_MESSAGE, SaveError,
};
pub use http::HttpModelApi;

use stratfin_types::{DriverCatalog, ExportOptions, HealthStatus, Model, SearchParams};

use crate::dashboard::DashboardHandle;

/// MIME type used when the service does not name one
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Binary artifact returned by the export endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(XLSX_CONTENT_TYPE)
    }
}

/// Network collaborator for the modeling service.
#[allow(async_fn_in_trait)]
pub trait ModelApi {
    async fn search(&self, query: &str, params: &SearchParams) -> Result<Model, ApiError>;

    async fn export_excel(
        &self,
        model_id: &str,
        options: ExportOptions,
    ) -> Result<ExportFile, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;

    async fn revenue_drivers(&self) -> Result<DriverCatalog, ApiError>;
}

/// Destination for exported files (disk, browser download).
pub trait SaveTarget {
    /// Persist `file` and describe where it went
    fn save(&self, file: &ExportFile) -> Result<String, SaveError>;
}

pub struct RequestController<A> {
    api: A,
    /// Overrides applied when the caller leaves a field unset
    defaults: SearchParams,
}

impl<A: ModelApi> RequestController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            defaults: SearchParams::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: SearchParams) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run a search and show its outcome on `dashboard`.
    ///
    /// An empty query is rejected locally without touching the network or
    /// the loading flag. Otherwise loading is always cleared last, whatever
    /// the outcome.
    pub async fn submit_query<H: DashboardHandle + ?Sized>(
        &self,
        dashboard: &H,
        query: &str,
        params: &SearchParams,
    ) -> Result<(), RequestError> {
        let query = query.trim();
        if query.is_empty() {
            dashboard.with_dashboard(|d| d.show_error(EMPTY_QUERY_MESSAGE));
            return Err(RequestError::EmptyQuery);
        }

        let params = self.effective_params(params);
        dashboard.with_dashboard(|d| d.begin_request());
        tracing::debug!(query, overrides = params.query_pairs().len(), "submitting search");

        let outcome = match self.api.search(query, &params).await {
            Ok(model) => {
                tracing::info!(
                    model_id = %model.model_id,
                    months = model.horizon_months(),
                    "model generated"
                );
                dashboard.with_dashboard(|d| d.show_model(model));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "search failed");
                let message = err.user_message();
                dashboard.with_dashboard(|d| d.show_error(message));
                Err(RequestError::Search(err))
            }
        };

        dashboard.with_dashboard(|d| d.finish_request());
        outcome
    }

    /// Export the model currently shown on `dashboard`.
    pub async fn export_current<H, T>(
        &self,
        dashboard: &H,
        options: ExportOptions,
        target: &T,
    ) -> Result<String, RequestError>
    where
        H: DashboardHandle + ?Sized,
        T: SaveTarget + ?Sized,
    {
        let Some(model_id) = dashboard.with_dashboard(|d| d.model_id()) else {
            tracing::warn!("export requested with no model loaded");
            return Err(RequestError::NoModel);
        };
        self.export_excel(&model_id, options, target).await
    }

    /// Fetch the workbook for `model_id` and hand it to `target`.
    ///
    /// Failures never touch the dashboard error state; callers surface them
    /// as a transient notification.
    pub async fn export_excel<T: SaveTarget + ?Sized>(
        &self,
        model_id: &str,
        options: ExportOptions,
        target: &T,
    ) -> Result<String, RequestError> {
        let file = self
            .api
            .export_excel(model_id, options)
            .await
            .map_err(|source| {
                tracing::warn!(model_id, error = %source, "export failed");
                RequestError::Export {
                    model_id: model_id.to_string(),
                    source,
                }
            })?;

        let location = target.save(&file).map_err(|source| {
            tracing::error!(file = %file.file_name, error = %source, "failed to save export");
            RequestError::Save {
                file_name: file.file_name.clone(),
                source,
            }
        })?;

        tracing::info!(model_id, bytes = file.bytes.len(), %location, "export saved");
        Ok(location)
    }

    pub async fn check_health(&self) -> Result<HealthStatus, RequestError> {
        self.api.health().await.map_err(RequestError::Health)
    }

    /// Catalogue of drivers the service understands
    pub async fn revenue_drivers(&self) -> Result<DriverCatalog, RequestError> {
        self.api
            .revenue_drivers()
            .await
            .map_err(RequestError::Drivers)
    }

    fn effective_params(&self, params: &SearchParams) -> SearchParams {
        SearchParams {
            months: params.months.or(self.defaults.months),
            initial_sales_people: params
                .initial_sales_people
                .or(self.defaults.initial_sales_people),
            marketing_spend_monthly: params
                .marketing_spend_monthly
                .or(self.defaults.marketing_spend_monthly),
            large_customer_revenue_monthly: params
                .large_customer_revenue_monthly
                .or(self.defaults.large_customer_revenue_monthly),
        }
    }
}
