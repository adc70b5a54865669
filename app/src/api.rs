//! Browser-side service wiring
//!
//! Builds the request controller against the page origin and provides the
//! save-as target used for spreadsheet exports.

use dioxus::prelude::*;
use dioxus_logger::tracing;
use stratfin_core::{
    Dashboard, DashboardHandle, ExportFile, HttpModelApi, RequestController, ResultsView,
    SaveError, SaveTarget,
};
use stratfin_types::ClientConfig;
use wasm_bindgen::prelude::*;

use crate::components::charts_panel::EChartsBackend;

/// Dashboard type shared through context
pub type AppDashboard = Dashboard<ResultsView, EChartsBackend>;

pub type Controller = RequestController<HttpModelApi>;

// ─────────────────────────────────────────────────────────────────────────────
// Service Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the service hosting this page.
///
/// The frontend is served by the modeling service itself, so the API lives at
/// the page origin.
pub fn service_config() -> ClientConfig {
    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    match origin {
        Some(origin) if origin.starts_with("http") => ClientConfig {
            api_base_url: origin,
            ..Default::default()
        },
        _ => ClientConfig::default(),
    }
}

pub fn controller(config: &ClientConfig) -> Result<Controller, String> {
    let api = HttpModelApi::from_config(config).map_err(|e| e.to_string())?;
    tracing::info!(base_url = %api.base_url(), "modeling service configured");
    Ok(RequestController::new(api))
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard Handle
// ─────────────────────────────────────────────────────────────────────────────

/// [`DashboardHandle`] over the dashboard signal.
///
/// Each access takes a short write borrow, so the signal is never held across
/// an await inside a request.
#[derive(Clone, Copy)]
pub struct SignalDashboard(pub Signal<AppDashboard>);

impl DashboardHandle for SignalDashboard {
    type Sink = ResultsView;
    type Backend = EChartsBackend;

    fn with_dashboard<R>(&self, f: impl FnOnce(&mut AppDashboard) -> R) -> R {
        let mut signal = self.0;
        let mut dashboard = signal.write();
        f(&mut *dashboard)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Browser Download
// ─────────────────────────────────────────────────────────────────────────────

/// Saves exports through a temporary object URL and a synthetic link click.
pub struct BrowserDownload;

impl SaveTarget for BrowserDownload {
    fn save(&self, file: &ExportFile) -> Result<String, SaveError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| SaveError::Browser("no document available".to_string()))?;

        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(file.content_type());
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_error)?;

        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_error)?;
        let anchor: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| SaveError::Browser("could not create download link".to_string()))?;
        anchor.set_href(&url);
        anchor.set_download(&file.file_name);
        anchor.click();

        // The download has already started; the object URL is no longer needed
        web_sys::Url::revoke_object_url(&url).map_err(js_error)?;
        Ok(file.file_name.clone())
    }
}

fn js_error(value: JsValue) -> SaveError {
    SaveError::Browser(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
