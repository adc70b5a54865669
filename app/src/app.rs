#![allow(non_snake_case)]

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_logger::tracing;
use stratfin_core::{Dashboard, ResultsView};
use stratfin_types::SearchParams;

use crate::api::{self, BrowserDownload, SignalDashboard};
use crate::components::charts_panel::EChartsBackend;
use crate::components::{ResultsPanel, SearchForm, ToastFrame, use_toast_provider};

static CSS: Asset = asset!("/assets/styles.css");

const ECHARTS_JS: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

// ─────────────────────────────────────────────────────────────────────────────
// Service Status
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServiceStatus {
    Checking,
    Online,
    Offline,
}

impl ServiceStatus {
    fn label(self) -> &'static str {
        match self {
            ServiceStatus::Checking => "Connecting...",
            ServiceStatus::Online => "Service online",
            ServiceStatus::Offline => "Service unreachable",
        }
    }

    fn class(self) -> &'static str {
        match self {
            ServiceStatus::Checking => "status-badge",
            ServiceStatus::Online => "status-badge online",
            ServiceStatus::Offline => "status-badge offline",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Component
// ─────────────────────────────────────────────────────────────────────────────

pub fn App() -> Element {
    let mut dashboard = use_context_provider(|| {
        Signal::new(Dashboard::new(ResultsView::new(), EChartsBackend))
    });
    let mut toast = use_toast_provider();

    let config = use_hook(api::service_config);
    let controller = use_hook(|| api::controller(&config).map(Rc::new));
    let export_options = config.export_options();

    let mut status = use_signal(|| ServiceStatus::Checking);
    let mut exporting = use_signal(|| false);

    // Probe the service once on mount
    let health_controller = controller.clone();
    use_future(move || {
        let controller = health_controller.clone();
        async move {
            let Ok(controller) = controller else {
                status.set(ServiceStatus::Offline);
                return;
            };
            match controller.check_health().await {
                Ok(health) if health.is_healthy() => status.set(ServiceStatus::Online),
                Ok(health) => {
                    tracing::warn!(status = %health.status, message = %health.message, "service unhealthy");
                    status.set(ServiceStatus::Offline);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "health check failed");
                    status.set(ServiceStatus::Offline);
                }
            }
        }
    });

    let search_controller = controller.clone();
    let on_search = move |(query, params): (String, SearchParams)| {
        let Ok(controller) = search_controller.clone() else {
            return;
        };
        spawn(async move {
            let handle = SignalDashboard(dashboard);
            if let Err(err) = controller.submit_query(&handle, &query, &params).await {
                tracing::debug!(error = %err, "search produced no model");
            }
        });
    };

    let export_controller = controller.clone();
    let on_export = move |_| {
        let Ok(controller) = export_controller.clone() else {
            return;
        };
        exporting.set(true);
        spawn(async move {
            let handle = SignalDashboard(dashboard);
            match controller
                .export_current(&handle, export_options, &BrowserDownload)
                .await
            {
                Ok(file_name) => toast.info(format!("Downloaded {file_name}")),
                Err(err) => {
                    tracing::warn!(error = %err, "export failed");
                    toast.error(err.user_message());
                }
            }
            exporting.set(false);
        });
    };

    let on_reset = move |_| dashboard.write().reset();

    let state = dashboard.read().state().clone();
    let setup_error = controller.as_ref().err().cloned();

    rsx! {
        link { rel: "stylesheet", href: CSS }
        document::Script { src: ECHARTS_JS }

        div { class: "app",
            header { class: "app-header",
                h1 { "Financial Scenario Modeler" }
                span { class: status().class(), "{status().label()}" }
            }

            main { class: "app-main",
                SearchForm { loading: state.is_loading, on_submit: on_search }

                if let Some(err) = setup_error {
                    div { class: "error-banner", role: "alert",
                        span { "Service configuration error: {err}" }
                    }
                }

                if state.is_loading {
                    div { class: "loading",
                        div { class: "spinner" }
                        span { "Generating financial model..." }
                    }
                }

                if let Some(message) = state.error_message.clone() {
                    div { class: "error-banner", role: "alert",
                        span { "{message}" }
                        button {
                            class: "error-dismiss",
                            onclick: move |_| dashboard.write().clear_error(),
                            "×"
                        }
                    }
                }

                ResultsPanel {
                    exporting: exporting(),
                    on_export: on_export,
                    on_reset: on_reset,
                }
            }

            ToastFrame {}
        }
    }
}
