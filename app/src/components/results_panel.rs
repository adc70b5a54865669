//! Result panes
//!
//! Summary header, tab strip and the four panes. Every pane stays mounted and
//! only the active one is shown, so switching tabs never leaves zero or two
//! panes visible.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use stratfin_core::ChartAction;
use stratfin_core::render::TableRow;
use stratfin_types::ResultTab;

use crate::api::AppDashboard;
use crate::components::charts_panel::ChartsPanel;

/// Activate `tab`, then fit any charts it touched once the pane is visible.
fn select_tab(mut dashboard: Signal<AppDashboard>, tab: ResultTab) {
    let action = dashboard.write().select_tab(tab);
    if action != ChartAction::None {
        spawn(async move {
            TimeoutFuture::new(50).await;
            dashboard.write().resize_charts();
        });
    }
}

#[component]
pub fn ResultsPanel(
    exporting: bool,
    on_export: EventHandler<()>,
    on_reset: EventHandler<()>,
) -> Element {
    let dashboard = use_context::<Signal<AppDashboard>>();

    let d = dashboard.read();
    let active = d.state().active_tab;
    let view = d.sink();
    let pane_class = |tab: ResultTab| {
        if tab == active { "pane" } else { "pane hidden" }
    };

    rsx! {
        section { class: if view.summary.is_some() { "results" } else { "results hidden" },
            if let Some(summary) = &view.summary {
                header { class: "results-header",
                    div { class: "summary",
                        span { class: "summary-id", "Model {summary.model_id}" }
                        span { class: "summary-item", "{summary.horizon_months} months" }
                        span { class: "summary-item", "Final month revenue: {summary.terminal_revenue}" }
                    }
                    div { class: "results-actions",
                        button {
                            class: "btn-secondary",
                            disabled: exporting,
                            onclick: move |_| on_export.call(()),
                            if exporting { "Exporting..." } else { "Export to Excel" }
                        }
                        button {
                            class: "btn-link",
                            onclick: move |_| on_reset.call(()),
                            "New query"
                        }
                    }
                }
            }

            nav { class: "tab-strip", role: "tablist",
                for &tab in ResultTab::all() {
                    button {
                        key: "{tab.key()}",
                        role: "tab",
                        class: if tab == active { "tab active" } else { "tab" },
                        "aria-selected": tab == active,
                        onclick: move |_| select_tab(dashboard, tab),
                        "{tab.label()}"
                    }
                }
            }

            div { id: "pane-table", class: pane_class(ResultTab::Table),
                table { class: "projection-table",
                    thead {
                        tr {
                            for header in TableRow::HEADERS {
                                th { "{header}" }
                            }
                        }
                    }
                    tbody {
                        for (i, row) in view.rows.iter().enumerate() {
                            tr { key: "{i}",
                                for cell in row.cells() {
                                    td { "{cell}" }
                                }
                            }
                        }
                    }
                }
            }

            div { id: "pane-drivers", class: pane_class(ResultTab::Drivers),
                if let Some(message) = view.drivers.placeholder() {
                    div { class: "empty-state", "{message}" }
                } else {
                    div { class: "card-grid",
                        for (i, card) in view.drivers.items().iter().enumerate() {
                            div { key: "{i}", class: "card driver-card",
                                h4 { "{card.title}" }
                                dl {
                                    dt { "Type" }
                                    dd { "{card.kind}" }
                                    dt { "Value" }
                                    dd { "{card.value}" }
                                    dt { "Unit" }
                                    dd { "{card.unit}" }
                                    if let Some(unit) = &card.business_unit {
                                        dt { "Business unit" }
                                        dd { "{unit}" }
                                    }
                                }
                                if let Some(formula) = &card.formula {
                                    code { class: "formula", "{formula}" }
                                }
                            }
                        }
                    }
                }
            }

            div { id: "pane-assumptions", class: pane_class(ResultTab::Assumptions),
                if let Some(message) = view.assumptions.placeholder() {
                    div { class: "empty-state", "{message}" }
                } else {
                    div { class: "card-grid",
                        for (i, card) in view.assumptions.items().iter().enumerate() {
                            div { key: "{i}", class: "card assumption-card",
                                span { class: "card-label", "{card.label}" }
                                span { class: "card-value", "{card.value}" }
                            }
                        }
                    }
                }
            }

            div { id: "pane-charts", class: pane_class(ResultTab::Charts),
                ChartsPanel {}
            }
        }
    }
}
