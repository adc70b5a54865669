//! Charts Panel Component
//!
//! Revenue charts drawn with ECharts via wasm-bindgen JS interop. The panel
//! only renders the containers; widget lifetimes are owned by the dashboard's
//! [`ChartCoordinator`](stratfin_core::ChartCoordinator) through
//! [`EChartsBackend`].

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_logger::tracing;
use serde::Serialize;
use stratfin_core::{ChartBackend, ChartKind, ChartSlot, ChartSpec};
use wasm_bindgen::prelude::*;

use crate::api::AppDashboard;

// ─────────────────────────────────────────────────────────────────────────────
// ECharts JS Interop
// ─────────────────────────────────────────────────────────────────────────────

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = echarts, js_name = init)]
    fn echarts_init(dom: &web_sys::Element) -> JsValue;

    #[wasm_bindgen(js_namespace = echarts, js_name = getInstanceByDom)]
    fn echarts_get_instance(dom: &web_sys::Element) -> JsValue;
}

/// True once the ECharts script has loaded
fn echarts_loaded() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("echarts")).unwrap_or(false))
        .unwrap_or(false)
}

fn call_method(target: &JsValue, name: &str, args: &[&JsValue]) {
    let method = js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok());

    if let Some(func) = method {
        let result = match args {
            [] => func.call0(target),
            [a] => func.call1(target, a),
            [a, b, ..] => func.call2(target, a, b),
        };
        if let Err(err) = result {
            tracing::warn!(method = name, ?err, "echarts call failed");
        }
    }
}

fn is_instance(value: &JsValue) -> bool {
    !value.is_null() && !value.is_undefined()
}

// ─────────────────────────────────────────────────────────────────────────────
// Chart Options
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartOption<'a> {
    title: Title<'a>,
    tooltip: Tooltip,
    legend: Legend<'a>,
    grid: Grid,
    x_axis: XAxis<'a>,
    y_axis: YAxis<'a>,
    series: Vec<Series<'a>>,
}

#[derive(Serialize)]
struct Title<'a> {
    text: &'a str,
    left: &'static str,
}

#[derive(Serialize)]
struct Tooltip {
    trigger: &'static str,
}

#[derive(Serialize)]
struct Legend<'a> {
    data: Vec<&'a str>,
    bottom: u32,
}

#[derive(Serialize)]
struct Grid {
    left: &'static str,
    right: &'static str,
    top: u32,
    bottom: u32,
    #[serde(rename = "containLabel")]
    contain_label: bool,
}

#[derive(Serialize)]
struct XAxis<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a [String],
}

#[derive(Serialize)]
struct YAxis<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Series<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a [f64],
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<&'static str>,
    smooth: bool,
    item_style: ItemStyle<'a>,
}

#[derive(Serialize)]
struct ItemStyle<'a> {
    color: &'a str,
}

fn chart_option(spec: &ChartSpec) -> ChartOption<'_> {
    let (kind, stack, smooth) = match spec.kind {
        ChartKind::Line => ("line", None, true),
        ChartKind::StackedBar => ("bar", Some("revenue"), false),
    };

    ChartOption {
        title: Title {
            text: spec.title,
            left: "center",
        },
        tooltip: Tooltip { trigger: "axis" },
        legend: Legend {
            data: spec.series.iter().map(|s| s.name).collect(),
            bottom: 0,
        },
        grid: Grid {
            left: "3%",
            right: "4%",
            top: 40,
            bottom: 40,
            contain_label: true,
        },
        x_axis: XAxis {
            kind: "category",
            data: &spec.labels,
        },
        y_axis: YAxis {
            kind: "value",
            name: spec.y_axis_name,
        },
        series: spec
            .series
            .iter()
            .map(|s| Series {
                name: s.name,
                kind,
                data: &s.values,
                stack,
                smooth,
                item_style: ItemStyle { color: s.color },
            })
            .collect(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// A live ECharts instance bound to its container
pub struct EChartsWidget {
    element_id: &'static str,
    instance: JsValue,
}

/// [`ChartBackend`] drawing into the chart containers of [`ChartsPanel`].
#[derive(Default)]
pub struct EChartsBackend;

impl ChartBackend for EChartsBackend {
    type Widget = EChartsWidget;

    fn create(&mut self, slot: ChartSlot) -> Option<EChartsWidget> {
        if !echarts_loaded() {
            return None;
        }
        let element_id = slot.element_id();
        let element = web_sys::window()?
            .document()?
            .get_element_by_id(element_id)?;

        // Never bind two instances to one container
        let stale = echarts_get_instance(&element);
        if is_instance(&stale) {
            call_method(&stale, "dispose", &[]);
        }

        Some(EChartsWidget {
            element_id,
            instance: echarts_init(&element),
        })
    }

    fn draw(&mut self, widget: &mut EChartsWidget, spec: &ChartSpec) {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        match chart_option(spec).serialize(&serializer) {
            // notMerge: series from a previous model must not linger
            Ok(option) => call_method(&widget.instance, "setOption", &[&option, &JsValue::TRUE]),
            Err(err) => {
                tracing::warn!(chart = widget.element_id, %err, "failed to build chart option")
            }
        }
    }

    fn resize(&mut self, widget: &mut EChartsWidget) {
        call_method(&widget.instance, "resize", &[]);
    }

    fn dispose(&mut self, widget: EChartsWidget) {
        call_method(&widget.instance, "dispose", &[]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Component
// ─────────────────────────────────────────────────────────────────────────────

/// Chart containers. Always mounted so widgets can be created on first entry;
/// visibility is controlled by the enclosing pane.
#[component]
pub fn ChartsPanel() -> Element {
    let dashboard = use_context::<Signal<AppDashboard>>();

    // Window resize listener, removed again on unmount
    let listener = use_hook(move || {
        let closure = Closure::<dyn Fn()>::new(move || {
            let mut dashboard = dashboard;
            if let Ok(mut d) = dashboard.try_write() {
                d.resize_charts();
            }
        });
        if let Some(window) = web_sys::window() {
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
        Rc::new(closure)
    });

    // Detach the listener and release widgets on unmount
    use_drop(move || {
        let closure: &Closure<dyn Fn()> = &listener;
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }

        let mut dashboard = dashboard;
        if let Ok(mut d) = dashboard.try_write() {
            d.release_charts();
        }
    });

    let empty = dashboard.read().model().is_none();

    rsx! {
        div { class: "charts-panel",
            if empty {
                div { class: "empty-state", "Run a query to see revenue charts" }
            }
            for slot in ChartSlot::all() {
                div {
                    key: "{slot.element_id()}",
                    id: slot.element_id(),
                    class: "chart-container",
                }
            }
        }
    }
}
