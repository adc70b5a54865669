//! Query form with optional numeric overrides

use dioxus::prelude::*;
use stratfin_types::SearchParams;

use crate::utils::OverrideInputs;

const EXAMPLE_QUERY: &str = "SaaS startup with 2 sales people, $200k monthly marketing, 24 months";

#[component]
pub fn SearchForm(loading: bool, on_submit: EventHandler<(String, SearchParams)>) -> Element {
    let mut query = use_signal(String::new);
    let mut overrides = use_signal(OverrideInputs::default);
    let mut show_overrides = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        on_submit.call((query.read().clone(), overrides.read().to_params()));
    };

    rsx! {
        form { class: "search-form", onsubmit: submit,
            textarea {
                class: "query-input",
                rows: 3,
                placeholder: EXAMPLE_QUERY,
                value: "{query}",
                disabled: loading,
                oninput: move |e| query.set(e.value()),
            }

            button {
                r#type: "button",
                class: "btn-link",
                onclick: move |_| {
                    let open = *show_overrides.read();
                    show_overrides.set(!open);
                },
                if *show_overrides.read() { "Hide overrides" } else { "Optional overrides" }
            }

            if *show_overrides.read() {
                div { class: "override-grid",
                    label {
                        "Months"
                        input {
                            r#type: "number",
                            min: "1",
                            value: "{overrides.read().months}",
                            oninput: move |e| overrides.write().months = e.value(),
                        }
                    }
                    label {
                        "Initial sales people"
                        input {
                            r#type: "number",
                            min: "0",
                            value: "{overrides.read().sales_people}",
                            oninput: move |e| overrides.write().sales_people = e.value(),
                        }
                    }
                    label {
                        "Marketing spend / month ($)"
                        input {
                            r#type: "number",
                            min: "0",
                            step: "any",
                            value: "{overrides.read().marketing_spend}",
                            oninput: move |e| overrides.write().marketing_spend = e.value(),
                        }
                    }
                    label {
                        "Large customer revenue / month ($)"
                        input {
                            r#type: "number",
                            min: "0",
                            step: "any",
                            value: "{overrides.read().large_revenue}",
                            oninput: move |e| overrides.write().large_revenue = e.value(),
                        }
                    }
                }
            }

            button {
                r#type: "submit",
                class: "btn-primary",
                disabled: loading,
                if loading { "Generating..." } else { "Generate model" }
            }
        }
    }
}
