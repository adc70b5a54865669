//! Result tab selection
//!
//! A closed four-state machine with no terminal state. Selecting a tab is a
//! single assignment, so observers never see zero or two active tabs. Entering
//! the charts tab tells the caller what the chart coordinator has to do.

use stratfin_types::ResultTab;

/// Follow-up work for the chart coordinator after a tab change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartAction {
    #[default]
    None,
    /// Build the chart widgets from the current model
    Render,
    /// Widgets exist and the data is unchanged; only fit them to the revealed pane
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabTransition {
    pub next: ResultTab,
    pub charts: ChartAction,
}

/// Compute the result of selecting `requested` while `current` is active.
///
/// `has_model` is whether a model is held and `charts_live` whether any chart
/// widget currently exists.
pub fn transition(
    current: ResultTab,
    requested: ResultTab,
    has_model: bool,
    charts_live: bool,
) -> TabTransition {
    let charts = match requested {
        ResultTab::Charts if charts_live => ChartAction::Resize,
        ResultTab::Charts if has_model => ChartAction::Render,
        _ => ChartAction::None,
    };

    if current != requested {
        tracing::debug!(from = current.key(), to = requested.key(), ?charts, "tab selected");
    }

    TabTransition {
        next: requested,
        charts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_tab_is_table() {
        assert_eq!(ResultTab::default(), ResultTab::Table);
    }

    #[test]
    fn entering_charts_with_model_renders_once() {
        let t = transition(ResultTab::Table, ResultTab::Charts, true, false);
        assert_eq!(t.next, ResultTab::Charts);
        assert_eq!(t.charts, ChartAction::Render);
    }

    #[test]
    fn entering_charts_with_live_widgets_only_resizes() {
        let t = transition(ResultTab::Drivers, ResultTab::Charts, true, true);
        assert_eq!(t.charts, ChartAction::Resize);
    }

    #[test]
    fn entering_charts_without_model_does_nothing() {
        let t = transition(ResultTab::Table, ResultTab::Charts, false, false);
        assert_eq!(t.next, ResultTab::Charts);
        assert_eq!(t.charts, ChartAction::None);
    }

    #[test]
    fn other_tabs_never_touch_charts() {
        for &tab in ResultTab::all() {
            if tab == ResultTab::Charts {
                continue;
            }
            let t = transition(ResultTab::Charts, tab, true, true);
            assert_eq!(t.next, tab);
            assert_eq!(t.charts, ChartAction::None);
        }
    }

    #[test]
    fn cycles_freely() {
        let mut current = ResultTab::Table;
        for _ in 0..2 {
            for &tab in ResultTab::all() {
                current = transition(current, tab, false, false).next;
                assert_eq!(current, tab);
            }
        }
        assert_eq!(transition(current, ResultTab::Table, false, false).next, ResultTab::Table);
    }

    #[test]
    fn reselecting_same_tab_is_stable() {
        let t = transition(ResultTab::Assumptions, ResultTab::Assumptions, true, false);
        assert_eq!(t.next, ResultTab::Assumptions);
        assert_eq!(t.charts, ChartAction::None);
    }
}
