//! Model store
//!
//! Holds at most one current model plus the UI-visible request flags. The
//! store only records state; the [`Dashboard`](crate::dashboard::Dashboard)
//! performs the renders each mutation calls for.

use std::rc::Rc;

use stratfin_types::{Model, ResultTab};

/// Everything the view layer reads to draw itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Last successfully fetched model
    pub model: Option<Rc<Model>>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub active_tab: ResultTab,
}

#[derive(Debug, Default)]
pub struct ModelStore {
    state: UiState,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn model(&self) -> Option<&Rc<Model>> {
        self.state.model.as_ref()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
    }

    /// Set or clear the error message. Leaves the model untouched.
    pub fn set_error(&mut self, message: Option<String>) {
        self.state.error_message = message.filter(|m| !m.is_empty());
    }

    /// Replace the held model and clear any error. The active tab is kept.
    pub fn set_model(&mut self, model: Model) -> Rc<Model> {
        let model = Rc::new(model);
        self.state.model = Some(Rc::clone(&model));
        self.state.error_message = None;
        model
    }

    pub fn set_active_tab(&mut self, tab: ResultTab) {
        self.state.active_tab = tab;
    }

    /// Back to the initial state: no model, no error, not loading, first tab.
    pub fn reset(&mut self) {
        self.state = UiState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str) -> Model {
        Model {
            model_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn set_model_clears_error_and_keeps_tab() {
        let mut store = ModelStore::new();
        store.set_active_tab(ResultTab::Drivers);
        store.set_error(Some("boom".into()));

        store.set_model(model("a"));

        assert_eq!(store.state().error_message, None);
        assert_eq!(store.state().active_tab, ResultTab::Drivers);
        assert_eq!(store.model().map(|m| m.model_id.as_str()), Some("a"));
    }

    #[test]
    fn set_error_keeps_model() {
        let mut store = ModelStore::new();
        store.set_model(model("a"));
        store.set_error(Some("failed".into()));

        assert_eq!(store.state().error_message.as_deref(), Some("failed"));
        assert!(store.model().is_some());
    }

    #[test]
    fn empty_error_message_counts_as_cleared() {
        let mut store = ModelStore::new();
        store.set_error(Some(String::new()));
        assert_eq!(store.state().error_message, None);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut store = ModelStore::new();
        store.set_model(model("a"));
        store.set_loading(true);
        store.set_error(Some("x".into()));
        store.set_active_tab(ResultTab::Charts);

        store.reset();

        assert_eq!(store.state(), &UiState::default());
    }

    #[test]
    fn set_model_replaces_wholesale() {
        let mut store = ModelStore::new();
        let first = store.set_model(model("a"));
        store.set_model(model("b"));

        assert_eq!(first.model_id, "a");
        assert_eq!(store.model().map(|m| m.model_id.as_str()), Some("b"));
    }
}
