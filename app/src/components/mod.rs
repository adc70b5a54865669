//! UI Components
//!
//! The search form, result panes, chart containers and toast notifications
//! that make up the single-page dashboard.

pub mod charts_panel;
pub mod results_panel;
pub mod search_form;
pub mod toast;

pub use results_panel::ResultsPanel;
pub use search_form::SearchForm;
pub use toast::{ToastFrame, use_toast_provider};
