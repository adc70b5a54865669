pub mod charts;
pub mod dashboard;
pub mod format;
pub mod render;
pub mod request;
pub mod store;
pub mod tabs;

// Re-exports for convenience
pub use charts::{ChartBackend, ChartCoordinator, ChartHandles, ChartKind, ChartSlot, ChartSpec};
pub use dashboard::{Dashboard, DashboardHandle};
pub use format::{format_currency, format_label, format_number, format_percent};
pub use render::{ResultSink, ResultsView, Section, render_results};
pub use request::{
    ApiError, ExportFile, HttpModelApi, ModelApi, RequestController, RequestError, SaveError,
    SaveTarget,
};
pub use store::{ModelStore, UiState};
pub use tabs::{ChartAction, transition};
