//! Text rendering of the revenue charts as horizontal bar plots.

use stratfin_core::{ChartBackend, ChartKind, ChartSlot, ChartSpec, format_currency};

const FILL: char = '█';
const SECOND_FILL: char = '░';

const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 60;
/// Room taken by the label and value columns
const LABEL_COLUMNS: usize = 24;

/// A drawn chart, kept as pre-rendered lines
#[derive(Debug, Clone)]
pub struct TextChart {
    pub slot: ChartSlot,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TextCharts {
    bar_width: usize,
}

impl TextCharts {
    pub fn new(bar_width: usize) -> Self {
        Self {
            bar_width: bar_width.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH),
        }
    }

    /// Size bars to the terminal width reported in `COLUMNS`.
    pub fn from_env() -> Self {
        let columns = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(80);
        Self::new(columns.saturating_sub(LABEL_COLUMNS))
    }

    pub fn bar_width(&self) -> usize {
        self.bar_width
    }

    fn plot(&self, spec: &ChartSpec) -> Vec<String> {
        let mut lines = vec![format!("{} ({})", spec.title, spec.y_axis_name)];
        if spec.kind == ChartKind::StackedBar {
            let legend: Vec<String> = spec
                .series
                .iter()
                .zip([FILL, SECOND_FILL])
                .map(|(s, fill)| format!("{fill} {}", s.name))
                .collect();
            lines.push(legend.join("   "));
        }

        let totals: Vec<f64> = (0..spec.labels.len())
            .map(|i| match spec.kind {
                ChartKind::StackedBar => spec.series.iter().map(|s| value_at(&s.values, i)).sum(),
                ChartKind::Line => spec.series.first().map_or(0.0, |s| value_at(&s.values, i)),
            })
            .collect();
        let peak = totals.iter().copied().fold(0.0_f64, f64::max);

        for (i, label) in spec.labels.iter().enumerate() {
            let bar = match spec.kind {
                ChartKind::StackedBar => spec
                    .series
                    .iter()
                    .zip([FILL, SECOND_FILL])
                    .map(|(s, fill)| {
                        fill.to_string()
                            .repeat(self.cells(value_at(&s.values, i), peak))
                    })
                    .collect::<String>(),
                ChartKind::Line => FILL.to_string().repeat(self.cells(totals[i], peak)),
            };
            lines.push(format!(
                "{label:>5} │{bar:<width$} {}",
                axis_value(spec.slot, totals[i]),
                width = self.bar_width
            ));
        }
        lines
    }

    fn cells(&self, value: f64, peak: f64) -> usize {
        if peak <= 0.0 || value <= 0.0 {
            return 0;
        }
        ((value / peak) * self.bar_width as f64).round() as usize
    }
}

impl Default for TextCharts {
    fn default() -> Self {
        Self::from_env()
    }
}

fn value_at(values: &[f64], index: usize) -> f64 {
    values.get(index).copied().unwrap_or(0.0)
}

fn axis_value(slot: ChartSlot, value: f64) -> String {
    match slot {
        ChartSlot::RevenueMillion => format!("{value:.2}M"),
        _ => format_currency(value),
    }
}

impl ChartBackend for TextCharts {
    type Widget = TextChart;

    fn create(&mut self, slot: ChartSlot) -> Option<TextChart> {
        Some(TextChart {
            slot,
            lines: Vec::new(),
        })
    }

    fn draw(&mut self, widget: &mut TextChart, spec: &ChartSpec) {
        widget.lines = self.plot(spec);
    }

    // Lines are laid out at draw time
    fn resize(&mut self, _widget: &mut TextChart) {}

    fn dispose(&mut self, widget: TextChart) {
        tracing::trace!(slot = ?widget.slot, "text chart released");
    }
}
