//! Plain-text layout of the result panes.

use std::io::{self, Write};

use stratfin_core::ResultsView;
use stratfin_core::render::{DriverCard, TableRow};
use stratfin_types::ResultTab;

pub fn write_summary(view: &ResultsView, out: &mut impl Write) -> io::Result<()> {
    match &view.summary {
        Some(summary) => writeln!(
            out,
            "Model {}  |  {} months  |  Final month revenue: {}",
            summary.model_id, summary.horizon_months, summary.terminal_revenue
        ),
        None => writeln!(out, "No model loaded. Run `search <query>` first."),
    }
}

/// Write the pane for `tab`. Charts are drawn separately.
pub fn write_tab(view: &ResultsView, tab: ResultTab, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "── {} ──", tab.label())?;
    match tab {
        ResultTab::Table => write_table(&view.rows, out),
        ResultTab::Drivers => match view.drivers.placeholder() {
            Some(message) => writeln!(out, "{message}"),
            None => {
                for card in view.drivers.items() {
                    write_driver(card, out)?;
                }
                Ok(())
            }
        },
        ResultTab::Assumptions => match view.assumptions.placeholder() {
            Some(message) => writeln!(out, "{message}"),
            None => {
                let width = view
                    .assumptions
                    .items()
                    .iter()
                    .map(|c| c.label.chars().count())
                    .max()
                    .unwrap_or(0);
                for card in view.assumptions.items() {
                    writeln!(out, "{:<width$}  {}", card.label, card.value)?;
                }
                Ok(())
            }
        },
        ResultTab::Charts => Ok(()),
    }
}

fn write_table(rows: &[TableRow], out: &mut impl Write) -> io::Result<()> {
    let mut widths = TableRow::HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = TableRow::HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:>w$}"))
        .collect();
    writeln!(out, "{}", header.join("  "))?;
    let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    writeln!(out, "{}", "-".repeat(total))?;

    for row in rows {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:>w$}"))
            .collect();
        writeln!(out, "{}", cells.join("  "))?;
    }
    Ok(())
}

fn write_driver(card: &DriverCard, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", card.title)?;
    writeln!(out, "  type: {}  value: {}  unit: {}", card.kind, card.value, card.unit)?;
    if let Some(unit) = &card.business_unit {
        writeln!(out, "  business unit: {unit}")?;
    }
    if let Some(formula) = &card.formula {
        writeln!(out, "  formula: {formula}")?;
    }
    writeln!(out)
}
