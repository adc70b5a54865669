use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use stratfin_core::ChartSlot;
use stratfin_types::{ExportOptions, ResultTab, SearchParams};

use crate::config;
use crate::context::{CliContext, CliDashboard};
use crate::save::FileSave;
use crate::terminal;

pub async fn search(
    ctx: &CliContext,
    query: &str,
    params: &SearchParams,
    charts: bool,
    export: bool,
) -> Result<()> {
    if let Err(err) = ctx.controller.submit_query(&ctx.dashboard, query, params).await {
        let message = err.user_message();
        return Err(anyhow::Error::new(err).context(message));
    }

    let tab = if charts { ResultTab::Charts } else { ResultTab::Table };
    ctx.dashboard.borrow_mut().select_tab(tab);
    print_dashboard(&ctx.dashboard.borrow())?;

    if export {
        export_model(ctx, None, None, false).await?;
    }
    Ok(())
}

/// Export `model_id`, or the model currently shown when none is given.
pub async fn export_model(
    ctx: &CliContext,
    model_id: Option<&str>,
    dir: Option<&str>,
    auto_open: bool,
) -> Result<()> {
    let dir = dir
        .map(PathBuf::from)
        .or_else(|| ctx.config.export_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let target = FileSave::new(dir);
    let options = if auto_open {
        ExportOptions {
            auto_open: Some(true),
        }
    } else {
        ctx.config.export_options()
    };

    let saved = match model_id {
        Some(id) => ctx.controller.export_excel(id, options, &target).await,
        None => {
            ctx.controller
                .export_current(&ctx.dashboard, options, &target)
                .await
        }
    };

    match saved {
        Ok(location) => {
            println!("Saved {location}");
            Ok(())
        }
        Err(err) => {
            let message = err.user_message();
            Err(anyhow::Error::new(err).context(message))
        }
    }
}

/// Switch to `tab` (if given) and print the active pane.
pub fn show(ctx: &CliContext, tab: Option<ResultTab>) -> Result<()> {
    if let Some(tab) = tab {
        ctx.dashboard.borrow_mut().select_tab(tab);
    }
    print_dashboard(&ctx.dashboard.borrow())
}

pub async fn health(ctx: &CliContext) -> Result<()> {
    let health = ctx
        .controller
        .check_health()
        .await
        .with_context(|| format!("service at {} did not answer", ctx.config.api_base_url))?;

    let marker = if health.is_healthy() { "ok" } else { "degraded" };
    println!("{}: {} ({marker})", ctx.config.api_base_url, health.status);
    if !health.message.is_empty() {
        println!("{}", health.message);
    }
    Ok(())
}

pub async fn drivers(ctx: &CliContext) -> Result<()> {
    let catalog = ctx
        .controller
        .revenue_drivers()
        .await
        .context("failed to load the revenue driver catalogue")?;

    if catalog.is_empty() {
        println!("The service reported no revenue drivers");
        return Ok(());
    }

    let width = catalog.keys().map(|k| k.len()).max().unwrap_or(0);
    println!("{:<width$}  {:<12} Unit", "Driver", "Type");
    println!("{}", "-".repeat(width + 20));
    for (name, spec) in &catalog {
        println!(
            "{name:<width$}  {:<12} {}",
            spec.kind.as_deref().unwrap_or("-"),
            spec.unit.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

pub fn show_config(ctx: &CliContext, save: bool) -> Result<()> {
    let cfg = &ctx.config;
    println!("api_base_url:         {}", cfg.api_base_url);
    println!("request_timeout_secs: {}", cfg.request_timeout_secs);
    println!(
        "default_months:       {}",
        cfg.default_months
            .map_or_else(|| "-".to_string(), |m| m.to_string())
    );
    println!(
        "export_dir:           {}",
        cfg.export_dir.as_deref().unwrap_or(".")
    );
    println!("auto_open_exports:    {}", cfg.auto_open_exports);

    if save {
        config::store(cfg)?;
        match config::path() {
            Ok(path) => println!("Saved to {}", path.display()),
            Err(_) => println!("Saved"),
        }
    }
    Ok(())
}

pub fn reset(ctx: &CliContext) {
    ctx.dashboard.borrow_mut().reset();
    println!("Cleared the current model");
}

pub fn exit() -> Result<()> {
    write!(std::io::stdout(), "quitting...")?;
    std::io::stdout().flush()?;
    Ok(())
}

fn print_dashboard(dashboard: &CliDashboard) -> Result<()> {
    let mut out = std::io::stdout().lock();
    terminal::write_summary(dashboard.sink(), &mut out)?;
    if dashboard.model().is_none() {
        return Ok(());
    }

    let tab = dashboard.state().active_tab;
    terminal::write_tab(dashboard.sink(), tab, &mut out)?;
    if tab == ResultTab::Charts {
        for slot in ChartSlot::all() {
            if let Some(chart) = dashboard.charts().handles().get(*slot) {
                for line in &chart.lines {
                    writeln!(out, "{line}")?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
