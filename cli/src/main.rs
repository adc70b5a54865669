use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stratfin_cli::config::{self, Overrides};
use stratfin_cli::{CliContext, commands, logging, readline};
use stratfin_types::{ResultTab, SearchParams};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let mut config = config::load().context("could not read the stratfin configuration")?;
    Overrides {
        api_url: cli.api_url.clone(),
        timeout_secs: cli.timeout,
    }
    .apply(&mut config);

    let ctx = CliContext::new(config).context("invalid service URL")?;

    // One-shot mode
    if let Some(command) = &cli.command {
        run(command, &ctx).await?;
        return Ok(());
    }

    loop {
        let line = readline().map_err(anyhow::Error::msg)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                tracing::debug!(error = %format!("{err:#}"), "command failed");
                println!("{err}");
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Generate and inspect financial scenario models")]
struct Cli {
    /// Base URL of the modeling service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds, 0 to wait indefinitely
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a model from a natural-language description
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long)]
        months: Option<u32>,
        #[arg(long)]
        sales_people: Option<u32>,
        #[arg(long)]
        marketing_spend: Option<f64>,
        #[arg(long)]
        large_revenue: Option<f64>,
        /// Show the revenue charts instead of the table
        #[arg(long)]
        charts: bool,
        /// Save the workbook once the model is generated
        #[arg(long)]
        export: bool,
    },
    /// Download a model as an Excel workbook
    Export {
        /// Defaults to the model currently shown
        model_id: Option<String>,
        #[arg(short, long)]
        dir: Option<String>,
        /// Ask the service to open the file after generating it
        #[arg(long)]
        auto_open: bool,
    },
    /// Print a result pane of the current model
    Show {
        #[arg(value_parser = parse_tab)]
        tab: Option<ResultTab>,
    },
    Health,
    /// List the revenue drivers the service understands
    Drivers,
    Config {
        /// Write the effective settings to the config file
        #[arg(long)]
        save: bool,
    },
    /// Clear the current model
    Reset,
    Exit,
}

fn parse_tab(value: &str) -> Result<ResultTab, String> {
    ResultTab::all()
        .iter()
        .copied()
        .find(|tab| tab.key().eq_ignore_ascii_case(value))
        .ok_or_else(|| {
            let keys: Vec<&str> = ResultTab::all().iter().map(|t| t.key()).collect();
            format!("expected one of: {}", keys.join(", "))
        })
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool> {
    let mut args = shlex::split(line).context("error: Invalid quoting")?;
    args.insert(0, "stratfin".to_string());
    let cli = Cli::try_parse_from(args)?;

    match &cli.command {
        Some(command) => run(command, ctx).await,
        None => Ok(false),
    }
}

/// Execute one command. Returns `true` when the session should end.
async fn run(command: &Commands, ctx: &CliContext) -> Result<bool> {
    match command {
        Commands::Search {
            query,
            months,
            sales_people,
            marketing_spend,
            large_revenue,
            charts,
            export,
        } => {
            let params = SearchParams {
                months: *months,
                initial_sales_people: *sales_people,
                marketing_spend_monthly: *marketing_spend,
                large_customer_revenue_monthly: *large_revenue,
            };
            commands::search(ctx, &query.join(" "), &params, *charts, *export).await?;
        }
        Commands::Export {
            model_id,
            dir,
            auto_open,
        } => commands::export_model(ctx, model_id.as_deref(), dir.as_deref(), *auto_open).await?,
        Commands::Show { tab } => commands::show(ctx, *tab)?,
        Commands::Health => commands::health(ctx).await?,
        Commands::Drivers => commands::drivers(ctx).await?,
        Commands::Config { save } => commands::show_config(ctx, *save)?,
        Commands::Reset => commands::reset(ctx),
        Commands::Exit => {
            commands::exit()?;
            return Ok(true);
        }
    }
    Ok(false)
}
