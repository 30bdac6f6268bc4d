mod display;
mod interactive;
mod screen;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use lotto_client::config::{save_config, ClientConfig, DEFAULT_CONFIG_FILE};
use lotto_client::error::ClientError;
use lotto_client::{HttpProvider, LottoProvider};
use lotto_core::evaluate::evaluate;
use lotto_core::models::{quick_pick, ticket_count, WinningDraw};

use crate::display::{
    display_config, display_draw, display_history, display_purchase, display_purchase_created,
    display_quick_picks, display_result, display_statistics, display_summary,
    display_ticket_results,
};

#[derive(Parser)]
#[command(name = "lotto", about = "6/45 lottery purchase simulator")]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "LOTTO_BASE_URL")]
    base_url: Option<String>,

    /// JSON configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Buy tickets for an amount
    Purchase {
        /// Amount to spend, a multiple of the ticket price
        #[arg(short, long)]
        amount: u64,
    },

    /// Show the tickets issued for a purchase
    Show {
        id: u64,
    },

    /// List past purchases
    History,

    /// Check a purchase against winning numbers and record the result
    Check {
        id: u64,

        /// The 6 main numbers (1-45)
        #[arg(num_args = 6, required = true)]
        numbers: Vec<u8>,

        /// Bonus number (1-45)
        #[arg(short, long)]
        bonus: u8,
    },

    /// Show the recorded result of a purchase
    Result {
        id: u64,
    },

    /// Statistics over every checked purchase
    Stats,

    /// Generate random combinations
    QuickPick {
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evaluate a purchase against a random draw without recording anything
    Simulate {
        id: u64,

        /// Seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },

    /// Interactive mode (menu)
    Interactive,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ClientConfig::resolve(&cli.config, cli.base_url.as_deref())
        .with_context(|| format!("Cannot load configuration from {}", cli.config.display()))?;
    tracing::info!("using backend {}", config.base_url);

    match cli.command {
        Command::QuickPick { count, seed } => return cmd_quick_pick(count, seed),
        Command::Config { save } => return cmd_config(&config, &cli.config, save),
        _ => {}
    }

    let provider = HttpProvider::new(&config).context("Cannot create HTTP client")?;

    match cli.command {
        Command::Purchase { amount } => cmd_purchase(&provider, &config, amount).map(|_| ()),
        Command::Show { id } => cmd_show(&provider, id),
        Command::History => cmd_history(&provider),
        Command::Check { id, numbers, bonus } => {
            let draw = WinningDraw::from_slice(&numbers, bonus).context("Invalid winning numbers")?;
            cmd_check(&provider, &config, id, &draw)
        }
        Command::Result { id } => cmd_result(&provider, id),
        Command::Stats => cmd_stats(&provider),
        Command::Simulate { id, seed } => cmd_simulate(&provider, &config, id, seed),
        Command::Interactive => interactive::run_interactive(&provider, &config),
        Command::QuickPick { .. } | Command::Config { .. } => Ok(()),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

pub(crate) fn cmd_purchase(
    provider: &dyn LottoProvider,
    config: &ClientConfig,
    amount: u64,
) -> Result<u64> {
    let count = ticket_count(amount, config.ticket_price)?;
    let id = provider
        .create_purchase(amount)
        .context("Purchase failed")?;
    tracing::info!("purchase {} created for {} ({} tickets)", id, amount, count);
    display_purchase_created(id, amount, count);
    Ok(id)
}

pub(crate) fn cmd_show(provider: &dyn LottoProvider, id: u64) -> Result<()> {
    let detail = provider
        .purchase(id)
        .with_context(|| format!("Cannot load purchase {}", id))?;
    let tickets = detail.tickets()?;
    display_purchase(&detail, &tickets);
    Ok(())
}

pub(crate) fn cmd_history(provider: &dyn LottoProvider) -> Result<()> {
    let purchases = provider.purchases().context("Cannot load purchase history")?;
    display_history(&purchases);
    Ok(())
}

pub(crate) fn cmd_check(
    provider: &dyn LottoProvider,
    config: &ClientConfig,
    id: u64,
    draw: &WinningDraw,
) -> Result<()> {
    let detail = provider
        .purchase(id)
        .with_context(|| format!("Cannot load purchase {}", id))?;
    let tickets = detail.tickets()?;
    let local = evaluate(&tickets, draw, config.ticket_price, &config.prizes);

    let result = provider
        .submit_result(id, draw)
        .with_context(|| format!("Cannot record winning numbers for purchase {}", id))?;

    let mismatches = result.mismatches(&local);
    if !mismatches.is_empty() {
        tracing::warn!(
            "backend rank counts differ from local evaluation for {:?}",
            mismatches
        );
    }
    if result.total_prize != local.total_prize {
        tracing::warn!(
            "backend total prize {} differs from local {}",
            result.total_prize,
            local.total_prize
        );
    }

    display_draw(draw);
    display_ticket_results(&local);
    display_result(&result);
    Ok(())
}

pub(crate) fn cmd_result(provider: &dyn LottoProvider, id: u64) -> Result<()> {
    match provider.result(id) {
        Ok(result) => {
            display_result(&result);
            Ok(())
        }
        Err(ClientError::NoResultYet(_)) => {
            println!("No winning numbers recorded yet. Run: lotto check {} <numbers> --bonus <n>", id);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Cannot load result of purchase {}", id)),
    }
}

pub(crate) fn cmd_stats(provider: &dyn LottoProvider) -> Result<()> {
    let stats = provider.statistics().context("Cannot load statistics")?;
    if stats.total_samples == 0 {
        println!("No checked purchases yet.");
        return Ok(());
    }
    display_statistics(&stats);
    Ok(())
}

fn cmd_quick_pick(count: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let tickets: Vec<_> = (0..count).map(|_| quick_pick(&mut rng)).collect();
    display_quick_picks(&tickets);
    Ok(())
}

pub(crate) fn cmd_simulate(
    provider: &dyn LottoProvider,
    config: &ClientConfig,
    id: u64,
    seed: Option<u64>,
) -> Result<()> {
    let detail = provider
        .purchase(id)
        .with_context(|| format!("Cannot load purchase {}", id))?;
    let tickets = detail.tickets()?;

    let mut rng = seeded_rng(seed);
    let draw = WinningDraw::random(&mut rng);
    let summary = evaluate(&tickets, &draw, config.ticket_price, &config.prizes);

    println!("\nSimulated draw (not recorded)");
    display_draw(&draw);
    display_ticket_results(&summary);
    display_summary(&summary);
    Ok(())
}

fn cmd_config(config: &ClientConfig, path: &Path, save: bool) -> Result<()> {
    display_config(config);
    if save {
        save_config(config, path)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
