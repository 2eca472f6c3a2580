//! UFC Predictor CLI - Command-line front end for fight predictions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ufc_predictor::{
    suggest_after_failure, ClientConfig, FighterIndex, PredictionClient, PredictionError,
    PredictionResult, PredictionService, PredictionViewController, ViewState,
};

const BAR_WIDTH: usize = 30;
const SUGGESTION_LIMIT: usize = 5;

#[derive(Parser)]
#[command(name = "ufc-predictor")]
#[command(author, version, about = "UFC fight prediction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Prediction API base URL (defaults to $UFC_API_URL or http://localhost:8000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (defaults to $UFC_API_TIMEOUT_SECS or none)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Ignore HTTP proxies set in the environment
    #[arg(long, global = true)]
    no_proxy: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the winner of a fight
    Predict {
        /// Red corner fighter
        #[arg(short, long)]
        red: String,

        /// Blue corner fighter
        #[arg(short, long)]
        blue: String,

        /// Print the raw prediction as JSON
        #[arg(long)]
        json: bool,
    },

    /// List fighters known to the service
    Fighters {
        /// Only show names containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of names to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Check that the prediction service is reachable
    Health,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let client = build_client(&cli)?;

    // Single-threaded runtime: the HTTP call is the only suspension point
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    if cli.interactive {
        println!("{}", "UFC Fight Predictor".red().bold());
        println!("API: {}\n", client.base_url().dimmed());
        return run_interactive(&rt, &client);
    }

    match cli.command {
        Some(Commands::Predict { red, blue, json }) => {
            let ok = rt.block_on(predict_fight(&client, &red, &blue, json));
            if !ok {
                std::process::exit(1);
            }
        }
        Some(Commands::Fighters { search, limit }) => {
            rt.block_on(list_fighters(&client, search.as_deref(), limit))?;
        }
        Some(Commands::Health) => {
            rt.block_on(health(&client))?;
        }
        None => {
            println!("Use --help for usage information or --interactive for interactive mode.");
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn build_client(cli: &Cli) -> Result<PredictionClient> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = Some(secs);
    }
    config.no_proxy |= cli.no_proxy;

    PredictionClient::new(config).context("Failed to create prediction client")
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.red} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run one prediction through the controller and render the outcome
async fn predict_fight(client: &PredictionClient, red: &str, blue: &str, json: bool) -> bool {
    let mut controller = PredictionViewController::new();
    controller.edit_fighter1(red);
    controller.edit_fighter2(blue);

    let failure = run_submission(&mut controller, client, !json).await;

    if json {
        if let ViewState::Success(result) = controller.state() {
            match serde_json::to_string_pretty(result) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("{}", e),
            }
            return true;
        }
    }

    render_state(controller.state());
    if let Some(error) = failure {
        show_suggestions(client, &error, &[red, blue]).await;
    }
    !matches!(controller.state(), ViewState::Failure(_))
}

/// Submit the current inputs and apply the reply
///
/// Returns the error of a request that was actually sent. A submit rejected
/// by input validation never reaches the network and returns `None`.
async fn run_submission(
    controller: &mut PredictionViewController,
    client: &PredictionClient,
    show_spinner: bool,
) -> Option<PredictionError> {
    let submission = controller.begin_submit()?;

    let pb = show_spinner.then(|| spinner("Predicting..."));
    let completion = submission.send(client).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let failure = completion.outcome.as_ref().err().cloned();
    controller.apply(completion);
    failure
}

fn render_state(state: &ViewState) {
    match state {
        ViewState::Idle => {}
        ViewState::Loading => println!("{}", "Predicting...".dimmed()),
        ViewState::Success(result) => render_result(result),
        ViewState::Failure(message) => println!("{} {}", "Error:".red().bold(), message),
    }
}

fn render_result(result: &PredictionResult) {
    println!("{}", "PREDICTED WINNER".dimmed());
    println!("  {}", result.winner.as_str().to_uppercase().yellow().bold());
    println!();
    println!(
        "  {:<24} {} {:>5.1}%",
        truncate_name(result.red_fighter.as_str(), 24).red(),
        probability_bar(result.red_win_probability),
        result.red_win_probability * 100.0
    );
    println!(
        "  {:<24} {} {:>5.1}%",
        truncate_name(result.blue_fighter.as_str(), 24).blue(),
        probability_bar(result.blue_win_probability),
        result.blue_win_probability * 100.0
    );
    println!();
    println!(
        "  {} {:.1}%",
        "Confidence:".bold(),
        result.confidence * 100.0
    );
}

/// Offer close roster matches when the service did not recognise a name
async fn show_suggestions(client: &PredictionClient, error: &PredictionError, names: &[&str]) {
    for suggestion in suggest_after_failure(client, error, names, SUGGESTION_LIMIT).await {
        let list: Vec<&str> = suggestion.matches.iter().map(|n| n.as_str()).collect();
        println!(
            "{} {:?}: {}",
            "Did you mean, for".dimmed(),
            suggestion.name,
            list.join(", ")
        );
    }
}

async fn list_fighters(client: &PredictionClient, search: Option<&str>, limit: usize) -> Result<()> {
    let pb = spinner("Fetching fighters...");
    let fighters = client.list_fighters().await;
    pb.finish_and_clear();

    let index = FighterIndex::new(fighters.context("Failed to fetch fighters")?);
    let found = index.search(search.unwrap_or(""), limit);

    println!(
        "{} ({} of {})",
        "Fighters:".yellow().bold(),
        found.len(),
        index.len()
    );
    println!("{}", "-".repeat(40));
    for name in found {
        println!("  {}", name);
    }

    Ok(())
}

async fn health(client: &PredictionClient) -> Result<()> {
    let status = client
        .health_check()
        .await
        .context("Prediction service is not reachable")?;

    println!(
        "{} {}",
        "Service is up:".green().bold(),
        client.base_url()
    );
    println!("{}", serde_json::to_string_pretty(&status.body)?);
    Ok(())
}

fn run_interactive(rt: &tokio::runtime::Runtime, client: &PredictionClient) -> Result<()> {
    println!("Choose Quit to exit.\n");

    let theme = ColorfulTheme::default();
    let mut controller = PredictionViewController::new();

    loop {
        let options = vec!["Predict a fight", "List fighters", "Health check", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                // Previous inputs are offered again so a typo can be fixed in place
                let fighter1: String = Input::with_theme(&theme)
                    .with_prompt("Fighter 1 (red)")
                    .with_initial_text(controller.fighter1())
                    .allow_empty(true)
                    .interact_text()?;
                controller.edit_fighter1(fighter1);

                let fighter2: String = Input::with_theme(&theme)
                    .with_prompt("Fighter 2 (blue)")
                    .with_initial_text(controller.fighter2())
                    .allow_empty(true)
                    .interact_text()?;
                controller.edit_fighter2(fighter2);

                println!();
                let failure = rt.block_on(run_submission(&mut controller, client, true));
                render_state(controller.state());
                if let Some(error) = failure {
                    let names = [controller.fighter1(), controller.fighter2()];
                    rt.block_on(show_suggestions(client, &error, &names));
                }
                println!();
            }
            1 => {
                let search: String = Input::with_theme(&theme)
                    .with_prompt("Filter (leave empty for all)")
                    .allow_empty(true)
                    .interact_text()?;

                println!();
                if let Err(e) = rt.block_on(list_fighters(client, Some(&search), 50)) {
                    println!("{} {:#}", "Error:".red().bold(), e);
                }
                println!();
            }
            2 => {
                println!();
                if let Err(e) = rt.block_on(health(client)) {
                    println!("{} {:#}", "Error:".red().bold(), e);
                }
                println!();
            }
            3 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Render a probability as a fixed-width bar
fn probability_bar(prob: f64) -> String {
    let filled = (prob.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
