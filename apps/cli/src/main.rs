use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use vidbrief_core::{
    FileStore, GeminiClient, ProviderConfig, Section, format_analysis_readable, format_catalog,
    format_section, get_default_store_path, save_analysis,
};

use crate::video::{mask_key, video_info};

mod telemetry;
mod video;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let whole = secs as u64;
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// CLI wrapper for Section (needed for clap ValueEnum)
#[derive(Clone, ValueEnum)]
enum CliSection {
    Summary,
    KeyPoints,
    Sentiment,
    Topics,
}

impl From<CliSection> for Section {
    fn from(cli: CliSection) -> Self {
        match cli {
            CliSection::Summary => Section::Summary,
            CliSection::KeyPoints => Section::KeyPoints,
            CliSection::Sentiment => Section::Sentiment,
            CliSection::Topics => Section::Topics,
        }
    }
}

#[derive(Parser)]
#[command(name = "vidbrief")]
#[command(about = "Summarize a video with Gemini from its file name or URL")]
struct Cli {
    /// Preference file holding the API key and selected model
    #[arg(long, global = true, env = "VIDBRIEF_STORE")]
    store: Option<PathBuf>,

    /// Gemini API base URL
    #[arg(long, global = true, env = "VIDBRIEF_API_BASE")]
    api_base: Option<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the stored Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// List available Gemini models
    Models,

    /// Show the selected model, or select one
    Model {
        /// Model id, e.g. "gemini-1.5-flash"
        id: Option<String>,
    },

    /// Analyze a video file or URL
    Analyze {
        /// Local video file (only its name is sent) or video URL
        video: String,

        /// Print a single section as plain text
        #[arg(short, long)]
        section: Option<CliSection>,

        /// Print the result as JSON
        #[arg(long, conflicts_with = "section")]
        json: bool,

        /// Also write the result as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store an API key
    Set { key: String },
    /// Show the stored API key (masked)
    Show,
    /// Remove the stored API key
    Clear,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store_path = cli.store.unwrap_or_else(get_default_store_path);
    let config = match cli.api_base {
        Some(base) => ProviderConfig::new(base),
        None => ProviderConfig::from_env(),
    };
    tracing::debug!(store = %store_path.display(), api_base = %config.api_base, "starting");

    let client = GeminiClient::new(config, FileStore::new(&store_path));

    match cli.command {
        Command::Key { action } => run_key(&client, action),
        Command::Models => run_models(&client).await,
        Command::Model { id } => run_model(&client, id),
        Command::Analyze {
            video,
            section,
            json,
            output,
        } => run_analyze(&client, &video, section, json, output).await,
    }
}

fn run_key(client: &GeminiClient<FileStore>, action: KeyAction) -> Result<()> {
    let prefs = client.preferences();
    match action {
        KeyAction::Set { key } => {
            prefs.set_api_key(&key)?;
            println!(
                "{} API key saved to {}",
                style("✓").green().bold(),
                style(prefs.store().path().display()).dim()
            );
        }
        KeyAction::Show => {
            let key = prefs.api_key()?;
            if key.is_empty() {
                println!("{}", style("No API key stored").yellow());
            } else {
                println!("{}", mask_key(&key));
            }
        }
        KeyAction::Clear => {
            prefs.clear_api_key()?;
            println!("{} API key removed", style("✓").green().bold());
        }
    }
    Ok(())
}

fn run_model(client: &GeminiClient<FileStore>, id: Option<String>) -> Result<()> {
    let prefs = client.preferences();
    match id {
        Some(id) => {
            prefs.set_model(id.trim())?;
            println!(
                "{} Selected model: {}",
                style("✓").green().bold(),
                style(id.trim()).cyan()
            );
        }
        None => println!("{}", prefs.model()?),
    }
    Ok(())
}

async fn run_models(client: &GeminiClient<FileStore>) -> Result<()> {
    let spinner = create_spinner(&format!("Fetching {} models...", client.config().name()));
    let catalog = client.fetch_available_models().await;
    spinner.finish_and_clear();
    let catalog = catalog?;

    let selected = client.preferences().model()?;
    println!("{}", format_catalog(&catalog, &selected));

    if catalog.find(&selected).is_none() {
        println!(
            "\n{} selected model {} is not in this list",
            style("Note:").yellow().bold(),
            style(&selected).cyan()
        );
    }
    if catalog.is_fallback() {
        println!(
            "\n{} {}",
            style("Note:").yellow().bold(),
            style("model listing failed, showing the built-in list").dim()
        );
    }
    Ok(())
}

async fn run_analyze(
    client: &GeminiClient<FileStore>,
    video: &str,
    section: Option<CliSection>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let info = video_info(video);
    let model = client.preferences().model()?;

    let started = Instant::now();
    let spinner = create_spinner(&format!(
        "Analyzing {} with {}...",
        style(&info).dim(),
        style(&model).cyan()
    ));
    let analysis = client.analyze_video(&info).await;
    spinner.finish_and_clear();
    let analysis = analysis?;

    if let Some(path) = &output {
        save_analysis(&analysis.result, path).await?;
    }

    if let Some(section) = section {
        println!("{}", format_section(&analysis.result, section.into()));
    } else if json {
        println!("{}", serde_json::to_string_pretty(&analysis.result)?);
    } else {
        println!(
            "{} Analyzed {} with {} {}",
            style("✓").green().bold(),
            style(&info).dim(),
            style(&model).cyan(),
            style(format!("[{}]", format_duration(started.elapsed()))).dim()
        );
        if let Some(path) = &output {
            println!("{} {}", style("Saved:").dim(), style(path.display()).cyan());
        }
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", format_analysis_readable(&analysis.result));
    }

    if analysis.is_degraded() {
        eprintln!(
            "{} {}",
            style("Warning:").yellow().bold(),
            "the model reply was not valid JSON; showing a diagnostic result"
        );
    }

    Ok(())
}
