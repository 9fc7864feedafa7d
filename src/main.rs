use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use build_notify::template::{self, Field};
use build_notify::{compose, Fixture, Payload};

const FIXTURE_FILE: &str = "notify.toml";

#[derive(Parser)]
#[command(name = "build-notify")]
#[command(about = "Render CI build results into chat notifications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Build fixture file (default: notify.toml)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the rendered message, fallback and fields
    Preview,

    /// Print the webhook payload as JSON
    Payload {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// List template fields, filters and tests
    Fields,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Fields = cli.command {
        cmd_fields();
        return Ok(());
    }

    let path = cli.file.unwrap_or_else(|| PathBuf::from(FIXTURE_FILE));
    let fixture = Fixture::load(&path).with_context(|| format!("Could not load {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded fixture");

    match cli.command {
        Commands::Preview => cmd_preview(&fixture),
        Commands::Payload { pretty } => cmd_payload(&fixture, pretty),
        Commands::Fields => Ok(()),
    }
}

fn cmd_preview(fixture: &Fixture) -> Result<()> {
    let composed = compose(&fixture.repo, &fixture.build, &fixture.config)?;

    println!("\n{} {}", "📦".cyan(), fixture.repo.full_name().bold());
    if fixture.config.webhook.is_empty() {
        println!("{}\n", "No webhook configured".dimmed());
    } else {
        println!("{} {}\n", "Webhook:".dimmed(), fixture.config.webhook);
    }

    println!("{}", "Message:".bold());
    println!("{}\n", composed.message);

    println!("{}", "Fallback:".bold());
    println!("{}\n", composed.fallback);

    let Some(ref fields_json) = composed.fields else {
        println!("{}", "No fields template configured".dimmed());
        return Ok(());
    };

    let fields = build_notify::payload::parse_fields(fields_json)?;
    println!("{}", "Fields:".bold());
    for field in fields {
        let width = if field.short { "short" } else { "long" };
        println!("  {} {} {}", "•".green(), field.title.cyan(), format!("({})", width).dimmed());
        println!("    {}", field.value);
    }

    Ok(())
}

fn cmd_payload(fixture: &Fixture, pretty: bool) -> Result<()> {
    let payload = Payload::build(&fixture.repo, &fixture.build, &fixture.config)?;

    let json = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    println!("{}", json);

    Ok(())
}

fn cmd_fields() {
    println!("{}", "Fields:".bold());
    for path in Field::paths() {
        println!("  {} {}", "•".green(), format!("{{{{ {} }}}}", path).cyan());
    }

    println!("\n{}", "Filters:".bold());
    for (name, usage) in template::filters() {
        println!("  {} {:<16} {}", "•".green(), name.cyan(), usage.dimmed());
    }

    println!("\n{}", "Tests:".bold());
    for (name, usage) in template::tests() {
        println!("  {} {:<16} {}", "•".green(), name.cyan(), usage.dimmed());
    }
}
