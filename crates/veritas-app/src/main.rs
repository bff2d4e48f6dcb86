//! Veritas application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Build the random source, clock and analysis matcher
//! 3. Pick the local or remote reply generator
//! 4. Run the requested command: analyze, history or an interactive chat

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use veritas_chat::{
    ConversationSession, LocalResponseGenerator, RemoteResponseGenerator, ResponseGenerator,
};
use veritas_core::{
    seed_records, AnalysisMatcher, AnalysisRecord, Clock, RandomSource, StdRandom, SystemClock,
    VeritasConfig,
};

use cli::{CliArgs, Command};

/// Build the reply generator selected by `[remote].enabled`.
fn build_generator(
    config: &VeritasConfig,
    random: Arc<dyn RandomSource>,
) -> Result<Arc<dyn ResponseGenerator>, Box<dyn std::error::Error>> {
    let local = LocalResponseGenerator::from_config(random, &config.chat);
    if !config.remote.enabled {
        tracing::info!("Using local reply generator");
        return Ok(Arc::new(local));
    }

    let remote = RemoteResponseGenerator::new(&config.remote, local)?;
    tracing::info!(endpoint = %remote.endpoint(), "Using remote reply generator");
    Ok(Arc::new(remote))
}

fn print_record(record: &AnalysisRecord) {
    println!("Score: {}/100 ({})", record.score(), record.band().label());
    println!("Findings:");
    for explanation in record.explanations() {
        println!("  - {}", explanation);
    }
    println!("Learn more: {}", record.learn_more_url());
}

fn print_history(matcher: &AnalysisMatcher) {
    for record in matcher.known_records() {
        println!(
            "{}  {:>3}/100  {:<20}  {}",
            record.created_at().format("%Y-%m-%d %H:%M"),
            record.score(),
            record.band().label(),
            record.text_preview(60)
        );
    }
}

/// Read questions from stdin until EOF or `/quit`.
async fn run_chat(session: ConversationSession) -> Result<(), Box<dyn std::error::Error>> {
    session.open();
    for message in session.messages() {
        println!("assistant> {}", message.content);
    }
    println!();
    println!("Suggested questions:");
    for question in session.suggestions() {
        println!("  * {}", question);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        match session.ask(line).await {
            Ok(reply) => println!("assistant> {}", reply.content),
            Err(e) => println!("error> {}", e),
        }
    }

    session.close();
    tracing::info!(
        session_id = %session.id(),
        messages = session.message_count(),
        "Chat ended"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = VeritasConfig::load_or_default(&config_file);

    // Tracing. Logs go to stderr so command output stays clean.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Veritas v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(path = %config_file.display(), "Configuration resolved");

    // Providers.
    let random: Arc<dyn RandomSource> = match args.resolve_seed(config.analysis.seed) {
        Some(seed) => {
            tracing::info!(seed, "Using seeded random source");
            Arc::new(StdRandom::seeded(seed))
        }
        None => Arc::new(StdRandom::from_entropy()),
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let matcher = AnalysisMatcher::with_config(
        seed_records(),
        Arc::clone(&random),
        Arc::clone(&clock),
        &config.analysis,
    );

    match &args.command {
        Command::History => print_history(&matcher),
        Command::Analyze { json, .. } => {
            let text = args.command.text().unwrap_or_default();
            let record = matcher.match_text(&text);
            if *json {
                println!("{}", serde_json::to_string_pretty(record.as_ref())?);
            } else {
                print_record(&record);
            }
        }
        Command::Chat { .. } => {
            let text = args.command.text().unwrap_or_default();
            let record = matcher.match_text(&text);
            print_record(&record);
            println!();

            let generator = build_generator(&config, Arc::clone(&random))?;
            let session = ConversationSession::new(record, generator, clock, config.chat.clone());
            run_chat(session).await?;
        }
    }

    Ok(())
}
