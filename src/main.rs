use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use visecode::analysis::Analyzer;
use visecode::config::Config;
use visecode::fix::{FixApplicator, ReferenceTable};
use visecode::schema::AnalysisRequest;
use visecode::server::{self, AppState};
use visecode::{generator, triage};

#[derive(Parser)]
#[command(name = "visecode", version, about = "LLM-backed bug finder and fix applicator")]
struct Cli {
    /// Path to the JSON config file (default: visecode.json)
    #[arg(short, long, default_value = "")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Analyze one file and print the result as JSON
    Analyze {
        file: PathBuf,
        /// Language hint passed to the model
        #[arg(long)]
        language: Option<String>,
        /// Apply the first suggested fix and print the updated code
        #[arg(long)]
        apply_first: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 1. Load config (only the server writes a template)
    let mut config = match cli.command {
        None | Some(Command::Serve { .. }) => Config::load_or_init(&cli.config)?,
        Some(Command::Analyze { .. }) => Config::load(&cli.config)?,
    };
    if let Some(Command::Serve { bind: Some(bind) }) = &cli.command {
        config.server.bind = bind.clone();
    }
    config.validate().context("invalid configuration")?;

    // 2. Build analyzer and applicator
    let analyzer = Analyzer::new(generator::from_config(&config.model));
    let applicator = FixApplicator::new(ReferenceTable::with_overrides(
        &config.fix.reference_snippets,
    ));

    match cli.command {
        None | Some(Command::Serve { .. }) => {
            info!("Starting visecode server...");
            let listener = tokio::net::TcpListener::bind(config.bind_addr()?)
                .await
                .with_context(|| format!("failed to bind {}", config.server.bind))?;
            server::serve(listener, AppState::new(analyzer, applicator), server::ctrl_c()).await
        }
        Some(Command::Analyze {
            file,
            language,
            apply_first,
        }) => {
            let code = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            anyhow::ensure!(!code.is_empty(), "{} is empty", file.display());

            let mut request = AnalysisRequest::new(code);
            request.file_name = file.file_name().map(|n| n.to_string_lossy().into_owned());
            request.language = language;

            let result = analyzer.analyze(&request).await?;
            info!("Verdict: {}", triage::classify(&result).as_str());
            println!("{}", serde_json::to_string_pretty(&result)?);

            if apply_first {
                if let Some(fix) = triage::primary_fix(&result) {
                    let applied =
                        applicator.apply_fix(&request.code, &fix.id, &result.fix_suggestions)?;
                    info!("{}", applied.message);
                    println!("{}", applied.updated_code);
                } else {
                    info!("No fix suggestions to apply");
                }
            }
            Ok(())
        }
    }
}
