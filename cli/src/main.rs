//! CLI entrypoint for digi-assess
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use assess_application::{ConductAssessmentUseCase, GetResultsUseCase};
use assess_domain::SessionRepository;
use assess_infrastructure::{
    CatalogLoader, ConfigLoader, FileConfig, HttpAssessmentGateway, InMemorySessionStore,
    JsonFileSessionStore, JsonlConversationLogger, StoreBackend,
};
use assess_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, OutputConfig, ProgressReporter, ReplConfig,
    StructuredResults, generate_session_id, render_report,
};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    let issues = config.validate();

    let _log_guard = init_logging(cli.verbose, config.logging.log_file.as_deref())?;
    info!("Starting digi-assess");

    let output_config = OutputConfig {
        format: config.output.format.unwrap_or_default(),
        color: config.output.color,
    };
    output_config.apply_color();

    if cli.command == Command::Config {
        let sources = if cli.no_config {
            Vec::new()
        } else {
            ConfigLoader::config_sources(cli.config.as_deref())
        };
        println!("{}", ConsoleFormatter::format_config(&sources, &issues));
        return Ok(());
    }

    for issue in &issues {
        eprintln!("{}", ConsoleFormatter::format_issue(issue));
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("configuration has errors, run `digi-assess config` for details");
    }

    // === Dependency Injection ===
    let catalog = Arc::new(
        CatalogLoader::load(config.catalog.path.as_deref()).context("failed to load the grid")?,
    );
    info!(criteria = catalog.len(), "Grid loaded");

    if cli.command == Command::Catalog {
        println!("{}", ConsoleFormatter::format_catalog(&catalog));
        return Ok(());
    }

    let store = open_store(&config).await?;
    let gateway = Arc::new(HttpAssessmentGateway::new(
        config.gateway.base_url.clone(),
        config.gateway.timeout(),
        config.gateway.rate_limit_markers.clone(),
    )?);

    let mut conduct = ConductAssessmentUseCase::new(gateway, store.clone(), catalog.clone())
        .with_params(config.to_assessment_params());
    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::open(path) {
            Some(logger) => conduct = conduct.with_conversation_logger(Arc::new(logger)),
            None => warn!(path = %path.display(), "Conversation log unavailable"),
        }
    }
    let results = GetResultsUseCase::new(store, catalog.clone());

    let progress = if cli.quiet {
        ProgressReporter::hidden()
    } else {
        ProgressReporter::new()
    };
    let owner = cli.owner.as_str();

    match cli.command {
        Command::Start { session } => {
            let session_id = session.unwrap_or_else(|| generate_session_id(owner));
            let turn = progress
                .run(
                    "Préparation de la première question...",
                    conduct.start(&session_id, owner),
                )
                .await?;
            println!("Session: {}\n", session_id);
            println!("{}", ConsoleFormatter::format_turn(&turn));
        }
        Command::Answer { session, text } => {
            let answer = text.join(" ");
            let turn = progress
                .run(
                    "Analyse de votre réponse...",
                    conduct.submit_answer(&session, owner, &answer),
                )
                .await?;
            println!("{}", ConsoleFormatter::format_turn(&turn));
        }
        Command::Resume { session } => {
            let session_id = match session {
                Some(id) => id,
                None => conduct
                    .latest_session_id(owner)
                    .await?
                    .ok_or_else(|| anyhow!("no unfinished session for owner '{}'", owner))?,
            };
            let state = progress
                .run("Reprise de la session...", conduct.resume(&session_id, owner))
                .await?;
            println!("{}", ConsoleFormatter::format_resume(&state, catalog.len()));
        }
        Command::Results {
            session,
            format,
            out,
        } => {
            let session_results = results.execute(&session, owner).await?;
            let doc = StructuredResults::new(&session_results, &catalog);
            let format = format.map(Into::into).unwrap_or(output_config.format);
            let rendered = render_report(format, &catalog, &doc);

            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Report written to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Command::Chat { session } => {
            let repl_config = ReplConfig {
                show_progress: !cli.quiet,
                ..ReplConfig::default()
            };
            let mut repl = ChatRepl::new(conduct, results, owner)
                .with_session(session)
                .with_config(&repl_config);
            repl.run().await?;
        }
        Command::Catalog | Command::Config => {}
    }

    Ok(())
}

/// Install the stderr subscriber, plus a non-blocking file writer when
/// `log_file` is set. The returned guard flushes the file on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("logging.log_file must name a file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn open_store(config: &FileConfig) -> Result<Arc<dyn SessionRepository>> {
    let (backend, _) = config.store.parse_backend();
    let store: Arc<dyn SessionRepository> = match backend {
        StoreBackend::File => {
            let dir = config.store.resolved_path();
            info!(dir = %dir.display(), "Using file session store");
            Arc::new(JsonFileSessionStore::open(dir).await?)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory session store, sessions end with the process");
            Arc::new(InMemorySessionStore::new())
        }
    };
    Ok(store)
}
