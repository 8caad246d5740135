//! CLI entrypoint for draftloop
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use draftloop_application::config::execution_params::MAX_ROUNDS_LIMIT;
use draftloop_application::{
    CascadeProgress, CollaborateInput, CollaborationController, CollaborationProgress,
    ComposeArticleInput, ComposeArticleUseCase, MediaProvider, NoProgress, ProviderCascade,
    SessionLogger, TextGenerator,
};
use draftloop_domain::{
    Artifact, CollaborationResult, ConfigIssue, MediaRequest, OutputFormat, Severity,
};
use draftloop_infrastructure::{
    ConfigLoader, FileConfig, HttpMediaProvider, JsonlSessionLogger, OpenAiTextGenerator,
    build_classifier,
};
use draftloop_presentation::{
    Cli, Command, ConsoleFormatter, DraftArgs, MediaArgs, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.file_dir.as_deref());
    info!("Starting draftloop");

    ConsoleFormatter::set_color(config.output.color && std::io::stdout().is_terminal());

    let issues = config.validate();
    if matches!(cli.command, Command::Config) {
        if !cli.no_config {
            ConfigLoader::print_config_sources(cli.config.as_deref());
        }
        print_issues(&issues);
        if issues.is_empty() {
            println!("\nNo configuration issues found.");
        }
        return Ok(());
    }

    print_issues(&issues);
    if issues.iter().any(ConfigIssue::is_error) {
        bail!("Configuration has errors. Run `draftloop config` for details.");
    }

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    // === Cancellation ===
    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                warn!("Received Ctrl+C, stopping after the current step");
                token.cancel();
            }
        });
    }

    let session_path = cli.session_log.clone().or(config.logging.session_log.clone());
    let session_logger: Option<Arc<dyn SessionLogger>> = session_path
        .as_deref()
        .and_then(JsonlSessionLogger::new)
        .map(|logger| {
            info!("Session log: {}", logger.path().display());
            Arc::new(logger) as Arc<dyn SessionLogger>
        });

    // === Progress ===
    let reporter = ProgressReporter::new();
    let (collaboration_progress, cascade_progress): (
        &dyn CollaborationProgress,
        &dyn CascadeProgress,
    ) = if cli.quiet || !config.output.show_progress {
        (&NoProgress, &NoProgress)
    } else if std::io::stderr().is_terminal() {
        (&reporter, &reporter)
    } else {
        (&SimpleProgress, &SimpleProgress)
    };

    match cli.command {
        Command::Write { draft } => {
            let controller =
                build_controller(&config, &draft, &cancellation, session_logger.clone());
            let result = controller
                .run_with_progress(collaborate_input(&config, &draft), collaboration_progress)
                .await?;

            println!("{}", ConsoleFormatter::render_collaboration(&result, format));
            if let Some(path) = &draft.out {
                export_draft(path, &result, None)?;
            }
            if result.draft.is_none() {
                bail!("No draft produced: {}", result.termination_reason);
            }
        }

        Command::Illustrate {
            prompt,
            capability,
            media,
            negative_prompt,
        } => {
            let cascade = build_cascade(&config, &media, &cancellation, session_logger.clone())?;
            let mut request = MediaRequest::new(prompt, capability);
            if let Some(size) = media.size {
                request = request.with_size(size);
            }
            if let Some(negative) = negative_prompt {
                request = request.with_negative_prompt(negative);
            }

            let result = match cascade
                .generate_with_progress(&request, cascade_progress)
                .await
            {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => {
                    warn!("Interrupted before any provider produced an artifact");
                    bail!(e);
                }
                Err(e) => return Err(e.into()),
            };

            println!("{}", ConsoleFormatter::render_cascade(&result, format));
            if !result.is_success() {
                bail!("No provider produced an artifact: {}", result.outcome.detail);
            }
        }

        Command::Article {
            draft,
            media,
            illustration_style,
            no_illustration,
        } => {
            let controller =
                build_controller(&config, &draft, &cancellation, session_logger.clone());
            let cascade = build_cascade(&config, &media, &cancellation, session_logger.clone())?;
            let use_case = ComposeArticleUseCase::new(controller, cascade);

            let mut input = ComposeArticleInput::new(collaborate_input(&config, &draft));
            if no_illustration {
                input = input.without_illustration();
            }
            if let Some(style) = illustration_style {
                input = input.with_illustration_style(style);
            }
            if let Some(size) = media.size {
                input = input.with_image_size(size);
            }

            let output = use_case
                .execute_with_progress(input, collaboration_progress, cascade_progress)
                .await?;

            println!("{}", ConsoleFormatter::render_article(&output, format));
            if let Some(path) = &draft.out {
                let cover = output.illustration.as_ref().and_then(|r| r.artifact());
                export_draft(path, &output.collaboration, cover)?;
            }
            if output.collaboration.draft.is_none() {
                bail!("No draft produced: {}", output.collaboration.termination_reason);
            }
        }

        Command::Config => {}
    }

    Ok(())
}

/// Install the stderr subscriber and, when configured, a daily log file.
fn init_logging(verbose: u8, file_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match file_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "draftloop.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

fn print_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        let label = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        eprintln!("config {}: {}", label, issue.message);
    }
}

fn collaborate_input(config: &FileConfig, args: &DraftArgs) -> CollaborateInput {
    let max_rounds = match args.max_rounds {
        // 0 is passed through so the use case rejects it
        Some(rounds) => rounds.min(MAX_ROUNDS_LIMIT),
        None => config.collaboration.rounds().0,
    };
    let mut input = CollaborateInput::new(&args.topic)
        .with_max_rounds(max_rounds)
        .with_target_length(
            args.target_length
                .unwrap_or(config.collaboration.target_length),
        );
    if let Some(style) = args.style.as_ref().or(config.collaboration.style.as_ref()) {
        input = input.with_style(style);
    }
    input
}

fn build_controller(
    config: &FileConfig,
    args: &DraftArgs,
    cancellation: &CancellationToken,
    session_logger: Option<Arc<dyn SessionLogger>>,
) -> CollaborationController {
    let text = &config.text;
    if text.api_key().is_none() {
        warn!(
            "{} is not set; text requests are sent without an API key",
            text.api_key_env
        );
    }

    let author_model = args.author_model.as_deref().unwrap_or(&text.author_model);
    let critic_model = args.critic_model.as_deref().unwrap_or(&text.critic_model);
    let author: Arc<dyn TextGenerator> =
        Arc::new(OpenAiTextGenerator::from_config(text, author_model));
    let critic: Arc<dyn TextGenerator> =
        Arc::new(OpenAiTextGenerator::from_config(text, critic_model));
    info!("Author: {}, critic: {}", author_model, critic_model);

    let mut controller = CollaborationController::new(
        author,
        critic,
        &config.collaboration.to_execution_params(),
    )
    .with_cancellation(cancellation.clone());
    if let Some(logger) = session_logger {
        controller = controller.with_session_logger(logger);
    }
    controller
}

fn build_cascade(
    config: &FileConfig,
    args: &MediaArgs,
    cancellation: &CancellationToken,
    session_logger: Option<Arc<dyn SessionLogger>>,
) -> Result<ProviderCascade> {
    let mut cascade_config = config.cascade.clone();
    if let Some(retries) = args.retries {
        cascade_config.retries = retries;
    }

    let providers: Vec<Arc<dyn MediaProvider>> = config
        .media_providers
        .iter()
        .map(|provider| {
            Arc::new(HttpMediaProvider::from_config(
                provider,
                cascade_config.attempt_timeout(),
            )) as Arc<dyn MediaProvider>
        })
        .collect();
    let classifier = build_classifier(&config.media_providers)?;

    let mut cascade = ProviderCascade::new(providers, cascade_config.to_retry_policy())
        .with_classifier(Arc::new(classifier))
        .with_cancellation(cancellation.clone());
    if let Some(logger) = session_logger {
        cascade = cascade.with_session_logger(logger);
    }
    Ok(cascade)
}

/// Markdown for `--out`: the draft, with the cover linked under the title.
fn draft_markdown(result: &CollaborationResult, cover: Option<&Artifact>) -> Option<String> {
    let draft = result.draft.as_ref()?;
    let markdown = draft.to_markdown();
    match cover {
        Some(Artifact::Uri { uri }) => {
            let (title, body) = markdown.split_once("\n\n").unwrap_or((markdown.as_str(), ""));
            Some(format!("{}\n\n![cover]({})\n\n{}", title, uri, body))
        }
        _ => Some(markdown),
    }
}

fn export_draft(path: &Path, result: &CollaborationResult, cover: Option<&Artifact>) -> Result<()> {
    let Some(markdown) = draft_markdown(result, cover) else {
        warn!("No draft to write to {}", path.display());
        return Ok(());
    };
    std::fs::write(path, markdown)
        .with_context(|| format!("Failed to write draft to {}", path.display()))?;
    info!("Draft written to {}", path.display());
    Ok(())
}
