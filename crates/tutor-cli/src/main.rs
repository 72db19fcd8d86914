//! AI Tutor CLI
//!
//! Serves the tutoring API, or generates a single quiz and exports it as HTML.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tutor_engine::{
    create_router, AppState, ChatCompletionClient, Config, QuizRequest, QuizResult, TutorService,
};
use tutor_quiz::{export_quiz_to_html, write_html, RenderMode};

/// AI Tutor - personalized explanations and quizzes from a language model
#[derive(Parser, Debug)]
#[command(name = "tutor")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: tutor.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate one quiz and export it as an HTML page
    Quiz {
        /// Academic subject, e.g. "Physics"
        #[arg(short, long)]
        subject: String,

        /// Learning level, e.g. "Beginner"
        #[arg(short, long)]
        level: String,

        /// Number of questions (overrides quiz.defaultQuestions)
        #[arg(short = 'n', long)]
        num_questions: Option<u32>,

        /// Render the reveal-only page without answer checking
        #[arg(long)]
        simple: bool,

        /// Output file (overrides quiz.exportPath)
        #[arg(short, long, value_name = "FILE")]
        out: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::debug!(config = ?args.config, "Config file");

    let result = match args.command {
        Command::Serve { port, host } => run_server(args.config.as_deref(), port, host).await,
        Command::Quiz {
            subject,
            level,
            num_questions,
            simple,
            out,
        } => {
            let options = QuizOptions {
                subject,
                level,
                num_questions,
                simple,
                out,
            };
            run_quiz(args.config.as_deref(), options).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Options for a one-off quiz export.
#[derive(Debug)]
struct QuizOptions {
    subject: String,
    level: String,
    num_questions: Option<u32>,
    simple: bool,
    out: Option<String>,
}

/// Serves the HTTP API until Ctrl+C.
async fn run_server(
    config_path: Option<&str>,
    port: Option<u16>,
    host: Option<String>,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }

    // Re-validate after overrides
    config.validate()?;

    print_config(&config);

    let service = build_service(&config)?;
    let router = create_router(AppState::new(service));

    let listener = bind_listener(&config.server.host, config.server.port).await?;
    let addr = listener.local_addr()?;

    println!();
    println!("AI Tutor API running on http://{addr}");
    println!("Press Ctrl+C to stop");
    tracing::info!(%addr, "HTTP server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Binds the API listener. `host` may be an IP address or a resolvable hostname.
async fn bind_listener(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind((host, port)).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {host}:{port}: {e}\n\nSuggestion: Check --host or try a different port with --port"
        )
    })
}

/// Generates one quiz and writes it to disk.
async fn run_quiz(config_path: Option<&str>, options: QuizOptions) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let num_questions = options
        .num_questions
        .unwrap_or(config.quiz.default_questions);
    let out = options
        .out
        .map_or_else(|| PathBuf::from(&config.quiz.export_path), PathBuf::from);

    let service = build_service(&config)?;
    let request =
        QuizRequest::new(&options.subject, &options.level, num_questions).with_reveal_format(false);

    println!(
        "Generating {num_questions} {} question(s) on {}...",
        options.level, options.subject
    );
    let result = service.generate_quiz(&request).await?;

    export(&result, options.simple, &out)?;
    print_quiz_summary(&result, &out);

    Ok(())
}

/// Writes the quiz page in the requested mode.
fn export(result: &QuizResult, simple: bool, out: &Path) -> anyhow::Result<()> {
    if simple {
        write_html(&result.quiz, RenderMode::Simple, out).map_err(|e| {
            anyhow::anyhow!("Failed to export quiz to '{}': {e}", out.display())
        })?;
    } else if !export_quiz_to_html(&result.quiz, out) {
        anyhow::bail!(
            "Failed to export quiz to '{}'\n\nSuggestion: Check write permissions and that the directory exists",
            out.display()
        );
    }
    Ok(())
}

/// Builds the tutoring service from config and the API key in the environment.
fn build_service(config: &Config) -> anyhow::Result<TutorService> {
    let api_key = config.api_key()?;
    let client = ChatCompletionClient::new(&config.llm, api_key);
    tracing::debug!(?client, "LLM client ready");
    Ok(TutorService::new(Arc::new(client)))
}

/// Loads configuration from file or defaults.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Resolves when Ctrl+C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
}

/// Prints configuration summary.
fn print_config(config: &Config) {
    println!("Configuration loaded:");
    println!("  LLM endpoint: {}", config.llm.base_url);
    println!("  Model: {}", config.llm.model);
    println!("  Temperature: {}", config.llm.temperature);
    println!("  API key variable: {}", config.llm.api_key_env);
}

/// Prints what was generated and where it went.
fn print_quiz_summary(result: &QuizResult, out: &Path) {
    println!();
    println!("Quiz exported:");
    println!("  File: {}", out.display());
    println!("  Questions: {}", result.quiz.len());
    if result.used_fallback {
        println!("  Note: the model reply could not be parsed; placeholder questions were used");
    }
}
