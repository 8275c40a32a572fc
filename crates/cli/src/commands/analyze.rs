//! `consilium analyze` — run the specialist panel over one document.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use consilium_config::AppConfig;
use consilium_core::event::{EventBus, RunEvent, RunPhase};
use consilium_core::generation::ProviderClient;
use consilium_core::role::Role;
use consilium_panel::Orchestrator;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::report::{self, ReportFormat};

pub struct AnalyzeArgs {
    pub file: Option<PathBuf>,
    pub text: Option<String>,
    pub sample: bool,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub timeout: Option<u64>,
    pub roles: Vec<Role>,
    pub provider: Option<String>,
    pub model: Option<String>,
}

/// Synthetic case report shipped with the binary for trying out the panel.
pub const SAMPLE_REPORT: &str = include_str!("../../assets/sample_report.txt");

/// Providers that run without credentials.
const LOCAL_PROVIDERS: &[&str] = &["ollama", "vllm", "llamacpp", "llama.cpp"];

pub async fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(provider) = args.provider {
        config.default_provider = provider;
    }
    debug!(?config, "Loaded configuration");

    if !config.has_api_key() && !LOCAL_PROVIDERS.contains(&config.default_provider.as_str()) {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENAI_API_KEY      (for OpenAI direct)");
        eprintln!("    OPENROUTER_API_KEY  (with --provider openrouter)");
        eprintln!("    CONSILIUM_API_KEY   (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let document = read_document(args.file, args.text, args.sample)?;
    if document.trim().is_empty() {
        return Err("The document is empty; nothing to analyze.".into());
    }

    let roles = if args.roles.is_empty() {
        config.panel.specialist_roles()?
    } else {
        args.roles
    };

    let model = args
        .model
        .or_else(|| {
            config
                .providers
                .get(&config.default_provider)
                .and_then(|p| p.default_model.clone())
        })
        .unwrap_or_else(|| config.default_model.clone());

    let router = consilium_providers::build_from_config(&config);
    let provider = router.require_default()?;
    let client = ProviderClient::new(provider, &model)
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens);

    let event_bus = Arc::new(EventBus::default());
    let mut orchestrator = Orchestrator::new(Arc::new(client))
        .with_failure_placeholder(config.panel.failure_placeholder.clone())
        .with_event_bus(event_bus.clone());
    if let Some(limit) = args.concurrency.or(config.panel.concurrency) {
        orchestrator = orchestrator.with_concurrency(limit);
    }
    if let Some(timeout) = args
        .timeout
        .map(Duration::from_secs)
        .or_else(|| config.panel.task_timeout())
    {
        orchestrator = orchestrator.with_task_timeout(timeout);
    }

    eprintln!();
    eprintln!("  🩺 Consilium — specialist panel");
    eprintln!("  Provider:  {}", config.default_provider);
    eprintln!("  Model:     {model}");
    eprintln!("  Panel:     {}", role_list(&roles));
    eprintln!();

    let progress = spawn_progress(&event_bus);
    let result = orchestrator
        .run(&document, &roles, Role::MultidisciplinaryTeam)
        .await;

    // Closing the bus ends the progress printer
    drop(orchestrator);
    drop(event_bus);
    let _ = progress.await;
    let result = result?;

    let rendered = report::render(&result, &document, args.format);
    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            info!(path = %path.display(), "Report written");
            eprintln!("\n  ✅ Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn read_document(
    file: Option<PathBuf>,
    text: Option<String>,
    sample: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    match (file, text) {
        (Some(path), _) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()).into()),
        (None, Some(text)) => Ok(text),
        (None, None) if sample => Ok(SAMPLE_REPORT.to_string()),
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn role_list(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print one stderr line per progress event until the bus closes.
fn spawn_progress(event_bus: &EventBus) -> JoinHandle<()> {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(line) = progress_line(&event) {
                        eprintln!("{line}");
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn progress_line(event: &RunEvent) -> Option<String> {
    match event {
        RunEvent::PhaseChanged { phase, .. } => match phase {
            RunPhase::FanningOut => Some("  Consulting specialists...".into()),
            RunPhase::Synthesizing => Some("  Multidisciplinary team reviewing reports...".into()),
            _ => None,
        },
        RunEvent::SpecialistStarted { .. } => None,
        RunEvent::SpecialistFinished {
            role,
            success,
            completed,
            total,
            elapsed_ms,
            ..
        } => Some(format!(
            "  [{completed}/{total}] {} {} {role} ({:.1}s)",
            status_mark(*success),
            role.icon(),
            *elapsed_ms as f64 / 1000.0
        )),
        RunEvent::SynthesisFinished {
            success, elapsed_ms, ..
        } => Some(format!(
            "  {} Team synthesis ({:.1}s)",
            status_mark(*success),
            *elapsed_ms as f64 / 1000.0
        )),
    }
}

fn status_mark(success: bool) -> &'static str {
    if success { "✅" } else { "❌" }
}
