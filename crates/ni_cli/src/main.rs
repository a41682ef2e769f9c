use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ni_core::{ArticleUrl, DEFAULT_MODEL};
use ni_inference::{create_model, Config, ImpactAnalyzer, OPENROUTER_URL};
use ni_scrappers::{create_extractor, ExtractionStrategy, FetchSettings};
use tracing::{info, warn};

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Analyze the impact of news articles with LLM models", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pipeline: PipelineArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// API key of the LLM provider
    #[arg(long, env = "OPEN_ROUTER", hide_env_values = true, global = true)]
    api_key: Option<String>,
    /// Base URL of the OpenAI compatible provider
    #[arg(long, env = "NI_PROVIDER_URL", default_value = OPENROUTER_URL, global = true)]
    provider_url: String,
    /// Directory holding `<name>_prompt.txt` templates
    #[arg(long, env = "NI_TEMPLATE_DIR", default_value = "prompts", global = true)]
    template_dir: PathBuf,
    /// Article extraction strategy
    #[arg(long, value_enum, default_value_t = ExtractionStrategy::Heuristic, global = true)]
    extractor: ExtractionStrategy,
    /// Page fetch timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    fetch_timeout: u64,
    /// LLM request timeout in seconds
    #[arg(long, default_value_t = 120, global = true)]
    llm_timeout: u64,
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, env = "NI_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "NI_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "NI_PORT", default_value_t = 5000)]
        port: u16,
        /// Maximum number of analyses in flight
        #[arg(long, default_value_t = ni_web::DEFAULT_MAX_CONCURRENCY)]
        max_concurrency: usize,
    },
    /// Analyze a single article and print the result as JSON
    Analyze {
        url: ArticleUrl,
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },
}

fn build_analyzer(args: &PipelineArgs) -> anyhow::Result<ImpactAnalyzer> {
    let fetch_settings = FetchSettings {
        timeout: Duration::from_secs(args.fetch_timeout),
        ..FetchSettings::default()
    };
    let extractor = create_extractor(args.extractor, &fetch_settings)?;
    info!("📰 Extractor initialized (using {})", extractor.name());

    if args.api_key.is_none() {
        warn!("⚠️ OPEN_ROUTER is not set, model calls will fail");
    }
    let config = Config {
        api_key: args.api_key.clone(),
        provider_url: args.provider_url.clone(),
        template_dir: args.template_dir.clone(),
        request_timeout: Duration::from_secs(args.llm_timeout),
    };
    let model = create_model(&config)?;
    info!("🧠 Inference model initialized (templates in {})", config.template_dir.display());

    Ok(ImpactAnalyzer::new(extractor, model))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _logging = logging::init_logging(cli.pipeline.log_dir.as_deref())?;

    let analyzer = Arc::new(build_analyzer(&cli.pipeline)?);

    match cli.command {
        Commands::Serve { host, port, max_concurrency } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
            let app = ni_web::create_app(ni_web::AppState::new(analyzer), max_concurrency);
            ni_web::serve(app, addr, shutdown_signal()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Analyze { url, model } => {
            let record = analyzer.analyze_record(&url, &model).await;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(if record.is_error() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::try_parse_from(["ni", "analyze", "https://example.com/a"]).unwrap();
        assert_eq!(cli.pipeline.extractor, ExtractionStrategy::Heuristic);
        assert_eq!(cli.pipeline.provider_url, OPENROUTER_URL);
        match cli.command {
            Commands::Analyze { url, model } => {
                assert_eq!(url.as_str(), "https://example.com/a");
                assert_eq!(model, DEFAULT_MODEL);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_analyze_rejects_malformed_url() {
        assert!(Cli::try_parse_from(["ni", "analyze", "not-a-url"]).is_err());
    }

    #[test]
    fn test_serve_options() {
        let cli = Cli::try_parse_from([
            "ni", "serve", "--port", "8080", "--extractor", "structured", "--max-concurrency", "4",
        ])
        .unwrap();
        assert_eq!(cli.pipeline.extractor, ExtractionStrategy::Structured);
        match cli.command {
            Commands::Serve { port, max_concurrency, .. } => {
                assert_eq!(port, 8080);
                assert_eq!(max_concurrency, 4);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_build_analyzer() {
        let cli = Cli::try_parse_from(["ni", "--api-key", "k", "analyze", "https://example.com/a"]).unwrap();
        assert!(build_analyzer(&cli.pipeline).is_ok());
    }
}
