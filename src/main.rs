use repobuild::analyzer::{BuildPlan, InstructionAnalyzer};
use repobuild::builder::BuildPipeline;
use repobuild::cache::{cache_key, AnalysisCache};
use repobuild::compare::compare_repositories;
use repobuild::config::Config;
use repobuild::github::GithubService;
use repobuild::llm::{GenAiClient, LlmClient};
use repobuild::retry::RetryPolicy;
use repobuild::util::{init_logging, parse_level, LoggingConfig};
use repobuild::VERSION;

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn, Level};

/// Analyze a GitHub repository's README with an LLM and run the build it describes
#[derive(Parser, Debug)]
#[command(
    name = "repobuild",
    about = "LLM-driven README analysis and automated repository builds",
    version,
    long_about = "repobuild downloads a GitHub repository, infers build and test \
                  instructions from its README using a language model, and executes \
                  them as a staged sequence of shell commands. A second repository \
                  URL may be given to diff file sets after the build."
)]
struct CliArgs {
    /// Path to the YAML configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// GitHub repository URL to analyze and build (prompted for when omitted)
    #[arg(value_name = "URL")]
    repo_url: Option<String>,

    /// Second repository URL for file comparison
    #[arg(value_name = "COMPARE_URL")]
    compare_url: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config = match Config::from_yaml(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let level = args
        .log_level
        .as_deref()
        .map(parse_level)
        .unwrap_or(Level::INFO);
    init_logging(LoggingConfig {
        level,
        log_dir: Some(config.log_directory.clone()),
    });
    debug!("repobuild v{} starting", VERSION);

    // Command-line URLs make the run scriptable; otherwise the session is
    // interactive, one required URL and one optional comparison URL.
    let (repo_url, compare_url) = match args.repo_url {
        Some(url) => (url, args.compare_url),
        None => {
            let url = prompt("Enter the GitHub repository URL to analyze and build: ");
            if url.is_empty() {
                error!("Repository URL is required");
                process::exit(1);
            }
            let second =
                prompt("Enter second repository URL for comparison (optional, press Enter to skip): ");
            (url, (!second.is_empty()).then_some(second))
        }
    };

    let exit_code = run_session(&config, &repo_url, compare_url.as_deref()).await;
    process::exit(exit_code);
}

fn prompt(message: &str) -> String {
    print!("{}", message);
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(_) => line.trim().to_string(),
        Err(_) => String::new(),
    }
}

async fn run_session(config: &Config, repo_url: &str, compare_url: Option<&str>) -> i32 {
    let github = match GithubService::new(config) {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to initialize GitHub service: {}", e);
            return 1;
        }
    };
    if let Err(e) = github.validate_token().await {
        error!("Failed to initialize GitHub service: {}", e);
        return 1;
    }

    let client: Arc<dyn LlmClient> = Arc::new(GenAiClient::new(
        config.model_name.clone(),
        config.openai_api_key.clone(),
        Duration::from_secs(config.timeout_secs),
    ));
    let analyzer = InstructionAnalyzer::new(client);
    let cache: AnalysisCache<Option<BuildPlan>> = AnalysisCache::new(config.cache_capacity);
    let retry = RetryPolicy::new(config.max_retries, Duration::from_secs(1));
    let pipeline = BuildPipeline::new();

    info!("Processing repository 1: {}", repo_url);
    let (repo1_path, repo1) = match github.download_repository(repo_url).await {
        Ok(downloaded) => downloaded,
        Err(e) => {
            error!("Failed to process repository 1: {}", e);
            return 0;
        }
    };

    let readme = match github.get_readme(&repo1).await {
        Some(readme) => readme,
        None => {
            warn!("No README found in repository");
            return 0;
        }
    };

    // Caching wraps retry wraps extraction, composed here so the order
    // stays visible at the call site.
    let key = cache_key(&readme);
    let plan = cache
        .get_or_compute(&key, || async {
            retry.run(|| analyzer.extract(&readme)).await.ok()
        })
        .await;

    let plan = match plan {
        Some(plan) => plan,
        None => {
            warn!("No build instructions found in README");
            return 0;
        }
    };

    info!("Analyzed build instructions:");
    info!(
        "{}",
        serde_json::to_string_pretty(&plan).unwrap_or_else(|_| "<unprintable>".to_string())
    );

    match pipeline.execute(&repo1_path, &plan).await {
        Ok(true) => info!("Repository built successfully!"),
        Ok(false) => error!("Repository build failed!"),
        Err(e) => error!("Build process failed: {}", e),
    }

    if let Some(url2) = compare_url {
        info!("Processing repository 2: {}", url2);
        match github.download_repository(url2).await {
            Ok((repo2_path, _)) => {
                let missing = compare_repositories(&repo1_path, &repo2_path);
                if missing.is_empty() {
                    info!("No missing files found");
                } else {
                    info!("Missing files:");
                    for file in &missing {
                        info!("  - {}", file.display());
                    }
                }
            }
            Err(e) => error!("Failed to process repository 2: {}", e),
        }
    }

    0
}
