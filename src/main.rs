use anyhow::{Context, Result};
use cabinet_scan::config::ModelConfig;
use cabinet_scan::prompts::PromptVersion;
use cabinet_scan::{CabinetScanner, Config};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cabinet-scan")]
#[command(about = "Report the empty slots in a phone storage cabinet photo")]
struct CliArgs {
    /// JPEG or PNG photo of the cabinet.
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Model ID, overriding CABINET_MODEL.
    #[arg(long)]
    model: Option<String>,

    /// Prompt version (v1 or v2), overriding CABINET_PROMPT_VERSION.
    #[arg(long, value_parser = parse_prompt_version)]
    prompt_version: Option<PromptVersion>,
}

fn parse_prompt_version(input: &str) -> std::result::Result<PromptVersion, String> {
    input.parse().map_err(|e: cabinet_scan::Error| e.to_string())
}

fn apply_overrides(config: &mut Config, args: &CliArgs) -> cabinet_scan::Result<()> {
    if let Some(model) = &args.model {
        let model = ModelConfig::new(&config.model.base_url, &config.model.api_version, model);
        if model.model.is_empty() {
            return Err(cabinet_scan::Error::Configuration(
                "--model is blank".to_string(),
            ));
        }
        config.model = model;
    }
    if let Some(version) = args.prompt_version {
        config.prompt_version = version;
    }
    Ok(())
}

async fn read_photo(path: &Path) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        anyhow::bail!("{} is empty", path.display());
    }
    Ok(bytes)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cabinet_scan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = apply_overrides(&mut config, &args) {
        error!("Invalid arguments: {}", e);
        std::process::exit(1);
    }

    let scanner = match CabinetScanner::from_config(&config) {
        Ok(scanner) => scanner,
        Err(e) => {
            error!("Failed to initialize scanner: {}", e);
            std::process::exit(1);
        }
    };

    let bytes = read_photo(&args.image).await?;

    info!("Scanning {}", args.image.display());
    let report = scanner.scan_bytes(&bytes).await;

    println!("{}", report.message);
    if !report.is_success() {
        std::process::exit(2);
    }
    Ok(())
}
