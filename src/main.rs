use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, error, info};
use serde::Deserialize;
use serde_json::Value;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use nereus::service::Provenance;
use nereus::{Config, ObservationRequest, PredictionResult, PredictionService};

#[derive(Parser, Debug)]
#[command(
    name = "nereus",
    version,
    about = "Predict DIN, SRP and pH from satellite reflectance and grade the water quality"
)]
struct Args {
    /// JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Trained model artifact, or a directory containing model.json. Overrides the config file
    /// and NEREUS_MODEL_PATH.
    #[arg(short, long, value_name = "PATH")]
    model_path: Option<PathBuf>,

    /// Inline JSON request, a .json request file or a glob pattern. Reads stdin when omitted.
    input: Option<String>,
}

/// Requests to evaluate and whether the output should be an array.
#[derive(Debug)]
struct Batch {
    requests: Vec<ObservationRequest>,
    is_batch: bool,
}

fn parse_payload(text: &str, origin: &str) -> Result<Batch> {
    let value: Value =
        serde_json::from_str(text).with_context(|| format!("Invalid JSON in {}", origin))?;

    match value {
        Value::Array(items) => {
            let requests = items
                .into_iter()
                .map(ObservationRequest::deserialize)
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Invalid request in {}", origin))?;
            Ok(Batch {
                requests,
                is_batch: true,
            })
        }
        other => Ok(Batch {
            requests: vec![
                ObservationRequest::deserialize(other)
                    .with_context(|| format!("Invalid request in {}", origin))?,
            ],
            is_batch: false,
        }),
    }
}

fn read_file(path: &Path) -> Result<Batch> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_payload(&text, &path.display().to_string())
}

fn read_glob(pattern: &str) -> Result<Batch> {
    let mut paths = glob::glob(pattern)
        .with_context(|| format!("Invalid input pattern {}", pattern))?
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    if paths.is_empty() {
        bail!("No request files match {}", pattern);
    }

    info!("Evaluating {} request files matching {}", paths.len(), pattern);

    let mut requests = Vec::new();
    for path in &paths {
        requests.extend(read_file(path)?.requests);
    }

    Ok(Batch {
        requests,
        is_batch: true,
    })
}

fn read_requests(input: Option<&str>) -> Result<Batch> {
    let Some(input) = input else {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read request from stdin")?;
        return parse_payload(&text, "stdin");
    };

    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return parse_payload(input, "inline request");
    }

    let path = Path::new(input);
    if path.is_file() {
        read_file(path)
    } else {
        read_glob(input)
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    Ok(match &args.model_path {
        Some(path) => config.with_model_path(path),
        None => config.with_env_overrides(),
    })
}

/// Result reported when the input itself cannot be read or decoded.
fn input_failure(service: &PredictionService, error: &anyhow::Error) -> PredictionResult {
    let provenance = Provenance::new(service.backend().kind(), service.model_version(), 0.0, 0.0);
    PredictionResult::failure(provenance, format!("invalid request: {:#}", error))
}

fn render(is_batch: bool, results: &[PredictionResult]) -> Result<String> {
    Ok(match (is_batch, results) {
        (false, [single]) => serde_json::to_string_pretty(single)?,
        _ => serde_json::to_string_pretty(results)?,
    })
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    debug!("{:?}", args);

    let config = load_config(&args)?;
    let service = PredictionService::from_config(&config);
    info!(
        "Using {} backend ({})",
        service.backend().kind(),
        service.model_version()
    );

    let batch = match read_requests(args.input.as_deref()) {
        Ok(batch) => batch,
        Err(e) => {
            error!("{:#}", e);
            println!("{}", render(false, &[input_failure(&service, &e)])?);
            return Ok(ExitCode::FAILURE);
        }
    };

    let results: Vec<PredictionResult> =
        batch.requests.iter().map(|r| service.handle(r)).collect();
    println!("{}", render(batch.is_batch, &results)?);

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        info!("{} of {} requests failed", failed, results.len());
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
