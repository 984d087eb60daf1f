use std::{env, fs, path::PathBuf};

use dharti_cli::{build_verifier, init_tracing};
use dharti_core::config::Config;
use dharti_verify::VerifyRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(path) = args.first().map(PathBuf::from) else {
        eprintln!("Usage: dharti-verify <file>");
        std::process::exit(1)
    };
    let bytes = fs::read(&path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let service = build_verifier(&settings);
    let response = service.verify(&VerifyRequest::from_bytes(filename, &bytes)).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    if response.ok {
        println!("📒 Recorded in {}", service.ledger().path().display());
    }
    Ok(())
}
