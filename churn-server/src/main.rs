//! Churn prediction service - main entry point

use churn_server::{run_server, ServerConfig};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "churn_server=info,tower_http=debug".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = ServerConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    config.port = args[i + 1].parse().unwrap_or(8080);
                    i += 1;
                }
            }
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    config.host = args[i + 1].clone();
                    i += 1;
                }
            }
            "--model" | "-m" => {
                if i + 1 < args.len() {
                    config.model_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    run_server(config).await
}

fn print_help() {
    println!(
        r#"
Churn Prediction Service

USAGE:
    churn-server [OPTIONS]

OPTIONS:
    -p, --port <PORT>       Server port (default: 8080)
    -h, --host <HOST>       Server host (default: 0.0.0.0)
    -m, --model <PATH>      Model artifact (default: models/churn_model.json)
    --help                  Print this help message

The model artifact must exist before startup; run the training pipeline
first if it does not.
"#
    );
}
