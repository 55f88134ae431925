use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use ledger::SheetsLedger;
use streakboard_channels::TelegramClient;
use streakboard_config::Config;
use streakboard_gateway::AppState;
use streakboard_understanding::{OcrClient, VisionClient};

#[derive(Parser)]
#[command(name = "streakboard")]
#[command(about = "Streakboard — streak screenshot intake service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Streakboard HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current service status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init_logger(&config.log_dir, &config.log_level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("Streakboard is not running on port {}", config.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        upload_dir = %config.upload_dir,
        "Starting Streakboard"
    );

    std::fs::create_dir_all(&config.upload_dir)?;

    // Construct outbound clients explicitly and inject them through state.
    // An integration without configuration stays unregistered; requests that
    // need it get a reported error, never a crash.
    let vision = match (&config.vision_endpoint, &config.vision_api_key) {
        (Some(endpoint), Some(api_key)) => {
            info!(
                "Registered vision extraction client ({})",
                config.vision_deployment
            );
            Some(VisionClient::new(
                endpoint.clone(),
                api_key.clone(),
                config.vision_deployment.clone(),
            ))
        }
        _ => {
            warn!("VISION_ENDPOINT / VISION_API_KEY not set; extraction will report an error");
            None
        }
    };

    let ledger = config.spreadsheet_id.as_ref().map(|id| {
        info!("Registered spreadsheet ledger");
        SheetsLedger::new(
            id.clone(),
            config.google_credentials.clone(),
            config.sheet_range.clone(),
        )
    });
    if ledger.is_none() {
        warn!("SPREADSHEET_ID not set; ledger writes will report an error");
    }

    let telegram = config.telegram_bot_token.as_ref().map(|token| {
        info!("Registered Telegram channel");
        TelegramClient::new(token.clone())
    });

    let ocr = OcrClient::new(config.ocr_api_key.clone());

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port).parse()?;
    let state = Arc::new(AppState {
        config,
        vision,
        ocr,
        ledger,
        telegram,
    });

    let app = streakboard_gateway::build_router(state).layer(CorsLayer::permissive());

    info!(addr = %addr, "HTTP API listening");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
