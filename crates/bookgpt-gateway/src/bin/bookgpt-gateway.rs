//! BookGPT Gateway Binary
//!
//! HTTP server for book chat and the guided transformation workflows.
//!
//! # Usage
//! ```bash
//! bookgpt-gateway [--port 3004] [--host 127.0.0.1] [--config gateway.toml] [--mock] [--verbose]
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bookgpt_gateway::{Gateway, GatewayConfig};

/// BookGPT Gateway - Book Chat and Transformation Workflows
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (default: 3004)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Gateway configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long)]
    config: Option<String>,

    /// Answer from the offline mock backend instead of real providers
    #[arg(long)]
    mock: bool,

    /// Timeout for a single provider attempt
    #[arg(long)]
    provider_timeout_secs: Option<u64>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(args.verbose)
        .with_thread_ids(args.verbose)
        .init();

    let mut config = match &args.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(secs) = args.provider_timeout_secs {
        config = config.with_provider_timeout_secs(secs);
    }
    if args.mock {
        config = config.with_mock_mode(true);
    }

    print_banner(&config);

    let gateway = Gateway::new(config)?;
    gateway.start().await?;

    Ok(())
}

fn print_banner(config: &GatewayConfig) {
    println!();
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                                                               ║");
    println!("║               📚  BOOKGPT GATEWAY  📚                         ║");
    println!("║                                                               ║");
    println!("║     Book Chat and Guided Transformation Workflows             ║");
    println!("║                                                               ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("📡 HTTP Server");
    println!("   └─ http://{}:{}", config.host, config.port);
    println!();
    println!("🔗 Endpoints");
    println!("   ├─ GET  /health                              — Health check");
    println!("   ├─ GET  /status                              — Provider chain status");
    println!("   ├─ GET  /api/books                           — Book catalog");
    println!("   ├─ POST /api/chat                            — Book chat");
    println!("   ├─ POST /api/chat/stream                     — Book chat (SSE)");
    println!("   ├─ POST /api/mission-vision[/revise]         — Mission & vision options");
    println!("   └─ POST /api/stakeholder-motivation[/revise] — SMILE engagement strategy");
    println!();
    if config.mock_mode {
        println!("🧪 Mock mode: no provider credentials required");
        println!();
    }
    println!("─────────────────────────────────────────────────────────────────");
    println!("Press Ctrl+C to stop the gateway");
    println!();
}
