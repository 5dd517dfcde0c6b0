//! kgview: drill-down knowledge graph view server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod cache;
mod export;
mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("KGVIEW_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "export" => {
                if args.len() < 4 {
                    eprintln!("Usage: kgview export <db-path> <output.json> [top-communities]");
                    std::process::exit(1);
                }
                let db_path = PathBuf::from(&args[2]);
                let output = PathBuf::from(&args[3]);

                let paths = kgview_core::DataPaths::new(resolve_data_dir());
                let mut viz = kgview_core::VizConfig::load(&paths.viz_config_file)?;
                if let Some(top) = args.get(4) {
                    viz.top_communities = top
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid top-communities value: {}", top))?;
                }

                match export::run_export(&db_path, &output, &viz) {
                    Ok(report) => {
                        export::print_report(&report);
                        return Ok(());
                    }
                    Err(e) => {
                        eprintln!("Export failed: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            "--help" | "-h" | "help" => {
                println!("kgview: drill-down knowledge graph view");
                println!();
                println!("Usage: kgview [command]");
                println!();
                println!("Commands:");
                println!("  (none)                        Start the server");
                println!("  export <db> <out.json> [N]    Write the view payload to a file");
                println!("  help                          Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'kgview help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = kgview_core::KgViewConfig::from_env(&data_dir)?;
    let port = config.port;
    info!("Graph database: {}", config.db_path.display());

    let state = Arc::new(AppState::new(config));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("kgview server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
