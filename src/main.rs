//! Yet Another Diet Assistant (YADA)
//!
//! An MCP server for food catalogs, calorie resolution and intake logging.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use yada::build_info;
use yada::config::Config;
use yada::mcp::YadaService;
use yada::storage::JsonStorage;
use yada::tracker::Tracker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("yada=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner("MCP server");
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Data directory: {}", config.data_dir.display());
    if let Some(method) = config.calorie_method {
        eprintln!("Calorie method override: {}", method.as_str());
    }

    let storage = JsonStorage::new(&config.data_dir);
    let tracker = Tracker::open(Box::new(storage)).with_calorie_method(config.calorie_method);

    // Create the YADA service
    let service = YadaService::new(config.data_dir, tracker);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
