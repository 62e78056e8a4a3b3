use clap::Parser;
use wip_bridge::cli::{run, Cli};
use wip_bridge::logging::init_tracing;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("[ERROR] {e}");
        std::process::exit(1);
    }
}
