#[tokio::main]
async fn main() {
    if let Err(e) = token_flow_graph::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
