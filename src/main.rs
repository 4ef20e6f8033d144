use tiered_pricing_api::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    cli::init_tracing();

    cli::commands::serve::handle().await
}
