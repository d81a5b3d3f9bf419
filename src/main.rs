use greeting_service::config::AppConfig;
use greeting_service::run_server;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Default to Info, RUST_LOG overrides
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Greeting service: content negotiated greetings over HTTP");

    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    if config.service.load_seed_data {
        println!("Loading seed data...");
    }

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("Greeting service running on http://{}", bind_address);
    println!("Greetings available at http://{}/greetings", bind_address);

    run_server(listener, &config).await?;

    Ok(())
}
