use gather::config::AppConfig;
use gather::context::{AppContext, ScreenDeps};
use gather::navigation::Navigator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;
    let port = config.port;

    eprintln!("📍 Gather v{}", env!("CARGO_PKG_VERSION"));
    match config.backend {
        Some(ref backend) => eprintln!("   Backend: {}", backend.url),
        None => eprintln!("   Backend: in-memory fixtures"),
    }
    eprintln!("   Navigation API: http://0.0.0.0:{}/api/navigation", port);
    eprintln!("   Navigation WS: ws://0.0.0.0:{}/ws/navigation", port);
    eprintln!("   Max interests: {}\n", config.max_interests);

    let deps = ScreenDeps::from_config(&config);
    let ctx = AppContext::new(config, deps, Navigator::new());
    let app = gather::router(ctx);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!(port, "Gather server started");
    axum::serve(listener, app).await?;
    Ok(())
}
