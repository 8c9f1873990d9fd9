#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use shift_calendar::{AppConfig, http_api, logging};

    let config = AppConfig::from_env()?;
    logging::init(config.verbosity.max(1));

    println!(
        "shift-calendar HTTP API listening on http://{}",
        config.http_addr
    );
    let state = http_api::AppState::new(config.base_url);
    http_api::serve(config.http_addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
