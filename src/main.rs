use anyhow::Context;
use loginapp::{config::AppConfig, state::AppState, terminal};
use tokio::io::BufReader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "loginapp=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout belongs to the screens; logs go to stderr.
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let state = match open_state().await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "startup failed");
            return Err(e);
        }
    };

    let result = terminal::run(
        state.clone(),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await;

    state.shutdown().await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "session aborted");
    }
    result
}

async fn open_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env().context("load configuration")?;
    AppState::init(config).await
}
