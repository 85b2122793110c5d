use users_api::{app, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "users_api=debug,axum=info,tower_http=info,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        title = %config.app.title,
        version = %config.app.version,
        description = %config.app.description,
        contact = %format!("{} <{}>", config.app.contact_name, config.app.contact_email),
        "starting"
    );

    let state = AppState::init(config).await?;
    let config = state.config.clone();
    let app = app::build_app(state);

    app::serve(app, &config).await
}
