// Main entry point for the banner approval bot

use std::sync::Arc;

use anyhow::{Context, Result};
use github_client::{GithubClient, GithubOptions};
use lark_client::{LarkClient, LarkOptions};
use server_core::kernel::{GithubAdapter, LarkAdapter, LarkMailAdapter, ServerDeps};
use server_core::server::{build_app, AppState};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Danta banner bot");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Log masked secrets so a misconfigured deployment is visible
    fn mask(name: &str, value: Option<&str>) {
        match value {
            None => tracing::warn!("  {}: NOT SET", name),
            Some(val) => {
                let show = val.char_indices().nth(4).map(|(i, _)| i).unwrap_or(val.len());
                let hidden = val[show..].chars().count();
                tracing::info!(
                    "  {}: {}{}  ({} chars)",
                    name,
                    &val[..show],
                    "*".repeat(hidden),
                    val.chars().count()
                );
            }
        }
    }
    tracing::info!("Configuration loaded:");
    mask("LARK_APP_ID", Some(&config.lark_app_id));
    mask("LARK_APP_SECRET", Some(&config.lark_app_secret));
    mask("LARK_VERIFICATION_TOKEN", Some(&config.lark_verification_token));
    mask("LARK_USER_ACCESS_TOKEN", config.lark_user_access_token.as_deref());
    mask("GITHUB_PERSONAL_ACCESS_TOKEN", Some(&config.github_token));

    // Lark client (shared by chat, bitable and mail)
    let mut lark_options = LarkOptions::new(&config.lark_app_id, &config.lark_app_secret);
    if let Some(base_url) = &config.lark_base_url {
        lark_options = lark_options.with_base_url(base_url);
    }
    let lark = Arc::new(LarkClient::new(lark_options));

    // GitHub client bound to the app config repository
    let mut github_options = GithubOptions::new(&config.github_token);
    if let Some(base_url) = &config.github_base_url {
        github_options = github_options.with_base_url(base_url);
    }
    let github = Arc::new(GithubClient::new(github_options));

    let deps = ServerDeps::new(
        Arc::new(LarkAdapter::new(lark.clone())),
        Arc::new(LarkAdapter::new(lark.clone())),
        Arc::new(GithubAdapter::new(
            github,
            config.github_repo_owner.clone(),
            config.github_repo_name.clone(),
            config.github_branch.clone(),
        )),
        Arc::new(LarkMailAdapter::new(
            lark,
            config.lark_mail_sender.clone(),
            config.lark_mail_sender_name.clone(),
            config.lark_user_access_token.clone(),
        )),
        config.banner_settings(),
    );

    let app = build_app(AppState::new(deps, config.lark_verification_token.as_str()));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Lark callback: http://localhost:{}/webhooks/lark", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
