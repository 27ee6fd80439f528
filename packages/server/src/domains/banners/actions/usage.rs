use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domains::banners::models::{BannerApplication, BannerUsageLog};
use crate::kernel::ServerDeps;

/// Add a usage-log row for a banner that went live at `started_at`.
pub async fn record_usage(
    application: &BannerApplication,
    started_at: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<()> {
    let log = BannerUsageLog::started(application.clone(), started_at);
    let settings = &deps.settings;

    deps.tables
        .create_record(
            &settings.bitable_app_token,
            &settings.usage_table_id,
            log.to_fields(),
        )
        .await
        .context("Failed to add usage log record")?;

    info!(title = %application.title(), "Usage log recorded");
    Ok(())
}
