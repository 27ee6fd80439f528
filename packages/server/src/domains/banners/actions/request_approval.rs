use anyhow::{Context, Result};
use lark_client::events::BitableRecordChangedEvent;
use tracing::{debug, info, warn};

use crate::domains::banners::events::BannerApprovalEvent;
use crate::domains::banners::models::{application_from_record, ApplicationFieldNames};
use crate::kernel::ServerDeps;

/// Post one approval card per newly submitted application.
///
/// Changes to other bitables or tables are ignored, which also keeps the
/// usage-log writes from feeding back into this flow. A row that cannot be
/// read as an application is skipped; a failed Lark call aborts the batch.
pub async fn request_approvals(
    event: &BitableRecordChangedEvent,
    deps: &ServerDeps,
) -> Result<Vec<BannerApprovalEvent>> {
    let settings = &deps.settings;

    if event.file_token != settings.bitable_app_token {
        debug!(file_token = %event.file_token, "Ignoring change in unrelated bitable");
        return Ok(Vec::new());
    }
    if !event.table_id.is_empty() && event.table_id != settings.application_table_id {
        debug!(table_id = %event.table_id, "Ignoring change in unrelated table");
        return Ok(Vec::new());
    }

    let record_ids = event.added_record_ids();
    if record_ids.is_empty() {
        info!("No added record found");
        return Ok(Vec::new());
    }

    let records = deps
        .tables
        .batch_get_records(
            &settings.bitable_app_token,
            &settings.application_table_id,
            &record_ids,
        )
        .await
        .context("Failed to fetch banner applications")?;

    let names = ApplicationFieldNames::default();
    let mut events = Vec::with_capacity(records.len());

    for record in &records {
        let application = match application_from_record(record, &names) {
            Ok(application) => application,
            Err(e) => {
                warn!(record_id = %record.record_id, error = %e, "Skipping banner application");
                events.push(BannerApprovalEvent::ApplicationSkipped {
                    record_id: record.record_id.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        deps.chat
            .send_template_card(
                &settings.approve_group_id,
                &settings.approve_card_id,
                application.card_variables(),
            )
            .await
            .with_context(|| format!("Failed to send approval card for {}", record.record_id))?;

        info!(
            record_id = %record.record_id,
            title = %application.title(),
            "Banner approval card sent"
        );
        events.push(BannerApprovalEvent::ApprovalRequested {
            record_id: record.record_id.clone(),
            title: application.banner.title.clone(),
            applicant_email: application.applicant_email.clone(),
        });
    }

    Ok(events)
}
