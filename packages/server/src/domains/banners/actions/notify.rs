//! Applicant notification mails.

use tracing::{info, warn};

use crate::common::escape_html;
use crate::domains::banners::events::BannerApprovalEvent;
use crate::domains::banners::models::{BannerApplication, BannerStatus};
use crate::kernel::{OutgoingEmail, ServerDeps};

struct Template {
    subject: &'static str,
    zh: &'static str,
    en: &'static str,
}

fn template(status: BannerStatus) -> Template {
    match status {
        BannerStatus::Approved => Template {
            subject: "[旦夕] 横幅申请已通过 / Banner application approved",
            zh: "你的横幅申请已通过审核，将在旦夕 App 中展示。",
            en: "Your banner application has been approved and will be shown in the DanXi app.",
        },
        BannerStatus::Disapproved => Template {
            subject: "[旦夕] 横幅申请未通过 / Banner application not approved",
            zh: "很遗憾，你的横幅申请未通过审核。如有疑问，请直接回复此邮件。",
            en: "Unfortunately your banner application was not approved. \
                 Reply to this email if you have any questions.",
        },
    }
}

/// Build the mail for an application in `status`.
///
/// Approval mails copy `dev_email` so the client team knows a banner is
/// about to go live.
pub fn compose_email(
    application: &BannerApplication,
    status: BannerStatus,
    dev_email: Option<&str>,
) -> OutgoingEmail {
    let t = template(status);
    let banner = &application.banner;

    let body_plain_text = format!(
        "你好，\n\n{zh}\n\nHello,\n\n{en}\n\n\
         标题 / Title: {title}\n链接 / Action: {action}\n按钮 / Button: {button}\n\n\
         旦夕团队 / The DanXi Team\n",
        zh = t.zh,
        en = t.en,
        title = banner.title,
        action = banner.action,
        button = banner.button,
    );

    let body_html = format!(
        "<p>你好，</p><p>{zh}</p><p>Hello,</p><p>{en}</p>\
         <ul><li>标题 / Title: {title}</li><li>链接 / Action: {action}</li>\
         <li>按钮 / Button: {button}</li></ul>\
         <p>旦夕团队 / The DanXi Team</p>",
        zh = t.zh,
        en = t.en,
        title = escape_html(&banner.title),
        action = escape_html(&banner.action),
        button = escape_html(&banner.button),
    );

    let own_application = |dev: &str| dev.eq_ignore_ascii_case(&application.applicant_email);
    let cc = match (status, dev_email) {
        (BannerStatus::Approved, Some(dev)) if !own_application(dev) => vec![dev.to_string()],
        _ => Vec::new(),
    };

    OutgoingEmail {
        to: vec![application.applicant_email.clone()],
        cc,
        subject: t.subject.to_string(),
        body_plain_text,
        body_html: Some(body_html),
    }
}

/// Mail the applicant about a decision.
///
/// Never fails: the decision already happened, so a mail error is logged and
/// reported as [`BannerApprovalEvent::NotificationFailed`].
pub async fn notify_applicant(
    application: &BannerApplication,
    status: BannerStatus,
    deps: &ServerDeps,
) -> BannerApprovalEvent {
    let email = compose_email(application, status, deps.settings.dev_email.as_deref());

    match deps.email.send_email(&email).await {
        Ok(()) => {
            info!(to = %application.applicant_email, %status, "Applicant notified");
            BannerApprovalEvent::ApplicantNotified {
                applicant_email: application.applicant_email.clone(),
                status,
            }
        }
        Err(e) => {
            warn!(
                to = %application.applicant_email,
                %status,
                error = %e,
                "Failed to notify applicant"
            );
            BannerApprovalEvent::NotificationFailed {
                applicant_email: application.applicant_email.clone(),
                status,
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::banners::models::Banner;
    use crate::kernel::TestDependencies;

    fn application() -> BannerApplication {
        BannerApplication {
            banner: Banner {
                title: "<b>Welcome</b>".to_string(),
                action: "https://example.com/?a=1&b=2".to_string(),
                button: "Go".to_string(),
            },
            applicant_email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn approval_copies_dev_and_escapes_html() {
        let email = compose_email(
            &application(),
            BannerStatus::Approved,
            Some("dev@example.com"),
        );

        assert_eq!(email.to, vec!["alice@example.com"]);
        assert_eq!(email.cc, vec!["dev@example.com"]);
        assert!(email.subject.contains("approved"));
        let text = &email.body_plain_text;
        assert!(text.contains("\n\n标题 / Title: <b>Welcome</b>\n"));
        assert!(text.contains("\n链接 / Action: https://example.com/?a=1&b=2\n"));
        assert!(text.ends_with("\n\n旦夕团队 / The DanXi Team\n"));

        let html = email.body_html.unwrap();
        assert!(html.contains("&lt;b&gt;Welcome&lt;/b&gt;"));
        assert!(html.contains("a=1&amp;b=2"));
    }

    #[test]
    fn disapproval_does_not_copy_dev() {
        let email = compose_email(
            &application(),
            BannerStatus::Disapproved,
            Some("dev@example.com"),
        );
        assert!(email.cc.is_empty());
        assert!(email.subject.contains("not approved"));
    }

    #[test]
    fn dev_is_not_copied_on_own_application() {
        let email = compose_email(
            &application(),
            BannerStatus::Approved,
            Some("Alice@Example.com"),
        );
        assert!(email.cc.is_empty());
    }

    #[tokio::test]
    async fn send_failure_becomes_an_event() {
        let test_deps = TestDependencies::new();
        test_deps.email.fail_sends();
        let deps = test_deps.server_deps();

        let event = notify_applicant(&application(), BannerStatus::Disapproved, &deps).await;

        assert!(matches!(
            event,
            BannerApprovalEvent::NotificationFailed { status: BannerStatus::Disapproved, .. }
        ));
    }

    #[tokio::test]
    async fn sends_through_the_email_service() {
        let test_deps = TestDependencies::new().with_dev_email("dev@example.com");
        let deps = test_deps.server_deps();

        let event = notify_applicant(&application(), BannerStatus::Approved, &deps).await;

        assert_eq!(
            event,
            BannerApprovalEvent::ApplicantNotified {
                applicant_email: "alice@example.com".to_string(),
                status: BannerStatus::Approved,
            }
        );
        let sent = test_deps.email.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].cc, vec!["dev@example.com"]);
    }
}
