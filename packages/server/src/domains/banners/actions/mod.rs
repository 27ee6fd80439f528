//! Banner approval actions - entry points called from the Lark webhook.
//!
//! Actions take `&ServerDeps`, do their work synchronously and return the
//! fact events they produced.

pub mod decide;
pub mod notify;
pub mod publish;
pub mod request_approval;
pub mod usage;

pub use decide::{
    approved_toast, decide, disapproved_toast, error_toast, parse_button_value, CardActionError,
    DecisionOutcome,
};
pub use notify::{compose_email, notify_applicant};
pub use publish::{commit_message, publish_banner};
pub use request_approval::request_approvals;
pub use usage::record_usage;
