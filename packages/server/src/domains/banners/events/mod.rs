use crate::domains::banners::models::BannerStatus;

/// Banner approval events.
/// Events are immutable facts returned by the actions that caused them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerApprovalEvent {
    // =========================================================================
    // Application intake
    // =========================================================================
    /// An approval card for this application was posted to the operators
    ApprovalRequested {
        record_id: String,
        title: String,
        applicant_email: String,
    },

    /// A new row could not be turned into an application
    ApplicationSkipped { record_id: String, reason: String },

    // =========================================================================
    // Decisions
    // =========================================================================
    /// The banner was committed to the config file
    BannerPublished {
        title: String,
        /// Number of read-modify-write cycles it took
        attempts: usize,
    },

    /// A row was added to the usage-log table
    UsageRecorded { title: String },

    /// The banner is live but the usage log could not be written
    UsageRecordFailed { title: String, reason: String },

    /// An operator turned the application down
    BannerDisapproved { title: String },

    // =========================================================================
    // Notification
    // =========================================================================
    ApplicantNotified {
        applicant_email: String,
        status: BannerStatus,
    },

    /// A best-effort step after the decision failed
    NotificationFailed {
        applicant_email: String,
        status: BannerStatus,
        reason: String,
    },
}
