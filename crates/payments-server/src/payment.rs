use std::fmt;

/// Outcome reported by a payment notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Success,
    Failed,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 2] = [PaymentStatus::Success, PaymentStatus::Failed];

    /// Only the exact string `"success"` counts as a successful payment.
    /// Anything else, including a missing field, is a failure.
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some("success") => PaymentStatus::Success,
            _ => PaymentStatus::Failed,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
