use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyAction {
    Confirmed,
    Rejected,
}

impl NotifyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyAction::Confirmed => "confirmed",
            NotifyAction::Rejected => "rejected",
        }
    }
}

/// What happened on one delivery channel. Never turned into a request error.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChannelOutcome {
    pub attempted: bool,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelOutcome {
    pub fn skipped() -> Self {
        Self {
            attempted: false,
            success: false,
            error: None,
        }
    }

    pub fn delivered() -> Self {
        Self {
            attempted: true,
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            attempted: true,
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationReport {
    pub sms: ChannelOutcome,
    pub email: ChannelOutcome,
}

impl NotificationReport {
    pub fn none() -> Self {
        Self {
            sms: ChannelOutcome::skipped(),
            email: ChannelOutcome::skipped(),
        }
    }
}
