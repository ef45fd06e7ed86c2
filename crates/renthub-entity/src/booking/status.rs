//! Booking lifecycle state machine.
//!
//! Statuses form a fixed closed set and every transition goes through
//! the table in [`BookingAction::apply`]; nothing else may write the
//! status field. The wire strings double as the PostgreSQL enum labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use renthub_core::AppError;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Initial state: waiting for the owner's decision.
    PendingRenterApproval,
    /// The owner accepted the request and allocated an instance.
    ApprovedByRenter,
    /// The owner declined the request.
    RejectedByRenter,
    /// The owner returned the request to the client for changes.
    SentBackToClient,
    /// The client withdrew the request.
    CanceledByClient,
}

impl BookingStatus {
    /// All actions permitted in this status, owner and client combined.
    pub fn allowed_actions(&self) -> &'static [BookingAction] {
        match self {
            Self::PendingRenterApproval => &[
                BookingAction::Approve,
                BookingAction::Reject,
                BookingAction::SendBack,
                BookingAction::Cancel,
            ],
            Self::SentBackToClient => &[BookingAction::Cancel],
            Self::ApprovedByRenter | Self::RejectedByRenter | Self::CanceledByClient => &[],
        }
    }

    /// Whether the given action is permitted in this status.
    pub fn allows(&self, action: BookingAction) -> bool {
        self.allowed_actions().contains(&action)
    }

    /// Whether this status counts toward revenue and active-booking totals.
    pub fn is_revenue_bearing(&self) -> bool {
        matches!(self, Self::ApprovedByRenter)
    }

    /// Return the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingRenterApproval => "pending_renter_approval",
            Self::ApprovedByRenter => "approved_by_renter",
            Self::RejectedByRenter => "rejected_by_renter",
            Self::SentBackToClient => "sent_back_to_client",
            Self::CanceledByClient => "canceled_by_client",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_renter_approval" => Ok(Self::PendingRenterApproval),
            "approved_by_renter" => Ok(Self::ApprovedByRenter),
            "rejected_by_renter" => Ok(Self::RejectedByRenter),
            "sent_back_to_client" => Ok(Self::SentBackToClient),
            "canceled_by_client" => Ok(Self::CanceledByClient),
            _ => Err(AppError::validation(format!(
                "Invalid booking status: '{s}'"
            ))),
        }
    }
}

/// A named transition request against a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    /// Owner accepts the request.
    Approve,
    /// Owner declines the request; requires a reason.
    Reject,
    /// Owner returns the request for changes; requires an explanation.
    SendBack,
    /// Client withdraws the request.
    Cancel,
}

impl BookingAction {
    /// The status a booking enters when this action succeeds.
    pub fn target_status(&self) -> BookingStatus {
        match self {
            Self::Approve => BookingStatus::ApprovedByRenter,
            Self::Reject => BookingStatus::RejectedByRenter,
            Self::SendBack => BookingStatus::SentBackToClient,
            Self::Cancel => BookingStatus::CanceledByClient,
        }
    }

    /// Whether this action must carry a non-empty message.
    pub fn requires_message(&self) -> bool {
        matches!(self, Self::Reject | Self::SendBack)
    }

    /// Whether this action belongs to the owner side of the workflow.
    pub fn is_owner_action(&self) -> bool {
        matches!(self, Self::Approve | Self::Reject | Self::SendBack)
    }

    /// Apply this action to the given status.
    ///
    /// Returns the resulting status, or a conflict when the pair is not
    /// in the transition table.
    pub fn apply(&self, current: BookingStatus) -> Result<BookingStatus, AppError> {
        if current.allows(*self) {
            Ok(self.target_status())
        } else {
            Err(AppError::conflict(format!(
                "Cannot {} a booking in status '{current}'",
                self.as_str()
            )))
        }
    }

    /// Return the action as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::SendBack => "send_back",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_allows_all_owner_actions() {
        let pending = BookingStatus::PendingRenterApproval;
        assert!(pending.allows(BookingAction::Approve));
        assert!(pending.allows(BookingAction::Reject));
        assert!(pending.allows(BookingAction::SendBack));
        assert!(pending.allows(BookingAction::Cancel));
    }

    #[test]
    fn test_terminal_statuses_allow_nothing() {
        for status in [
            BookingStatus::ApprovedByRenter,
            BookingStatus::RejectedByRenter,
            BookingStatus::CanceledByClient,
        ] {
            assert!(status.allowed_actions().is_empty(), "{status} should be terminal");
        }
    }

    #[test]
    fn test_sent_back_only_cancelable() {
        let sent_back = BookingStatus::SentBackToClient;
        assert_eq!(sent_back.allowed_actions(), &[BookingAction::Cancel]);
        assert!(!sent_back.allows(BookingAction::Approve));
    }

    #[test]
    fn test_apply_transitions() {
        let pending = BookingStatus::PendingRenterApproval;
        assert_eq!(
            BookingAction::Approve.apply(pending).unwrap(),
            BookingStatus::ApprovedByRenter
        );
        assert_eq!(
            BookingAction::Reject.apply(pending).unwrap(),
            BookingStatus::RejectedByRenter
        );
        assert_eq!(
            BookingAction::SendBack.apply(pending).unwrap(),
            BookingStatus::SentBackToClient
        );
        assert_eq!(
            BookingAction::Cancel.apply(pending).unwrap(),
            BookingStatus::CanceledByClient
        );
    }

    #[test]
    fn test_apply_rejects_out_of_table_pairs() {
        let approved = BookingStatus::ApprovedByRenter;
        assert!(BookingAction::Approve.apply(approved).is_err());
        assert!(BookingAction::Reject.apply(approved).is_err());
        assert!(BookingAction::Cancel.apply(approved).is_err());
    }

    #[test]
    fn test_message_requirements() {
        assert!(BookingAction::Reject.requires_message());
        assert!(BookingAction::SendBack.requires_message());
        assert!(!BookingAction::Approve.requires_message());
        assert!(!BookingAction::Cancel.requires_message());
    }

    #[test]
    fn test_wire_strings_round_trip() {
        for status in [
            BookingStatus::PendingRenterApproval,
            BookingStatus::ApprovedByRenter,
            BookingStatus::RejectedByRenter,
            BookingStatus::SentBackToClient,
            BookingStatus::CanceledByClient,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
    }
}
