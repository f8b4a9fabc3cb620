//! Deal lifecycle state machine.
//!
//! A deal moves forward through a fixed status sequence, driven by named
//! portal actions and by EIS2 document uploads. Transitions are defined as
//! an explicit `(current status, action) -> Transition` table with a
//! rejection default, so a disallowed pair is an error rather than a silent
//! status overwrite. Milestones are append-only; the displayed step is
//! derived from `status` alone, never from milestone history.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Deal status, in forward order.
///
/// `AwaitingSubmission` is a filterable label reserved for manual ops edits;
/// no automated transition produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStatus {
    AwaitingOnboarding,
    OnboardingComplete,
    AwaitingSubmission,
    Submitted,
    AwaitingEis2,
    Eis2Received,
    Complete,
}

/// All seven status values, in forward order.
pub const ALL_STATUSES: &[DealStatus] = &[
    DealStatus::AwaitingOnboarding,
    DealStatus::OnboardingComplete,
    DealStatus::AwaitingSubmission,
    DealStatus::Submitted,
    DealStatus::AwaitingEis2,
    DealStatus::Eis2Received,
    DealStatus::Complete,
];

impl DealStatus {
    /// The database/API representation (SCREAMING_SNAKE, as stored in the
    /// `deals.status` column).
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::AwaitingOnboarding => "AWAITING_ONBOARDING",
            DealStatus::OnboardingComplete => "ONBOARDING_COMPLETE",
            DealStatus::AwaitingSubmission => "AWAITING_SUBMISSION",
            DealStatus::Submitted => "SUBMITTED",
            DealStatus::AwaitingEis2 => "AWAITING_EIS2",
            DealStatus::Eis2Received => "EIS2_RECEIVED",
            DealStatus::Complete => "COMPLETE",
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        ALL_STATUSES
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown deal status '{s}'")))
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Milestone event types recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MilestoneType {
    OnboardingComplete,
    SubmissionConfirmed,
    Eis2Received,
    Eis2Uploaded,
}

impl MilestoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneType::OnboardingComplete => "ONBOARDING_COMPLETE",
            MilestoneType::SubmissionConfirmed => "SUBMISSION_CONFIRMED",
            MilestoneType::Eis2Received => "EIS2_RECEIVED",
            MilestoneType::Eis2Uploaded => "EIS2_UPLOADED",
        }
    }
}

/// The party confirming a milestone or uploading a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Party {
    Founder,
    Accountant,
}

impl Party {
    /// Lowercase representation stored in `milestones.confirmed_by` and
    /// `documents.uploaded_by`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Party::Founder => "founder",
            Party::Accountant => "accountant",
        }
    }
}

/// Named lifecycle actions accepted by `POST /portal/{token}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalAction {
    CompleteOnboarding,
    ConfirmSubmission,
    ConfirmEis2,
}

impl PortalAction {
    /// Parse the wire-format action name. Unrecognized names are a bad
    /// request, not a conflict.
    pub fn parse(action: &str) -> Result<Self, CoreError> {
        match action {
            "complete_onboarding" => Ok(PortalAction::CompleteOnboarding),
            "confirm_submission" => Ok(PortalAction::ConfirmSubmission),
            "confirm_eis2" => Ok(PortalAction::ConfirmEis2),
            other => Err(CoreError::Validation(format!("Invalid action '{other}'"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortalAction::CompleteOnboarding => "complete_onboarding",
            PortalAction::ConfirmSubmission => "confirm_submission",
            PortalAction::ConfirmEis2 => "confirm_eis2",
        }
    }
}

/// The outcome of a permitted transition: the status to persist and the
/// milestone type to append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: DealStatus,
    pub milestone: MilestoneType,
}

/// Look up the transition for `(current, action)`.
///
/// Note the preserved asymmetry: `confirm_eis2` appends an `EIS2_RECEIVED`
/// milestone but moves the deal to `AWAITING_EIS2`; the `EIS2_RECEIVED`
/// status is only reached via [`apply_eis2_upload`].
pub fn apply_action(current: DealStatus, action: PortalAction) -> Result<Transition, CoreError> {
    use DealStatus::*;
    use PortalAction::*;

    let transition = match (current, action) {
        (AwaitingOnboarding, CompleteOnboarding) => Transition {
            next: OnboardingComplete,
            milestone: MilestoneType::OnboardingComplete,
        },
        (OnboardingComplete | AwaitingSubmission, ConfirmSubmission) => Transition {
            next: Submitted,
            milestone: MilestoneType::SubmissionConfirmed,
        },
        (OnboardingComplete | AwaitingSubmission | Submitted, ConfirmEis2) => Transition {
            next: AwaitingEis2,
            milestone: MilestoneType::Eis2Received,
        },
        _ => {
            return Err(CoreError::Conflict(format!(
                "Action '{}' is not valid for a deal in status {current}",
                action.as_str()
            )))
        }
    };

    Ok(transition)
}

/// Transition triggered by uploading an EIS2 approval letter.
///
/// Permitted from every status except `COMPLETE`. The original workflow this
/// models allows the approval letter to arrive ahead of (or instead of) the
/// `confirm_eis2` confirmation, so no earlier step is required.
pub fn apply_eis2_upload(current: DealStatus) -> Result<Transition, CoreError> {
    if current == DealStatus::Complete {
        return Err(CoreError::Conflict(
            "Deal is already complete; EIS2 upload cannot reopen it".into(),
        ));
    }
    Ok(Transition {
        next: DealStatus::Eis2Received,
        milestone: MilestoneType::Eis2Uploaded,
    })
}

/// Terminal ops action: mark the deal complete.
///
/// Only valid once the EIS2 approval has been received. Returns the new
/// status; the caller stamps `completed_at`.
pub fn apply_complete(current: DealStatus) -> Result<DealStatus, CoreError> {
    if current != DealStatus::Eis2Received {
        return Err(CoreError::Conflict(format!(
            "Deal can only be completed from EIS2_RECEIVED, not {current}"
        )));
    }
    Ok(DealStatus::Complete)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in ALL_STATUSES {
            assert_eq!(DealStatus::parse(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert_matches!(DealStatus::parse("PENDING"), Err(CoreError::Validation(_)));
        assert_matches!(DealStatus::parse(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_exactly_seven_statuses() {
        assert_eq!(ALL_STATUSES.len(), 7);
    }

    #[test]
    fn test_complete_onboarding_from_awaiting_onboarding() {
        let t = apply_action(
            DealStatus::AwaitingOnboarding,
            PortalAction::CompleteOnboarding,
        )
        .unwrap();
        assert_eq!(t.next, DealStatus::OnboardingComplete);
        assert_eq!(t.milestone, MilestoneType::OnboardingComplete);
    }

    #[test]
    fn test_complete_onboarding_rejected_after_onboarding() {
        let result = apply_action(
            DealStatus::OnboardingComplete,
            PortalAction::CompleteOnboarding,
        );
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[test]
    fn test_confirm_submission_from_both_source_states() {
        for current in [DealStatus::OnboardingComplete, DealStatus::AwaitingSubmission] {
            let t = apply_action(current, PortalAction::ConfirmSubmission).unwrap();
            assert_eq!(t.next, DealStatus::Submitted);
            assert_eq!(t.milestone, MilestoneType::SubmissionConfirmed);
        }
    }

    #[test]
    fn test_confirm_eis2_appends_received_milestone_but_awaits() {
        // The milestone-type/status asymmetry is deliberate behavior.
        for current in [DealStatus::OnboardingComplete, DealStatus::Submitted] {
            let t = apply_action(current, PortalAction::ConfirmEis2).unwrap();
            assert_eq!(t.next, DealStatus::AwaitingEis2);
            assert_eq!(t.milestone, MilestoneType::Eis2Received);
        }
    }

    #[test]
    fn test_confirm_eis2_rejected_before_onboarding() {
        let result = apply_action(DealStatus::AwaitingOnboarding, PortalAction::ConfirmEis2);
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[test]
    fn test_no_action_leaves_a_complete_deal() {
        for action in [
            PortalAction::CompleteOnboarding,
            PortalAction::ConfirmSubmission,
            PortalAction::ConfirmEis2,
        ] {
            assert_matches!(
                apply_action(DealStatus::Complete, action),
                Err(CoreError::Conflict(_))
            );
        }
    }

    #[test]
    fn test_eis2_upload_advances_from_any_open_status() {
        for status in ALL_STATUSES {
            if *status == DealStatus::Complete {
                continue;
            }
            let t = apply_eis2_upload(*status).unwrap();
            assert_eq!(t.next, DealStatus::Eis2Received);
            assert_eq!(t.milestone, MilestoneType::Eis2Uploaded);
        }
    }

    #[test]
    fn test_eis2_upload_rejected_when_complete() {
        assert_matches!(
            apply_eis2_upload(DealStatus::Complete),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_complete_only_from_eis2_received() {
        assert_eq!(
            apply_complete(DealStatus::Eis2Received).unwrap(),
            DealStatus::Complete
        );
        for status in ALL_STATUSES {
            if *status == DealStatus::Eis2Received {
                continue;
            }
            assert_matches!(apply_complete(*status), Err(CoreError::Conflict(_)));
        }
    }

    #[test]
    fn test_action_names_parse() {
        assert_eq!(
            PortalAction::parse("complete_onboarding").unwrap(),
            PortalAction::CompleteOnboarding
        );
        assert_eq!(
            PortalAction::parse("confirm_submission").unwrap(),
            PortalAction::ConfirmSubmission
        );
        assert_eq!(
            PortalAction::parse("confirm_eis2").unwrap(),
            PortalAction::ConfirmEis2
        );
    }

    #[test]
    fn test_unknown_action_is_validation_error() {
        // Must surface as a bad request, not a conflict.
        assert_matches!(
            PortalAction::parse("approve_everything"),
            Err(CoreError::Validation(_))
        );
    }
}
