//! Entitlement decisions for gated actions.
//!
//! Every check is a pure function of the caller's resolved plan and the numbers
//! passed in. Nothing here reads storage or ambient state; callers resolve the
//! plan and count usage first, then ask.

use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::{plans::PlanEntity, templates::TemplateEntity};

/// Machine-readable reason attached to every denial.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementReason {
    LimitReached,
    GuestLimitExceeded,
    PremiumRequired,
}

impl EntitlementReason {
    pub fn code(&self) -> &'static str {
        match self {
            EntitlementReason::LimitReached => "limit_reached",
            EntitlementReason::GuestLimitExceeded => "guest_limit_exceeded",
            EntitlementReason::PremiumRequired => "premium_required",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EntitlementReason::LimitReached => "Invitation limit reached",
            EntitlementReason::GuestLimitExceeded => "Guest limit exceeded",
            EntitlementReason::PremiumRequired => "Premium subscription required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EntitlementDenial {
    pub reason: EntitlementReason,
    /// Upgrade prompt shown to the user.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementDecision {
    Allowed,
    Denied(EntitlementDenial),
}

impl EntitlementDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, EntitlementDecision::Allowed)
    }

    pub fn reason(&self) -> Option<EntitlementReason> {
        match self {
            EntitlementDecision::Allowed => None,
            EntitlementDecision::Denied(denial) => Some(denial.reason),
        }
    }

    pub fn into_result(self) -> Result<(), EntitlementDenial> {
        match self {
            EntitlementDecision::Allowed => Ok(()),
            EntitlementDecision::Denied(denial) => Err(denial),
        }
    }

    fn denied(reason: EntitlementReason, message: String) -> Self {
        EntitlementDecision::Denied(EntitlementDenial { reason, message })
    }
}

pub struct EntitlementEvaluator<'a> {
    plan: &'a PlanEntity,
}

impl<'a> EntitlementEvaluator<'a> {
    pub fn new(plan: &'a PlanEntity) -> Self {
        Self { plan }
    }

    /// `current_invitations` is the number of the user's non-archived invitations.
    pub fn can_create_invitation(&self, current_invitations: i64) -> EntitlementDecision {
        if current_invitations < self.plan.max_invitations {
            return EntitlementDecision::Allowed;
        }

        EntitlementDecision::denied(
            EntitlementReason::LimitReached,
            format!(
                "You have reached the limit of {} invitations on the {} plan ({} in use). Upgrade your plan to create more invitations.",
                self.plan.max_invitations, self.plan.name, current_invitations
            ),
        )
    }

    pub fn can_invite_guests(&self, requested_max_guests: i32) -> EntitlementDecision {
        if requested_max_guests <= self.plan.max_guests {
            return EntitlementDecision::Allowed;
        }

        EntitlementDecision::denied(
            EntitlementReason::GuestLimitExceeded,
            format!(
                "The {} plan allows up to {} guests per invitation, but {} were requested. Upgrade your plan to invite more guests.",
                self.plan.name, self.plan.max_guests, requested_max_guests
            ),
        )
    }

    pub fn can_use_template(&self, template: &TemplateEntity) -> EntitlementDecision {
        self.premium_gate(template.is_premium)
    }

    /// Publishing a premium template is gated the same way as using one.
    pub fn can_create_template(&self, is_premium: bool) -> EntitlementDecision {
        self.premium_gate(is_premium)
    }

    fn premium_gate(&self, is_premium: bool) -> EntitlementDecision {
        if !is_premium || self.plan.allows_premium_templates {
            return EntitlementDecision::Allowed;
        }

        EntitlementDecision::denied(
            EntitlementReason::PremiumRequired,
            format!(
                "Premium templates are not included in the {} plan. Upgrade to Premium or Business to unlock them.",
                self.plan.name
            ),
        )
    }
}

/// Listing predicate: anonymous callers and plans without premium access only see free templates.
pub fn is_template_visible(plan: Option<&PlanEntity>, is_premium: bool) -> bool {
    !is_premium || plan.is_some_and(|plan| plan.allows_premium_templates)
}
