use crate::domain::{
    entities::{plans::PlanEntity, subscriptions::SubscriptionEntity},
    value_objects::enums::plan_tiers::PlanTier,
};

pub const FREE_MAX_INVITATIONS: i64 = 10;
pub const FREE_MAX_GUESTS: i32 = 50;
pub const PREMIUM_MAX_INVITATIONS: i64 = 50;
pub const PREMIUM_MAX_GUESTS: i32 = 500;
pub const BUSINESS_MAX_INVITATIONS: i64 = 500;
pub const BUSINESS_MAX_GUESTS: i32 = 5000;

/// Deploy-time adjustments to a tier's numeric limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanLimitOverrides {
    pub max_invitations: Option<i64>,
    pub max_guests: Option<i32>,
}

/// Static table of the plans on sale. Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCatalog {
    free: PlanEntity,
    premium: PlanEntity,
    business: PlanEntity,
}

impl PlanCatalog {
    pub fn standard() -> Self {
        Self {
            free: PlanEntity {
                tier: PlanTier::Free,
                name: PlanTier::Free.display_name().to_string(),
                max_invitations: FREE_MAX_INVITATIONS,
                max_guests: FREE_MAX_GUESTS,
                allows_premium_templates: false,
            },
            premium: PlanEntity {
                tier: PlanTier::Premium,
                name: PlanTier::Premium.display_name().to_string(),
                max_invitations: PREMIUM_MAX_INVITATIONS,
                max_guests: PREMIUM_MAX_GUESTS,
                allows_premium_templates: true,
            },
            business: PlanEntity {
                tier: PlanTier::Business,
                name: PlanTier::Business.display_name().to_string(),
                max_invitations: BUSINESS_MAX_INVITATIONS,
                max_guests: BUSINESS_MAX_GUESTS,
                allows_premium_templates: true,
            },
        }
    }

    pub fn with_overrides(mut self, tier: PlanTier, overrides: PlanLimitOverrides) -> Self {
        let plan = self.get_mut(tier);
        if let Some(max_invitations) = overrides.max_invitations {
            plan.max_invitations = max_invitations;
        }
        if let Some(max_guests) = overrides.max_guests {
            plan.max_guests = max_guests;
        }
        self
    }

    pub fn get(&self, tier: PlanTier) -> &PlanEntity {
        match tier {
            PlanTier::Free => &self.free,
            PlanTier::Premium => &self.premium,
            PlanTier::Business => &self.business,
        }
    }

    fn get_mut(&mut self, tier: PlanTier) -> &mut PlanEntity {
        match tier {
            PlanTier::Free => &mut self.free,
            PlanTier::Premium => &mut self.premium,
            PlanTier::Business => &mut self.business,
        }
    }

    /// The subscription's plan while it is active, the free plan otherwise.
    /// A subscription pointing at an unknown plan id also resolves to free.
    pub fn effective_plan(&self, subscription: Option<&SubscriptionEntity>) -> &PlanEntity {
        match subscription {
            Some(subscription) if subscription.status().is_active() => subscription
                .plan_tier()
                .map(|tier| self.get(tier))
                .unwrap_or(&self.free),
            _ => &self.free,
        }
    }
}
