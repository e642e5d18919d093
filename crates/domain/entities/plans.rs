use serde::Serialize;

use crate::domain::value_objects::enums::plan_tiers::PlanTier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntity {
    pub tier: PlanTier,
    pub name: String,
    pub max_invitations: i64,
    pub max_guests: i32,
    pub allows_premium_templates: bool,
}
