pub mod invitation_statuses;
pub mod plan_tiers;
pub mod subscription_statuses;
