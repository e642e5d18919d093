use anyhow::Result;
use crates::domain::{
    entities::plans::PlanEntity, repositories::subscriptions::SubscriptionRepository,
    value_objects::plans::PlanCatalog,
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Resolves the effective plan for a user: active subscription plan or free plan fallback.
pub struct PlanResolver<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    catalog: Arc<PlanCatalog>,
}

impl<S> PlanResolver<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>, catalog: Arc<PlanCatalog>) -> Self {
        Self {
            subscription_repo,
            catalog,
        }
    }

    pub async fn resolve_effective_plan_for_user(&self, user_id: Uuid) -> Result<PlanEntity> {
        let subscription = self
            .subscription_repo
            .find_current_subscription(user_id)
            .await?;

        match &subscription {
            Some(subscription) if subscription.status().is_active() => {
                match subscription.plan_tier() {
                    Ok(tier) => debug!(
                        %user_id,
                        plan_id = %tier,
                        "plan_resolver: using active subscription plan"
                    ),
                    Err(err) => warn!(
                        %user_id,
                        subscription_id = %subscription.id,
                        plan_id = subscription.plan_id,
                        error = %err,
                        "plan_resolver: active subscription has unknown plan, falling back to free plan"
                    ),
                }
            }
            Some(subscription) => debug!(
                %user_id,
                status = subscription.status,
                "plan_resolver: subscription not active, falling back to free plan"
            ),
            None => debug!(%user_id, "plan_resolver: no subscription, falling back to free plan"),
        }

        Ok(self.catalog.effective_plan(subscription.as_ref()).clone())
    }
}
