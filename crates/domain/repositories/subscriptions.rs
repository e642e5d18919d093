use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::SubscriptionEntity;

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Latest subscription record for the user regardless of status.
    async fn find_current_subscription(&self, user_id: Uuid)
    -> Result<Option<SubscriptionEntity>>;
}
