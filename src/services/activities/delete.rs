use tracing::info;

use super::ActivityService;
use crate::errors::Result;
use crate::storage::Collection;

pub async fn delete_activity(service: &ActivityService, activity_id: &str) -> Result<()> {
    // 评分记录独立保存，不随活动删除
    service
        .storage()
        .delete(Collection::Activities, activity_id)
        .await?;
    info!("Deleted activity {}", activity_id);
    Ok(())
}
