pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::activities::entities::Activity;
use crate::models::activities::requests::{CreateActivityRequest, UpdateActivityRequest};
use crate::models::activities::responses::{ActivityListItem, ActivityStats};
use crate::storage::RecordStore;

#[derive(Clone)]
pub struct ActivityService {
    storage: Arc<dyn RecordStore>,
}

impl ActivityService {
    pub fn new(storage: Arc<dyn RecordStore>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn RecordStore {
        self.storage.as_ref()
    }

    pub async fn create(
        &self,
        course_id: &str,
        request: CreateActivityRequest,
    ) -> Result<Activity> {
        create::create_activity(self, course_id, request).await
    }

    pub async fn get(&self, activity_id: &str) -> Result<Option<Activity>> {
        list::get_activity(self, activity_id).await
    }

    // 课程活动列表：按截止时间排序，无截止时间的排在最后
    pub async fn list_by_course(&self, course_id: &str) -> Result<Vec<ActivityListItem>> {
        list::list_by_course(self, course_id).await
    }

    pub async fn stats_by_course(&self, course_id: &str) -> Result<ActivityStats> {
        list::stats_by_course(self, course_id).await
    }

    pub async fn update(
        &self,
        activity_id: &str,
        request: UpdateActivityRequest,
    ) -> Result<Activity> {
        update::update_activity(self, activity_id, request).await
    }

    pub async fn delete(&self, activity_id: &str) -> Result<()> {
        delete::delete_activity(self, activity_id).await
    }
}
