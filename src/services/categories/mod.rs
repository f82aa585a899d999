//! 分类：统计、创建（含自动分组）、更新与级联删除

pub mod create;
pub mod delete;
pub mod list;
pub mod stats;
pub mod update;

use std::sync::Arc;

use crate::config::GroupingConfig;
use crate::errors::Result;
use crate::models::activities::entities::Activity;
use crate::models::categories::entities::Category;
use crate::models::categories::requests::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::categories::responses::{
    CategoryCreated, CategoryModeSummary, CategorySummary,
};
use crate::services::GroupService;
use crate::storage::RecordStore;

#[derive(Clone)]
pub struct CategoryService {
    storage: Arc<dyn RecordStore>,
    grouping: GroupingConfig,
}

impl CategoryService {
    pub fn new(storage: Arc<dyn RecordStore>) -> Self {
        Self::with_config(storage, GroupingConfig::default())
    }

    pub fn with_config(storage: Arc<dyn RecordStore>, grouping: GroupingConfig) -> Self {
        Self { storage, grouping }
    }

    pub(crate) fn storage(&self) -> &dyn RecordStore {
        self.storage.as_ref()
    }

    pub(crate) fn grouping(&self) -> &GroupingConfig {
        &self.grouping
    }

    pub(crate) fn groups(&self) -> GroupService {
        GroupService::with_config(self.storage.clone(), self.grouping.clone())
    }

    // 课程下的分类及统计，按名称排序
    pub async fn list_by_course(&self, course_id: &str) -> Result<Vec<CategorySummary>> {
        list::list_by_course(self, course_id).await
    }

    pub async fn get_by_id(&self, category_id: &str) -> Result<Option<CategorySummary>> {
        list::get_by_id(self, category_id).await
    }

    // 按分组方式统计分类数量
    pub async fn summary_by_mode(&self, course_id: &str) -> Result<CategoryModeSummary> {
        list::summary_by_mode(self, course_id).await
    }

    pub async fn list_activities(&self, category_id: &str) -> Result<Vec<Activity>> {
        list::list_activities(self, category_id).await
    }

    // 创建分类并立即分组
    pub async fn create(
        &self,
        course_id: &str,
        request: CreateCategoryRequest,
    ) -> Result<CategoryCreated> {
        create::create_category(self, course_id, request).await
    }

    // 修改容量不会重新分组
    pub async fn update(
        &self,
        category_id: &str,
        request: UpdateCategoryRequest,
    ) -> Result<Category> {
        update::update_category(self, category_id, request).await
    }

    // 级联删除小组与成员关系
    pub async fn delete(&self, category_id: &str) -> Result<()> {
        delete::delete_category(self, category_id).await
    }
}
