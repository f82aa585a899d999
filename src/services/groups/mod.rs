//! 小组：自动分组、成员关系与小组管理

pub mod create;
pub mod delete;
pub mod list;
pub mod membership;
pub mod partition;
pub mod update;

use std::sync::Arc;

use crate::config::GroupingConfig;
use crate::errors::Result;
use crate::models::categories::entities::Category;
use crate::models::groups::entities::{Group, GroupMembership};
use crate::models::groups::requests::{CreateGroupRequest, UpdateGroupRequest};
use crate::models::groups::responses::{GroupCreated, GroupDetail, JoinOutcome, PartitionReport};
use crate::services::EnrollmentService;
use crate::storage::RecordStore;

#[derive(Clone)]
pub struct GroupService {
    storage: Arc<dyn RecordStore>,
    grouping: GroupingConfig,
}

impl GroupService {
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

    pub(crate) fn enrollments(&self) -> EnrollmentService {
        EnrollmentService::new(self.storage.clone())
    }

    // 为新分类创建小组（随机模式下同时分配学生），每次都重新读取名单
    pub async fn create_groups_for_category(&self, category: &Category) -> PartitionReport {
        partition::create_groups_for_category(self, category).await
    }

    // 使用调用方提供的名单分组
    pub async fn create_groups_with_roster(
        &self,
        category: &Category,
        roster: Vec<String>,
    ) -> PartitionReport {
        partition::create_groups_with_roster(self, category, roster).await
    }

    // 手动创建小组
    pub async fn create_group(
        &self,
        category_id: &str,
        request: CreateGroupRequest,
    ) -> Result<GroupCreated> {
        create::create_group(self, category_id, request).await
    }

    pub async fn update_group(&self, group_id: &str, request: UpdateGroupRequest) -> Result<Group> {
        update::update_group(self, group_id, request).await
    }

    // 删除小组及其成员关系
    pub async fn delete_group(&self, group_id: &str) -> Result<()> {
        delete::delete_group(self, group_id).await
    }

    // 分类下的小组（含成员与容量）
    pub async fn list_groups_in_category(&self, category_id: &str) -> Result<Vec<GroupDetail>> {
        list::list_groups_in_category(self, category_id).await
    }

    // 名单中尚未加入该分类任何小组的学生
    pub async fn available_students(
        &self,
        category_id: &str,
        course_id: &str,
    ) -> Result<Vec<String>> {
        list::available_students(self, category_id, course_id).await
    }

    pub async fn join(&self, group_id: &str, student_id: &str) -> Result<JoinOutcome> {
        membership::join(self, group_id, student_id).await
    }

    // 学生主动退出
    pub async fn leave(&self, group_id: &str, student_id: &str) -> Result<()> {
        membership::leave(self, group_id, student_id).await
    }

    // 教师移除成员
    pub async fn remove_member(&self, group_id: &str, student_id: &str) -> Result<()> {
        membership::leave(self, group_id, student_id).await
    }

    // 同分类内换组
    pub async fn transfer(
        &self,
        from_group_id: &str,
        to_group_id: &str,
        student_id: &str,
    ) -> Result<JoinOutcome> {
        membership::transfer(self, from_group_id, to_group_id, student_id).await
    }

    pub async fn remove_student_from_category(
        &self,
        category_id: &str,
        student_id: &str,
    ) -> Result<bool> {
        membership::remove_student_from_category(self, category_id, student_id).await
    }

    pub async fn student_group_in_category(
        &self,
        student_id: &str,
        category_id: &str,
    ) -> Result<Option<GroupMembership>> {
        membership::student_group_in_category(self, student_id, category_id).await
    }

    pub async fn list_members(&self, group_id: &str) -> Result<Vec<GroupMembership>> {
        membership::list_members(self, group_id).await
    }
}
