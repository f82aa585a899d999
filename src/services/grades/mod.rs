//! 同伴互评：保存评分与按学生汇总排名

pub mod aggregate;
pub mod save;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::SaveGradeRequest;
use crate::models::grades::responses::{StudentGradeSummary, StudentStanding};
use crate::storage::RecordStore;

#[derive(Clone)]
pub struct GradeService {
    storage: Arc<dyn RecordStore>,
}

impl GradeService {
    pub fn new(storage: Arc<dyn RecordStore>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn RecordStore {
        self.storage.as_ref()
    }

    // 新增或覆盖 (活动, 被评学生, 评分人) 的评分
    pub async fn save_grade(&self, activity_id: &str, request: SaveGradeRequest) -> Result<Grade> {
        save::save_grade(self, activity_id, request).await
    }

    // 某评分人给某学生的评分，未评分时为 None
    pub async fn my_grade_for_student(
        &self,
        activity_id: &str,
        student_id: &str,
        grader_id: &str,
    ) -> Result<Option<Grade>> {
        save::my_grade_for_student(self, activity_id, student_id, grader_id).await
    }

    pub async fn grades_by_activity(&self, activity_id: &str) -> Result<Vec<Grade>> {
        aggregate::grades_by_activity(self, activity_id).await
    }

    // 按平均分降序排列的学生汇总
    pub async fn activity_results(&self, activity_id: &str) -> Result<Vec<StudentGradeSummary>> {
        aggregate::activity_results(self, activity_id).await
    }

    pub async fn student_standing(
        &self,
        activity_id: &str,
        student_id: &str,
    ) -> Result<Option<StudentStanding>> {
        aggregate::student_standing(self, activity_id, student_id).await
    }
}
