use serde::Serialize;
use ts_rs::TS;

use super::entities::Grade;

/// 某个学生在一个活动上收到的全部同伴评分汇总
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct StudentGradeSummary {
    pub student_id: String,
    pub average_grade: f64, // 原始分数平均，不按满分归一
    pub total_evaluations: usize,
    pub grades_list: Vec<Grade>,
    pub mixed_scales: bool, // 评分满分不一致
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct StudentStanding {
    #[serde(flatten)]
    #[ts(flatten)]
    pub summary: StudentGradeSummary,
    pub rank: usize, // 从 1 开始
    pub ranked_students: usize,
}
