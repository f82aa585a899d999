use serde::Serialize;
use ts_rs::TS;

// 课程学生名单
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct CourseRoster {
    pub course_id: String,
    pub students: Vec<String>,
}
