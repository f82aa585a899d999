use serde::Deserialize;
use ts_rs::TS;

// 保存（新增或覆盖）一条同伴评分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct SaveGradeRequest {
    pub student_id: String,
    pub graded_by: String,
    pub grade: f64,
    pub max_grade: Option<f64>, // 缺省为 5
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct MyGradeQuery {
    pub grader_id: String,
}
