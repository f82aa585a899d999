use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{PeerGroupsError, Result};
use crate::storage::record::{de_loose_f64, de_loose_opt_f64, de_loose_string};
use crate::storage::{Collection, StoredEntity};

/// 缺省满分（同伴互评五星制）
pub const DEFAULT_MAX_GRADE: f64 = 5.0;

/// 一条同伴评分：`graded_by` 给 `student_id` 的打分
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct Grade {
    pub id: String,
    pub activity_id: String,
    pub student_id: String,
    pub grade: f64,
    pub max_grade: f64,
    pub graded_by: String,
}

impl Grade {
    /// 是否为同一 (活动, 被评学生, 评分人) 三元组
    pub fn matches(&self, activity_id: &str, student_id: &str, graded_by: &str) -> bool {
        self.activity_id == activity_id && self.student_id == student_id && self.graded_by == graded_by
    }
}

#[derive(Deserialize)]
struct GradeRecord {
    #[serde(rename = "_id", deserialize_with = "de_loose_string")]
    id: String,
    #[serde(deserialize_with = "de_loose_string")]
    activity_id: String,
    #[serde(deserialize_with = "de_loose_string")]
    student_id: String,
    #[serde(deserialize_with = "de_loose_f64")]
    grade: f64,
    #[serde(default, deserialize_with = "de_loose_opt_f64")]
    max_grade: Option<f64>,
    #[serde(deserialize_with = "de_loose_string")]
    graded_by: String,
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = GradeRecord::deserialize(deserializer)?;
        Ok(Grade {
            id: record.id,
            activity_id: record.activity_id,
            student_id: record.student_id,
            grade: record.grade,
            max_grade: record.max_grade.unwrap_or(DEFAULT_MAX_GRADE),
            graded_by: record.graded_by,
        })
    }
}

impl StoredEntity for Grade {
    const COLLECTION: Collection = Collection::Grades;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(self) -> Result<Self> {
        if !self.grade.is_finite() {
            return Err(PeerGroupsError::validation(format!(
                "grade record {} has a non-finite score",
                self.id
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGrade {
    pub activity_id: String,
    pub student_id: String,
    pub grade: f64,
    pub max_grade: f64,
    pub graded_by: String,
}

// 覆盖已有评分时只改分数
#[derive(Debug, Clone, Serialize)]
pub struct GradePatch {
    pub grade: f64,
    pub max_grade: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::record::decode;
    use serde_json::json;

    #[test]
    fn test_grade_defaults_max_grade() {
        let record = json!({
            "_id": "g1",
            "activity_id": "a1",
            "student_id": "s1",
            "grade": "4",
            "graded_by": "s2"
        });
        let grade: Grade = decode(record.as_object().unwrap()).unwrap();
        assert_eq!(grade.grade, 4.0);
        assert_eq!(grade.max_grade, DEFAULT_MAX_GRADE);
        assert!(grade.matches("a1", "s1", "s2"));
        assert!(!grade.matches("a1", "s2", "s1"));
    }
}
