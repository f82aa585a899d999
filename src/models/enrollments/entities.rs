use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::storage::record::{de_loose_opt_string, de_loose_string};
use crate::storage::{Collection, StoredEntity};

// 课程成员角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "enrollment.ts")]
pub enum EnrollmentRole {
    Student,   // 学生
    Professor, // 教师
}

impl EnrollmentRole {
    pub const STUDENT: &'static str = "student";
    pub const PROFESSOR: &'static str = "professor";
}

impl<'de> Deserialize<'de> for EnrollmentRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.trim().to_lowercase().as_str() {
            "student" | "estudiante" => Ok(EnrollmentRole::Student),
            "professor" | "profesor" | "teacher" => Ok(EnrollmentRole::Professor),
            _ => Err(serde::de::Error::custom(format!(
                "无效的课程角色: '{s}'. 支持的角色: student, professor"
            ))),
        }
    }
}

impl std::fmt::Display for EnrollmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentRole::Student => write!(f, "{}", Self::STUDENT),
            EnrollmentRole::Professor => write!(f, "{}", Self::PROFESSOR),
        }
    }
}

/// 选课记录（只读）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct Enrollment {
    pub id: String,
    pub course_id: String,
    pub student_id: String,
    pub role: EnrollmentRole,
}

#[derive(Deserialize)]
struct EnrollmentRecord {
    #[serde(rename = "_id", deserialize_with = "de_loose_string")]
    id: String,
    #[serde(deserialize_with = "de_loose_string")]
    course_id: String,
    #[serde(default, deserialize_with = "de_loose_opt_string")]
    student_id: Option<String>,
    // 旧记录使用 uuid 字段
    #[serde(default, deserialize_with = "de_loose_opt_string")]
    uuid: Option<String>,
    role: EnrollmentRole,
}

impl<'de> Deserialize<'de> for Enrollment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = EnrollmentRecord::deserialize(deserializer)?;
        let student_id = record
            .student_id
            .or(record.uuid)
            .ok_or_else(|| serde::de::Error::missing_field("student_id"))?;
        Ok(Enrollment {
            id: record.id,
            course_id: record.course_id,
            student_id,
            role: record.role,
        })
    }
}

impl StoredEntity for Enrollment {
    const COLLECTION: Collection = Collection::Enrollments;

    fn id(&self) -> &str {
        &self.id
    }
}
