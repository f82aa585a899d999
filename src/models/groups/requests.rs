use serde::Deserialize;
use ts_rs::TS;

// 手动创建小组
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

// 学生加入小组
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct JoinGroupRequest {
    pub student_id: String,
}

// 把学生从路径中的小组移到目标小组
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct TransferStudentRequest {
    pub student_id: String,
    pub to_group_id: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct AvailableStudentsQuery {
    pub course_id: String,
}
