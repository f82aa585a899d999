use serde::Serialize;
use ts_rs::TS;

use super::entities::{Group, GroupMembership};

/// 自动分组的执行结果
///
/// `failures` 为空表示所有写入都成功；否则逐条描述失败的步骤。
/// 自选模式下 `students_unassigned` 是尚未选组的学生数。
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct PartitionReport {
    pub groups_created: usize,
    pub students_assigned: usize,
    pub students_unassigned: usize,
    pub failures: Vec<String>,
}

impl PartitionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 带成员与容量信息的小组
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub group: Group,
    pub members: Vec<GroupMembership>,
    pub member_count: usize,
    pub capacity: u32,
    pub capacity_percentage: u32,
}

impl GroupDetail {
    pub fn new(group: Group, members: Vec<GroupMembership>, capacity: u32) -> Self {
        let member_count = members.len();
        let capacity_percentage = if capacity == 0 {
            0
        } else {
            (member_count as f64 / capacity as f64 * 100.0).round() as u32
        };
        Self {
            group,
            members,
            member_count,
            capacity,
            capacity_percentage,
        }
    }
}

/// 手动创建小组的结果
///
/// 随机分类的新小组会立即填充学生；`fill_failures` 非空表示填充未完成。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupCreated {
    #[serde(flatten)]
    #[ts(flatten)]
    pub detail: GroupDetail,
    pub fill_failures: Vec<String>,
}

impl GroupCreated {
    pub fn is_complete(&self) -> bool {
        self.fill_failures.is_empty()
    }
}

/// 加入小组的结果
///
/// 容量已满或已在同分类其他小组中属于预期内的拒绝，不是错误。
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Joined(GroupMembership),
    GroupFull { capacity: u32, member_count: usize },
    AlreadyInCategory { group_id: String },
    GroupNotFound,
}

impl JoinOutcome {
    pub fn is_joined(&self) -> bool {
        matches!(self, JoinOutcome::Joined(_))
    }
}
