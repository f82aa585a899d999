use serde::Serialize;
use ts_rs::TS;

use super::entities::Activity;
use crate::models::categories::entities::AssignmentMode;

/// 课程活动列表项，附带所属分类信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct ActivityListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub activity: Activity,
    pub category_name: Option<String>,
    pub category_mode: Option<AssignmentMode>,
}

// 课程活动统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct ActivityStats {
    pub total: usize,
    pub pending: usize,
    pub overdue: usize,
}
