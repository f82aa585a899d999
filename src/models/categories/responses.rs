use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use super::entities::Category;
use crate::models::groups::responses::PartitionReport;

/// 带统计信息的分类
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "category.ts")]
pub struct CategorySummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub category: Category,
    pub activity_count: usize,
    pub pending_activities: usize,
    pub overdue_activities: usize,
    pub group_count: usize,
    pub total_members: usize,
}

// 创建分类的结果，附带自动分组报告
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "category.ts")]
pub struct CategoryCreated {
    pub category: Category,
    pub partition: PartitionReport,
}

// 按分组方式统计的分类数量
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "category.ts")]
pub struct CategoryModeSummary {
    pub total: usize,
    pub by_mode: BTreeMap<String, usize>,
}
