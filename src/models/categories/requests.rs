use serde::Deserialize;
use ts_rs::TS;

use super::entities::AssignmentMode;

// 创建分类请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "category.ts")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub mode: Option<AssignmentMode>, // 缺省使用配置中的分组方式
    pub capacity: Option<u32>,        // 缺省使用配置中的每组人数
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "category.ts")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub mode: Option<AssignmentMode>,
    pub capacity: Option<u32>,
    pub description: Option<String>,
}
