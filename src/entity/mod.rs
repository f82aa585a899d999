//! SeaORM 实体定义
//!
//! SeaORM 存储后端只有一张通用记录表，业务实体见 `models` 模块。

pub mod records;
