use crate::config::AppConfig;
use crate::storage::memory_storage::MemoryStorage;
use crate::storage::{Collection, RecordStore};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct StartupContext {
    pub storage: Arc<dyn RecordStore>,
}

/// 创建记录存储
/// 配置的后端不可用时回退到内存存储
async fn create_record_store() -> Arc<dyn RecordStore> {
    let config = AppConfig::get();
    let backend = &config.store.backend;

    warn!("Attempting to create {} record store backend", backend);

    match crate::storage::create_storage(backend).await {
        Ok(storage) => {
            warn!("Successfully created {} record store backend", backend);
            storage
        }
        Err(e) => {
            error!("Failed to create {} record store: {}", backend, e);
            warn!("Falling back to in-memory record store, data will not survive a restart");
            Arc::new(MemoryStorage::new())
        }
    }
}

/// 打印各集合的记录数
async fn log_collection_sizes(storage: &Arc<dyn RecordStore>) {
    for collection in Collection::ALL {
        match storage.read(collection).await {
            Ok(records) => debug!("Collection {} holds {} record(s)", collection, records.len()),
            Err(e) => warn!("Failed to read collection {}: {}", collection, e),
        }
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> StartupContext {
    let storage = create_record_store().await;
    warn!("Record store initialized");

    if cfg!(debug_assertions) {
        log_collection_sizes(&storage).await;
    }

    StartupContext { storage }
}
