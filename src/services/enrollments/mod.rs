pub mod roster;

use std::sync::Arc;

use crate::errors::Result;
use crate::storage::RecordStore;

/// 课程名单（只读）
#[derive(Clone)]
pub struct EnrollmentService {
    storage: Arc<dyn RecordStore>,
}

impl EnrollmentService {
    pub fn new(storage: Arc<dyn RecordStore>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn RecordStore {
        self.storage.as_ref()
    }

    // 课程中的学生 ID，去重并保持首次出现顺序
    pub async fn course_students(&self, course_id: &str) -> Result<Vec<String>> {
        roster::course_students(self, course_id).await
    }
}
