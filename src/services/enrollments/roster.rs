use std::collections::HashSet;

use tracing::debug;

use super::EnrollmentService;
use crate::errors::Result;
use crate::models::enrollments::entities::{Enrollment, EnrollmentRole};
use crate::storage::load_all;

pub async fn course_students(service: &EnrollmentService, course_id: &str) -> Result<Vec<String>> {
    let enrollments: Vec<Enrollment> = load_all(service.storage()).await?;
    let students = students_in_course(&enrollments, course_id);
    debug!("Course {} has {} student(s)", course_id, students.len());
    Ok(students)
}

/// 从选课记录中筛出某课程的学生
pub fn students_in_course(enrollments: &[Enrollment], course_id: &str) -> Vec<String> {
    let course_id = course_id.trim();
    let mut seen = HashSet::new();
    enrollments
        .iter()
        .filter(|e| e.course_id == course_id && e.role == EnrollmentRole::Student)
        .filter(|e| seen.insert(e.student_id.as_str()))
        .map(|e| e.student_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Collection;
    use crate::storage::memory_storage::MemoryStorage;
    use crate::storage::testing::seed;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_course_students_filters_and_dedupes() {
        let store = Arc::new(MemoryStorage::new());
        let records = vec![
            json!({"course_id": "c1", "student_id": "s2", "role": "student"}),
            json!({"course_id": " c1", "student_id": "p1", "role": "professor"}),
            json!({"course_id": 7, "student_id": "s9", "role": "student"}),
            json!({"course_id": "c1", "uuid": "s1", "role": "ESTUDIANTE"}),
            json!({"course_id": "c1", "student_id": "s2", "role": "student"}),
            json!({"course_id": "c1", "role": "student"}),
        ];
        seed(store.as_ref(), Collection::Enrollments, records).await;

        let service = EnrollmentService::new(store);
        assert_eq!(
            service.course_students("c1 ").await.unwrap(),
            vec!["s2".to_string(), "s1".to_string()]
        );
        assert_eq!(service.course_students("7").await.unwrap(), vec!["s9"]);
        assert!(service.course_students("missing").await.unwrap().is_empty());
    }
}
