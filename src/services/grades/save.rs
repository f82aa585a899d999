use tracing::info;

use super::GradeService;
use crate::errors::{PeerGroupsError, Result};
use crate::models::activities::entities::Activity;
use crate::models::grades::entities::{DEFAULT_MAX_GRADE, Grade, GradePatch, NewGrade};
use crate::models::grades::requests::SaveGradeRequest;
use crate::storage::{Collection, find_by_id, insert_one, load_all, update_fields};
use crate::utils::WriteGate;
use crate::utils::validate::{require_text, validate_grade};

/// 三元组的最后一条评分
async fn find_grade(
    service: &GradeService,
    activity_id: &str,
    student_id: &str,
    graded_by: &str,
) -> Result<Option<Grade>> {
    let grades: Vec<Grade> = load_all(service.storage()).await?;
    Ok(grades
        .into_iter()
        .rev()
        .find(|g| g.matches(activity_id, student_id, graded_by)))
}

pub async fn save_grade(
    service: &GradeService,
    activity_id: &str,
    request: SaveGradeRequest,
) -> Result<Grade> {
    let activity_id = require_text(activity_id, "activity_id")?;
    let student_id = require_text(&request.student_id, "student_id")?;
    let graded_by = require_text(&request.graded_by, "graded_by")?;
    let max_grade = request.max_grade.unwrap_or(DEFAULT_MAX_GRADE);
    validate_grade(request.grade, max_grade)?;

    if find_by_id::<Activity>(service.storage(), &activity_id)
        .await?
        .is_none()
    {
        return Err(PeerGroupsError::not_found(format!(
            "Activity {activity_id} not found"
        )));
    }

    let _guard = WriteGate::global()
        .acquire(WriteGate::grade_key(&activity_id, &student_id, &graded_by))
        .await;

    match find_grade(service, &activity_id, &student_id, &graded_by).await? {
        Some(existing) => {
            let patch = GradePatch {
                grade: request.grade,
                max_grade,
            };
            update_fields(service.storage(), Collection::Grades, &existing.id, &patch).await?;
            info!(
                "Updated grade {} from {} for student {} on activity {}",
                existing.id, graded_by, student_id, activity_id
            );
            Ok(Grade {
                grade: patch.grade,
                max_grade: patch.max_grade,
                ..existing
            })
        }
        None => {
            let grade: Grade = insert_one(
                service.storage(),
                &NewGrade {
                    activity_id,
                    student_id,
                    grade: request.grade,
                    max_grade,
                    graded_by,
                },
            )
            .await?;
            info!(
                "Saved grade {} from {} for student {} on activity {}",
                grade.id, grade.graded_by, grade.student_id, grade.activity_id
            );
            Ok(grade)
        }
    }
}

pub async fn my_grade_for_student(
    service: &GradeService,
    activity_id: &str,
    student_id: &str,
    grader_id: &str,
) -> Result<Option<Grade>> {
    find_grade(
        service,
        activity_id.trim(),
        student_id.trim(),
        grader_id.trim(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;
    use crate::storage::testing::seed;
    use serde_json::json;
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryStorage>, GradeService, String) {
        let store = Arc::new(MemoryStorage::new());
        let activity_id = seed(
            store.as_ref(),
            Collection::Activities,
            vec![json!({"course_id": "c1", "title": "Peer review"})],
        )
        .await
        .remove(0);
        (store.clone(), GradeService::new(store), activity_id)
    }

    fn request(grade: f64) -> SaveGradeRequest {
        SaveGradeRequest {
            student_id: "s1".into(),
            graded_by: "s2".into(),
            grade,
            max_grade: Some(5.0),
        }
    }

    #[tokio::test]
    async fn test_second_save_overwrites() {
        let (store, service, activity_id) = setup().await;
        let first = service.save_grade(&activity_id, request(3.0)).await.unwrap();
        let second = service.save_grade(&activity_id, request(4.5)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.count(Collection::Grades), 1);
        let mine = service
            .my_grade_for_student(&activity_id, "s1", "s2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mine.grade, 4.5);
        assert!(
            service
                .my_grade_for_student(&activity_id, "s1", "s3")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_lookup_trims_ids() {
        let (_, service, activity_id) = setup().await;
        let mut padded = request(2.0);
        padded.student_id = " s1 ".into();
        service.save_grade(&activity_id, padded).await.unwrap();

        let mine = service
            .my_grade_for_student(&format!(" {activity_id}"), " s1 ", "s2 ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mine.student_id, "s1");
        assert_eq!(mine.grade, 2.0);
    }

    #[tokio::test]
    async fn test_save_grade_validation() {
        let (_, service, activity_id) = setup().await;
        assert_eq!(
            service
                .save_grade(&activity_id, request(6.0))
                .await
                .unwrap_err()
                .code(),
            "E007"
        );
        let mut zero_scale = request(0.0);
        zero_scale.max_grade = Some(0.0);
        assert!(service.save_grade(&activity_id, zero_scale).await.is_err());
        assert_eq!(
            service
                .save_grade("ghost", request(1.0))
                .await
                .unwrap_err()
                .code(),
            "E008"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_leave_one_record() {
        let (store, service, activity_id) = setup().await;
        let mut handles = Vec::new();
        for score in [1.0, 2.0, 3.0, 4.0] {
            let service = service.clone();
            let activity_id = activity_id.clone();
            handles.push(tokio::spawn(async move {
                service.save_grade(&activity_id, request(score)).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.count(Collection::Grades), 1);
        let results = service.activity_results(&activity_id).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].total_evaluations, 1);
    }
}
