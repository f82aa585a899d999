//! 评分汇总
//!
//! 平均分直接对原始分数求平均，不按满分归一；满分不一致时只做标记。

use std::collections::HashMap;

use tracing::warn;

use super::GradeService;
use crate::errors::Result;
use crate::models::grades::entities::Grade;
use crate::models::grades::responses::{StudentGradeSummary, StudentStanding};
use crate::storage::load_all;

/// 同一 (被评学生, 评分人) 的重复记录只保留最后读到的一条，位置取首次出现处
pub fn dedupe_latest(grades: Vec<Grade>) -> Vec<Grade> {
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut deduped: Vec<Grade> = Vec::with_capacity(grades.len());
    for grade in grades {
        let key = (grade.student_id.clone(), grade.graded_by.clone());
        match positions.get(&key) {
            Some(&position) => deduped[position] = grade,
            None => {
                positions.insert(key, deduped.len());
                deduped.push(grade);
            }
        }
    }
    deduped
}

/// 按被评学生分组求平均，并按平均分降序（稳定排序，同分保持首次出现顺序）
pub fn summarize_by_student(grades: Vec<Grade>) -> Vec<StudentGradeSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut by_student: HashMap<String, Vec<Grade>> = HashMap::new();
    for grade in grades {
        if !by_student.contains_key(&grade.student_id) {
            order.push(grade.student_id.clone());
        }
        by_student
            .entry(grade.student_id.clone())
            .or_default()
            .push(grade);
    }

    let mut summaries: Vec<StudentGradeSummary> = order
        .into_iter()
        .filter_map(|student_id| {
            let grades = by_student.remove(&student_id)?;
            Some(summarize_student(student_id, grades))
        })
        .collect();
    summaries.sort_by(|a, b| b.average_grade.total_cmp(&a.average_grade));
    summaries
}

fn summarize_student(student_id: String, grades: Vec<Grade>) -> StudentGradeSummary {
    let total: f64 = grades.iter().map(|g| g.grade).sum();
    let average_grade = total / grades.len() as f64;
    let mixed_scales = grades
        .first()
        .is_some_and(|first| grades.iter().any(|g| g.max_grade != first.max_grade));
    if mixed_scales {
        warn!(
            "Grades for student {} use different max_grade values; average is not normalised",
            student_id
        );
    }

    StudentGradeSummary {
        student_id,
        average_grade,
        total_evaluations: grades.len(),
        grades_list: grades,
        mixed_scales,
    }
}

/// 学生在排名中的位置（从 1 开始）
pub fn standing_of(summaries: Vec<StudentGradeSummary>, student_id: &str) -> Option<StudentStanding> {
    let ranked_students = summaries.len();
    summaries
        .into_iter()
        .enumerate()
        .find(|(_, summary)| summary.student_id == student_id)
        .map(|(index, summary)| StudentStanding {
            summary,
            rank: index + 1,
            ranked_students,
        })
}

async fn activity_grades(service: &GradeService, activity_id: &str) -> Result<Vec<Grade>> {
    let grades: Vec<Grade> = load_all(service.storage()).await?;
    Ok(dedupe_latest(
        grades
            .into_iter()
            .filter(|g| g.activity_id == activity_id)
            .collect(),
    ))
}

pub async fn grades_by_activity(service: &GradeService, activity_id: &str) -> Result<Vec<Grade>> {
    activity_grades(service, activity_id).await
}

pub async fn activity_results(
    service: &GradeService,
    activity_id: &str,
) -> Result<Vec<StudentGradeSummary>> {
    let grades = activity_grades(service, activity_id).await?;
    Ok(summarize_by_student(grades))
}

pub async fn student_standing(
    service: &GradeService,
    activity_id: &str,
    student_id: &str,
) -> Result<Option<StudentStanding>> {
    let summaries = activity_results(service, activity_id).await?;
    Ok(standing_of(summaries, student_id))
}
