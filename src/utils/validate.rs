use crate::errors::{PeerGroupsError, Result};

/// 必填文本：去除首尾空白后不能为空
pub fn require_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PeerGroupsError::validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

/// 可选文本：空白视为未提供
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// 每组人数至少为 1
pub fn validate_capacity(capacity: u32) -> Result<u32> {
    if capacity < 1 {
        return Err(PeerGroupsError::validation(
            "capacity must be a positive integer",
        ));
    }
    Ok(capacity)
}

/// 评分校验：满分大于 0，分数在 [0, 满分] 内
pub fn validate_grade(grade: f64, max_grade: f64) -> Result<()> {
    if !max_grade.is_finite() || max_grade <= 0.0 {
        return Err(PeerGroupsError::validation(format!(
            "max_grade must be greater than 0, got {max_grade}"
        )));
    }
    if !grade.is_finite() || grade < 0.0 || grade > max_grade {
        return Err(PeerGroupsError::validation(format!(
            "grade must be between 0 and {max_grade}, got {grade}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("  Labs ", "name").unwrap(), "Labs");
        let err = require_text("   ", "name").unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(err.message().contains("name"));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some(" x ".into())), Some("x".into()));
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_validate_capacity() {
        assert!(validate_capacity(0).is_err());
        assert_eq!(validate_capacity(1).unwrap(), 1);
    }

    #[test]
    fn test_validate_grade() {
        assert!(validate_grade(5.0, 5.0).is_ok());
        assert!(validate_grade(0.0, 10.0).is_ok());
        assert!(validate_grade(5.5, 5.0).is_err());
        assert!(validate_grade(-1.0, 5.0).is_err());
        assert!(validate_grade(1.0, 0.0).is_err());
        assert!(validate_grade(f64::NAN, 5.0).is_err());
    }
}
