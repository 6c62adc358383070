//! 构造参数校验
//!
//! 通知只在构造时校验一次，之后不可变。

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::{NotificationError, Result};

/// 可选的 `+` 前缀，首位 1-9，总共 8 到 15 位数字
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{7,14}$").expect("phone pattern is valid"));

pub(crate) fn require_non_blank(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(NotificationError::invalid_argument(field, "不能为空"));
    }
    Ok(value)
}

pub(crate) fn require_email(field: &str, value: String) -> Result<String> {
    let value = require_non_blank(field, value)?;
    if !value.validate_email() {
        return Err(NotificationError::invalid_argument(
            field,
            format!("不是有效的邮箱地址: {}", value),
        ));
    }
    Ok(value)
}

pub(crate) fn require_phone(field: &str, value: String) -> Result<String> {
    let value = require_non_blank(field, value)?;
    if !PHONE_NUMBER.is_match(&value) {
        return Err(NotificationError::invalid_argument(
            field,
            format!("不是有效的手机号: {}", value),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_rejected() {
        assert!(require_non_blank("recipient", "".to_string()).is_err());
        assert!(require_non_blank("recipient", "   \t".to_string()).is_err());
        assert_eq!(
            require_non_blank("recipient", "U123".to_string()).unwrap(),
            "U123"
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(require_email("sender", "noreply@example.com".to_string()).is_ok());
        assert!(require_email("sender", "not-an-email".to_string()).is_err());
        assert!(require_email("sender", "@example.com".to_string()).is_err());

        let err = require_email("recipient", " ".to_string()).unwrap_err();
        assert!(matches!(
            err,
            NotificationError::InvalidArgument { ref field, .. } if field == "recipient"
        ));
    }

    #[test]
    fn test_phone_validation() {
        for valid in ["+15551234567", "15551234567", "+8613800138000", "12345678"] {
            assert!(
                require_phone("recipient", valid.to_string()).is_ok(),
                "{valid} 应为有效号码"
            );
        }

        for invalid in ["+05551234567", "1234567", "+1234567890123456", "555-123-4567", "abc"] {
            assert!(
                require_phone("recipient", invalid.to_string()).is_err(),
                "{invalid} 应为无效号码"
            );
        }
    }
}
