//! 密码处理
//!
//! 提供密码哈希、验证和强度检查功能

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error::LedgerError;

/// 对密码进行哈希处理
///
/// 使用 bcrypt 算法生成密码哈希
pub fn hash_password(password: &str) -> Result<String, LedgerError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| LedgerError::Internal(format!("密码哈希失败: {}", e)))
}

/// 验证密码
///
/// 比较明文密码与存储的哈希值
pub fn verify_password(password: &str, hash: &str) -> Result<bool, LedgerError> {
    verify(password, hash).map_err(|e| LedgerError::Internal(format!("密码验证失败: {}", e)))
}

/// 强密码：至少 6 位，同时包含大写、小写、数字和符号
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 6
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "Recicla@2024";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_strong_password_rules() {
        assert!(is_strong_password("Abc1!x"));
        assert!(is_strong_password("Recicla@2024"));

        assert!(!is_strong_password("Ab1!"), "太短");
        assert!(!is_strong_password("abc123!"), "缺少大写");
        assert!(!is_strong_password("ABC123!"), "缺少小写");
        assert!(!is_strong_password("Abcdef!"), "缺少数字");
        assert!(!is_strong_password("Abc1234"), "缺少符号");
    }
}
