//! 密码哈希与校验
//! Password hashing and verification
//!
//! 使用 Argon2id 加盐单向哈希，明文密码从不落库。
//! Argon2id with a per-password random salt; plaintext never reaches
//! the store.

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 对明文密码做 Argon2id 哈希，返回 PHC 格式字符串
/// Hash a plaintext password, returning the PHC string form
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("密码哈希失败: {}", e)))?;

    Ok(password_hash.to_string())
}

/// 校验明文密码与存储的哈希是否匹配
/// Verify a plaintext password against a stored hash
pub fn verify_password(stored_hash: &str, provided_password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("存储的密码哈希格式无效: {}", e)))?;

    match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!("密码校验失败: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("testpass123").unwrap();

        // PHC 格式，且不包含明文
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("testpass123"));

        assert!(verify_password(&hash, "testpass123").unwrap());
        assert!(!verify_password(&hash, "wrongpass").unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // 每次哈希使用随机盐
        let a = hash_password("testpass123").unwrap();
        let b = hash_password("testpass123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_stored_hash_is_an_error() {
        assert!(verify_password("not-a-phc-string", "whatever").is_err());
    }
}
