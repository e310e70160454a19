use anyhow::Context;

use crate::errors::AppError;

/// Hashes on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed")?
        .context("Password hashing failed")
        .map_err(AppError::Internal)
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("Password verification task failed")?;
    Ok(verified.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("secret1".to_string(), 4).await.unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("secret2".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_garbage_hash_does_not_verify() {
        assert!(!verify_password("secret1".to_string(), "plain".to_string())
            .await
            .unwrap());
    }
}
