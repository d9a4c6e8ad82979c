// bcrypt password hashes.
//
// Hashing is deliberately slow, so both operations run on the blocking pool
// instead of stalling the async workers.

use super::auth_service::AuthError;

/// bcrypt only reads the first 72 bytes of a password.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, COST))
        .await
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .map_err(|e| AuthError::HashError(e.to_string()))
}

/// Check `password` against a stored hash. Malformed hashes never verify.
pub async fn verify_password(password: &str, stored: &str) -> bool {
    let (password, stored) = (password.to_string(), stored.to_string());
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &stored)).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Stored password hash is not valid bcrypt");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "Password check task failed");
            false
        }
    }
}
