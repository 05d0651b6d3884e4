use bcrypt::{hash, verify, DEFAULT_COST};
use mentorbridge_common::AppError;

/// Cost range accepted by `bcrypt::hash`.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hashes and checks account passwords with bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordService {
    /// `cost` is clamped into the range bcrypt accepts.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::with_cost(MIN_COST);
        let hashed = service.hash_password("mentor123").unwrap();

        assert_ne!(hashed, "mentor123");
        assert!(service.verify_password("mentor123", &hashed).unwrap());
        assert!(!service.verify_password("mentee123", &hashed).unwrap());
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(PasswordService::with_cost(1).cost(), MIN_COST);
        assert_eq!(PasswordService::with_cost(99).cost(), MAX_COST);
    }
}
