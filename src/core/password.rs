/// Password hashing with bcrypt

use bcrypt::BcryptError;

#[derive(Debug, Clone, Copy)]
pub struct PasswordEncoder {
    cost: u32,
}

impl PasswordEncoder {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn encode(&self, raw: &str) -> Result<String, BcryptError> {
        bcrypt::hash(raw, self.cost)
    }

    pub fn matches(&self, raw: &str, hash: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(raw, hash)
    }
}

impl Default for PasswordEncoder {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::BCRYPT_MIN_COST;

    #[test]
    fn test_encode_and_match() {
        let encoder = PasswordEncoder::new(BCRYPT_MIN_COST);
        let hash = encoder.encode("p@ssw0rd").unwrap();

        assert_ne!(hash, "p@ssw0rd");
        assert!(encoder.matches("p@ssw0rd", &hash).unwrap());
        assert!(!encoder.matches("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let encoder = PasswordEncoder::new(BCRYPT_MIN_COST);
        let a = encoder.encode("same").unwrap();
        let b = encoder.encode("same").unwrap();
        assert_ne!(a, b);
    }
}
