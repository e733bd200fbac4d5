use rand::RngCore;
use rand_core::OsRng;

use crate::error::CryptoError;
use crate::secret::SecretBytes32;

/// Fill `buf` from the operating system RNG.
pub fn fill_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))
}

/// 32 fresh random bytes suitable as a private key candidate.
///
/// The caller still has to check the value is a valid curve scalar.
pub fn random_key_bytes() -> Result<SecretBytes32, CryptoError> {
    let mut buf = [0u8; 32];
    fill_random(&mut buf)?;
    let key = SecretBytes32::new(buf);
    zeroize::Zeroize::zeroize(&mut buf);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_random_writes_bytes() {
        let mut buf = [0u8; 64];
        fill_random(&mut buf).unwrap();
        // Probability of 64 random bytes all being zero is negligible (2^-512).
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn fill_random_empty_buffer() {
        let mut buf: [u8; 0] = [];
        assert!(fill_random(&mut buf).is_ok());
    }

    #[test]
    fn random_key_bytes_differ_between_calls() {
        let a = random_key_bytes().unwrap();
        let b = random_key_bytes().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
