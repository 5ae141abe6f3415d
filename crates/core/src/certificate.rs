//! Certificate number generation and format checks.
//!
//! Numbers look like `CERT-<TIMESTAMP>-<SUFFIX>` where `TIMESTAMP` is the
//! issuance time in Unix milliseconds rendered in upper-case base 36 and
//! `SUFFIX` is six random upper-case base-36 characters. The scheme is
//! probabilistic; the `uq_certificates_number` constraint is the real
//! guarantee and the issuer retries on collision.

use rand::Rng;

use crate::types::Timestamp;

/// Fixed prefix for every certificate number.
pub const CERTIFICATE_PREFIX: &str = "CERT";

/// Length of the random suffix.
pub const SUFFIX_LENGTH: usize = 6;

/// How many numbers the issuer tries before giving up on a collision streak.
pub const MAX_ISSUE_ATTEMPTS: usize = 5;

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Render `value` in upper-case base 36.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Every byte comes from BASE36_DIGITS, which is ASCII.
    digits.into_iter().map(char::from).collect()
}

/// Draw [`SUFFIX_LENGTH`] random upper-case base-36 characters.
pub fn random_suffix<R: Rng>(rng: &mut R) -> String {
    (0..SUFFIX_LENGTH)
        .map(|_| char::from(BASE36_DIGITS[rng.random_range(0..BASE36_DIGITS.len())]))
        .collect()
}

/// Build a certificate number for an issuance at `issued_at`.
pub fn generate_certificate_number<R: Rng>(issued_at: Timestamp, rng: &mut R) -> String {
    let millis = issued_at.timestamp_millis().max(0) as u64;
    format!(
        "{CERTIFICATE_PREFIX}-{}-{}",
        to_base36(millis),
        random_suffix(rng)
    )
}

/// Check that `number` has the `CERT-<base36>-<6 base36>` shape.
pub fn is_valid_certificate_number(number: &str) -> bool {
    let is_base36 = |s: &str| {
        !s.is_empty()
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
    };

    let mut parts = number.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some(stamp), Some(suffix), None) => {
            prefix == CERTIFICATE_PREFIX
                && is_base36(stamp)
                && suffix.len() == SUFFIX_LENGTH
                && is_base36(suffix)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_to_base36_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_295), "ZZ");
    }

    #[test]
    fn test_timestamp_segment_encodes_millis() {
        let issued_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let number = generate_certificate_number(issued_at, &mut rng);

        let stamp = number.split('-').nth(1).unwrap();
        assert_eq!(u64::from_str_radix(stamp, 36).unwrap(), 1_700_000_000_000);
    }

    #[test]
    fn test_generated_number_matches_format() {
        let mut rng = StdRng::seed_from_u64(42);
        let number = generate_certificate_number(Utc::now(), &mut rng);

        assert!(number.starts_with("CERT-"), "got {number}");
        assert!(is_valid_certificate_number(&number), "got {number}");
        assert_eq!(number.rsplit('-').next().unwrap().len(), SUFFIX_LENGTH);
    }

    #[test]
    fn test_numbers_unique_within_same_millisecond() {
        let issued_at = Utc::now();
        let mut rng = StdRng::seed_from_u64(1);
        let numbers: HashSet<String> = (0..200)
            .map(|_| generate_certificate_number(issued_at, &mut rng))
            .collect();
        assert_eq!(numbers.len(), 200);
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        assert!(!is_valid_certificate_number(""));
        assert!(!is_valid_certificate_number("CERT-ABC"));
        assert!(!is_valid_certificate_number("CERT-abc-ABCDEF"));
        assert!(!is_valid_certificate_number("CERT-ABC-ABCDE"));
        assert!(!is_valid_certificate_number("CERT-ABC-ABCDEF-X"));
        assert!(!is_valid_certificate_number("DIPL-ABC-ABCDEF"));
        assert!(is_valid_certificate_number("CERT-LOK3Q2-Z9X8Y7"));
    }
}
