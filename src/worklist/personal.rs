//! Personal numbers printed on name tags.

use rand::Rng;

const MIN_DIGITS: usize = 6;
const MAX_DIGITS: usize = 15;
const GENERATED_DIGITS: usize = 8;

/// Accepts 6 to 15 ASCII digits once hyphens and whitespace are removed.
pub fn is_valid_personal_number(raw: &str) -> bool {
    let digits: String = raw
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Random 8-digit code for staff that have no number yet. Leading zeros are
/// kept.
pub fn generate_personal_code() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_to_fifteen_digits() {
        assert!(is_valid_personal_number("123456"));
        assert!(is_valid_personal_number("123456789012345"));
        assert!(is_valid_personal_number("123456789-0000"));
        assert!(is_valid_personal_number("12 34 56"));
    }

    #[test]
    fn rejects_short_long_and_non_digits() {
        assert!(!is_valid_personal_number(""));
        assert!(!is_valid_personal_number("12345"));
        assert!(!is_valid_personal_number("1234567890123456"));
        assert!(!is_valid_personal_number("12345A"));
        assert!(!is_valid_personal_number("１２３４５６"));
    }

    #[test]
    fn generated_codes_are_eight_digits_and_valid() {
        for _ in 0..50 {
            let code = generate_personal_code();
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(is_valid_personal_number(&code));
        }
    }
}
