//! Mobile number validation
//!
//! One fixed-pattern predicate shared by the lookup, entry and exit sites.

/// A mobile number is valid iff it is exactly 10 ASCII digits.
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mobile() {
        assert!(is_valid_mobile("1234567890"));
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("0000000000"));
    }

    #[test]
    fn test_wrong_length() {
        assert!(!is_valid_mobile(""));
        assert!(!is_valid_mobile("123456789"));
        assert!(!is_valid_mobile("12345678901"));
    }

    #[test]
    fn test_non_digits() {
        assert!(!is_valid_mobile("12345abcde"));
        assert!(!is_valid_mobile("12345 6789"));
        assert!(!is_valid_mobile("+911234567"));
        // multibyte digits are not ASCII digits
        assert!(!is_valid_mobile("１２３４５６７８９０"));
    }
}
