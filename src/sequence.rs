//! Identifier sequencing.
//!
//! A starting token like "JB-02721" splits into a literal prefix "JB-0"
//! (everything before the longest trailing run of decimal digits) and a
//! numeric suffix whose original digit count fixes the zero-padding width.
//! Successors re-render the incremented number at that width; a number
//! that outgrows the width simply widens ("A999" → "A1000"), it is never
//! truncated or wrapped.
//!
//! A token with no trailing digits is a valid degenerate case: every label
//! carries the token unchanged and only repetitions distinguish slots.

/// Parsed form of the starting token. Pure and deterministic: `nth(k)` is
/// a function of the token and `k` alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequencer {
    prefix: String,
    number: Option<u128>,
    digits: usize,
}

impl Sequencer {
    /// Split `token` into prefix and trailing number.
    pub fn derive(token: &str) -> Self {
        let digit_count = token
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .count();
        // ASCII digits are one byte each, so this lands on a char boundary.
        let split = token.len() - digit_count;
        let suffix = &token[split..];

        match suffix.parse::<u128>() {
            Ok(number) => Sequencer {
                prefix: token[..split].to_string(),
                number: Some(number),
                digits: suffix.len(),
            },
            // No trailing digits, or a digit run too long to represent:
            // the token stays constant across the whole run.
            _ => Sequencer {
                prefix: token.to_string(),
                number: None,
                digits: 0,
            },
        }
    }

    /// The identifier for the k-th distinct label, k = 0 for the start.
    pub fn nth(&self, k: u32) -> String {
        match self.number {
            Some(number) => format!(
                "{}{:0width$}",
                self.prefix,
                number + k as u128,
                width = self.digits
            ),
            None => self.prefix.clone(),
        }
    }

    /// True when the token had no trailing digits and every label shares
    /// one identifier.
    pub fn is_constant(&self) -> bool {
        self.number.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_zero_reproduces_start() {
        let seq = Sequencer::derive("JB-0001");
        assert_eq!(seq.nth(0), "JB-0001");
    }

    #[test]
    fn test_increment_keeps_padding() {
        let seq = Sequencer::derive("JB-02721");
        assert_eq!(seq.nth(1), "JB-02722");
        assert_eq!(seq.nth(10), "JB-02731");
    }

    #[test]
    fn test_widening_no_truncation() {
        let seq = Sequencer::derive("A998");
        assert_eq!(seq.nth(0), "A998");
        assert_eq!(seq.nth(1), "A999");
        assert_eq!(seq.nth(2), "A1000");
    }

    #[test]
    fn test_no_trailing_digits_is_constant() {
        let seq = Sequencer::derive("ABC");
        assert!(seq.is_constant());
        assert_eq!(seq.nth(0), "ABC");
        assert_eq!(seq.nth(99), "ABC");
    }

    #[test]
    fn test_all_digit_token_has_empty_prefix() {
        let seq = Sequencer::derive("0001");
        assert_eq!(seq.nth(0), "0001");
        assert_eq!(seq.nth(9), "0010");
    }

    #[test]
    fn test_digits_inside_token_stay_literal() {
        let seq = Sequencer::derive("A7-B003");
        assert_eq!(seq.nth(1), "A7-B004");
    }

    #[test]
    fn test_overlong_digit_run_degrades_to_constant() {
        let token = "X123456789012345678901234567890123456789012345";
        let seq = Sequencer::derive(token);
        assert!(seq.is_constant());
        assert_eq!(seq.nth(3), token);
    }

    #[test]
    fn test_empty_token() {
        let seq = Sequencer::derive("");
        assert!(seq.is_constant());
        assert_eq!(seq.nth(5), "");
    }
}
