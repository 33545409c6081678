/// Largest memo, in UTF-8 bytes, that still yields a valid BOLT 11 payment
/// request.
pub const MEMO_MAX_BYTES: usize = 639;

/// Clips `memo` so that its UTF-8 encoding is strictly shorter than
/// `max_bytes`, never splitting a character.
///
/// Characters are admitted in order and clipping stops at the first one that
/// does not fit, so the result is always a prefix of `memo`.
pub fn clip(memo: &str, max_bytes: usize) -> String {
    if memo.len() < max_bytes {
        return memo.to_string();
    }

    let mut end = 0;
    for (idx, ch) in memo.char_indices() {
        let next = idx + ch.len_utf8();
        if next >= max_bytes {
            break;
        }
        end = next;
    }

    tracing::debug!(
        original_bytes = memo.len(),
        clipped_bytes = end,
        max_bytes,
        "clipped invoice memo"
    );
    memo[..end].to_string()
}

/// [`clip`] with the invoice budget: the result is at most `MEMO_MAX_BYTES - 1` bytes.
pub fn clip_invoice_memo(memo: &str) -> String {
    clip(memo, MEMO_MAX_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<String> {
        vec![
            String::new(),
            "a".to_string(),
            "hello world".to_string(),
            "€".repeat(300),
            "a".repeat(700),
            "né".repeat(400),
            "🦀".repeat(200),
            format!("{}{}", "x".repeat(637), "€"),
            "ab€🦀c".repeat(90),
        ]
    }

    #[test]
    fn test_short_memo_is_unchanged() {
        assert_eq!(clip("coffee", MEMO_MAX_BYTES), "coffee");
        assert_eq!(clip("", MEMO_MAX_BYTES), "");
        assert_eq!(clip("€", 4), "€");
    }

    #[test]
    fn test_ascii_memo_is_clipped_below_budget() {
        let memo = "a".repeat(700);
        let clipped = clip_invoice_memo(&memo);
        assert_eq!(clipped.len(), 638);
        assert_eq!(clipped, "a".repeat(638));
    }

    #[test]
    fn test_budget_is_strict() {
        let memo = "a".repeat(639);
        assert_eq!(clip(&memo, 639).len(), 638);
        assert_eq!(clip(&"a".repeat(638), 639).len(), 638);
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let memo = "€".repeat(300);
        assert_eq!(clip(&memo, 10), "€€€");

        // 637 ASCII bytes + a 3-byte char would need 640 bytes
        let memo = format!("{}€tail", "x".repeat(637));
        assert_eq!(clip_invoice_memo(&memo), "x".repeat(637));
    }

    #[test]
    fn test_stops_at_first_overflowing_character() {
        // 'b' alone would fit after '€' is refused, but the clip is a prefix
        assert_eq!(clip("aa€b", 4), "aa");
    }

    #[test]
    fn test_zero_budget_yields_empty() {
        assert_eq!(clip("anything", 0), "");
        assert_eq!(clip("", 0), "");
    }

    #[test]
    fn test_properties_over_samples() {
        for budget in [1, 2, 3, 4, 10, 100, MEMO_MAX_BYTES] {
            for memo in samples() {
                let clipped = clip(&memo, budget);
                if memo.len() < budget {
                    assert_eq!(clipped, memo);
                }
                assert!(clipped.len() < budget);
                assert!(memo.starts_with(&clipped));
                assert_eq!(clip(&clipped, budget), clipped);
            }
        }
    }
}
