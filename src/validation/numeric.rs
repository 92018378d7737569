//! Numeric answer extraction from free-form solver transcripts.
//!
//! The extractor is a heuristic tuned to transcripts that end with a line
//! like `FINAL ANSWER: 42`:
//!
//! - every signed integer or decimal token is collected in order;
//! - when there is more than one token and one of them equals `1.0`, a single
//!   `1.0` is discarded (enumerators such as "Step 1." otherwise pollute
//!   the result);
//! - the last remaining token is the answer.
//!
//! Known limitations, kept for behavioral compatibility: thousands
//! separators split a number into pieces ("1,200" reads as 1 and 200),
//! exponents are not recognised, and a genuine answer of exactly 1 is lost
//! whenever any other number appears in the transcript. Integers take a
//! sign as well as decimals, so a hyphen before digits reads as a minus:
//! "2024-01-15" ends in -15, not 15, and "pages 10-12" ends in -12.

use std::sync::LazyLock;

use regex::Regex;

static NUMBER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d*\.\d+|\d+)").expect("numeric token regex is valid")
});

/// Value discarded once when other candidates exist.
const ENUMERATOR_VALUE: f64 = 1.0;

/// Collect every numeric token in `text`, in order of appearance.
pub fn numeric_tokens(text: &str) -> Vec<f64> {
    NUMBER_TOKEN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Extract the representative numeric value of a transcript.
///
/// Returns `None` for absent or empty input and for text with no numeric
/// token at all.
pub fn extract_number(text: Option<&str>) -> Option<f64> {
    let text = text.filter(|t| !t.is_empty())?;
    let mut values = numeric_tokens(text);

    if values.len() > 1 {
        if let Some(pos) = values.iter().position(|v| *v == ENUMERATOR_VALUE) {
            values.remove(pos);
        }
    }

    values.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_numbers_is_none() {
        assert_eq!(extract_number(None), None);
        assert_eq!(extract_number(Some("")), None);
        assert_eq!(extract_number(Some("Error")), None);
        assert_eq!(extract_number(Some("the answer is unknowable")), None);
    }

    #[test]
    fn test_last_number_wins() {
        let transcript = "Distance = 360 km, speed = 140 km/h.\nFINAL ANSWER: 2.57";
        assert_eq!(extract_number(Some(transcript)), Some(2.57));
    }

    #[test]
    fn test_enumerator_removed_once() {
        let transcript = "Step 1. Add 2 and 3.\nFINAL ANSWER: 5";
        assert_eq!(extract_number(Some(transcript)), Some(5.0));

        // Only the first 1 goes; a trailing 1 survives.
        assert_eq!(extract_number(Some("1 then 7 then 1")), Some(1.0));
    }

    #[test]
    fn test_lone_one_is_kept() {
        assert_eq!(extract_number(Some("1.0")), Some(1.0));
        assert_eq!(extract_number(Some("FINAL ANSWER: 1")), Some(1.0));
    }

    #[test]
    fn test_one_with_other_number_drops_the_one() {
        assert_eq!(extract_number(Some("FINAL ANSWER: 12 (check 1.0)")), Some(12.0));
    }

    #[test]
    fn test_signed_and_decimal_tokens() {
        assert_eq!(numeric_tokens("-4 and +2.5 and .75"), vec![-4.0, 2.5, 0.75]);
        assert_eq!(extract_number(Some("temperature fell to -12")), Some(-12.0));
    }

    #[test]
    fn test_thousands_separator_limitation() {
        // Documented limitation: the comma splits the number.
        assert_eq!(extract_number(Some("FINAL ANSWER: 1,200")), Some(200.0));
    }

    #[test]
    fn test_hyphen_before_integer_is_a_sign() {
        assert_eq!(extract_number(Some("Dated 2024-01-15")), Some(-15.0));
        assert_eq!(extract_number(Some("See pages 10-12")), Some(-12.0));
    }

    #[test]
    fn test_pure_function() {
        let text = Some("Step 1: 3 * 4\nFINAL ANSWER: 12");
        assert_eq!(extract_number(text), extract_number(text));
    }
}
