// Month token validation

use proptest::prelude::*;
use tuition_reports::core::{is_valid_month, AppError, Month};

#[test]
fn test_all_twelve_tokens_are_valid() {
    let tokens = [
        "JANUARY", "FEBRUARY", "MARCH", "APRIL", "MAY", "JUNE", "JULY", "AUGUST", "SEPTEMBER",
        "OCTOBER", "NOVEMBER", "DECEMBER",
    ];

    for token in tokens {
        assert!(is_valid_month(token), "{} should be valid", token);
        let month: Month = token.parse().expect("valid token must parse");
        assert_eq!(month.as_str(), token);
    }
}

#[test]
fn test_months_iterate_in_calendar_order() {
    let months: Vec<Month> = Month::all().collect();
    assert_eq!(months.len(), 12);
    assert_eq!(months.first(), Some(&Month::January));
    assert_eq!(months.last(), Some(&Month::December));
    assert!(months.windows(2).all(|pair| pair[0] < pair[1]));

    // restartable
    assert_eq!(Month::all().count(), 12);
}

#[test]
fn test_non_canonical_spellings_are_rejected() {
    for token in ["", "March", "march", "MARCH ", " MARCH", "MAR", "SMARCH", "13"] {
        assert!(!is_valid_month(token), "{:?} should be invalid", token);
        assert!(matches!(token.parse::<Month>(), Err(AppError::InvalidMonth(_))));
    }
}

#[test]
fn test_month_serializes_as_upper_case_token() {
    let json = serde_json::to_string(&Month::September).unwrap();
    assert_eq!(json, "\"SEPTEMBER\"");

    let month: Month = serde_json::from_str("\"OCTOBER\"").unwrap();
    assert_eq!(month, Month::October);
}

proptest! {
    /// Property: validity and parsing always agree
    #[test]
    fn prop_validity_matches_parse(token in "[A-Za-z ]{0,12}") {
        prop_assert_eq!(is_valid_month(&token), token.parse::<Month>().is_ok());
    }

    /// Property: only the exact upper-case spelling is accepted
    #[test]
    fn prop_lowercased_tokens_are_invalid(index in 0usize..12) {
        let month = Month::ALL[index];
        prop_assert!(is_valid_month(month.as_str()));
        prop_assert!(!is_valid_month(&month.as_str().to_lowercase()));
    }
}
