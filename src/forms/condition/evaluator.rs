//! Condition evaluation against a set of answers
//!
//! Evaluation is pure: answers in, boolean out. No operator throws, logs, or
//! touches anything outside the response set, so callers may re-run
//! evaluation on every keystroke.

use chrono::NaiveDate;

use super::operator::Operator;
use super::rule::{Condition, ConditionValue};
use crate::forms::response::{AnswerValue, ResponseSet};

/// Evaluate a single condition's comparison against the answers given so
/// far. Returns whether the comparison holds, before the show/hide action
/// is applied.
///
/// Every operator has a defined answer for every answer shape, including
/// absent answers. Operators this engine does not recognize evaluate to
/// `true` so that a definition written by a newer builder degrades to
/// showing fields rather than hiding them.
pub fn evaluate_condition(condition: &Condition, values: &ResponseSet) -> bool {
    let source = values.answer(&condition.source_field_id);
    let compare = condition.value.as_ref();

    match &condition.operator {
        Operator::Equals => matches_equals(source, compare),
        Operator::NotEquals => !matches_equals(source, compare),
        Operator::Contains => matches_contains(source, compare),
        Operator::DoesNotContain => !matches_contains(source, compare),
        Operator::IsEmpty => answer_is_empty(source),
        Operator::IsNotEmpty => !answer_is_empty(source),
        Operator::IsAnyOf => matches_any_of(source, compare),
        Operator::IsNotAnyOf => !matches_any_of(source, compare),
        Operator::IsEveryOf => matches_every_of(source, compare),
        Operator::Before => compare_dates(source, compare, |s, c| s < c),
        Operator::BeforeOrEqual => compare_dates(source, compare, |s, c| s <= c),
        Operator::After => compare_dates(source, compare, |s, c| s > c),
        Operator::AfterOrEqual => compare_dates(source, compare, |s, c| s >= c),
        Operator::Unknown(_) => true,
    }
}

fn matches_equals(source: Option<&AnswerValue>, compare: Option<&ConditionValue>) -> bool {
    match (source, compare.and_then(ConditionValue::as_one)) {
        (Some(AnswerValue::Text(s)), Some(expected)) => s == expected,
        _ => false,
    }
}

fn matches_contains(source: Option<&AnswerValue>, compare: Option<&ConditionValue>) -> bool {
    let Some(needle) = compare.and_then(ConditionValue::as_one) else {
        return false;
    };
    match source {
        Some(AnswerValue::Text(s)) => s.contains(needle),
        Some(AnswerValue::Many(items)) => items.iter().any(|item| item == needle),
        Some(AnswerValue::Flag(_)) => false,
        // An unanswered field reads as empty text here.
        None => needle.is_empty(),
    }
}

fn answer_is_empty(source: Option<&AnswerValue>) -> bool {
    source.map(AnswerValue::is_empty).unwrap_or(true)
}

fn matches_any_of(source: Option<&AnswerValue>, compare: Option<&ConditionValue>) -> bool {
    let Some(allowed) = compare.map(ConditionValue::as_slice) else {
        return false;
    };
    match source {
        Some(AnswerValue::Text(s)) => allowed.contains(s),
        Some(AnswerValue::Many(items)) => items.iter().any(|item| allowed.contains(item)),
        _ => false,
    }
}

fn matches_every_of(source: Option<&AnswerValue>, compare: Option<&ConditionValue>) -> bool {
    let Some(required) = compare.map(ConditionValue::as_slice) else {
        return false;
    };
    match source {
        Some(AnswerValue::Many(items)) => required.iter().all(|value| items.contains(value)),
        // A single value never covers a required set.
        _ => false,
    }
}

fn compare_dates<F>(source: Option<&AnswerValue>, compare: Option<&ConditionValue>, cmp: F) -> bool
where
    F: Fn(NaiveDate, NaiveDate) -> bool,
{
    let Some(AnswerValue::Text(answered)) = source else {
        return false;
    };
    let Some(expected) = compare.and_then(ConditionValue::as_one) else {
        return false;
    };
    match (parse_calendar_date(answered), parse_calendar_date(expected)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Parse an answer into a calendar date. Date fields store `YYYY-MM-DD`;
/// RFC 3339 timestamps are accepted and truncated to their date.
pub(crate) fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses_with(pairs: Vec<(&str, AnswerValue)>) -> ResponseSet {
        let mut values = ResponseSet::new();
        for (k, v) in pairs {
            values.set(k, v);
        }
        values
    }

    fn rule(operator: Operator, value: Option<ConditionValue>) -> Condition {
        Condition::show("target", "source", operator, value)
    }

    #[test]
    fn test_equals() {
        let values = responses_with(vec![("source", AnswerValue::text("yes"))]);

        let condition = rule(Operator::Equals, Some(ConditionValue::one("yes")));
        assert!(evaluate_condition(&condition, &values));

        let condition = rule(Operator::Equals, Some(ConditionValue::one("no")));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_equals_unanswered_source() {
        let values = ResponseSet::new();
        let condition = rule(Operator::Equals, Some(ConditionValue::one("yes")));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_equals_is_shape_strict() {
        // A checked box is not the text "true", and selections are not text.
        let values = responses_with(vec![
            ("source", AnswerValue::flag(true)),
            ("multi", AnswerValue::many(["yes"])),
        ]);

        let condition = rule(Operator::Equals, Some(ConditionValue::one("true")));
        assert!(!evaluate_condition(&condition, &values));

        let condition = Condition::show(
            "target",
            "multi",
            Operator::Equals,
            Some(ConditionValue::one("yes")),
        );
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_not_equals_is_exact_negation() {
        let cases = vec![
            responses_with(vec![("source", AnswerValue::text("yes"))]),
            responses_with(vec![("source", AnswerValue::text("no"))]),
            responses_with(vec![("source", AnswerValue::flag(true))]),
            ResponseSet::new(),
        ];
        for values in cases {
            let positive = rule(Operator::Equals, Some(ConditionValue::one("yes")));
            let negative = rule(Operator::NotEquals, Some(ConditionValue::one("yes")));
            assert_eq!(
                evaluate_condition(&positive, &values),
                !evaluate_condition(&negative, &values)
            );
        }
    }

    #[test]
    fn test_contains_substring() {
        let values = responses_with(vec![("source", AnswerValue::text("hello world"))]);

        let condition = rule(Operator::Contains, Some(ConditionValue::one("world")));
        assert!(evaluate_condition(&condition, &values));

        let condition = rule(Operator::Contains, Some(ConditionValue::one("mars")));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_contains_selection_membership() {
        let values = responses_with(vec![("source", AnswerValue::many(["rust", "forms"]))]);

        let condition = rule(Operator::Contains, Some(ConditionValue::one("rust")));
        assert!(evaluate_condition(&condition, &values));

        // Membership is exact, not substring.
        let condition = rule(Operator::Contains, Some(ConditionValue::one("rus")));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_contains_unanswered_reads_as_empty_text() {
        let values = ResponseSet::new();

        let condition = rule(Operator::Contains, Some(ConditionValue::one("x")));
        assert!(!evaluate_condition(&condition, &values));

        // Empty needle is a substring of empty text.
        let condition = rule(Operator::Contains, Some(ConditionValue::one("")));
        assert!(evaluate_condition(&condition, &values));

        let condition = rule(Operator::DoesNotContain, Some(ConditionValue::one("x")));
        assert!(evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_is_empty() {
        let condition = rule(Operator::IsEmpty, None);

        assert!(evaluate_condition(&condition, &ResponseSet::new()));
        assert!(evaluate_condition(
            &condition,
            &responses_with(vec![("source", AnswerValue::text(""))])
        ));
        assert!(evaluate_condition(
            &condition,
            &responses_with(vec![("source", AnswerValue::flag(false))])
        ));
        assert!(evaluate_condition(
            &condition,
            &responses_with(vec![("source", AnswerValue::many(Vec::<String>::new()))])
        ));

        assert!(!evaluate_condition(
            &condition,
            &responses_with(vec![("source", AnswerValue::text("x"))])
        ));
        assert!(!evaluate_condition(
            &condition,
            &responses_with(vec![("source", AnswerValue::flag(true))])
        ));
        assert!(!evaluate_condition(
            &condition,
            &responses_with(vec![("source", AnswerValue::many(["a"]))])
        ));
    }

    #[test]
    fn test_is_not_empty_is_exact_negation() {
        let cases = vec![
            ResponseSet::new(),
            responses_with(vec![("source", AnswerValue::text(""))]),
            responses_with(vec![("source", AnswerValue::text("x"))]),
            responses_with(vec![("source", AnswerValue::flag(false))]),
            responses_with(vec![("source", AnswerValue::flag(true))]),
            responses_with(vec![("source", AnswerValue::many(Vec::<String>::new()))]),
            responses_with(vec![("source", AnswerValue::many(["a"]))]),
        ];
        for values in cases {
            let empty = rule(Operator::IsEmpty, None);
            let not_empty = rule(Operator::IsNotEmpty, None);
            assert_eq!(
                evaluate_condition(&empty, &values),
                !evaluate_condition(&not_empty, &values)
            );
        }
    }

    #[test]
    fn test_is_any_of_with_text_source() {
        let values = responses_with(vec![("source", AnswerValue::text("a"))]);

        let condition = rule(Operator::IsAnyOf, Some(ConditionValue::many(["a", "b"])));
        assert!(evaluate_condition(&condition, &values));

        let condition = rule(Operator::IsAnyOf, Some(ConditionValue::many(["b", "c"])));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_is_any_of_with_selection_source() {
        let values = responses_with(vec![("source", AnswerValue::many(["b", "d"]))]);

        let condition = rule(Operator::IsAnyOf, Some(ConditionValue::many(["a", "b"])));
        assert!(evaluate_condition(&condition, &values));

        let condition = rule(Operator::IsAnyOf, Some(ConditionValue::many(["x", "y"])));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_is_any_of_accepts_single_value_payload() {
        // A scalar payload behaves as a one-element set.
        let values = responses_with(vec![("source", AnswerValue::text("a"))]);
        let condition = rule(Operator::IsAnyOf, Some(ConditionValue::one("a")));
        assert!(evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_is_any_of_unanswered_source() {
        let values = ResponseSet::new();
        let condition = rule(Operator::IsAnyOf, Some(ConditionValue::many(["a"])));
        assert!(!evaluate_condition(&condition, &values));

        let negated = rule(Operator::IsNotAnyOf, Some(ConditionValue::many(["a"])));
        assert!(evaluate_condition(&negated, &values));
    }

    #[test]
    fn test_is_every_of() {
        let values = responses_with(vec![("source", AnswerValue::many(["a", "b", "c"]))]);

        let condition = rule(Operator::IsEveryOf, Some(ConditionValue::many(["a", "b"])));
        assert!(evaluate_condition(&condition, &values));

        let condition = rule(Operator::IsEveryOf, Some(ConditionValue::many(["a", "z"])));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_is_every_of_rejects_scalar_source() {
        // Asymmetric with is_any_of: a text answer never covers a set.
        let values = responses_with(vec![("source", AnswerValue::text("a"))]);
        let condition = rule(Operator::IsEveryOf, Some(ConditionValue::many(["a"])));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_is_every_of_empty_required_set() {
        let values = responses_with(vec![("source", AnswerValue::many(["a"]))]);
        let condition = rule(
            Operator::IsEveryOf,
            Some(ConditionValue::many(Vec::<String>::new())),
        );
        assert!(evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_missing_payload_on_value_operators() {
        let values = responses_with(vec![("source", AnswerValue::text("a"))]);

        assert!(!evaluate_condition(&rule(Operator::Equals, None), &values));
        assert!(!evaluate_condition(&rule(Operator::Contains, None), &values));
        assert!(!evaluate_condition(&rule(Operator::IsAnyOf, None), &values));
        assert!(!evaluate_condition(&rule(Operator::IsEveryOf, None), &values));
        assert!(!evaluate_condition(&rule(Operator::Before, None), &values));
    }

    #[test]
    fn test_date_before_after() {
        let values = responses_with(vec![("source", AnswerValue::text("2024-03-15"))]);

        let before = |v| rule(Operator::Before, Some(ConditionValue::one(v)));
        let after = |v| rule(Operator::After, Some(ConditionValue::one(v)));

        assert!(evaluate_condition(&before("2024-04-01"), &values));
        assert!(!evaluate_condition(&before("2024-03-15"), &values));
        assert!(!evaluate_condition(&before("2024-01-01"), &values));

        assert!(evaluate_condition(&after("2024-01-01"), &values));
        assert!(!evaluate_condition(&after("2024-03-15"), &values));
        assert!(!evaluate_condition(&after("2024-04-01"), &values));
    }

    #[test]
    fn test_date_or_equal_bounds() {
        let values = responses_with(vec![("source", AnswerValue::text("2024-03-15"))]);

        let condition = rule(
            Operator::BeforeOrEqual,
            Some(ConditionValue::one("2024-03-15")),
        );
        assert!(evaluate_condition(&condition, &values));

        let condition = rule(
            Operator::AfterOrEqual,
            Some(ConditionValue::one("2024-03-15")),
        );
        assert!(evaluate_condition(&condition, &values));

        let condition = rule(
            Operator::AfterOrEqual,
            Some(ConditionValue::one("2024-03-16")),
        );
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_date_accepts_rfc3339_timestamps() {
        let values = responses_with(vec![(
            "source",
            AnswerValue::text("2024-03-15T09:30:00+00:00"),
        )]);
        let condition = rule(
            Operator::BeforeOrEqual,
            Some(ConditionValue::one("2024-03-15")),
        );
        assert!(evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_date_unparseable_or_missing_is_false() {
        let unanswered = ResponseSet::new();
        let condition = rule(Operator::Before, Some(ConditionValue::one("2024-01-01")));
        assert!(!evaluate_condition(&condition, &unanswered));

        let garbled = responses_with(vec![("source", AnswerValue::text("not a date"))]);
        assert!(!evaluate_condition(&condition, &garbled));

        let values = responses_with(vec![("source", AnswerValue::text("2024-03-15"))]);
        let condition = rule(Operator::After, Some(ConditionValue::one("soon")));
        assert!(!evaluate_condition(&condition, &values));
    }

    #[test]
    fn test_unknown_operator_fails_open() {
        let condition = rule(
            Operator::Unknown("matches_regex".to_string()),
            Some(ConditionValue::one(".*")),
        );
        assert!(evaluate_condition(&condition, &ResponseSet::new()));
    }

    #[test]
    fn test_evaluation_does_not_consume_answers() {
        let values = responses_with(vec![("source", AnswerValue::text("yes"))]);
        let condition = rule(Operator::Equals, Some(ConditionValue::one("yes")));

        let first = evaluate_condition(&condition, &values);
        let second = evaluate_condition(&condition, &values);
        assert_eq!(first, second);
        assert_eq!(values.text("source"), Some("yes"));
    }

    #[test]
    fn test_parse_calendar_date_formats() {
        assert!(parse_calendar_date("2024-03-15").is_some());
        assert!(parse_calendar_date(" 2024-03-15 ").is_some());
        assert!(parse_calendar_date("2024-03-15T10:00:00Z").is_some());
        assert!(parse_calendar_date("15/03/2024").is_none());
        assert!(parse_calendar_date("").is_none());
    }
}
