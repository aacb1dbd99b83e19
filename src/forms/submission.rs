// SPDX-License-Identifier: MIT

//! Submission checking
//!
//! A submission is checked against the fields that are visible for its
//! answers, and only those. A required field that conditions currently hide
//! does not block submission, and answers for hidden fields are not format
//! checked. What respondents cannot see cannot be held against them.

use thiserror::Error;

use crate::forms::condition::parse_calendar_date;
use crate::forms::response::{AnswerValue, ResponseSet};
use crate::forms::schema::{FieldDefinition, FieldKind, FormDefinition};

/// A problem with a single answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionIssue {
    /// Required visible field without a non-empty answer
    #[error("An answer is required")]
    Required,

    /// Email field whose answer does not look like an address
    #[error("Not a valid email address")]
    InvalidEmail,

    /// Number field whose answer does not parse
    #[error("Not a number")]
    InvalidNumber,

    /// Date field whose answer is not a calendar date
    #[error("Not a calendar date")]
    InvalidDate,

    /// Choice answer outside the declared options
    #[error("'{value}' is not one of the options")]
    UnknownOption { value: String },

    /// Answer whose shape does not fit the field kind
    #[error("Answer has the wrong shape for this field")]
    WrongShape,
}

/// One flagged field in a submission report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field_id: String,
    pub issue: SubmissionIssue,
}

/// Outcome of checking a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub issues: Vec<FieldIssue>,
}

impl SubmissionReport {
    /// Whether the submission can be accepted
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues flagged for a given field
    pub fn issues_for<'a>(&'a self, field_id: &'a str) -> impl Iterator<Item = &'a SubmissionIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.field_id == field_id)
            .map(|issue| &issue.issue)
    }
}

/// Check a set of answers against a form definition
pub fn check_submission(def: &FormDefinition, values: &ResponseSet) -> SubmissionReport {
    let mut report = SubmissionReport::default();

    for field in def.visible_fields(values) {
        if !field.kind.takes_answer() {
            continue;
        }
        if !values.is_answered(&field.id) {
            if field.required {
                report.issues.push(FieldIssue {
                    field_id: field.id.clone(),
                    issue: SubmissionIssue::Required,
                });
            }
            continue;
        }
        // is_answered ruled out absent answers above.
        if let Some(answer) = values.answer(&field.id) {
            if let Some(issue) = check_answer(field, answer) {
                report.issues.push(FieldIssue {
                    field_id: field.id.clone(),
                    issue,
                });
            }
        }
    }

    report
}

fn check_answer(field: &FieldDefinition, answer: &AnswerValue) -> Option<SubmissionIssue> {
    match field.kind {
        FieldKind::ShortText | FieldKind::LongText => match answer {
            AnswerValue::Text(_) => None,
            _ => Some(SubmissionIssue::WrongShape),
        },
        FieldKind::Email => match answer {
            AnswerValue::Text(text) if looks_like_email(text) => None,
            AnswerValue::Text(_) => Some(SubmissionIssue::InvalidEmail),
            _ => Some(SubmissionIssue::WrongShape),
        },
        FieldKind::Number => match answer {
            AnswerValue::Text(text) if text.trim().parse::<f64>().is_ok() => None,
            AnswerValue::Text(_) => Some(SubmissionIssue::InvalidNumber),
            _ => Some(SubmissionIssue::WrongShape),
        },
        FieldKind::Date => match answer {
            AnswerValue::Text(text) if parse_calendar_date(text).is_some() => None,
            AnswerValue::Text(_) => Some(SubmissionIssue::InvalidDate),
            _ => Some(SubmissionIssue::WrongShape),
        },
        FieldKind::SingleChoice => match answer {
            AnswerValue::Text(value) => {
                if field.options.iter().any(|option| &option.value == value) {
                    None
                } else {
                    Some(SubmissionIssue::UnknownOption {
                        value: value.clone(),
                    })
                }
            }
            _ => Some(SubmissionIssue::WrongShape),
        },
        FieldKind::MultiChoice => match answer {
            AnswerValue::Many(selections) => selections
                .iter()
                .find(|value| !field.options.iter().any(|option| option.value == **value))
                .map(|value| SubmissionIssue::UnknownOption {
                    value: value.clone(),
                }),
            _ => Some(SubmissionIssue::WrongShape),
        },
        FieldKind::Checkbox => match answer {
            AnswerValue::Flag(_) => None,
            _ => Some(SubmissionIssue::WrongShape),
        },
        FieldKind::Divider => None,
    }
}

fn looks_like_email(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = trimmed.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
