// Declarative per-form validation: a fixed rule set per form variant,
// evaluated field by field. Any failure blocks submission and attaches a
// message to the offending field.

use std::collections::BTreeMap;

use crate::constants::{GENDER_OPTIONS, IDENTIFICATION_TYPES};
use crate::forms::field::{FieldValue, FormState};
use crate::models::AppointmentMode;

#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    Required,
    MinLen(usize),
    MaxLen(usize),
    Email,
    Phone,
    OneOf(&'static [&'static str]),
    Checked,
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraints: &'static [Constraint],
}

impl FieldRule {
    const fn new(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self { field, constraints }
    }
}

pub type ValidationErrors = BTreeMap<&'static str, String>;

use Constraint::*;

const NAME: &[Constraint] = &[Required, MinLen(2), MaxLen(50)];
const EMAIL: &[Constraint] = &[Required, Email];
const PHONE: &[Constraint] = &[Required, Phone];
const PRESENT: &[Constraint] = &[Required];
const SHORT_TEXT: &[Constraint] = &[Required, MinLen(2), MaxLen(50)];
const LONG_TEXT: &[Constraint] = &[Required, MinLen(2), MaxLen(500)];
const ADDRESS: &[Constraint] = &[Required, MinLen(5), MaxLen(500)];
const GENDER: &[Constraint] = &[Required, OneOf(GENDER_OPTIONS)];
const ID_TYPE: &[Constraint] = &[OneOf(IDENTIFICATION_TYPES)];
const CONSENT: &[Constraint] = &[Checked];
const CANCELLATION: &[Constraint] = &[Required, MinLen(2), MaxLen(500)];

/// Intake form: just enough to create a user.
pub fn user_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("name", NAME),
        FieldRule::new("email", EMAIL),
        FieldRule::new("phone", PHONE),
    ]
}

/// Full patient registration. Medical history fields are free-form and
/// optional; the three consent boxes must all be ticked.
pub fn registration_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("name", NAME),
        FieldRule::new("email", EMAIL),
        FieldRule::new("phone", PHONE),
        FieldRule::new("birth_date", PRESENT),
        FieldRule::new("gender", GENDER),
        FieldRule::new("address", ADDRESS),
        FieldRule::new("occupation", LONG_TEXT),
        FieldRule::new("emergency_contact_name", SHORT_TEXT),
        FieldRule::new("emergency_contact_number", PHONE),
        FieldRule::new("primary_physician", &[Required, MinLen(2)]),
        FieldRule::new("insurance_provider", SHORT_TEXT),
        FieldRule::new("insurance_policy_number", SHORT_TEXT),
        FieldRule::new("identification_type", ID_TYPE),
        FieldRule::new("treatment_consent", CONSENT),
        FieldRule::new("disclosure_consent", CONSENT),
        FieldRule::new("privacy_consent", CONSENT),
    ]
}

/// Appointment rules vary by mode: create and schedule need physician,
/// schedule and reason; cancel needs only a cancellation reason.
pub fn appointment_rules(mode: AppointmentMode) -> Vec<FieldRule> {
    match mode {
        AppointmentMode::Create | AppointmentMode::Schedule => vec![
            FieldRule::new("primary_physician", &[Required, MinLen(2)]),
            FieldRule::new("schedule", PRESENT),
            FieldRule::new("reason", LONG_TEXT),
        ],
        AppointmentMode::Cancel => vec![FieldRule::new("cancellation_reason", CANCELLATION)],
    }
}

/// Evaluate a rule set against the form values. Length, shape and membership
/// constraints only apply to non-blank values, so optional fields can carry
/// them without implying presence.
pub fn evaluate(rules: &[FieldRule], state: &FormState) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for rule in rules {
        let value = state.get(rule.field);
        for constraint in rule.constraints {
            if let Some(message) = check(constraint, rule.field, value) {
                errors.entry(rule.field).or_insert(message);
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check(constraint: &Constraint, field: &str, value: Option<&FieldValue>) -> Option<String> {
    let blank = value.is_none_or(FieldValue::is_blank);
    let text = match value {
        Some(FieldValue::Text(s)) => s.trim(),
        _ => "",
    };

    match constraint {
        Required => blank.then(|| format!("{} is required", label(field))),
        MinLen(min) => (!blank && text.chars().count() < *min)
            .then(|| format!("{} must be at least {min} characters", label(field))),
        MaxLen(max) => (!blank && text.chars().count() > *max)
            .then(|| format!("{} must be at most {max} characters", label(field))),
        Email => {
            (!blank && !is_email(text)).then(|| format!("{} must be a valid email", label(field)))
        }
        Phone => (!blank && !is_phone(text))
            .then(|| format!("{} must be a valid phone number", label(field))),
        OneOf(allowed) => (!blank && !allowed.contains(&text))
            .then(|| format!("{} must be one of the offered options", label(field))),
        Checked => {
            (!matches!(value, Some(FieldValue::Flag(true)))).then(|| "You must consent".to_string())
        }
    }
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}

fn is_email(s: &str) -> bool {
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

/// "+" followed by 10 to 15 digits.
fn is_phone(s: &str) -> bool {
    s.strip_prefix('+')
        .map(|digits| (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
