//! Declarative payload validation.
//!
//! Each payload type publishes a static rule table ([`FieldRules`] per wire
//! field) and exposes its field values by name. [`validate`] walks the table
//! and collects at most one message per field: rules run in declared order and
//! the first violation wins. Rules other than [`Rule::Required`] and
//! [`Rule::NotBlank`] accept absent values, so the same rule kinds serve both
//! creation payloads and partial updates.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Value of a single payload field as seen by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    Date(NaiveDate),
}

impl<'a> FieldValue<'a> {
    pub fn text(value: &'a str) -> Self {
        Self::Text(value)
    }

    pub fn opt_text(value: Option<&'a String>) -> Self {
        value.map_or(Self::Absent, |v| Self::Text(v.as_str()))
    }

    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Absent, Self::Date)
    }
}

/// A single field constraint with the message reported on violation.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Value must be present.
    Required(&'static str),
    /// Value must be present and contain a non-whitespace character.
    NotBlank(&'static str),
    /// Absent is fine; supplied text must contain a non-whitespace character.
    Filled(&'static str),
    /// Text length in characters must be within `min..=max`.
    Length {
        min: usize,
        max: usize,
        message: &'static str,
    },
    /// Text must match the whole pattern.
    Pattern {
        regex: &'static Lazy<Regex>,
        message: &'static str,
    },
    /// Text must look like an email address. Empty text is accepted.
    Email(&'static str),
    /// Date must not be after today.
    PastOrPresent(&'static str),
}

impl Rule {
    fn check(&self, value: FieldValue<'_>, today: NaiveDate) -> Result<(), &'static str> {
        use FieldValue::*;
        let ok = match (*self, value) {
            (Rule::Required(_), Absent) => false,
            (Rule::Required(_), _) => true,
            (Rule::NotBlank(_), Absent) => false,
            (Rule::NotBlank(_), Text(s)) => !s.trim().is_empty(),
            (Rule::NotBlank(_), Date(_)) => true,
            (Rule::Filled(_), Text(s)) => !s.trim().is_empty(),
            (Rule::Length { min, max, .. }, Text(s)) => {
                let len = s.chars().count();
                len >= min && len <= max
            }
            (Rule::Pattern { regex, .. }, Text(s)) => regex.is_match(s),
            (Rule::Email(_), Text(s)) => s.is_empty() || EMAIL.is_match(s),
            (Rule::PastOrPresent(_), Date(d)) => d <= today,
            _ => true,
        };
        if ok {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    pub fn message(&self) -> &'static str {
        match *self {
            Rule::Required(m)
            | Rule::NotBlank(m)
            | Rule::Filled(m)
            | Rule::Email(m)
            | Rule::PastOrPresent(m)
            | Rule::Length { message: m, .. }
            | Rule::Pattern { message: m, .. } => m,
        }
    }
}

/// Rules declared for one wire field (camelCase name).
#[derive(Debug)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// Implemented by every creation and update payload.
pub trait Validate {
    /// Static rule table of this payload type.
    fn rules() -> &'static [FieldRules];

    /// Current value of the named field; unknown names read as absent.
    fn field(&self, name: &str) -> FieldValue<'_>;
}

/// Field name → violation message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation unless the field already has one.
    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Owned copy suitable for serialization.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validate `payload` against its rule table using today's UTC date.
pub fn validate<T: Validate>(payload: &T) -> Result<(), FieldErrors> {
    validate_at(payload, Utc::now().date_naive())
}

/// Validate `payload` with an explicit "today" for date rules.
pub fn validate_at<T: Validate>(payload: &T, today: NaiveDate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for spec in T::rules() {
        let value = payload.field(spec.field);
        if let Some(message) = spec
            .rules
            .iter()
            .find_map(|rule| rule.check(value, today).err())
        {
            errors.insert(spec.field, message);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
