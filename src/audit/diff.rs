//! Field-level change detection between two user records
//!
//! `diff_users` compares the mutable fields in a fixed order and returns
//! one structured [`FieldChange`] per difference. Rendering to text is kept
//! separate so other front ends can phrase changes their own way.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::User;

/// Separator used when a list of changes is rendered to a single line
pub const CHANGE_SEPARATOR: &str = "; ";

/// The user fields that take part in change detection, in comparison order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Forename,
    Surname,
    Email,
    IsActive,
    DateOfBirth,
}

impl UserField {
    /// All fields, in the order they are compared
    pub const ALL: [UserField; 5] = [
        UserField::Forename,
        UserField::Surname,
        UserField::Email,
        UserField::IsActive,
        UserField::DateOfBirth,
    ];

    /// Label used when rendering a change
    pub fn label(&self) -> &'static str {
        match self {
            UserField::Forename => "Forename",
            UserField::Surname => "Surname",
            UserField::Email => "Email",
            UserField::IsActive => "Active",
            UserField::DateOfBirth => "Date of birth",
        }
    }

    /// Read this field from a user
    pub fn value_of(&self, user: &User) -> FieldValue {
        match self {
            UserField::Forename => FieldValue::Text(user.forename.clone()),
            UserField::Surname => FieldValue::Text(user.surname.clone()),
            UserField::Email => FieldValue::Text(user.email.clone()),
            UserField::IsActive => FieldValue::Flag(user.is_active),
            UserField::DateOfBirth => FieldValue::Date(user.date_of_birth),
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single field value taken from a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Date(NaiveDate),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Flag(b) => write!(f, "{}", b),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// One detected difference: `(field, old value, new value)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: UserField,
    pub old: FieldValue,
    pub new: FieldValue,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed from {} to {}",
            self.field.label(),
            self.old,
            self.new
        )
    }
}

/// Compare two users field by field
///
/// Identity is ignored. Equality is exact: string comparison is
/// case-sensitive. An empty result means the update is a no-op.
pub fn diff_users(old: &User, new: &User) -> Vec<FieldChange> {
    UserField::ALL
        .iter()
        .filter_map(|field| {
            let before = field.value_of(old);
            let after = field.value_of(new);
            (before != after).then(|| FieldChange {
                field: *field,
                old: before,
                new: after,
            })
        })
        .collect()
}

/// Render changes as one line, e.g. `"Forename changed from A to B; Active changed from true to false"`
pub fn render_changes(changes: &[FieldChange]) -> String {
    changes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(CHANGE_SEPARATOR)
}
