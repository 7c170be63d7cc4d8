//! Value entity.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Storage-assigned value identifier.
///
/// Any `i64` is representable so that validators can reject non-positive
/// identifiers explicitly; storage only ever assigns positive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ValueId(i64);

impl ValueId {
    /// Placeholder carried by values that have not been persisted yet.
    pub const UNASSIGNED: Self = Self(0);

    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether storage has assigned this identifier.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ValueId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for ValueId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A named value.
///
/// `name` is deliberately unvalidated here: candidates reach the validator
/// chain in [`crate::domain::ValueValidator`] before storage sees them.
///
/// ## Invariants
/// - `id` is [`ValueId::UNASSIGNED`] until storage assigns it, and never
///   changes afterwards.
///
/// # Examples
/// ```
/// use values_app::domain::{Value, ValueId};
///
/// let value = Value::new("Honesty");
/// assert_eq!(value.id(), ValueId::UNASSIGNED);
/// assert_eq!(value.name(), "Honesty");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Value {
    id: ValueId,
    name: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Value {
    /// New, unpersisted value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ValueId::UNASSIGNED,
            name: name.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Bare reference used to validate an identifier on its own.
    pub(crate) fn reference(id: ValueId) -> Self {
        Self {
            id,
            name: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Rehydrate a persisted value.
    pub fn from_parts(
        id: ValueId,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }

    /// Identifier, or [`ValueId::UNASSIGNED`].
    pub fn id(&self) -> ValueId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Creation timestamp once persisted.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Last modification timestamp once persisted.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Replace the name. Validation happens when the value is saved.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Record the identity and timestamps produced by storage on insert.
    pub fn mark_persisted(&mut self, id: ValueId, created_at: DateTime<Utc>) {
        debug_assert!(
            !self.id.is_assigned() || self.id == id,
            "value id must not change once assigned"
        );
        self.id = id;
        self.created_at = Some(created_at);
        self.updated_at = Some(created_at);
    }

    /// Record the modification timestamp produced by storage on update.
    pub fn mark_updated(&mut self, updated_at: DateTime<Utc>) {
        self.updated_at = Some(updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", Some(42))]
    #[case("-3", Some(-3))]
    #[case("abc", None)]
    #[case("", None)]
    fn parses_identifiers(#[case] raw: &str, #[case] expected: Option<i64>) {
        let parsed = raw.parse::<ValueId>().ok().map(ValueId::get);
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case(0, false)]
    #[case(-1, false)]
    #[case(1, true)]
    fn assigned_only_when_positive(#[case] raw: i64, #[case] expected: bool) {
        assert_eq!(ValueId::new(raw).is_assigned(), expected);
    }

    #[rstest]
    fn mark_persisted_sets_identity_and_timestamps() {
        let mut value = Value::new("Courage");
        let now = Utc::now();
        value.mark_persisted(ValueId::new(7), now);

        assert_eq!(value.id(), ValueId::new(7));
        assert_eq!(value.created_at(), Some(now));
        assert_eq!(value.updated_at(), Some(now));
    }

    #[rstest]
    fn serialises_flat_id() {
        let value = Value::new("Kindness");
        let json = serde_json::to_value(&value).expect("serialise value");
        assert_eq!(json["id"], 0);
        assert_eq!(json["name"], "Kindness");
    }
}
