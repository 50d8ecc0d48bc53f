// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types for STEP entity data
//!
//! This module defines the fundamental types shared by the record codec,
//! the model graph and the file reader/writer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe entity identifier
///
/// Wraps the raw STEP instance name (e.g., #123 becomes EntityId(123)).
/// `EntityId(0)` marks an entity that has not been given an id yet.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Unassigned id placeholder
    pub const UNASSIGNED: EntityId = EntityId(0);

    /// Check whether the id has been assigned
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0 as u64
    }
}

/// Tri-state boolean of EXPRESS `LOGICAL`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Logical {
    True,
    False,
    Unknown,
}

impl Logical {
    /// Parse the token between the dots (`T`, `F`, `U`, also `TRUE`/`FALSE`/`UNKNOWN`)
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "T" | "TRUE" => Some(Logical::True),
            "F" | "FALSE" => Some(Logical::False),
            "U" | "UNKNOWN" => Some(Logical::Unknown),
            _ => None,
        }
    }

    /// Wire token without the dots
    pub fn token(&self) -> &'static str {
        match self {
            Logical::True => "T",
            Logical::False => "F",
            Logical::Unknown => "U",
        }
    }

    /// Convert to a plain boolean, `None` for `Unknown`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Logical::True => Some(true),
            Logical::False => Some(false),
            Logical::Unknown => None,
        }
    }
}

impl From<bool> for Logical {
    fn from(value: bool) -> Self {
        if value {
            Logical::True
        } else {
            Logical::False
        }
    }
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}.", self.token())
    }
}

/// Attribute value
///
/// Represents any value that can appear in a STEP entity's argument list.
/// Strings are stored decoded; the codec applies STEP escaping on write.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AttributeValue {
    /// Absent value ($)
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// BOOLEAN or LOGICAL value (.T. / .F. / .U.)
    Logical(Logical),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Real(f64),
    /// String value
    String(String),
    /// Enumeration value (.VALUE.), stored without the dots
    Enum(String),
    /// Binary value ("0FF"), stored without the quotes
    Binary(String),
    /// List or set of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCLABEL('text')
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_string(),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Real(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_float(),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_integer(),
            _ => None,
        }
    }

    /// Try to get as logical
    pub fn as_logical(&self) -> Option<Logical> {
        match self {
            AttributeValue::Logical(l) => Some(*l),
            AttributeValue::Enum(s) => Logical::from_token(s),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_logical(),
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        self.as_logical().and_then(|l| l.as_bool())
    }

    /// Try to get as enum string
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Check if this is an absent value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Check if this is a derived value
    pub fn is_derived(&self) -> bool {
        matches!(self, AttributeValue::Derived)
    }

    /// Short description of the value kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "$",
            AttributeValue::Derived => "*",
            AttributeValue::EntityRef(_) => "entity reference",
            AttributeValue::Logical(_) => "logical",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Real(_) => "real",
            AttributeValue::String(_) => "string",
            AttributeValue::Enum(_) => "enumeration",
            AttributeValue::Binary(_) => "binary",
            AttributeValue::List(_) => "list",
            AttributeValue::TypedValue(_, _) => "typed value",
        }
    }

    /// Collect every entity reference contained in this value, in order
    pub fn entity_refs(&self) -> Vec<EntityId> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs(&self, out: &mut Vec<EntityId>) {
        match self {
            AttributeValue::EntityRef(id) => out.push(*id),
            AttributeValue::List(items) | AttributeValue::TypedValue(_, items) => {
                for item in items {
                    item.collect_refs(out);
                }
            }
            _ => {}
        }
    }

    /// Check whether this value references the given entity
    pub fn references(&self, target: EntityId) -> bool {
        match self {
            AttributeValue::EntityRef(id) => *id == target,
            AttributeValue::List(items) | AttributeValue::TypedValue(_, items) => {
                items.iter().any(|item| item.references(target))
            }
            _ => false,
        }
    }

    /// Remove every reference to `target`
    ///
    /// Direct references become `Null`, list elements are dropped and
    /// typed value arguments become `Null`. Returns true if anything changed.
    pub fn remove_refs(&mut self, target: EntityId) -> bool {
        match self {
            AttributeValue::EntityRef(id) if *id == target => {
                *self = AttributeValue::Null;
                true
            }
            AttributeValue::List(items) => {
                let before = items.len();
                items.retain(|item| item.as_entity_ref() != Some(target));
                let mut changed = items.len() != before;
                for item in items.iter_mut() {
                    changed |= item.remove_refs(target);
                }
                changed
            }
            // Wrapped arguments keep their position
            AttributeValue::TypedValue(_, args) => {
                let mut changed = false;
                for arg in args.iter_mut() {
                    changed |= arg.remove_refs(target);
                }
                changed
            }
            _ => false,
        }
    }

    /// Rewrite every reference through `map`; references without a mapping stay
    pub fn remap_refs(&mut self, map: &impl Fn(EntityId) -> Option<EntityId>) {
        match self {
            AttributeValue::EntityRef(id) => {
                if let Some(new_id) = map(*id) {
                    *id = new_id;
                }
            }
            AttributeValue::List(items) | AttributeValue::TypedValue(_, items) => {
                for item in items.iter_mut() {
                    item.remap_refs(map);
                }
            }
            _ => {}
        }
    }
}

impl From<EntityId> for AttributeValue {
    fn from(id: EntityId) -> Self {
        AttributeValue::EntityRef(id)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Real(f)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<Logical> for AttributeValue {
    fn from(l: Logical) -> Self {
        AttributeValue::Logical(l)
    }
}

impl From<Vec<EntityId>> for AttributeValue {
    fn from(ids: Vec<EntityId>) -> Self {
        AttributeValue::List(ids.into_iter().map(AttributeValue::EntityRef).collect())
    }
}

/// Model metadata extracted from (or written to) the STEP header
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Schema identifier from FILE_SCHEMA (e.g., "IFC2X3", "IFC4", "IFC4X3")
    pub schema_version: String,
    /// File description entries
    pub file_description: Vec<String>,
    /// Implementation level from FILE_DESCRIPTION (e.g., "2;1")
    pub implementation_level: Option<String>,
    /// File name from header
    pub file_name: Option<String>,
    /// Timestamp
    pub timestamp: Option<String>,
    /// Authors, in header order
    pub author: Vec<String>,
    /// Organizations, in header order
    pub organization: Vec<String>,
    /// Preprocessor version
    pub preprocessor_version: Option<String>,
    /// Originating system (CAD application)
    pub originating_system: Option<String>,
    /// Authorization
    pub authorization: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_tokens() {
        assert_eq!(Logical::from_token("T"), Some(Logical::True));
        assert_eq!(Logical::from_token("u"), Some(Logical::Unknown));
        assert_eq!(Logical::from_token("MAYBE"), None);
        assert_eq!(Logical::Unknown.to_string(), ".U.");
        assert_eq!(Logical::Unknown.as_bool(), None);
    }

    #[test]
    fn test_entity_refs_nested() {
        let value = AttributeValue::List(vec![
            AttributeValue::EntityRef(EntityId(1)),
            AttributeValue::List(vec![AttributeValue::EntityRef(EntityId(2))]),
            AttributeValue::Integer(3),
        ]);
        assert_eq!(value.entity_refs(), vec![EntityId(1), EntityId(2)]);
        assert!(value.references(EntityId(2)));
        assert!(!value.references(EntityId(3)));
    }

    #[test]
    fn test_remove_refs() {
        let mut value: AttributeValue = vec![EntityId(4), EntityId(5), EntityId(4)].into();
        assert!(value.remove_refs(EntityId(4)));
        assert_eq!(value, AttributeValue::from(vec![EntityId(5)]));

        let mut single = AttributeValue::EntityRef(EntityId(5));
        assert!(single.remove_refs(EntityId(5)));
        assert!(single.is_null());
        assert!(!single.remove_refs(EntityId(5)));
    }

    #[test]
    fn test_remove_refs_in_typed_value() {
        let mut wrapped = AttributeValue::List(vec![AttributeValue::TypedValue(
            "IFCWRAPPER".to_string(),
            vec![
                AttributeValue::EntityRef(EntityId(8)),
                AttributeValue::List(vec![
                    AttributeValue::EntityRef(EntityId(8)),
                    AttributeValue::EntityRef(EntityId(9)),
                ]),
            ],
        )]);
        assert!(wrapped.remove_refs(EntityId(8)));
        assert_eq!(
            wrapped,
            AttributeValue::List(vec![AttributeValue::TypedValue(
                "IFCWRAPPER".to_string(),
                vec![AttributeValue::Null, AttributeValue::from(vec![EntityId(9)])],
            )])
        );
        assert!(!wrapped.references(EntityId(8)));
        assert!(wrapped.references(EntityId(9)));
    }

    #[test]
    fn test_typed_value_accessors() {
        let label = AttributeValue::TypedValue(
            "IFCLABEL".to_string(),
            vec![AttributeValue::String("Concrete".to_string())],
        );
        assert_eq!(label.as_string(), Some("Concrete"));

        let boolean = AttributeValue::TypedValue(
            "IFCBOOLEAN".to_string(),
            vec![AttributeValue::Logical(Logical::True)],
        );
        assert_eq!(boolean.as_bool(), Some(true));
    }
}
