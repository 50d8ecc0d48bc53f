// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity records
//!
//! An [`Entity`] is one STEP instance: its id, its schema type, the explicit
//! attribute values in wire order and the inverse lists maintained by the
//! model graph. Reading and writing a single record is schema driven, so
//! every entity type shares the same codec.

use crate::encoding::write_value;
use crate::schema::{AttributeKind, EntityDef, Schema, SimpleType};
use crate::{AttributeValue, EntityId, Logical, Result, StepError};
use std::fmt::Write;

/// Maps a referenced id to the type of the entity it names
pub type TypeLookup<'a> = dyn Fn(EntityId) -> Option<&'static EntityDef> + 'a;

/// One entity instance
#[derive(Clone, Debug)]
pub struct Entity {
    id: EntityId,
    schema: &'static Schema,
    def: &'static EntityDef,
    attributes: Vec<AttributeValue>,
    inverses: Vec<Vec<EntityId>>,
}

impl Entity {
    /// Create an empty instance: every attribute absent, every inverse list empty
    pub fn new(schema: &'static Schema, def: &'static EntityDef, id: EntityId) -> Self {
        Self {
            id,
            schema,
            def,
            attributes: vec![AttributeValue::Null; schema.arity(def)],
            inverses: vec![Vec::new(); schema.all_inverses(def).len()],
        }
    }

    /// Create an empty instance of a concrete type given by name
    pub fn from_type_name(schema: &'static Schema, type_name: &str, id: EntityId) -> Result<Self> {
        let def = schema
            .entity(type_name)
            .ok_or_else(|| StepError::UnknownEntityType {
                entity: id,
                type_name: type_name.to_string(),
            })?;
        if def.is_abstract {
            return Err(StepError::AbstractEntity {
                entity: id,
                type_name: def.name.to_string(),
            });
        }
        Ok(Self::new(schema, def, id))
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    #[inline]
    pub fn def(&self) -> &'static EntityDef {
        self.def
    }

    #[inline]
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Type name as declared in the schema (e.g. "IfcWall")
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.def.name
    }

    /// Check whether this entity is of the given type or a subtype of it
    pub fn is_a(&self, type_name: &str) -> bool {
        self.schema.is_subtype_of(self.def, type_name)
    }

    /// Attribute values in wire order
    #[inline]
    pub fn attributes(&self) -> &[AttributeValue] {
        &self.attributes
    }

    /// Attribute at position
    #[inline]
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut [AttributeValue] {
        &mut self.attributes
    }

    /// Inverse list by name (empty if the type declares no such inverse)
    pub fn inverse(&self, name: &str) -> &[EntityId] {
        self.schema
            .inverse_index(self.def, name)
            .and_then(|index| self.inverses.get(index))
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// All inverse lists with their names, in declaration order
    pub fn inverses(&self) -> impl Iterator<Item = (&'static str, &[EntityId])> + '_ {
        self.schema
            .all_inverses(self.def)
            .iter()
            .zip(self.inverses.iter())
            .map(|(def, ids)| (def.name, ids.as_slice()))
    }

    pub(crate) fn inverse_lists_mut(&mut self) -> &mut [Vec<EntityId>] {
        &mut self.inverses
    }

    /// GlobalId of IfcRoot subtypes
    pub fn global_id(&self) -> Option<&str> {
        if self.is_a("IfcRoot") {
            self.attributes.first().and_then(|v| v.as_string())
        } else {
            None
        }
    }

    /// Populate the attributes from raw argument values
    ///
    /// Fails when the argument count differs from the schema arity. A `$` in a
    /// mandatory slot is reported and kept absent. Values that
    /// do not fit their attribute (unresolved reference, type mismatch, bad
    /// enumeration token) are returned as diagnostics and left absent; in
    /// aggregates the offending element is dropped.
    pub fn read_step_arguments(
        &mut self,
        args: Vec<AttributeValue>,
        type_lookup: &TypeLookup<'_>,
    ) -> Result<Vec<StepError>> {
        let schema = self.schema;
        let definitions = schema.all_attributes(self.def);
        if args.len() != definitions.len() {
            return Err(StepError::ArgumentCount {
                entity: self.id,
                type_name: self.def.name.to_ascii_uppercase(),
                expected: definitions.len(),
                actual: args.len(),
            });
        }

        let mut diagnostics = Vec::new();
        let coercer = Coercer {
            schema,
            entity: self.id,
            lookup: type_lookup,
        };
        let derived = schema.derived_mask(self.def);
        for (index, (raw, attr)) in args.into_iter().zip(definitions.iter()).enumerate() {
            if raw.is_null() && !attr.optional && !derived.get(index).copied().unwrap_or(false) {
                diagnostics.push(StepError::MissingAttribute {
                    entity: self.id,
                    attribute: attr.name.to_string(),
                });
            }
            self.attributes[index] = coercer
                .coerce(attr.name, &attr.kind, raw, &mut diagnostics)
                .unwrap_or(AttributeValue::Null);
        }
        Ok(diagnostics)
    }

    /// Set one attribute after checking it against its declared kind
    ///
    /// Unlike reading, any problem with the value is an error and the
    /// attribute is left unchanged. Mandatory attributes cannot be cleared.
    pub fn set_checked(
        &mut self,
        index: usize,
        value: AttributeValue,
        type_lookup: &TypeLookup<'_>,
    ) -> Result<()> {
        let schema = self.schema;
        let attr = schema
            .all_attributes(self.def)
            .get(index)
            .ok_or_else(|| StepError::UnknownAttribute {
                type_name: self.def.name.to_string(),
                attribute: format!("#{}", index),
            })?;
        let derived = schema.derived_mask(self.def).get(index).copied().unwrap_or(false);
        if value.is_null() && !attr.optional && !derived {
            return Err(StepError::MissingAttribute {
                entity: self.id,
                attribute: attr.name.to_string(),
            });
        }
        let coercer = Coercer {
            schema: self.schema,
            entity: self.id,
            lookup: type_lookup,
        };
        let mut diagnostics = Vec::new();
        let value = coercer.coerce(attr.name, &attr.kind, value, &mut diagnostics);
        if let Some(err) = diagnostics.into_iter().next() {
            return Err(err);
        }
        self.attributes[index] = value.unwrap_or(AttributeValue::Null);
        Ok(())
    }

    /// Append `#id=IFCTYPE(arg0,arg1,...);` to `out`
    ///
    /// Absent attributes are written `$`, attributes redeclared DERIVE `*`.
    pub fn write_step_line(&self, out: &mut String) {
        let _ = write!(out, "#{}={}(", self.id.0, self.def.name.to_ascii_uppercase());
        let derived = self.schema.derived_mask(self.def);
        for (index, value) in self.attributes.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            if derived.get(index).copied().unwrap_or(false) {
                out.push('*');
            } else {
                write_value(out, value);
            }
        }
        out.push_str(");");
    }

    /// The record as one STEP line
    pub fn step_line(&self) -> String {
        let mut out = String::with_capacity(64);
        self.write_step_line(&mut out);
        out
    }
}

struct Coercer<'a> {
    schema: &'static Schema,
    entity: EntityId,
    lookup: &'a TypeLookup<'a>,
}

impl Coercer<'_> {
    /// Coerce one raw value; `None` means rejected with a diagnostic pushed
    fn coerce(
        &self,
        attribute: &str,
        kind: &AttributeKind,
        raw: AttributeValue,
        diagnostics: &mut Vec<StepError>,
    ) -> Option<AttributeValue> {
        if matches!(raw, AttributeValue::Null | AttributeValue::Derived) {
            return Some(raw);
        }
        let result = match kind {
            AttributeKind::Simple(simple) => self.simple(attribute, kind, *simple, raw),
            AttributeKind::Defined(name, simple) => match raw {
                // Redundant type wrapper around a plain value
                AttributeValue::TypedValue(type_name, mut args)
                    if type_name.eq_ignore_ascii_case(name) && args.len() == 1 =>
                {
                    let inner = args.remove(0);
                    self.simple(attribute, kind, *simple, inner)
                }
                raw => self.simple(attribute, kind, *simple, raw),
            },
            AttributeKind::Enumeration(name, tokens) => match raw {
                AttributeValue::Enum(token) => {
                    let upper = token.to_ascii_uppercase();
                    if tokens.iter().any(|t| *t == upper) {
                        Ok(AttributeValue::Enum(upper))
                    } else {
                        Err(StepError::InvalidEnumeration {
                            entity: self.entity,
                            attribute: attribute.to_string(),
                            enumeration: (*name).to_string(),
                            value: token,
                        })
                    }
                }
                other => Err(self.mismatch(attribute, kind, &other)),
            },
            AttributeKind::Entity(name) => match raw {
                AttributeValue::EntityRef(target) => {
                    self.reference(attribute, kind, target, std::slice::from_ref(name))
                }
                other => Err(self.mismatch(attribute, kind, &other)),
            },
            AttributeKind::Select(_, members) => match raw {
                AttributeValue::EntityRef(target) => {
                    self.reference(attribute, kind, target, members)
                }
                AttributeValue::TypedValue(type_name, args) => {
                    self.typed(attribute, kind, members, type_name, args)
                }
                other => Err(self.mismatch(attribute, kind, &other)),
            },
            AttributeKind::Aggregate(_, element) => match raw {
                AttributeValue::List(items) => Ok(AttributeValue::List(
                    items
                        .into_iter()
                        .filter_map(|item| self.coerce(attribute, element, item, diagnostics))
                        .collect(),
                )),
                other => Err(self.mismatch(attribute, kind, &other)),
            },
        };

        match result {
            Ok(value) => Some(value),
            Err(err) => {
                diagnostics.push(err);
                None
            }
        }
    }

    fn simple(
        &self,
        attribute: &str,
        kind: &AttributeKind,
        simple: SimpleType,
        raw: AttributeValue,
    ) -> Result<AttributeValue> {
        let value = match (simple, raw) {
            (SimpleType::String, v @ AttributeValue::String(_)) => v,
            (SimpleType::Integer, v @ AttributeValue::Integer(_)) => v,
            (SimpleType::Real, AttributeValue::Integer(i)) => AttributeValue::Real(i as f64),
            (SimpleType::Real | SimpleType::Number, v @ AttributeValue::Real(_)) => v,
            (SimpleType::Number, v @ AttributeValue::Integer(_)) => v,
            (SimpleType::Binary, v @ AttributeValue::Binary(_)) => v,
            (SimpleType::Boolean, AttributeValue::Logical(l)) if l != Logical::Unknown => {
                AttributeValue::Logical(l)
            }
            (SimpleType::Logical, v @ AttributeValue::Logical(_)) => v,
            (SimpleType::Boolean | SimpleType::Logical, AttributeValue::Enum(token)) => {
                match Logical::from_token(&token) {
                    Some(Logical::Unknown) if simple == SimpleType::Boolean => {
                        return Err(self.mismatch(attribute, kind, &AttributeValue::Enum(token)))
                    }
                    Some(l) => AttributeValue::Logical(l),
                    None => {
                        return Err(self.mismatch(attribute, kind, &AttributeValue::Enum(token)))
                    }
                }
            }
            (_, other) => return Err(self.mismatch(attribute, kind, &other)),
        };
        Ok(value)
    }

    fn reference(
        &self,
        attribute: &str,
        kind: &AttributeKind,
        target: EntityId,
        expected: &[&str],
    ) -> Result<AttributeValue> {
        let Some(def) = (self.lookup)(target) else {
            return Err(StepError::UnresolvedReference {
                entity: self.entity,
                attribute: attribute.to_string(),
                target,
            });
        };
        if expected
            .iter()
            .any(|name| self.schema.is_subtype_of(def, name))
        {
            Ok(AttributeValue::EntityRef(target))
        } else {
            Err(StepError::type_mismatch(
                self.entity,
                attribute,
                kind.describe(),
                format!("{} {}", def.name, target),
            ))
        }
    }

    fn typed(
        &self,
        attribute: &str,
        kind: &AttributeKind,
        members: &[&str],
        type_name: String,
        mut args: Vec<AttributeValue>,
    ) -> Result<AttributeValue> {
        if !members.iter().any(|m| m.eq_ignore_ascii_case(&type_name)) {
            return Err(self.mismatch(
                attribute,
                kind,
                &AttributeValue::TypedValue(type_name, args),
            ));
        }
        let upper = type_name.to_ascii_uppercase();
        if let (Some(defined), 1) = (self.schema.defined_type(&type_name), args.len()) {
            let defined_kind = AttributeKind::Defined(defined.name, defined.underlying);
            let inner = self.simple(attribute, &defined_kind, defined.underlying, args.remove(0))?;
            return Ok(AttributeValue::TypedValue(upper, vec![inner]));
        }
        Ok(AttributeValue::TypedValue(upper, args))
    }

    fn mismatch(&self, attribute: &str, kind: &AttributeKind, actual: &AttributeValue) -> StepError {
        StepError::type_mismatch(self.entity, attribute, kind.describe(), actual.kind_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ifc4::IFC4;

    fn wall(id: u32) -> Entity {
        Entity::from_type_name(&IFC4, "IFCWALL", EntityId(id)).unwrap()
    }

    fn lookup(id: EntityId) -> Option<&'static EntityDef> {
        match id.0 {
            2 => IFC4.entity("IFCOWNERHISTORY"),
            3 => IFC4.entity("IFCLOCALPLACEMENT"),
            4 => IFC4.entity("IFCCARTESIANPOINT"),
            _ => None,
        }
    }

    fn wall_args() -> Vec<AttributeValue> {
        vec![
            AttributeValue::String("2O2Fr$t4X7Zf8NOew3FLOH".to_string()),
            AttributeValue::EntityRef(EntityId(2)),
            AttributeValue::String("Wall".to_string()),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::EntityRef(EntityId(3)),
            AttributeValue::Null,
            AttributeValue::String("W-1".to_string()),
            AttributeValue::Enum("standard".to_string()),
        ]
    }

    #[test]
    fn test_new_entity_is_empty() {
        let entity = wall(1);
        assert_eq!(entity.attributes().len(), 9);
        assert!(entity.attributes().iter().all(|v| v.is_null()));
        assert_eq!(entity.step_line(), "#1=IFCWALL($,$,$,$,$,$,$,$,$);");
    }

    #[test]
    fn test_abstract_and_unknown_types() {
        assert!(matches!(
            Entity::from_type_name(&IFC4, "IFCROOT", EntityId(1)),
            Err(StepError::AbstractEntity { .. })
        ));
        assert!(matches!(
            Entity::from_type_name(&IFC4, "IFCFOO", EntityId(1)),
            Err(StepError::UnknownEntityType { .. })
        ));
    }

    #[test]
    fn test_read_and_write_wall() {
        let mut entity = wall(10);
        let diagnostics = entity.read_step_arguments(wall_args(), &lookup).unwrap();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(entity.global_id(), Some("2O2Fr$t4X7Zf8NOew3FLOH"));
        assert_eq!(entity.get(8), Some(&AttributeValue::Enum("STANDARD".into())));
        assert_eq!(
            entity.step_line(),
            "#10=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',#2,'Wall',$,$,#3,$,'W-1',.STANDARD.);"
        );
    }

    #[test]
    fn test_argument_count_mismatch() {
        let mut entity = wall(12);
        let mut args = wall_args();
        args.pop();
        let err = entity.read_step_arguments(args, &lookup).unwrap_err();
        assert_eq!(
            err,
            StepError::ArgumentCount {
                entity: EntityId(12),
                type_name: "IFCWALL".to_string(),
                expected: 9,
                actual: 8,
            }
        );
    }

    #[test]
    fn test_bad_values_become_diagnostics() {
        let mut entity = wall(10);
        let mut args = wall_args();
        args[1] = AttributeValue::EntityRef(EntityId(99)); // missing
        args[5] = AttributeValue::EntityRef(EntityId(4)); // point is no placement
        args[8] = AttributeValue::Enum("CURVED".to_string());
        let diagnostics = entity.read_step_arguments(args, &lookup).unwrap();
        assert_eq!(diagnostics.len(), 3);
        assert!(matches!(
            diagnostics[0],
            StepError::UnresolvedReference { target: EntityId(99), .. }
        ));
        assert!(matches!(diagnostics[1], StepError::TypeMismatch { .. }));
        assert!(matches!(diagnostics[2], StepError::InvalidEnumeration { .. }));
        assert!(entity.get(1).unwrap().is_null());
        assert!(entity.get(5).unwrap().is_null());
        assert!(entity.get(8).unwrap().is_null());
    }

    #[test]
    fn test_aggregate_drops_bad_elements() {
        let mut point = Entity::from_type_name(&IFC4, "IFCCARTESIANPOINT", EntityId(4)).unwrap();
        let args = vec![AttributeValue::List(vec![
            AttributeValue::Real(1.0),
            AttributeValue::Integer(2),
            AttributeValue::String("x".to_string()),
        ])];
        let diagnostics = point.read_step_arguments(args, &lookup).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(point.step_line(), "#4=IFCCARTESIANPOINT((1.,2.));");
    }

    #[test]
    fn test_derived_attribute_written_as_star() {
        let mut unit = Entity::from_type_name(&IFC4, "IFCSIUNIT", EntityId(7)).unwrap();
        let args = vec![
            AttributeValue::Derived,
            AttributeValue::Enum("LENGTHUNIT".to_string()),
            AttributeValue::Enum("MILLI".to_string()),
            AttributeValue::Enum("METRE".to_string()),
        ];
        assert!(unit.read_step_arguments(args, &lookup).unwrap().is_empty());
        assert_eq!(unit.step_line(), "#7=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);");
    }

    #[test]
    fn test_select_typed_value() {
        let mut property =
            Entity::from_type_name(&IFC4, "IFCPROPERTYSINGLEVALUE", EntityId(20)).unwrap();
        let args = vec![
            AttributeValue::String("IsExternal".to_string()),
            AttributeValue::Null,
            AttributeValue::TypedValue(
                "IFCBOOLEAN".to_string(),
                vec![AttributeValue::Enum("T".to_string())],
            ),
            AttributeValue::Null,
        ];
        assert!(property.read_step_arguments(args, &lookup).unwrap().is_empty());
        assert_eq!(property.get(2).unwrap().as_bool(), Some(true));
        assert_eq!(
            property.step_line(),
            "#20=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);"
        );
    }

    #[test]
    fn test_set_checked_rejects_wrong_kind() {
        let mut entity = wall(1);
        let err = entity
            .set_checked(2, AttributeValue::Integer(5), &lookup)
            .unwrap_err();
        assert!(matches!(err, StepError::TypeMismatch { .. }));
        assert!(entity.get(2).unwrap().is_null());
        entity
            .set_checked(2, AttributeValue::String("Outer".into()), &lookup)
            .unwrap();
        assert_eq!(entity.get(2).unwrap().as_string(), Some("Outer"));
    }

    #[test]
    fn test_absent_mandatory_attribute_reported() {
        let mut entity = wall(10);
        let mut args = wall_args();
        args[0] = AttributeValue::Null;
        let diagnostics = entity.read_step_arguments(args, &lookup).unwrap();
        assert_eq!(
            diagnostics,
            vec![StepError::MissingAttribute {
                entity: EntityId(10),
                attribute: "GlobalId".to_string(),
            }]
        );
        assert!(entity.get(0).unwrap().is_null());
        assert_eq!(entity.get(2).unwrap().as_string(), Some("Wall"));
    }

    #[test]
    fn test_set_checked_keeps_mandatory_attribute() {
        let mut entity = wall(1);
        entity
            .set_checked(0, AttributeValue::String("2O2Fr$t4X7Zf8NOew3FLOH".into()), &lookup)
            .unwrap();
        assert!(matches!(
            entity.set_checked(0, AttributeValue::Null, &lookup),
            Err(StepError::MissingAttribute { .. })
        ));
        assert_eq!(entity.global_id(), Some("2O2Fr$t4X7Zf8NOew3FLOH"));

        // Optional attributes can still be cleared
        entity.set_checked(2, AttributeValue::String("Outer".into()), &lookup).unwrap();
        entity.set_checked(2, AttributeValue::Null, &lookup).unwrap();
        assert!(entity.get(2).unwrap().is_null());
    }
}
