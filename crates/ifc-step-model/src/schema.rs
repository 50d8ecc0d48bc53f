// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data-driven EXPRESS schema tables
//!
//! Every entity type is described by one static [`EntityDef`]. A [`Schema`]
//! indexes a table of definitions and precomputes, per entity type, the
//! flattened attribute order used on the wire (inherited attributes first),
//! the inherited inverse declarations and the forward attributes that feed
//! inverse lists on other entities.

use rustc_hash::FxHashMap;
use std::fmt;

/// Primitive EXPRESS types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimpleType {
    String,
    Integer,
    Real,
    Number,
    Boolean,
    Logical,
    Binary,
}

impl SimpleType {
    pub fn name(&self) -> &'static str {
        match self {
            SimpleType::String => "STRING",
            SimpleType::Integer => "INTEGER",
            SimpleType::Real => "REAL",
            SimpleType::Number => "NUMBER",
            SimpleType::Boolean => "BOOLEAN",
            SimpleType::Logical => "LOGICAL",
            SimpleType::Binary => "BINARY",
        }
    }
}

/// LIST or SET aggregate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateKind {
    List,
    Set,
}

/// Declared type of an explicit attribute
#[derive(Debug, PartialEq)]
pub enum AttributeKind {
    /// Plain EXPRESS type
    Simple(SimpleType),
    /// Defined type over a simple type (e.g. IfcLabel = STRING)
    Defined(&'static str, SimpleType),
    /// Enumeration with its closed set of tokens
    Enumeration(&'static str, &'static [&'static str]),
    /// Reference to an entity type (or any subtype)
    Entity(&'static str),
    /// Select type; members are entity names or defined type names
    Select(&'static str, &'static [&'static str]),
    /// LIST OF / SET OF element kind
    Aggregate(AggregateKind, &'static AttributeKind),
}

impl AttributeKind {
    /// Type name used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            AttributeKind::Simple(simple) => simple.name().to_string(),
            AttributeKind::Defined(name, _)
            | AttributeKind::Enumeration(name, _)
            | AttributeKind::Entity(name)
            | AttributeKind::Select(name, _) => (*name).to_string(),
            AttributeKind::Aggregate(AggregateKind::List, element) => {
                format!("LIST OF {}", element.describe())
            }
            AttributeKind::Aggregate(AggregateKind::Set, element) => {
                format!("SET OF {}", element.describe())
            }
        }
    }

    /// Check whether values of this kind can hold entity references
    pub fn may_reference(&self) -> bool {
        match self {
            AttributeKind::Entity(_) | AttributeKind::Select(_, _) => true,
            AttributeKind::Aggregate(_, element) => element.may_reference(),
            _ => false,
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Explicit attribute declaration
#[derive(Debug)]
pub struct AttributeDef {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub optional: bool,
}

/// Inverse attribute declaration: SET OF `source_entity` FOR `source_attribute`
#[derive(Debug)]
pub struct InverseDef {
    pub name: &'static str,
    pub source_entity: &'static str,
    pub source_attribute: &'static str,
}

/// Entity type declaration
#[derive(Debug)]
pub struct EntityDef {
    pub name: &'static str,
    pub supertype: Option<&'static str>,
    pub is_abstract: bool,
    /// Attributes declared on this type only, in declaration order
    pub attributes: &'static [AttributeDef],
    /// Inverses declared on this type only
    pub inverses: &'static [InverseDef],
    /// Inherited attributes redeclared as DERIVE by this type
    pub derived: &'static [&'static str],
}

/// Defined type used inside typed values such as `IFCLABEL('x')`
#[derive(Debug)]
pub struct DefinedType {
    pub name: &'static str,
    pub underlying: SimpleType,
}

/// Forward attribute of a source type that feeds an inverse list
#[derive(Clone, Copy, Debug)]
pub struct InverseLink {
    /// Position of the forward attribute in the source's flattened list
    pub attribute_index: usize,
    /// Entity type declaring the inverse
    pub target: &'static EntityDef,
    /// Name of the inverse attribute on the target
    pub inverse: &'static str,
}

#[derive(Default)]
struct Layout {
    /// Ancestor indices, self first
    ancestors: Vec<usize>,
    attributes: Vec<&'static AttributeDef>,
    derived: Vec<bool>,
    inverses: Vec<&'static InverseDef>,
    links: Vec<InverseLink>,
}

/// Indexed schema table
pub struct Schema {
    name: &'static str,
    entities: &'static [EntityDef],
    defined_types: &'static [DefinedType],
    by_upper: FxHashMap<String, usize>,
    by_name: FxHashMap<&'static str, usize>,
    defined_by_upper: FxHashMap<String, usize>,
    layouts: Vec<Layout>,
    problems: Vec<String>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("defined_types", &self.defined_types.len())
            .finish()
    }
}

impl Schema {
    /// Index a table of entity definitions
    ///
    /// Inconsistent declarations (unknown supertype, inverse naming a missing
    /// attribute) are logged, skipped and kept in [`Schema::problems`].
    pub fn new(
        name: &'static str,
        entities: &'static [EntityDef],
        defined_types: &'static [DefinedType],
    ) -> Self {
        let mut problems = Vec::new();
        let mut by_upper = FxHashMap::default();
        let mut by_name = FxHashMap::default();
        for (index, def) in entities.iter().enumerate() {
            by_upper.insert(def.name.to_ascii_uppercase(), index);
            by_name.insert(def.name, index);
        }
        let defined_by_upper = defined_types
            .iter()
            .enumerate()
            .map(|(index, ty)| (ty.name.to_ascii_uppercase(), index))
            .collect();

        let mut layouts: Vec<Layout> = Vec::with_capacity(entities.len());
        for (index, def) in entities.iter().enumerate() {
            let mut ancestors = vec![index];
            let mut current = def;
            while let Some(parent) = current.supertype {
                match by_name.get(parent) {
                    Some(&parent_index) if !ancestors.contains(&parent_index) => {
                        ancestors.push(parent_index);
                        current = &entities[parent_index];
                    }
                    _ => {
                        problems.push(format!(
                            "{}: unknown or cyclic supertype {}",
                            current.name, parent
                        ));
                        break;
                    }
                }
            }

            let mut layout = Layout {
                ancestors,
                ..Layout::default()
            };
            for &ancestor in layout.ancestors.iter().rev() {
                layout.attributes.extend(entities[ancestor].attributes.iter());
                layout.inverses.extend(entities[ancestor].inverses.iter());
            }
            layout.derived = layout
                .attributes
                .iter()
                .map(|attr| {
                    layout
                        .ancestors
                        .iter()
                        .any(|&a| entities[a].derived.contains(&attr.name))
                })
                .collect();
            layouts.push(layout);
        }

        // Forward attributes feeding inverse lists
        for target in entities {
            for inverse in target.inverses {
                let Some(&source_index) = by_name.get(inverse.source_entity) else {
                    problems.push(format!(
                        "{}.{}: unknown source entity {}",
                        target.name, inverse.name, inverse.source_entity
                    ));
                    continue;
                };
                let mut found = false;
                for layout in layouts.iter_mut() {
                    if !layout.ancestors.contains(&source_index) {
                        continue;
                    }
                    if let Some(attribute_index) = layout
                        .attributes
                        .iter()
                        .position(|attr| attr.name == inverse.source_attribute)
                    {
                        layout.links.push(InverseLink {
                            attribute_index,
                            target,
                            inverse: inverse.name,
                        });
                        found = true;
                    }
                }
                if !found {
                    problems.push(format!(
                        "{}.{}: {} has no attribute {}",
                        target.name, inverse.name, inverse.source_entity, inverse.source_attribute
                    ));
                }
            }
        }

        for problem in &problems {
            log::warn!("Schema {}: {}", name, problem);
        }

        Self {
            name,
            entities,
            defined_types,
            by_upper,
            by_name,
            defined_by_upper,
            layouts,
            problems,
        }
    }

    /// Schema identifier (as written in FILE_SCHEMA)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All entity definitions
    pub fn entities(&self) -> &'static [EntityDef] {
        self.entities
    }

    /// Declaration problems found while indexing
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    /// Look up an entity type by name (case-insensitive)
    pub fn entity(&self, name: &str) -> Option<&'static EntityDef> {
        let entities = self.entities;
        self.by_upper
            .get(name)
            .or_else(|| self.by_upper.get(name.to_ascii_uppercase().as_str()))
            .map(|&index| &entities[index])
    }

    /// Look up a defined type by name (case-insensitive)
    pub fn defined_type(&self, name: &str) -> Option<&'static DefinedType> {
        let defined = self.defined_types;
        self.defined_by_upper
            .get(name)
            .or_else(|| self.defined_by_upper.get(name.to_ascii_uppercase().as_str()))
            .map(|&index| &defined[index])
    }

    fn layout(&self, def: &EntityDef) -> Option<&Layout> {
        self.by_name.get(def.name).map(|&index| &self.layouts[index])
    }

    /// Explicit attributes including inherited ones, root type first
    ///
    /// This is the argument order of a STEP record.
    pub fn all_attributes(&self, def: &EntityDef) -> &[&'static AttributeDef] {
        self.layout(def)
            .map(|layout| layout.attributes.as_slice())
            .unwrap_or(&[])
    }

    /// Per-attribute flags: true where a subtype redeclared the attribute DERIVE
    pub fn derived_mask(&self, def: &EntityDef) -> &[bool] {
        self.layout(def)
            .map(|layout| layout.derived.as_slice())
            .unwrap_or(&[])
    }

    /// Inverse declarations including inherited ones, root type first
    pub fn all_inverses(&self, def: &EntityDef) -> &[&'static InverseDef] {
        self.layout(def)
            .map(|layout| layout.inverses.as_slice())
            .unwrap_or(&[])
    }

    /// Forward attributes of `def` that feed inverse lists of referenced entities
    pub fn inverse_links(&self, def: &EntityDef) -> &[InverseLink] {
        self.layout(def)
            .map(|layout| layout.links.as_slice())
            .unwrap_or(&[])
    }

    /// Number of arguments in a STEP record of this type
    pub fn arity(&self, def: &EntityDef) -> usize {
        self.all_attributes(def).len()
    }

    /// Position of a named attribute in the flattened order
    pub fn attribute_index(&self, def: &EntityDef, name: &str) -> Option<usize> {
        self.all_attributes(def)
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Position of a named inverse in the flattened order
    pub fn inverse_index(&self, def: &EntityDef, name: &str) -> Option<usize> {
        self.all_inverses(def)
            .iter()
            .position(|inverse| inverse.name.eq_ignore_ascii_case(name))
    }

    /// Check whether `def` is `ancestor` or one of its subtypes
    pub fn is_subtype_of(&self, def: &EntityDef, ancestor: &str) -> bool {
        match self.layout(def) {
            Some(layout) => layout
                .ancestors
                .iter()
                .any(|&index| self.entities[index].name.eq_ignore_ascii_case(ancestor)),
            None => def.name.eq_ignore_ascii_case(ancestor),
        }
    }

    /// Supertype chain of `def`, starting with `def` itself
    pub fn ancestors(&self, def: &EntityDef) -> Vec<&'static EntityDef> {
        let entities = self.entities;
        self.layout(def)
            .map(|layout| layout.ancestors.iter().map(|&i| &entities[i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static LIST_OF_PARTS: AttributeKind = AttributeKind::Entity("Part");

    static TEST_ENTITIES: &[EntityDef] = &[
        EntityDef {
            name: "Thing",
            supertype: None,
            is_abstract: true,
            attributes: &[AttributeDef {
                name: "Name",
                kind: AttributeKind::Defined("Label", SimpleType::String),
                optional: true,
            }],
            inverses: &[],
            derived: &[],
        },
        EntityDef {
            name: "Part",
            supertype: Some("Thing"),
            is_abstract: false,
            attributes: &[AttributeDef {
                name: "Weight",
                kind: AttributeKind::Simple(SimpleType::Real),
                optional: false,
            }],
            inverses: &[InverseDef {
                name: "UsedIn",
                source_entity: "Assembly",
                source_attribute: "Parts",
            }],
            derived: &[],
        },
        EntityDef {
            name: "Assembly",
            supertype: Some("Part"),
            is_abstract: false,
            attributes: &[AttributeDef {
                name: "Parts",
                kind: AttributeKind::Aggregate(AggregateKind::Set, &LIST_OF_PARTS),
                optional: false,
            }],
            inverses: &[],
            derived: &["Weight"],
        },
    ];

    fn schema() -> Schema {
        Schema::new("TEST", TEST_ENTITIES, &[])
    }

    #[test]
    fn test_flattened_attributes() {
        let schema = schema();
        let assembly = schema.entity("ASSEMBLY").unwrap();
        let names: Vec<_> = schema
            .all_attributes(assembly)
            .iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Name", "Weight", "Parts"]);
        assert_eq!(schema.arity(assembly), 3);
        assert_eq!(schema.derived_mask(assembly), &[false, true, false]);
        assert_eq!(schema.attribute_index(assembly, "parts"), Some(2));
    }

    #[test]
    fn test_subtypes_and_inverses() {
        let schema = schema();
        let assembly = schema.entity("Assembly").unwrap();
        let part = schema.entity("part").unwrap();
        assert!(schema.is_subtype_of(assembly, "THING"));
        assert!(!schema.is_subtype_of(part, "Assembly"));

        // Assembly inherits the inverse and is also the source of it
        assert_eq!(schema.all_inverses(assembly).len(), 1);
        let links = schema.inverse_links(assembly);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].attribute_index, 2);
        assert_eq!(links[0].target.name, "Part");
        assert!(schema.problems().is_empty());
    }

    #[test]
    fn test_kind_description() {
        let kind = AttributeKind::Aggregate(AggregateKind::Set, &LIST_OF_PARTS);
        assert_eq!(kind.describe(), "SET OF Part");
        assert!(kind.may_reference());
    }
}
