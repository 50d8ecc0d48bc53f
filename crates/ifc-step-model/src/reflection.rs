// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute reflection
//!
//! Name-based access to explicit and inverse attributes, for tooling that
//! walks entities without knowing their types.

use crate::entity::Entity;
use crate::model::EntityModel;
use crate::{AttributeValue, EntityId};

impl Entity {
    /// Explicit attributes as `(name, value)` pairs in wire order
    pub fn named_attributes(&self) -> Vec<(&'static str, &AttributeValue)> {
        self.schema()
            .all_attributes(self.def())
            .iter()
            .map(|attr| attr.name)
            .zip(self.attributes().iter())
            .collect()
    }

    /// Attribute value by name (case-insensitive)
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attribute_index(name).and_then(|index| self.get(index))
    }

    /// Position of a named attribute
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.schema().attribute_index(self.def(), name)
    }
}

impl EntityModel {
    /// Explicit attributes of an entity, including inherited ones
    pub fn attributes(&self, id: EntityId) -> Option<Vec<(&'static str, &AttributeValue)>> {
        self.entity(id).map(|entity| entity.named_attributes())
    }

    /// Non-empty inverse attributes of an entity
    ///
    /// Ids of entities no longer in the model are skipped.
    pub fn attributes_inverse(&self, id: EntityId) -> Option<Vec<(&'static str, Vec<EntityId>)>> {
        let entity = self.entity(id)?;
        Some(
            entity
                .inverses()
                .filter_map(|(name, ids)| {
                    let live: Vec<EntityId> =
                        ids.iter().copied().filter(|&i| self.contains(i)).collect();
                    (!live.is_empty()).then_some((name, live))
                })
                .collect(),
        )
    }

    /// One attribute of an entity by name
    pub fn attribute(&self, id: EntityId, name: &str) -> Option<&AttributeValue> {
        self.entity(id).and_then(|entity| entity.attribute(name))
    }

    /// Position of a named attribute for the entity's type
    pub fn attribute_index(&self, id: EntityId, name: &str) -> Option<usize> {
        self.entity(id).and_then(|entity| entity.attribute_index(name))
    }
}
