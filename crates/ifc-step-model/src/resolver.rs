// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity resolution trait for looking up and resolving entities

use crate::entity::Entity;
use crate::model::EntityModel;
use crate::{AttributeValue, EntityId};

/// Entity lookup and reference resolution
///
/// Provides access to entities by id and resolves the references found in
/// attribute values. Implementations should provide O(1) lookup by id.
///
/// # Example
///
/// ```ignore
/// use ifc_step_model::{EntityResolver, EntityId};
///
/// fn print_placement(resolver: &dyn EntityResolver, wall_id: EntityId) {
///     if let Some(wall) = resolver.get(wall_id) {
///         if let Some(placement) = wall.attribute("ObjectPlacement").and_then(|a| resolver.resolve_ref(a)) {
///             println!("{} placed by {}", wall.id(), placement.type_name());
///         }
///     }
/// }
/// ```
pub trait EntityResolver: Send + Sync {
    /// Get entity by id
    fn get(&self, id: EntityId) -> Option<&Entity>;

    /// Resolve an entity reference from an attribute value
    fn resolve_ref(&self, attr: &AttributeValue) -> Option<&Entity> {
        match attr {
            AttributeValue::EntityRef(id) => self.get(*id),
            _ => None,
        }
    }

    /// Resolve every entity reference in a list value
    fn resolve_ref_list(&self, attr: &AttributeValue) -> Vec<&Entity> {
        match attr {
            AttributeValue::List(items) => items
                .iter()
                .filter_map(|item| self.resolve_ref(item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// All entities of a type, subtypes included, in ascending id order
    fn entities_by_type(&self, type_name: &str) -> Vec<&Entity>;

    /// Entities whose type is exactly `type_name` (case-insensitive)
    fn find_by_type_name(&self, type_name: &str) -> Vec<&Entity>;

    /// Count entities of a type, subtypes included
    fn count_by_type(&self, type_name: &str) -> usize {
        self.entities_by_type(type_name).len()
    }

    /// All entity ids
    fn all_ids(&self) -> Vec<EntityId>;

    /// Total entity count
    fn entity_count(&self) -> usize {
        self.all_ids().len()
    }
}

/// Extension methods for EntityResolver
pub trait EntityResolverExt: EntityResolver {
    /// Get entity by raw u32 id
    fn get_by_u32(&self, id: u32) -> Option<&Entity> {
        self.get(EntityId(id))
    }

    /// Check if an entity exists
    fn exists(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Get entity or return error
    fn get_or_err(&self, id: EntityId) -> crate::Result<&Entity> {
        self.get(id).ok_or(crate::StepError::EntityNotFound(id))
    }

    /// Resolve reference or return error
    fn resolve_ref_or_err(
        &self,
        entity_id: EntityId,
        attribute: &str,
        attr: &AttributeValue,
    ) -> crate::Result<&Entity> {
        self.resolve_ref(attr)
            .ok_or_else(|| crate::StepError::UnresolvedReference {
                entity: entity_id,
                attribute: attribute.to_string(),
                target: attr.as_entity_ref().unwrap_or_default(),
            })
    }
}

// Blanket implementation for all EntityResolver types
impl<T: EntityResolver + ?Sized> EntityResolverExt for T {}

impl EntityResolver for EntityModel {
    fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entity(id)
    }

    fn entities_by_type(&self, type_name: &str) -> Vec<&Entity> {
        let mut found: Vec<&Entity> = self.iter().filter(|e| e.is_a(type_name)).collect();
        found.sort_unstable_by_key(|e| e.id());
        found
    }

    fn find_by_type_name(&self, type_name: &str) -> Vec<&Entity> {
        let mut found: Vec<&Entity> = self
            .iter()
            .filter(|e| e.type_name().eq_ignore_ascii_case(type_name))
            .collect();
        found.sort_unstable_by_key(|e| e.id());
        found
    }

    fn count_by_type(&self, type_name: &str) -> usize {
        self.iter().filter(|e| e.is_a(type_name)).count()
    }

    fn all_ids(&self) -> Vec<EntityId> {
        self.sorted_ids()
    }

    fn entity_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StepError;

    fn model() -> EntityModel {
        let mut model = EntityModel::default();
        for type_name in ["IFCWALL", "IFCWALLSTANDARDCASE", "IFCSLAB", "IFCPROJECT"] {
            model.create_entity(type_name).unwrap();
        }
        model
    }

    #[test]
    fn test_entities_by_type_includes_subtypes() {
        let model = model();
        let walls: Vec<EntityId> = model.entities_by_type("IfcWall").iter().map(|e| e.id()).collect();
        assert_eq!(walls, vec![EntityId(1), EntityId(2)]);
        assert_eq!(model.find_by_type_name("IFCWALL").len(), 1);
        assert_eq!(model.count_by_type("IFCBUILDINGELEMENT"), 3);
        assert_eq!(model.entity_count(), 4);
    }

    #[test]
    fn test_resolve_helpers() {
        let model = model();
        let reference = AttributeValue::EntityRef(EntityId(3));
        assert_eq!(model.resolve_ref(&reference).unwrap().type_name(), "IfcSlab");
        let list = AttributeValue::from(vec![EntityId(1), EntityId(42), EntityId(4)]);
        assert_eq!(model.resolve_ref_list(&list).len(), 2);

        assert!(model.exists(EntityId(4)));
        assert!(matches!(
            model.get_or_err(EntityId(42)),
            Err(StepError::EntityNotFound(EntityId(42)))
        ));
        assert!(matches!(
            model.resolve_ref_or_err(EntityId(1), "ObjectPlacement", &AttributeValue::EntityRef(EntityId(42))),
            Err(StepError::UnresolvedReference { target: EntityId(42), .. })
        ));
    }
}
