// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity model: owner of all entities and of the forward/inverse link graph
//!
//! Forward references are plain ids stored in attribute values. Every forward
//! reference through an attribute that some inverse declaration names has
//! exactly one matching entry in the referenced entity's inverse list. The
//! operations here add and remove both sides together.

use crate::entity::Entity;
use crate::ifc4::IFC4;
use crate::schema::{EntityDef, Schema};
use crate::{AttributeValue, EntityId, ModelMetadata, Result, StepError};
use rustc_hash::{FxHashMap, FxHashSet};

/// Container of entities keyed by id
#[derive(Clone, Debug)]
pub struct EntityModel {
    schema: &'static Schema,
    metadata: ModelMetadata,
    entities: FxHashMap<EntityId, Entity>,
    max_id: u32,
}

impl Default for EntityModel {
    fn default() -> Self {
        Self::new(&IFC4)
    }
}

impl EntityModel {
    /// Create an empty model over a schema
    pub fn new(schema: &'static Schema) -> Self {
        let metadata = ModelMetadata {
            schema_version: schema.name().to_string(),
            ..ModelMetadata::default()
        };
        Self {
            schema,
            metadata,
            entities: FxHashMap::default(),
            max_id: 0,
        }
    }

    /// Create an empty model with room for `capacity` entities
    pub fn with_capacity(schema: &'static Schema, capacity: usize) -> Self {
        let mut model = Self::new(schema);
        model.entities.reserve(capacity);
        model
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut ModelMetadata {
        &mut self.metadata
    }

    pub fn set_metadata(&mut self, metadata: ModelMetadata) {
        self.metadata = metadata;
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Entity by id
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Type of the entity with this id
    pub fn type_of(&self, id: EntityId) -> Option<&'static EntityDef> {
        self.entities.get(&id).map(|e| e.def())
    }

    /// All entities in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// All ids in ascending order
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Smallest id above every id used so far
    ///
    /// Fails once `#4294967295` is in use.
    pub fn next_unused_id(&self) -> Result<EntityId> {
        self.reserve_ids(1)
    }

    /// First of `count` consecutive unused ids above every id used so far
    pub(crate) fn reserve_ids(&self, count: usize) -> Result<EntityId> {
        let exhausted = || StepError::IdSpaceExhausted(EntityId(self.max_id));
        let count = u32::try_from(count).map_err(|_| exhausted())?;
        let first = self.max_id.checked_add(1).ok_or_else(exhausted)?;
        if count > 0 {
            first.checked_add(count - 1).ok_or_else(exhausted)?;
        }
        Ok(EntityId(first))
    }

    /// Insert an entity
    ///
    /// The entity must be built against the model's schema. An unassigned
    /// id (0) is replaced by [`Self::next_unused_id`]. An id
    /// already in use is an error unless `overwrite` is set, in which case the
    /// previous entity is unlinked and replaced and the entities referencing
    /// the id are linked to the new one.
    ///
    /// The inserted entity's own forward references are not linked; call
    /// [`Self::set_inverse_counterparts`] once its targets are present.
    pub fn insert_entity(&mut self, mut entity: Entity, overwrite: bool) -> Result<EntityId> {
        if !std::ptr::eq(entity.schema(), self.schema) {
            return Err(StepError::SchemaMismatch {
                entity: entity.id(),
                entity_schema: entity.schema().name().to_string(),
                model_schema: self.schema.name().to_string(),
            });
        }
        if !entity.id().is_assigned() {
            entity.set_id(self.next_unused_id()?);
        }
        let id = entity.id();
        let replaced = self.entities.contains_key(&id);
        if replaced {
            if !overwrite {
                return Err(StepError::DuplicateEntity(id));
            }
            log::debug!("Overwriting entity {}", id);
            self.unlink_from_inverse_counterparts(id);
        }
        self.max_id = self.max_id.max(id.0);
        self.entities.insert(id, entity);

        if replaced {
            let referrers: Vec<EntityId> = self
                .entities
                .values()
                .filter(|e| e.id() != id && e.attributes().iter().any(|v| v.references(id)))
                .map(|e| e.id())
                .collect();
            for referrer in referrers {
                self.set_inverse_counterparts(referrer)?;
            }
        }
        Ok(id)
    }

    /// Create an empty entity of a concrete type with the next unused id
    pub fn create_entity(&mut self, type_name: &str) -> Result<EntityId> {
        let entity = Entity::from_type_name(self.schema, type_name, self.next_unused_id()?)?;
        self.insert_entity(entity, false)
    }

    /// Set a named attribute, checked against its declared kind
    ///
    /// The entity is unlinked before and relinked after the change so the
    /// inverse lists follow the new value.
    pub fn set_attribute(&mut self, id: EntityId, name: &str, value: AttributeValue) -> Result<()> {
        let def = self.type_of(id).ok_or(StepError::EntityNotFound(id))?;
        let index =
            self.schema
                .attribute_index(def, name)
                .ok_or_else(|| StepError::UnknownAttribute {
                    type_name: def.name.to_string(),
                    attribute: name.to_string(),
                })?;

        self.unlink_from_inverse_counterparts(id);
        let mut entity = self
            .entities
            .remove(&id)
            .ok_or(StepError::EntityNotFound(id))?;
        let result = {
            let entities = &self.entities;
            let lookup = |target: EntityId| {
                if target == id {
                    Some(def)
                } else {
                    entities.get(&target).map(|e| e.def())
                }
            };
            entity.set_checked(index, value, &lookup)
        };
        self.entities.insert(id, entity);
        self.set_inverse_counterparts(id)?;
        result
    }

    /// Forward references of `id` that feed inverse lists: (target, inverse name)
    fn inverse_targets(&self, id: EntityId) -> Vec<(EntityId, &'static str)> {
        let Some(entity) = self.entities.get(&id) else {
            return Vec::new();
        };
        let mut targets = Vec::new();
        for link in self.schema.inverse_links(entity.def()) {
            let Some(value) = entity.get(link.attribute_index) else {
                continue;
            };
            for target in value.entity_refs() {
                match self.entities.get(&target) {
                    Some(referenced) if self.schema.is_subtype_of(referenced.def(), link.target.name) => {
                        targets.push((target, link.inverse));
                    }
                    Some(_) => {}
                    None => {
                        log::debug!(
                            "Entity {} references missing entity {}, inverse {} not set",
                            id,
                            target,
                            link.inverse
                        );
                    }
                }
            }
        }
        targets
    }

    fn push_inverse(&mut self, target: EntityId, inverse: &str, source: EntityId) {
        let schema = self.schema;
        if let Some(entity) = self.entities.get_mut(&target) {
            if let Some(index) = schema.inverse_index(entity.def(), inverse) {
                entity.inverse_lists_mut()[index].push(source);
            }
        }
    }

    /// Link the forward references of `id` into the inverse lists they feed
    ///
    /// Existing entries of `id` are removed first, so calling this repeatedly
    /// leaves exactly one inverse entry per forward reference.
    pub fn set_inverse_counterparts(&mut self, id: EntityId) -> Result<()> {
        if !self.entities.contains_key(&id) {
            return Err(StepError::EntityNotFound(id));
        }
        self.unlink_from_inverse_counterparts(id);
        for (target, inverse) in self.inverse_targets(id) {
            self.push_inverse(target, inverse, id);
        }
        Ok(())
    }

    /// Rebuild every inverse list from the forward references
    ///
    /// Returns the number of inverse entries created.
    pub fn resolve_inverse_attributes(&mut self) -> usize {
        for entity in self.entities.values_mut() {
            for list in entity.inverse_lists_mut() {
                list.clear();
            }
        }
        let mut linked = 0;
        for id in self.sorted_ids() {
            for (target, inverse) in self.inverse_targets(id) {
                self.push_inverse(target, inverse, id);
                linked += 1;
            }
        }
        log::debug!("Resolved {} inverse references", linked);
        linked
    }

    /// Remove every occurrence of `id` from the inverse lists of the entities it references
    pub fn unlink_from_inverse_counterparts(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let mut targets: Vec<EntityId> = entity
            .attributes()
            .iter()
            .flat_map(|value| value.entity_refs())
            .collect();
        targets.sort_unstable();
        targets.dedup();
        for target in targets {
            if let Some(referenced) = self.entities.get_mut(&target) {
                for list in referenced.inverse_lists_mut() {
                    list.retain(|&source| source != id);
                }
            }
        }
    }

    /// Same as [`Self::unlink_from_inverse_counterparts`]
    pub fn unlink_self(&mut self, id: EntityId) {
        self.unlink_from_inverse_counterparts(id);
    }

    /// Remove an entity
    ///
    /// The entity is unlinked, references to it held by other entities are
    /// cleared (single references become `$`, list elements are dropped) and
    /// it is dropped from the model.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity> {
        if !self.entities.contains_key(&id) {
            return Err(StepError::EntityNotFound(id));
        }
        self.unlink_from_inverse_counterparts(id);
        for entity in self.entities.values_mut() {
            if entity.id() == id {
                continue;
            }
            let referrer = entity.id();
            for value in entity.attributes_mut() {
                if value.remove_refs(id) {
                    log::debug!("Cleared reference to removed entity {} in {}", id, referrer);
                }
            }
        }
        self.entities
            .remove(&id)
            .ok_or(StepError::EntityNotFound(id))
    }

    /// Compare inverse lists with the forward references
    ///
    /// Reports entries missing from an inverse list as well as inverse entries
    /// without a matching forward reference.
    pub fn check_inverse_consistency(&self) -> Vec<StepError> {
        let mut expected: FxHashMap<(EntityId, &'static str), Vec<EntityId>> = FxHashMap::default();
        for id in self.sorted_ids() {
            for (target, inverse) in self.inverse_targets(id) {
                expected.entry((target, inverse)).or_default().push(id);
            }
        }

        let mut problems = Vec::new();
        for target in self.sorted_ids() {
            let Some(entity) = self.entities.get(&target) else {
                continue;
            };
            for (inverse, actual) in entity.inverses() {
                let mut actual = actual.to_vec();
                actual.sort_unstable();
                let mut wanted = expected.remove(&(target, inverse)).unwrap_or_default();
                wanted.sort_unstable();
                if actual == wanted {
                    continue;
                }
                for source in multiset_difference(&wanted, &actual) {
                    problems.push(StepError::InverseMismatch {
                        entity: target,
                        inverse: inverse.to_string(),
                        message: format!("missing entry for forward reference from {}", source),
                    });
                }
                for source in multiset_difference(&actual, &wanted) {
                    problems.push(StepError::InverseMismatch {
                        entity: target,
                        inverse: inverse.to_string(),
                        message: format!("entry {} has no matching forward reference", source),
                    });
                }
            }
        }
        problems
    }

    /// Collect `root` and every entity reachable from it
    ///
    /// Follows forward references, and inverse lists as well when
    /// `include_inverse` is set. Ids are returned in discovery order with
    /// `root` first.
    pub fn collect_dependent_entities(&self, root: EntityId, include_inverse: bool) -> Vec<EntityId> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(entity) = self.entities.get(&id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            order.push(id);

            let mut next: Vec<EntityId> = entity
                .attributes()
                .iter()
                .flat_map(|value| value.entity_refs())
                .collect();
            if include_inverse {
                for (_, ids) in entity.inverses() {
                    next.extend_from_slice(ids);
                }
            }
            // Reverse so the first reference is visited first
            stack.extend(next.into_iter().rev().filter(|n| !seen.contains(n)));
        }
        order
    }

    /// Remove entities nothing refers to
    ///
    /// The project is kept, as are relationships that still reference
    /// something through their own attributes. Returns the removed ids.
    pub fn remove_unreferenced_entities(&mut self) -> Vec<EntityId> {
        let mut removed = Vec::new();
        loop {
            let doomed = self.unreferenced_entities();
            if doomed.is_empty() {
                break;
            }
            for &id in &doomed {
                if let Err(err) = self.remove_entity(id) {
                    log::warn!("Failed to remove unreferenced entity {}: {}", id, err);
                }
            }
            removed.extend(doomed);
        }
        removed.sort_unstable();
        log::debug!("Removed {} unreferenced entities", removed.len());
        removed
    }

    /// One sweep of [`Self::remove_unreferenced_entities`]
    fn unreferenced_entities(&self) -> Vec<EntityId> {
        let mut referenced: FxHashSet<EntityId> = FxHashSet::default();
        for entity in self.entities.values() {
            for value in entity.attributes() {
                referenced.extend(value.entity_refs().into_iter().filter(|&t| t != entity.id()));
            }
        }

        let schema = self.schema;
        // Attributes after the IfcRoot ones carry the relationship
        let root_arity = schema.entity("IfcRoot").map_or(0, |d| schema.arity(d));
        let mut doomed: Vec<EntityId> = self
            .entities
            .values()
            .filter(|entity| !referenced.contains(&entity.id()))
            .filter(|entity| !entity.is_a("IfcProject"))
            .filter(|entity| {
                if !entity.is_a("IfcRelationship") {
                    return true;
                }
                !entity.attributes().iter().skip(root_arity).any(|value| match value {
                    AttributeValue::EntityRef(_) => true,
                    AttributeValue::List(items) => !items.is_empty(),
                    _ => false,
                })
            })
            .map(|entity| entity.id())
            .collect();
        doomed.sort_unstable();
        doomed
    }

    /// Remove every entity and reset the id counter; metadata is kept
    pub fn clear(&mut self) {
        self.entities.clear();
        self.max_id = 0;
    }
}

/// Elements of `a` not matched by an element of `b`; both sorted
fn multiset_difference(a: &[EntityId], b: &[EntityId]) -> Vec<EntityId> {
    let mut out = Vec::new();
    let mut j = 0;
    for &x in a {
        while j < b.len() && b[j] < x {
            j += 1;
        }
        if j < b.len() && b[j] == x {
            j += 1;
        } else {
            out.push(x);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static OTHER_ENTITIES: &[EntityDef] = &[EntityDef {
        name: "IfcCartesianPoint",
        supertype: None,
        is_abstract: false,
        attributes: &[],
        inverses: &[],
        derived: &[],
    }];

    static OTHER: Lazy<Schema> = Lazy::new(|| Schema::new("IFC4X3", OTHER_ENTITIES, &[]));

    /// Project aggregating a site, a storey containing two walls
    fn sample() -> (EntityModel, [EntityId; 6]) {
        let mut model = EntityModel::default();
        let project = model.create_entity("IFCPROJECT").unwrap();
        let site = model.create_entity("IFCSITE").unwrap();
        let storey = model.create_entity("IFCBUILDINGSTOREY").unwrap();
        let wall_a = model.create_entity("IFCWALL").unwrap();
        let wall_b = model.create_entity("IFCWALL").unwrap();
        let aggregates = model.create_entity("IFCRELAGGREGATES").unwrap();
        let contained = model.create_entity("IFCRELCONTAINEDINSPATIALSTRUCTURE").unwrap();

        model
            .set_attribute(aggregates, "RelatingObject", project.into())
            .unwrap();
        model
            .set_attribute(aggregates, "RelatedObjects", vec![site].into())
            .unwrap();
        model
            .set_attribute(contained, "RelatingStructure", storey.into())
            .unwrap();
        model
            .set_attribute(contained, "RelatedElements", vec![wall_a, wall_b].into())
            .unwrap();
        (model, [project, site, storey, wall_a, wall_b, contained])
    }

    #[test]
    fn test_insert_assigns_and_rejects_duplicates() {
        let mut model = EntityModel::default();
        let wall = Entity::from_type_name(&IFC4, "IFCWALL", EntityId::UNASSIGNED).unwrap();
        assert_eq!(model.insert_entity(wall, false).unwrap(), EntityId(1));

        let explicit = Entity::from_type_name(&IFC4, "IFCSLAB", EntityId(40)).unwrap();
        model.insert_entity(explicit.clone(), false).unwrap();
        assert_eq!(model.next_unused_id(), Ok(EntityId(41)));
        assert_eq!(
            model.insert_entity(explicit.clone(), false),
            Err(StepError::DuplicateEntity(EntityId(40)))
        );
        assert!(model.insert_entity(explicit, true).is_ok());
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_set_attribute_links_inverses() {
        let (model, [project, site, storey, wall_a, wall_b, contained]) = sample();
        assert_eq!(model.entity(project).unwrap().inverse("IsDecomposedBy").len(), 1);
        assert_eq!(model.entity(site).unwrap().inverse("Decomposes").len(), 1);
        assert_eq!(
            model.entity(storey).unwrap().inverse("ContainsElements"),
            &[contained]
        );
        assert_eq!(
            model.entity(wall_a).unwrap().inverse("ContainedInStructure"),
            &[contained]
        );
        assert_eq!(
            model.entity(wall_b).unwrap().inverse("ContainedInStructure"),
            &[contained]
        );
        assert!(model.check_inverse_consistency().is_empty());
    }

    #[test]
    fn test_set_inverse_counterparts_is_idempotent() {
        let (mut model, [_, _, storey, _, _, contained]) = sample();
        model.set_inverse_counterparts(contained).unwrap();
        model.set_inverse_counterparts(contained).unwrap();
        assert_eq!(
            model.entity(storey).unwrap().inverse("ContainsElements"),
            &[contained]
        );
        assert!(model.check_inverse_consistency().is_empty());
    }

    #[test]
    fn test_reassignment_moves_inverse_entry() {
        let (mut model, [_, _, storey, wall_a, wall_b, contained]) = sample();
        model
            .set_attribute(contained, "RelatedElements", vec![wall_b].into())
            .unwrap();
        assert!(model.entity(wall_a).unwrap().inverse("ContainedInStructure").is_empty());
        assert_eq!(
            model.entity(storey).unwrap().inverse("ContainsElements"),
            &[contained]
        );
        assert!(model.check_inverse_consistency().is_empty());
    }

    #[test]
    fn test_set_attribute_errors() {
        let (mut model, [project, _, _, wall_a, _, contained]) = sample();
        assert!(matches!(
            model.set_attribute(wall_a, "Height", AttributeValue::Null),
            Err(StepError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            model.set_attribute(EntityId(999), "Name", AttributeValue::Null),
            Err(StepError::EntityNotFound(_))
        ));
        // Project is no spatial element
        assert!(matches!(
            model.set_attribute(contained, "RelatingStructure", project.into()),
            Err(StepError::TypeMismatch { .. })
        ));
        assert!(model.check_inverse_consistency().is_empty());
    }

    #[test]
    fn test_unlink_self() {
        let (mut model, [_, _, storey, wall_a, _, contained]) = sample();
        model.unlink_self(contained);
        assert!(model.entity(storey).unwrap().inverse("ContainsElements").is_empty());
        assert!(model.entity(wall_a).unwrap().inverse("ContainedInStructure").is_empty());
        assert_eq!(model.check_inverse_consistency().len(), 3);

        assert_eq!(model.resolve_inverse_attributes(), 5);
        assert!(model.check_inverse_consistency().is_empty());
    }

    #[test]
    fn test_remove_entity_clears_references() {
        let (mut model, [_, _, storey, wall_a, wall_b, contained]) = sample();
        model.remove_entity(wall_a).unwrap();
        let rel = model.entity(contained).unwrap();
        assert_eq!(rel.get(4), Some(&AttributeValue::from(vec![wall_b])));
        assert!(model.check_inverse_consistency().is_empty());

        model.remove_entity(contained).unwrap();
        assert!(model.entity(storey).unwrap().inverse("ContainsElements").is_empty());
        assert!(model.entity(wall_b).unwrap().inverse("ContainedInStructure").is_empty());
        assert!(matches!(
            model.remove_entity(contained),
            Err(StepError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_collect_dependent_entities() {
        let (model, [project, site, storey, wall_a, wall_b, contained]) = sample();
        let forward = model.collect_dependent_entities(contained, false);
        assert_eq!(forward, vec![contained, wall_a, wall_b, storey]);

        let with_inverse = model.collect_dependent_entities(site, true);
        assert!(with_inverse.contains(&project));
        assert!(!with_inverse.contains(&storey));
    }

    #[test]
    fn test_remove_unreferenced_entities() {
        let (mut model, [project, site, storey, wall_a, _, contained]) = sample();
        let orphan = model.create_entity("IFCCARTESIANPOINT").unwrap();
        let empty_rel = model.create_entity("IFCRELAGGREGATES").unwrap();

        let removed = model.remove_unreferenced_entities();
        assert_eq!(removed, vec![orphan, empty_rel]);
        for kept in [project, site, storey, wall_a, contained] {
            assert!(model.contains(kept));
        }
    }

    #[test]
    fn test_clear() {
        let (mut model, _) = sample();
        model.clear();
        assert!(model.is_empty());
        assert_eq!(model.next_unused_id(), Ok(EntityId(1)));
    }

    #[test]
    fn test_id_space_exhausted() {
        let mut model = EntityModel::default();
        let last = Entity::from_type_name(&IFC4, "IFCCARTESIANPOINT", EntityId(u32::MAX)).unwrap();
        model.insert_entity(last, false).unwrap();

        let exhausted = StepError::IdSpaceExhausted(EntityId(u32::MAX));
        assert_eq!(model.next_unused_id(), Err(exhausted.clone()));
        assert_eq!(model.create_entity("IFCWALL"), Err(exhausted.clone()));
        let unassigned = Entity::from_type_name(&IFC4, "IFCWALL", EntityId::UNASSIGNED).unwrap();
        assert_eq!(model.insert_entity(unassigned, false), Err(exhausted));
        assert_eq!(model.len(), 1);

        // explicit ids below the maximum still insert
        let explicit = Entity::from_type_name(&IFC4, "IFCWALL", EntityId(7)).unwrap();
        assert_eq!(model.insert_entity(explicit, false), Ok(EntityId(7)));
    }

    #[test]
    fn test_insert_rejects_other_schema() {
        let mut model = EntityModel::default();
        let point = Entity::from_type_name(&OTHER, "IFCCARTESIANPOINT", EntityId(1)).unwrap();
        assert_eq!(
            model.insert_entity(point, false),
            Err(StepError::SchemaMismatch {
                entity: EntityId(1),
                entity_schema: "IFC4X3".to_string(),
                model_schema: "IFC4".to_string(),
            })
        );
        assert!(model.is_empty());

        let mut other = EntityModel::new(&OTHER);
        assert_eq!(other.create_entity("IFCCARTESIANPOINT"), Ok(EntityId(1)));
    }

    #[test]
    fn test_remove_unreferenced_follows_chains() {
        let mut model = EntityModel::default();
        let project = model.create_entity("IFCPROJECT").unwrap();
        let point = model.create_entity("IFCCARTESIANPOINT").unwrap();
        let axis = model.create_entity("IFCAXIS2PLACEMENT3D").unwrap();
        model.set_attribute(axis, "Location", point.into()).unwrap();
        let placement = model.create_entity("IFCLOCALPLACEMENT").unwrap();
        model
            .set_attribute(placement, "RelativePlacement", axis.into())
            .unwrap();

        assert_eq!(
            model.remove_unreferenced_entities(),
            vec![point, axis, placement]
        );
        assert_eq!(model.sorted_ids(), vec![project]);
        assert!(model.remove_unreferenced_entities().is_empty());
    }
}
