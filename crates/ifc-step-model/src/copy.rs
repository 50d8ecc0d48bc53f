// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deep copy of entity sub-graphs

use crate::guid::new_guid;
use crate::model::EntityModel;
use crate::{AttributeValue, EntityId, Result, StepError};
use rustc_hash::{FxHashMap, FxHashSet};

/// Options for [`EntityModel::deep_copy`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyOptions {
    /// Give copied IfcRoot entities a fresh GlobalId
    pub create_new_guid: bool,
    /// Keep references to IfcOwnerHistory instead of copying it
    pub shallow_copy_owner_history: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            create_new_guid: true,
            shallow_copy_owner_history: true,
        }
    }
}

impl CopyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_new_guid(mut self, enabled: bool) -> Self {
        self.create_new_guid = enabled;
        self
    }

    pub fn with_shallow_owner_history(mut self, enabled: bool) -> Self {
        self.shallow_copy_owner_history = enabled;
        self
    }
}

impl EntityModel {
    /// Copy `root` and everything it references into this model
    ///
    /// Copies get fresh ids; an entity reached along several paths is copied
    /// once and the copies share it. Forward references into the copied set are
    /// rewritten to the copies, references to entities left out (owner history
    /// with `shallow_copy_owner_history`) keep pointing at the originals. The
    /// copies are linked into the inverse lists. Returns the id of the copied
    /// root.
    pub fn deep_copy(&mut self, root: EntityId, options: &CopyOptions) -> Result<EntityId> {
        if !self.contains(root) {
            return Err(StepError::EntityNotFound(root));
        }

        // Discover the sub-graph, depth first, root first
        let mut order = Vec::new();
        let mut seen = FxHashSet::default();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(entity) = self.entity(id) else {
                continue;
            };
            if options.shallow_copy_owner_history && id != root && entity.is_a("IfcOwnerHistory") {
                continue;
            }
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            let refs: Vec<EntityId> = entity
                .attributes()
                .iter()
                .flat_map(|value| value.entity_refs())
                .collect();
            stack.extend(refs.into_iter().rev().filter(|r| !seen.contains(r)));
        }

        // Every copy gets an id above the current maximum
        let first = self.reserve_ids(order.len())?.0;
        let mapping: FxHashMap<EntityId, EntityId> = order
            .iter()
            .enumerate()
            .map(|(offset, &old)| (old, EntityId(first + offset as u32)))
            .collect();

        let mut copies = Vec::with_capacity(order.len());
        for &old in &order {
            let Some(original) = self.entity(old) else {
                continue;
            };
            let mut copy = original.clone();
            copy.set_id(mapping[&old]);
            for list in copy.inverse_lists_mut() {
                list.clear();
            }
            for value in copy.attributes_mut() {
                value.remap_refs(&|id| mapping.get(&id).copied());
            }
            if options.create_new_guid && copy.is_a("IfcRoot") {
                if let Some(global_id) = copy.attributes_mut().first_mut() {
                    *global_id = AttributeValue::String(new_guid());
                }
            }
            copies.push(copy);
        }

        let new_ids: Vec<EntityId> = copies.iter().map(|c| c.id()).collect();
        for copy in copies {
            self.insert_entity(copy, false)?;
        }
        for &id in &new_ids {
            self.set_inverse_counterparts(id)?;
        }
        log::debug!("Copied {} entities below {}", new_ids.len(), root);
        Ok(mapping[&root])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entity, IFC4};

    /// Wall with owner history and a placement whose point is shared with a second placement
    fn sample() -> (EntityModel, EntityId, EntityId, EntityId) {
        let mut model = EntityModel::default();
        let history = model.create_entity("IFCOWNERHISTORY").unwrap();
        let point = model.create_entity("IFCCARTESIANPOINT").unwrap();
        model
            .set_attribute(
                point,
                "Coordinates",
                AttributeValue::List(vec![AttributeValue::Real(0.0); 3]),
            )
            .unwrap();
        let axis = model.create_entity("IFCAXIS2PLACEMENT3D").unwrap();
        model.set_attribute(axis, "Location", point.into()).unwrap();
        let parent = model.create_entity("IFCLOCALPLACEMENT").unwrap();
        model
            .set_attribute(parent, "RelativePlacement", axis.into())
            .unwrap();
        let placement = model.create_entity("IFCLOCALPLACEMENT").unwrap();
        model
            .set_attribute(placement, "PlacementRelTo", parent.into())
            .unwrap();
        model
            .set_attribute(placement, "RelativePlacement", axis.into())
            .unwrap();
        let wall = model.create_entity("IFCWALL").unwrap();
        model
            .set_attribute(wall, "GlobalId", AttributeValue::String("1xS3BCk291UvhgP2dvNMQJ".into()))
            .unwrap();
        model.set_attribute(wall, "OwnerHistory", history.into()).unwrap();
        model
            .set_attribute(wall, "ObjectPlacement", placement.into())
            .unwrap();
        (model, wall, history, axis)
    }

    #[test]
    fn test_deep_copy_shares_subgraph_once() {
        let (mut model, wall, history, _) = sample();
        let before = model.len();
        let copy = model.deep_copy(wall, &CopyOptions::default()).unwrap();

        // wall, placement, parent placement, axis, point; history stays shared
        assert_eq!(model.len(), before + 5);
        assert_eq!(model.attribute(copy, "OwnerHistory"), Some(&history.into()));

        let placement = model.attribute(copy, "ObjectPlacement").unwrap().as_entity_ref().unwrap();
        let parent = model
            .attribute(placement, "PlacementRelTo")
            .unwrap()
            .as_entity_ref()
            .unwrap();
        assert_eq!(
            model.attribute(placement, "RelativePlacement"),
            model.attribute(parent, "RelativePlacement")
        );
        assert!(model.check_inverse_consistency().is_empty());
        assert_eq!(model.entity(placement).unwrap().inverse("PlacesObject"), &[copy]);
    }

    #[test]
    fn test_deep_copy_guid_options() {
        let (mut model, wall, history, _) = sample();
        let fresh = model.deep_copy(wall, &CopyOptions::default()).unwrap();
        let fresh_guid = model.entity(fresh).unwrap().global_id().unwrap().to_string();
        assert_ne!(fresh_guid, "1xS3BCk291UvhgP2dvNMQJ");
        assert!(crate::guid::is_valid_guid(&fresh_guid));

        let options = CopyOptions::new()
            .with_new_guid(false)
            .with_shallow_owner_history(false);
        let kept = model.deep_copy(wall, &options).unwrap();
        assert_eq!(
            model.entity(kept).unwrap().global_id(),
            Some("1xS3BCk291UvhgP2dvNMQJ")
        );
        let copied_history = model.attribute(kept, "OwnerHistory").unwrap().as_entity_ref();
        assert!(copied_history.is_some());
        assert_ne!(copied_history, Some(history));
    }

    #[test]
    fn test_deep_copy_missing_root() {
        let mut model = EntityModel::default();
        assert_eq!(
            model.deep_copy(EntityId(3), &CopyOptions::default()),
            Err(StepError::EntityNotFound(EntityId(3)))
        );
    }

    #[test]
    fn test_deep_copy_needs_ids_for_whole_subgraph() {
        let mut model = EntityModel::default();
        let point = Entity::from_type_name(&IFC4, "IFCCARTESIANPOINT", EntityId(u32::MAX - 2)).unwrap();
        let point = model.insert_entity(point, false).unwrap();
        let axis = model.create_entity("IFCAXIS2PLACEMENT3D").unwrap();
        assert_eq!(axis, EntityId(u32::MAX - 1));
        model.set_attribute(axis, "Location", point.into()).unwrap();

        // axis and point need two ids, only one is left
        assert_eq!(
            model.deep_copy(axis, &CopyOptions::default()),
            Err(StepError::IdSpaceExhausted(EntityId(u32::MAX - 1)))
        );
        assert_eq!(model.len(), 2);

        assert_eq!(
            model.deep_copy(point, &CopyOptions::default()),
            Ok(EntityId(u32::MAX))
        );
    }
}
