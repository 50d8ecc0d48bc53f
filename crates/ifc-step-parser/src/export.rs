// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON export of entities and models
//!
//! Attribute names come from the schema, so every entity type is exported
//! the same way: id, type, attributes in declaration order and the inverse
//! lists that are not empty.

use ifc_step_model::{AttributeValue, EntityId, EntityModel, ModelMetadata, Result, StepError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NamedAttribute<'a> {
    pub name: &'static str,
    pub value: &'a AttributeValue,
}

#[derive(Debug, Serialize)]
pub struct InverseRecord {
    pub name: &'static str,
    pub entities: Vec<EntityId>,
}

/// One exported entity
#[derive(Debug, Serialize)]
pub struct EntityRecord<'a> {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub attributes: Vec<NamedAttribute<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inverses: Vec<InverseRecord>,
}

/// A whole exported model, entities in ascending id order
#[derive(Debug, Serialize)]
pub struct ModelRecord<'a> {
    pub schema: &'static str,
    pub metadata: &'a ModelMetadata,
    pub entities: Vec<EntityRecord<'a>>,
}

/// Borrowing view of one entity, ready to serialize
pub fn entity_record(model: &EntityModel, id: EntityId) -> Result<EntityRecord<'_>> {
    let entity = model.entity(id).ok_or(StepError::EntityNotFound(id))?;
    let inverses = model
        .attributes_inverse(id)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, entities)| InverseRecord { name, entities })
        .collect();
    Ok(EntityRecord {
        id,
        type_name: entity.type_name(),
        attributes: entity
            .named_attributes()
            .into_iter()
            .map(|(name, value)| NamedAttribute { name, value })
            .collect(),
        inverses,
    })
}

/// Borrowing view of the whole model
pub fn model_record(model: &EntityModel) -> Result<ModelRecord<'_>> {
    let entities = model
        .sorted_ids()
        .into_iter()
        .map(|id| entity_record(model, id))
        .collect::<Result<Vec<_>>>()?;
    Ok(ModelRecord {
        schema: model.schema().name(),
        metadata: model.metadata(),
        entities,
    })
}

/// Export one entity as a JSON value
pub fn entity_to_json(model: &EntityModel, id: EntityId) -> Result<serde_json::Value> {
    serde_json::to_value(entity_record(model, id)?).map_err(|e| StepError::other(e.to_string()))
}

/// Export the model as a JSON value
pub fn model_to_json(model: &EntityModel) -> Result<serde_json::Value> {
    serde_json::to_value(model_record(model)?).map_err(|e| StepError::other(e.to_string()))
}

/// Export the model as JSON text
pub fn model_to_json_string(model: &EntityModel, pretty: bool) -> Result<String> {
    let record = model_record(model)?;
    let text = if pretty {
        serde_json::to_string_pretty(&record)
    } else {
        serde_json::to_string(&record)
    };
    text.map_err(|e| StepError::other(e.to_string()))
}
