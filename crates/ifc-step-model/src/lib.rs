// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Step Model - schema tables, entity records and the inverse-link graph
//!
//! This crate holds everything about STEP entity data that does not depend on
//! a file: the data-driven EXPRESS schema, the per-record codec shared by all
//! entity types, and the model that owns entities and keeps forward and
//! inverse references consistent.
//!
//! # Architecture
//!
//! - [`Schema`] / [`EntityDef`] - entity types as static tables; [`IFC4`] is a built-in subset
//! - [`Entity`] - one instance; reads and writes its own STEP record
//! - [`EntityModel`] - owns entities, links inverses, removes and deep-copies
//! - [`EntityResolver`] - entity lookup and reference resolution
//! - [`ModelReader`] / [`ModelWriter`] - file backends (see `ifc-step-parser`)
//!
//! # Example
//!
//! ```ignore
//! use ifc_step_model::{EntityModel, AttributeValue};
//!
//! let mut model = EntityModel::default();
//! let storey = model.create_entity("IFCBUILDINGSTOREY")?;
//! let wall = model.create_entity("IFCWALL")?;
//! let rel = model.create_entity("IFCRELCONTAINEDINSPATIALSTRUCTURE")?;
//! model.set_attribute(rel, "RelatingStructure", storey.into())?;
//! model.set_attribute(rel, "RelatedElements", vec![wall].into())?;
//!
//! assert_eq!(model.entity(storey).unwrap().inverse("ContainsElements"), &[rel]);
//! ```

pub mod copy;
pub mod encoding;
pub mod entity;
pub mod error;
pub mod guid;
pub mod ifc4;
pub mod model;
pub mod reflection;
pub mod resolver;
pub mod schema;
pub mod traits;
pub mod types;

pub use copy::CopyOptions;
pub use entity::{Entity, TypeLookup};
pub use error::*;
pub use ifc4::{ifc4, IFC4};
pub use model::EntityModel;
pub use resolver::*;
pub use schema::{
    AggregateKind, AttributeDef, AttributeKind, DefinedType, EntityDef, InverseDef, InverseLink,
    Schema, SimpleType,
};
pub use traits::*;
pub use types::*;
