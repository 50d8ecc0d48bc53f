// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reader and writer abstractions
//!
//! Lets tools load and store models without depending on a concrete file
//! format backend.

use crate::model::EntityModel;
use crate::Result;

/// Progress callback type for reading operations: (phase, percent complete)
pub type ProgressCallback = Box<dyn Fn(&str, f32) + Send>;

/// Entry point for turning file content into an [`EntityModel`]
///
/// # Example
///
/// ```ignore
/// use ifc_step_model::ModelReader;
///
/// let reader: Box<dyn ModelReader> = get_reader();
/// let model = reader.read(content)?;
/// println!("Schema: {}", model.metadata().schema_version);
/// ```
pub trait ModelReader: Send + Sync {
    /// Read content into a model
    fn read(&self, content: &str) -> Result<EntityModel>;

    /// Read content, reporting progress through `on_progress`
    fn read_with_progress(&self, content: &str, on_progress: ProgressCallback)
        -> Result<EntityModel>;
}

/// Serializes a model back to file content
pub trait ModelWriter: Send + Sync {
    /// Write the whole model
    fn write(&self, model: &EntityModel) -> Result<String>;
}
