// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Step Parser - STEP (ISO 10303-21) reader and writer
//!
//! This crate reads and writes IFC files into the [`EntityModel`] defined in
//! `ifc-step-model`, implementing its [`ModelReader`] and [`ModelWriter`]
//! traits.
//!
//! # Features
//!
//! - **Fast tokenization** using `nom` combinators
//! - **SIMD-accelerated scanning** using `memchr`
//! - **Schema-checked attributes** with non-fatal diagnostics in a [`ReadReport`]
//! - **Inverse lists** rebuilt after reading
//! - **Progress reporting** for large files
//!
//! # Example
//!
//! ```ignore
//! use ifc_step_parser::{StepReader, StepWriter};
//! use ifc_step_model::{EntityResolver, ModelWriter};
//!
//! let (model, report) = StepReader::new().read_with_report(ifc_content, None)?;
//! println!("{} walls, {} diagnostics", model.count_by_type("IFCWALL"), report.diagnostics.len());
//!
//! let text = StepWriter::new().write(&model)?;
//! ```

pub mod export;
mod reader;
mod scanner;
mod tokenizer;
pub mod units;
mod writer;

pub use export::{entity_to_json, model_to_json, model_to_json_string};
pub use reader::{ReadReport, StepReader};
pub use scanner::{parse_header, EntityIndex, EntityScanner, RawRecord};
pub use tokenizer::{parse_entity, parse_header_record, RecordTokens, Token};
pub use units::extract_unit_scale;
pub use writer::StepWriter;

use ifc_step_model::{EntityModel, ModelReader, ModelWriter, Result};

/// Quick read with default settings
pub fn read(content: &str) -> Result<EntityModel> {
    StepReader::new().read(content)
}

/// Read with progress reporting
pub fn read_with_progress(
    content: &str,
    on_progress: impl Fn(&str, f32) + Send + 'static,
) -> Result<EntityModel> {
    StepReader::new().read_with_progress(content, Box::new(on_progress))
}

/// Quick write with default settings
pub fn write(model: &EntityModel) -> Result<String> {
    StepWriter::new().write(model)
}
