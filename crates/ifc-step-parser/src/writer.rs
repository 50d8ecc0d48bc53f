// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP file writer

use ifc_step_model::encoding::write_values;
use ifc_step_model::{AttributeValue, EntityModel, ModelMetadata, ModelWriter, Result, Schema};
use std::path::Path;

const DEFAULT_DESCRIPTION: &str = "ViewDefinition [CoordinationView]";
const DEFAULT_IMPLEMENTATION_LEVEL: &str = "2;1";

/// Writes an [`EntityModel`] as an ISO-10303-21 file
///
/// The header comes from the model metadata unless one is set with
/// [`StepWriter::with_header`]; missing fields are filled with defaults.
/// Entities are written in ascending id order.
///
/// # Example
///
/// ```ignore
/// use ifc_step_parser::StepWriter;
///
/// let writer = StepWriter::new().with_timestamp("2024-05-01T12:00:00");
/// writer.write_file(&model, "out.ifc")?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct StepWriter {
    header: Option<ModelMetadata>,
    timestamp: Option<String>,
}

impl StepWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this header instead of the model metadata
    pub fn with_header(mut self, header: ModelMetadata) -> Self {
        self.header = Some(header);
        self
    }

    /// Override the FILE_NAME time stamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Header for a new file: default description and implementation level,
    /// the schema's name as FILE_SCHEMA
    pub fn default_header(file_name: &str, schema: &Schema) -> ModelMetadata {
        ModelMetadata {
            schema_version: schema.name().to_string(),
            file_description: vec![DEFAULT_DESCRIPTION.to_string()],
            implementation_level: Some(DEFAULT_IMPLEMENTATION_LEVEL.to_string()),
            file_name: Some(file_name.to_string()),
            ..ModelMetadata::default()
        }
    }

    /// Write the model to a file
    pub fn write_file(&self, model: &EntityModel, path: impl AsRef<Path>) -> Result<()> {
        let content = self.write(model)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn write_header(&self, out: &mut String, model: &EntityModel) {
        let mut header = self
            .header
            .clone()
            .unwrap_or_else(|| model.metadata().clone());
        if let Some(timestamp) = &self.timestamp {
            header.timestamp = Some(timestamp.clone());
        }
        if header.schema_version.is_empty() {
            header.schema_version = model.schema().name().to_string();
        }
        if header.file_description.is_empty() {
            header.file_description.push(DEFAULT_DESCRIPTION.to_string());
        }

        let text = |value: &Option<String>| {
            AttributeValue::String(value.clone().unwrap_or_default())
        };
        let list = |values: Vec<String>| {
            AttributeValue::List(values.into_iter().map(AttributeValue::String).collect())
        };

        out.push_str("ISO-10303-21;\nHEADER;\n");
        header_record(
            out,
            "FILE_DESCRIPTION",
            &[
                list(header.file_description.clone()),
                AttributeValue::String(
                    header
                        .implementation_level
                        .clone()
                        .unwrap_or_else(|| DEFAULT_IMPLEMENTATION_LEVEL.to_string()),
                ),
            ],
        );
        header_record(
            out,
            "FILE_NAME",
            &[
                text(&header.file_name),
                text(&header.timestamp),
                list(non_empty(&header.author)),
                list(non_empty(&header.organization)),
                text(&header.preprocessor_version),
                text(&header.originating_system),
                text(&header.authorization),
            ],
        );
        header_record(
            out,
            "FILE_SCHEMA",
            &[list(vec![header.schema_version.clone()])],
        );
        out.push_str("ENDSEC;\n");
    }
}

/// Header string lists are written `('')` when empty
fn non_empty(values: &[String]) -> Vec<String> {
    if values.is_empty() {
        vec![String::new()]
    } else {
        values.to_vec()
    }
}

fn header_record(out: &mut String, name: &str, args: &[AttributeValue]) {
    out.push_str(name);
    out.push('(');
    write_values(out, args);
    out.push_str(");\n");
}

impl ModelWriter for StepWriter {
    fn write(&self, model: &EntityModel) -> Result<String> {
        let mut out = String::with_capacity(256 + model.len() * 96);
        self.write_header(&mut out, model);

        out.push_str("DATA;\n");
        for id in model.sorted_ids() {
            if let Some(entity) = model.entity(id) {
                entity.write_step_line(&mut out);
                out.push('\n');
            }
        }
        out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");

        log::debug!("Wrote {} entities", model.len());
        Ok(out)
    }
}
