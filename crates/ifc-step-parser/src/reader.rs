// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP file reader
//!
//! Reading runs in passes over the DATA section:
//!
//! 1. scan every record, create an empty entity for each known type and
//!    tokenize its arguments
//! 2. populate the attributes with [`Entity::read_step_arguments`] against
//!    the id -> type map of all created entities
//! 3. rebuild the inverse lists from the forward references
//!
//! Problems with single records do not abort the read; they are collected in
//! a [`ReadReport`]. Strict mode turns the first of them into an error.

use crate::scanner::{parse_header, EntityScanner};
use crate::tokenizer::parse_entity;
use ifc_step_model::{
    ifc4, AttributeValue, Entity, EntityDef, EntityId, EntityModel, ModelMetadata, ModelReader,
    ProgressCallback, Result, Schema, StepError,
};
use rustc_hash::FxHashMap;
use std::path::Path;

/// Records between two progress reports
const PROGRESS_INTERVAL: usize = 4096;

/// Outcome details of a read
#[derive(Clone, Debug, Default)]
pub struct ReadReport {
    /// Entities in the resulting model
    pub entity_count: usize,
    /// Records left out of the model (unknown, abstract, duplicate or unreadable)
    pub skipped: usize,
    /// Records whose argument list was padded or truncated to the schema arity
    pub padded: usize,
    /// Records of types the schema does not know, by type name
    pub unknown_types: FxHashMap<String, usize>,
    /// Inverse entries created by the inverse pass
    pub inverse_links: usize,
    /// Set when FILE_SCHEMA is missing or names a different schema
    pub schema_warning: Option<String>,
    /// Non-fatal problems, in file order
    pub diagnostics: Vec<StepError>,
}

impl ReadReport {
    /// True when nothing was skipped and no diagnostic was raised
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.diagnostics.is_empty() && self.schema_warning.is_none()
    }
}

/// Configurable STEP reader
///
/// # Example
///
/// ```ignore
/// use ifc_step_parser::StepReader;
///
/// let reader = StepReader::new().with_strict(false).with_padding(true);
/// let (model, report) = reader.read_with_report(&content, None)?;
/// for problem in &report.diagnostics {
///     log::warn!("{}", problem);
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct StepReader {
    schema: &'static Schema,
    strict: bool,
    padding: bool,
    resolve_inverses: bool,
}

impl Default for StepReader {
    fn default() -> Self {
        Self {
            schema: ifc4(),
            strict: false,
            padding: false,
            resolve_inverses: true,
        }
    }
}

impl StepReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on the first record-level problem instead of reporting it
    pub fn with_strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Pad short argument lists with `$` and truncate long ones
    pub fn with_padding(mut self, enabled: bool) -> Self {
        self.padding = enabled;
        self
    }

    /// Build the inverse lists after reading (on by default)
    pub fn with_inverse_resolution(mut self, enabled: bool) -> Self {
        self.resolve_inverses = enabled;
        self
    }

    /// Schema to read against (built-in IFC4 subset by default)
    pub fn with_schema(mut self, schema: &'static Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Read a file from disk
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<(EntityModel, ReadReport)> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("{} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        self.read_with_report(&content, None)
    }

    /// Read content, returning the model together with a [`ReadReport`]
    pub fn read_with_report(
        &self,
        content: &str,
        on_progress: Option<&dyn Fn(&str, f32)>,
    ) -> Result<(EntityModel, ReadReport)> {
        let progress = |phase: &str, percent: f32| {
            if let Some(callback) = on_progress {
                callback(phase, percent);
            }
        };
        let mut report = ReadReport::default();

        progress("Reading header", 0.0);
        if !content.trim_start().starts_with("ISO-10303-21") {
            return Err(StepError::format("Missing ISO-10303-21 signature"));
        }
        let metadata = parse_header(content)?;
        report.schema_warning = self.check_schema(&metadata);

        progress("Scanning entities", 5.0);
        let records = self.scan(content, &mut report, &progress)?;

        progress("Reading attributes", 50.0);
        let types: FxHashMap<EntityId, &'static EntityDef> =
            records.iter().map(|(e, _)| (e.id(), e.def())).collect();
        let lookup = |id: EntityId| types.get(&id).copied();

        let mut model = EntityModel::with_capacity(self.schema, records.len());
        model.set_metadata(metadata);
        let total = records.len().max(1);
        for (index, (mut entity, mut args)) in records.into_iter().enumerate() {
            let arity = self.schema.arity(entity.def());
            if args.len() != arity && self.padding {
                log::warn!(
                    "{}={}: {} arguments, expected {}; padding",
                    entity.id(),
                    entity.def().name.to_ascii_uppercase(),
                    args.len(),
                    arity
                );
                args.resize(arity, AttributeValue::Null);
                report.padded += 1;
            }
            match entity.read_step_arguments(args, &lookup) {
                Ok(problems) => {
                    for problem in problems {
                        self.note(&mut report, problem)?;
                    }
                }
                Err(err) => {
                    log::warn!("{}", err);
                    self.note(&mut report, err)?;
                }
            }
            model.insert_entity(entity, false)?;
            if index % PROGRESS_INTERVAL == 0 {
                progress("Reading attributes", 50.0 + 35.0 * index as f32 / total as f32);
            }
        }

        if self.resolve_inverses {
            progress("Resolving inverse attributes", 85.0);
            report.inverse_links = model.resolve_inverse_attributes();
        }

        report.entity_count = model.len();
        log::debug!(
            "Read {} entities ({} skipped, {} diagnostics)",
            report.entity_count,
            report.skipped,
            report.diagnostics.len()
        );
        progress("Done", 100.0);
        Ok((model, report))
    }

    /// First pass: create entities and tokenize their arguments
    fn scan(
        &self,
        content: &str,
        report: &mut ReadReport,
        progress: &dyn Fn(&str, f32),
    ) -> Result<Vec<(Entity, Vec<AttributeValue>)>> {
        let mut scanner = EntityScanner::new(content);
        let mut records: Vec<(Entity, Vec<AttributeValue>)> = Vec::new();
        let mut seen: FxHashMap<EntityId, ()> = FxHashMap::default();
        let length = content.len().max(1) as f32;

        while let Some(record) = scanner.next_entity() {
            if records.len() % PROGRESS_INTERVAL == 0 {
                progress("Scanning entities", 5.0 + 45.0 * record.end as f32 / length);
            }

            if !record.id.is_assigned() {
                report.skipped += 1;
                self.note(report, StepError::entity_parse(record.id, "Invalid entity id"))?;
                continue;
            }
            if seen.insert(record.id, ()).is_some() {
                report.skipped += 1;
                self.note(report, StepError::DuplicateEntity(record.id))?;
                continue;
            }
            if record.type_name.is_empty() {
                report.skipped += 1;
                self.note(
                    report,
                    StepError::entity_parse(record.id, "Complex entity instances are not supported"),
                )?;
                continue;
            }

            let entity = match Entity::from_type_name(self.schema, record.type_name, record.id) {
                Ok(entity) => entity,
                Err(err) => {
                    report.skipped += 1;
                    if let StepError::UnknownEntityType { .. } = err {
                        let count = report
                            .unknown_types
                            .entry(record.type_name.to_ascii_uppercase())
                            .or_insert(0);
                        *count += 1;
                        if *count > 1 {
                            continue;
                        }
                        log::warn!("Unknown entity type {}", record.type_name);
                    }
                    self.note(report, err)?;
                    continue;
                }
            };

            let args = match parse_entity(record.text).and_then(|tokens| tokens.argument_values()) {
                Ok(args) => args,
                Err(err) => {
                    report.skipped += 1;
                    log::warn!("{}", err);
                    self.note(report, err)?;
                    continue;
                }
            };
            records.push((entity, args));
        }

        report.skipped += scanner.malformed();
        if scanner.malformed() > 0 && self.strict {
            return Err(StepError::format(format!(
                "{} malformed statements in DATA section",
                scanner.malformed()
            )));
        }
        Ok(records)
    }

    fn check_schema(&self, metadata: &ModelMetadata) -> Option<String> {
        let declared = metadata.schema_version.trim();
        let warning = if declared.is_empty() {
            format!("No FILE_SCHEMA declared, reading as {}", self.schema.name())
        } else if !declared.eq_ignore_ascii_case(self.schema.name()) {
            format!(
                "File schema {} differs from {}, reading anyway",
                declared,
                self.schema.name()
            )
        } else {
            return None;
        };
        log::warn!("{}", warning);
        Some(warning)
    }

    fn note(&self, report: &mut ReadReport, problem: StepError) -> Result<()> {
        if self.strict {
            return Err(problem);
        }
        report.diagnostics.push(problem);
        Ok(())
    }
}

impl ModelReader for StepReader {
    fn read(&self, content: &str) -> Result<EntityModel> {
        self.read_with_report(content, None).map(|(model, _)| model)
    }

    fn read_with_progress(
        &self,
        content: &str,
        on_progress: ProgressCallback,
    ) -> Result<EntityModel> {
        self.read_with_report(content, Some(&*on_progress))
            .map(|(model, _)| model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn file(data: &str) -> String {
        format!(
            "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION((''),'2;1');\n\
             FILE_NAME('t.ifc','2024-01-01T00:00:00',(''),(''),'','','');\n\
             FILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n{}\nENDSEC;\nEND-ISO-10303-21;\n",
            data
        )
    }

    const BUILDING: &str = "\
#1=IFCBUILDINGSTOREY('0YvctVUKr0kugbFTf53O9L',$,'Level 1',$,$,$,$,$,.ELEMENT.,0.);
#2=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Wall',$,$,$,$,$,.STANDARD.);
#3=IFCRELCONTAINEDINSPATIALSTRUCTURE('3Agm079vPIYBL4JExVrhD5',$,$,$,(#2),#1);";

    #[test]
    fn test_read_links_inverses() {
        let (model, report) = StepReader::new()
            .read_with_report(&file(BUILDING), None)
            .unwrap();
        assert!(report.is_clean(), "{:?}", report);
        assert_eq!(report.entity_count, 3);
        assert_eq!(report.inverse_links, 2);
        assert_eq!(model.metadata().schema_version, "IFC4");
        assert_eq!(
            model.entity(EntityId(1)).unwrap().inverse("ContainsElements"),
            &[EntityId(3)]
        );
        assert_eq!(
            model.entity(EntityId(2)).unwrap().inverse("ContainedInStructure"),
            &[EntityId(3)]
        );
    }

    #[test]
    fn test_inverse_resolution_disabled() {
        let model = StepReader::new()
            .with_inverse_resolution(false)
            .read(&file(BUILDING))
            .unwrap();
        assert!(model.entity(EntityId(1)).unwrap().inverse("ContainsElements").is_empty());
    }

    #[test]
    fn test_unknown_types_counted_once() {
        let data = "#1=IFCFOO(1);\n#2=IFCFOO(2);\n#3=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,$,$,$,$,$,$,$);";
        let (model, report) = StepReader::new().read_with_report(&file(data), None).unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!(report.unknown_types.get("IFCFOO"), Some(&2));
        assert_eq!(report.skipped, 2);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_argument_count_default_and_padding() {
        let data = "#1=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Wall');";
        let (model, report) = StepReader::new().read_with_report(&file(data), None).unwrap();
        assert!(matches!(
            report.diagnostics[0],
            StepError::ArgumentCount { expected: 9, actual: 3, .. }
        ));
        assert!(model.attribute(EntityId(1), "Name").unwrap().is_null());

        let (model, report) = StepReader::new()
            .with_padding(true)
            .read_with_report(&file(data), None)
            .unwrap();
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.padded, 1);
        assert_eq!(
            model.attribute(EntityId(1), "Name").and_then(|v| v.as_string()),
            Some("Wall")
        );
    }

    #[test]
    fn test_strict_mode_fails_on_first_problem() {
        let data = "#1=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,$,$,$,$,$,$,$);\n\
                    #1=IFCSLAB('3Agm079vPIYBL4JExVrhD5',$,$,$,$,$,$,$,$);";
        let err = StepReader::new()
            .with_strict(true)
            .read(&file(data))
            .unwrap_err();
        assert_eq!(err, StepError::DuplicateEntity(EntityId(1)));

        let (model, report) = StepReader::new().read_with_report(&file(data), None).unwrap();
        assert_eq!(model.entity(EntityId(1)).unwrap().type_name(), "IfcWall");
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_absent_mandatory_attribute() {
        let data = "#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Project',$,$,$,$,$,$);\n\
                    #2=IFCSITE('0YvctVUKr0kugbFTf53O9M',$,'Site',$,$,$,$,$,.ELEMENT.,$,$,$,$,$);\n\
                    #3=IFCRELAGGREGATES('3Agm079vPIYBL4JExVrhD5',$,$,$,$,(#2));";
        let (model, report) = StepReader::new().read_with_report(&file(data), None).unwrap();
        assert_eq!(
            report.diagnostics,
            vec![StepError::MissingAttribute {
                entity: EntityId(3),
                attribute: "RelatingObject".to_string(),
            }]
        );
        assert_eq!(model.len(), 3);
        assert_eq!(
            model.entity(EntityId(2)).unwrap().inverse("Decomposes"),
            &[EntityId(3)]
        );

        let err = StepReader::new()
            .with_strict(true)
            .read(&file(data))
            .unwrap_err();
        assert!(matches!(err, StepError::MissingAttribute { entity: EntityId(3), .. }));
    }

    #[test]
    fn test_largest_id_reads_but_leaves_no_room() {
        let data = "#4294967295=IFCCARTESIANPOINT((0.,0.,0.));";
        let (mut model, report) = StepReader::new().read_with_report(&file(data), None).unwrap();
        assert!(report.is_clean(), "{:?}", report);
        assert!(model.contains(EntityId(u32::MAX)));
        assert_eq!(
            model.next_unused_id(),
            Err(StepError::IdSpaceExhausted(EntityId(u32::MAX)))
        );
        assert!(model.create_entity("IFCCARTESIANPOINT").is_err());
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_dangling_reference_reported() {
        let data = "#3=IFCRELCONTAINEDINSPATIALSTRUCTURE('3Agm079vPIYBL4JExVrhD5',$,$,$,(#2),#1);";
        let (model, report) = StepReader::new().read_with_report(&file(data), None).unwrap();
        assert_eq!(report.diagnostics.len(), 2);
        assert!(report
            .diagnostics
            .iter()
            .all(|d| matches!(d, StepError::UnresolvedReference { .. })));
        assert!(model.attribute(EntityId(3), "RelatingStructure").unwrap().is_null());
    }

    #[test]
    fn test_schema_mismatch_is_warning() {
        let content = file(BUILDING).replace("'IFC4'", "'IFC2X3'");
        let (model, report) = StepReader::new().read_with_report(&content, None).unwrap();
        assert_eq!(model.len(), 3);
        assert!(report.schema_warning.unwrap().contains("IFC2X3"));
    }

    #[test]
    fn test_missing_signature() {
        assert!(matches!(
            StepReader::new().read("DATA;\nENDSEC;"),
            Err(StepError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_progress_reported() {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        StepReader::new()
            .read_with_progress(
                &file(BUILDING),
                Box::new(move |phase, percent| {
                    sink.lock().unwrap().push((phase.to_string(), percent))
                }),
            )
            .unwrap();
        let phases = phases.lock().unwrap();
        assert_eq!(phases.first().unwrap().0, "Reading header");
        assert_eq!(phases.last().unwrap(), &("Done".to_string(), 100.0));
    }
}
