// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit scale extraction from IFC models

use ifc_step_model::{Entity, EntityResolver};

/// Scale from file length units to metres
///
/// Follows `IfcProject.UnitsInContext` to the length unit. Returns 1.0 if no
/// unit information is found.
pub fn extract_unit_scale(resolver: &dyn EntityResolver) -> f64 {
    extract_scale_for(resolver, "LENGTHUNIT").unwrap_or(1.0)
}

/// Scale to SI base units for the project unit of `unit_type` (e.g. "AREAUNIT")
pub fn extract_scale_for(resolver: &dyn EntityResolver, unit_type: &str) -> Option<f64> {
    let projects = resolver.entities_by_type("IfcProject");
    let project = projects.first()?;

    let assignment = resolver.resolve_ref(project.attribute("UnitsInContext")?)?;
    let units = assignment.attribute("Units")?;

    resolver
        .resolve_ref_list(units)
        .into_iter()
        .find_map(|unit| unit_scale(unit, unit_type, resolver))
}

/// Scale of a unit entity (IFCSIUNIT or IFCCONVERSIONBASEDUNIT)
fn unit_scale(unit: &Entity, unit_type: &str, resolver: &dyn EntityResolver) -> Option<f64> {
    let declared = unit.attribute("UnitType")?.as_enum()?;
    if !declared.eq_ignore_ascii_case(unit_type) {
        return None;
    }

    if unit.is_a("IfcSIUnit") {
        si_unit_scale(unit, unit_type)
    } else if unit.is_a("IfcConversionBasedUnit") {
        conversion_unit_scale(unit, unit_type, resolver)
    } else {
        None
    }
}

/// IFCSIUNIT(*, UnitType, Prefix, Name)
///
/// The prefix applies to the base unit, so it is squared for areas and
/// cubed for volumes.
fn si_unit_scale(unit: &Entity, unit_type: &str) -> Option<f64> {
    let prefix = match unit.attribute("Prefix").and_then(|p| p.as_enum()) {
        Some(prefix) => prefix_scale(prefix)?,
        None => 1.0,
    };
    let power = match unit_type {
        "AREAUNIT" => 2,
        "VOLUMEUNIT" => 3,
        _ => 1,
    };
    Some(prefix.powi(power))
}

fn prefix_scale(prefix: &str) -> Option<f64> {
    Some(match prefix {
        "EXA" => 1e18,
        "PETA" => 1e15,
        "TERA" => 1e12,
        "GIGA" => 1e9,
        "MEGA" => 1e6,
        "KILO" => 1e3,
        "HECTO" => 1e2,
        "DECA" => 1e1,
        "DECI" => 1e-1,
        "CENTI" => 1e-2,
        "MILLI" => 1e-3,
        "MICRO" => 1e-6,
        "NANO" => 1e-9,
        "PICO" => 1e-12,
        "FEMTO" => 1e-15,
        "ATTO" => 1e-18,
        _ => return None,
    })
}

/// IFCCONVERSIONBASEDUNIT(Dimensions, UnitType, Name, ConversionFactor)
fn conversion_unit_scale(
    unit: &Entity,
    unit_type: &str,
    resolver: &dyn EntityResolver,
) -> Option<f64> {
    let factor = resolver.resolve_ref(unit.attribute("ConversionFactor")?)?;
    if !factor.is_a("IfcMeasureWithUnit") {
        return None;
    }

    let value = factor.attribute("ValueComponent")?.as_float()?;

    // The unit component is usually an SI unit, possibly prefixed
    let base_scale = factor
        .attribute("UnitComponent")
        .and_then(|u| resolver.resolve_ref(u))
        .and_then(|base| unit_scale(base, unit_type, resolver))
        .unwrap_or(1.0);

    Some(value * base_scale)
}

/// Common length scales for reference
pub mod scales {
    /// Metres to metres (identity)
    pub const METRE: f64 = 1.0;
    /// Millimetres to metres
    pub const MILLIMETRE: f64 = 0.001;
    /// Centimetres to metres
    pub const CENTIMETRE: f64 = 0.01;
    /// Inches to metres
    pub const INCH: f64 = 0.0254;
    /// Feet to metres
    pub const FOOT: f64 = 0.3048;
}
