// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in IFC4 schema subset
//!
//! Covers the object/product hierarchy, spatial structure, walls, slabs and
//! openings, the common relationships, groups and structural analysis,
//! owner history and actors, placement, representation, units and property
//! sets. Attribute order follows the IFC4 EXPRESS definitions so real files
//! read with correct arity. Further entity types can be added by extending
//! the tables.

use crate::schema::{
    AggregateKind, AttributeDef, AttributeKind, DefinedType, EntityDef, InverseDef, Schema,
    SimpleType,
};
use once_cell::sync::Lazy;

/// Indexed IFC4 subset
pub static IFC4: Lazy<Schema> = Lazy::new(|| Schema::new("IFC4", ENTITIES, DEFINED_TYPES));

/// Static handle to the built-in schema
pub fn ifc4() -> &'static Schema {
    &IFC4
}

const fn req(name: &'static str, kind: AttributeKind) -> AttributeDef {
    AttributeDef {
        name,
        kind,
        optional: false,
    }
}

const fn opt(name: &'static str, kind: AttributeKind) -> AttributeDef {
    AttributeDef {
        name,
        kind,
        optional: true,
    }
}

const fn inv(
    name: &'static str,
    source_entity: &'static str,
    source_attribute: &'static str,
) -> InverseDef {
    InverseDef {
        name,
        source_entity,
        source_attribute,
    }
}

const fn set_of(element: &'static AttributeKind) -> AttributeKind {
    AttributeKind::Aggregate(AggregateKind::Set, element)
}

const fn list_of(element: &'static AttributeKind) -> AttributeKind {
    AttributeKind::Aggregate(AggregateKind::List, element)
}

const fn entity(name: &'static str) -> AttributeKind {
    AttributeKind::Entity(name)
}

// Defined types
const GLOBALLY_UNIQUE_ID: AttributeKind =
    AttributeKind::Defined("IfcGloballyUniqueId", SimpleType::String);
const LABEL: AttributeKind = AttributeKind::Defined("IfcLabel", SimpleType::String);
const TEXT: AttributeKind = AttributeKind::Defined("IfcText", SimpleType::String);
const IDENTIFIER: AttributeKind = AttributeKind::Defined("IfcIdentifier", SimpleType::String);
const BOOLEAN: AttributeKind = AttributeKind::Defined("IfcBoolean", SimpleType::Boolean);
const REAL: AttributeKind = AttributeKind::Defined("IfcReal", SimpleType::Real);
const LENGTH_MEASURE: AttributeKind =
    AttributeKind::Defined("IfcLengthMeasure", SimpleType::Real);
const RATIO_MEASURE: AttributeKind = AttributeKind::Defined("IfcRatioMeasure", SimpleType::Real);
const TIMESTAMP: AttributeKind = AttributeKind::Defined("IfcTimeStamp", SimpleType::Integer);
const DIMENSION_COUNT: AttributeKind =
    AttributeKind::Defined("IfcDimensionCount", SimpleType::Integer);
const INTEGER: AttributeKind = AttributeKind::Simple(SimpleType::Integer);
const COMPOUND_PLANE_ANGLE: AttributeKind = list_of(&INTEGER);

// Enumerations
const WALL_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcWallTypeEnum",
    &[
        "MOVABLE",
        "PARAPET",
        "PARTITIONING",
        "PLUMBINGWALL",
        "SHEAR",
        "SOLIDWALL",
        "STANDARD",
        "POLYGONAL",
        "ELEMENTEDWALL",
        "USERDEFINED",
        "NOTDEFINED",
    ],
);
const SLAB_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcSlabTypeEnum",
    &[
        "FLOOR",
        "ROOF",
        "LANDING",
        "BASESLAB",
        "USERDEFINED",
        "NOTDEFINED",
    ],
);
const OPENING_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcOpeningElementTypeEnum",
    &["OPENING", "RECESS", "USERDEFINED", "NOTDEFINED"],
);
const COMPOSITION_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcElementCompositionEnum",
    &["COMPLEX", "ELEMENT", "PARTIAL"],
);
const OBJECT_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcObjectTypeEnum",
    &[
        "PRODUCT",
        "PROCESS",
        "CONTROL",
        "RESOURCE",
        "ACTOR",
        "GROUP",
        "PROJECT",
        "NOTDEFINED",
    ],
);
const ANALYSIS_MODEL_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcAnalysisModelTypeEnum",
    &[
        "IN_PLANE_LOADING_2D",
        "OUT_PLANE_LOADING_2D",
        "LOADING_3D",
        "USERDEFINED",
        "NOTDEFINED",
    ],
);
const LOAD_GROUP_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcLoadGroupTypeEnum",
    &[
        "LOAD_GROUP",
        "LOAD_CASE",
        "LOAD_COMBINATION",
        "USERDEFINED",
        "NOTDEFINED",
    ],
);
const ACTION_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcActionTypeEnum",
    &[
        "PERMANENT_G",
        "VARIABLE_Q",
        "EXTRAORDINARY_A",
        "USERDEFINED",
        "NOTDEFINED",
    ],
);
const ACTION_SOURCE_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcActionSourceTypeEnum",
    &[
        "DEAD_LOAD_G",
        "COMPLETION_G1",
        "LIVE_LOAD_Q",
        "SNOW_S",
        "WIND_W",
        "PRESTRESSING_P",
        "SETTLEMENT_U",
        "TEMPERATURE_T",
        "EARTHQUAKE_E",
        "FIRE",
        "IMPULSE",
        "IMPACT",
        "TRANSPORT",
        "ERECTION",
        "PROPPING",
        "SYSTEM_IMPERFECTION",
        "SHRINKAGE",
        "CREEP",
        "LACK_OF_FIT",
        "BUOYANCY",
        "ICE",
        "CURRENT",
        "WAVE",
        "RAIN",
        "BRAKES",
        "USERDEFINED",
        "NOTDEFINED",
    ],
);
const ANALYSIS_THEORY_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcAnalysisTheoryTypeEnum",
    &[
        "FIRST_ORDER_THEORY",
        "SECOND_ORDER_THEORY",
        "THIRD_ORDER_THEORY",
        "FULL_NONLINEAR_THEORY",
        "USERDEFINED",
        "NOTDEFINED",
    ],
);
const STATE: AttributeKind = AttributeKind::Enumeration(
    "IfcStateEnum",
    &[
        "READWRITE",
        "READONLY",
        "LOCKED",
        "READWRITELOCKED",
        "READONLYLOCKED",
    ],
);
const CHANGE_ACTION: AttributeKind = AttributeKind::Enumeration(
    "IfcChangeActionEnum",
    &["NOCHANGE", "MODIFIED", "ADDED", "DELETED", "NOTDEFINED"],
);
const UNIT_TYPE: AttributeKind = AttributeKind::Enumeration(
    "IfcUnitEnum",
    &[
        "ABSORBEDDOSEUNIT",
        "AMOUNTOFSUBSTANCEUNIT",
        "AREAUNIT",
        "DOSEEQUIVALENTUNIT",
        "ELECTRICCAPACITANCEUNIT",
        "ELECTRICCHARGEUNIT",
        "ELECTRICCONDUCTANCEUNIT",
        "ELECTRICCURRENTUNIT",
        "ELECTRICRESISTANCEUNIT",
        "ELECTRICVOLTAGEUNIT",
        "ENERGYUNIT",
        "FORCEUNIT",
        "FREQUENCYUNIT",
        "ILLUMINANCEUNIT",
        "INDUCTANCEUNIT",
        "LENGTHUNIT",
        "LUMINOUSFLUXUNIT",
        "LUMINOUSINTENSITYUNIT",
        "MAGNETICFLUXDENSITYUNIT",
        "MAGNETICFLUXUNIT",
        "MASSUNIT",
        "PLANEANGLEUNIT",
        "POWERUNIT",
        "PRESSUREUNIT",
        "RADIOACTIVITYUNIT",
        "SOLIDANGLEUNIT",
        "THERMODYNAMICTEMPERATUREUNIT",
        "TIMEUNIT",
        "VOLUMEUNIT",
        "USERDEFINED",
    ],
);
const SI_PREFIX: AttributeKind = AttributeKind::Enumeration(
    "IfcSIPrefix",
    &[
        "EXA", "PETA", "TERA", "GIGA", "MEGA", "KILO", "HECTO", "DECA", "DECI", "CENTI", "MILLI",
        "MICRO", "NANO", "PICO", "FEMTO", "ATTO",
    ],
);
const SI_UNIT_NAME: AttributeKind = AttributeKind::Enumeration(
    "IfcSIUnitName",
    &[
        "AMPERE",
        "BECQUEREL",
        "CANDELA",
        "COULOMB",
        "CUBIC_METRE",
        "DEGREE_CELSIUS",
        "FARAD",
        "GRAM",
        "GRAY",
        "HENRY",
        "HERTZ",
        "JOULE",
        "KELVIN",
        "LUMEN",
        "LUX",
        "METRE",
        "MOLE",
        "NEWTON",
        "OHM",
        "PASCAL",
        "RADIAN",
        "SECOND",
        "SIEMENS",
        "SIEVERT",
        "SQUARE_METRE",
        "STERADIAN",
        "TESLA",
        "VOLT",
        "WATT",
        "WEBER",
    ],
);

// Selects
const VALUE: AttributeKind = AttributeKind::Select(
    "IfcValue",
    &[
        "IfcLabel",
        "IfcText",
        "IfcIdentifier",
        "IfcBoolean",
        "IfcLogical",
        "IfcInteger",
        "IfcReal",
        "IfcLengthMeasure",
        "IfcPositiveLengthMeasure",
        "IfcAreaMeasure",
        "IfcVolumeMeasure",
        "IfcRatioMeasure",
        "IfcPositiveRatioMeasure",
        "IfcNormalisedRatioMeasure",
        "IfcPlaneAngleMeasure",
        "IfcCountMeasure",
        "IfcMassMeasure",
        "IfcTimeMeasure",
        "IfcForceMeasure",
        "IfcPressureMeasure",
        "IfcPowerMeasure",
        "IfcThermalTransmittanceMeasure",
        "IfcThermodynamicTemperatureMeasure",
    ],
);
const UNIT: AttributeKind = AttributeKind::Select(
    "IfcUnit",
    &["IfcNamedUnit", "IfcDerivedUnit", "IfcMonetaryUnit"],
);
const AXIS2_PLACEMENT: AttributeKind = AttributeKind::Select(
    "IfcAxis2Placement",
    &["IfcAxis2Placement2D", "IfcAxis2Placement3D"],
);
const PROPERTY_SET_DEFINITION_SELECT: AttributeKind = AttributeKind::Select(
    "IfcPropertySetDefinitionSelect",
    &["IfcPropertySetDefinition"],
);

static DEFINED_TYPES: &[DefinedType] = &[
    DefinedType { name: "IfcGloballyUniqueId", underlying: SimpleType::String },
    DefinedType { name: "IfcLabel", underlying: SimpleType::String },
    DefinedType { name: "IfcText", underlying: SimpleType::String },
    DefinedType { name: "IfcIdentifier", underlying: SimpleType::String },
    DefinedType { name: "IfcBoolean", underlying: SimpleType::Boolean },
    DefinedType { name: "IfcLogical", underlying: SimpleType::Logical },
    DefinedType { name: "IfcInteger", underlying: SimpleType::Integer },
    DefinedType { name: "IfcReal", underlying: SimpleType::Real },
    DefinedType { name: "IfcTimeStamp", underlying: SimpleType::Integer },
    DefinedType { name: "IfcDimensionCount", underlying: SimpleType::Integer },
    DefinedType { name: "IfcCountMeasure", underlying: SimpleType::Number },
    DefinedType { name: "IfcLengthMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcPositiveLengthMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcAreaMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcVolumeMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcRatioMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcPositiveRatioMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcNormalisedRatioMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcPlaneAngleMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcMassMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcTimeMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcForceMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcPressureMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcPowerMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcThermalTransmittanceMeasure", underlying: SimpleType::Real },
    DefinedType { name: "IfcThermodynamicTemperatureMeasure", underlying: SimpleType::Real },
];

static ENTITIES: &[EntityDef] = &[
    // Root and object hierarchy
    EntityDef {
        name: "IfcRoot",
        supertype: None,
        is_abstract: true,
        attributes: &[
            req("GlobalId", GLOBALLY_UNIQUE_ID),
            opt("OwnerHistory", entity("IfcOwnerHistory")),
            opt("Name", LABEL),
            opt("Description", TEXT),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcObjectDefinition",
        supertype: Some("IfcRoot"),
        is_abstract: true,
        attributes: &[],
        inverses: &[
            inv("HasAssignments", "IfcRelAssigns", "RelatedObjects"),
            inv("IsDecomposedBy", "IfcRelAggregates", "RelatingObject"),
            inv("Decomposes", "IfcRelAggregates", "RelatedObjects"),
        ],
        derived: &[],
    },
    EntityDef {
        name: "IfcObject",
        supertype: Some("IfcObjectDefinition"),
        is_abstract: true,
        attributes: &[opt("ObjectType", LABEL)],
        inverses: &[inv(
            "IsDefinedBy",
            "IfcRelDefinesByProperties",
            "RelatedObjects",
        )],
        derived: &[],
    },
    EntityDef {
        name: "IfcProduct",
        supertype: Some("IfcObject"),
        is_abstract: true,
        attributes: &[
            opt("ObjectPlacement", entity("IfcObjectPlacement")),
            opt("Representation", entity("IfcProductRepresentation")),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcElement",
        supertype: Some("IfcProduct"),
        is_abstract: true,
        attributes: &[opt("Tag", IDENTIFIER)],
        inverses: &[
            inv("HasOpenings", "IfcRelVoidsElement", "RelatingBuildingElement"),
            inv(
                "ContainedInStructure",
                "IfcRelContainedInSpatialStructure",
                "RelatedElements",
            ),
        ],
        derived: &[],
    },
    EntityDef {
        name: "IfcBuildingElement",
        supertype: Some("IfcElement"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcWall",
        supertype: Some("IfcBuildingElement"),
        is_abstract: false,
        attributes: &[opt("PredefinedType", WALL_TYPE)],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcWallStandardCase",
        supertype: Some("IfcWall"),
        is_abstract: false,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcSlab",
        supertype: Some("IfcBuildingElement"),
        is_abstract: false,
        attributes: &[opt("PredefinedType", SLAB_TYPE)],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcFeatureElement",
        supertype: Some("IfcElement"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcFeatureElementSubtraction",
        supertype: Some("IfcFeatureElement"),
        is_abstract: true,
        attributes: &[],
        inverses: &[inv(
            "VoidsElements",
            "IfcRelVoidsElement",
            "RelatedOpeningElement",
        )],
        derived: &[],
    },
    EntityDef {
        name: "IfcOpeningElement",
        supertype: Some("IfcFeatureElementSubtraction"),
        is_abstract: false,
        attributes: &[opt("PredefinedType", OPENING_TYPE)],
        inverses: &[],
        derived: &[],
    },
    // Spatial structure
    EntityDef {
        name: "IfcSpatialElement",
        supertype: Some("IfcProduct"),
        is_abstract: true,
        attributes: &[opt("LongName", LABEL)],
        inverses: &[inv(
            "ContainsElements",
            "IfcRelContainedInSpatialStructure",
            "RelatingStructure",
        )],
        derived: &[],
    },
    EntityDef {
        name: "IfcSpatialStructureElement",
        supertype: Some("IfcSpatialElement"),
        is_abstract: true,
        attributes: &[opt("CompositionType", COMPOSITION_TYPE)],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcSite",
        supertype: Some("IfcSpatialStructureElement"),
        is_abstract: false,
        attributes: &[
            opt("RefLatitude", COMPOUND_PLANE_ANGLE),
            opt("RefLongitude", COMPOUND_PLANE_ANGLE),
            opt("RefElevation", LENGTH_MEASURE),
            opt("LandTitleNumber", LABEL),
            opt("SiteAddress", entity("IfcPostalAddress")),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcBuilding",
        supertype: Some("IfcSpatialStructureElement"),
        is_abstract: false,
        attributes: &[
            opt("ElevationOfRefHeight", LENGTH_MEASURE),
            opt("ElevationOfTerrain", LENGTH_MEASURE),
            opt("BuildingAddress", entity("IfcPostalAddress")),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcBuildingStorey",
        supertype: Some("IfcSpatialStructureElement"),
        is_abstract: false,
        attributes: &[opt("Elevation", LENGTH_MEASURE)],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcContext",
        supertype: Some("IfcObjectDefinition"),
        is_abstract: true,
        attributes: &[
            opt("ObjectType", LABEL),
            opt("LongName", LABEL),
            opt("Phase", LABEL),
            opt(
                "RepresentationContexts",
                set_of(&AttributeKind::Entity("IfcRepresentationContext")),
            ),
            opt("UnitsInContext", entity("IfcUnitAssignment")),
        ],
        inverses: &[inv(
            "IsDefinedBy",
            "IfcRelDefinesByProperties",
            "RelatedObjects",
        )],
        derived: &[],
    },
    EntityDef {
        name: "IfcProject",
        supertype: Some("IfcContext"),
        is_abstract: false,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    // Relationships
    EntityDef {
        name: "IfcRelationship",
        supertype: Some("IfcRoot"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelDecomposes",
        supertype: Some("IfcRelationship"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelAggregates",
        supertype: Some("IfcRelDecomposes"),
        is_abstract: false,
        attributes: &[
            req("RelatingObject", entity("IfcObjectDefinition")),
            req("RelatedObjects", set_of(&AttributeKind::Entity("IfcObjectDefinition"))),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelVoidsElement",
        supertype: Some("IfcRelDecomposes"),
        is_abstract: false,
        attributes: &[
            req("RelatingBuildingElement", entity("IfcElement")),
            req(
                "RelatedOpeningElement",
                entity("IfcFeatureElementSubtraction"),
            ),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelConnects",
        supertype: Some("IfcRelationship"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelContainedInSpatialStructure",
        supertype: Some("IfcRelConnects"),
        is_abstract: false,
        attributes: &[
            req("RelatedElements", set_of(&AttributeKind::Entity("IfcProduct"))),
            req("RelatingStructure", entity("IfcSpatialElement")),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelAssigns",
        supertype: Some("IfcRelationship"),
        is_abstract: true,
        attributes: &[
            req("RelatedObjects", set_of(&AttributeKind::Entity("IfcObjectDefinition"))),
            opt("RelatedObjectsType", OBJECT_TYPE),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelAssignsToGroup",
        supertype: Some("IfcRelAssigns"),
        is_abstract: false,
        attributes: &[req("RelatingGroup", entity("IfcGroup"))],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelDefines",
        supertype: Some("IfcRelationship"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRelDefinesByProperties",
        supertype: Some("IfcRelDefines"),
        is_abstract: false,
        attributes: &[
            req("RelatedObjects", set_of(&AttributeKind::Entity("IfcObjectDefinition"))),
            req("RelatingPropertyDefinition", PROPERTY_SET_DEFINITION_SELECT),
        ],
        inverses: &[],
        derived: &[],
    },
    // Groups and structural analysis
    EntityDef {
        name: "IfcGroup",
        supertype: Some("IfcObject"),
        is_abstract: false,
        attributes: &[],
        inverses: &[inv("IsGroupedBy", "IfcRelAssignsToGroup", "RelatingGroup")],
        derived: &[],
    },
    EntityDef {
        name: "IfcSystem",
        supertype: Some("IfcGroup"),
        is_abstract: false,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcStructuralAnalysisModel",
        supertype: Some("IfcSystem"),
        is_abstract: false,
        attributes: &[
            req("PredefinedType", ANALYSIS_MODEL_TYPE),
            opt("OrientationOf2DPlane", entity("IfcAxis2Placement3D")),
            opt("LoadedBy", set_of(&AttributeKind::Entity("IfcStructuralLoadGroup"))),
            opt("HasResults", set_of(&AttributeKind::Entity("IfcStructuralResultGroup"))),
            opt("SharedPlacement", entity("IfcObjectPlacement")),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcStructuralLoadGroup",
        supertype: Some("IfcGroup"),
        is_abstract: false,
        attributes: &[
            req("PredefinedType", LOAD_GROUP_TYPE),
            req("ActionType", ACTION_TYPE),
            req("ActionSource", ACTION_SOURCE_TYPE),
            opt("Coefficient", RATIO_MEASURE),
            opt("Purpose", LABEL),
        ],
        inverses: &[
            inv(
                "SourceOfResultGroup",
                "IfcStructuralResultGroup",
                "ResultForLoadGroup",
            ),
            inv("LoadGroupFor", "IfcStructuralAnalysisModel", "LoadedBy"),
        ],
        derived: &[],
    },
    EntityDef {
        name: "IfcStructuralResultGroup",
        supertype: Some("IfcGroup"),
        is_abstract: false,
        attributes: &[
            req("TheoryType", ANALYSIS_THEORY_TYPE),
            opt("ResultForLoadGroup", entity("IfcStructuralLoadGroup")),
            req("IsLinear", BOOLEAN),
        ],
        inverses: &[inv(
            "ResultGroupFor",
            "IfcStructuralAnalysisModel",
            "HasResults",
        )],
        derived: &[],
    },
    // Owner history and actors
    EntityDef {
        name: "IfcOwnerHistory",
        supertype: None,
        is_abstract: false,
        attributes: &[
            req("OwningUser", entity("IfcPersonAndOrganization")),
            req("OwningApplication", entity("IfcApplication")),
            opt("State", STATE),
            opt("ChangeAction", CHANGE_ACTION),
            opt("LastModifiedDate", TIMESTAMP),
            opt("LastModifyingUser", entity("IfcPersonAndOrganization")),
            opt("LastModifyingApplication", entity("IfcApplication")),
            req("CreationDate", TIMESTAMP),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcPerson",
        supertype: None,
        is_abstract: false,
        attributes: &[
            opt("Identification", IDENTIFIER),
            opt("FamilyName", LABEL),
            opt("GivenName", LABEL),
            opt("MiddleNames", list_of(&LABEL)),
            opt("PrefixTitles", list_of(&LABEL)),
            opt("SuffixTitles", list_of(&LABEL)),
            opt("Roles", list_of(&AttributeKind::Entity("IfcActorRole"))),
            opt("Addresses", list_of(&AttributeKind::Entity("IfcAddress"))),
        ],
        inverses: &[inv("EngagedIn", "IfcPersonAndOrganization", "ThePerson")],
        derived: &[],
    },
    EntityDef {
        name: "IfcOrganization",
        supertype: None,
        is_abstract: false,
        attributes: &[
            opt("Identification", IDENTIFIER),
            req("Name", LABEL),
            opt("Description", TEXT),
            opt("Roles", list_of(&AttributeKind::Entity("IfcActorRole"))),
            opt("Addresses", list_of(&AttributeKind::Entity("IfcAddress"))),
        ],
        inverses: &[inv(
            "Engages",
            "IfcPersonAndOrganization",
            "TheOrganization",
        )],
        derived: &[],
    },
    EntityDef {
        name: "IfcPersonAndOrganization",
        supertype: None,
        is_abstract: false,
        attributes: &[
            req("ThePerson", entity("IfcPerson")),
            req("TheOrganization", entity("IfcOrganization")),
            opt("Roles", list_of(&AttributeKind::Entity("IfcActorRole"))),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcApplication",
        supertype: None,
        is_abstract: false,
        attributes: &[
            req("ApplicationDeveloper", entity("IfcOrganization")),
            req("Version", LABEL),
            req("ApplicationFullName", LABEL),
            req("ApplicationIdentifier", IDENTIFIER),
        ],
        inverses: &[],
        derived: &[],
    },
    // Placement geometry
    EntityDef {
        name: "IfcRepresentationItem",
        supertype: None,
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcGeometricRepresentationItem",
        supertype: Some("IfcRepresentationItem"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcPoint",
        supertype: Some("IfcGeometricRepresentationItem"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcCartesianPoint",
        supertype: Some("IfcPoint"),
        is_abstract: false,
        attributes: &[req("Coordinates", list_of(&LENGTH_MEASURE))],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcDirection",
        supertype: Some("IfcGeometricRepresentationItem"),
        is_abstract: false,
        attributes: &[req("DirectionRatios", list_of(&REAL))],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcPlacement",
        supertype: Some("IfcGeometricRepresentationItem"),
        is_abstract: true,
        attributes: &[req("Location", entity("IfcCartesianPoint"))],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcAxis2Placement3D",
        supertype: Some("IfcPlacement"),
        is_abstract: false,
        attributes: &[
            opt("Axis", entity("IfcDirection")),
            opt("RefDirection", entity("IfcDirection")),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcObjectPlacement",
        supertype: None,
        is_abstract: true,
        attributes: &[],
        inverses: &[
            inv("PlacesObject", "IfcProduct", "ObjectPlacement"),
            inv("ReferencedByPlacements", "IfcLocalPlacement", "PlacementRelTo"),
        ],
        derived: &[],
    },
    EntityDef {
        name: "IfcLocalPlacement",
        supertype: Some("IfcObjectPlacement"),
        is_abstract: false,
        attributes: &[
            opt("PlacementRelTo", entity("IfcObjectPlacement")),
            req("RelativePlacement", AXIS2_PLACEMENT),
        ],
        inverses: &[],
        derived: &[],
    },
    // Representation
    EntityDef {
        name: "IfcRepresentationContext",
        supertype: None,
        is_abstract: true,
        attributes: &[opt("ContextIdentifier", LABEL), opt("ContextType", LABEL)],
        inverses: &[inv(
            "RepresentationsInContext",
            "IfcRepresentation",
            "ContextOfItems",
        )],
        derived: &[],
    },
    EntityDef {
        name: "IfcGeometricRepresentationContext",
        supertype: Some("IfcRepresentationContext"),
        is_abstract: false,
        attributes: &[
            req("CoordinateSpaceDimension", DIMENSION_COUNT),
            opt("Precision", REAL),
            req("WorldCoordinateSystem", AXIS2_PLACEMENT),
            opt("TrueNorth", entity("IfcDirection")),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcRepresentation",
        supertype: None,
        is_abstract: true,
        attributes: &[
            req("ContextOfItems", entity("IfcRepresentationContext")),
            opt("RepresentationIdentifier", LABEL),
            opt("RepresentationType", LABEL),
            req("Items", set_of(&AttributeKind::Entity("IfcRepresentationItem"))),
        ],
        inverses: &[inv(
            "OfProductRepresentation",
            "IfcProductRepresentation",
            "Representations",
        )],
        derived: &[],
    },
    EntityDef {
        name: "IfcShapeModel",
        supertype: Some("IfcRepresentation"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcShapeRepresentation",
        supertype: Some("IfcShapeModel"),
        is_abstract: false,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcProductRepresentation",
        supertype: None,
        is_abstract: true,
        attributes: &[
            opt("Name", LABEL),
            opt("Description", TEXT),
            req("Representations", list_of(&AttributeKind::Entity("IfcRepresentation"))),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcProductDefinitionShape",
        supertype: Some("IfcProductRepresentation"),
        is_abstract: false,
        attributes: &[],
        inverses: &[inv("ShapeOfProduct", "IfcProduct", "Representation")],
        derived: &[],
    },
    // Units
    EntityDef {
        name: "IfcUnitAssignment",
        supertype: None,
        is_abstract: false,
        attributes: &[req("Units", set_of(&UNIT))],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcDimensionalExponents",
        supertype: None,
        is_abstract: false,
        attributes: &[
            req("LengthExponent", INTEGER),
            req("MassExponent", INTEGER),
            req("TimeExponent", INTEGER),
            req("ElectricCurrentExponent", INTEGER),
            req("ThermodynamicTemperatureExponent", INTEGER),
            req("AmountOfSubstanceExponent", INTEGER),
            req("LuminousIntensityExponent", INTEGER),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcNamedUnit",
        supertype: None,
        is_abstract: true,
        attributes: &[
            req("Dimensions", entity("IfcDimensionalExponents")),
            req("UnitType", UNIT_TYPE),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcSIUnit",
        supertype: Some("IfcNamedUnit"),
        is_abstract: false,
        attributes: &[opt("Prefix", SI_PREFIX), req("Name", SI_UNIT_NAME)],
        inverses: &[],
        derived: &["Dimensions"],
    },
    EntityDef {
        name: "IfcConversionBasedUnit",
        supertype: Some("IfcNamedUnit"),
        is_abstract: false,
        attributes: &[
            req("Name", LABEL),
            req("ConversionFactor", entity("IfcMeasureWithUnit")),
        ],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcMeasureWithUnit",
        supertype: None,
        is_abstract: false,
        attributes: &[req("ValueComponent", VALUE), req("UnitComponent", UNIT)],
        inverses: &[],
        derived: &[],
    },
    // Properties
    EntityDef {
        name: "IfcPropertyDefinition",
        supertype: Some("IfcRoot"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcPropertySetDefinition",
        supertype: Some("IfcPropertyDefinition"),
        is_abstract: true,
        attributes: &[],
        inverses: &[inv(
            "DefinesOccurrence",
            "IfcRelDefinesByProperties",
            "RelatingPropertyDefinition",
        )],
        derived: &[],
    },
    EntityDef {
        name: "IfcPropertySet",
        supertype: Some("IfcPropertySetDefinition"),
        is_abstract: false,
        attributes: &[req("HasProperties", set_of(&AttributeKind::Entity("IfcProperty")))],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcPropertyAbstraction",
        supertype: None,
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcProperty",
        supertype: Some("IfcPropertyAbstraction"),
        is_abstract: true,
        attributes: &[req("Name", IDENTIFIER), opt("Description", TEXT)],
        inverses: &[inv("PartOfPset", "IfcPropertySet", "HasProperties")],
        derived: &[],
    },
    EntityDef {
        name: "IfcSimpleProperty",
        supertype: Some("IfcProperty"),
        is_abstract: true,
        attributes: &[],
        inverses: &[],
        derived: &[],
    },
    EntityDef {
        name: "IfcPropertySingleValue",
        supertype: Some("IfcSimpleProperty"),
        is_abstract: false,
        attributes: &[opt("NominalValue", VALUE), opt("Unit", UNIT)],
        inverses: &[],
        derived: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_consistent() {
        assert!(IFC4.problems().is_empty(), "{:?}", IFC4.problems());
        assert_eq!(IFC4.name(), "IFC4");
    }

    #[test]
    fn test_common_arities() {
        let arity = |name: &str| IFC4.arity(IFC4.entity(name).unwrap());
        assert_eq!(arity("IFCPROJECT"), 9);
        assert_eq!(arity("IFCWALL"), 9);
        assert_eq!(arity("IFCSITE"), 14);
        assert_eq!(arity("IFCBUILDINGSTOREY"), 10);
        assert_eq!(arity("IFCRELAGGREGATES"), 6);
        assert_eq!(arity("IFCOWNERHISTORY"), 8);
        assert_eq!(arity("IFCSIUNIT"), 4);
        assert_eq!(arity("IFCSTRUCTURALLOADGROUP"), 10);
        assert_eq!(arity("IFCPROPERTYSINGLEVALUE"), 4);
    }

    #[test]
    fn test_units_in_context_position() {
        let project = IFC4.entity("IfcProject").unwrap();
        assert_eq!(IFC4.attribute_index(project, "UnitsInContext"), Some(8));
    }

    #[test]
    fn test_si_unit_dimensions_derived() {
        let unit = IFC4.entity("IFCSIUNIT").unwrap();
        assert_eq!(IFC4.derived_mask(unit), &[true, false, false, false]);
    }

    #[test]
    fn test_decomposition_links() {
        let aggregates = IFC4.entity("IFCRELAGGREGATES").unwrap();
        let links = IFC4.inverse_links(aggregates);
        let mut names: Vec<_> = links.iter().map(|l| (l.attribute_index, l.inverse)).collect();
        names.sort();
        assert_eq!(names, vec![(4, "IsDecomposedBy"), (5, "Decomposes")]);

        let storey = IFC4.entity("IFCBUILDINGSTOREY").unwrap();
        let inverses: Vec<_> = IFC4.all_inverses(storey).iter().map(|i| i.name).collect();
        assert!(inverses.contains(&"IsDecomposedBy"));
        assert!(inverses.contains(&"ContainsElements"));
    }

    #[test]
    fn test_abstract_flags() {
        assert!(IFC4.entity("IFCROOT").unwrap().is_abstract);
        assert!(!IFC4.entity("IFCWALL").unwrap().is_abstract);
        assert!(IFC4.is_subtype_of(IFC4.entity("IFCWALLSTANDARDCASE").unwrap(), "IfcProduct"));
    }
}
