// crates/iec61850-scl/src/templates.rs

//! Typed data type templates and the registry that looks them up by id.
//!
//! The registry is built once from `<DataTypeTemplates>` and is immutable
//! afterwards; usage flags live in a separate [`UsageTracker`](crate::UsageTracker).

use crate::error::SclError;
use crate::issues::IssueLog;
use crate::model::{self, parse_bool, parse_int};
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::{debug, warn};

// --- Attribute value types ---

/// Basic type of a data attribute. The discriminant is the ordinal written to
/// the static model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum AttributeType {
    Boolean = 0,
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Int64 = 4,
    Int128 = 5,
    Int8U = 6,
    Int16U = 7,
    Int24U = 8,
    Int32U = 9,
    Float32 = 10,
    Float64 = 11,
    Enumerated = 12,
    OctetString64 = 13,
    OctetString6 = 14,
    OctetString8 = 15,
    VisibleString32 = 16,
    VisibleString64 = 17,
    VisibleString65 = 18,
    VisibleString129 = 19,
    VisibleString255 = 20,
    UnicodeString255 = 21,
    Timestamp = 22,
    Quality = 23,
    Check = 24,
    CodedEnum = 25,
    GenericBitstring = 26,
    Constructed = 27,
    EntryTime = 28,
    PhyComAddr = 29,
    Currency = 30,
    ObjectReference = 31,
    Other = -1,
}

impl AttributeType {
    /// Maps an SCL `bType` string. Unknown basic types map to `Other`.
    pub fn from_btype(b_type: &str) -> Self {
        match b_type {
            "BOOLEAN" => Self::Boolean,
            "INT8" => Self::Int8,
            "INT16" => Self::Int16,
            "INT32" => Self::Int32,
            "INT64" => Self::Int64,
            "INT128" => Self::Int128,
            "INT8U" => Self::Int8U,
            "INT16U" => Self::Int16U,
            "INT24U" => Self::Int24U,
            "INT32U" => Self::Int32U,
            "FLOAT32" => Self::Float32,
            "FLOAT64" => Self::Float64,
            "Enum" => Self::Enumerated,
            "Dbpos" | "Tcmd" => Self::CodedEnum,
            "Check" => Self::Check,
            "Octet64" => Self::OctetString64,
            "Quality" => Self::Quality,
            "Timestamp" => Self::Timestamp,
            "VisString32" => Self::VisibleString32,
            "VisString64" => Self::VisibleString64,
            "VisString65" => Self::VisibleString65,
            "VisString129" => Self::VisibleString129,
            "VisString255" => Self::VisibleString255,
            "ObjRef" => Self::ObjectReference,
            "Unicode255" => Self::UnicodeString255,
            "OptFlds" | "TrgOps" => Self::GenericBitstring,
            "EntryID" => Self::OctetString8,
            "EntryTime" => Self::EntryTime,
            "PhyComAddr" => Self::PhyComAddr,
            "Currency" => Self::Currency,
            "Struct" => Self::Constructed,
            _ => Self::Other,
        }
    }

    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Upper-case name used in diagnostics, e.g. `VISIBLE_STRING_32`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Int128 => "INT128",
            Self::Int8U => "INT8U",
            Self::Int16U => "INT16U",
            Self::Int24U => "INT24U",
            Self::Int32U => "INT32U",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Enumerated => "ENUMERATED",
            Self::OctetString64 => "OCTET_STRING_64",
            Self::OctetString6 => "OCTET_STRING_6",
            Self::OctetString8 => "OCTET_STRING_8",
            Self::VisibleString32 => "VISIBLE_STRING_32",
            Self::VisibleString64 => "VISIBLE_STRING_64",
            Self::VisibleString65 => "VISIBLE_STRING_65",
            Self::VisibleString129 => "VISIBLE_STRING_129",
            Self::VisibleString255 => "VISIBLE_STRING_255",
            Self::UnicodeString255 => "UNICODE_STRING_255",
            Self::Timestamp => "TIMESTAMP",
            Self::Quality => "QUALITY",
            Self::Check => "CHECK",
            Self::CodedEnum => "CODEDENUM",
            Self::GenericBitstring => "GENERIC_BITSTRING",
            Self::Constructed => "CONSTRUCTED",
            Self::EntryTime => "ENTRY_TIME",
            Self::PhyComAddr => "PHYCOMADDR",
            Self::Currency => "CURRENCY",
            Self::ObjectReference => "OBJECT_REFERENCE",
            Self::Other => "OTHER",
        }
    }
}

/// Functional constraint of a data attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum FunctionalConstraint {
    ST = 0,
    MX = 1,
    SP = 2,
    SV = 3,
    CF = 4,
    DC = 5,
    SG = 6,
    SE = 7,
    SR = 8,
    OR = 9,
    BL = 10,
    EX = 11,
    CO = 12,
    US = 13,
    MS = 14,
    RP = 15,
    BR = 16,
    LG = 17,
    ALL = 99,
    NONE = -1,
}

impl FunctionalConstraint {
    /// Parses an `fc` attribute. `None` for strings that are not a known constraint.
    pub fn parse(fc: &str) -> Option<Self> {
        let fc = match fc {
            "ST" => Self::ST,
            "MX" => Self::MX,
            "SP" => Self::SP,
            "SV" => Self::SV,
            "CF" => Self::CF,
            "DC" => Self::DC,
            "SG" => Self::SG,
            "SE" => Self::SE,
            "SR" => Self::SR,
            "OR" => Self::OR,
            "BL" => Self::BL,
            "EX" => Self::EX,
            "CO" => Self::CO,
            "US" => Self::US,
            "MS" => Self::MS,
            "RP" => Self::RP,
            "BR" => Self::BR,
            "LG" => Self::LG,
            "ALL" => Self::ALL,
            "NONE" => Self::NONE,
            _ => return None,
        };
        Some(fc)
    }

    pub fn ordinal(self) -> i32 {
        self as i32
    }
}

/// Trigger conditions declared on a DA/BDA definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerOptions {
    pub dchg: bool,
    pub qchg: bool,
    pub dupd: bool,
    pub period: bool,
    pub gi: bool,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            dchg: false,
            qchg: false,
            dupd: false,
            period: false,
            gi: true,
        }
    }
}

impl TriggerOptions {
    pub const DCHG: u32 = 1;
    pub const QCHG: u32 = 2;
    pub const DUPD: u32 = 4;
    pub const PERIOD: u32 = 8;
    pub const GI: u32 = 16;

    /// Bit mask as used by the static model (dchg=1 qchg=2 dupd=4 period=8 gi=16).
    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.dchg {
            bits |= Self::DCHG;
        }
        if self.qchg {
            bits |= Self::QCHG;
        }
        if self.dupd {
            bits |= Self::DUPD;
        }
        if self.period {
            bits |= Self::PERIOD;
        }
        if self.gi {
            bits |= Self::GI;
        }
        bits
    }
}

// --- Template definitions ---

/// A `DO` entry of an LNodeType or an `SDO` entry of a DOType.
#[derive(Debug, Clone, PartialEq)]
pub struct DataObjectDef {
    pub name: String,
    pub type_id: String,
    pub count: u32,
    pub transient: bool,
}

/// A `DA` entry of a DOType or a `BDA` entry of a DAType.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAttributeDef {
    pub name: String,
    pub fc: FunctionalConstraint,
    pub attribute_type: AttributeType,
    /// DAType id for CONSTRUCTED, EnumType id for ENUMERATED.
    pub type_id: Option<String>,
    pub count: u32,
    pub trigger_options: TriggerOptions,
    pub s_addr: Option<String>,
    /// Default values declared with `<Val>` on the definition.
    pub values: Vec<String>,
}

impl DataAttributeDef {
    /// First declared default value.
    pub fn default_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LNodeType {
    pub id: String,
    pub ln_class: String,
    pub data_objects: Vec<DataObjectDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DOType {
    pub id: String,
    pub cdc: String,
    pub sub_data_objects: Vec<DataObjectDef>,
    pub data_attributes: Vec<DataAttributeDef>,
}

impl DOType {
    pub fn data_attribute(&self, name: &str) -> Option<&DataAttributeDef> {
        self.data_attributes.iter().find(|da| da.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DAType {
    pub id: String,
    pub sub_attributes: Vec<DataAttributeDef>,
}

impl DAType {
    pub fn sub_attribute(&self, name: &str) -> Option<&DataAttributeDef> {
        self.sub_attributes.iter().find(|bda| bda.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVal {
    pub ord: i32,
    pub symbolic_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub id: String,
    pub values: Vec<EnumVal>,
}

impl EnumType {
    pub fn ord_of(&self, symbolic_name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|v| v.symbolic_name == symbolic_name)
            .map(|v| v.ord)
    }
}

/// The four template families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateKind {
    LNodeType,
    DOType,
    DAType,
    EnumType,
}

// --- Registry ---

/// Lookup of all templates of one document, keyed by id.
#[derive(Debug, Default, Clone)]
pub struct TypeTemplateRegistry {
    lnode_types: BTreeMap<String, LNodeType>,
    do_types: BTreeMap<String, DOType>,
    da_types: BTreeMap<String, DAType>,
    enum_types: BTreeMap<String, EnumType>,
}

impl TypeTemplateRegistry {
    pub fn get_lnode_type(&self, id: &str) -> Option<&LNodeType> {
        self.lnode_types.get(id)
    }

    pub fn get_do_type(&self, id: &str) -> Option<&DOType> {
        self.do_types.get(id)
    }

    pub fn get_da_type(&self, id: &str) -> Option<&DAType> {
        self.da_types.get(id)
    }

    pub fn get_enum_type(&self, id: &str) -> Option<&EnumType> {
        self.enum_types.get(id)
    }

    pub fn contains(&self, kind: TemplateKind, id: &str) -> bool {
        match kind {
            TemplateKind::LNodeType => self.lnode_types.contains_key(id),
            TemplateKind::DOType => self.do_types.contains_key(id),
            TemplateKind::DAType => self.da_types.contains_key(id),
            TemplateKind::EnumType => self.enum_types.contains_key(id),
        }
    }

    /// Every template id, grouped by kind, in id order.
    pub fn ids(&self) -> impl Iterator<Item = (TemplateKind, &str)> {
        let ln = self.lnode_types.keys().map(|k| (TemplateKind::LNodeType, k.as_str()));
        let dot = self.do_types.keys().map(|k| (TemplateKind::DOType, k.as_str()));
        let dat = self.da_types.keys().map(|k| (TemplateKind::DAType, k.as_str()));
        let en = self.enum_types.keys().map(|k| (TemplateKind::EnumType, k.as_str()));
        ln.chain(dot).chain(dat).chain(en)
    }

    pub fn insert_lnode_type(&mut self, t: LNodeType) {
        insert_first(&mut self.lnode_types, t.id.clone(), t, "LNodeType");
    }

    pub fn insert_do_type(&mut self, t: DOType) {
        insert_first(&mut self.do_types, t.id.clone(), t, "DOType");
    }

    pub fn insert_da_type(&mut self, t: DAType) {
        insert_first(&mut self.da_types, t.id.clone(), t, "DAType");
    }

    pub fn insert_enum_type(&mut self, t: EnumType) {
        insert_first(&mut self.enum_types, t.id.clone(), t, "EnumType");
    }

    /// Builds the registry from the raw `<DataTypeTemplates>` section.
    ///
    /// A template with a malformed child is left out and reported as an ERROR.
    pub(crate) fn from_model(raw: Option<&model::DataTypeTemplates>, issues: &mut IssueLog) -> Self {
        let mut registry = Self::default();
        let Some(raw) = raw else {
            debug!("[SCL] Document has no DataTypeTemplates section");
            return registry;
        };

        for t in &raw.lnode_type {
            match convert_lnode_type(t) {
                Ok(t) => registry.insert_lnode_type(t),
                Err(e) => report_structural(issues, e),
            }
        }
        for t in &raw.do_type {
            match convert_do_type(t) {
                Ok(t) => registry.insert_do_type(t),
                Err(e) => report_structural(issues, e),
            }
        }
        for t in &raw.da_type {
            match convert_da_type(t) {
                Ok(t) => registry.insert_da_type(t),
                Err(e) => report_structural(issues, e),
            }
        }
        for t in &raw.enum_type {
            match convert_enum_type(t) {
                Ok(t) => registry.insert_enum_type(t),
                Err(e) => report_structural(issues, e),
            }
        }

        debug!(
            "[SCL] Registered {} LNodeTypes, {} DOTypes, {} DATypes, {} EnumTypes",
            registry.lnode_types.len(),
            registry.do_types.len(),
            registry.da_types.len(),
            registry.enum_types.len()
        );
        registry
    }
}

fn insert_first<T>(map: &mut BTreeMap<String, T>, id: String, t: T, kind: &str) {
    if map.contains_key(&id) {
        warn!("[SCL] Duplicate {} id \"{}\", keeping the first definition", kind, id);
        return;
    }
    map.insert(id, t);
}

/// Converts a `Structural` error into an ERROR issue; other errors cannot occur here.
pub(crate) fn report_structural(issues: &mut IssueLog, e: SclError) {
    match e {
        SclError::Structural { object, message } => {
            issues.error(object, message);
        }
        other => {
            issues.error("DataTypeTemplates", other.to_string());
        }
    }
}

// --- Raw model conversion ---

fn structural(owner: &str, message: String) -> SclError {
    SclError::Structural {
        object: owner.to_string(),
        message,
    }
}

fn parse_count(count: Option<&str>) -> u32 {
    parse_int(count)
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(0)
}

fn convert_lnode_type(raw: &model::templates::LNodeType) -> Result<LNodeType, SclError> {
    let data_objects = raw
        .data_object
        .iter()
        .map(|d| convert_do_def(d, "DO", &raw.id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LNodeType {
        id: raw.id.clone(),
        ln_class: raw.ln_class.clone(),
        data_objects,
    })
}

fn convert_do_type(raw: &model::templates::DoType) -> Result<DOType, SclError> {
    let sub_data_objects = raw
        .sdo
        .iter()
        .map(|d| convert_do_def(d, "SDO", &raw.id))
        .collect::<Result<Vec<_>, _>>()?;

    let data_attributes = raw
        .da
        .iter()
        .map(|d| convert_da_def(d, "DA", &raw.id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DOType {
        id: raw.id.clone(),
        cdc: raw.cdc.clone(),
        sub_data_objects,
        data_attributes,
    })
}

fn convert_da_type(raw: &model::templates::DaType) -> Result<DAType, SclError> {
    let sub_attributes = raw
        .bda
        .iter()
        .map(|d| convert_da_def(d, "BDA", &raw.id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DAType {
        id: raw.id.clone(),
        sub_attributes,
    })
}

fn convert_enum_type(raw: &model::templates::EnumType) -> Result<EnumType, SclError> {
    let mut values = Vec::with_capacity(raw.enum_val.len());
    for v in &raw.enum_val {
        let ord = parse_int(v.ord.as_deref())
            .and_then(|o| i32::try_from(o).ok())
            .ok_or_else(|| {
                structural(
                    &raw.id,
                    format!("EnumVal \"{}\" has no valid ord attribute", v.symbolic_name),
                )
            })?;
        values.push(EnumVal {
            ord,
            symbolic_name: v.symbolic_name.trim().to_string(),
        });
    }

    Ok(EnumType {
        id: raw.id.clone(),
        values,
    })
}

fn convert_do_def(
    raw: &model::templates::DataObjectDefinition,
    element: &'static str,
    owner: &str,
) -> Result<DataObjectDef, SclError> {
    let name = raw
        .name
        .as_ref()
        .ok_or_else(|| structural(owner, format!("{} is missing name attribute", element)))?;
    let type_id = raw
        .type_id
        .as_ref()
        .ok_or_else(|| structural(owner, format!("{} is missing type attribute", element)))?;

    Ok(DataObjectDef {
        name: name.clone(),
        type_id: type_id.clone(),
        count: parse_count(raw.count.as_deref()),
        transient: parse_bool(raw.transient.as_deref(), false),
    })
}

fn convert_da_def(
    raw: &model::templates::DataAttributeDefinition,
    element: &'static str,
    owner: &str,
) -> Result<DataAttributeDef, SclError> {
    let name = raw
        .name
        .as_ref()
        .ok_or_else(|| structural(owner, format!("{} is missing name attribute", element)))?;
    let b_type = raw
        .b_type
        .as_ref()
        .ok_or_else(|| structural(owner, format!("{} is missing bType attribute", element)))?;

    let fc = match raw.fc.as_deref() {
        None => FunctionalConstraint::NONE,
        Some(fc) => FunctionalConstraint::parse(fc).ok_or_else(|| {
            structural(
                owner,
                format!("{} \"{}\" has unknown functional constraint \"{}\"", element, name, fc),
            )
        })?,
    };

    let trigger_options = TriggerOptions {
        dchg: parse_bool(raw.dchg.as_deref(), false),
        qchg: parse_bool(raw.qchg.as_deref(), false),
        dupd: parse_bool(raw.dupd.as_deref(), false),
        period: parse_bool(raw.period.as_deref(), false),
        gi: parse_bool(raw.gi.as_deref(), true),
    };

    Ok(DataAttributeDef {
        name: name.clone(),
        fc,
        attribute_type: AttributeType::from_btype(b_type),
        type_id: raw.type_id.clone(),
        count: parse_count(raw.count.as_deref()),
        trigger_options,
        s_addr: raw.s_addr.clone(),
        values: raw.val.iter().map(|v| v.value.clone()).collect(),
    })
}
