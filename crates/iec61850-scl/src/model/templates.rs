// crates/iec61850-scl/src/model/templates.rs

//! Raw structures of the `<DataTypeTemplates>` section.

use super::Val;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct DataTypeTemplates {
    #[serde(rename = "LNodeType", default)]
    pub lnode_type: Vec<LNodeType>,

    #[serde(rename = "DOType", default)]
    pub do_type: Vec<DoType>,

    #[serde(rename = "DAType", default)]
    pub da_type: Vec<DaType>,

    #[serde(rename = "EnumType", default)]
    pub enum_type: Vec<EnumType>,
}

/// `<LNodeType id="..." lnClass="...">`
#[derive(Debug, Deserialize, Default)]
pub struct LNodeType {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@lnClass", default)]
    pub ln_class: String,

    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "DO", default)]
    pub data_object: Vec<DataObjectDefinition>,
}

/// A `<DO>` inside an LNodeType or an `<SDO>` inside a DOType.
///
/// `name` and `type` are mandatory in the schema but are optional here so that a
/// single malformed entry does not fail the whole document.
#[derive(Debug, Deserialize, Default)]
pub struct DataObjectDefinition {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "@type", default)]
    pub type_id: Option<String>,

    #[serde(rename = "@count", default)]
    pub count: Option<String>,

    #[serde(rename = "@transient", default)]
    pub transient: Option<String>,
}

/// `<DOType id="..." cdc="...">`
#[derive(Debug, Deserialize, Default)]
pub struct DoType {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@cdc", default)]
    pub cdc: String,

    #[serde(rename = "SDO", default)]
    pub sdo: Vec<DataObjectDefinition>,

    #[serde(rename = "DA", default)]
    pub da: Vec<DataAttributeDefinition>,
}

/// A `<DA>` inside a DOType or a `<BDA>` inside a DAType.
#[derive(Debug, Deserialize, Default)]
pub struct DataAttributeDefinition {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,

    #[serde(rename = "@bType", default)]
    pub b_type: Option<String>,

    #[serde(rename = "@type", default)]
    pub type_id: Option<String>,

    #[serde(rename = "@fc", default)]
    pub fc: Option<String>,

    #[serde(rename = "@count", default)]
    pub count: Option<String>,

    #[serde(rename = "@sAddr", default)]
    pub s_addr: Option<String>,

    #[serde(rename = "@valKind", default)]
    pub val_kind: Option<String>,

    #[serde(rename = "@dchg", default)]
    pub dchg: Option<String>,

    #[serde(rename = "@qchg", default)]
    pub qchg: Option<String>,

    #[serde(rename = "@dupd", default)]
    pub dupd: Option<String>,

    #[serde(rename = "@period", default)]
    pub period: Option<String>,

    #[serde(rename = "@gi", default)]
    pub gi: Option<String>,

    #[serde(rename = "Val", default)]
    pub val: Vec<Val>,
}

/// `<DAType id="...">`
#[derive(Debug, Deserialize, Default)]
pub struct DaType {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "BDA", default)]
    pub bda: Vec<DataAttributeDefinition>,
}

/// `<EnumType id="...">`
#[derive(Debug, Deserialize, Default)]
pub struct EnumType {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "EnumVal", default)]
    pub enum_val: Vec<EnumVal>,
}

/// `<EnumVal ord="1">on</EnumVal>`
#[derive(Debug, Deserialize, Default)]
pub struct EnumVal {
    #[serde(rename = "@ord", default)]
    pub ord: Option<String>,

    #[serde(rename = "$text", default)]
    pub symbolic_name: String,
}
