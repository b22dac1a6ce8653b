//! Internal `serde` data structures that map directly to the SCL XML schema.
//!
//! Only the subset of IEC 61850-6 consumed by the resolver and the static-model
//! emitter is modelled. Unknown elements and attributes (e.g. `Private`,
//! `Substation`, `Services`) are skipped by the deserializer. Numeric and boolean
//! attributes are kept as strings and interpreted leniently by the typed layers.

#![allow(clippy::pedantic)] // XML schema naming conventions differ from Rust

use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

pub mod communication;
pub mod control;
pub mod ied;
pub mod templates;

// Re-export key components for internal use
pub use communication::{Address, Communication, ConnectedAp, Gse, Smv};
pub use control::{
    GseControl, Log, LogControl, OptFields, ReportControl, SampledValueControl, SettingControl,
    SmvOpts, TrgOps,
};
pub use ied::{AccessPoint, DataSet, Dai, Doi, Fcda, Ied, LDevice, LnElement, Sdi, Server};
pub use templates::DataTypeTemplates;

/// The root `<SCL>` element.
#[derive(Debug, Deserialize, Default)]
#[serde(rename = "SCL")]
pub struct Scl {
    #[serde(rename = "@version", default)]
    pub version: Option<String>,

    #[serde(rename = "@revision", default)]
    pub revision: Option<String>,

    #[serde(rename = "@release", default)]
    pub release: Option<String>,

    #[serde(rename = "Header", default)]
    pub header: Option<Header>,

    #[serde(rename = "Communication", default)]
    pub communication: Option<Communication>,

    #[serde(rename = "IED", default)]
    pub ied: Vec<Ied>,

    #[serde(rename = "DataTypeTemplates", default)]
    pub data_type_templates: Option<DataTypeTemplates>,
}

/// `<Header id="..." version="..." revision="..."/>`
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Header {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "@version", default)]
    pub version: Option<String>,
    #[serde(rename = "@revision", default)]
    pub revision: Option<String>,
}

/// `<Val sGroup="1">text</Val>`, used on DA/BDA definitions and on DAI instances.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Val {
    #[serde(rename = "@sGroup", default)]
    pub s_group: Option<String>,
    #[serde(rename = "$text", default)]
    pub value: String,
}

// --- Attribute interpretation helpers ---

/// Interprets an `xs:boolean` attribute, falling back to `default` when the
/// attribute is absent or not a boolean literal.
pub(crate) fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

/// Interprets an integer attribute; absent or malformed values yield `None`.
pub(crate) fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

/// Returns the attribute value if it is present and non-empty.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
