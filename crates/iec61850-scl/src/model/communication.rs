// crates/iec61850-scl/src/model/communication.rs

//! Raw structures of the `<Communication>` section.

use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Communication {
    #[serde(rename = "SubNetwork", default)]
    pub sub_network: Vec<SubNetwork>,
}

/// `<SubNetwork name=".." type="..">`
#[derive(Debug, Deserialize, Default)]
pub struct SubNetwork {
    #[serde(rename = "@name", default)]
    pub name: String,

    #[serde(rename = "@type", default)]
    pub network_type: Option<String>,

    #[serde(rename = "ConnectedAP", default)]
    pub connected_ap: Vec<ConnectedAp>,
}

/// `<ConnectedAP iedName=".." apName="..">`
#[derive(Debug, Deserialize, Default)]
pub struct ConnectedAp {
    #[serde(rename = "@iedName", default)]
    pub ied_name: String,

    #[serde(rename = "@apName", default)]
    pub ap_name: String,

    #[serde(rename = "Address", default)]
    pub address: Option<Address>,

    #[serde(rename = "GSE", default)]
    pub gse: Vec<Gse>,

    #[serde(rename = "SMV", default)]
    pub smv: Vec<Smv>,
}

impl ConnectedAp {
    pub fn gse(&self, cb_name: &str) -> Option<&Gse> {
        self.gse.iter().find(|g| g.cb_name.as_deref() == Some(cb_name))
    }

    pub fn smv(&self, cb_name: &str) -> Option<&Smv> {
        self.smv.iter().find(|s| s.cb_name.as_deref() == Some(cb_name))
    }
}

/// `<GSE ldInst=".." cbName="..">`
#[derive(Debug, Deserialize, Default)]
pub struct Gse {
    #[serde(rename = "@ldInst", default)]
    pub ld_inst: Option<String>,

    #[serde(rename = "@cbName", default)]
    pub cb_name: Option<String>,

    #[serde(rename = "Address", default)]
    pub address: Option<Address>,

    #[serde(rename = "MinTime", default)]
    pub min_time: Option<Duration>,

    #[serde(rename = "MaxTime", default)]
    pub max_time: Option<Duration>,
}

/// `<SMV ldInst=".." cbName="..">`
#[derive(Debug, Deserialize, Default)]
pub struct Smv {
    #[serde(rename = "@ldInst", default)]
    pub ld_inst: Option<String>,

    #[serde(rename = "@cbName", default)]
    pub cb_name: Option<String>,

    #[serde(rename = "Address", default)]
    pub address: Option<Address>,
}

/// `<MinTime unit="s" multiplier="m">10</MinTime>`
#[derive(Debug, Deserialize, Default)]
pub struct Duration {
    #[serde(rename = "@unit", default)]
    pub unit: Option<String>,

    #[serde(rename = "@multiplier", default)]
    pub multiplier: Option<String>,

    #[serde(rename = "$text", default)]
    pub value: String,
}

/// `<Address>` holding a list of typed `<P>` elements.
#[derive(Debug, Deserialize, Default)]
pub struct Address {
    #[serde(rename = "P", default)]
    pub p: Vec<P>,
}

impl Address {
    /// The text of the first `<P>` of the given type.
    pub fn p(&self, p_type: &str) -> Option<&str> {
        self.p
            .iter()
            .find(|p| p.p_type == p_type)
            .map(|p| p.value.trim())
    }
}

/// `<P type="MAC-Address">01-0C-CD-01-00-01</P>`
#[derive(Debug, Deserialize, Default)]
pub struct P {
    #[serde(rename = "@type", default)]
    pub p_type: String,

    #[serde(rename = "$text", default)]
    pub value: String,
}
