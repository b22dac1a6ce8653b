// crates/iec61850-scl/src/model/ied.rs

//! Raw structures of an `<IED>` section: AccessPoint, Server, LDevice, LN and the
//! instance-value tree (DOI/SDI/DAI).

use super::control::{
    GseControl, Log, LogControl, ReportControl, SampledValueControl, SettingControl,
};
use super::Val;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

/// `<IED name="...">`
#[derive(Debug, Deserialize, Default)]
pub struct Ied {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@manufacturer", default)]
    pub manufacturer: Option<String>,

    #[serde(rename = "@type", default)]
    pub ied_type: Option<String>,

    #[serde(rename = "@configVersion", default)]
    pub config_version: Option<String>,

    #[serde(rename = "AccessPoint", default)]
    pub access_point: Vec<AccessPoint>,
}

/// `<AccessPoint name="...">`
#[derive(Debug, Deserialize, Default)]
pub struct AccessPoint {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "Server", default)]
    pub server: Option<Server>,
}

/// `<Server>`
#[derive(Debug, Deserialize, Default)]
pub struct Server {
    #[serde(rename = "LDevice", default)]
    pub ldevice: Vec<LDevice>,
}

/// `<LDevice inst="..." ldName="...">`
#[derive(Debug, Deserialize, Default)]
pub struct LDevice {
    #[serde(rename = "@inst")]
    pub inst: String,

    #[serde(rename = "@ldName", default)]
    pub ld_name: Option<String>,

    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "LN0", default)]
    pub ln0: Option<LnElement>,

    #[serde(rename = "LN", default)]
    pub ln: Vec<LnElement>,
}

impl LDevice {
    /// LN0 first, then the LNs in document order.
    pub fn logical_nodes(&self) -> impl Iterator<Item = &LnElement> {
        self.ln0.iter().chain(self.ln.iter())
    }
}

/// An `<LN0>` or `<LN>` element.
///
/// Edition 2 allows control blocks on any logical node, so both share one struct.
#[derive(Debug, Deserialize, Default)]
pub struct LnElement {
    #[serde(rename = "@lnClass")]
    pub ln_class: String,

    #[serde(rename = "@lnType")]
    pub ln_type: String,

    #[serde(rename = "@inst", default)]
    pub inst: String,

    #[serde(rename = "@prefix", default)]
    pub prefix: Option<String>,

    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "DataSet", default)]
    pub data_set: Vec<DataSet>,

    #[serde(rename = "ReportControl", default)]
    pub report_control: Vec<ReportControl>,

    #[serde(rename = "LogControl", default)]
    pub log_control: Vec<LogControl>,

    #[serde(rename = "DOI", default)]
    pub doi: Vec<Doi>,

    #[serde(rename = "Log", default)]
    pub log: Vec<Log>,

    #[serde(rename = "GSEControl", default)]
    pub gse_control: Vec<GseControl>,

    #[serde(rename = "SampledValueControl", default)]
    pub smv_control: Vec<SampledValueControl>,

    #[serde(rename = "SettingControl", default)]
    pub setting_control: Option<SettingControl>,
}

impl LnElement {
    /// The instance name: prefix + lnClass + inst.
    pub fn name(&self) -> String {
        let mut name = String::new();
        if let Some(prefix) = &self.prefix {
            name.push_str(prefix);
        }
        name.push_str(&self.ln_class);
        name.push_str(&self.inst);
        name
    }

    pub fn doi(&self, name: &str) -> Option<&Doi> {
        self.doi.iter().find(|d| d.name == name)
    }
}

/// `<DOI name="..." ix="...">`
#[derive(Debug, Deserialize, Default)]
pub struct Doi {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@ix", default)]
    pub ix: Option<String>,

    #[serde(rename = "SDI", default)]
    pub sdi: Vec<Sdi>,

    #[serde(rename = "DAI", default)]
    pub dai: Vec<Dai>,
}

impl Doi {
    pub fn dai(&self, name: &str) -> Option<&Dai> {
        self.dai.iter().find(|d| d.name == name)
    }

    pub fn sdi(&self, name: &str) -> Option<&Sdi> {
        self.sdi.iter().find(|s| s.name == name)
    }
}

/// `<SDI name="..." ix="...">`
#[derive(Debug, Deserialize, Default)]
pub struct Sdi {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@ix", default)]
    pub ix: Option<String>,

    #[serde(rename = "SDI", default)]
    pub sdi: Vec<Sdi>,

    #[serde(rename = "DAI", default)]
    pub dai: Vec<Dai>,
}

impl Sdi {
    pub fn dai(&self, name: &str) -> Option<&Dai> {
        self.dai.iter().find(|d| d.name == name)
    }

    pub fn sdi(&self, name: &str) -> Option<&Sdi> {
        self.sdi.iter().find(|s| s.name == name)
    }
}

/// `<DAI name="..." ix="...">` with its `<Val>` entries.
#[derive(Debug, Deserialize, Default)]
pub struct Dai {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@ix", default)]
    pub ix: Option<String>,

    #[serde(rename = "@valKind", default)]
    pub val_kind: Option<String>,

    #[serde(rename = "Val", default)]
    pub val: Vec<Val>,
}

impl Dai {
    /// The first configured value, if any.
    pub fn value(&self) -> Option<&str> {
        self.val.first().map(|v| v.value.as_str())
    }
}

/// `<DataSet name="...">`
#[derive(Debug, Deserialize, Default)]
pub struct DataSet {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "FCDA", default)]
    pub fcda: Vec<Fcda>,
}

/// `<FCDA ldInst=".." prefix=".." lnClass=".." lnInst=".." doName=".." daName=".." fc=".."/>`
#[derive(Debug, Deserialize, Default)]
pub struct Fcda {
    #[serde(rename = "@ldInst", default)]
    pub ld_inst: Option<String>,

    #[serde(rename = "@prefix", default)]
    pub prefix: Option<String>,

    #[serde(rename = "@lnClass", default)]
    pub ln_class: Option<String>,

    #[serde(rename = "@lnInst", default)]
    pub ln_inst: Option<String>,

    #[serde(rename = "@doName", default)]
    pub do_name: Option<String>,

    #[serde(rename = "@daName", default)]
    pub da_name: Option<String>,

    #[serde(rename = "@fc", default)]
    pub fc: String,

    #[serde(rename = "@ix", default)]
    pub ix: Option<String>,
}

impl Fcda {
    /// prefix + lnClass + lnInst of the referenced logical node.
    pub fn ln_name(&self) -> String {
        let mut name = String::new();
        for part in [&self.prefix, &self.ln_class, &self.ln_inst].into_iter().flatten() {
            name.push_str(part);
        }
        name
    }

    /// `ldInst/LN.DO[.DA]` in IEC 61850 notation.
    pub fn object_reference(&self) -> String {
        let mut reference = String::new();
        if let Some(ld_inst) = &self.ld_inst {
            reference.push_str(ld_inst);
        }
        reference.push('/');
        reference.push_str(&self.ln_name());
        if let Some(do_name) = &self.do_name {
            reference.push('.');
            reference.push_str(do_name);
            if let Some(da_name) = &self.da_name {
                reference.push('.');
                reference.push_str(da_name);
            }
        }
        reference
    }
}
