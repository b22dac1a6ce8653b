// crates/iec61850-scl/src/communication.rs

//! ConnectedAP lookup and decoding of GSE/SMV physical addresses.

use crate::error::SclError;
use crate::issues::IssueLog;
use crate::model::{Address, Communication, ConnectedAp};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Finds the ConnectedAP of an IED's AccessPoint across all SubNetworks.
pub fn connected_ap<'a>(
    communication: Option<&'a Communication>,
    ap_name: &str,
    ied_name: &str,
) -> Option<&'a ConnectedAp> {
    communication?
        .sub_network
        .iter()
        .flat_map(|sn| sn.connected_ap.iter())
        .find(|cap| cap.ap_name == ap_name && cap.ied_name == ied_name)
}

/// The `P` values needed for a `PA(...)` statement. Missing entries are `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalAddress {
    pub vlan_priority: String,
    pub vlan_id: String,
    pub app_id: String,
    /// `None` when there is no MAC-Address or it could not be decoded.
    pub mac: Option<[u8; 6]>,
}

impl PhysicalAddress {
    pub fn from_address(address: &Address) -> Self {
        let text = |p_type: &str| address.p(p_type).unwrap_or("0").to_string();
        PhysicalAddress {
            vlan_priority: text("VLAN-PRIORITY"),
            vlan_id: text("VLAN-ID"),
            app_id: text("APPID"),
            mac: address.p("MAC-Address").and_then(|m| parse_mac(m).ok()),
        }
    }

    /// The MAC as twelve upper-case hex digits.
    pub fn mac_hex(&self) -> Option<String> {
        self.mac.map(hex::encode_upper)
    }
}

/// Decodes `01-0C-CD-01-00-01` into six bytes.
pub fn parse_mac(text: &str) -> Result<[u8; 6], SclError> {
    let invalid = || SclError::InvalidAttributeFormat {
        attribute: "MAC-Address",
        value: text.to_string(),
    };

    let groups: Vec<&str> = text.trim().split('-').collect();
    if groups.len() != 6 || groups.iter().any(|g| g.len() != 2) {
        return Err(invalid());
    }
    let bytes = hex::decode(groups.concat())?;
    bytes.try_into().map_err(|_| invalid())
}

// --- P element checks ---

fn is_hex(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_hexdigit())
}

/// Checks the P elements of one Address and records an ERROR per violation.
pub(crate) fn check_address(address: &Address, object: &str, issues: &mut IssueLog) {
    for p in &address.p {
        let text = p.value.trim();
        let p_type = p.p_type.as_str();
        match p_type {
            "APPID" | "VLAN-ID" => {
                let expected = if p_type == "APPID" { 4 } else { 3 };
                if !is_hex(text) {
                    issues.error(
                        object,
                        format!("P address of type {} does not have a Hex value. Value is: {}", p_type, text),
                    );
                } else if text.len() != expected {
                    issues.error(
                        object,
                        format!(
                            "P address of type {} size it is not {}. Actual size: {}",
                            p_type,
                            expected,
                            text.len()
                        ),
                    );
                }
            }
            "VLAN-PRIORITY" => {
                if text.is_empty() || !text.chars().all(|c| ('0'..='7').contains(&c)) {
                    issues.error(
                        object,
                        format!("P address of type {} does not have a 0-7 value. Value is: {}", p_type, text),
                    );
                }
            }
            "MAC-Address" => check_mac(text, object, issues),
            _ => {}
        }
    }
}

fn check_mac(text: &str, object: &str, issues: &mut IssueLog) {
    let groups: Vec<&str> = text.split('-').collect();
    if groups.len() != 6 {
        issues.error(
            object,
            format!(
                "P address of type MAC-Address does not have a array size 6 value. Actual size: {}",
                groups.len()
            ),
        );
        return;
    }
    for (i, group) in groups.iter().enumerate() {
        if !is_hex(group) {
            issues.error(
                object,
                format!(
                    "P address of type MAC-Address does not have a Hex value on position {}. Value is: {}",
                    i, group
                ),
            );
        } else if group.len() != 2 {
            issues.error(
                object,
                format!(
                    "P address of type MAC-Address size it is not 2 on position {}. Actual size: {}",
                    i,
                    group.len()
                ),
            );
        }
    }
}

/// Runs [`check_address`] over the ConnectedAP address and every GSE/SMV address.
pub(crate) fn check_connected_ap(cap: &ConnectedAp, issues: &mut IssueLog) {
    let object = format!("{}/{}", cap.ied_name, cap.ap_name);
    if let Some(address) = &cap.address {
        check_address(address, &object, issues);
    }
    for gse in &cap.gse {
        if let Some(address) = &gse.address {
            let cb = gse.cb_name.as_deref().unwrap_or_default();
            check_address(address, &format!("{}/GSE {}", object, cb), issues);
        }
    }
    for smv in &cap.smv {
        if let Some(address) = &smv.address {
            let cb = smv.cb_name.as_deref().unwrap_or_default();
            check_address(address, &format!("{}/SMV {}", object, cb), issues);
        }
    }
}
