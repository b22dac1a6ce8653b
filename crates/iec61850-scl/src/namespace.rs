// crates/iec61850-scl/src/namespace.rs

//! `ldNs`/`lnNs` namespace strings carried by the `NamPlt` data object.

use crate::issues::IssueLog;
use crate::resolver::arena::{IedModel, NodeId, NodeKind};
use crate::templates::FunctionalConstraint;
use alloc::format;
use alloc::string::{String, ToString};

/// Namespaces for which NSD files are known, in `nsdPath` form.
pub const KNOWN_NSD_NAMESPACES: [&str; 14] = [
    "IEC_61850-7-4",
    "IEC_61850-7-4_2003",
    "IEC_61850-7-4_2007",
    "IEC_61850-7-4_2007A",
    "IEC_61850-7-4_2007B",
    "IEC_61850-7-2_2007A3",
    "IEC_61850-7-2_2007B3",
    "IEC_61850-7-3_2007A3",
    "IEC_61850-7-3_2007B3",
    "IEC_61850-7-4_2007A3",
    "IEC_61850-7-4_2007B3",
    "IEC_61850-7-420_2019A4",
    "IEC_61850-7-420_2019A",
    "IEC_61850-8-1_2003A2",
];

/// A parsed namespace such as `IEC 61850-7-4:2007B3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub identifier: String,
    /// Four-character year, e.g. `2007`.
    pub version: String,
    /// Single letter, `A` when not given.
    pub revision: String,
    pub release: Option<String>,
    /// The full string with spaces and colons replaced by `_`.
    pub nsd_path: String,
    pub nsd_path_found: bool,
}

impl Namespace {
    /// Parses `identifier ":" version(4) [revision(1) [release]]`.
    ///
    /// Returns `None` when there is no `:` or fewer than four characters follow it.
    pub fn parse(full: &str) -> Option<Self> {
        let (identifier, rest) = full.split_once(':')?;

        let mut chars = rest.chars();
        let version: String = chars.by_ref().take(4).collect();
        if version.chars().count() < 4 {
            return None;
        }
        let revision = chars.next().map(String::from).unwrap_or_else(|| "A".to_string());
        let release: String = chars.collect();

        let nsd_path = full.replace([' ', ':'], "_");
        let nsd_path_found = KNOWN_NSD_NAMESPACES.contains(&nsd_path.as_str());

        Some(Namespace {
            identifier: identifier.to_string(),
            version,
            revision,
            release: (!release.is_empty()).then_some(release),
            nsd_path,
            nsd_path_found,
        })
    }
}

// --- NamPlt checks ---

#[derive(Clone, Copy)]
enum NsAttribute {
    LdNs,
    LnNs,
}

impl NsAttribute {
    fn name(self) -> &'static str {
        match self {
            NsAttribute::LdNs => "ldNs",
            NsAttribute::LnNs => "lnNs",
        }
    }
}

/// Looks up the namespace value: the NamPlt DOI first, then the default value
/// of the EX attribute on an `LPL` NamPlt type. Returns whether the attribute
/// exists at all and its non-empty value.
fn namespace_value<'a>(model: &IedModel<'a>, ln: NodeId, attr: NsAttribute) -> (bool, Option<&'a str>) {
    let NodeKind::LogicalNode { raw, .. } = &model.node(ln).kind else {
        return (false, None);
    };
    let raw = *raw;
    let mut found = false;

    if let Some(dai) = raw.doi("NamPlt").and_then(|doi| doi.dai(attr.name())) {
        found = true;
        if let Some(v) = dai.value().filter(|v| !v.is_empty()) {
            return (true, Some(v));
        }
    }

    let nam_plt = model.child(ln, "NamPlt").map(|id| &model.node(id).kind);
    if let Some(NodeKind::DataObject { do_type, .. }) = nam_plt {
        let do_type = *do_type;
        if do_type.cdc == "LPL" {
            let da = do_type
                .data_attributes
                .iter()
                .find(|da| da.name == attr.name() && da.fc == FunctionalConstraint::EX);
            if let Some(da) = da {
                found = true;
                if let Some(v) = da.default_value().filter(|v| !v.is_empty()) {
                    return (true, Some(v));
                }
            }
        }
    }

    (found, None)
}

/// Checks the namespaces of one logical node and stores the parsed value on
/// the LD (`ldNs`, LLN0 only) or the LN (`lnNs`).
pub(crate) fn check_namespaces(model: &mut IedModel<'_>, ld: NodeId, ln: NodeId, issues: &mut IssueLog) {
    let is_lln0 = matches!(&model.node(ln).kind, NodeKind::LogicalNode { ln_class, .. } if ln_class == "LLN0");

    if is_lln0 {
        check_one(model, ld, ln, NsAttribute::LdNs, ld, issues);
    }
    check_one(model, ld, ln, NsAttribute::LnNs, ln, issues);
}

fn check_one(
    model: &mut IedModel<'_>,
    ld: NodeId,
    ln: NodeId,
    attr: NsAttribute,
    target: NodeId,
    issues: &mut IssueLog,
) {
    let (found, value) = namespace_value(model, ln, attr);
    let location = format!(
        "{}/{}.NamPlt.{}",
        model.node(ld).name,
        model.node(ln).name,
        attr.name()
    );

    match value {
        Some(value) => {
            let parsed = Namespace::parse(value);
            if !parsed.as_ref().is_some_and(|ns| ns.nsd_path_found) {
                issues.warning(
                    model.node(ln).obj_ref.as_str(),
                    format!("Namespace on {} not found on NSD files. Value: {}", location, value),
                );
            }
            if let Some(ns) = parsed {
                model.set_namespace(target, ns);
            }
        }
        None if found => {
            issues.error(
                model.node(ln).obj_ref.as_str(),
                format!("Namespace on {} has no value", location),
            );
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_namespace() {
        let ns = Namespace::parse("IEC 61850-7-4:2007B3").unwrap();
        assert_eq!(ns.identifier, "IEC 61850-7-4");
        assert_eq!(ns.version, "2007");
        assert_eq!(ns.revision, "B");
        assert_eq!(ns.release.as_deref(), Some("3"));
        assert_eq!(ns.nsd_path, "IEC_61850-7-4_2007B3");
        assert!(ns.nsd_path_found);
    }

    #[test]
    fn test_revision_defaults_to_a() {
        let ns = Namespace::parse("IEC 61850-7-4:2003").unwrap();
        assert_eq!(ns.revision, "A");
        assert_eq!(ns.release, None);
        assert_eq!(ns.nsd_path, "IEC_61850-7-4_2003");
        assert!(ns.nsd_path_found);
    }

    #[test]
    fn test_unknown_namespace_is_parsed_but_not_found() {
        let ns = Namespace::parse("Vendor X:2020A1").unwrap();
        assert_eq!(ns.nsd_path, "Vendor_X_2020A1");
        assert!(!ns.nsd_path_found);
    }

    #[test]
    fn test_malformed_namespace() {
        assert!(Namespace::parse("IEC 61850-7-4").is_none());
        assert!(Namespace::parse("IEC 61850-7-4:20").is_none());
    }
}
