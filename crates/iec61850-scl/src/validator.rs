// crates/iec61850-scl/src/validator.rs

//! Binding of DOI/SDI/DAI instance values to resolved attributes, and the
//! value and cross-reference checks that run on a resolved model.

use crate::issues::IssueLog;
use crate::model::{Dai, DataSet, Doi, Fcda, LnElement, Sdi};
use crate::resolver::arena::{IedModel, NodeId, NodeKind};
use crate::templates::{AttributeType, DOType, TypeTemplateRegistry};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

// --- Value format checks ---

/// Checks that `value` is a valid literal of a numeric attribute type.
///
/// Non-numeric types always yield `false`.
pub fn validate_numeric(value: &str, attribute_type: AttributeType) -> bool {
    let v = value.trim();
    match attribute_type {
        AttributeType::Int8 => v.parse::<i8>().is_ok(),
        AttributeType::Int8U => v.parse::<u8>().is_ok(),
        AttributeType::Int16 => v.parse::<i16>().is_ok(),
        AttributeType::Int16U => v.parse::<u16>().is_ok(),
        AttributeType::Int24U => v.parse::<u32>().is_ok_and(|n| n <= 0x00FF_FFFF),
        AttributeType::Int32 => v.parse::<i32>().is_ok(),
        AttributeType::Int32U => v.parse::<u32>().is_ok(),
        AttributeType::Int64 => v.parse::<i64>().is_ok(),
        AttributeType::Float32 | AttributeType::Float64 => v.parse::<f32>().is_ok(),
        _ => false,
    }
}

/// Strict base64 check: non-empty, a multiple of four long, no whitespace,
/// at most two trailing `=` and only `[A-Za-z0-9+/]` before them.
pub fn is_base64(value: &str) -> bool {
    if value.is_empty() || value.len() % 4 != 0 {
        return false;
    }
    if value.contains([' ', '\t', '\r', '\n']) {
        return false;
    }
    let mut body = value;
    for _ in 0..2 {
        body = body.strip_suffix('=').unwrap_or(body);
    }
    body.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Whether an attribute type's values are format-checked at all.
fn is_format_checked(attribute_type: AttributeType) -> bool {
    matches!(
        attribute_type,
        AttributeType::Int8
            | AttributeType::Int8U
            | AttributeType::Int16
            | AttributeType::Int16U
            | AttributeType::Int32
            | AttributeType::Int32U
            | AttributeType::Int64
            | AttributeType::Float32
            | AttributeType::Float64
            | AttributeType::OctetString64
    )
}

/// Checks one configured value against the attribute it is bound to.
pub(crate) fn check_dai_value(
    registry: &TypeTemplateRegistry,
    model: &IedModel<'_>,
    da: NodeId,
    value: &str,
    issues: &mut IssueLog,
) {
    let node = model.node(da);
    let NodeKind::DataAttribute {
        attribute_type,
        definition,
        ..
    } = &node.kind
    else {
        return;
    };

    match attribute_type {
        AttributeType::Enumerated => match definition.type_id.as_deref() {
            None => {
                issues.error(
                    node.obj_ref.as_str(),
                    format!("Wrong ENUMERATED type in DAI {}", node.obj_ref),
                );
            }
            Some(enum_id) => match registry.get_enum_type(enum_id) {
                None => {
                    issues.error(
                        node.obj_ref.as_str(),
                        format!("Wrong ENUMERATED type {} in DAI {}", enum_id, node.obj_ref),
                    );
                }
                Some(enum_type) if enum_type.ord_of(value).is_none() => {
                    issues.error(
                        node.obj_ref.as_str(),
                        format!(
                            "Value {} in DAI {} does not exist in enumerated type {}",
                            value, node.obj_ref, enum_id
                        ),
                    );
                }
                Some(_) => {}
            },
        },
        t if is_format_checked(*t) => {
            let valid = if *t == AttributeType::OctetString64 {
                is_base64(value)
            } else {
                validate_numeric(value, *t)
            };
            if !valid {
                issues.error(
                    node.obj_ref.as_str(),
                    format!(
                        "Value {} in DAI {} wrong for attribute type {}",
                        value,
                        node.obj_ref,
                        t.name()
                    ),
                );
            }
        }
        _ => {}
    }
}

// --- Binding ---

fn raw_ln<'a>(model: &IedModel<'a>, ln: NodeId) -> Option<&'a LnElement> {
    match &model.node(ln).kind {
        NodeKind::LogicalNode { raw, .. } => Some(*raw),
        _ => None,
    }
}

/// Finds the attribute a DAI configures.
///
/// The exact objRef `LD/LN.DOI[.SDI]*.DAI` is tried first over the LN's
/// subtree; failing that, the names after the DOI are walked step by step
/// from the DO node through its children.
pub(crate) fn bind_dai(
    model: &IedModel<'_>,
    ln: NodeId,
    doi: &Doi,
    sdis: &[&Sdi],
    dai: &Dai,
) -> Option<NodeId> {
    let mut expected = format!("{}.{}", model.node(ln).obj_ref, doi.name);
    for sdi in sdis {
        expected.push('.');
        expected.push_str(&sdi.name);
    }
    expected.push('.');
    expected.push_str(&dai.name);

    let exact = model
        .descendants(ln)
        .into_iter()
        .find(|&id| model.node(id).obj_ref == expected && model.node(id).is_data_attribute());
    if exact.is_some() {
        return exact;
    }

    let mut current = model.child(ln, &doi.name)?;
    for name in sdis.iter().map(|s| s.name.as_str()).chain([dai.name.as_str()]) {
        current = model.child(current, name)?;
    }
    model.node(current).is_data_attribute().then_some(current)
}

/// Any attribute with the DAI's name anywhere below the DOI's data object.
fn leaf_named(model: &IedModel<'_>, ln: NodeId, doi: &Doi, name: &str) -> Option<NodeId> {
    let data_object = model.child(ln, &doi.name)?;
    model
        .descendants(data_object)
        .into_iter()
        .find(|&id| model.node(id).is_data_attribute() && model.node(id).name == name)
}

/// Finds the DAI that configures a resolved attribute, for emission.
///
/// A DAI directly below the DOI only counts when the attribute's objRef is
/// exactly `LD/LN.DO.DA`. Otherwise the objRef after the LN name is read as
/// `DO.SDI*.DAI` and looked up through the DOI's SDIs.
pub fn dai_for_attribute<'a>(model: &IedModel<'a>, da: NodeId) -> Option<&'a Dai> {
    let data_object = model.top_level_data_object(da)?;
    let ln = model.parent(data_object)?;
    let raw = raw_ln(model, ln)?;
    let doi = raw.doi(&model.node(data_object).name)?;
    let node = model.node(da);

    if let Some(dai) = doi.dai(&node.name) {
        let direct = format!("{}.{}.{}", model.node(ln).obj_ref, doi.name, dai.name);
        if node.obj_ref == direct {
            return Some(dai);
        }
    }

    let (_, stripped) = node.obj_ref.split_once('.')?;
    let parts: Vec<&str> = stripped.split('.').collect();
    if parts.len() < 3 {
        return None;
    }
    let (leaf, sdi_path) = parts[1..].split_last()?;
    let mut sdi = doi.sdi(sdi_path[0])?;
    for name in &sdi_path[1..] {
        sdi = sdi.sdi(name)?;
    }
    sdi.dai(leaf)
}

// --- Per logical node checks ---

/// Binds and checks every DAI below the LN's DOIs.
pub(crate) fn validate_logical_node(
    registry: &TypeTemplateRegistry,
    model: &IedModel<'_>,
    ln: NodeId,
    issues: &mut IssueLog,
) {
    let Some(raw) = raw_ln(model, ln) else {
        return;
    };
    let ln_ref = model.node(ln).obj_ref.as_str();

    for doi in &raw.doi {
        for dai in &doi.dai {
            match bind_dai(model, ln, doi, &[], dai) {
                Some(da) => check_values(registry, model, da, dai, issues),
                None => {
                    issues.error(
                        ln_ref,
                        format!(
                            "There is no DataAttribute definition for DAI {} on LogicalNode {}",
                            dai.name, ln_ref
                        ),
                    );
                }
            }
        }

        let mut path = Vec::new();
        for sdi in &doi.sdi {
            validate_sdi(registry, model, ln, doi, sdi, &mut path, None, issues);
        }
    }
}

fn check_values(
    registry: &TypeTemplateRegistry,
    model: &IedModel<'_>,
    da: NodeId,
    dai: &Dai,
    issues: &mut IssueLog,
) {
    for val in &dai.val {
        check_dai_value(registry, model, da, &val.value, issues);
    }
}

#[allow(clippy::too_many_arguments)]
fn validate_sdi<'r>(
    registry: &TypeTemplateRegistry,
    model: &IedModel<'_>,
    ln: NodeId,
    doi: &Doi,
    sdi: &'r Sdi,
    path: &mut Vec<&'r Sdi>,
    parent_label: Option<&str>,
    issues: &mut IssueLog,
) {
    let mut label = match parent_label {
        Some(parent) => format!("{}.{}", parent, sdi.name),
        None => sdi.name.clone(),
    };
    if let Some(ix) = &sdi.ix {
        label.push('[');
        label.push_str(ix);
        label.push(']');
    }

    path.push(sdi);
    for dai in &sdi.dai {
        if let Some(da) = bind_dai(model, ln, doi, path, dai) {
            check_values(registry, model, da, dai, issues);
        } else if leaf_named(model, ln, doi, &dai.name).is_none() {
            let ln_ref = model.node(ln).obj_ref.as_str();
            issues.error(
                ln_ref,
                format!(
                    "There is no SubDataAttribute for DAI {} on LogicalNode {}",
                    label, ln_ref
                ),
            );
        }
    }
    for child in &sdi.sdi {
        validate_sdi(registry, model, ln, doi, child, path, Some(label.as_str()), issues);
    }
    path.pop();
}

/// LLN0 must carry `NamPlt.configRev`, either declared on the NamPlt DOType or
/// configured as a DAI with a value.
pub(crate) fn check_config_rev(model: &IedModel<'_>, ld_inst: &str, lln0: NodeId, issues: &mut IssueLog) {
    let Some(raw) = raw_ln(model, lln0) else {
        return;
    };
    let object = model.node(lln0).obj_ref.as_str();

    let declared = model
        .child(lln0, "NamPlt")
        .and_then(|id| match &model.node(id).kind {
            NodeKind::DataObject { do_type, .. } => do_type.data_attribute("configRev"),
            _ => None,
        })
        .is_some();
    if declared {
        return;
    }

    match raw.doi("NamPlt").and_then(|doi| doi.dai("configRev")) {
        Some(dai) => {
            if dai.value().is_none_or(str::is_empty) {
                issues.error(
                    object,
                    format!("DAI LLN0.NamPlt.configRev found on LD {} but has no value", ld_inst),
                );
            }
        }
        None => {
            issues.error(
                object,
                format!("DA or DAI LLN0.NamPlt.configRev not found on LD {}", ld_inst),
            );
        }
    }
}

// --- FCDA references ---

/// Follows `name` (possibly dotted) through DOType attributes and DAType
/// sub-attributes.
fn fcda_attribute_exists(registry: &TypeTemplateRegistry, do_type: &DOType, da_name: &str) -> bool {
    let mut parts = da_name.split('.');
    let Some(first) = parts.next() else {
        return false;
    };
    let Some(mut def) = do_type.data_attribute(first) else {
        return false;
    };
    for part in parts {
        let Some(da_type) = def.type_id.as_deref().and_then(|id| registry.get_da_type(id)) else {
            return false;
        };
        let Some(next) = da_type.sub_attribute(part) else {
            return false;
        };
        def = next;
    }
    true
}

/// Follows `do_name` (possibly `DO.SDO...`) from an LNodeType.
fn fcda_data_object<'t>(
    registry: &'t TypeTemplateRegistry,
    ln_type_id: &str,
    do_name: &str,
) -> Option<&'t DOType> {
    let ln_type = registry.get_lnode_type(ln_type_id)?;
    let mut parts = do_name.split('.');
    let first = parts.next()?;
    let def = ln_type.data_objects.iter().find(|d| d.name == first)?;
    let mut do_type = registry.get_do_type(&def.type_id)?;
    for part in parts {
        let sdo = do_type.sub_data_objects.iter().find(|d| d.name == part)?;
        do_type = registry.get_do_type(&sdo.type_id)?;
    }
    Some(do_type)
}

fn fcda_exists(registry: &TypeTemplateRegistry, model: &IedModel<'_>, fcda: &Fcda) -> bool {
    let Some(ld) = fcda.ld_inst.as_deref().and_then(|inst| model.logical_device_by_inst(inst)) else {
        return false;
    };
    let Some(ln) = model.logical_node(ld, &fcda.ln_name()) else {
        return false;
    };
    let Some(raw) = raw_ln(model, ln) else {
        return false;
    };
    let Some(do_name) = fcda.do_name.as_deref() else {
        return false;
    };
    let Some(do_type) = fcda_data_object(registry, &raw.ln_type, do_name) else {
        return false;
    };
    match fcda.da_name.as_deref() {
        Some(da_name) => fcda_attribute_exists(registry, do_type, da_name),
        None => true,
    }
}

/// Checks every FCDA of every DataSet in the model against the templates.
pub(crate) fn check_fcda_references(registry: &TypeTemplateRegistry, model: &IedModel<'_>, issues: &mut IssueLog) {
    for &ld in model.logical_devices() {
        for ln in model.logical_nodes(ld) {
            let Some(raw) = raw_ln(model, ln) else {
                continue;
            };
            for data_set in &raw.data_set {
                check_data_set(registry, model, ln, data_set, issues);
            }
        }
    }
}

fn check_data_set(
    registry: &TypeTemplateRegistry,
    model: &IedModel<'_>,
    ln: NodeId,
    data_set: &DataSet,
    issues: &mut IssueLog,
) {
    let ds_ref: String = format!("{}.{}", model.node(ln).obj_ref, data_set.name);
    for fcda in &data_set.fcda {
        if !fcda_exists(registry, model, fcda) {
            issues.error(
                ds_ref.as_str(),
                format!(
                    "FCDA {} on DataSet {} not found on data type templates",
                    fcda.object_reference(),
                    ds_ref
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_numeric_ranges() {
        assert!(!validate_numeric("128", AttributeType::Int8));
        assert!(validate_numeric("127", AttributeType::Int8));
        assert!(validate_numeric("-128", AttributeType::Int8));
        assert!(!validate_numeric("-129", AttributeType::Int8));
        assert!(!validate_numeric("256", AttributeType::Int8U));
        assert!(validate_numeric("255", AttributeType::Int8U));
        assert!(!validate_numeric("-1", AttributeType::Int8U));
        assert!(validate_numeric(" 42 ", AttributeType::Int32));
        assert!(!validate_numeric("70000", AttributeType::Int16U));
        assert!(validate_numeric("4294967295", AttributeType::Int32U));
        assert!(validate_numeric("-9223372036854775808", AttributeType::Int64));
    }

    #[test]
    fn test_validate_numeric_floats_and_others() {
        assert!(validate_numeric("1.5", AttributeType::Float32));
        assert!(validate_numeric("-3e2", AttributeType::Float64));
        assert!(!validate_numeric("abc", AttributeType::Float32));
        assert!(!validate_numeric("1", AttributeType::Boolean));
        assert!(!validate_numeric("1", AttributeType::VisibleString64));
    }

    #[test]
    fn test_is_base64() {
        assert!(is_base64("QQ=="));
        assert!(is_base64("QUJD"));
        assert!(is_base64("a+/9"));
        assert!(!is_base64("QQ="));
        assert!(!is_base64("Q Q="));
        assert!(!is_base64(""));
        assert!(!is_base64("Q==="));
        assert!(!is_base64("QQ-="));
    }
}
