// crates/iec61850-scl/src/usage.rs

//! Used/unused bookkeeping for data type templates.
//!
//! The registry never changes after loading. Usage is recorded here instead,
//! one tracker per pass, so several IEDs can be checked independently and the
//! results merged afterwards.

use crate::resolver::arena::{IedModel, NodeKind};
use crate::templates::{AttributeType, DOType, TemplateKind, TypeTemplateRegistry};
use crate::validator;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::trace;

#[derive(Debug, Default, Clone)]
pub struct UsageTracker {
    used: BTreeMap<(TemplateKind, String), Vec<String>>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every used flag and user list.
    pub fn reset_usage(&mut self) {
        self.used.clear();
    }

    /// Flags a template as used by `user` (an objRef). Marking the same pair
    /// twice has no further effect.
    pub fn mark_used(&mut self, kind: TemplateKind, id: &str, user: &str) {
        let users = self.used.entry((kind, id.to_string())).or_default();
        if !users.iter().any(|u| u == user) {
            users.push(user.to_string());
        }
    }

    pub fn is_used(&self, kind: TemplateKind, id: &str) -> bool {
        self.used.contains_key(&(kind, id.to_string()))
    }

    /// The objRefs that caused a template to be marked, in marking order.
    pub fn used_on(&self, kind: TemplateKind, id: &str) -> &[String] {
        self.used
            .get(&(kind, id.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Folds the results of another pass into this one.
    pub fn merge(&mut self, other: UsageTracker) {
        for ((kind, id), users) in other.used {
            for user in users {
                self.mark_used(kind, &id, &user);
            }
        }
    }

    /// Templates of `registry` that no pass marked, for dead-type reporting.
    pub fn unused_templates(&self, registry: &TypeTemplateRegistry) -> Vec<(TemplateKind, String)> {
        registry
            .ids()
            .filter(|(kind, id)| !self.is_used(*kind, id))
            .map(|(kind, id)| (kind, id.to_string()))
            .collect()
    }

    // --- Whole-model usage pass ---

    /// Recomputes usage for a resolved model.
    ///
    /// Marks each LN's LNodeType, the EnumTypes of DOI-level DAI values, and
    /// each top-level DO's DOType together with the types it references. A
    /// CONSTRUCTED DA marks its DAType and that DAType's CONSTRUCTED BDA types,
    /// but the walk stops there; deeper BDA types and BDA EnumTypes are not
    /// marked by this pass.
    pub fn mark_model(&mut self, registry: &TypeTemplateRegistry, model: &IedModel<'_>, max_depth: usize) {
        self.reset_usage();

        for &ld in model.logical_devices() {
            for ln in model.logical_nodes(ld) {
                let ln_node = model.node(ln);
                let NodeKind::LogicalNode { raw, .. } = &ln_node.kind else {
                    continue;
                };

                self.mark_value_enum_types(registry, model, ln);

                if registry.contains(TemplateKind::LNodeType, &raw.ln_type) {
                    self.mark_used(TemplateKind::LNodeType, &raw.ln_type, &ln_node.obj_ref);
                }

                for &child in model.children(ln) {
                    let node = model.node(child);
                    if let NodeKind::DataObject { do_type, .. } = &node.kind {
                        self.mark_used(TemplateKind::DOType, &do_type.id, &node.obj_ref);
                        self.mark_do_type_references(registry, do_type, &node.obj_ref, 0, max_depth);
                    }
                }
            }
        }
        trace!("[SCL] Usage pass marked {} templates", self.used.len());
    }

    fn mark_value_enum_types(
        &mut self,
        registry: &TypeTemplateRegistry,
        model: &IedModel<'_>,
        ln: crate::NodeId,
    ) {
        let NodeKind::LogicalNode { raw, .. } = &model.node(ln).kind else {
            return;
        };
        for doi in &raw.doi {
            for dai in &doi.dai {
                if dai.val.is_empty() {
                    continue;
                }
                let Some(da) = validator::bind_dai(model, ln, doi, &[], dai) else {
                    continue;
                };
                let NodeKind::DataAttribute {
                    attribute_type: AttributeType::Enumerated,
                    definition,
                    ..
                } = &model.node(da).kind
                else {
                    continue;
                };
                if let Some(enum_id) = definition.type_id.as_deref() {
                    if registry.contains(TemplateKind::EnumType, enum_id) {
                        self.mark_used(TemplateKind::EnumType, enum_id, &model.node(da).obj_ref);
                    }
                }
            }
        }
    }

    fn mark_do_type_references(
        &mut self,
        registry: &TypeTemplateRegistry,
        do_type: &DOType,
        user: &str,
        depth: usize,
        max_depth: usize,
    ) {
        if depth >= max_depth {
            return;
        }

        for sdo in &do_type.sub_data_objects {
            if let Some(sub_type) = registry.get_do_type(&sdo.type_id) {
                self.mark_used(TemplateKind::DOType, &sub_type.id, user);
                self.mark_do_type_references(registry, sub_type, user, depth + 1, max_depth);
            }
        }

        for da in &do_type.data_attributes {
            let Some(type_id) = da.type_id.as_deref() else {
                continue;
            };
            match da.attribute_type {
                AttributeType::Constructed => {
                    let Some(da_type) = registry.get_da_type(type_id) else {
                        continue;
                    };
                    self.mark_used(TemplateKind::DAType, type_id, user);
                    // One level only.
                    for bda in &da_type.sub_attributes {
                        if bda.attribute_type != AttributeType::Constructed {
                            continue;
                        }
                        if let Some(sub_id) = bda.type_id.as_deref() {
                            if registry.contains(TemplateKind::DAType, sub_id) {
                                self.mark_used(TemplateKind::DAType, sub_id, user);
                            }
                        }
                    }
                }
                AttributeType::Enumerated => {
                    if registry.contains(TemplateKind::EnumType, type_id) {
                        self.mark_used(TemplateKind::EnumType, type_id, user);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_used_is_idempotent() {
        let mut usage = UsageTracker::new();
        usage.mark_used(TemplateKind::DOType, "SPS_1", "LD/GGIO1.Ind1");
        usage.mark_used(TemplateKind::DOType, "SPS_1", "LD/GGIO1.Ind1");
        usage.mark_used(TemplateKind::DOType, "SPS_1", "LD/GGIO1.Ind2");
        assert!(usage.is_used(TemplateKind::DOType, "SPS_1"));
        assert_eq!(usage.used_on(TemplateKind::DOType, "SPS_1").len(), 2);
        assert!(!usage.is_used(TemplateKind::DAType, "SPS_1"));
    }

    #[test]
    fn test_reset_and_merge() {
        let mut a = UsageTracker::new();
        a.mark_used(TemplateKind::EnumType, "Beh", "LD/LLN0.Beh.stVal");
        let mut b = UsageTracker::new();
        b.mark_used(TemplateKind::EnumType, "Beh", "LD/LLN0.Beh.stVal");
        b.mark_used(TemplateKind::EnumType, "Beh", "LD2/LLN0.Beh.stVal");
        a.merge(b);
        assert_eq!(a.used_on(TemplateKind::EnumType, "Beh").len(), 2);
        a.reset_usage();
        assert!(!a.is_used(TemplateKind::EnumType, "Beh"));
        assert!(a.used_on(TemplateKind::EnumType, "Beh").is_empty());
    }
}
