// crates/iec61850-scl/src/resolver/expand.rs

//! Expansion of a logical node's type into DataObject/DataAttribute nodes.

use super::arena::{IedModel, NodeId, NodeKind};
use crate::error::SclError;
use crate::issues::IssueLog;
use crate::model::LnElement;
use crate::templates::{
    report_structural, AttributeType, DAType, DOType, DataAttributeDef, FunctionalConstraint,
    TemplateKind, TypeTemplateRegistry,
};
use crate::usage::UsageTracker;
use alloc::format;
use alloc::string::{String, ToString};
use log::trace;

/// Shared state of one expansion pass.
pub(crate) struct Expander<'a, 'p> {
    pub registry: &'a TypeTemplateRegistry,
    pub issues: &'p mut IssueLog,
    pub usage: &'p mut UsageTracker,
    pub max_depth: usize,
}

impl<'a> Expander<'a, '_> {
    /// Creates the LN node below `ld` and expands its LNodeType.
    ///
    /// An undefined LNodeType leaves the LN without data objects. A DO whose
    /// expansion hits the depth ceiling is removed again and reported.
    pub fn resolve_logical_node(
        &mut self,
        model: &mut IedModel<'a>,
        ld: NodeId,
        raw: &'a LnElement,
    ) -> NodeId {
        let kind = NodeKind::LogicalNode {
            prefix: raw.prefix.clone().unwrap_or_default(),
            ln_class: raw.ln_class.clone(),
            inst: raw.inst.clone(),
            raw,
            namespace: None,
        };
        let ln = model.add_child(ld, raw.name(), kind);
        let ln_ref = model.node(ln).obj_ref.clone();

        let Some(ln_type) = self.registry.get_lnode_type(&raw.ln_type) else {
            self.issues.error(
                ln_ref.as_str(),
                format!("LNType \"{}\" of LN \"{}\" is not defined", raw.ln_type, ln_ref),
            );
            return ln;
        };
        self.usage.mark_used(TemplateKind::LNodeType, &ln_type.id, &ln_ref);

        for do_def in &ln_type.data_objects {
            let Some(do_type) = self.registry.get_do_type(&do_def.type_id) else {
                self.issues.error(
                    format!("{}.{}", ln_ref, do_def.name),
                    format!("DOType \"{}\" of DO \"{}\" is not defined", do_def.type_id, do_def.name),
                );
                continue;
            };

            let mark = model.mark();
            let kind = NodeKind::DataObject {
                count: do_def.count,
                do_type,
                transient: do_def.transient,
            };
            let node = model.add_child(ln, do_def.name.clone(), kind);
            self.usage
                .mark_used(TemplateKind::DOType, &do_type.id, &model.node(node).obj_ref);

            if let Err(e) = self.expand_data_object(model, node, do_type, 1) {
                model.rollback(mark);
                report_structural(self.issues, e);
            }
        }

        trace!(
            "[SCL] Expanded {} into {} child nodes",
            ln_ref,
            model.children(ln).len()
        );
        ln
    }

    fn depth_check(&self, model: &IedModel<'a>, node: NodeId, depth: usize) -> Result<(), SclError> {
        if depth > self.max_depth {
            return Err(SclError::Structural {
                object: model.node(node).obj_ref.clone(),
                message: format!("type nesting exceeds {} levels", self.max_depth),
            });
        }
        Ok(())
    }

    fn expand_data_object(
        &mut self,
        model: &mut IedModel<'a>,
        parent: NodeId,
        do_type: &'a DOType,
        depth: usize,
    ) -> Result<(), SclError> {
        self.depth_check(model, parent, depth)?;

        for sdo in &do_type.sub_data_objects {
            let Some(sub_type) = self.registry.get_do_type(&sdo.type_id) else {
                self.issues.error(
                    format!("{}.{}", model.node(parent).obj_ref, sdo.name),
                    format!("DOType \"{}\" of DO \"{}\" is not defined", sdo.type_id, sdo.name),
                );
                continue;
            };
            let kind = NodeKind::DataObject {
                count: sdo.count,
                do_type: sub_type,
                transient: sdo.transient,
            };
            let node = model.add_child(parent, sdo.name.clone(), kind);
            self.usage
                .mark_used(TemplateKind::DOType, &sub_type.id, &model.node(node).obj_ref);
            self.expand_data_object(model, node, sub_type, depth + 1)?;
        }

        for da in &do_type.data_attributes {
            let node = self.add_attribute(model, parent, da, da.fc);
            match da.attribute_type {
                AttributeType::Constructed => {
                    let Some(da_type) = self.constructed_type(model, node, da) else {
                        continue;
                    };
                    let self_nested = format!("{}.{}", da.name, da.name);
                    if !model.node(node).obj_ref.ends_with(&self_nested) {
                        self.expand_sub_attributes(model, node, da.fc, da_type, depth + 1)?;
                    }
                }
                AttributeType::Enumerated => self.enum_type(model, node, da),
                _ => {}
            }
        }
        Ok(())
    }

    fn expand_sub_attributes(
        &mut self,
        model: &mut IedModel<'a>,
        parent: NodeId,
        fc: FunctionalConstraint,
        da_type: &'a DAType,
        depth: usize,
    ) -> Result<(), SclError> {
        self.depth_check(model, parent, depth)?;

        for bda in &da_type.sub_attributes {
            let bda_fc = if bda.fc == FunctionalConstraint::NONE { fc } else { bda.fc };
            let node = self.add_attribute(model, parent, bda, bda_fc);
            match bda.attribute_type {
                AttributeType::Constructed => {
                    if let Some(sub_type) = self.constructed_type(model, node, bda) {
                        self.expand_sub_attributes(model, node, bda_fc, sub_type, depth + 1)?;
                    }
                }
                AttributeType::Enumerated => self.enum_type(model, node, bda),
                _ => {}
            }
        }
        Ok(())
    }

    fn add_attribute(
        &mut self,
        model: &mut IedModel<'a>,
        parent: NodeId,
        def: &'a DataAttributeDef,
        fc: FunctionalConstraint,
    ) -> NodeId {
        let kind = NodeKind::DataAttribute {
            fc,
            attribute_type: def.attribute_type,
            count: def.count,
            definition: def,
        };
        model.add_child(parent, def.name.clone(), kind)
    }

    /// Looks up the DAType of a CONSTRUCTED attribute, reporting it when undefined.
    fn constructed_type(
        &mut self,
        model: &IedModel<'a>,
        node: NodeId,
        def: &DataAttributeDef,
    ) -> Option<&'a DAType> {
        let type_id = def.type_id.as_deref().unwrap_or_default();
        let obj_ref = &model.node(node).obj_ref;
        match self.registry.get_da_type(type_id) {
            Some(da_type) => {
                self.usage.mark_used(TemplateKind::DAType, type_id, obj_ref);
                Some(da_type)
            }
            None => {
                self.issues.error(
                    obj_ref.to_string(),
                    format!("DAType \"{}\" of DA \"{}\" is not defined", type_id, def.name),
                );
                None
            }
        }
    }

    fn enum_type(&mut self, model: &IedModel<'a>, node: NodeId, def: &DataAttributeDef) {
        let type_id = def.type_id.as_deref().unwrap_or_default();
        let obj_ref = &model.node(node).obj_ref;
        if self.registry.contains(TemplateKind::EnumType, type_id) {
            self.usage.mark_used(TemplateKind::EnumType, type_id, obj_ref);
        } else {
            self.issues.error(
                String::from(obj_ref.as_str()),
                format!("EnumType \"{}\" of DA \"{}\" is not defined", type_id, def.name),
            );
        }
    }
}
