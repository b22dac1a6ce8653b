// crates/iec61850-scl/src/emitter/mod.rs

//! Writes a resolved IED model in the static-model text format loaded by the
//! embedded server's configuration reader.
//!
//! The walk follows model order: logical devices, logical nodes, then per LN
//! the setting group, data objects, data sets and the control blocks. Each
//! statement ends with a newline.

use crate::error::SclError;
use crate::issues::IssueLog;
use crate::logging::ModelContext;
use crate::model::ConnectedAp;
use crate::parser::SclDocument;
use crate::resolver::ResolvedIed;
use crate::resolver::arena::{IedModel, NodeId, NodeKind};
use crate::templates::{AttributeType, DataAttributeDef, TypeTemplateRegistry};
use crate::validator;
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::{self, Write};

mod control;
mod dataset;

pub use control::RCB_OWNER_BIT;
pub use dataset::DataSetEntry;

/// Trigger-option bit added to every DA inside a transient data object.
pub const TRANSIENT_BIT: u32 = 128;

/// Tuning for [`emit_static_model`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// The server tracks report control block owners (`RC` trigger options +64).
    pub has_owner: bool,
}

/// Writes the static model of a resolved IED to `out`.
///
/// GSE and SMV addresses come from the document's ConnectedAP for the
/// resolved AccessPoint. Problems found while writing (currently only DataSet
/// members with an unreadable array index) are returned as issues.
///
/// # Errors
/// `SclError::FmtError` when the sink fails.
pub fn emit_static_model<W: Write>(
    resolved: &ResolvedIed<'_>,
    doc: &SclDocument,
    options: &EmitOptions,
    out: &mut W,
) -> Result<IssueLog, SclError> {
    let ctx = ModelContext::new(&resolved.ied.name, &resolved.access_point.name);
    scl_info!(ctx, "Writing static model");

    let mut emitter = StaticModelEmitter {
        registry: &doc.templates,
        model: &resolved.model,
        connected_ap: doc.connected_ap(&resolved.access_point.name, &resolved.ied.name),
        options,
        issues: IssueLog::new(),
        out,
    };
    emitter.write_model(ctx)?;

    scl_info!(ctx, "Static model written with {} issue(s)", emitter.issues.len());
    Ok(emitter.issues)
}

struct StaticModelEmitter<'m, 'a, W> {
    registry: &'m TypeTemplateRegistry,
    model: &'m IedModel<'a>,
    connected_ap: Option<&'m ConnectedAp>,
    options: &'m EmitOptions,
    issues: IssueLog,
    out: &'m mut W,
}

impl<W: Write> StaticModelEmitter<'_, '_, W> {
    fn write_model(&mut self, ctx: ModelContext<'_>) -> fmt::Result {
        let model = self.model;
        writeln!(self.out, "MODEL({}){{", model.name)?;

        for &ld in model.logical_devices() {
            let NodeKind::LogicalDevice { inst, .. } = &model.node(ld).kind else {
                continue;
            };
            writeln!(self.out, "LD({}){{", inst)?;
            let ld_ctx = ctx.with_ld(inst);
            for ln in model.logical_nodes(ld) {
                self.write_logical_node(ld_ctx, inst, ln)?;
            }
            writeln!(self.out, "}}")?;
        }

        writeln!(self.out, "}}")
    }

    fn write_logical_node(&mut self, ctx: ModelContext<'_>, ld_inst: &str, ln: NodeId) -> fmt::Result {
        let model = self.model;
        let node = model.node(ln);
        let NodeKind::LogicalNode { raw, .. } = &node.kind else {
            return Ok(());
        };
        let raw = *raw;

        writeln!(self.out, "LN({}){{", node.name)?;

        if let Some(sg) = &raw.setting_control {
            control::write_setting_group(self.out, sg)?;
        }

        for &child in model.children(ln) {
            self.write_data_object(child, false)?;
        }

        for data_set in &raw.data_set {
            dataset::write_data_set(self.out, data_set, ld_inst, &node.obj_ref, &mut self.issues)?;
        }

        for rc in &raw.report_control {
            control::write_report_control(self.out, rc, self.options.has_owner)?;
        }
        for lc in &raw.log_control {
            control::write_log_control(self.out, lc, ld_inst, &node.name)?;
        }
        for log in &raw.log {
            control::write_log(self.out, log)?;
        }

        for gc in &raw.gse_control {
            let gse = self.connected_ap.and_then(|cap| cap.gse(&gc.name));
            if gse.is_none() {
                scl_warn!(ctx, "GSEControl {} has no GSE entry in the Communication section", gc.name);
            }
            control::write_gse_control(self.out, gc, gse)?;
        }
        for smv in &raw.smv_control {
            let entry = self.connected_ap.and_then(|cap| cap.smv(&smv.name));
            if entry.is_none() {
                scl_warn!(ctx, "SampledValueControl {} has no SMV entry in the Communication section", smv.name);
            }
            control::write_smv_control(self.out, smv, entry.and_then(|e| e.address.as_ref()))?;
        }

        scl_trace!(
            ctx,
            "LN {}: {} DO, {} DS, {} RC, {} LC, {} GC, {} SMVC",
            node.name,
            model.children(ln).len(),
            raw.data_set.len(),
            raw.report_control.len(),
            raw.log_control.len(),
            raw.gse_control.len(),
            raw.smv_control.len()
        );

        writeln!(self.out, "}}")
    }

    // --- Data objects and attributes ---

    fn write_data_object(&mut self, id: NodeId, transient: bool) -> fmt::Result {
        let model = self.model;
        let node = model.node(id);
        let (count, own_transient) = match &node.kind {
            NodeKind::DataObject { count, transient, .. } => (*count, *transient),
            _ => return Ok(()),
        };
        let transient = transient || own_transient;

        writeln!(self.out, "DO({} {}){{", node.name, count)?;
        if count > 0 {
            for i in 0..count {
                writeln!(self.out, "[{}]{{", i)?;
                self.write_children(id, transient)?;
                writeln!(self.out, "}}")?;
            }
        } else {
            self.write_children(id, transient)?;
        }
        writeln!(self.out, "}}")
    }

    fn write_children(&mut self, id: NodeId, transient: bool) -> fmt::Result {
        let model = self.model;
        for &child in model.children(id) {
            if model.node(child).is_data_object() {
                self.write_data_object(child, transient)?;
            } else {
                self.write_data_attribute(child, transient)?;
            }
        }
        Ok(())
    }

    fn write_data_attribute(&mut self, id: NodeId, transient: bool) -> fmt::Result {
        let model = self.model;
        let node = model.node(id);
        let (fc, attribute_type, count, definition) = match &node.kind {
            NodeKind::DataAttribute {
                fc,
                attribute_type,
                count,
                definition,
            } => (*fc, *attribute_type, *count, *definition),
            _ => return Ok(()),
        };

        let mut trg_ops = definition.trigger_options.bits();
        if transient {
            trg_ops += TRANSIENT_BIT;
        }
        let s_addr = definition.s_addr.as_deref().filter(|s| !s.is_empty()).unwrap_or("0");

        write!(
            self.out,
            "DA({} {} {} {} {} {})",
            node.name,
            count,
            attribute_type.ordinal(),
            fc.ordinal(),
            trg_ops,
            s_addr
        )?;

        if count > 0 {
            writeln!(self.out, "{{")?;
            for i in 0..count {
                write!(self.out, "[{}]", i)?;
                self.write_attribute_body(id, attribute_type, definition, transient)?;
            }
            writeln!(self.out, "}}")
        } else {
            self.write_attribute_body(id, attribute_type, definition, transient)
        }
    }

    fn write_attribute_body(
        &mut self,
        id: NodeId,
        attribute_type: AttributeType,
        definition: &DataAttributeDef,
        transient: bool,
    ) -> fmt::Result {
        if attribute_type == AttributeType::Constructed {
            writeln!(self.out, "{{")?;
            let model = self.model;
            for &child in model.children(id) {
                self.write_data_attribute(child, transient)?;
            }
            return writeln!(self.out, "}}");
        }

        if let Some(value) = self.initial_value(id, attribute_type, definition) {
            write!(self.out, "={}", value)?;
        }
        writeln!(self.out, ";")
    }

    /// The DAI value configured for an attribute, encoded for the static model.
    fn initial_value(&self, id: NodeId, attribute_type: AttributeType, definition: &DataAttributeDef) -> Option<String> {
        let dai = validator::dai_for_attribute(self.model, id)?;
        let value = dai.value()?;
        encode_value(self.registry, attribute_type, definition, value)
    }
}

/// Encodes a configured value. Types the static model has no literal for
/// yield `None`, as does an enum symbol the EnumType does not define.
pub fn encode_value(
    registry: &TypeTemplateRegistry,
    attribute_type: AttributeType,
    definition: &DataAttributeDef,
    value: &str,
) -> Option<String> {
    use AttributeType::*;

    match attribute_type {
        Enumerated => {
            let enum_type = registry.get_enum_type(definition.type_id.as_deref()?)?;
            enum_type.ord_of(value.trim()).map(|ord| ord.to_string())
        }
        Int8 | Int16 | Int32 | Int64 | Int8U | Int16U | Int24U | Int32U | Float32 | Float64 => {
            Some(value.to_string())
        }
        Boolean => Some(if value.trim() == "true" { "1" } else { "0" }.to_string()),
        UnicodeString255 | Currency | VisibleString32 | VisibleString64 | VisibleString65
        | VisibleString129 | VisibleString255 | OctetString64 => Some(format!("\"{}\"", value)),
        _ => None,
    }
}
