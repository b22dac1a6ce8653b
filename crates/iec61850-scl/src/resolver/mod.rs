// crates/iec61850-scl/src/resolver/mod.rs

//! Builds the resolved data model of one IED/AccessPoint and runs the model
//! checks over it.
//!
//! Resolution is best-effort: an unresolved type only truncates its own
//! subtree, and every problem ends up in the returned [`IssueLog`].

use crate::communication;
use crate::error::SclError;
use crate::issues::IssueLog;
use crate::logging::ModelContext;
use crate::model::{AccessPoint, Ied};
use crate::namespace;
use crate::parser::SclDocument;
use crate::usage::UsageTracker;
use crate::validator;
use alloc::format;
use alloc::string::ToString;

// --- Sub-modules ---

pub mod arena;
mod expand;

use arena::{IedModel, NodeKind};
use expand::Expander;

/// Tuning for [`resolve_ied`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum nesting of SDO/DA/BDA expansion below a top-level DO.
    pub max_depth: usize,
    /// Check DataSet FCDAs against the templates once the model is built.
    pub check_fcda_references: bool,
    /// Require `LLN0.NamPlt.configRev` on every logical device.
    pub check_config_rev: bool,
    /// Check `ldNs`/`lnNs` against the known NSD namespaces.
    pub check_namespaces: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            check_fcda_references: true,
            check_config_rev: true,
            check_namespaces: true,
        }
    }
}

/// The outcome of resolving one IED/AccessPoint pair.
#[derive(Debug)]
pub struct ResolvedIed<'a> {
    pub model: IedModel<'a>,
    pub issues: IssueLog,
    /// Templates touched while expanding this model.
    pub usage: UsageTracker,
    pub ied: &'a Ied,
    pub access_point: &'a AccessPoint,
}

/// Resolves an IED's data model for one AccessPoint.
///
/// With `ap_name == None` the first AccessPoint is used. The logical device
/// name is `ldName` when present, otherwise `iedName + inst`.
///
/// # Errors
/// `IedNotFound` / `AccessPointNotFound` when the names do not exist. Problems
/// inside the model never fail the call; they are returned as issues.
pub fn resolve_ied<'a>(
    doc: &'a SclDocument,
    ied_name: &str,
    ap_name: Option<&str>,
    options: &ResolveOptions,
) -> Result<ResolvedIed<'a>, SclError> {
    let ied = doc.ied(ied_name).ok_or_else(|| SclError::IedNotFound {
        ied: ied_name.to_string(),
    })?;
    let access_point = ied
        .access_point
        .iter()
        .find(|ap| ap_name.is_none_or(|name| ap.name == name))
        .ok_or_else(|| SclError::AccessPointNotFound {
            ied: ied_name.to_string(),
            access_point: ap_name.unwrap_or_default().to_string(),
        })?;

    let ctx = ModelContext::new(&ied.name, &access_point.name);
    scl_info!(ctx, "Resolving data model");

    let mut model = IedModel::new(ied.name.as_str());
    let mut issues = IssueLog::new();
    let mut usage = UsageTracker::new();

    let ldevices = access_point.server.iter().flat_map(|s| s.ldevice.iter());
    for ldevice in ldevices {
        let ld_name = ldevice
            .ld_name
            .clone()
            .unwrap_or_else(|| format!("{}{}", ied.name, ldevice.inst));
        let ld = model.add_logical_device(ld_name, ldevice.inst.clone(), ldevice);
        let ld_ctx = ctx.with_ld(&ldevice.inst);

        for raw_ln in ldevice.logical_nodes() {
            let ln = Expander {
                registry: &doc.templates,
                issues: &mut issues,
                usage: &mut usage,
                max_depth: options.max_depth,
            }
            .resolve_logical_node(&mut model, ld, raw_ln);

            scl_debug!(
                ld_ctx,
                "Resolved LN {} with {} data objects",
                model.node(ln).name,
                model.children(ln).len()
            );

            validator::validate_logical_node(&doc.templates, &model, ln, &mut issues);

            if options.check_config_rev && raw_ln.ln_class == "LLN0" {
                validator::check_config_rev(&model, &ldevice.inst, ln, &mut issues);
            }
            if options.check_namespaces {
                namespace::check_namespaces(&mut model, ld, ln, &mut issues);
            }
        }
    }

    if options.check_fcda_references {
        validator::check_fcda_references(&doc.templates, &model, &mut issues);
    }

    if let Some(cap) = doc.connected_ap(&access_point.name, &ied.name) {
        communication::check_connected_ap(cap, &mut issues);
    } else {
        scl_debug!(ctx, "No ConnectedAP in the Communication section");
    }

    let lds = model.logical_devices().len();
    let lns: usize = model
        .logical_devices()
        .iter()
        .map(|&ld| model.logical_nodes(ld).count())
        .sum();
    scl_info!(
        ctx,
        "Resolved {} LD(s), {} LN(s), {} node(s), {} issue(s)",
        lds,
        lns,
        model.len(),
        issues.len()
    );

    Ok(ResolvedIed {
        model,
        issues,
        usage,
        ied,
        access_point,
    })
}

impl<'a> ResolvedIed<'a> {
    /// Re-runs the whole-model usage pass over this model, replacing `usage`.
    pub fn track_usage(&mut self, doc: &SclDocument, options: &ResolveOptions) {
        self.usage
            .mark_model(&doc.templates, &self.model, options.max_depth);
    }

    /// Logical node names per logical device instance, in model order.
    pub fn logical_node_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.model.logical_devices().iter().flat_map(move |&ld| {
            let inst = match &self.model.node(ld).kind {
                NodeKind::LogicalDevice { inst, .. } => inst.as_str(),
                _ => "",
            };
            self.model
                .logical_nodes(ld)
                .map(move |ln| (inst, self.model.node(ln).name.as_str()))
        })
    }
}
