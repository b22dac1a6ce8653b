// crates/iec61850-scl/src/resolver/arena.rs

//! Flat node table for one resolved IED model.
//!
//! Every node stores the index of its parent and the indices of its children,
//! so the tree can be walked in both directions without reference cycles.

use crate::model::{LDevice, LnElement};
use crate::namespace::Namespace;
use crate::templates::{AttributeType, DataAttributeDef, DOType, FunctionalConstraint};
use alloc::string::String;
use alloc::vec::Vec;

/// Handle of a node inside an [`IedModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node is, with the data specific to that level.
#[derive(Debug, Clone)]
pub enum NodeKind<'a> {
    LogicalDevice {
        inst: String,
        raw: &'a LDevice,
        namespace: Option<Namespace>,
    },
    LogicalNode {
        prefix: String,
        ln_class: String,
        inst: String,
        raw: &'a LnElement,
        namespace: Option<Namespace>,
    },
    DataObject {
        count: u32,
        do_type: &'a DOType,
        transient: bool,
    },
    DataAttribute {
        fc: FunctionalConstraint,
        attribute_type: AttributeType,
        count: u32,
        definition: &'a DataAttributeDef,
    },
}

#[derive(Debug, Clone)]
pub struct Node<'a> {
    pub name: String,
    pub obj_ref: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind<'a>,
}

impl Node<'_> {
    pub fn is_logical_device(&self) -> bool {
        matches!(self.kind, NodeKind::LogicalDevice { .. })
    }

    pub fn is_logical_node(&self) -> bool {
        matches!(self.kind, NodeKind::LogicalNode { .. })
    }

    pub fn is_data_object(&self) -> bool {
        matches!(self.kind, NodeKind::DataObject { .. })
    }

    pub fn is_data_attribute(&self) -> bool {
        matches!(self.kind, NodeKind::DataAttribute { .. })
    }

    /// The type of a data attribute node; `None` for any other level.
    pub fn attribute_type(&self) -> Option<AttributeType> {
        match &self.kind {
            NodeKind::DataAttribute { attribute_type, .. } => Some(*attribute_type),
            _ => None,
        }
    }

    pub fn namespace(&self) -> Option<&Namespace> {
        match &self.kind {
            NodeKind::LogicalDevice { namespace, .. } | NodeKind::LogicalNode { namespace, .. } => {
                namespace.as_ref()
            }
            _ => None,
        }
    }
}

/// The resolved data model of one IED for one AccessPoint.
#[derive(Debug, Clone)]
pub struct IedModel<'a> {
    pub name: String,
    nodes: Vec<Node<'a>>,
    logical_devices: Vec<NodeId>,
}

impl<'a> IedModel<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            logical_devices: Vec::new(),
        }
    }

    // --- Construction ---

    /// Adds a logical device; its objRef is its name.
    pub fn add_logical_device(&mut self, name: String, inst: String, raw: &'a LDevice) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            obj_ref: name.clone(),
            name,
            parent: None,
            children: Vec::new(),
            kind: NodeKind::LogicalDevice {
                inst,
                raw,
                namespace: None,
            },
        });
        self.logical_devices.push(id);
        id
    }

    /// Appends a child under `parent`. The objRef separator is `/` below a
    /// logical device and `.` everywhere else.
    pub fn add_child(&mut self, parent: NodeId, name: String, kind: NodeKind<'a>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent_node = &self.nodes[parent.0];
        let separator = if parent_node.is_logical_device() { '/' } else { '.' };

        let mut obj_ref = String::with_capacity(parent_node.obj_ref.len() + 1 + name.len());
        obj_ref.push_str(&parent_node.obj_ref);
        obj_ref.push(separator);
        obj_ref.push_str(&name);

        self.nodes.push(Node {
            name,
            obj_ref,
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Renames a node. Only its own objRef suffix changes; descendants keep the
    /// objRef they were created with.
    pub fn rename(&mut self, id: NodeId, new_name: impl Into<String>) {
        let new_name = new_name.into();
        let node = &mut self.nodes[id.0];
        let keep = node.obj_ref.len().saturating_sub(node.name.len());
        node.obj_ref.truncate(keep);
        node.obj_ref.push_str(&new_name);
        node.name = new_name;
    }

    pub(crate) fn set_namespace(&mut self, id: NodeId, ns: Namespace) {
        match &mut self.nodes[id.0].kind {
            NodeKind::LogicalDevice { namespace, .. } | NodeKind::LogicalNode { namespace, .. } => {
                *namespace = Some(ns);
            }
            _ => {}
        }
    }

    /// Current size of the node table, used with [`rollback`](Self::rollback).
    pub(crate) fn mark(&self) -> usize {
        self.nodes.len()
    }

    /// Drops every node created after `mark` and all links to them.
    pub(crate) fn rollback(&mut self, mark: usize) {
        self.nodes.truncate(mark);
        for node in &mut self.nodes {
            node.children.retain(|c| c.0 < mark);
        }
        self.logical_devices.retain(|ld| ld.0 < mark);
    }

    // --- Navigation ---

    pub fn node(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<'a>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn logical_devices(&self) -> &[NodeId] {
        &self.logical_devices
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Child of `id` with the given name.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].name == name)
    }

    /// Looks a node up by its objRef (`LD/LN.DO[.SDO].DA[.BDA]`).
    pub fn find(&self, obj_ref: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.obj_ref == obj_ref).map(|(id, _)| id)
    }

    /// Pre-order walk of the subtree below `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// The logical device a node belongs to.
    pub fn enclosing_logical_device(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            if self.nodes[id.0].is_logical_device() {
                return Some(id);
            }
            id = self.nodes[id.0].parent?;
        }
    }

    /// The logical node a data object or attribute belongs to.
    pub fn enclosing_logical_node(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            if self.nodes[id.0].is_logical_node() {
                return Some(id);
            }
            id = self.nodes[id.0].parent?;
        }
    }

    /// The data object directly below the logical node that contains `id`.
    pub fn top_level_data_object(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            let parent = self.nodes[id.0].parent?;
            if self.nodes[parent.0].is_logical_node() {
                return self.nodes[id.0].is_data_object().then_some(id);
            }
            id = parent;
        }
    }

    pub fn logical_nodes(&self, ld: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(ld)
            .iter()
            .copied()
            .filter(|c| self.nodes[c.0].is_logical_node())
    }

    /// The logical node with the given name inside `ld`.
    pub fn logical_node(&self, ld: NodeId, name: &str) -> Option<NodeId> {
        self.logical_nodes(ld).find(|ln| self.nodes[ln.0].name == name)
    }

    pub fn logical_device_by_inst(&self, inst: &str) -> Option<NodeId> {
        self.logical_devices.iter().copied().find(|ld| {
            matches!(&self.nodes[ld.0].kind, NodeKind::LogicalDevice { inst: i, .. } if i == inst)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::DOType;

    fn do_type() -> DOType {
        DOType {
            id: "SPS_1".into(),
            cdc: "SPS".into(),
            sub_data_objects: Vec::new(),
            data_attributes: Vec::new(),
        }
    }

    #[test]
    fn test_obj_ref_separators() {
        let ld_raw = LDevice::default();
        let ln_raw = LnElement::default();
        let dot = do_type();

        let mut model = IedModel::new("IED1");
        let ld = model.add_logical_device("IED1LD0".into(), "LD0".into(), &ld_raw);
        let ln = model.add_child(
            ld,
            "GGIO1".into(),
            NodeKind::LogicalNode {
                prefix: String::new(),
                ln_class: "GGIO".into(),
                inst: "1".into(),
                raw: &ln_raw,
                namespace: None,
            },
        );
        let d = model.add_child(
            ln,
            "Ind1".into(),
            NodeKind::DataObject {
                count: 0,
                do_type: &dot,
                transient: false,
            },
        );
        assert_eq!(model.node(ln).obj_ref, "IED1LD0/GGIO1");
        assert_eq!(model.node(d).obj_ref, "IED1LD0/GGIO1.Ind1");
        assert_eq!(model.find("IED1LD0/GGIO1.Ind1"), Some(d));
        assert_eq!(model.top_level_data_object(d), Some(d));
    }

    #[test]
    fn test_rename_does_not_touch_descendants() {
        let ld_raw = LDevice::default();
        let ln_raw = LnElement::default();
        let dot = do_type();

        let mut model = IedModel::new("IED1");
        let ld = model.add_logical_device("LD".into(), "LD".into(), &ld_raw);
        let ln = model.add_child(
            ld,
            "LLN0".into(),
            NodeKind::LogicalNode {
                prefix: String::new(),
                ln_class: "LLN0".into(),
                inst: String::new(),
                raw: &ln_raw,
                namespace: None,
            },
        );
        let d = model.add_child(
            ln,
            "Mod".into(),
            NodeKind::DataObject {
                count: 0,
                do_type: &dot,
                transient: false,
            },
        );
        model.rename(ln, "LLN1");
        assert_eq!(model.node(ln).obj_ref, "LD/LLN1");
        assert_eq!(model.node(d).obj_ref, "LD/LLN0.Mod");
    }

    #[test]
    fn test_rollback_unlinks_children() {
        let ld_raw = LDevice::default();
        let ln_raw = LnElement::default();
        let mut model = IedModel::new("IED1");
        let ld = model.add_logical_device("LD".into(), "LD".into(), &ld_raw);
        let mark = model.mark();
        model.add_child(
            ld,
            "LLN0".into(),
            NodeKind::LogicalNode {
                prefix: String::new(),
                ln_class: "LLN0".into(),
                inst: String::new(),
                raw: &ln_raw,
                namespace: None,
            },
        );
        model.rollback(mark);
        assert_eq!(model.len(), 1);
        assert!(model.children(ld).is_empty());
    }
}
