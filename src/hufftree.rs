use std::fmt::Write as _;

use tracing::debug;

use crate::error::Result;
use crate::frequency::{FrequencyTable, SYMBOLS};
use crate::min_heap::{Element, MinHeap};

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
    /// Root of a tree with a single distinct byte. It repeats its only
    /// child's byte and weight and has no branches, so that byte is coded
    /// with zero bits.
    Solo {
        weight: u64,
        byte: u8,
        child: NodeId,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. }
            | HuffNode::Internal { weight, .. }
            | HuffNode::Solo { weight, .. } => *weight,
        }
    }

    /// The byte this node stands for, if it terminates a code.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            HuffNode::Leaf { byte, .. } | HuffNode::Solo { byte, .. } => Some(*byte),
            HuffNode::Internal { .. } => None,
        }
    }

    /// `(left, right)` for branching nodes; `None` where traversal stops.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self {
            HuffNode::Internal { left, right, .. } => Some((*left, *right)),
            _ => None,
        }
    }
}

/// Huffman tree stored as an arena of nodes. Children always precede their
/// parent in the arena and the root is the last node pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
}

impl HuffmanTree {
    /// Builds the tree for a frequency table.
    ///
    /// Returns `Ok(None)` when every count is zero. The same table always
    /// yields the same tree, which is what lets the decoder rebuild it from
    /// the header alone.
    pub fn build(frequencies: &FrequencyTable) -> Result<Option<Self>> {
        let mut nodes = Vec::with_capacity(2 * SYMBOLS);
        let mut heap = MinHeap::with_capacity(frequencies.distinct());

        for (byte, count) in frequencies.iter_nonzero() {
            let weight = count as u64;
            let id = push(&mut nodes, HuffNode::Leaf { weight, byte });
            heap.insert(Element::new(weight, id));
        }

        let n = heap.heap_size();
        debug!(distinct = n, "building huffman tree");

        match n {
            0 => return Ok(None),
            1 => {
                let leaf = heap.extract_min()?;
                let byte = nodes[leaf.data.0].symbol().unwrap_or_default();
                let root = push(
                    &mut nodes,
                    HuffNode::Solo {
                        weight: leaf.weight,
                        byte,
                        child: leaf.data,
                    },
                );
                return Ok(Some(HuffmanTree { nodes, root }));
            }
            _ => {}
        }

        for _ in 0..n - 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;
            let weight = x.weight + y.weight;
            let z = push(
                &mut nodes,
                HuffNode::Internal {
                    weight,
                    left: x.data,
                    right: y.data,
                },
            );
            heap.insert(Element::new(weight, z));
        }

        let root = heap.extract_min()?.data;
        debug!(nodes = nodes.len(), "huffman tree built");
        Ok(Some(HuffmanTree { nodes, root }))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True for the one-symbol tree whose root carries the byte itself.
    pub fn is_single_symbol(&self) -> bool {
        self.node(self.root).children().is_none()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id).children() {
                Some((left, right)) => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
                None => deepest = deepest.max(depth),
            }
        }
        deepest
    }

    /// Indented pre-order dump of the tree, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize, "root")];
        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            let _ = match self.node(id) {
                HuffNode::Leaf { byte, weight } | HuffNode::Solo { byte, weight, .. } => writeln!(
                    out,
                    "{}{}-> Leaf: {:?} ({}) [weight: {}]",
                    indent, label, *byte as char, byte, weight
                ),
                HuffNode::Internal { weight, left, right } => {
                    stack.push((*right, depth + 1, "R"));
                    stack.push((*left, depth + 1, "L"));
                    writeln!(out, "{}{}-> Internal [weight: {}]", indent, label, weight)
                }
            };
        }
        out
    }
}

fn push(nodes: &mut Vec<HuffNode>, node: HuffNode) -> NodeId {
    nodes.push(node);
    NodeId(nodes.len() - 1)
}
