//! Computation tape for reverse-mode automatic differentiation.
//!
//! Every forward operation records one node in the tape's arena. Edges are
//! plain indices rather than pointers, so a node may feed any number of
//! downstream nodes without shared-ownership bookkeeping, and the whole
//! graph is freed at once when the tape goes out of scope.

use std::cell::RefCell;

use num_traits::Float;
use uuid::Uuid;

use crate::var::Var;

/// Index of a node in a tape's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the position of the node in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One recorded scalar value: its forward value, the weighted edges to the
/// nodes computed from it, and the adjoint slot written by a reverse pass.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    value: T,
    /// `(local partial derivative, consumer)` pairs, appended when the
    /// consumer is created. A node used twice by one operation carries two
    /// edges to the same consumer.
    children: Vec<(T, NodeId)>,
    adjoint: Option<T>,
}

impl<T: Float> Node<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            children: Vec::new(),
            adjoint: None,
        }
    }
}

/// Arena of all nodes created during one forward evaluation.
///
/// Variables are created with [`Tape::var`]; arithmetic on the returned
/// [`Var`] handles appends nodes to the tape. The tape is single-threaded
/// (interior mutability via `RefCell`) and is meant to be rebuilt per
/// evaluation rather than reused across unrelated computations.
#[derive(Debug)]
pub struct Tape<T: Float> {
    id: Uuid,
    nodes: RefCell<Vec<Node<T>>>,
}

impl<T: Float> Tape<T> {
    /// Creates an empty tape.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes: RefCell::new(Vec::new()),
        }
    }

    /// Returns the unique id of this tape, used to report cross-tape misuse.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Records an input variable and returns a handle to it.
    pub fn var(&self, value: T) -> Var<'_, T> {
        let id = self.push(Node::new(value));
        Var::new(self, id, value)
    }

    /// Returns the number of recorded nodes.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Clears every adjoint slot.
    ///
    /// Each reverse pass does this on entry, so calling it by hand is only
    /// needed to discard gradients without running a new pass.
    pub fn zero_adjoints(&self) {
        for node in self.nodes.borrow_mut().iter_mut() {
            node.adjoint = None;
        }
    }

    /// Returns the adjoint written for `id` by the most recent reverse pass,
    /// or `None` if that pass never reached the node.
    pub(crate) fn adjoint(&self, id: NodeId) -> Option<T> {
        self.nodes.borrow()[id.0].adjoint
    }

    fn push(&self, node: Node<T>) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(node);
        id
    }

    /// Records the result of a unary operation: one new node, one edge from
    /// the operand weighted with the local partial derivative.
    pub(crate) fn push_unary(&self, parent: NodeId, value: T, weight: T) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node::new(value));
        nodes[parent.0].children.push((weight, id));
        id
    }

    /// Records the result of a binary operation on two tracked operands.
    /// When both handles name the same node (`x * x`), the node receives two
    /// edges to the result, one per usage.
    pub(crate) fn push_binary(
        &self,
        lhs: NodeId,
        rhs: NodeId,
        value: T,
        lhs_weight: T,
        rhs_weight: T,
    ) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node::new(value));
        nodes[lhs.0].children.push((lhs_weight, id));
        nodes[rhs.0].children.push((rhs_weight, id));
        id
    }

    /// Runs a reverse pass from `output`, writing the adjoint of every node
    /// the output depends on.
    ///
    /// Edges always point from older nodes to newer ones, so reverse
    /// creation order is a reverse topological order and a single sweep over
    /// the arena visits each node exactly once. No recursion, so chain depth
    /// is not bounded by the call stack.
    pub(crate) fn reverse(&self, output: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        for node in nodes.iter_mut() {
            node.adjoint = None;
        }
        nodes[output.0].adjoint = Some(T::one());
        for i in (0..output.0).rev() {
            let mut acc = T::zero();
            let mut reached = false;
            for k in 0..nodes[i].children.len() {
                let (weight, child) = nodes[i].children[k];
                // A child with no adjoint lies outside the output's
                // subgraph and contributes nothing.
                if let Some(adjoint) = nodes[child.0].adjoint {
                    acc = acc + weight * adjoint;
                    reached = true;
                }
            }
            if reached {
                nodes[i].adjoint = Some(acc);
            }
        }
    }
}

impl<T: Float> Default for Tape<T> {
    fn default() -> Self {
        Self::new()
    }
}
