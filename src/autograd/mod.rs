//! Reverse-mode automatic differentiation over small fixed-size vectors.
//!
//! A [`Var`] is either a plain constant, a shared [`Var::variable`] that owns a gradient
//! buffer, or the result of an operation that remembers its operands. Calling
//! [`Var::backward`] on a result walks the recorded graph back to its variables and adds
//! the propagated gradient into their buffers.
//!
//! Operations whose operands are all constants produce constants directly, so untracked
//! arithmetic never allocates graph nodes.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::{Scalar, Vector};

mod ops;

pub use ops::BackwardOp;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GradError {
    #[error("vector has no gradient (not a variable)")]
    NotAVariable,
}

/// Backward pass of a node that recomputes its operands on demand instead of storing
/// them, e.g. a Monte Carlo integral that re-draws its samples.
pub trait Replay<T, const N: usize>: Send + Sync {
    fn replay(&self, grad: &Vector<T, N>);
}

pub(crate) struct Node<T, const N: usize> {
    value: Vector<T, N>,
    kind: NodeKind<T, N>,
}

enum NodeKind<T, const N: usize> {
    Variable(Mutex<Vector<T, N>>),
    Operation(BackwardOp<T, N>),
}

#[derive(Clone)]
enum Repr<T, const N: usize> {
    Constant(Vector<T, N>),
    Node(Arc<Node<T, N>>),
}

/// A vector that may participate in the computation graph.
///
/// Cloning is cheap: constants are copied and tracked nodes are reference counted, so a
/// single variable can be shared by any number of operations.
#[derive(Clone)]
pub struct Var<T, const N: usize>(Repr<T, N>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Constant,
    Variable,
    Operation(&'static str),
}

impl<T: Scalar, const N: usize> Var<T, N> {
    pub fn constant(value: Vector<T, N>) -> Self {
        Self(Repr::Constant(value))
    }

    /// Creates a leaf that accumulates gradients, starting from zero.
    pub fn variable(value: Vector<T, N>) -> Self {
        Self(Repr::Node(Arc::new(Node {
            value,
            kind: NodeKind::Variable(Mutex::new(Vector::zeros())),
        })))
    }

    pub fn from_op(value: Vector<T, N>, op: BackwardOp<T, N>) -> Self {
        Self(Repr::Node(Arc::new(Node {
            value,
            kind: NodeKind::Operation(op),
        })))
    }

    pub fn zeros() -> Self {
        Self::constant(Vector::zeros())
    }

    #[inline]
    pub fn value(&self) -> Vector<T, N> {
        match &self.0 {
            Repr::Constant(v) => *v,
            Repr::Node(node) => node.value,
        }
    }

    /// The current value without any graph structure.
    #[inline]
    pub fn detach(&self) -> Vector<T, N> {
        self.value()
    }

    #[inline]
    pub fn requires_grad(&self) -> bool {
        matches!(self.0, Repr::Node(_))
    }

    pub fn kind(&self) -> VarKind {
        match &self.0 {
            Repr::Constant(_) => VarKind::Constant,
            Repr::Node(node) => match &node.kind {
                NodeKind::Variable(_) => VarKind::Variable,
                NodeKind::Operation(op) => VarKind::Operation(op.name()),
            },
        }
    }

    /// Gradient accumulated so far. Only variables have one.
    pub fn grad(&self) -> Result<Vector<T, N>, GradError> {
        match &self.0 {
            Repr::Node(node) => match &node.kind {
                NodeKind::Variable(grad) => Ok(*grad.lock()),
                NodeKind::Operation(_) => Err(GradError::NotAVariable),
            },
            Repr::Constant(_) => Err(GradError::NotAVariable),
        }
    }

    /// Resets the gradient buffer. Never called implicitly.
    pub fn zero_grad(&self) -> Result<(), GradError> {
        match &self.0 {
            Repr::Node(node) => match &node.kind {
                NodeKind::Variable(grad) => {
                    *grad.lock() = Vector::zeros();
                    Ok(())
                }
                NodeKind::Operation(_) => Err(GradError::NotAVariable),
            },
            Repr::Constant(_) => Err(GradError::NotAVariable),
        }
    }

    /// Propagates `grad` to every variable this value was computed from.
    pub fn backward(&self, grad: Vector<T, N>) {
        if let Repr::Node(node) = &self.0 {
            match &node.kind {
                NodeKind::Variable(buf) => *buf.lock() += grad,
                NodeKind::Operation(op) => op.backward(&grad),
            }
        }
    }

    /// True if both handles refer to the same graph node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Node(a), Repr::Node(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: Scalar, const N: usize> Default for Var<T, N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T: Scalar, const N: usize> From<Vector<T, N>> for Var<T, N> {
    fn from(value: Vector<T, N>) -> Self {
        Self::constant(value)
    }
}

impl<T: Scalar, const N: usize> fmt::Debug for Var<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("kind", &self.kind())
            .field("value", &self.value())
            .finish()
    }
}
