use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::autograd::{Replay, Var};
use crate::{Scalar, Vector};

/// Backward record of an operation node. Each variant holds the operands and scalar
/// coefficients needed to apply its local Jacobian to an incoming gradient.
pub enum BackwardOp<T, const N: usize> {
    Add(Var<T, N>, Var<T, N>),
    Sub(Var<T, N>, Var<T, N>),
    Mul(Var<T, N>, Var<T, N>),
    Div(Var<T, N>, Var<T, N>),
    ScalarMul(Var<T, N>, T),
    ScalarDiv(Var<T, N>, T),
    /// `(emission + scattered) * inv_survival`, the radiance leaving a path vertex.
    ScatterCombine {
        emission: Var<T, N>,
        scattered: Var<T, N>,
        inv_survival: T,
    },
    /// `sum(term * weight)` over any number of terms, held flat in one node.
    WeightedSum(Vec<(Var<T, N>, T)>),
    IntegratorReplay(Box<dyn Replay<T, N>>),
}

impl<T: Scalar, const N: usize> BackwardOp<T, N> {
    pub fn name(&self) -> &'static str {
        match self {
            BackwardOp::Add(..) => "Add",
            BackwardOp::Sub(..) => "Sub",
            BackwardOp::Mul(..) => "Mul",
            BackwardOp::Div(..) => "Div",
            BackwardOp::ScalarMul(..) => "ScalarMul",
            BackwardOp::ScalarDiv(..) => "ScalarDiv",
            BackwardOp::ScatterCombine { .. } => "ScatterCombine",
            BackwardOp::WeightedSum(_) => "WeightedSum",
            BackwardOp::IntegratorReplay(_) => "IntegratorReplay",
        }
    }

    pub(crate) fn backward(&self, grad: &Vector<T, N>) {
        let grad = *grad;
        match self {
            BackwardOp::Add(lhs, rhs) => {
                lhs.backward(grad);
                rhs.backward(grad);
            }
            BackwardOp::Sub(lhs, rhs) => {
                lhs.backward(grad);
                rhs.backward(-grad);
            }
            BackwardOp::Mul(lhs, rhs) => {
                lhs.backward(rhs.detach() * grad);
                rhs.backward(lhs.detach() * grad);
            }
            BackwardOp::Div(lhs, rhs) => {
                let r = rhs.detach();
                lhs.backward(grad / r);
                rhs.backward(-lhs.detach() * grad / (r * r));
            }
            BackwardOp::ScalarMul(v, s) => v.backward(grad * *s),
            BackwardOp::ScalarDiv(v, s) => v.backward(grad / *s),
            BackwardOp::ScatterCombine { emission, scattered, inv_survival } => {
                let g = grad * *inv_survival;
                emission.backward(g);
                scattered.backward(g);
            }
            BackwardOp::WeightedSum(terms) => {
                for (term, weight) in terms {
                    term.backward(grad * *weight);
                }
            }
            BackwardOp::IntegratorReplay(replay) => replay.replay(&grad),
        }
    }
}

impl<T: Scalar, const N: usize> fmt::Debug for BackwardOp<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn binary<T: Scalar, const N: usize>(
    lhs: &Var<T, N>,
    rhs: &Var<T, N>,
    value: Vector<T, N>,
    op: fn(Var<T, N>, Var<T, N>) -> BackwardOp<T, N>,
) -> Var<T, N> {
    if !lhs.requires_grad() && !rhs.requires_grad() {
        return Var::constant(value);
    }
    Var::from_op(value, op(lhs.clone(), rhs.clone()))
}

fn scalar<T: Scalar, const N: usize>(
    v: &Var<T, N>,
    s: T,
    value: Vector<T, N>,
    op: fn(Var<T, N>, T) -> BackwardOp<T, N>,
) -> Var<T, N> {
    if !v.requires_grad() {
        return Var::constant(value);
    }
    Var::from_op(value, op(v.clone(), s))
}

impl<T: Scalar, const N: usize> Var<T, N> {
    /// Radiance leaving a path vertex: `(emission + scattered) * inv_survival`.
    pub fn scatter_combine(emission: &Self, scattered: &Self, inv_survival: T) -> Self {
        let value = (emission.value() + scattered.value()) * inv_survival;
        if !emission.requires_grad() && !scattered.requires_grad() {
            return Var::constant(value);
        }
        Var::from_op(value, BackwardOp::ScatterCombine {
            emission: emission.clone(),
            scattered: scattered.clone(),
            inv_survival,
        })
    }

    /// `sum(term * weight)` as a single node, however many terms there are. Constant
    /// terms only contribute their value.
    pub fn weighted_sum<I: IntoIterator<Item = (Self, T)>>(terms: I) -> Self {
        let mut value = Vector::zeros();
        let mut tracked = Vec::new();
        for (term, weight) in terms {
            value += term.value() * weight;
            if term.requires_grad() {
                tracked.push((term, weight));
            }
        }
        if tracked.is_empty() {
            return Var::constant(value);
        }
        Var::from_op(value, BackwardOp::WeightedSum(tracked))
    }
}

macro_rules! impl_binary_op {
    ($op_trait:ident, $op_fn:ident, $assign_trait:ident, $assign_fn:ident, $variant:ident, $op:tt) => {
        impl<'a, 'b, T: Scalar, const N: usize> $op_trait<&'b Var<T, N>> for &'a Var<T, N> {
            type Output = Var<T, N>;

            fn $op_fn(self, rhs: &'b Var<T, N>) -> Var<T, N> {
                binary(self, rhs, self.value() $op rhs.value(), BackwardOp::$variant)
            }
        }

        impl<T: Scalar, const N: usize> $op_trait<Var<T, N>> for Var<T, N> {
            type Output = Var<T, N>;

            fn $op_fn(self, rhs: Var<T, N>) -> Var<T, N> {
                &self $op &rhs
            }
        }

        impl<'b, T: Scalar, const N: usize> $op_trait<&'b Var<T, N>> for Var<T, N> {
            type Output = Var<T, N>;

            fn $op_fn(self, rhs: &'b Var<T, N>) -> Var<T, N> {
                &self $op rhs
            }
        }

        impl<'a, T: Scalar, const N: usize> $op_trait<Var<T, N>> for &'a Var<T, N> {
            type Output = Var<T, N>;

            fn $op_fn(self, rhs: Var<T, N>) -> Var<T, N> {
                self $op &rhs
            }
        }

        impl<T: Scalar, const N: usize> $op_trait<Vector<T, N>> for Var<T, N> {
            type Output = Var<T, N>;

            fn $op_fn(self, rhs: Vector<T, N>) -> Var<T, N> {
                &self $op &Var::constant(rhs)
            }
        }

        impl<'a, T: Scalar, const N: usize> $op_trait<Vector<T, N>> for &'a Var<T, N> {
            type Output = Var<T, N>;

            fn $op_fn(self, rhs: Vector<T, N>) -> Var<T, N> {
                self $op &Var::constant(rhs)
            }
        }

        impl<T: Scalar, const N: usize> $op_trait<Var<T, N>> for Vector<T, N> {
            type Output = Var<T, N>;

            fn $op_fn(self, rhs: Var<T, N>) -> Var<T, N> {
                &Var::constant(self) $op &rhs
            }
        }

        impl<'b, T: Scalar, const N: usize> $op_trait<&'b Var<T, N>> for Vector<T, N> {
            type Output = Var<T, N>;

            fn $op_fn(self, rhs: &'b Var<T, N>) -> Var<T, N> {
                &Var::constant(self) $op rhs
            }
        }

        impl<T: Scalar, const N: usize> $assign_trait<Var<T, N>> for Var<T, N> {
            fn $assign_fn(&mut self, rhs: Var<T, N>) {
                *self = &*self $op &rhs;
            }
        }

        impl<T: Scalar, const N: usize> $assign_trait<Vector<T, N>> for Var<T, N> {
            fn $assign_fn(&mut self, rhs: Vector<T, N>) {
                *self = &*self $op rhs;
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, Add, +);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, Sub, -);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, Mul, *);
impl_binary_op!(Div, div, DivAssign, div_assign, Div, /);

impl<'a, T: Scalar, const N: usize> Mul<T> for &'a Var<T, N> {
    type Output = Var<T, N>;

    fn mul(self, rhs: T) -> Var<T, N> {
        scalar(self, rhs, self.value() * rhs, BackwardOp::ScalarMul)
    }
}

impl<T: Scalar, const N: usize> Mul<T> for Var<T, N> {
    type Output = Var<T, N>;

    fn mul(self, rhs: T) -> Var<T, N> {
        &self * rhs
    }
}

impl<'a, T: Scalar, const N: usize> Div<T> for &'a Var<T, N> {
    type Output = Var<T, N>;

    fn div(self, rhs: T) -> Var<T, N> {
        scalar(self, rhs, self.value() / rhs, BackwardOp::ScalarDiv)
    }
}

impl<T: Scalar, const N: usize> Div<T> for Var<T, N> {
    type Output = Var<T, N>;

    fn div(self, rhs: T) -> Var<T, N> {
        &self / rhs
    }
}

impl<T: Scalar, const N: usize> MulAssign<T> for Var<T, N> {
    fn mul_assign(&mut self, rhs: T) {
        *self = &*self * rhs;
    }
}

impl<T: Scalar, const N: usize> DivAssign<T> for Var<T, N> {
    fn div_assign(&mut self, rhs: T) {
        *self = &*self / rhs;
    }
}

impl_scalar_lhs_ops!(Var; f32, f64);

impl<'a, T: Scalar, const N: usize> Neg for &'a Var<T, N> {
    type Output = Var<T, N>;

    fn neg(self) -> Var<T, N> {
        self * -T::one()
    }
}

impl<T: Scalar, const N: usize> Neg for Var<T, N> {
    type Output = Var<T, N>;

    fn neg(self) -> Var<T, N> {
        &self * -T::one()
    }
}

impl<T: Scalar, const N: usize> Sum for Var<T, N> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Var::weighted_sum(iter.map(|v| (v, T::one())))
    }
}
