use std::convert::TryFrom;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use thiserror::Error;

use crate::Scalar;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VectorError {
    #[error("incorrect number of elements for `Vector`: expected {expected}, found {found}")]
    WrongLength { expected: usize, found: usize },
}

/// Fixed-size numeric tuple with component-wise arithmetic.
#[derive(Clone, Copy, PartialEq)]
pub struct Vector<T, const N: usize>([T; N]);

impl<T: Scalar, const N: usize> Vector<T, N> {
    #[inline]
    pub fn new(data: [T; N]) -> Self {
        Self(data)
    }

    #[inline]
    pub fn from_fn<F: FnMut(usize) -> T>(mut init: F) -> Self {
        let mut data = [T::zero(); N];
        for (i, x) in data.iter_mut().enumerate() {
            *x = init(i);
        }
        Self(data)
    }

    pub fn splat(v: T) -> Self {
        Self([v; N])
    }

    pub fn zeros() -> Self {
        Self::splat(T::zero())
    }

    pub fn ones() -> Self {
        Self::splat(T::one())
    }

    #[inline]
    pub fn map<F: Fn(T) -> T>(&self, f: F) -> Self {
        Self::from_fn(|i| f(self.0[i]))
    }

    #[inline]
    pub fn zip_with<F: Fn(T, T) -> T>(&self, other: &Self, f: F) -> Self {
        Self::from_fn(|i| f(self.0[i], other.0[i]))
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn as_array(&self) -> &[T; N] {
        &self.0
    }

    pub fn into_array(self) -> [T; N] {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn dot(&self, other: &Self) -> T {
        self.0.iter().zip(other.0.iter()).fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    pub fn sum(&self) -> T {
        self.0.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }

    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    // No check for a zero norm, the result is NaN in that case.
    pub fn normalize(&self) -> Self {
        *self / self.norm()
    }

    pub fn max_component(&self) -> T {
        self.0.iter().fold(T::neg_infinity(), |acc, &x| acc.max(x))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|x| x.is_zero())
    }

    pub fn has_nans(&self) -> bool {
        self.0.iter().any(|x| x.is_nan())
    }
}

impl<T: Scalar> Vector<T, 3> {
    pub fn cross(&self, other: &Self) -> Self {
        let (a, b) = (&self.0, &other.0);
        Self([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ])
    }

    pub fn x(&self) -> T { self.0[0] }
    pub fn y(&self) -> T { self.0[1] }
    pub fn z(&self) -> T { self.0[2] }
}

/// Mirrors `v` about `n`: `-v + 2 * dot(v, n) * n`.
pub fn reflect<T: Scalar, const N: usize>(v: Vector<T, N>, n: Vector<T, N>) -> Vector<T, N> {
    -v + n * (T::cast(2.0) * v.dot(&n))
}

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T: Scalar, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(data: [T; N]) -> Self {
        Self(data)
    }
}

impl<T: Scalar, const N: usize> From<Vector<T, N>> for [T; N] {
    fn from(v: Vector<T, N>) -> Self {
        v.0
    }
}

impl<T: Scalar, const N: usize> TryFrom<&[T]> for Vector<T, N> {
    type Error = VectorError;

    fn try_from(slice: &[T]) -> Result<Self, Self::Error> {
        if slice.len() != N {
            return Err(VectorError::WrongLength { expected: N, found: slice.len() });
        }
        Ok(Self::from_fn(|i| slice[i]))
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<T: Scalar, const N: usize> fmt::Debug for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector")?;
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<T: Scalar, const N: usize> fmt::Display for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector{{")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, "}}")
    }
}

macro_rules! impl_componentwise_op {
    ($op_trait:ident, $op_fn:ident, $assign_trait:ident, $assign_fn:ident, $op:tt) => {
        impl<T: Scalar, const N: usize> $op_trait for Vector<T, N> {
            type Output = Self;

            #[inline]
            fn $op_fn(self, rhs: Self) -> Self {
                self.zip_with(&rhs, |a, b| a $op b)
            }
        }

        impl<T: Scalar, const N: usize> $op_trait<T> for Vector<T, N> {
            type Output = Self;

            #[inline]
            fn $op_fn(self, rhs: T) -> Self {
                self.map(|a| a $op rhs)
            }
        }

        impl<'a, T: Scalar, const N: usize> $op_trait<T> for &'a Vector<T, N> {
            type Output = Vector<T, N>;

            #[inline]
            fn $op_fn(self, rhs: T) -> Vector<T, N> {
                self.map(|a| a $op rhs)
            }
        }

        impl<T: Scalar, const N: usize> $assign_trait for Vector<T, N> {
            #[inline]
            fn $assign_fn(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }

        impl<T: Scalar, const N: usize> $assign_trait<T> for Vector<T, N> {
            #[inline]
            fn $assign_fn(&mut self, rhs: T) {
                *self = *self $op rhs;
            }
        }
    };
}

impl_componentwise_op!(Add, add, AddAssign, add_assign, +);
impl_componentwise_op!(Sub, sub, SubAssign, sub_assign, -);
impl_componentwise_op!(Mul, mul, MulAssign, mul_assign, *);
impl_componentwise_op!(Div, div, DivAssign, div_assign, /);

impl_scalar_lhs_ops!(Vector; f32, f64);

impl<T: Scalar, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

impl<T: Scalar, const N: usize> Sum for Vector<T, N> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zeros(), |acc, v| acc + v)
    }
}
