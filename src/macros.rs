/// Convenience macro that allows creating a Vec3 without needing to use float literals
///
/// ```
/// use drt::{vec3, Vec3};
/// assert_eq!(vec3!(1, 2, 3), Vec3::new([1.0, 2.0, 3.0]));
/// ```
///
#[macro_export]
macro_rules! vec3 {
    ($x:expr, $y:expr, $z:expr) => {
        $crate::Vec3::new([$x as $crate::Float, $y as $crate::Float, $z as $crate::Float])
    };
}

/// Implements `scalar * v` with a primitive float on the
/// left hand side. These can't be written generically over `T: Scalar` because of the
/// orphan rules.
macro_rules! impl_scalar_lhs_ops {
    ($wrapper:ident; $($t:ty),*) => {
        $(
            impl<const N: usize> std::ops::Mul<$wrapper<$t, N>> for $t {
                type Output = $wrapper<$t, N>;

                fn mul(self, rhs: $wrapper<$t, N>) -> Self::Output {
                    rhs * self
                }
            }

            impl<'a, const N: usize> std::ops::Mul<&'a $wrapper<$t, N>> for $t {
                type Output = $wrapper<$t, N>;

                fn mul(self, rhs: &'a $wrapper<$t, N>) -> Self::Output {
                    rhs * self
                }
            }
        )*
    };
}
