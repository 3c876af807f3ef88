//! Component reordering for vectors.
//!
//! Rather than one accessor per permutation (`xy`, `zyx`, `wzyx`...), components
//! are picked by index: `v.swizzle3(Z, Y, X)`.

use cgmath::{Vector2, Vector3, Vector4};

pub const X: usize = 0;
pub const Y: usize = 1;
pub const Z: usize = 2;
pub const W: usize = 3;

pub trait Swizzle<S: Copy> {
    /// Number of components in the source vector.
    const DIM: usize;

    /// Returns component `i`. Panics when `i >= DIM`.
    fn component(&self, i: usize) -> S;

    fn swizzle<const N: usize>(&self, indices: [usize; N]) -> [S; N] {
        indices.map(|i| self.component(i))
    }

    fn swizzle2(&self, a: usize, b: usize) -> Vector2<S> {
        Vector2::new(self.component(a), self.component(b))
    }

    fn swizzle3(&self, a: usize, b: usize, c: usize) -> Vector3<S> {
        Vector3::new(self.component(a), self.component(b), self.component(c))
    }

    fn swizzle4(&self, a: usize, b: usize, c: usize, d: usize) -> Vector4<S> {
        Vector4::new(
            self.component(a),
            self.component(b),
            self.component(c),
            self.component(d),
        )
    }
}

macro_rules! impl_swizzle {
    ($vector:ident, $dim:expr) => {
        impl<S: Copy> Swizzle<S> for $vector<S> {
            const DIM: usize = $dim;

            fn component(&self, i: usize) -> S {
                assert!(i < $dim, "component {} out of range for {}", i, stringify!($vector));
                let components: &[S; $dim] = self.as_ref();
                components[i]
            }
        }
    };
}

impl_swizzle!(Vector2, 2);
impl_swizzle!(Vector3, 3);
impl_swizzle!(Vector4, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorders_components() {
        let v = Vector3::new(1.0f32, 2.0, 3.0);
        assert_eq!(v.swizzle3(Z, Y, X), Vector3::new(3.0, 2.0, 1.0));
        assert_eq!(v.swizzle2(X, X), Vector2::new(1.0, 1.0));
        assert_eq!(v.swizzle([Y, Z, Z, X, Y]), [2.0, 3.0, 3.0, 1.0, 2.0]);

        let w = Vector4::new(1, 2, 3, 4);
        assert_eq!(w.swizzle4(W, Z, Y, X), Vector4::new(4, 3, 2, 1));
        assert_eq!(Vector2::new(5.0f64, 6.0).swizzle3(Y, X, Y), Vector3::new(6.0, 5.0, 6.0));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_component() {
        let v = Vector2::new(1.0f32, 2.0);
        v.swizzle2(X, Z);
    }
}
