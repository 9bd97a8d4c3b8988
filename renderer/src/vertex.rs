// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use bytemuck::Pod;
use glam::*;

/// Any per-vertex value consisting of [`prim@f32`]s, such as a position, color or texture
/// coordinate.
pub trait Vertex: Pod {
    /// Number of [`prim@f32`] components.
    const FLOATS: usize;
}

macro_rules! impl_vertex_floats {
    ($a: ty, $floats: literal) => {
        impl Vertex for $a {
            const FLOATS: usize = $floats;
        }
    };
}

impl_vertex_floats!(f32, 1);
impl_vertex_floats!(Vec2, 2);
impl_vertex_floats!(Vec3, 3);

// This is normally 16 byte aligned (breaking derive Pod) but not with glam's scalar-math feature.
impl_vertex_floats!(Vec4, 4);

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn floats_match_size() {
        fn check<V: Vertex>() {
            assert_eq!(V::FLOATS * size_of::<f32>(), size_of::<V>());
        }
        check::<f32>();
        check::<Vec2>();
        check::<Vec3>();
        check::<Vec4>();
    }
}
