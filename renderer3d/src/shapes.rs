// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use glam::*;
use renderer::{rgba_hex, Attribute, MeshBuilder, Topology};

/// Name of the per-vertex color attribute.
pub const COLOR_ATTRIBUTE: &str = "vertexColor";
/// Name of the per-vertex texture coordinate attribute.
pub const TEX_COORD_ATTRIBUTE: &str = "texCoord";

/// Faces of [`cube`] in the order their vertices are stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Face {
    /// +Z
    Front,
    /// -Z
    Back,
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// +X
    Right,
    /// -X
    Left,
}

impl Face {
    /// Every [`Face`] in vertex order.
    pub const ALL: [Self; 6] = [
        Self::Front,
        Self::Back,
        Self::Top,
        Self::Bottom,
        Self::Right,
        Self::Left,
    ];

    /// Opaque color of the face in [`colored_cube`].
    pub fn color(self) -> Vec4 {
        rgba_hex(match self {
            Self::Front => 0xff0000ff,
            Self::Back => 0x00ff00ff,
            Self::Top => 0x0000ffff,
            Self::Bottom => 0xffff00ff,
            Self::Right => 0xff00ffff,
            Self::Left => 0x00ffffff,
        })
    }

    /// Corners of the face, counter-clockwise when viewed from outside the cube.
    fn positions(self) -> [Vec3; 4] {
        let v = |x: f32, y: f32, z: f32| vec3(x, y, z);
        match self {
            Self::Front => [
                v(-1.0, -1.0, 1.0),
                v(1.0, -1.0, 1.0),
                v(1.0, 1.0, 1.0),
                v(-1.0, 1.0, 1.0),
            ],
            Self::Back => [
                v(-1.0, -1.0, -1.0),
                v(-1.0, 1.0, -1.0),
                v(1.0, 1.0, -1.0),
                v(1.0, -1.0, -1.0),
            ],
            Self::Top => [
                v(-1.0, 1.0, -1.0),
                v(-1.0, 1.0, 1.0),
                v(1.0, 1.0, 1.0),
                v(1.0, 1.0, -1.0),
            ],
            Self::Bottom => [
                v(-1.0, -1.0, -1.0),
                v(1.0, -1.0, -1.0),
                v(1.0, -1.0, 1.0),
                v(-1.0, -1.0, 1.0),
            ],
            Self::Right => [
                v(1.0, -1.0, -1.0),
                v(1.0, 1.0, -1.0),
                v(1.0, 1.0, 1.0),
                v(1.0, -1.0, 1.0),
            ],
            Self::Left => [
                v(-1.0, -1.0, -1.0),
                v(-1.0, -1.0, 1.0),
                v(-1.0, 1.0, 1.0),
                v(-1.0, 1.0, -1.0),
            ],
        }
    }

    /// Texture coordinates matching [`Face::positions`] so the image appears upright.
    fn tex_coords(self) -> [Vec2; 4] {
        let [a, b, c, d] = [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(1.0, 1.0), vec2(0.0, 1.0)];
        match self {
            Self::Front | Self::Left => [a, b, c, d],
            Self::Back | Self::Right => [b, c, d, a],
            Self::Top => [d, a, b, c],
            Self::Bottom => [c, d, a, b],
        }
    }
}

/// A flat 1x1 quad in the XY plane, drawn as a triangle strip without indices.
pub fn quad() -> MeshBuilder {
    let mut builder = MeshBuilder::new(Topology::TriangleStrip);
    builder.positions = vec![
        vec3(0.5, 0.5, 0.0),
        vec3(-0.5, 0.5, 0.0),
        vec3(0.5, -0.5, 0.0),
        vec3(-0.5, -0.5, 0.0),
    ];
    builder
}

/// A 2x2x2 cube centered on the origin. Each face has its own 4 vertices so they can have
/// separate attributes.
pub fn cube() -> MeshBuilder {
    let mut builder = MeshBuilder::new(Topology::Triangles);
    builder.positions = Face::ALL.iter().flat_map(|f| f.positions()).collect();
    builder.push_default_quads();
    builder
}

/// A [`cube`] with a solid [`Face::color`] per face.
pub fn colored_cube() -> MeshBuilder {
    let mut builder = cube();
    let colors: Vec<Vec4> = Face::ALL
        .iter()
        .flat_map(|f| [f.color(); 4])
        .collect();
    builder.attribute = Some(Attribute::new(COLOR_ATTRIBUTE, &colors));
    builder
}

/// A [`cube`] with the whole texture mapped onto each face.
pub fn textured_cube() -> MeshBuilder {
    let mut builder = cube();
    let tex_coords: Vec<Vec2> = Face::ALL.iter().flat_map(|f| f.tex_coords()).collect();
    builder.attribute = Some(Attribute::new(TEX_COORD_ATTRIBUTE, &tex_coords));
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_layout() {
        let quad = quad();
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.position_floats().len(), 12);
        assert!(quad.indices.is_empty());
        assert!(quad.attribute.is_none());
        assert_eq!(quad.topology, Topology::TriangleStrip);
        assert_eq!(quad.validate(), Ok(()));
    }

    #[test]
    fn cube_layout() {
        let cube = cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.position_floats().len(), 72);
        assert_eq!(cube.topology, Topology::Triangles);

        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| i < 24));

        // 2 triangles per face, each only using that face's vertices.
        for (face, indices) in cube.indices.chunks(6).enumerate() {
            let base = face as u16 * 4;
            assert_eq!(indices, [base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    #[test]
    fn faces_are_planar() {
        let cube = cube();
        for (face, positions) in Face::ALL.iter().zip(cube.positions.chunks(4)) {
            let normal = match face {
                Face::Front => Vec3::Z,
                Face::Back => -Vec3::Z,
                Face::Top => Vec3::Y,
                Face::Bottom => -Vec3::Y,
                Face::Right => Vec3::X,
                Face::Left => -Vec3::X,
            };
            for p in positions {
                assert_eq!(p.dot(normal), 1.0, "{:?}", face);
            }

            // Counter-clockwise from outside.
            let winding = (positions[1] - positions[0]).cross(positions[2] - positions[0]);
            assert!(winding.dot(normal) > 0.0, "{:?}", face);
        }
    }

    #[test]
    fn face_colors() {
        let colors = Face::ALL.map(Face::color);
        assert_eq!(
            colors,
            [
                vec4(1.0, 0.0, 0.0, 1.0),
                vec4(0.0, 1.0, 0.0, 1.0),
                vec4(0.0, 0.0, 1.0, 1.0),
                vec4(1.0, 1.0, 0.0, 1.0),
                vec4(1.0, 0.0, 1.0, 1.0),
                vec4(0.0, 1.0, 1.0, 1.0),
            ]
        );

        let cube = colored_cube();
        let attribute = cube.attribute.as_ref().unwrap();
        assert_eq!(attribute.name, COLOR_ATTRIBUTE);
        assert_eq!(attribute.data.len(), 96);
        for (face, floats) in Face::ALL.iter().zip(attribute.data.chunks(16)) {
            for vertex in floats.chunks(4) {
                assert_eq!(Vec4::from_slice(vertex), face.color());
            }
        }
        assert_eq!(cube.validate(), Ok(()));
    }

    #[test]
    fn tex_coords() {
        let cube = textured_cube();
        let attribute = cube.attribute.as_ref().unwrap();
        assert_eq!(attribute.name, TEX_COORD_ATTRIBUTE);
        assert_eq!(attribute.floats, 2);
        assert_eq!(attribute.data.len(), 48);
        assert_eq!(
            &attribute.data[..8],
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]
        );
        // Bottom face.
        assert_eq!(
            &attribute.data[24..32],
            &[1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(cube.validate(), Ok(()));
    }
}
