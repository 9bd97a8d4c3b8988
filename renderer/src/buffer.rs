// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::error::RendererError;
use crate::gl::*;
use crate::index::Index;
use crate::renderer::Renderer;
use crate::shader::ShaderBinding;
use crate::vertex::Vertex;
use bytemuck::Pod;
use glam::Vec3;
use log::debug;
use std::marker::PhantomData;
use web_sys::WebGlBuffer;

/// Name of the position attribute every [`Mesh`] binds.
pub const POSITION_ATTRIBUTE: &str = "vertexPos";

/// Vertex indices of a quad, in counter-clockwise order.
pub type Quad<I> = [I; 4];

/// How vertices (or indices) are assembled into triangles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Topology {
    /// Every vertex after the second forms a triangle with the previous two.
    TriangleStrip,
    /// Every 3 vertices form a separate triangle.
    Triangles,
}

impl Topology {
    fn gl_enum(self) -> u32 {
        match self {
            Self::TriangleStrip => Gl::TRIANGLE_STRIP,
            Self::Triangles => Gl::TRIANGLES,
        }
    }
}

/// A per-vertex attribute other than position, stored as untyped floats.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Name of the attribute in the vertex shader.
    pub name: &'static str,
    /// Floats per vertex.
    pub floats: usize,
    /// `floats * vertex count` floats.
    pub data: Vec<f32>,
}

impl Attribute {
    /// Creates an [`Attribute`] from typed `values`.
    pub fn new<V: Vertex>(name: &'static str, values: &[V]) -> Self {
        Self {
            name,
            floats: V::FLOATS,
            data: bytemuck::cast_slice(values).to_vec(),
        }
    }

    /// Number of vertices the [`Attribute`] has values for.
    pub fn len(&self) -> usize {
        self.data.len() / self.floats
    }

    /// Returns true if there are no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Allows building a mesh on the CPU, presumably to upload with [`Mesh::new`].
#[derive(Clone, Debug)]
pub struct MeshBuilder<I = u16> {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Optional second attribute, one value per position.
    pub attribute: Option<Attribute>,
    /// Indices into `positions`. If empty, vertices are drawn in order.
    pub indices: Vec<I>,
    /// How to assemble triangles.
    pub topology: Topology,
}

impl<I: Index> MeshBuilder<I> {
    /// Create an empty [`MeshBuilder`].
    pub fn new(topology: Topology) -> Self {
        Self {
            positions: Vec::new(),
            attribute: None,
            indices: Vec::new(),
            topology,
        }
    }

    /// Pushes the two triangles of a single [`Quad`] to `indices`.
    pub fn push_quad(&mut self, quad: Quad<I>) {
        self.indices
            .extend_from_slice(&[quad[0], quad[1], quad[2], quad[0], quad[2], quad[3]]);
    }

    /// Pushes a [`Quad`] to `indices` for every 4 `positions`.
    pub fn push_default_quads(&mut self) {
        assert!(self.indices.is_empty());

        let n = self.positions.len();
        assert_eq!(n % 4, 0);
        let quads = n / 4;

        for quad in 0..quads {
            let i = quad * 4;
            self.push_quad([
                I::from_usize(i),
                I::from_usize(i + 1),
                I::from_usize(i + 2),
                I::from_usize(i + 3),
            ]);
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Position components, 3 per vertex.
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Returns true if drawn with an index buffer instead of in vertex order.
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Returns an error if the attribute doesn't cover every vertex or an index is out of range.
    pub fn validate(&self) -> Result<(), String> {
        if self.positions.is_empty() {
            return Err("mesh has no vertices".to_owned());
        }
        if let Some(attribute) = &self.attribute {
            if attribute.data.len() != attribute.floats * self.positions.len() {
                return Err(format!(
                    "attribute {} has {} floats, expected {}",
                    attribute.name,
                    attribute.data.len(),
                    attribute.floats * self.positions.len()
                ));
            }
        }
        if let Some(index) = self
            .indices
            .iter()
            .find(|i| i.to_usize() >= self.positions.len())
        {
            return Err(format!("index {:?} out of range", index));
        }
        Ok(())
    }
}

pub(crate) enum GpuBufferType {
    Array,
    Element,
}

impl GpuBufferType {
    pub(crate) const fn to(self) -> bool {
        match self {
            Self::Array => true,
            Self::Element => false,
        }
    }

    const fn fr(v: bool) -> Self {
        match v {
            true => Self::Array,
            false => Self::Element,
        }
    }

    const fn target(self) -> u32 {
        match self {
            Self::Array => Gl::ARRAY_BUFFER,
            Self::Element => Gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

const ARRAY: bool = GpuBufferType::Array.to();
const ELEMENT: bool = GpuBufferType::Element.to();

/// A buffer that is uploaded exactly once.
pub(crate) struct GpuBuffer<E, const B: bool> {
    elements: WebGlBuffer,
    length: u32, // The amount of elements in the buffer.
    element: PhantomData<E>,
}

impl<E: Pod, const B: bool> GpuBuffer<E, B> {
    /// Uploads `elements` with `STATIC_DRAW`, they can't be changed afterwards.
    pub(crate) fn new(gl: &Gl, elements: &[E]) -> Result<Self, RendererError> {
        let buffer = gl.create_buffer().ok_or(RendererError::Resource("buffer"))?;
        let target = GpuBufferType::fr(B).target();
        gl.bind_buffer(target, Some(&buffer));

        let b = |a: &js_sys::Object| {
            gl.buffer_data_with_array_buffer_view(target, a, Gl::STATIC_DRAW)
        };

        // Views must not outlive this block, any allocation could invalidate them.
        unsafe {
            match GpuBufferType::fr(B) {
                GpuBufferType::Array => {
                    b(&js_sys::Float32Array::view(bytemuck::cast_slice(elements)))
                }
                GpuBufferType::Element => {
                    b(&js_sys::Uint16Array::view(bytemuck::cast_slice(elements)))
                }
            }
        }

        // Unbind (not required in release mode).
        #[cfg(debug_assertions)]
        gl.bind_buffer(target, None);

        Ok(Self {
            elements: buffer,
            length: elements.len() as u32,
            element: PhantomData,
        })
    }

    pub(crate) fn len(&self) -> u32 {
        self.length
    }

    fn bind(&self, gl: &Gl) {
        gl.bind_buffer(GpuBufferType::fr(B).target(), Some(&self.elements));
    }
}

impl<const B: bool> GpuBuffer<f32, B> {
    /// Points `location` at the bound buffer, `floats` per vertex, tightly packed.
    fn bind_attrib(&self, gl: &Gl, location: u32, floats: usize) {
        self.bind(gl);
        gl.vertex_attrib_pointer_with_i32(location, floats as i32, Gl::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(location);
    }
}

struct AttributeBuffer {
    name: &'static str,
    floats: usize,
    buffer: GpuBuffer<f32, ARRAY>,
}

/// A static mesh living in GPU memory. Created once from a [`MeshBuilder`], immutable after.
pub struct Mesh<I = u16> {
    positions: GpuBuffer<f32, ARRAY>,
    attribute: Option<AttributeBuffer>,
    indices: Option<GpuBuffer<I, ELEMENT>>,
    topology: Topology,
}

impl<I: Index> Mesh<I> {
    /// Uploads a [`MeshBuilder`] after [`validating`][`MeshBuilder::validate`] it.
    pub fn new(renderer: &Renderer, builder: &MeshBuilder<I>) -> Result<Self, RendererError> {
        builder.validate().map_err(RendererError::Dom)?;
        let gl = &renderer.gl;

        let positions = GpuBuffer::new(gl, builder.position_floats())?;
        let attribute = builder
            .attribute
            .as_ref()
            .map(|a| {
                GpuBuffer::new(gl, &a.data).map(|buffer| AttributeBuffer {
                    name: a.name,
                    floats: a.floats,
                    buffer,
                })
            })
            .transpose()?;
        let indices = builder
            .is_indexed()
            .then(|| GpuBuffer::new(gl, &builder.indices))
            .transpose()?;

        debug!(
            "uploaded mesh with {} vertices and {} indices",
            builder.vertex_count(),
            builder.indices.len()
        );

        Ok(Self {
            positions,
            attribute,
            indices,
            topology: builder.topology,
        })
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() / 3
    }

    /// Binds the [`Mesh`]'s buffers to the attributes of `shader`.
    #[must_use]
    pub fn bind<'a>(
        &'a self,
        renderer: &'a Renderer,
        shader: &ShaderBinding,
    ) -> MeshBinding<'a, I> {
        MeshBinding::new(&renderer.gl, self, shader)
    }
}

/// A bound [`Mesh`] that can draw itself.
pub struct MeshBinding<'a, I: Index> {
    gl: &'a Gl,
    mesh: &'a Mesh<I>,
    enabled: [Option<u32>; 2],
}

impl<'a, I: Index> MeshBinding<'a, I> {
    fn new(gl: &'a Gl, mesh: &'a Mesh<I>, shader: &ShaderBinding) -> Self {
        let shader = shader.shader();
        let mut enabled = [None; 2];

        if let Some(location) = shader.attribute(POSITION_ATTRIBUTE) {
            mesh.positions.bind_attrib(gl, location, 3);
            enabled[0] = Some(location);
        }

        if let Some(attribute) = &mesh.attribute {
            if let Some(location) = shader.attribute(attribute.name) {
                attribute.buffer.bind_attrib(gl, location, attribute.floats);
                enabled[1] = Some(location);
            }
        }

        if let Some(indices) = &mesh.indices {
            indices.bind(gl);
        }

        Self { gl, mesh, enabled }
    }

    /// Issues exactly one draw call.
    pub fn draw(&self) {
        let mode = self.mesh.topology.gl_enum();
        if let Some(indices) = &self.mesh.indices {
            self.gl
                .draw_elements_with_i32(mode, indices.len() as i32, I::GL_ENUM, 0);
        } else {
            self.gl.draw_arrays(mode, 0, self.mesh.vertex_count() as i32);
        }
    }
}

impl<'a, I: Index> Drop for MeshBinding<'a, I> {
    fn drop(&mut self) {
        for location in self.enabled.into_iter().flatten() {
            self.gl.disable_vertex_attrib_array(location);
        }

        // Unbind (not required in release mode).
        #[cfg(debug_assertions)]
        {
            self.gl.bind_buffer(Gl::ARRAY_BUFFER, None);
            self.gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{vec3, Vec4};

    fn square() -> MeshBuilder {
        let mut builder = MeshBuilder::new(Topology::Triangles);
        builder.positions = vec![
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        ];
        builder
    }

    #[test]
    fn default_quads() {
        let mut builder = square();
        builder.push_default_quads();
        assert_eq!(builder.indices, [0, 1, 2, 0, 2, 3]);
        assert!(builder.is_indexed());
        assert_eq!(builder.position_floats().len(), 12);
        assert_eq!(builder.validate(), Ok(()));
    }

    #[test]
    fn strip_without_indices() {
        let mut builder = square();
        builder.topology = Topology::TriangleStrip;
        assert!(!builder.is_indexed());
        assert_eq!(builder.validate(), Ok(()));
    }

    #[test]
    fn attribute_floats() {
        let attribute = Attribute::new("vertexColor", &[Vec4::ONE; 4]);
        assert_eq!(attribute.floats, 4);
        assert_eq!(attribute.len(), 4);
        assert_eq!(attribute.data.len(), 16);
    }

    #[test]
    fn invalid() {
        let mut builder = square();
        builder.attribute = Some(Attribute::new("vertexColor", &[Vec4::ONE; 3]));
        assert!(builder.validate().is_err());

        let mut builder = square();
        builder.indices = vec![0, 1, 4];
        assert!(builder.validate().is_err());

        let builder = MeshBuilder::<u16>::new(Topology::TriangleStrip);
        assert!(builder.validate().is_err());
    }
}
