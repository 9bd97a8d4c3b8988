// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::error::{RendererError, ShaderStage};
use crate::gl::*;
use crate::renderer::Renderer;
use crate::texture::{Texture, TextureBinding};
use glam::*;
use linear_map::LinearMap;
use log::{debug, warn};
use std::cell::Cell;
use std::mem;
use std::rc::Rc;
use web_sys::{WebGlProgram, WebGlShader, WebGlUniformLocation};

/// References a linked glsl program. As cheap to clone as an [`Rc`].
#[derive(Clone)]
pub struct Shader(Rc<ShaderInner>);

struct ShaderInner {
    program: WebGlProgram,
    // Kept alive alongside the program they are attached to.
    _vert_shader: WebGlShader,
    _frag_shader: WebGlShader,
    // Use LinearMaps because there are relatively few attributes and uniforms.
    attributes: LinearMap<&'static str, u32>,
    uniforms: LinearMap<&'static str, WebGlUniformLocation>,
}

impl Shader {
    /// Compiles and links a new glsl program from sources. Locations of `attributes` and
    /// `uniforms` are resolved once, here, and cached for the lifetime of the [`Shader`].
    ///
    /// Returns an error instead of a half initialized program if either stage fails to compile or
    /// the program fails to link.
    pub fn new(
        renderer: &Renderer,
        vertex: &str,
        fragment: &str,
        attributes: &[&'static str],
        uniforms: &[&'static str],
    ) -> Result<Self, RendererError> {
        let gl = &renderer.gl;
        let vert_shader = compile_shader(gl, ShaderStage::Vertex, vertex)?;
        let frag_shader = compile_shader(gl, ShaderStage::Fragment, fragment).map_err(|e| {
            gl.delete_shader(Some(&vert_shader));
            e
        })?;
        let program = link_program(gl, &vert_shader, &frag_shader).map_err(|e| {
            gl.delete_shader(Some(&vert_shader));
            gl.delete_shader(Some(&frag_shader));
            e
        })?;

        let mut attribute_locations = LinearMap::with_capacity(attributes.len());
        for &name in attributes {
            let location = gl.get_attrib_location(&program, name);
            if let Ok(location) = u32::try_from(location) {
                attribute_locations.insert(name, location);
            } else {
                warn!("attribute {} does not exist or is not in use", name);
            }
        }

        let mut uniform_locations = LinearMap::with_capacity(uniforms.len());
        for &name in uniforms {
            if let Some(location) = gl.get_uniform_location(&program, name) {
                uniform_locations.insert(name, location);
            } else {
                warn!("uniform {} does not exist or is not in use", name);
            }
        }

        debug!(
            "linked shader with {} attributes and {} uniforms",
            attribute_locations.len(),
            uniform_locations.len()
        );

        Ok(Self(Rc::new(ShaderInner {
            program,
            _vert_shader: vert_shader,
            _frag_shader: frag_shader,
            attributes: attribute_locations,
            uniforms: uniform_locations,
        })))
    }

    /// Location of a named attribute or [`None`] if it isn't used by the program.
    pub fn attribute(&self, name: &str) -> Option<u32> {
        self.0.attributes.get(name).copied()
    }

    /// Binds the shader for handling subsequent draw calls.
    pub fn bind<'a>(&'a self, renderer: &'a Renderer) -> ShaderBinding<'a> {
        ShaderBinding::new(renderer, self)
    }
}

/// A bound [`Shader`] that can you can draw with.
pub struct ShaderBinding<'a> {
    renderer: &'a Renderer,
    shader: &'a Shader,
    bound_textures: Cell<u32>, // bitset
}

impl<'a> ShaderBinding<'a> {
    fn new(renderer: &'a Renderer, shader: &'a Shader) -> Self {
        renderer.gl.use_program(Some(&shader.0.program));
        Self {
            renderer,
            shader,
            bound_textures: Cell::new(0),
        }
    }

    /// The bound [`Shader`].
    pub fn shader(&self) -> &Shader {
        self.shader
    }

    fn uniform(&self, name: &'static str) -> Option<&WebGlUniformLocation> {
        self.shader.0.uniforms.get(name)
    }

    /// Sets a `sampler2D` uniform at an `index` in range `0..32`.
    pub fn uniform_texture(&self, name: &'static str, texture: &Texture, index: usize) {
        self.uniform1i(name, index as i32);

        let mask = 1u32 << index;

        // Already bound unbind it.
        if self.bound_textures.get() & mask != 0 {
            TextureBinding::drop_raw_parts(self.renderer, index);
        }

        // Can't keep borrow of gl.
        mem::forget(texture.bind(self.renderer, index));

        // Instead set into bitset.
        self.bound_textures.set(self.bound_textures.get() | mask);
    }

    /// Sets an `int` uniform.
    pub fn uniform1i(&self, name: &'static str, v: i32) {
        self.renderer.gl.uniform1i(self.uniform(name), v);
    }

    /// Sets a `mat4` uniform.
    pub fn uniform_matrix4f(&self, name: &'static str, m: &Mat4) {
        self.renderer
            .gl
            .uniform_matrix4fv_with_f32_array(self.uniform(name), false, &m.to_cols_array());
    }
}

impl<'a> Drop for ShaderBinding<'a> {
    fn drop(&mut self) {
        // Unbind (not required in release mode).
        #[cfg(debug_assertions)]
        self.renderer.gl.use_program(None);

        let mut bitset = self.bound_textures.get();
        for index in 0..32 {
            // Break early if no more bits.
            if bitset == 0 {
                break;
            }

            let bit = bitset & (1u32 << index);
            if bit != 0 {
                // Clear bit.
                bitset ^= bit;

                TextureBinding::drop_raw_parts(self.renderer, index);
            }
        }
    }
}

/// compile_shader compiles either the vertex or fragment shader of a shader program.
fn compile_shader(gl: &Gl, stage: ShaderStage, source: &str) -> Result<WebGlShader, RendererError> {
    let shader_type = match stage {
        ShaderStage::Vertex => Gl::VERTEX_SHADER,
        ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
    };
    let shader = gl.create_shader(shader_type).ok_or(RendererError::ShaderCompile {
        stage,
        log: "could not create shader object".to_owned(),
    })?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    compile_result(stage, compiled, gl.get_shader_info_log(&shader)).map_err(|e| {
        gl.delete_shader(Some(&shader));
        e
    })?;
    Ok(shader)
}

/// link_program links the two shaders to form a shader program.
fn link_program(
    gl: &Gl,
    vert_shader: &WebGlShader,
    frag_shader: &WebGlShader,
) -> Result<WebGlProgram, RendererError> {
    let program = gl
        .create_program()
        .ok_or(RendererError::Resource("program"))?;

    gl.attach_shader(&program, vert_shader);
    gl.attach_shader(&program, frag_shader);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    link_result(linked, gl.get_program_info_log(&program)).map_err(|e| {
        gl.delete_program(Some(&program));
        e
    })?;
    Ok(program)
}

/// Info logs sometimes end with a nul terminator.
fn fmt_log(log: Option<String>) -> String {
    log.unwrap_or_default()
        .trim_end_matches('\x00')
        .trim()
        .to_owned()
}

fn compile_result(
    stage: ShaderStage,
    compiled: bool,
    log: Option<String>,
) -> Result<(), RendererError> {
    if compiled {
        Ok(())
    } else {
        Err(RendererError::ShaderCompile {
            stage,
            log: fmt_log(log),
        })
    }
}

fn link_result(linked: bool, log: Option<String>) -> Result<(), RendererError> {
    if linked {
        Ok(())
    } else {
        Err(RendererError::ShaderLink(fmt_log(log)))
    }
}
