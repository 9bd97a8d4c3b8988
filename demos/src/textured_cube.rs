// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{shader_source, ShaderSource};
use renderer::{Mesh, Renderer, RendererError, Shader, Texture, POSITION_ATTRIBUTE};
use renderer3d::shapes::{self, TEX_COORD_ATTRIBUTE};
use renderer3d::{Camera3d, Layer, MODEL_VIEW_UNIFORM, PROJECTION_UNIFORM};

/// Name of the `sampler2D` uniform.
pub(crate) const SAMPLER_UNIFORM: &str = "uSampler";

pub(crate) const SHADERS: ShaderSource = ShaderSource {
    vertex: include_str!("shaders/textured_cube.vert"),
    fragment: include_str!("shaders/textured_cube.frag"),
};

/// A cube with an image on each face. Isn't ready until the image loads.
pub(crate) struct TexturedCubeLayer {
    shader: Shader,
    mesh: Mesh,
    texture: Texture,
}

impl TexturedCubeLayer {
    pub(crate) fn new(renderer: &Renderer, texture_url: &str) -> Result<Self, RendererError> {
        let mesh = Mesh::new(renderer, &shapes::textured_cube())?;
        let (vertex, fragment) = shader_source(&SHADERS);
        let shader = renderer.create_shader(
            &vertex,
            &fragment,
            &[POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE],
            &[PROJECTION_UNIFORM, MODEL_VIEW_UNIFORM, SAMPLER_UNIFORM],
        )?;
        let texture = Texture::load(renderer, texture_url)?;
        Ok(Self {
            shader,
            mesh,
            texture,
        })
    }
}

impl Layer<Renderer> for TexturedCubeLayer {
    fn is_ready(&self) -> bool {
        self.texture.is_ready()
    }

    fn render(&mut self, renderer: &Renderer, camera: &Camera3d) {
        let shader = self.shader.bind(renderer);
        camera.prepare(&shader);
        shader.uniform_texture(SAMPLER_UNIFORM, &self.texture, 0);
        self.mesh.bind(renderer, &shader).draw();
    }
}
