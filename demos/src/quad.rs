// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{shader_source, ShaderSource};
use renderer::{Mesh, Renderer, RendererError, Shader, POSITION_ATTRIBUTE};
use renderer3d::{shapes, Camera3d, Layer, MODEL_VIEW_UNIFORM, PROJECTION_UNIFORM};

pub(crate) const SHADERS: ShaderSource = ShaderSource {
    vertex: include_str!("shaders/quad.vert"),
    fragment: include_str!("shaders/quad.frag"),
};

/// A white quad facing the camera.
pub(crate) struct QuadLayer {
    shader: Shader,
    mesh: Mesh,
}

impl QuadLayer {
    pub(crate) fn new(renderer: &Renderer) -> Result<Self, RendererError> {
        let mesh = Mesh::new(renderer, &shapes::quad())?;
        let (vertex, fragment) = shader_source(&SHADERS);
        let shader = renderer.create_shader(
            &vertex,
            &fragment,
            &[POSITION_ATTRIBUTE],
            &[PROJECTION_UNIFORM, MODEL_VIEW_UNIFORM],
        )?;
        Ok(Self { shader, mesh })
    }
}

impl Layer<Renderer> for QuadLayer {
    fn render(&mut self, renderer: &Renderer, camera: &Camera3d) {
        let shader = self.shader.bind(renderer);
        camera.prepare(&shader);
        let mesh = self.mesh.bind(renderer, &shader);
        mesh.draw();
    }
}
