// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{shader_source, ShaderSource};
use renderer::{Mesh, Renderer, RendererError, Shader, POSITION_ATTRIBUTE};
use renderer3d::shapes::{self, COLOR_ATTRIBUTE};
use renderer3d::{Camera3d, Layer, MODEL_VIEW_UNIFORM, PROJECTION_UNIFORM};

pub(crate) const SHADERS: ShaderSource = ShaderSource {
    vertex: include_str!("shaders/cube.vert"),
    fragment: include_str!("shaders/cube.frag"),
};

/// A cube with a different solid color on each face.
pub(crate) struct CubeLayer {
    shader: Shader,
    mesh: Mesh,
}

impl CubeLayer {
    pub(crate) fn new(renderer: &Renderer) -> Result<Self, RendererError> {
        let mesh = Mesh::new(renderer, &shapes::colored_cube())?;
        let (vertex, fragment) = shader_source(&SHADERS);
        let shader = renderer.create_shader(
            &vertex,
            &fragment,
            &[POSITION_ATTRIBUTE, COLOR_ATTRIBUTE],
            &[PROJECTION_UNIFORM, MODEL_VIEW_UNIFORM],
        )?;
        Ok(Self { shader, mesh })
    }
}

impl Layer<Renderer> for CubeLayer {
    fn render(&mut self, renderer: &Renderer, camera: &Camera3d) {
        let shader = self.shader.bind(renderer);
        camera.prepare(&shader);
        self.mesh.bind(renderer, &shader).draw();
    }
}
