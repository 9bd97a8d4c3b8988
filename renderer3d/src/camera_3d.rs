// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use glam::{Mat4, Vec3};
use renderer::ShaderBinding;

/// Name of the projection matrix uniform.
pub const PROJECTION_UNIFORM: &str = "projectionMatrix";
/// Name of the model-view matrix uniform.
pub const MODEL_VIEW_UNIFORM: &str = "modelViewMatrix";

/// A 3 dimensional camera looking at a single model.
#[derive(Clone, Debug, Default)]
pub struct Camera3d {
    /// The [projection matrix](https://en.wikipedia.org/wiki/Projection_matrix). Fixed after
    /// creation.
    pub projection_matrix: Mat4,
    /// Maps model space to camera space. Changes when the model rotates.
    pub model_view_matrix: Mat4,
}

impl Camera3d {
    /// Creates a new [`Camera3d`] looking down -Z at a model `distance` away.
    pub fn new(projection: impl Projection, distance: f32) -> Self {
        Self {
            projection_matrix: projection.projection_matrix(),
            model_view_matrix: Mat4::from_translation(Vec3::new(0.0, 0.0, -distance)),
        }
    }

    /// Sets `uniform mat4 projectionMatrix;` and `uniform mat4 modelViewMatrix;`.
    pub fn prepare(&self, shader: &ShaderBinding) {
        shader.uniform_matrix4f(PROJECTION_UNIFORM, &self.projection_matrix);
        shader.uniform_matrix4f(MODEL_VIEW_UNIFORM, &self.model_view_matrix);
    }

    /// Rotates the model by `angle` radians about `axis` (in model space), which must be
    /// normalized.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        self.model_view_matrix = self.model_view_matrix * Mat4::from_axis_angle(axis, angle);
    }

    /// Returns the translation of the model relative to the camera.
    pub fn translation(&self) -> Vec3 {
        self.model_view_matrix.w_axis.truncate()
    }
}

/// [`Perspective`] projections make objects that are further from the [`Camera3d`] appear smaller.
#[derive(Copy, Clone, Debug)]
pub struct Perspective {
    /// [Aspect ratio](https://en.wikipedia.org/wiki/Aspect_ratio_(image)) of viewport (get with
    /// [`Renderer::aspect_ratio`][`renderer::Renderer::aspect_ratio`]). Required
    /// or defaults to `1.0`.
    pub aspect: f32,
    /// Vertical [field of view](https://en.wikipedia.org/wiki/Field_of_view) in degrees. Defaults
    /// to `45.0`.
    pub fov: f32,
    /// Near [clip](https://en.wikipedia.org/wiki/Clipping_(computer_graphics)) plane. Defaults
    /// to `1.0`.
    pub z_near: f32,
    /// Far [clip](https://en.wikipedia.org/wiki/Clipping_(computer_graphics)) plane. Defaults to
    /// `10000.0`.
    pub z_far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            fov: 45.0,
            z_near: 1.0,
            z_far: 10000.0,
        }
    }
}

impl Projection for Perspective {
    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.z_near, self.z_far)
    }
}

/// A [`Projection`] defines how objects appear based on their distance to the [`Camera3d`].
pub trait Projection {
    /// Gets the [projection matrix](https://en.wikipedia.org/wiki/Projection_matrix).
    fn projection_matrix(&self) -> Mat4;
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::viewport_to_aspect;

    #[test]
    fn quad_camera() {
        let aspect = viewport_to_aspect(glam::uvec2(800, 600));
        let camera = Camera3d::new(
            Perspective {
                aspect,
                ..Default::default()
            },
            3.333,
        );

        let p = camera.projection_matrix;
        assert!((p.y_axis.y / p.x_axis.x - 800.0 / 600.0).abs() < 1e-5);
        assert_eq!(camera.translation(), Vec3::new(0.0, 0.0, -3.333));
    }

    #[test]
    fn rotation_keeps_translation() {
        let mut camera = Camera3d::new(Perspective::default(), 8.0);
        camera.rotate(Vec3::ONE.normalize(), 1.0);
        assert_eq!(camera.translation(), Vec3::new(0.0, 0.0, -8.0));
        assert!(!camera
            .model_view_matrix
            .abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 0.0, -8.0)), 1e-3));
    }
}
