// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::error::RendererError;
use crate::gl::*;
use crate::shader::Shader;
use crate::texture::ActiveTexture;
use glam::*;
use js_hooks::error_message;
use log::debug;
use std::cell::Cell;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

/// An abstraction over
/// [WebGL](https://rustwasm.github.io/wasm-bindgen/api/web_sys/struct.WebGlRenderingContext.html)
/// bound to a single canvas.
pub struct Renderer {
    /// HTML Canvas.
    canvas: HtmlCanvasElement,
    cached_canvas_size: Cell<Option<UVec2>>,
    /// WebGL context.
    pub(crate) gl: Gl,
    pub(crate) active_texture: ActiveTexture,
}

impl Renderer {
    /// Creates a new WebGL renderer, attaching it to `canvas`. Fails with
    /// [`RendererError::ContextUnavailable`] if the browser or the canvas doesn't support WebGL.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RendererError> {
        // See: https://developer.mozilla.org/en-US/docs/Web/API/HTMLCanvasElement/getContext
        let context = first_context(&GL_NAMES, |name| {
            canvas.get_context(name).map_err(|e| error_message(&e))
        })?;

        let gl = context.dyn_into::<Gl>().map_err(|_| {
            RendererError::ContextUnavailable(concat!("invalid ", gl_title!(), " context").into())
        })?;

        let renderer = Self {
            canvas,
            cached_canvas_size: Cell::new(None),
            gl,
            active_texture: ActiveTexture::default(),
        };

        renderer.set_viewport(renderer.canvas_size());
        renderer.set_background_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        Ok(renderer)
    }

    /// Returns the aspect ratio (width / height) of the canvas.
    pub fn aspect_ratio(&self) -> f32 {
        viewport_to_aspect(self.canvas_size())
    }

    /// Size of the canvas in real pixels (doesn't account for device pixel ratio).
    pub fn canvas_size(&self) -> UVec2 {
        let cached_size = self.cached_canvas_size.get();
        if let Some(size) = cached_size {
            size
        } else {
            let size = uvec2(self.canvas.width(), self.canvas.height());
            self.cached_canvas_size.set(Some(size));
            size
        }
    }

    /// Compiles and links a new [`Shader`], resolving the given `attributes` and `uniforms`.
    /// Shorthand for [`Shader::new`].
    pub fn create_shader(
        &self,
        vertex: &str,
        fragment: &str,
        attributes: &[&'static str],
        uniforms: &[&'static str],
    ) -> Result<Shader, RendererError> {
        Shader::new(self, vertex, fragment, attributes, uniforms)
    }

    /// Enables or disables the depth test with depth func less.
    pub fn set_depth_test(&self, enabled: bool) {
        if enabled {
            self.gl.enable(Gl::DEPTH_TEST);
        } else {
            self.gl.disable(Gl::DEPTH_TEST);
        }
    }

    /// Sets the background color to RGBA with components 0.0-1.0. Will take effect at the next
    /// [`Renderer::clear`].
    pub fn set_background_color(&self, color: Vec4) {
        self.gl.clear_color(color.x, color.y, color.z, color.w);
    }

    /// Clears the color and depth buffers.
    pub fn clear(&self) {
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    /// Sets the viewport to cover `viewport` pixels from the origin.
    pub fn set_viewport(&self, viewport: UVec2) {
        let size = viewport.as_ivec2();
        self.gl.viewport(0, 0, size.x, size.y);
    }
}

/// Returns the first context `get_context` provides, trying `names` in order. Errors thrown by one
/// name don't stop the next from being tried, but the last thrown message is reported if none
/// succeed.
fn first_context<T>(
    names: &[&str],
    mut get_context: impl FnMut(&str) -> Result<Option<T>, Option<String>>,
) -> Result<T, RendererError> {
    let mut thrown = None;
    for &name in names {
        match get_context(name) {
            Ok(Some(context)) => {
                debug!("acquired {} context", name);
                return Ok(context);
            }
            Ok(None) => continue,
            Err(message) => {
                debug!("{} context threw: {:?}", name, message);
                thrown = Some(message);
            }
        }
    }

    Err(RendererError::ContextUnavailable(match thrown {
        Some(Some(message)) => {
            format!(concat!("Error creating ", gl_title!(), " context: {}"), message)
        }
        Some(None) => concat!("Error creating ", gl_title!(), " context").to_owned(),
        None => concat!(gl_title!(), " unsupported").to_owned(),
    }))
}

/// Converts a viewport to an aspect ratio.
pub fn viewport_to_aspect(viewport: UVec2) -> f32 {
    let [width, height] = viewport.as_vec2().to_array();
    width / height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect() {
        assert_eq!(viewport_to_aspect(uvec2(800, 600)), 800.0 / 600.0);
        assert_eq!(viewport_to_aspect(uvec2(256, 256)), 1.0);
    }

    #[test]
    fn context_fallback() {
        let mut tried = Vec::new();
        let context = first_context(&GL_NAMES, |name| {
            tried.push(name.to_owned());
            match name {
                "webgl" => Err(Some("blocked".to_owned())),
                _ => Ok(Some(name.to_owned())),
            }
        });
        assert_eq!(context, Ok("experimental-webgl".to_owned()));
        assert_eq!(tried, GL_NAMES);
    }

    #[test]
    fn context_unavailable() {
        assert_eq!(
            first_context::<()>(&GL_NAMES, |_| Ok(None)),
            Err(RendererError::ContextUnavailable(
                "WebGL unsupported".to_owned()
            ))
        );
        assert_eq!(
            first_context::<()>(&GL_NAMES, |name| match name {
                "webgl" => Err(Some("blocked".to_owned())),
                _ => Ok(None),
            }),
            Err(RendererError::ContextUnavailable(
                "Error creating WebGL context: blocked".to_owned()
            ))
        );
    }
}
