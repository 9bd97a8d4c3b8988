// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![crate_name = "webgl_tutorial"]

//! # WebGL Tutorial
//!
//! Three WebGL demos, each building on the last: a white quad, a spinning cube with colored
//! faces, and a spinning cube with a texture. Start one from JavaScript:
//!
//! ```js
//! import init, { start_cube } from "./webgl_tutorial.js";
//! await init();
//! start_cube({ canvasId: "webgl", durationMs: 5000 });
//! ```

mod cube;
mod options;
mod quad;
mod textured_cube;

pub use options::DemoOptions;

use cube::CubeLayer;
use glam::Vec3;
use js_hooks::{element_text, init_logger, now_ms};
use log::{error, info, LevelFilter};
use quad::QuadLayer;
use renderer::{Renderer, RendererError};
use renderer3d::{animate, Camera3d, FrameDriver, Spin};
use std::fmt;
use textured_cube::TexturedCubeLayer;
use wasm_bindgen::prelude::*;

/// Element id of the vertex shader source in the page.
pub const VERTEX_SHADER_ID: &str = "vertexShaderSource";
/// Element id of the fragment shader source in the page.
pub const FRAGMENT_SHADER_ID: &str = "fragmentShaderSource";

/// Draws a white quad once.
#[wasm_bindgen]
pub fn start_quad(options: JsValue) {
    start(Demo::Quad, options);
}

/// Spins a cube with colored faces.
#[wasm_bindgen]
pub fn start_cube(options: JsValue) {
    start(Demo::Cube, options);
}

/// Spins a textured cube once the texture has loaded.
#[wasm_bindgen]
pub fn start_textured_cube(options: JsValue) {
    start(Demo::TexturedCube, options);
}

fn start(demo: Demo, options: JsValue) {
    // Required to get stack traces in WASM.
    #[cfg(target_family = "wasm")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let options = match DemoOptions::from_js(options) {
        Ok(options) => options,
        Err(e) => {
            init_logger(LevelFilter::Info);
            error!("{} demo not started: {}", demo, e);
            return;
        }
    };
    init_logger(options.log_level);

    match demo.run(&options) {
        Ok(()) => info!("{} demo started", demo),
        // Nothing is drawn after a failed setup.
        Err(e) => error!("{} demo failed: {}", demo, e),
    }
}

/// One of the demos.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Demo {
    /// A white quad, drawn once.
    Quad,
    /// A spinning cube with colored faces.
    Cube,
    /// A spinning cube with a texture on each face.
    TexturedCube,
}

impl Demo {
    /// Distance from the camera to the model, unless overridden by [`DemoOptions::distance`].
    pub fn default_distance(self) -> f32 {
        match self {
            Self::Quad => 3.333,
            Self::Cube => 8.0,
            Self::TexturedCube => 4.0,
        }
    }

    /// Axis the model spins about, if it spins.
    pub fn spin_axis(self) -> Option<Vec3> {
        match self {
            Self::Quad => None,
            Self::Cube | Self::TexturedCube => Some(Vec3::ONE),
        }
    }

    /// Sets up the demo and draws it once or starts its animation loop.
    pub fn run(self, options: &DemoOptions) -> Result<(), RendererError> {
        let canvas = js_hooks::canvas(&options.canvas_id)?;
        let renderer = Renderer::new(canvas)?;

        let distance = options.distance.unwrap_or_else(|| self.default_distance());
        let camera = Camera3d::new(options.perspective(renderer.aspect_ratio()), distance);
        let spin = self
            .spin_axis()
            .map(|axis| Spin::new(axis, options.duration_ms, now_ms()));

        match self {
            Self::Quad => {
                let layer = QuadLayer::new(&renderer)?;
                FrameDriver::new(renderer, layer, camera, spin).frame(now_ms());
                Ok(())
            }
            Self::Cube => {
                renderer.set_depth_test(true);
                let layer = CubeLayer::new(&renderer)?;
                animate(FrameDriver::new(renderer, layer, camera, spin))
            }
            Self::TexturedCube => {
                renderer.set_depth_test(true);
                let layer = TexturedCubeLayer::new(&renderer, &options.texture_url)?;
                animate(FrameDriver::new(renderer, layer, camera, spin))
            }
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Quad => "quad",
            Self::Cube => "cube",
            Self::TexturedCube => "textured cube",
        })
    }
}

/// GLSL sources bundled with a demo, used when the page doesn't provide its own.
pub(crate) struct ShaderSource {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

/// Reads the vertex and fragment sources from the page, falling back to `bundled` for each
/// missing element.
pub(crate) fn shader_source(bundled: &ShaderSource) -> (String, String) {
    let read = |id: &str, fallback: &'static str| {
        element_text(id).unwrap_or_else(|| {
            info!("no #{} element, using bundled shader", id);
            fallback.to_owned()
        })
    };
    (
        read(VERTEX_SHADER_ID, bundled.vertex),
        read(FRAGMENT_SHADER_ID, bundled.fragment),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::POSITION_ATTRIBUTE;
    use renderer3d::shapes::{COLOR_ATTRIBUTE, TEX_COORD_ATTRIBUTE};
    use renderer3d::{MODEL_VIEW_UNIFORM, PROJECTION_UNIFORM};

    #[test]
    fn distances() {
        assert_eq!(Demo::Quad.default_distance(), 3.333);
        assert_eq!(Demo::Cube.default_distance(), 8.0);
        assert_eq!(Demo::TexturedCube.default_distance(), 4.0);
    }

    #[test]
    fn only_cubes_spin() {
        assert_eq!(Demo::Quad.spin_axis(), None);
        assert_eq!(Demo::Cube.spin_axis(), Some(Vec3::ONE));
        assert_eq!(Demo::TexturedCube.spin_axis(), Some(Vec3::ONE));
    }

    #[test]
    fn bundled_shaders_use_names() {
        for (shaders, attribute, extra_uniform) in [
            (&quad::SHADERS, None, None),
            (&cube::SHADERS, Some(COLOR_ATTRIBUTE), None),
            (
                &textured_cube::SHADERS,
                Some(TEX_COORD_ATTRIBUTE),
                Some(textured_cube::SAMPLER_UNIFORM),
            ),
        ] {
            let vertex = shaders.vertex;
            assert!(vertex.contains(&format!("attribute vec3 {};", POSITION_ATTRIBUTE)));
            assert!(vertex.contains(PROJECTION_UNIFORM));
            assert!(vertex.contains(MODEL_VIEW_UNIFORM));
            if let Some(attribute) = attribute {
                assert!(vertex.contains(attribute), "{}", attribute);
            }
            if let Some(uniform) = extra_uniform {
                assert!(shaders.fragment.contains(uniform));
            }
            assert!(shaders.fragment.contains("gl_FragColor"));
        }
    }

    #[test]
    fn display() {
        assert_eq!(Demo::TexturedCube.to_string(), "textured cube");
    }
}
