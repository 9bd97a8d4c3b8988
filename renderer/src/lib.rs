// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "renderer"]

//! # Renderer
//!
//! [`renderer`][`crate`] is a thin abstraction over
//! [WebGL](https://rustwasm.github.io/wasm-bindgen/api/web_sys/struct.WebGlRenderingContext.html)
//! for drawing static meshes with a single shader program.

// Gl primitives should not escape this crate.
#[macro_use]
mod gl;

mod buffer;
mod error;
mod index;
mod renderer;
mod rgb;
mod shader;
mod texture;
mod vertex;

// Re-export to provide a simpler api.
pub use buffer::*;
pub use error::*;
pub use index::*;
pub use renderer::*;
pub use rgb::*;
pub use shader::*;
pub use texture::*;
pub use vertex::*;
