// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::error::RendererError;
use crate::gl::*;
use crate::renderer::Renderer;
use js_hooks::error_message;
use log::{error, info};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlImageElement, WebGlTexture};

/// Whether a [`Texture`]'s pixels have arrived.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureState {
    /// The image is still being fetched, sampling the texture is undefined.
    Loading,
    /// Pixels are uploaded and filtering is set.
    Ready,
}

/// Required for [`Texture::load`]'s callback.
struct TextureInner {
    texture: WebGlTexture,
    state: Cell<TextureState>,
}

/// A 2d array of pixels that you can sample in a [`Shader`][`crate::shader::Shader`]. You can
/// pass it as a uniform to a
/// [`ShaderBinding::uniform_texture`][`crate::shader::ShaderBinding::uniform_texture`].
/// As cheap to clone as an [`Rc`].
#[derive(Clone)]
pub struct Texture {
    inner: Rc<TextureInner>,
}

impl Texture {
    fn new(gl: &Gl) -> Result<Self, RendererError> {
        Ok(Self {
            inner: Rc::new(TextureInner {
                texture: gl.create_texture().ok_or(RendererError::Resource("texture"))?,
                state: Cell::new(TextureState::Loading),
            }),
        })
    }

    fn inner(&self) -> &WebGlTexture {
        &self.inner.texture
    }

    /// Gets the [`TextureState`].
    pub fn state(&self) -> TextureState {
        self.inner.state.get()
    }

    /// Returns true once the image has been uploaded.
    pub fn is_ready(&self) -> bool {
        self.state() == TextureState::Ready
    }

    /// Starts loading an RGBA [`Texture`] from `img_url`. The returned [`Texture`] stays
    /// [`TextureState::Loading`] until the image arrives, at which point it is uploaded flipped
    /// vertically (so uv `(0, 0)` is the bottom left) with linear filtering. If the image fails
    /// to load the error is logged and the [`Texture`] never becomes ready.
    pub fn load(renderer: &Renderer, img_url: &str) -> Result<Self, RendererError> {
        let gl = &renderer.gl;
        let texture = Self::new(gl)?;

        let img = Rc::new(
            HtmlImageElement::new()
                .map_err(|e| RendererError::Dom(error_message(&e).unwrap_or_default()))?,
        );

        // Callback when image is done loading.
        {
            let img2 = img.clone();
            let inner = texture.inner.clone();
            let gl = gl.clone();
            let url = img_url.to_owned();

            let closure = Closure::wrap(Box::new(move || {
                gl.bind_texture(Gl::TEXTURE_2D, Some(&inner.texture));
                gl.pixel_storei(Gl::UNPACK_FLIP_Y_WEBGL, 1);

                let level = 0;
                let result = gl.tex_image_2d_with_u32_and_u32_and_image(
                    Gl::TEXTURE_2D,
                    level,
                    Gl::RGBA as i32,
                    Gl::RGBA,
                    Gl::UNSIGNED_BYTE,
                    &img2,
                );

                gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::LINEAR as i32);
                gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::LINEAR as i32);
                // Non power of 2 textures must not repeat in WebGL.
                gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
                gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);

                gl.pixel_storei(Gl::UNPACK_FLIP_Y_WEBGL, 0);
                gl.bind_texture(Gl::TEXTURE_2D, None);

                match result {
                    Ok(()) => {
                        inner.state.set(TextureState::Ready);
                        info!("loaded texture {} ({}x{})", url, img2.width(), img2.height());
                    }
                    Err(e) => error!(
                        "could not upload texture {}: {}",
                        url,
                        error_message(&e).unwrap_or_default()
                    ),
                }
            }) as Box<dyn FnMut()>);
            img.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        // No retry, the texture just stays loading.
        {
            let url = img_url.to_owned();
            let closure = Closure::wrap(Box::new(move || {
                error!("could not load texture {}", url);
            }) as Box<dyn FnMut()>);
            img.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        // For compatibility with redirect scheme.
        img.set_cross_origin(Some("anonymous"));

        // Start loading image.
        img.set_src(img_url);

        Ok(texture)
    }

    /// Bind a texture for affecting subsequent draw calls.
    pub(crate) fn bind<'a>(&self, renderer: &'a Renderer, index: usize) -> TextureBinding<'a> {
        TextureBinding::new(renderer, index, self)
    }
}

pub(crate) struct TextureBinding<'a> {
    renderer: &'a Renderer,
    index: usize,
}

impl<'a> TextureBinding<'a> {
    fn new(renderer: &'a Renderer, index: usize, texture: &Texture) -> Self {
        renderer.active_texture.set(&renderer.gl, index);
        renderer
            .gl
            .bind_texture(Gl::TEXTURE_2D, Some(texture.inner()));
        Self { renderer, index }
    }

    /// Texture must have been created from the same index and passed to [`std::mem::forget`].
    pub(crate) fn drop_raw_parts(renderer: &'a Renderer, index: usize) {
        drop(Self { renderer, index })
    }
}

impl<'a> Drop for TextureBinding<'a> {
    fn drop(&mut self) {
        // Set active texture (not required in release mode because not unbinding).
        if cfg!(debug_assertions) {
            let gl = &self.renderer.gl;
            self.renderer.active_texture.set(gl, self.index);
            gl.bind_texture(Gl::TEXTURE_2D, None);
        }
    }
}

/// The active texture unit of one context, so redundant `activeTexture` calls can be skipped.
#[derive(Debug, Default)]
pub(crate) struct ActiveTexture(Cell<usize>);

impl ActiveTexture {
    /// Makes `index` active.
    pub(crate) fn set(&self, gl: &Gl, index: usize) {
        if let Some(unit) = self.switch(index) {
            gl.active_texture(unit);
        }
    }

    /// Returns the unit to activate, or [`None`] if `index` is already active.
    fn switch(&self, index: usize) -> Option<u32> {
        assert!(index < 32, "only 32 textures supported");
        if self.0.replace(index) == index {
            None
        } else {
            Some(Gl::TEXTURE0 + index as u32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_texture_per_context() {
        let a = ActiveTexture::default();
        let b = ActiveTexture::default();

        // Unit 0 is active in a new context.
        assert_eq!(a.switch(0), None);
        assert_eq!(a.switch(1), Some(Gl::TEXTURE1));
        assert_eq!(a.switch(1), None);

        // Switching one context doesn't affect another.
        assert_eq!(b.switch(1), Some(Gl::TEXTURE1));
        assert_eq!(a.switch(0), Some(Gl::TEXTURE0));
        assert_eq!(b.switch(1), None);
    }
}
