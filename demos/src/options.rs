// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use log::LevelFilter;
use renderer::RendererError;
use renderer3d::Perspective;
use serde::Deserialize;
use wasm_bindgen::JsValue;

/// Options passed from JavaScript to a demo's start function. Every field is optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DemoOptions {
    /// Element id of the canvas to draw on.
    pub canvas_id: String,
    /// Image for the textured cube, relative to the page.
    pub texture_url: String,
    /// Milliseconds per full rotation.
    pub duration_ms: f64,
    /// Distance from the camera to the model. Defaults depend on the demo.
    pub distance: Option<f32>,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Maximum level that is logged to the console.
    pub log_level: LevelFilter,
}

impl Default for DemoOptions {
    fn default() -> Self {
        let perspective = Perspective::default();
        Self {
            canvas_id: "webgl".to_owned(),
            texture_url: "webgl-logo-256.jpg".to_owned(),
            duration_ms: 5000.0,
            distance: None,
            field_of_view: perspective.fov,
            near: perspective.z_near,
            far: perspective.z_far,
            log_level: LevelFilter::Info,
        }
    }
}

impl DemoOptions {
    /// Deserializes options from a JavaScript object, `undefined` or `null`, and validates them.
    pub fn from_js(value: JsValue) -> Result<Self, RendererError> {
        let options: Self = if value.is_undefined() || value.is_null() {
            Self::default()
        } else {
            serde_wasm_bindgen::from_value(value)
                .map_err(|e| RendererError::Dom(format!("invalid options: {}", e)))?
        };
        options.validate().map_err(RendererError::Dom)?;
        Ok(options)
    }

    /// Returns an error if any value is out of range.
    pub fn validate(&self) -> Result<(), String> {
        if self.canvas_id.is_empty() {
            return Err("canvasId must not be empty".to_owned());
        }
        if !(self.duration_ms > 0.0 && self.duration_ms.is_finite()) {
            return Err(format!(
                "durationMs must be positive and finite, got {}",
                self.duration_ms
            ));
        }
        if let Some(distance) = self.distance {
            if !distance.is_finite() {
                return Err(format!("distance must be finite, got {}", distance));
            }
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(format!(
                "fieldOfView must be between 0 and 180 degrees, got {}",
                self.field_of_view
            ));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(format!(
                "need 0 < near < far < infinity, got near {} and far {}",
                self.near, self.far
            ));
        }
        Ok(())
    }

    /// The [`Perspective`] for a viewport with `aspect` ratio.
    pub fn perspective(&self, aspect: f32) -> Perspective {
        Perspective {
            aspect,
            fov: self.field_of_view,
            z_near: self.near,
            z_far: self.far,
        }
    }
}
