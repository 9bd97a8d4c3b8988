// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "js_hooks"]

//! # Js Hooks
//!
//! [`js_hooks`][`crate`] is a collection of utilities for a WASM application in a JavaScript environment.

use js_sys::Reflect;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fmt;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

/// Gets the window.
pub fn window() -> Window {
    web_sys::window().expect("no window")
}

/// Gets the document.
pub fn document() -> Document {
    window().document().expect("no document")
}

/// Gets the canvas with the element id `id` for use with WebGL.
pub fn canvas(id: &str) -> Result<HtmlCanvasElement, String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document".to_string())?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("no canvas #{id}"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| format!("#{id} is not a canvas"))
}

/// Gets the text content of the element with the id `id`, if it exists.
pub fn element_text(id: &str) -> Option<String> {
    document().get_element_by_id(id)?.text_content()
}

/// Milliseconds since the page started loading, in the same time base as
/// [`request_animation_frame`] timestamps.
pub fn now_ms() -> f64 {
    window().performance().map(|p| p.now()).unwrap_or_default()
}

/// Schedules `f` to be called with the frame timestamp (in milliseconds) before the next repaint.
pub fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> Result<i32, String> {
    window()
        .request_animation_frame(f.as_ref().unchecked_ref())
        .map_err(|e| error_message(&e).unwrap_or_else(|| "requestAnimationFrame failed".into()))
}

/// Extracts an error message from a JavaScript error.
pub fn error_message(error: &JsValue) -> Option<String> {
    Reflect::get(error, &JsValue::from_str("message"))
        .as_ref()
        .ok()
        .and_then(JsValue::as_string)
}

/// Log an error to JavaScript's console. Use this instead of [`eprintln!`].
#[macro_export]
macro_rules! console_error {
    ($($t:tt)*) => {
        $crate::error_args(&format_args!($($t)*))
    };
}

/// Log to JavaScript's console. Use this instead of [`println!`].
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        $crate::log_args(&format_args!($($t)*))
    };
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error_str(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn console_log_str(s: &str);

}

#[doc(hidden)]
pub fn error_args(args: &fmt::Arguments) {
    console_error_str(&args.to_string())
}

#[doc(hidden)]
pub fn log_args(args: &fmt::Arguments) {
    console_log_str(&args.to_string())
}

/// A [`Log`] that writes [`log`] records to JavaScript's console.
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => console_error!("[{}] {}", record.target(), record.args()),
            level => console_log!("{} [{}] {}", level, record.target(), record.args()),
        }
    }

    fn flush(&self) {}
}

/// Installs [`ConsoleLogger`] as the global logger. Only the first call installs it, later calls
/// only change the `level`.
pub fn init_logger(level: LevelFilter) {
    // Fails if already set, which is fine.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
