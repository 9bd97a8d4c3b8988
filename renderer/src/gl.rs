// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Gl primitives shared by the rest of the crate. Only WebGL (1) is targeted, older browsers
//! only expose it under the prefixed `experimental-webgl` name.

pub(crate) type Gl = web_sys::WebGlRenderingContext;

/// Names of the context for the get_context call, tried in order.
pub(crate) const GL_NAMES: [&str; 2] = ["webgl", "experimental-webgl"];

// Use a macro so concat!() works.
macro_rules! gl_title {
    () => {
        "WebGL"
    };
}
