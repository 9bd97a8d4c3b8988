// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "renderer3d"]

//! # Renderer3D
//!
//! [`renderer3d`][`crate`] is an add-on to [`renderer`] that provides a [`Camera3d`], the quad and
//! cube [`shapes`] and a [`FrameDriver`] that spins a model once per animation frame.

mod camera_3d;
mod frame;
pub mod shapes;
mod spin;

// Re-export to provide a simpler api.
pub use camera_3d::*;
pub use frame::*;
pub use spin::*;
