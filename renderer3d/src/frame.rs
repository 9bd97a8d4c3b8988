// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::camera_3d::Camera3d;
use crate::spin::Spin;
use js_hooks::request_animation_frame;
use log::{error, info};
use renderer::{Renderer, RendererError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Something a [`FrameDriver`] can clear at the start of each drawn frame.
pub trait FrameTarget {
    /// Clears the color and depth buffers.
    fn clear(&self);
}

impl FrameTarget for Renderer {
    fn clear(&self) {
        Renderer::clear(self)
    }
}

/// Contains things that can be drawn onto a `T`.
pub trait Layer<T> {
    /// Returns false while resources (such as textures) are still loading. Frames are skipped
    /// until it returns true.
    fn is_ready(&self) -> bool {
        true
    }

    /// Renders the [`Layer`] as seen by `camera`.
    fn render(&mut self, target: &T, camera: &Camera3d);
}

/// Whether a [`FrameDriver`] is waiting for its next frame or inside one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameState {
    /// Waiting for the next animation frame.
    Scheduled,
    /// Inside [`FrameDriver::frame`].
    Executing,
}

/// What [`FrameDriver::frame`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The [`Layer`] wasn't ready, nothing was drawn.
    Skipped,
    /// Cleared and drew the [`Layer`] once.
    Drawn,
}

/// Owns everything needed to draw a frame: the target, a [`Layer`], its [`Camera3d`] and an
/// optional [`Spin`] that rotates the model between frames.
pub struct FrameDriver<T, L> {
    target: T,
    layer: L,
    /// Current camera, rotated after every drawn frame.
    pub camera: Camera3d,
    spin: Option<Spin>,
    state: FrameState,
    drawn: u64,
    skipped: u64,
}

impl<T: FrameTarget, L: Layer<T>> FrameDriver<T, L> {
    /// Creates a [`FrameDriver`]. Without a `spin` the model never rotates.
    pub fn new(target: T, layer: L, camera: Camera3d, spin: Option<Spin>) -> Self {
        Self {
            target,
            layer,
            camera,
            spin,
            state: FrameState::Scheduled,
            drawn: 0,
            skipped: 0,
        }
    }

    /// Draws a frame at `now_ms` (a [`request_animation_frame`] timestamp) if the [`Layer`] is
    /// ready.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        self.state = FrameState::Executing;

        let outcome = if self.layer.is_ready() {
            if self.drawn == 0 && self.skipped > 0 {
                info!("resources ready after {} skipped frames", self.skipped);
            }

            self.target.clear();
            self.layer.render(&self.target, &self.camera);

            if let Some(spin) = &mut self.spin {
                let angle = spin.advance(now_ms);
                self.camera.rotate(spin.axis(), angle);
            }

            self.drawn += 1;
            FrameOutcome::Drawn
        } else {
            // Time spent loading doesn't count towards rotation.
            if let Some(spin) = &mut self.spin {
                spin.rebase(now_ms);
            }
            self.skipped += 1;
            FrameOutcome::Skipped
        };

        self.state = FrameState::Scheduled;
        outcome
    }

    /// Gets the current [`FrameState`].
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Number of frames that were drawn.
    pub fn drawn_frames(&self) -> u64 {
        self.drawn
    }

    /// Number of frames that were skipped because the [`Layer`] wasn't ready.
    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    /// Gets the target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Gets the [`Layer`].
    pub fn layer(&self) -> &L {
        &self.layer
    }
}

/// Calls [`FrameDriver::frame`] once per animation frame, forever. The next frame is requested
/// before the current one is drawn.
pub fn animate<T, L>(mut driver: FrameDriver<T, L>) -> Result<(), RendererError>
where
    T: FrameTarget + 'static,
    L: Layer<T> + 'static,
{
    let next: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next_clone = Rc::clone(&next);

    let closure = Closure::wrap(Box::new(move |now_ms: f64| {
        if let Some(callback) = next_clone.borrow().as_ref() {
            if let Err(e) = request_animation_frame(callback) {
                error!("could not request next frame: {}", e);
            }
        }
        driver.frame(now_ms);
    }) as Box<dyn FnMut(f64)>);

    request_animation_frame(&closure)?;

    // The closure owns a reference to itself, so it lives as long as the page.
    *next.borrow_mut() = Some(closure);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera_3d::Perspective;
    use glam::{Mat4, Vec3};
    use std::cell::{Cell, RefCell};
    use std::f64::consts::TAU;

    #[derive(Default)]
    struct MockTarget {
        clears: Cell<u32>,
        events: RefCell<Vec<&'static str>>,
    }

    impl FrameTarget for MockTarget {
        fn clear(&self) {
            self.clears.set(self.clears.get() + 1);
            self.events.borrow_mut().push("clear");
        }
    }

    struct MockLayer {
        ready: Rc<Cell<bool>>,
        draws: u32,
        model_views: Vec<Mat4>,
    }

    impl MockLayer {
        fn new(ready: bool) -> (Self, Rc<Cell<bool>>) {
            let ready = Rc::new(Cell::new(ready));
            (
                Self {
                    ready: Rc::clone(&ready),
                    draws: 0,
                    model_views: Vec::new(),
                },
                ready,
            )
        }
    }

    impl Layer<MockTarget> for MockLayer {
        fn is_ready(&self) -> bool {
            self.ready.get()
        }

        fn render(&mut self, target: &MockTarget, camera: &Camera3d) {
            target.events.borrow_mut().push("draw");
            self.draws += 1;
            self.model_views.push(camera.model_view_matrix);
        }
    }

    fn driver(ready: bool, start_ms: f64) -> (FrameDriver<MockTarget, MockLayer>, Rc<Cell<bool>>) {
        let (layer, ready) = MockLayer::new(ready);
        let driver = FrameDriver::new(
            MockTarget::default(),
            layer,
            Camera3d::new(Perspective::default(), 8.0),
            Some(Spin::new(Vec3::ONE, 5000.0, start_ms)),
        );
        (driver, ready)
    }

    #[test]
    fn skips_until_ready() {
        let (mut driver, ready) = driver(false, 0.0);
        let initial = driver.camera.model_view_matrix;

        for i in 1..=5 {
            assert_eq!(driver.frame(i as f64 * 16.0), FrameOutcome::Skipped);
            assert_eq!(driver.state(), FrameState::Scheduled);
        }
        assert_eq!(driver.target().clears.get(), 0);
        assert_eq!(driver.layer().draws, 0);
        assert_eq!(driver.camera.model_view_matrix, initial);
        assert_eq!(driver.skipped_frames(), 5);

        ready.set(true);
        assert_eq!(driver.frame(96.0), FrameOutcome::Drawn);
        assert_eq!(driver.layer().draws, 1);
        assert_eq!(driver.drawn_frames(), 1);
    }

    #[test]
    fn one_draw_per_frame() {
        let (mut driver, _) = driver(true, 0.0);
        for i in 1..=3 {
            assert_eq!(driver.frame(i as f64 * 16.0), FrameOutcome::Drawn);
            assert_eq!(driver.state(), FrameState::Scheduled);
        }
        assert_eq!(driver.target().clears.get(), 3);
        assert_eq!(driver.layer().draws, 3);
        assert_eq!(
            *driver.target().events.borrow(),
            ["clear", "draw", "clear", "draw", "clear", "draw"]
        );
    }

    #[test]
    fn draws_before_rotating() {
        let (mut driver, _) = driver(true, 0.0);
        let initial = driver.camera.model_view_matrix;
        driver.frame(1000.0);
        driver.frame(2000.0);

        let model_views = &driver.layer().model_views;
        assert_eq!(model_views[0], initial);
        assert!(!model_views[1].abs_diff_eq(initial, 1e-3));
    }

    fn revolution(frames: u32) -> Mat4 {
        let (mut driver, _) = driver(true, 0.0);
        for i in 1..=frames {
            driver.frame(5000.0 * i as f64 / frames as f64);
        }
        driver.camera.model_view_matrix
    }

    #[test]
    fn full_revolution() {
        let initial = Camera3d::new(Perspective::default(), 8.0).model_view_matrix;
        let ten = revolution(10);
        let hundred = revolution(100);
        assert!(ten.abs_diff_eq(initial, 1e-4), "{:?}", ten);
        assert!(hundred.abs_diff_eq(initial, 1e-4), "{:?}", hundred);
        assert!(ten.abs_diff_eq(hundred, 1e-4));
    }

    #[test]
    fn loading_time_ignored() {
        let (mut driver, ready) = driver(false, 0.0);
        driver.frame(100.0);
        driver.frame(3000.0);
        ready.set(true);

        // Only time after the last skipped frame counts.
        driver.frame(4250.0);
        driver.frame(5500.0);
        assert!((driver.spin.as_ref().unwrap().total_angle() - TAU / 2.0).abs() < 1e-9);
    }

    #[test]
    fn without_spin() {
        let (layer, _) = MockLayer::new(true);
        let camera = Camera3d::new(Perspective::default(), 3.333);
        let initial = camera.model_view_matrix;
        let mut driver = FrameDriver::new(MockTarget::default(), layer, camera, None);
        assert_eq!(driver.frame(0.0), FrameOutcome::Drawn);
        assert_eq!(driver.frame(5000.0), FrameOutcome::Drawn);
        assert_eq!(driver.camera.model_view_matrix, initial);
    }
}
