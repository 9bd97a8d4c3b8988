// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use glam::Vec3;
use std::f64::consts::TAU;

/// Turns elapsed wall clock time into rotation about a fixed axis, so that a model completes one
/// revolution every `duration_ms` regardless of frame rate.
#[derive(Clone, Debug)]
pub struct Spin {
    axis: Vec3,
    duration_ms: f64,
    last_ms: f64,
    total: f64,
}

impl Spin {
    /// Creates a [`Spin`] about `axis` (normalized here) that starts counting at `start_ms`.
    pub fn new(axis: Vec3, duration_ms: f64, start_ms: f64) -> Self {
        assert!(duration_ms > 0.0, "duration must be positive");
        Self {
            axis: axis.normalize(),
            duration_ms,
            last_ms: start_ms,
            total: 0.0,
        }
    }

    /// The normalized axis of rotation.
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Returns the angle in radians to rotate by since the last call.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        // Frame timestamps may predate the start time slightly.
        let delta = (now_ms - self.last_ms).max(0.0);
        self.last_ms = self.last_ms.max(now_ms);

        let angle = TAU * delta / self.duration_ms;
        self.total += angle;
        angle as f32
    }

    /// Restarts counting from `now_ms` without rotating.
    pub fn rebase(&mut self, now_ms: f64) {
        self.last_ms = now_ms;
    }

    /// Sum of every angle returned by [`Spin::advance`], in radians.
    pub fn total_angle(&self) -> f64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin_frames(frames: u32) -> Spin {
        let mut spin = Spin::new(Vec3::ONE, 5000.0, 0.0);
        for i in 1..=frames {
            spin.advance(5000.0 * i as f64 / frames as f64);
        }
        spin
    }

    #[test]
    fn one_revolution_per_duration() {
        let ten = spin_frames(10);
        let hundred = spin_frames(100);
        assert!((ten.total_angle() - TAU).abs() < 1e-9);
        assert!((hundred.total_angle() - TAU).abs() < 1e-9);
        assert!((ten.total_angle() - hundred.total_angle()).abs() < 1e-9);
    }

    #[test]
    fn uneven_frames() {
        let mut spin = Spin::new(Vec3::ONE, 5000.0, 1000.0);
        for now in [1016.0, 1100.0, 1101.5, 3000.0, 6000.0] {
            spin.advance(now);
        }
        assert!((spin.total_angle() - TAU).abs() < 1e-9);
    }

    #[test]
    fn axis_normalized() {
        let spin = Spin::new(Vec3::ONE, 5000.0, 0.0);
        assert!((spin.axis().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn early_timestamp() {
        let mut spin = Spin::new(Vec3::ONE, 5000.0, 100.0);
        assert_eq!(spin.advance(90.0), 0.0);
        assert!((spin.advance(1350.0) as f64 - TAU / 4.0).abs() < 1e-6);
    }

    #[test]
    fn rebase() {
        let mut spin = Spin::new(Vec3::ONE, 5000.0, 0.0);
        spin.rebase(4000.0);
        assert!((spin.advance(4500.0) as f64 - TAU / 10.0).abs() < 1e-6);
    }
}
