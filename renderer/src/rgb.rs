// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use glam::Vec4;

/// RGBA array to [`Vec4`].
pub fn rgba_array(rgba: [u8; 4]) -> Vec4 {
    Vec4::from(rgba.map(convert))
}

/// RGBA hex to [`Vec4`].
pub fn rgba_hex(hex: u32) -> Vec4 {
    rgba_array(hex.to_be_bytes())
}

// Converts a u8 component to an f32.
fn convert(v: u8) -> f32 {
    v as f32 * (1.0 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex() {
        assert_eq!(rgba_hex(0xff0000ff), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(rgba_hex(0x00ffff00), Vec4::new(0.0, 1.0, 1.0, 0.0));
        assert_eq!(rgba_array([0, 255, 0, 255]), Vec4::new(0.0, 1.0, 0.0, 1.0));
    }
}
