//! Pick identifier color encoding.
//!
//! Every pickable mesh is drawn into the pick buffer with a flat color that
//! encodes its 32-bit pick identifier. Reading the pixel under the cursor and
//! decoding its color recovers the identifier.
//!
//! The channel layout is fixed:
//! - R contains bits 0-7
//! - G contains bits 8-15
//! - B contains bits 16-23
//! - A contains bits 24-31
//!
//! Each channel is normalized to `[0, 1]` by dividing by 255 before upload.

use glam::Vec4;

/// Splits a pick identifier into its four 8-bit channels, `[R, G, B, A]`.
#[must_use]
pub fn pick_rgba8(pick_id: u32) -> [u8; 4] {
    pick_id.to_le_bytes()
}

/// Encodes a pick identifier as the normalized color uploaded to the
/// `pickColor` uniform.
#[must_use]
pub fn pick_color(pick_id: u32) -> Vec4 {
    let [r, g, b, a] = pick_rgba8(pick_id);
    Vec4::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(a) / 255.0,
    )
}

/// Decodes an 8-bit RGBA pixel read back from the pick buffer.
#[must_use]
pub fn pick_id_from_rgba8(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

/// Decodes a normalized color back to a pick identifier.
///
/// Channels are clamped to `[0, 1]` and rounded to the nearest 1/255 step, so
/// values that went through an 8-bit render target decode exactly.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pick_id_from_color(color: Vec4) -> u32 {
    let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    pick_id_from_rgba8([
        quantize(color.x),
        quantize(color.y),
        quantize(color.z),
        quantize(color.w),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_channel_order() {
        let color = pick_color(0x1A2B_3C4D);
        assert_eq!(color.x, f32::from(0x4Du8) / 255.0);
        assert_eq!(color.y, f32::from(0x3Cu8) / 255.0);
        assert_eq!(color.z, f32::from(0x2Bu8) / 255.0);
        assert_eq!(color.w, f32::from(0x1Au8) / 255.0);
    }

    #[test]
    fn test_specific_colors() {
        assert_eq!(pick_rgba8(0), [0, 0, 0, 0]);
        assert_eq!(pick_rgba8(1), [1, 0, 0, 0]);
        assert_eq!(pick_rgba8(0x0000_FF00), [0, 255, 0, 0]);
        assert_eq!(pick_rgba8(0x00FF_0000), [0, 0, 255, 0]);
        assert_eq!(pick_rgba8(0xFF00_0000), [0, 0, 0, 255]);
        assert_eq!(pick_color(u32::MAX), Vec4::ONE);
        assert_eq!(pick_color(0), Vec4::ZERO);
    }

    #[test]
    fn test_decode_tolerates_render_target_rounding() {
        let mut color = pick_color(0x0102_0304);
        color.x += 0.001;
        color.w -= 0.001;
        assert_eq!(pick_id_from_color(color), 0x0102_0304);
    }

    proptest! {
        #[test]
        fn prop_color_roundtrip(pick_id in any::<u32>()) {
            prop_assert_eq!(pick_id_from_color(pick_color(pick_id)), pick_id);
        }

        #[test]
        fn prop_rgba8_roundtrip(pick_id in any::<u32>()) {
            prop_assert_eq!(pick_id_from_rgba8(pick_rgba8(pick_id)), pick_id);
        }
    }
}
