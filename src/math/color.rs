// color.rs - Packed colour helpers
//
// Colours travel to the GPU as ABGR words (R in the low byte).

/// Linear RGBA with components in `[0, 1]`.
pub type Rgba = [f32; 4];

pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

/// White at the given opacity.
#[inline]
pub fn alpha(a: f32) -> Rgba {
    [1.0, 1.0, 1.0, a]
}

/// Pack 8-bit channels into an ABGR word.
#[inline]
pub fn pack_abgr(r: u8, g: u8, b: u8, a: u8) -> u32 {
    r as u32 | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24
}

/// Unpack an ABGR word into `(r, g, b, a)`.
#[inline]
pub fn unpack_abgr(c: u32) -> (u8, u8, u8, u8) {
    (c as u8, (c >> 8) as u8, (c >> 16) as u8, (c >> 24) as u8)
}

#[inline]
fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Hue/saturation/brightness (all in `[0, 1]`) to a packed ABGR word.
pub fn hsb_to_abgr(h: f32, s: f32, b: f32, a: f32) -> u32 {
    let (r, g, bl) = if s <= 0.0 {
        (b, b, b)
    } else {
        let sector = (h - h.floor()) * 6.0;
        let i = sector.floor();
        let f = sector - i;
        let p = b * (1.0 - s);
        let q = b * (1.0 - s * f);
        let t = b * (1.0 - s * (1.0 - f));
        match i as u32 {
            0 => (b, t, p),
            1 => (q, b, p),
            2 => (p, b, t),
            3 => (p, q, b),
            4 => (t, p, b),
            _ => (b, p, q),
        }
    };
    pack_abgr(unit_to_byte(r), unit_to_byte(g), unit_to_byte(bl), unit_to_byte(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(hsb_to_abgr(0.0, 1.0, 1.0, 1.0), 0xFF0000FF);
        assert_eq!(hsb_to_abgr(1.0 / 3.0, 1.0, 1.0, 1.0), 0xFF00FF00);
        assert_eq!(hsb_to_abgr(2.0 / 3.0, 1.0, 1.0, 1.0), 0xFFFF0000);
    }

    #[test]
    fn zero_brightness_is_black() {
        let (r, g, b, a) = unpack_abgr(hsb_to_abgr(0.21, 0.9, 0.0, 1.0));
        assert_eq!((r, g, b, a), (0, 0, 0, 255));
    }

    #[test]
    fn grey_when_unsaturated() {
        let (r, g, b, _) = unpack_abgr(hsb_to_abgr(0.5, 0.0, 0.5, 1.0));
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
