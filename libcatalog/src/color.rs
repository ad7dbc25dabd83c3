//! 8-bit RGBA colors as stored in catalog records.

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Build an opaque color from components in `[0, 1]`.
    pub fn from_unit_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::from_unit_rgba(red, green, blue, 1.0)
    }

    /// Build a color from components in `[0, 1]`; out-of-range components clamp.
    pub fn from_unit_rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self::new(
            unit_to_channel(red),
            unit_to_channel(green),
            unit_to_channel(blue),
            unit_to_channel(alpha),
        )
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`. Any other digit count is rejected.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 0xff)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Channels as floats in `[0, 1]`, in RGBA order.
    pub fn to_unit_rgba(self) -> [f32; 4] {
        [
            f32::from(self.red) / 255.0,
            f32::from(self.green) / 255.0,
            f32::from(self.blue) / 255.0,
            f32::from(self.alpha) / 255.0,
        ]
    }
}

fn unit_to_channel(v: f64) -> u8 {
    // NaN clamps to NaN; treat it as zero.
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
