/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self { r: ((hex >> 16) & 0xFF) as u8, g: ((hex >> 8) & 0xFF) as u8, b: (hex & 0xFF) as u8 }
    }

    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Candle body/wick color for rising bars (TW convention: red is up)
pub const CANDLE_UP: Color = Color::from_hex(0xef5350);
/// Candle body/wick color for falling bars
pub const CANDLE_DOWN: Color = Color::from_hex(0x26a69a);

/// Fixed palette for MA overlays; assigned by ascending period rank,
/// wrapping when there are more lines than palette entries.
pub const MA_PALETTE: [Color; 8] = [
    Color::from_hex(0xff6b6b), // Red
    Color::from_hex(0xffd93d), // Yellow
    Color::from_hex(0x6bcb77), // Green
    Color::from_hex(0x4d96ff), // Blue
    Color::from_hex(0xff9ff3), // Pink
    Color::from_hex(0xa29bfe), // Purple
    Color::from_hex(0x00d2d3), // Cyan
    Color::from_hex(0xff9f43), // Orange
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        assert_eq!(Color::from_hex(0xff6b6b).to_css(), "#ff6b6b");
        assert_eq!(Color::from_hex(0x00d2d3).to_css(), "#00d2d3");
    }

    #[test]
    fn palette_colors_are_distinct() {
        for (i, a) in MA_PALETTE.iter().enumerate() {
            for b in MA_PALETTE.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
