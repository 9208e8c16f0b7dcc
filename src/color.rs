//! Color values for styled spans.
//!
//! Colors are plain RGB triples. Parsing accepts the sixteen named colors of
//! the markup language plus `#rrggbb` hex. Display prints the canonical name
//! when the value matches a named constant exactly, the hex form otherwise.

use std::fmt;

use phf::phf_map;

/// Named color table, keyed by lowercase name.
static NAMED_COLORS: phf::Map<&'static str, Color> = phf_map! {
    "black" => Color::new(0x00, 0x00, 0x00),
    "dark_blue" => Color::new(0x00, 0x00, 0xaa),
    "dark_green" => Color::new(0x00, 0xaa, 0x00),
    "dark_aqua" => Color::new(0x00, 0xaa, 0xaa),
    "dark_red" => Color::new(0xaa, 0x00, 0x00),
    "dark_purple" => Color::new(0xaa, 0x00, 0xaa),
    "gold" => Color::new(0xff, 0xaa, 0x00),
    "gray" => Color::new(0xaa, 0xaa, 0xaa),
    "dark_gray" => Color::new(0x55, 0x55, 0x55),
    "blue" => Color::new(0x55, 0x55, 0xff),
    "green" => Color::new(0x55, 0xff, 0x55),
    "aqua" => Color::new(0x55, 0xff, 0xff),
    "red" => Color::new(0xff, 0x55, 0x55),
    "light_purple" => Color::new(0xff, 0x55, 0xff),
    "yellow" => Color::new(0xff, 0xff, 0x55),
    "white" => Color::new(0xff, 0xff, 0xff),
};

/// An RGB color attached to a styled span.
///
/// # Examples
///
/// ```
/// use minimark::Color;
///
/// assert_eq!(Color::parse("yellow"), Some(Color::new(0xff, 0xff, 0x55)));
/// assert_eq!(Color::parse("#ff00ff").map(|c| c.to_string()).as_deref(), Some("#ff00ff"));
/// assert_eq!(Color::parse("not a color"), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color from a name or a `#rrggbb` hex string.
    ///
    /// Returns `None` for anything else; callers treat that as "this tag is
    /// not a color" rather than an error.
    pub fn parse(input: &str) -> Option<Color> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        Self::by_name(input)
    }

    /// Look up one of the sixteen named colors, case-insensitively.
    pub fn by_name(name: &str) -> Option<Color> {
        NAMED_COLORS.get(name.to_ascii_lowercase().as_str()).copied()
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Color::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }

    /// Canonical name of this color, when it matches a named constant exactly.
    pub fn name(&self) -> Option<&'static str> {
        NAMED_COLORS
            .entries()
            .find(|&(_, c)| *c == *self)
            .map(|(name, _)| *name)
    }

    /// Linear interpolation between two colors.
    ///
    /// Each channel interpolates independently in RGB space; `t` is clamped
    /// to `[0, 1]` and channels round to the nearest integer.
    pub fn lerp(t: f32, a: Color, b: Color) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |x: u8, y: u8| (x as f32 + t * (y as f32 - x as f32)).round() as u8;
        Color::new(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named() {
        assert_eq!(Color::parse("red"), Some(Color::new(0xff, 0x55, 0x55)));
        assert_eq!(Color::parse("dark_gray"), Some(Color::new(0x55, 0x55, 0x55)));
        assert_eq!(Color::parse("  white  "), Some(Color::WHITE));
    }

    #[test]
    fn parse_named_case_insensitive() {
        assert_eq!(Color::parse("RED"), Color::parse("red"));
        assert_eq!(Color::parse("Dark_Aqua"), Color::parse("dark_aqua"));
    }

    #[test]
    fn parse_hex() {
        assert_eq!(Color::parse("#ff00ff"), Some(Color::new(0xff, 0x00, 0xff)));
        assert_eq!(Color::parse("#5e4fa2"), Some(Color::new(0x5e, 0x4f, 0xa2)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Color::parse(""), None);
        assert_eq!(Color::parse("#ff00f"), None);
        assert_eq!(Color::parse("#ff00fg"), None);
        assert_eq!(Color::parse("notacolor"), None);
    }

    #[test]
    fn display_prefers_names() {
        assert_eq!(Color::parse("#ffff55").map(|c| c.to_string()).as_deref(), Some("yellow"));
        assert_eq!(Color::new(0xf4, 0xf4, 0xf4).to_string(), "#f4f4f4");
    }

    #[test]
    fn lerp_endpoints_and_rounding() {
        let green = Color::parse("green").expect("named");
        let blue = Color::parse("blue").expect("named");
        assert_eq!(Color::lerp(0.0, green, blue), green);
        assert_eq!(Color::lerp(1.0, green, blue), blue);
        // one step of a 24-glyph run
        let step = Color::lerp(1.0 / 23.0, green, blue);
        assert_eq!(step.to_string(), "#55f85c");
    }

    #[test]
    fn lerp_clamps() {
        let a = Color::BLACK;
        let b = Color::WHITE;
        assert_eq!(Color::lerp(-0.5, a, b), a);
        assert_eq!(Color::lerp(1.5, a, b), b);
    }
}
