//! color normalization
//!
//! hosts hand colors over either as a packed 32-bit ARGB integer or as a structured
//! channel-by-channel value. both are turned into a [`ColorValue`] the moment they're captured,
//! nothing past the snapshotter ever sees a [`NativeColor`]
use {
    schemars::JsonSchema,
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    std::{fmt, str::FromStr},
};

/// a canonical ARGB color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorValue {
    /// alpha channel
    pub a: u8,
    /// red channel
    pub r: u8,
    /// green channel
    pub g: u8,
    /// blue channel
    pub b: u8,
}

impl ColorValue {
    /// make a new color from its channels
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// unpack a `0xAARRGGBB` integer
    pub const fn from_packed_argb(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// pack into a `0xAARRGGBB` integer
    pub const fn to_packed_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// the color without its alpha as `0xRRGGBB`
    pub const fn rgb(self) -> u32 {
        self.to_packed_argb() & 0x00FF_FFFF
    }

    /// format as `#AARRGGBB`
    pub fn to_hex_argb(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }

    /// format as decimal `r,g,b`
    pub fn to_decimal_rgb(&self) -> String {
        format!("{},{},{}", self.r, self.g, self.b)
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_argb())
    }
}

/// an error parsing a hex color
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color '{0}', expected #AARRGGBB or #RRGGBB")]
pub struct ParseColorError(pub String);

impl FromStr for ColorValue {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let packed = u32::from_str_radix(hex, 16).map_err(|_| err())?;

        match hex.len() {
            8 => Ok(Self::from_packed_argb(packed)),
            6 => Ok(Self::from_packed_argb(0xFF00_0000 | packed)),
            _ => Err(err()),
        }
    }
}

impl Serialize for ColorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_argb())
    }
}

impl<'de> Deserialize<'de> for ColorValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// a color handed over channel by channel (brushes, text formatting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructuredColor {
    /// alpha channel, opaque when omitted
    #[serde(default = "opaque")]
    pub a: u8,
    /// red channel
    pub r: u8,
    /// green channel
    pub g: u8,
    /// blue channel
    pub b: u8,
}

/// the default alpha of a structured color
const fn opaque() -> u8 {
    u8::MAX
}

/// a color in whatever form the host returned it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NativeColor {
    /// a packed `0xAARRGGBB` integer
    Packed(u32),
    /// a structured color
    Structured(StructuredColor),
}

impl NativeColor {
    /// normalize into the canonical quadruple
    pub const fn normalize(self) -> ColorValue {
        match self {
            Self::Packed(packed) => ColorValue::from_packed_argb(packed),
            Self::Structured(StructuredColor { a, r, g, b }) => ColorValue::new(a, r, g, b),
        }
    }
}

impl From<NativeColor> for ColorValue {
    fn from(value: NativeColor) -> Self {
        value.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_and_structured_agree() {
        let packed = NativeColor::Packed(0xFF10_2030).normalize();
        let structured = NativeColor::Structured(StructuredColor {
            a: 255,
            r: 16,
            g: 32,
            b: 48,
        })
        .normalize();

        assert_eq!(packed, structured);
        assert_eq!(packed, ColorValue::new(255, 16, 32, 48));
    }

    #[test]
    fn test_packed_keeps_alpha() {
        let color = ColorValue::from_packed_argb(0x8000_00FF);
        assert_eq!(color, ColorValue::new(0x80, 0, 0, 0xFF));
        assert_eq!(color.to_packed_argb(), 0x8000_00FF);
        assert_eq!(color.rgb(), 0x0000_00FF);
    }

    #[test]
    fn test_text_forms() {
        let color = ColorValue::new(255, 16, 32, 48);
        assert_eq!(color.to_hex_argb(), "#FF102030");
        assert_eq!(color.to_decimal_rgb(), "16,32,48");
        assert_eq!(color.to_string(), "#FF102030");
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!("#FF102030".parse(), Ok(ColorValue::new(255, 16, 32, 48)));
        assert_eq!("#102030".parse(), Ok(ColorValue::new(255, 16, 32, 48)));
        assert!("FF102030".parse::<ColorValue>().is_err());
        assert!("#GG102030".parse::<ColorValue>().is_err());
        assert!("#1020".parse::<ColorValue>().is_err());
    }

    #[test]
    fn test_native_from_toml() {
        #[derive(Deserialize)]
        struct Table {
            packed: NativeColor,
            structured: NativeColor,
            no_alpha: NativeColor,
        }

        let table: Table = toml::from_str(
            "packed = 0xFF102030\n\
             structured = { a = 255, r = 16, g = 32, b = 48 }\n\
             no_alpha = { r = 16, g = 32, b = 48 }\n",
        )
        .unwrap();

        assert_eq!(table.packed.normalize(), table.structured.normalize());
        assert_eq!(table.no_alpha.normalize(), table.structured.normalize());
    }

    #[test]
    fn test_serde_as_hex() {
        let color = ColorValue::new(0x40, 1, 2, 3);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#40010203\"");
        assert_eq!(serde_json::from_str::<ColorValue>(&json).unwrap(), color);
    }
}
