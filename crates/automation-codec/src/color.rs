//! RGB colors and the preset matcher used by the RGB action family

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB triple, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse `#rrggbb` (the hash is optional)
    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(CodecError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CodecError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    #[must_use]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl FromStr for Rgb {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Output addressed by an RGB action (`args[2]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RgbTarget {
    /// The module's ambient light ring (selector 100)
    Ambient,
    /// Single RGB LED or corner group, by raw selector
    Output { channel: u8 },
}

impl RgbTarget {
    pub const AMBIENT_SELECTOR: u8 = 100;

    #[must_use]
    pub fn from_selector(selector: u8) -> Self {
        if selector == Self::AMBIENT_SELECTOR {
            Self::Ambient
        } else {
            Self::Output { channel: selector }
        }
    }

    #[must_use]
    pub fn selector(self) -> u8 {
        match self {
            Self::Ambient => Self::AMBIENT_SELECTOR,
            Self::Output { channel } => channel,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ambient => "ambient light",
            Self::Output { .. } => "RGB output",
        }
    }

    /// Named presets offered on this target, in match order
    #[must_use]
    pub fn presets(self) -> &'static [ColorPreset] {
        match self {
            Self::Ambient => &AMBIENT_PRESETS,
            Self::Output { .. } => &OUTPUT_PRESETS,
        }
    }
}

impl fmt::Display for RgbTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => f.write_str("ambient light"),
            Self::Output {
                channel: channel @ 41..=44,
            } => write!(f, "RGB corner {}", channel - 40),
            Self::Output { channel } => write!(f, "RGB LED {channel}"),
        }
    }
}

/// Color selection of an RGB action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum ColorPreset {
    Red,
    Green,
    Blue,
    White,
    NeutralWhite,
    WarmWhite,
    CoolWhite,
    Custom { color: Rgb },
    /// Toggle the output; color bytes are not read
    Toggle,
}

const OUTPUT_PRESETS: [ColorPreset; 4] = [
    ColorPreset::Red,
    ColorPreset::Green,
    ColorPreset::Blue,
    ColorPreset::White,
];

const AMBIENT_PRESETS: [ColorPreset; 3] = [
    ColorPreset::NeutralWhite,
    ColorPreset::WarmWhite,
    ColorPreset::CoolWhite,
];

impl ColorPreset {
    /// Color bytes written for this preset; `None` for toggle
    #[must_use]
    pub fn rgb(self) -> Option<Rgb> {
        match self {
            Self::Red => Some(Rgb::new(255, 0, 0)),
            Self::Green => Some(Rgb::new(0, 255, 0)),
            Self::Blue => Some(Rgb::new(0, 0, 255)),
            Self::White | Self::NeutralWhite => Some(Rgb::new(255, 255, 255)),
            Self::WarmWhite => Some(Rgb::new(255, 180, 100)),
            Self::CoolWhite => Some(Rgb::new(200, 220, 255)),
            Self::Custom { color } => Some(color),
            Self::Toggle => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::White => "white",
            Self::NeutralWhite => "neutral white",
            Self::WarmWhite => "warm white",
            Self::CoolWhite => "cool white",
            Self::Custom { .. } => "custom",
            Self::Toggle => "toggle",
        }
    }

    #[must_use]
    pub fn is_available_on(self, target: RgbTarget) -> bool {
        match self {
            Self::Custom { .. } | Self::Toggle => true,
            named => target.presets().contains(&named),
        }
    }

    /// Match a color exactly against the presets of `target`, falling back to custom
    #[must_use]
    pub fn match_color(target: RgbTarget, color: Rgb) -> Self {
        target
            .presets()
            .iter()
            .copied()
            .find(|preset| preset.rgb() == Some(color))
            .unwrap_or(Self::Custom { color })
    }

    pub(crate) fn check_target(self, target: RgbTarget) -> Result<(), CodecError> {
        if self.is_available_on(target) {
            Ok(())
        } else {
            Err(CodecError::PresetUnavailable {
                preset: self.name(),
                target: target.label(),
            })
        }
    }
}

impl fmt::Display for ColorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { color } => write!(f, "custom color {color}"),
            preset => f.write_str(preset.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::from_hex("00FF00").unwrap(), Rgb::new(0, 255, 0));
        assert!(matches!(Rgb::from_hex("#f00"), Err(CodecError::InvalidColor(_))));
        assert!(matches!(Rgb::from_hex("#gg0000"), Err(CodecError::InvalidColor(_))));
        assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn test_rgb_serializes_as_hex() {
        let json = serde_json::to_string(&Rgb::new(255, 0, 16)).unwrap();
        assert_eq!(json, "\"#ff0010\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(255, 0, 16));
        assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
    }

    #[test]
    fn test_red_matches_only_on_normal_output() {
        let red = Rgb::new(255, 0, 0);
        let output = RgbTarget::Output { channel: 1 };
        assert_eq!(ColorPreset::match_color(output, red), ColorPreset::Red);
        assert_eq!(
            ColorPreset::match_color(RgbTarget::Ambient, red),
            ColorPreset::Custom { color: red }
        );
    }

    #[test]
    fn test_white_depends_on_target() {
        let white = Rgb::new(255, 255, 255);
        assert_eq!(
            ColorPreset::match_color(RgbTarget::Output { channel: 2 }, white),
            ColorPreset::White
        );
        assert_eq!(
            ColorPreset::match_color(RgbTarget::Ambient, white),
            ColorPreset::NeutralWhite
        );
    }

    #[test]
    fn test_preset_availability() {
        assert!(ColorPreset::WarmWhite.is_available_on(RgbTarget::Ambient));
        assert!(!ColorPreset::Blue.is_available_on(RgbTarget::Ambient));
        assert!(ColorPreset::Toggle.is_available_on(RgbTarget::Ambient));
        assert_eq!(
            ColorPreset::CoolWhite.check_target(RgbTarget::Output { channel: 3 }),
            Err(CodecError::PresetUnavailable {
                preset: "cool white",
                target: "RGB output",
            })
        );
    }

    #[test]
    fn test_target_selector() {
        assert_eq!(RgbTarget::from_selector(100), RgbTarget::Ambient);
        assert_eq!(RgbTarget::from_selector(42).to_string(), "RGB corner 2");
        assert_eq!(RgbTarget::from_selector(41).to_string(), "RGB corner 1");
        assert_eq!(RgbTarget::from_selector(44).to_string(), "RGB corner 4");
        assert_eq!(RgbTarget::from_selector(45).to_string(), "RGB LED 45");
        assert_eq!(RgbTarget::Ambient.to_string(), "ambient light");
        assert_eq!(RgbTarget::Output { channel: 7 }.selector(), 7);
    }
}
