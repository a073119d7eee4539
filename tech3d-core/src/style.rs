/// Letter colors, color modes and the style parameters fed to the geometry builder
use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map_res},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::ParseError;

/// Default extrusion depth along +Z
pub const DEFAULT_DEPTH: f32 = 0.3;
/// Default gap between adjacent letters
pub const DEFAULT_SPACING: f32 = 0.2;

/// An RGBA color with channels conventionally in `[0, 1]`.
///
/// Channels are never validated; out-of-range values simply render as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub fn r(&self) -> f32 {
        self.0[0]
    }

    pub fn g(&self) -> f32 {
        self.0[1]
    }

    pub fn b(&self) -> f32 {
        self.0[2]
    }

    pub fn a(&self) -> f32 {
        self.0[3]
    }

    /// Parse a color picker value of the form `#rrggbb`. Alpha is always 1.0.
    pub fn from_hex(hex: &str) -> Result<Self, ParseError> {
        match all_consuming(hex_color)(hex.trim()) {
            Ok((_, (r, g, b))) => Ok(Self::from_rgb8(r, g, b)),
            Err(_) => Err(ParseError::InvalidHex(hex.to_string())),
        }
    }

    /// Format as `#rrggbb`, rounding and saturating each channel
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r()),
            channel(self.g()),
            channel(self.b())
        )
    }

    /// Perceived brightness, used by the terminal renderer to pick glyphs
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r() + 0.7152 * self.g() + 0.0722 * self.b()
    }
}

impl FromStr for Rgba {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

fn hex_channel(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |digits: &str| u8::from_str_radix(digits, 16),
    )(input)
}

fn hex_color(input: &str) -> IResult<&str, (u8, u8, u8)> {
    preceded(tag("#"), tuple((hex_channel, hex_channel, hex_channel)))(input)
}

/// The four glyphs of the word, in drawing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    T,
    E,
    C,
    H,
}

impl Letter {
    pub const ALL: [Letter; 4] = [Letter::T, Letter::E, Letter::C, Letter::H];

    pub fn index(self) -> usize {
        match self {
            Letter::T => 0,
            Letter::E => 1,
            Letter::C => 2,
            Letter::H => 3,
        }
    }
}

impl FromStr for Letter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "T" => Ok(Letter::T),
            "E" => Ok(Letter::E),
            "C" => Ok(Letter::C),
            "H" => Ok(Letter::H),
            _ => Err(ParseError::UnknownLetter(s.to_string())),
        }
    }
}

/// How letter colors are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    PerLetter,
    Single,
    Rainbow,
}

impl ColorMode {
    pub fn name(self) -> &'static str {
        match self {
            ColorMode::PerLetter => "per-letter",
            ColorMode::Single => "single",
            ColorMode::Rainbow => "rainbow",
        }
    }

    /// Next mode in picker order, wrapping around
    pub fn next(self) -> Self {
        match self {
            ColorMode::PerLetter => ColorMode::Single,
            ColorMode::Single => ColorMode::Rainbow,
            ColorMode::Rainbow => ColorMode::PerLetter,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "per-letter" => Ok(ColorMode::PerLetter),
            "single" => Ok(ColorMode::Single),
            "rainbow" => Ok(ColorMode::Rainbow),
            _ => Err(ParseError::UnknownColorMode(s.to_string())),
        }
    }
}

/// Default per-letter palette: purple, blue, turquoise, light yellow-green
pub fn default_letter_colors() -> [Rgba; 4] {
    [
        Rgba::from_rgb8(193, 58, 242),
        Rgba::from_rgb8(61, 72, 230),
        Rgba::from_rgb8(60, 211, 180),
        Rgba::from_rgb8(226, 235, 152),
    ]
}

/// Red, orange, yellow, green; one entry per letter
pub const RAINBOW: [Rgba; 4] = [
    Rgba::new(1.0, 0.0, 0.0, 1.0),
    Rgba::new(1.0, 0.5, 0.0, 1.0),
    Rgba::new(1.0, 1.0, 0.0, 1.0),
    Rgba::new(0.0, 1.0, 0.0, 1.0),
];

/// Appearance parameters read by the geometry builder
#[derive(Debug, Clone, PartialEq)]
pub struct StyleParams {
    pub extrusion_depth: f32,
    pub letter_spacing: f32,
    pub letters: [Rgba; 4],
    pub single_color: Rgba,
    pub background: Rgba,
    pub color_mode: ColorMode,
}

impl StyleParams {
    pub fn color(&self, letter: Letter) -> Rgba {
        self.letters[letter.index()]
    }

    pub fn set_color(&mut self, letter: Letter, color: Rgba) {
        self.letters[letter.index()] = color;
    }

    /// Switch color mode, repainting the letters for the new mode.
    ///
    /// Leaving single or rainbow mode for per-letter restores the default palette.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        let previous = self.color_mode;
        self.color_mode = mode;

        match mode {
            ColorMode::Single => self.letters = [self.single_color; 4],
            ColorMode::Rainbow => self.letters = RAINBOW,
            ColorMode::PerLetter if previous != ColorMode::PerLetter => {
                self.letters = default_letter_colors();
            }
            ColorMode::PerLetter => {}
        }
    }

    /// Update the single-color value; repaints only while in single mode
    pub fn set_single_color(&mut self, color: Rgba) {
        self.single_color = color;
        if self.color_mode == ColorMode::Single {
            self.letters = [color; 4];
        }
    }
}

impl Default for StyleParams {
    fn default() -> Self {
        let letters = default_letter_colors();
        Self {
            extrusion_depth: DEFAULT_DEPTH,
            letter_spacing: DEFAULT_SPACING,
            letters,
            single_color: letters[0],
            background: Rgba::from_rgb8(245, 229, 229),
            color_mode: ColorMode::PerLetter,
        }
    }
}
