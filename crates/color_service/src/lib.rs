//! WCAG contrast palette generation.
//!
//! The controller layer treats palette computation as an opaque collaborator
//! behind [`ColorService`]; [`WcagColorService`] is the production
//! implementation. Contrast math follows WCAG 2.1: sRGB channels are
//! linearized, relative luminance is `0.2126 R + 0.7152 G + 0.0722 B`, and the
//! ratio between two colors is `(L1 + 0.05) / (L2 + 0.05)` with `L1 >= L2`.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ColorError {
    #[error("invalid base color '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("unknown contrast level '{0}', expected AA or AAA")]
    InvalidLevel(String),
}

/// WCAG conformance tier. Determines the minimum contrast ratio a generated
/// color must reach against the base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContrastLevel {
    Aa,
    Aaa,
}

impl ContrastLevel {
    /// Large text permits a lower ratio at both tiers.
    pub fn minimum_ratio(self, is_large_text: bool) -> f64 {
        match (self, is_large_text) {
            (ContrastLevel::Aa, false) => 4.5,
            (ContrastLevel::Aa, true) => 3.0,
            (ContrastLevel::Aaa, false) => 7.0,
            (ContrastLevel::Aaa, true) => 4.5,
        }
    }
}

impl FromStr for ContrastLevel {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AA" => Ok(ContrastLevel::Aa),
            "AAA" => Ok(ContrastLevel::Aaa),
            _ => Err(ColorError::InvalidLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaletteRequest<'a> {
    pub basecolor: &'a str,
    pub level: &'a str,
    pub is_large_text: bool,
}

/// Palette computation seam. Injected into the controller so tests can
/// substitute a double and assert it is never reached on invalid input.
pub trait ColorService: Send + Sync {
    fn generate_palette(&self, request: &PaletteRequest<'_>) -> Result<Vec<String>, ColorError>;
}

/// Generates tints and shades of the base color and keeps those whose
/// contrast ratio against the base meets the requested level.
#[derive(Debug, Default)]
pub struct WcagColorService;

const PALETTE_SIZE: usize = 6;
const LADDER_STEPS: u32 = 10;

impl ColorService for WcagColorService {
    fn generate_palette(&self, request: &PaletteRequest<'_>) -> Result<Vec<String>, ColorError> {
        let base = Rgb::parse(request.basecolor)?;
        let level: ContrastLevel = request.level.parse()?;
        let minimum = level.minimum_ratio(request.is_large_text);
        let base_luminance = base.relative_luminance();

        // Walk from the extremes (white, black) toward the base so the
        // strongest-contrast candidates come first, alternating light/dark.
        let mut palette = Vec::new();
        'ladder: for step in 0..=LADDER_STEPS {
            let amount = 1.0 - f64::from(step) / f64::from(LADDER_STEPS);
            for target in [Rgb::WHITE, Rgb::BLACK] {
                if palette.len() >= PALETTE_SIZE {
                    break 'ladder;
                }
                let candidate = base.mix(target, amount);
                if contrast_from_luminance(base_luminance, candidate.relative_luminance())
                    >= minimum
                {
                    let hex = candidate.to_hex();
                    if !palette.contains(&hex) {
                        palette.push(hex);
                    }
                }
            }
        }

        Ok(palette)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 0xff,
        g: 0xff,
        b: 0xff,
    };
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Accepts `#rrggbb` or `rrggbb`.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let hex = input.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidColor(input.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ColorError::InvalidColor(input.to_string()))
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Blend toward `target` by `amount` in [0, 1]; 0 is self, 1 is target.
    fn mix(self, target: Rgb, amount: f64) -> Rgb {
        let blend = |from: u8, to: u8| {
            (f64::from(from) + (f64::from(to) - f64::from(from)) * amount).round() as u8
        };
        Rgb {
            r: blend(self.r, target.r),
            g: blend(self.g, target.g),
            b: blend(self.b, target.b),
        }
    }

    pub fn relative_luminance(self) -> f64 {
        0.2126 * srgb_to_linear(self.r)
            + 0.7152 * srgb_to_linear(self.g)
            + 0.0722 * srgb_to_linear(self.b)
    }
}

fn srgb_to_linear(channel: u8) -> f64 {
    let v = f64::from(channel) / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    contrast_from_luminance(a.relative_luminance(), b.relative_luminance())
}

fn contrast_from_luminance(l1: f64, l2: f64) -> f64 {
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}
