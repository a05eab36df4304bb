use std::fmt;
use std::str::FromStr;

use crate::quantize::MAX_COLORS;
use crate::{PosterizeError, PosterizeResult};

/// Default number of palette colors.
pub const DEFAULT_COLORS: i64 = 8;
/// Default luma threshold for monochrome mode.
pub const DEFAULT_THRESHOLD: i64 = 128;
/// Fill used for the monochrome layer when none is given.
pub const DEFAULT_MONOCHROME_FILL: &str = "black";

/// A `fill` attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FillColor {
    Rgb([u8; 3]),
    /// A color keyword such as `black` or `teal`.
    Named(String),
}

impl FillColor {
    pub fn black() -> Self {
        FillColor::Named(DEFAULT_MONOCHROME_FILL.to_string())
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillColor::Rgb([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            FillColor::Named(name) => f.write_str(name),
        }
    }
}

impl From<image::Rgb<u8>> for FillColor {
    fn from(value: image::Rgb<u8>) -> Self {
        FillColor::Rgb(value.0)
    }
}

impl FromStr for FillColor {
    type Err = PosterizeError;

    /// Accepts `#rgb`, `#rrggbb` or an ASCII color keyword.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || PosterizeError::InvalidFill {
            value: value.to_string(),
        };
        let trimmed = value.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
            return match hex.len() {
                3 => {
                    let mut rgb = [0u8; 3];
                    for (slot, i) in rgb.iter_mut().zip(0..3) {
                        let digit = channel(&hex[i..i + 1])?;
                        *slot = digit * 17;
                    }
                    Ok(FillColor::Rgb(rgb))
                }
                6 => Ok(FillColor::Rgb([
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                ])),
                _ => Err(invalid()),
            };
        }

        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(FillColor::Named(trimmed.to_ascii_lowercase()));
        }
        Err(invalid())
    }
}

/// How pixels are assigned to layers.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizationMode {
    /// One foreground layer of pixels whose luma is at or below `threshold`.
    Threshold { threshold: u8, fill: FillColor },
    /// Up to `colors` palette layers.
    Palette { colors: usize },
}

/// Color space the k-means clustering runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    Lab,
    Rgb,
}

/// Options for the k-means palette search.
#[derive(Debug, Clone)]
pub struct KmeansSettings {
    pub color_space: ColorSpace,
    /// Number of restarts; the lowest-scoring run wins.
    pub runs: u32,
    pub max_iterations: usize,
    pub lab_converge: f32,
    pub rgb_converge: f32,
    pub seed: u64,
}

impl Default for KmeansSettings {
    fn default() -> Self {
        Self {
            color_space: ColorSpace::Lab,
            runs: 3,
            max_iterations: 20,
            lab_converge: 5.0,
            rgb_converge: 0.0025,
            seed: 0,
        }
    }
}

impl KmeansSettings {
    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Unvalidated conversion parameters as a user supplies them.
///
/// `colors == 1` selects monochrome mode. `threshold` and `fill` only apply in
/// monochrome mode but are validated either way.
#[derive(Debug, Clone)]
pub struct ConversionSettings {
    pub colors: i64,
    pub threshold: i64,
    pub fill: Option<String>,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS,
            threshold: DEFAULT_THRESHOLD,
            fill: None,
        }
    }
}

impl ConversionSettings {
    pub fn with_colors(mut self, colors: i64) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_fill(mut self, fill: Option<String>) -> Self {
        self.fill = fill;
        self
    }

    /// Validate the parameters and pick the quantization mode.
    pub fn resolve(&self) -> PosterizeResult<QuantizationMode> {
        if self.colors < 1 || self.colors > MAX_COLORS as i64 {
            return Err(PosterizeError::InvalidColorCount { value: self.colors });
        }
        let threshold = u8::try_from(self.threshold).map_err(|_| {
            PosterizeError::InvalidThreshold {
                value: self.threshold,
            }
        })?;
        let fill = self
            .fill
            .as_deref()
            .map(FillColor::from_str)
            .transpose()?;

        if self.colors == 1 {
            return Ok(QuantizationMode::Threshold {
                threshold,
                fill: fill.unwrap_or_else(FillColor::black),
            });
        }

        if let Some(fill) = fill {
            log::warn!(
                "fill {fill} only applies to monochrome output (--colors 1); ignoring it for {} colors",
                self.colors
            );
        }
        Ok(QuantizationMode::Palette {
            colors: self.colors as usize,
        })
    }
}
