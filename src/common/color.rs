use std::fmt;
use num_traits::Float;
use regex::Regex;

use crate::common::util::*;


/// Color used for vertices that do not take part in terrain coloring
pub const DEFAULT_FALLBACK_COLOR: RGB = RGB (0.5, 0.5, 0.5);


/// Color componenent
pub type ColorComponent = f32;

#[derive(Debug, Clone, Copy, PartialEq)]
/// RGB Color
pub struct RGB (pub ColorComponent, pub ColorComponent, pub ColorComponent);

impl fmt::Display for RGB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}",
            format!("{:.3}", self.0).trim_end_matches("0").trim_end_matches('.'),
            format!("{:.3}", self.1).trim_end_matches("0").trim_end_matches('.'),
            format!("{:.3}", self.2).trim_end_matches("0").trim_end_matches('.'),
        )
    }
}

impl RGB {
    /// Component-wise linear interpolation towards `other`
    pub fn lerp(&self, other: &RGB, u: ColorComponent) -> RGB {
        RGB (
            lerp(self.0, other.0, u),
            lerp(self.1, other.1, u),
            lerp(self.2, other.2, u),
        )
    }

    /// Builds a color from components given in [0,1]
    pub fn from_components(components: &[f64]) -> Result<RGB, String> {
        match components {
            [r, g, b] if [r, g, b].iter().all(|c| (0.0..=1.0).contains(*c)) =>
                Ok(RGB (*r as ColorComponent, *g as ColorComponent, *b as ColorComponent)),
            [_, _, _] => Err("Color components must be within [0, 1]".to_string()),
            _ => Err(format!("A color needs exactly three components, got {}", components.len())),
        }
    }
}

/// Linear interpolation between `a` and `b`
pub fn lerp<T: Float>(a: T, b: T, u: T) -> T {
    a + (b - a) * u
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Gradient anchor: color at a normalized position
pub struct ColorStop {
    pub position: f64,
    pub color: RGB,
}

/// Ordered color stops; positions are expected to be non-decreasing
pub type Gradient = Vec<ColorStop>;

/// User-custom gradient with stops at 0, 0.5 and 1
pub fn three_stop_gradient(low: RGB, mid: RGB, high: RGB) -> Gradient {
    vec![
        ColorStop {position: 0.0, color: low},
        ColorStop {position: 0.5, color: mid},
        ColorStop {position: 1.0, color: high},
    ]
}

const TERRAIN_STOPS: &[ColorStop] = &[
    ColorStop {position: 0.0, color: RGB (0.16, 0.42, 0.20)},
    ColorStop {position: 0.35, color: RGB (0.55, 0.62, 0.30)},
    ColorStop {position: 0.7, color: RGB (0.55, 0.42, 0.28)},
    ColorStop {position: 1.0, color: RGB (0.96, 0.96, 0.96)},
];

const ALPINE_STOPS: &[ColorStop] = &[
    ColorStop {position: 0.0, color: RGB (0.10, 0.30, 0.18)},
    ColorStop {position: 0.5, color: RGB (0.45, 0.45, 0.42)},
    ColorStop {position: 0.8, color: RGB (0.70, 0.70, 0.72)},
    ColorStop {position: 1.0, color: RGB (1.0, 1.0, 1.0)},
];

const DESERT_STOPS: &[ColorStop] = &[
    ColorStop {position: 0.0, color: RGB (0.93, 0.80, 0.55)},
    ColorStop {position: 0.5, color: RGB (0.80, 0.52, 0.30)},
    ColorStop {position: 1.0, color: RGB (0.50, 0.25, 0.15)},
];

const OCEAN_STOPS: &[ColorStop] = &[
    ColorStop {position: 0.0, color: RGB (0.02, 0.10, 0.35)},
    ColorStop {position: 0.6, color: RGB (0.10, 0.45, 0.70)},
    ColorStop {position: 1.0, color: RGB (0.75, 0.92, 0.95)},
];

const GRAYSCALE_STOPS: &[ColorStop] = &[
    ColorStop {position: 0.0, color: RGB (0.0, 0.0, 0.0)},
    ColorStop {position: 1.0, color: RGB (1.0, 1.0, 1.0)},
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Named gradients
pub enum GradientPreset {
    Terrain,
    Alpine,
    Desert,
    Ocean,
    Grayscale,
}

impl GradientPreset {
    /// Static stop table of the preset
    pub fn stops(&self) -> &'static [ColorStop] {
        match self {
            GradientPreset::Terrain => TERRAIN_STOPS,
            GradientPreset::Alpine => ALPINE_STOPS,
            GradientPreset::Desert => DESERT_STOPS,
            GradientPreset::Ocean => OCEAN_STOPS,
            GradientPreset::Grayscale => GRAYSCALE_STOPS,
        }
    }

    pub fn gradient(&self) -> Gradient {
        self.stops().to_vec()
    }
}

/// Get gradient preset identificator by name
pub fn get_gradient_preset(value: &str) -> Result<GradientPreset, String> {
    match value {
        "terrain" => Ok(GradientPreset::Terrain),
        "alpine" => Ok(GradientPreset::Alpine),
        "desert" => Ok(GradientPreset::Desert),
        "ocean" => Ok(GradientPreset::Ocean),
        "grayscale" => Ok(GradientPreset::Grayscale),
        _ => Err(format!("Unknown gradient preset '{}'", value))
    }
}

/// Build gradient from profile lines `position r g b`
fn build_gradient(file_content: FileContent) -> Result<Gradient, String> {
    let re = Regex::new(r"^\s*(-?[0-9.]+)\s+([0-9.]+)\s+([0-9.]+)\s+([0-9.]+)\s*$")
        .map_err(|err| {err.to_string()})?;
    let mut prev_position = f64::NEG_INFINITY;

    let mut gradient = vec![];
    for (l, line) in file_content.iter().enumerate() {
        let l = l + 1;
        if let Some(caps) = re.captures(line) {
            let parse = |i: usize| {
                caps[i].parse::<f64>()
                    .map_err(|err| {format!("Invalid number in line {} of gradient profile: {}", l, err)})
            };
            let position = parse(1)?;
            let components = [parse(2)?, parse(3)?, parse(4)?];
            let color = RGB::from_components(&components)
                .map_err(|err| {format!("{} (line {} of gradient profile)", err, l)})?;

            if position<prev_position {
                return Err("Positions in gradient profile must be non-decreasing".to_string());
            }
            prev_position = position;

            gradient.push(ColorStop {position, color});
        }
    }

    if gradient.is_empty() {
        Err("Gradient profile is empty".to_string())
    } else {
        Ok(gradient)
    }
}

/// Reads gradient profile file
pub fn get_gradient_profile(filepath: &str) -> Result<Gradient, String> {
    let file_content = read_lines(filepath)?;
    build_gradient(file_content)
}
