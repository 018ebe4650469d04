use std::fs::read_to_string;
use std::io::ErrorKind;
use tracing::warn;
use yaml_rust2::{Yaml, YamlLoader};

use crate::common::types::*;
use crate::common::util::*;
use crate::common::args::*;
use crate::common::color::*;
use crate::model::simplify::DEFAULT_MAX_ITERATIONS;


const DEFAULT_TOLERANCE: f64 = 0.0001;
const DEFAULT_SMOOTHNESS: f64 = 1.0;
const DEFAULT_GRADIENT: &str = "terrain";


/// Reads the settings file; a missing file yields an empty document
pub fn get_settings_yaml(filepath: &str) -> Result<Yaml, String> {
    let s = match read_to_string(filepath) {
        Ok(s) => s,
        Err(err) if err.kind()==ErrorKind::NotFound => {
            warn!(filepath, "settings file not found, using defaults");
            return Ok(Yaml::BadValue);
        },
        Err(err) => return Err(format!("Can't load settings file {}: {}", filepath, err)),
    };
    parse_settings_yaml(&s)
        .map_err(|err| format!("Can't parse settings file {}: {}", filepath, err))
}

fn parse_settings_yaml(s: &str) -> Result<Yaml, String> {
    let docs = YamlLoader::load_from_str(s).map_err(|err| err.to_string())?;
    Ok(docs.into_iter().next().unwrap_or(Yaml::BadValue))
}

/// Options of the simplify command
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifySettings {
    pub tolerance: Coord,
    pub target_count: Option<usize>,
    pub max_iterations: usize,
}

/// Options of the colorize command
#[derive(Debug, Clone, PartialEq)]
pub struct ColorizeSettings {
    pub gradient: Gradient,
    pub smoothness: f64,
    pub fallback_color: RGB,
}

/// Main settings structure
pub struct Settings {
    yaml: Yaml,
}

impl Settings {
    pub fn new(yaml: Yaml) -> Self {
        Settings {yaml}
    }

    pub fn load(filepath: &str) -> Result<Self, String> {
        get_settings_yaml(filepath).map(Settings::new)
    }

    // Returns parameter value as Yaml struct, None when absent
    fn get_parameter_value(&self, section: &str, parameter: &str) -> Option<&Yaml> {
        let y = &self.yaml[section][parameter];
        if y.is_badvalue() || y.is_null() {None} else {Some(y)}
    }

    fn invalid(section: &str, parameter: &str) -> String {
        format!("invalid '{}.{}' parameter in the settings file", section, parameter)
    }

    // Returns string parameter value
    pub fn get_parameter_string(&self, section: &str, parameter: &str) -> Result<Option<&str>, String> {
        self.get_parameter_value(section, parameter)
            .map(|y| y.as_str().ok_or_else(|| Self::invalid(section, parameter)))
            .transpose()
    }

    // Returns f64 parameter value, integers accepted
    pub fn get_parameter_f64(&self, section: &str, parameter: &str, default: f64) -> Result<f64, String> {
        self.get_parameter_value(section, parameter)
            .map_or(Some(default), |y| y.as_f64().or_else(|| y.as_i64().map(|i| i as f64)))
            .ok_or_else(|| Self::invalid(section, parameter))
    }

    // Returns usize parameter value
    pub fn get_parameter_usize(&self, section: &str, parameter: &str, default: usize) -> Result<usize, String> {
        self.get_parameter_value(section, parameter)
            .map_or(Some(default), |y| y.as_i64().and_then(|i| usize::try_from(i).ok()))
            .ok_or_else(|| Self::invalid(section, parameter))
    }

    fn yaml_color(y: &Yaml) -> Option<Result<RGB, String>> {
        let components = y.as_vec()?
            .iter()
            .map(|c| c.as_f64().or_else(|| c.as_i64().map(|i| i as f64)))
            .collect::<Option<Vec<f64>>>()?;
        Some(RGB::from_components(&components))
    }

    // Returns color parameter value given as `[r, g, b]`
    pub fn get_parameter_color(&self, section: &str, parameter: &str, default: RGB) -> Result<RGB, String> {
        match self.get_parameter_value(section, parameter) {
            None => Ok(default),
            Some(y) => Self::yaml_color(y)
                .ok_or_else(|| Self::invalid(section, parameter))?
                .map_err(|err| format!("{}: {}", Self::invalid(section, parameter), err)),
        }
    }

    /// Resolves the gradient: command line preset, profile file, custom three stops, then preset name
    fn resolve_gradient(&self, preset: Option<GradientPreset>) -> Result<Gradient, String> {
        if let Some(preset) = preset {
            return Ok(preset.gradient());
        }

        if let Some(profile_file) = self.get_parameter_string("Colorize", "gradient_profile_file")? {
            check_file(profile_file)?;
            return get_gradient_profile(profile_file);
        }

        if let Some(y) = self.get_parameter_value("Colorize", "custom_gradient") {
            let colors = y.as_vec()
                .filter(|v| v.len()==3)
                .ok_or_else(|| "'Colorize.custom_gradient' must list three colors".to_string())?
                .iter()
                .map(|c| Self::yaml_color(c).unwrap_or_else(|| Err("Invalid color in 'Colorize.custom_gradient'".to_string())))
                .collect::<Result<Vec<RGB>, String>>()?;
            return Ok(three_stop_gradient(colors[0], colors[1], colors[2]));
        }

        let name = self.get_parameter_string("Colorize", "gradient")?.unwrap_or(DEFAULT_GRADIENT);
        get_gradient_preset(name).map(|p| p.gradient())
    }

    pub fn simplify_settings(&self, args: &CLIArgsSimplify) -> Result<SimplifySettings, String> {
        let tolerance = match args.tolerance {
            Some(t) => t,
            None => self.get_parameter_f64("Simplify", "tolerance", DEFAULT_TOLERANCE)?,
        };
        let max_iterations = match args.max_iterations {
            Some(n) => n,
            None => self.get_parameter_usize("Simplify", "max_iterations", DEFAULT_MAX_ITERATIONS)?,
        };
        Ok(SimplifySettings {tolerance, target_count: args.target_count, max_iterations})
    }

    pub fn colorize_settings(&self, args: &CLIArgsColorize) -> Result<ColorizeSettings, String> {
        let smoothness = match args.smoothness {
            Some(s) => s,
            None => self.get_parameter_f64("Colorize", "smoothness", DEFAULT_SMOOTHNESS)?,
        };
        if !(0.0..=1.0).contains(&smoothness) {
            return Err(format!("Smoothness must be within [0, 1], got {}", smoothness));
        }
        let fallback_color = self.get_parameter_color("Colorize", "fallback_color", DEFAULT_FALLBACK_COLOR)?;
        let gradient = self.resolve_gradient(args.gradient)?;
        Ok(ColorizeSettings {gradient, smoothness, fallback_color})
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn settings(s: &str) -> Settings {
        Settings::new(parse_settings_yaml(s).unwrap())
    }

    fn simplify_args() -> CLIArgsSimplify {
        CLIArgsSimplify {file: "path.txt".to_string(), tolerance: None, target_count: None, max_iterations: None}
    }

    fn colorize_args() -> CLIArgsColorize {
        CLIArgsColorize {file: "mesh.txt".to_string(), gradient: None, smoothness: None}
    }

    #[test]
    fn simplify_settings_t0() -> Result<(), String> {
        let s = Settings::new(Yaml::BadValue).simplify_settings(&simplify_args())?;
        assert_eq!(s, SimplifySettings {tolerance: DEFAULT_TOLERANCE, target_count: None, max_iterations: 20});
        Ok(())
    }

    #[test]
    fn simplify_settings_t1() -> Result<(), String> {
        let yaml = "Simplify:\n  tolerance: 0.5\n  max_iterations: 7\n";
        let mut args = simplify_args();
        args.tolerance = Some(0.25);
        let s = settings(yaml).simplify_settings(&args)?;
        assert_eq!(s.tolerance, 0.25);
        assert_eq!(s.max_iterations, 7);
        Ok(())
    }

    #[test]
    fn simplify_settings_t2() {
        let yaml = "Simplify:\n  max_iterations: -3\n";
        assert_eq!(settings(yaml).simplify_settings(&simplify_args()),
            Err("invalid 'Simplify.max_iterations' parameter in the settings file".to_string()));
    }

    #[test]
    fn colorize_settings_t0() -> Result<(), String> {
        let s = Settings::new(Yaml::BadValue).colorize_settings(&colorize_args())?;
        assert_eq!(s.gradient, GradientPreset::Terrain.gradient());
        assert_eq!(s.smoothness, 1.0);
        assert_eq!(s.fallback_color, DEFAULT_FALLBACK_COLOR);
        Ok(())
    }

    #[test]
    fn colorize_settings_t1() -> Result<(), String> {
        let yaml = "Colorize:\n  smoothness: 0.4\n  fallback_color: [1, 0, 0]\n  gradient: ocean\n";
        let s = settings(yaml).colorize_settings(&colorize_args())?;
        assert_eq!(s.gradient, GradientPreset::Ocean.gradient());
        assert_eq!(s.smoothness, 0.4);
        assert_eq!(s.fallback_color, RGB (1.0, 0.0, 0.0));

        let mut args = colorize_args();
        args.gradient = Some(GradientPreset::Desert);
        assert_eq!(settings(yaml).colorize_settings(&args)?.gradient, GradientPreset::Desert.gradient());
        Ok(())
    }

    #[test]
    fn colorize_settings_t2() -> Result<(), String> {
        let yaml = "Colorize:\n  custom_gradient:\n    - [0, 0, 0]\n    - [1, 0, 0]\n    - [1, 1, 1]\n";
        let s = settings(yaml).colorize_settings(&colorize_args())?;
        assert_eq!(s.gradient, three_stop_gradient(RGB (0.0, 0.0, 0.0), RGB (1.0, 0.0, 0.0), RGB (1.0, 1.0, 1.0)));
        Ok(())
    }

    #[test]
    fn colorize_settings_t3() {
        let mut args = colorize_args();
        args.smoothness = Some(1.5);
        assert!(Settings::new(Yaml::BadValue).colorize_settings(&args).is_err());

        let yaml = "Colorize:\n  gradient: neon\n";
        assert_eq!(settings(yaml).colorize_settings(&colorize_args()),
            Err("Unknown gradient preset 'neon'".to_string()));

        let yaml = "Colorize:\n  fallback_color: [2, 0, 0]\n";
        assert!(settings(yaml).colorize_settings(&colorize_args()).is_err());
    }

    #[test]
    fn get_settings_yaml_t0() {
        assert_eq!(get_settings_yaml("./no/such/settings.yaml"), Ok(Yaml::BadValue));
    }
}
