use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Angle unit consulted by the trigonometric evaluation rules.
///
/// Degrees are the neutral unit: forward trig scales its argument from
/// degrees into the active mode's units before the native call, inverse trig
/// scales the native result back. All non-trig evaluation ignores the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Deg,
    Rad,
    Grad,
}

impl AngleMode {
    /// Scale a forward-trig argument before the native call.
    pub fn convert_argument(self, value: f64) -> f64 {
        match self {
            AngleMode::Deg => value,
            AngleMode::Rad => value * (std::f64::consts::PI / 180.0),
            AngleMode::Grad => value * (10.0 / 9.0),
        }
    }

    /// Scale an inverse-trig result after the native call.
    pub fn convert_result(self, value: f64) -> f64 {
        match self {
            AngleMode::Deg => value,
            AngleMode::Rad => value * (180.0 / std::f64::consts::PI),
            AngleMode::Grad => value * 0.9,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AngleMode::Deg => "deg",
            AngleMode::Rad => "rad",
            AngleMode::Grad => "grad",
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AngleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deg" | "degrees" => Ok(AngleMode::Deg),
            "rad" | "radians" => Ok(AngleMode::Rad),
            "grad" | "gradians" => Ok(AngleMode::Grad),
            other => Err(format!("unknown angle mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        assert_eq!("rad".parse::<AngleMode>().unwrap(), AngleMode::Rad);
        assert_eq!("DEG".parse::<AngleMode>().unwrap(), AngleMode::Deg);
        assert_eq!(AngleMode::Grad.to_string(), "grad");
        assert!("turns".parse::<AngleMode>().is_err());
    }

    #[test]
    fn argument_and_result_scaling_are_inverse() {
        for mode in [AngleMode::Deg, AngleMode::Rad, AngleMode::Grad] {
            let v = 42.5;
            let back = mode.convert_result(mode.convert_argument(v));
            assert!((back - v).abs() < 1e-12);
        }
    }
}
