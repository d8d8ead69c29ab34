//! Weight units. Everything is stored in pounds; kilograms are converted on input.

use serde::{Deserialize, Serialize};

pub const LB_PER_KG: f64 = 2.2046226218;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
  #[default]
  Lb,
  Kg,
}

impl WeightUnit {
  /// Convert a weight in this unit to pounds
  pub fn to_pounds(self, value: f64) -> f64 {
    match self {
      WeightUnit::Lb => value,
      WeightUnit::Kg => value * LB_PER_KG,
    }
  }
}

impl std::fmt::Display for WeightUnit {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Lb => write!(f, "lb"),
      Self::Kg => write!(f, "kg"),
    }
  }
}

impl std::str::FromStr for WeightUnit {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "lb" | "lbs" => Ok(Self::Lb),
      "kg" | "kgs" => Ok(Self::Kg),
      _ => Err(format!("Unknown weight unit: {}", s)),
    }
  }
}

pub fn to_pounds(value: f64, unit: WeightUnit) -> f64 {
  unit.to_pounds(value)
}
