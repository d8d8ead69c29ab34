use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One recorded exercise set, as held by a record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoggedSet {
  pub id: i64,
  #[serde(default)]
  pub owner_id: Option<String>,
  pub date: NaiveDate,
  pub exercise: String,
  /// Always stored in pounds
  #[serde(rename = "weight_lb")]
  #[sqlx(rename = "weight_lb")]
  pub weight: f64,
  pub reps: u32,
  #[serde(default)]
  pub rpe: Option<String>,
  #[serde(default)]
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// For inserting new sets (without id, created_at)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoggedSet {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub owner_id: Option<String>,
  pub date: NaiveDate,
  pub exercise: String,
  #[serde(rename = "weight_lb")]
  pub weight: f64,
  pub reps: u32,
  pub rpe: Option<String>,
  pub notes: Option<String>,
}

/// Normalize an exercise name: trim, collapse inner whitespace and
/// capitalize each word so "  bench   press" and "Bench Press" group together.
pub fn normalize_exercise_name(raw: &str) -> String {
  raw
    .split_whitespace()
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
      }
    })
    .collect::<Vec<String>>()
    .join(" ")
}

/// Optional free-text fields are stored as None when blank
pub fn non_blank(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(String::from)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_exercise_name_collapses_whitespace_and_case() {
    assert_eq!(normalize_exercise_name("  bench   press "), "Bench Press");
    assert_eq!(normalize_exercise_name("SQUAT"), "Squat");
    assert_eq!(normalize_exercise_name("   "), "");
  }

  #[test]
  fn test_non_blank_drops_whitespace_only() {
    assert_eq!(non_blank(Some("  ")), None);
    assert_eq!(non_blank(None), None);
    assert_eq!(non_blank(Some(" 8.5 ")), Some("8.5".to_string()));
  }

  #[test]
  fn test_logged_set_reads_store_column_names() {
    let json = r#"{
      "id": 7,
      "date": "2024-01-01",
      "exercise": "Squat",
      "weight_lb": 225.0,
      "reps": 3,
      "rpe": "8",
      "notes": null,
      "created_at": "2024-01-01T10:00:00.123456+00:00"
    }"#;
    let set: LoggedSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.id, 7);
    assert_eq!(set.weight, 225.0);
    assert_eq!(set.owner_id, None);
    assert_eq!(set.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
  }
}
