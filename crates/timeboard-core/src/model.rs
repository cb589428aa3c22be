use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};

/// The time-aggregation view a dashboard
/// shows.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
  Daily,
  Weekly,
  Monthly
}

impl Granularity {
  pub const DEFAULT: Self =
    Self::Weekly;

  pub fn all() -> [Self; 3] {
    [
      Self::Daily,
      Self::Weekly,
      Self::Monthly
    ]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Daily => "daily",
      | Self::Weekly => "weekly",
      | Self::Monthly => "monthly"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Daily => "Daily",
      | Self::Weekly => "Weekly",
      | Self::Monthly => "Monthly"
    }
  }

  /// Caption shown next to the
  /// prior-period hours.
  pub fn previous_label(
    self
  ) -> &'static str {
    match self {
      | Self::Daily => "Yesterday",
      | Self::Weekly => "Last week",
      | Self::Monthly => "Last month"
    }
  }

  pub fn grid_class(self) -> String {
    format!(
      "dashboard__grid--{}",
      self.as_key()
    )
  }
}

impl Default for Granularity {
  fn default() -> Self {
    Self::DEFAULT
  }
}

impl fmt::Display for Granularity {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  thiserror::Error,
)]
#[error(
  "unknown granularity `{0}` \
   (expected daily, weekly or \
   monthly)"
)]
pub struct UnknownGranularity(
  pub String
);

impl FromStr for Granularity {
  type Err = UnknownGranularity;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s {
      | "daily" => Ok(Self::Daily),
      | "weekly" => Ok(Self::Weekly),
      | "monthly" => Ok(Self::Monthly),
      | other => Err(
        UnknownGranularity(
          other.to_string()
        )
      )
    }
  }
}

/// Hours logged in the current and the
/// prior period.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct Timeframe {
  pub current:  f64,
  pub previous: f64
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct Timeframes {
  pub daily:   Timeframe,
  pub weekly:  Timeframe,
  pub monthly: Timeframe
}

impl Timeframes {
  pub fn get(
    &self,
    mode: Granularity
  ) -> &Timeframe {
    match mode {
      | Granularity::Daily => {
        &self.daily
      }
      | Granularity::Weekly => {
        &self.weekly
      }
      | Granularity::Monthly => {
        &self.monthly
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct CategoryRecord {
  pub title:      String,
  pub timeframes: Timeframes
}

impl CategoryRecord {
  pub fn new(
    title: impl Into<String>,
    daily: (f64, f64),
    weekly: (f64, f64),
    monthly: (f64, f64)
  ) -> Self {
    let tf = |(current, previous)| {
      Timeframe { current, previous }
    };
    Self {
      title:      title.into(),
      timeframes: Timeframes {
        daily:   tf(daily),
        weekly:  tf(weekly),
        monthly: tf(monthly)
      }
    }
  }
}

/// Formats an hour count the way cards
/// show it: whole numbers without a
/// fractional part.
pub fn format_hours(hours: f64) -> String {
  if hours.fract() == 0.0
    && hours.abs() < 1e15
  {
    format!("{}hrs", hours as i64)
  } else {
    format!("{hours}hrs")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn granularity_parses_storage_values()
  {
    for mode in Granularity::all() {
      assert_eq!(
        mode.as_key().parse::<Granularity>(),
        Ok(mode)
      );
    }
    assert!(
      "yearly"
        .parse::<Granularity>()
        .is_err()
    );
    assert!(
      "Daily"
        .parse::<Granularity>()
        .is_err()
    );
    assert!(
      " daily\n"
        .parse::<Granularity>()
        .is_err()
    );
  }

  #[test]
  fn default_granularity_is_weekly() {
    assert_eq!(
      Granularity::default(),
      Granularity::Weekly
    );
  }

  #[test]
  fn category_deserializes_from_data_json_shape(
  ) {
    let raw = r#"{
      "title": "Self Care",
      "timeframes": {
        "daily": { "current": 0, "previous": 1 },
        "weekly": { "current": 2, "previous": 2 },
        "monthly": { "current": 7, "previous": 11 }
      }
    }"#;
    let record: CategoryRecord =
      serde_json::from_str(raw)
        .expect("valid record");
    assert_eq!(
      record,
      CategoryRecord::new(
        "Self Care",
        (0.0, 1.0),
        (2.0, 2.0),
        (7.0, 11.0)
      )
    );
  }

  #[test]
  fn hours_drop_trailing_zero() {
    assert_eq!(format_hours(5.0), "5hrs");
    assert_eq!(format_hours(0.0), "0hrs");
    assert_eq!(
      format_hours(2.5),
      "2.5hrs"
    );
  }
}
