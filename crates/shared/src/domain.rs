use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseOrderByError;

/// One earthquake as shown in the list. Built once per load and replaced
/// wholesale on the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub location: String,
    pub offset: String,
    pub magnitude: f64,
    pub date: String,
    pub time: String,
    pub url: String,
}

impl EventRecord {
    pub fn bucket(&self) -> MagnitudeBucket {
        MagnitudeBucket::for_magnitude(self.magnitude)
    }

    pub fn magnitude_text(&self) -> String {
        format_magnitude(self.magnitude)
    }
}

/// Magnitude rounded to one decimal place, e.g. `2.95` -> `"3.0"`.
pub fn format_magnitude(magnitude: f64) -> String {
    format!("{magnitude:.1}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeBucket {
    Magnitude1,
    Magnitude2,
    Magnitude3,
    Magnitude4,
    Magnitude5,
    Magnitude6,
    Magnitude7,
    Magnitude8,
    Magnitude9,
    Magnitude10Plus,
}

impl MagnitudeBucket {
    /// Buckets by the floor of the magnitude. Everything below 2 (including
    /// negative and NaN readings) shares the lowest bucket.
    pub fn for_magnitude(magnitude: f64) -> Self {
        if magnitude.is_nan() {
            return Self::Magnitude1;
        }
        match magnitude.floor() {
            floor if floor < 2.0 => Self::Magnitude1,
            floor if floor < 3.0 => Self::Magnitude2,
            floor if floor < 4.0 => Self::Magnitude3,
            floor if floor < 5.0 => Self::Magnitude4,
            floor if floor < 6.0 => Self::Magnitude5,
            floor if floor < 7.0 => Self::Magnitude6,
            floor if floor < 8.0 => Self::Magnitude7,
            floor if floor < 9.0 => Self::Magnitude8,
            floor if floor < 10.0 => Self::Magnitude9,
            _ => Self::Magnitude10Plus,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Magnitude1 => "magnitude1",
            Self::Magnitude2 => "magnitude2",
            Self::Magnitude3 => "magnitude3",
            Self::Magnitude4 => "magnitude4",
            Self::Magnitude5 => "magnitude5",
            Self::Magnitude6 => "magnitude6",
            Self::Magnitude7 => "magnitude7",
            Self::Magnitude8 => "magnitude8",
            Self::Magnitude9 => "magnitude9",
            Self::Magnitude10Plus => "magnitude10plus",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::Magnitude1 => Rgb(0x4A, 0x7B, 0xA7),
            Self::Magnitude2 => Rgb(0x04, 0xB4, 0xB3),
            Self::Magnitude3 => Rgb(0x10, 0xCA, 0xC9),
            Self::Magnitude4 => Rgb(0xF5, 0xA6, 0x23),
            Self::Magnitude5 => Rgb(0xFF, 0x7D, 0x50),
            Self::Magnitude6 => Rgb(0xFC, 0x66, 0x44),
            Self::Magnitude7 => Rgb(0xE7, 0x5F, 0x40),
            Self::Magnitude8 => Rgb(0xE1, 0x3A, 0x20),
            Self::Magnitude9 => Rgb(0xD9, 0x32, 0x18),
            Self::Magnitude10Plus => Rgb(0xC0, 0x38, 0x23),
        }
    }
}

impl fmt::Display for MagnitudeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Sort key understood by the FDSN event service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderBy {
    Time,
    TimeAsc,
    #[default]
    Magnitude,
    MagnitudeAsc,
}

impl OrderBy {
    pub const ALL: [OrderBy; 4] = [
        OrderBy::Time,
        OrderBy::TimeAsc,
        OrderBy::Magnitude,
        OrderBy::MagnitudeAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::Time => "time",
            OrderBy::TimeAsc => "time-asc",
            OrderBy::Magnitude => "magnitude",
            OrderBy::MagnitudeAsc => "magnitude-asc",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = ParseOrderByError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        OrderBy::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseOrderByError(value.to_string()))
    }
}
