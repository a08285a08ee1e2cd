//! Classification output for individual lab values.

use serde::{Deserialize, Serialize};

use crate::{patient::Panel, range::ReferenceRange};

/// Severity tier of one classified value, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Normal,
    MildAbnormal,
    ModerateAbnormal,
    SevereAbnormal,
    Critical,
}

impl SeverityTier {
    /// Display color. Driven purely by tier; never by free text.
    pub fn color(self) -> Color {
        match self {
            SeverityTier::Normal => Color::Green,
            SeverityTier::MildAbnormal => Color::Yellow,
            SeverityTier::ModerateAbnormal => Color::Orange,
            SeverityTier::SevereAbnormal | SeverityTier::Critical => Color::Red,
        }
    }

    /// Mild, moderate or severe. Critical values are counted separately.
    pub fn is_abnormal(self) -> bool {
        matches!(
            self,
            SeverityTier::MildAbnormal | SeverityTier::ModerateAbnormal | SeverityTier::SevereAbnormal
        )
    }

    fn adverb(self) -> &'static str {
        match self {
            SeverityTier::Normal => "",
            SeverityTier::MildAbnormal => "mildly",
            SeverityTier::ModerateAbnormal => "moderately",
            SeverityTier::SevereAbnormal => "severely",
            SeverityTier::Critical => "critically",
        }
    }
}

/// Which side of the normal band an abnormal value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Low,
    High,
}

impl Direction {
    fn word(self) -> &'static str {
        match self {
            Direction::Low => "low",
            Direction::High => "elevated",
        }
    }
}

/// Closed set of display colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Yellow,
    Orange,
    Red,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Red => "red",
        }
    }
}

/// Human-readable severity label, e.g. `"moderately elevated"`.
pub fn severity_label(tier: SeverityTier, direction: Option<Direction>) -> String {
    match (tier, direction) {
        (SeverityTier::Normal, _) | (_, None) => "normal".to_string(),
        (tier, Some(direction)) => format!("{} {}", tier.adverb(), direction.word()),
    }
}

/// A lab value joined with its resolved reference range and severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedValue {
    /// The test name as the caller wrote it.
    pub test: String,
    /// Normalized catalog key.
    pub key: String,
    pub value: f64,
    pub unit: String,
    pub panel: Panel,
    pub reference_range: String,
    pub severity: SeverityTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub label: String,
    pub color: Color,
    pub range: ReferenceRange,
}

impl ClassifiedValue {
    pub fn is_low(&self) -> bool {
        self.direction == Some(Direction::Low)
    }

    pub fn is_high(&self) -> bool {
        self.direction == Some(Direction::High)
    }

    /// Value expressed as a multiple of the upper reference limit.
    ///
    /// Returns `None` when the upper limit is zero.
    pub fn times_upper_limit(&self) -> Option<f64> {
        if self.range.high > 0.0 {
            Some(self.value / self.range.high)
        } else {
            None
        }
    }
}

/// The full set of classified values for one analysis, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassifiedSet {
    values: Vec<ClassifiedValue>,
}

impl ClassifiedSet {
    pub fn new(values: Vec<ClassifiedValue>) -> Self {
        Self { values }
    }

    /// First value whose catalog key equals `key`.
    ///
    /// Duplicate submissions of a test are all classified, but cross-test
    /// rules and metrics read the first occurrence.
    pub fn get(&self, key: &str) -> Option<&ClassifiedValue> {
        self.values.iter().find(|v| v.key == key)
    }

    pub fn value_of(&self, key: &str) -> Option<f64> {
        self.get(key).map(|v| v.value)
    }

    pub fn contains_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.get(k).is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> Vec<ClassifiedValue> {
        self.values
    }
}
