//! Tracked biometric metrics and the latest-value snapshot.

use std::fmt;
use std::str::FromStr;

// ── Metric ───────────────────────────────────────────────────────

/// A metric the client tracks. The set is closed: values for any other
/// key are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Enjoyment,
    Focus,
    HeartRate,
}

impl Metric {
    pub const COUNT: usize = 3;

    /// Every tracked metric, in display order.
    pub const ALL: [Metric; Self::COUNT] = [Metric::Enjoyment, Metric::Focus, Metric::HeartRate];

    /// Key used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enjoyment => "enjoyment",
            Self::Focus => "focus",
            Self::HeartRate => "heart_rate",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Enjoyment => "Enjoyment",
            Self::Focus => "Focus",
            Self::HeartRate => "Heart Rate",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Metric {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MetricSnapshot ───────────────────────────────────────────────

/// Latest known value of every [`Metric`], all starting at `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricSnapshot {
    values: [f64; Metric::COUNT],
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.values[metric.index()] = value;
    }

    /// Update the metric named `key`. Returns the metric that changed,
    /// or `None` if `key` is not tracked (snapshot left untouched).
    pub fn update(&mut self, key: &str, value: f64) -> Option<Metric> {
        let metric = key.parse::<Metric>().ok()?;
        self.set(metric, value);
        Some(metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(|metric| (metric, self.get(metric)))
    }
}

impl fmt::Display for MetricSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (metric, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("  |  ")?;
            }
            write!(f, "{} [{value:.2}]", metric.label())?;
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
