use super::model::{ThresholdLine, ThresholdSet};

// ---------------------------------------------------------------------------
// Canonical column names
// ---------------------------------------------------------------------------

/// Distance along the pipeline route; the x axis of every chart.
pub const STATIONING_COLUMN: &str = "Stationing (m)";
/// Pipe-to-soil potential, recorded with a polarity sign the pipeline drops.
pub const OFF_PSP_COLUMN: &str = "OFF PSP (VE V)";
/// Hoop stress as a percentage of SMYS; sometimes recorded as a 0–1 fraction.
pub const HOOP_STRESS_COLUMN: &str = "Hoop stress% of SMYS";

/// Hoop stress above this fraction of SMYS is flagged on the chart.
const HOOP_STRESS_LIMIT: f64 = 60.0;
/// Cathodic-protection window for OFF PSP, in -ve volts.
const PSP_PROTECTION_CRITERION: f64 = 0.85;
const PSP_OVERPROTECTION_LIMIT: f64 = 1.2;

// ---------------------------------------------------------------------------
// Threshold rules
// ---------------------------------------------------------------------------

/// The reference-line policy attached to a measurement, kept as data so the
/// chart layer never matches on label strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdRule {
    /// No reference lines.
    None,
    /// One horizontal line at the given y.
    Single(f64),
    /// Two horizontal lines, typically a lower and an upper limit.
    Pair(f64, f64),
}

impl ThresholdRule {
    /// The y values this rule places lines at, in declaration order.
    pub fn values(&self) -> Vec<f64> {
        match *self {
            ThresholdRule::None => Vec::new(),
            ThresholdRule::Single(y) => vec![y],
            ThresholdRule::Pair(a, b) => vec![a, b],
        }
    }

    /// Materialize the rule over an x span. `None` span (empty series) means
    /// the lines cannot be placed and the set is empty.
    pub fn lines_over(&self, span: Option<(f64, f64)>) -> ThresholdSet {
        let Some((x_min, x_max)) = span else {
            return Vec::new();
        };
        self.values()
            .into_iter()
            .map(|y| ThresholdLine { y, x_min, x_max })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Measurement catalog
// ---------------------------------------------------------------------------

/// One plottable measurement: the raw column key, the label shown to the
/// user, and the threshold rule that applies to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub key: String,
    pub label: String,
    pub rule: ThresholdRule,
}

impl Measurement {
    pub fn new(key: impl Into<String>, label: impl Into<String>, rule: ThresholdRule) -> Self {
        Measurement {
            key: key.into(),
            label: label.into(),
            rule,
        }
    }
}

/// The fixed catalog of measurements the selector offers. Static
/// configuration, not derived from the data; adding a measurement or a
/// threshold rule means adding one entry here.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCatalog {
    entries: Vec<Measurement>,
}

impl ColumnCatalog {
    pub fn new(entries: Vec<Measurement>) -> Self {
        ColumnCatalog { entries }
    }

    /// The measurements of a standard pipeline inspection survey.
    pub fn standard() -> Self {
        use ThresholdRule::{None, Pair, Single};
        ColumnCatalog::new(vec![
            Measurement::new("Depth (mm)", "Depth (mm)", None),
            Measurement::new(
                OFF_PSP_COLUMN,
                "OFF PSP (-ve Volt)",
                Pair(PSP_PROTECTION_CRITERION, PSP_OVERPROTECTION_LIMIT),
            ),
            Measurement::new("Soil Resistivity (Ω-cm)", "Soil Resistivity (Ω-cm)", None),
            Measurement::new("Distance from Pump(KM)", "Distance from Pump (KM)", None),
            Measurement::new("Operating Pr.", "Operating Pressure", None),
            Measurement::new("Remaining Thickness(mm)", "Remaining Thickness (mm)", None),
            Measurement::new(
                HOOP_STRESS_COLUMN,
                "Hoop Stress (% of SMYS)",
                Single(HOOP_STRESS_LIMIT),
            ),
            Measurement::new("CoatingType", "Coating Type", None),
            Measurement::new("nmConstrYear", "Construction Year", None),
            Measurement::new("Pipe Age", "Pipe Age", None),
            Measurement::new("Temperature", "Temperature (°C)", None),
        ])
    }

    /// Look up a measurement by its column key.
    pub fn get(&self, key: &str) -> Option<&Measurement> {
        self.entries.iter().find(|m| m.key == key)
    }

    /// All entries in selector order.
    pub fn entries(&self) -> &[Measurement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
