//! Single-value severity classification.
//!
//! Order of checks for one value:
//!
//! 1. The reading must be a finite number, otherwise `LabError::InvalidValue`.
//! 2. Strictly beyond a critical threshold → `Critical`.
//! 3. Inside the closed normal band → `Normal`.
//! 4. Otherwise the proportional distance from the nearest band edge is
//!    bucketed into mild / moderate / severe by `SeverityCutoffs`.

use labwise_contracts::{
    classified::{severity_label, ClassifiedValue, Direction, SeverityTier},
    error::{LabError, LabResult},
    patient::{LabReading, LabValueInput},
    range::{ReferenceRange, SeverityCutoffs},
};

/// Extract the numeric reading from `input`.
///
/// Text, missing, non-finite and non-scalar readings are rejected rather than coerced.
pub fn reading_value(input: &LabValueInput) -> LabResult<f64> {
    let reason = match &input.value {
        Some(LabReading::Number(v)) if v.is_finite() => return Ok(*v),
        Some(LabReading::Number(v)) => format!("value {v} is not a finite number"),
        Some(LabReading::Text(text)) => format!("value '{text}' is not numeric"),
        Some(LabReading::Other(other)) => format!("value {other} is not numeric"),
        None => "value is missing".to_string(),
    };
    Err(LabError::InvalidValue {
        test: input.test_name.clone(),
        reason,
    })
}

/// Proportional distance of an out-of-band `value` from the nearest edge.
///
/// The edge itself is the denominator. A zero edge (e.g. LDL `0-100`) falls
/// back to the band width; a zero-width band at zero yields infinity.
/// Returns `0.0` for values inside the band.
pub fn proportional_distance(value: f64, range: &ReferenceRange) -> f64 {
    let (edge, gap) = if value < range.low {
        (range.low, range.low - value)
    } else if value > range.high {
        (range.high, value - range.high)
    } else {
        return 0.0;
    };

    let denominator = if edge != 0.0 {
        edge.abs()
    } else {
        range.high - range.low
    };

    if denominator > 0.0 {
        gap / denominator
    } else {
        f64::INFINITY
    }
}

/// Severity tier and direction of `value` against `range`.
pub fn severity_for(
    value: f64,
    range: &ReferenceRange,
    cutoffs: SeverityCutoffs,
) -> (SeverityTier, Option<Direction>) {
    if matches!(range.critical_low, Some(c) if value < c) {
        return (SeverityTier::Critical, Some(Direction::Low));
    }
    if matches!(range.critical_high, Some(c) if value > c) {
        return (SeverityTier::Critical, Some(Direction::High));
    }
    if range.contains(value) {
        return (SeverityTier::Normal, None);
    }

    let direction = if value < range.low {
        Direction::Low
    } else {
        Direction::High
    };

    let distance = proportional_distance(value, range);
    let tier = if distance <= cutoffs.mild_max {
        SeverityTier::MildAbnormal
    } else if distance <= cutoffs.moderate_max {
        SeverityTier::ModerateAbnormal
    } else {
        SeverityTier::SevereAbnormal
    };

    (tier, Some(direction))
}

/// Classify one lab value against its resolved range.
pub fn classify_value(
    input: &LabValueInput,
    range: &ReferenceRange,
    cutoffs: SeverityCutoffs,
) -> LabResult<ClassifiedValue> {
    let value = reading_value(input)?;
    let (severity, direction) = severity_for(value, range, cutoffs);

    Ok(ClassifiedValue {
        test: input.test_name.trim().to_string(),
        key: range.key.clone(),
        value,
        unit: if input.unit.trim().is_empty() {
            range.unit.clone()
        } else {
            input.unit.clone()
        },
        panel: input.panel,
        reference_range: range.display(),
        severity,
        direction,
        label: severity_label(severity, direction),
        color: severity.color(),
        range: range.clone(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
