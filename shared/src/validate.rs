//! Command decoding and validation
//!
//! Turns one trimmed message line into a [`BridgeCommand`] or a rejection
//! reason. Pure: no side effects, and vehicle state is never consulted here.
//! State-dependent checks ("helm is busy") belong to the router and helm
//! machine, after validation has passed.

use glam::Vec3;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::command::{BridgeCommand, Department, Intent};
use crate::helm;

/// Why a message was rejected at the boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid syntax: {0}")]
    Syntax(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("unknown department '{0}'")]
    UnknownDepartment(String),

    #[error("unknown intent '{0}'")]
    UnknownIntent(String),

    #[error("warp factor {0} is out of range (must be above 0 and below 10)")]
    WarpFactorOutOfRange(f64),

    #[error("impulse percent {0} is out of range (must be between 0 and 100)")]
    ImpulsePercentOutOfRange(f64),

    #[error("coordinate navigation needs numeric x, y and z")]
    IncompleteCoordinates,
}

/// Loosely-typed shape of an inbound message, before validation
#[derive(Debug, Deserialize)]
struct RawCommand {
    department: Option<String>,
    intent: Option<String>,
    target: Option<String>,
    warp_factor: Option<Value>,
    impulse_percent: Option<Value>,
    maneuver: Option<String>,
    x: Option<Value>,
    y: Option<Value>,
    z: Option<Value>,
}

/// Decode and validate one message line
pub fn decode_command(line: &str) -> Result<BridgeCommand, ValidationError> {
    let raw: RawCommand =
        serde_json::from_str(line).map_err(|e| ValidationError::Syntax(e.to_string()))?;

    let department = raw
        .department
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField("department"))?;
    let department = Department::parse(department)
        .ok_or_else(|| ValidationError::UnknownDepartment(department.to_string()))?;

    let intent = raw
        .intent
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField("intent"))?;
    let intent =
        Intent::parse(intent).ok_or_else(|| ValidationError::UnknownIntent(intent.to_string()))?;

    let mut warnings = Vec::new();

    let warp_factor = numeric_field(raw.warp_factor.as_ref(), "warp factor", &mut warnings);
    if let Some(f) = warp_factor {
        if !(f > 0.0 && f < helm::WARP_FACTOR_LIMIT as f64) {
            return Err(ValidationError::WarpFactorOutOfRange(f));
        }
    }

    let impulse_percent =
        numeric_field(raw.impulse_percent.as_ref(), "impulse percent", &mut warnings);
    if let Some(p) = impulse_percent {
        if !(0.0..=100.0).contains(&p) {
            return Err(ValidationError::ImpulsePercentOutOfRange(p));
        }
    }

    let coordinates = coordinate_triple(&raw, &mut warnings)?;

    Ok(BridgeCommand {
        department,
        intent,
        target: raw.target.filter(|s| !s.trim().is_empty()),
        warp_factor: warp_factor.map(|f| f as f32),
        impulse_percent: impulse_percent.map(|p| p as f32),
        maneuver: raw.maneuver.filter(|s| !s.trim().is_empty()),
        coordinates,
        warnings,
    })
}

/// Extract an optional numeric field, coercing number-as-text where parseable
///
/// `null` counts as absent. An unreadable value also comes back absent, but
/// leaves a warning for the acknowledgment instead of silently vanishing.
fn numeric_field(value: Option<&Value>, name: &str, warnings: &mut Vec<String>) -> Option<f64> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                warnings.push(format!("could not read {name} '{s}'"));
                None
            }
        },
        Some(_) => {
            warnings.push(format!("ignoring {name}: expected a number"));
            None
        }
    }
}

/// x/y/z must be all present or all absent
fn coordinate_triple(
    raw: &RawCommand,
    warnings: &mut Vec<String>,
) -> Result<Option<Vec3>, ValidationError> {
    let x = numeric_field(raw.x.as_ref(), "x", warnings);
    let y = numeric_field(raw.y.as_ref(), "y", warnings);
    let z = numeric_field(raw.z.as_ref(), "z", warnings);

    match (x, y, z) {
        (Some(x), Some(y), Some(z)) => Ok(Some(Vec3::new(x as f32, y as f32, z as f32))),
        (None, None, None) => Ok(None),
        _ => Err(ValidationError::IncompleteCoordinates),
    }
}
