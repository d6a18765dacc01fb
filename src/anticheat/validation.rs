use crate::error::{RelayError, RelayResult};
use crate::types::{DEFAULT_HIT_DAMAGE, MAX_NAME_UNITS, Position, WORLD_BOUNDS};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    NonFinite,
    OutOfBounds,
}

impl ValidationResult {
    pub fn into_result(self, what: &str) -> RelayResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::NonFinite => {
                Err(RelayError::Validation(format!("{} is not finite", what)))
            }
            ValidationResult::OutOfBounds => {
                Err(RelayError::Validation(format!("{} out of bounds", what)))
            }
        }
    }
}

pub fn validate_position(pos: &Position) -> ValidationResult {
    if !pos.is_finite() {
        return ValidationResult::NonFinite;
    }

    if !is_in_bounds(pos, WORLD_BOUNDS) {
        return ValidationResult::OutOfBounds;
    }

    ValidationResult::Valid
}

/// Rotations and directions only need to be real numbers.
pub fn validate_vector(vector: &Position) -> ValidationResult {
    if vector.is_finite() {
        ValidationResult::Valid
    } else {
        ValidationResult::NonFinite
    }
}

pub fn validate_move(position: &Position, rotation: &Position) -> RelayResult<()> {
    validate_position(position).into_result("position")?;
    validate_vector(rotation).into_result("rotation")
}

pub fn validate_shoot(position: &Position, direction: &Position) -> RelayResult<()> {
    validate_position(position).into_result("position")?;
    validate_vector(direction).into_result("direction")
}

pub fn is_in_bounds(pos: &Position, bounds: f64) -> bool {
    pos.x.abs() <= bounds && pos.y.abs() <= bounds && pos.z.abs() <= bounds
}

/// Turns whatever the client sent as a name into a display name.
///
/// Strings are used as-is, numbers and booleans are stringified, anything
/// else is a malformed join. The result is stripped of control characters
/// and capped at `MAX_NAME_UNITS` UTF-16 code units without splitting a
/// character. `None` means the caller should fall back to a default name.
pub fn sanitize_name(raw: Option<&serde_json::Value>) -> RelayResult<Option<String>> {
    let text = match raw {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(_) => {
            return Err(RelayError::Validation(
                "playerName must be a string".to_string(),
            ));
        }
    };

    let mut units = 0;
    let name: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take_while(|c| {
            units += c.len_utf16();
            units <= MAX_NAME_UNITS
        })
        .collect();

    let name = name.trim_end().to_string();
    if name.is_empty() {
        Ok(None)
    } else {
        Ok(Some(name))
    }
}

/// Damage reported by the victim's client. Anything that is not a finite
/// number falls back to the default.
pub fn damage_amount(raw: Option<&serde_json::Value>) -> f64 {
    raw.and_then(|value| value.as_f64())
        .filter(|damage| damage.is_finite())
        .unwrap_or(DEFAULT_HIT_DAMAGE)
}
