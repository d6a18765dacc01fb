mod rate_limit;
mod validation;

pub use rate_limit::{ActionKind, RateLimiter, RatePolicy, RateWindow};
pub use validation::{
    ValidationResult, damage_amount, is_in_bounds, sanitize_name, validate_move,
    validate_position, validate_shoot, validate_vector,
};
