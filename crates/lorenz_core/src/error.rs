use thiserror::Error;

/// Errors raised by points, boxes, vector fields and data sources.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{coordinate} must be a finite number, got {value}.")]
    NonFinite { coordinate: &'static str, value: f64 },

    #[error("Bound {name} must be a finite number, got {value}.")]
    InvalidBound { name: &'static str, value: f64 },

    #[error("Invalid value {value} for coefficient \"{name}\": {reason}.")]
    InvalidCoefficient {
        name: String,
        value: f64,
        reason: &'static str,
    },

    #[error("Bad value {name}={value}: must be {requirement}.")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("Step at t={time} produced a non-finite state {state:?}.")]
    NonFiniteStep { time: f64, state: [f64; 3] },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejects values that are NaN, infinite or not strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            requirement: "a finite number > 0",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_positive_rejects_zero_nan_and_infinity() {
        assert_eq!(require_positive("timeStep", 0.5), Ok(0.5));
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = require_positive("timeStep", bad).expect_err("expected rejection");
            assert!(err.to_string().contains("timeStep"));
        }
    }

    #[test]
    fn messages_name_the_offending_coordinate() {
        let err = Error::NonFinite {
            coordinate: "y",
            value: f64::NAN,
        };
        assert_eq!(err.to_string(), "y must be a finite number, got NaN.");
    }
}
