use num_traits::ToPrimitive;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GradrustError {
    #[error("domain error: {func}({arg}) is undefined")]
    Domain { func: &'static str, arg: f64 },
    #[error("invalid logarithm base: {base}")]
    InvalidLogBase { base: f64 },
    #[error("tape mismatch: expected variables from tape {expected}, got one from tape {actual}")]
    TapeMismatch { expected: Uuid, actual: Uuid },
}

impl GradrustError {
    pub(crate) fn domain<T: ToPrimitive>(func: &'static str, arg: T) -> Self {
        Self::Domain {
            func,
            arg: arg.to_f64().unwrap_or(f64::NAN),
        }
    }

    pub(crate) fn invalid_log_base<T: ToPrimitive>(base: T) -> Self {
        Self::InvalidLogBase {
            base: base.to_f64().unwrap_or(f64::NAN),
        }
    }
}

pub type Result<T> = std::result::Result<T, GradrustError>;
