//! Error taxonomy for the image pipeline.

use std::fmt;

use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum OpError {
    /// Input dimensions differ and resampling was not permitted.
    SizeMismatch {
        primary: (usize, usize),
        secondary: (usize, usize),
    },
    /// Operator inputs disagree in shape. The normalizer is responsible for
    /// establishing equal shapes, so this is a defect in the calling sequence.
    ShapeMismatch,
    /// Blend weight outside [0, 1].
    InvalidWeight(f64),
    /// Operator name not in the known set.
    UnsupportedOperator(String),
    /// Sample buffer length does not match the declared dimensions.
    BufferLength { expected: usize, actual: usize },
    /// Width or height is zero.
    ZeroDimension,
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { primary, secondary } => write!(
                f,
                "size mismatch: A={}x{}, B={}x{}; enable auto-resize or use equally sized images",
                primary.0, primary.1, secondary.0, secondary.1
            ),
            Self::ShapeMismatch => write!(f, "operator inputs have mismatched shapes"),
            Self::InvalidWeight(w) => write!(f, "blend weight {} is outside [0, 1]", w),
            Self::UnsupportedOperator(name) => write!(f, "unsupported operation \"{}\"", name),
            Self::BufferLength { expected, actual } => write!(
                f,
                "buffer length mismatch: expected {}, got {}",
                expected, actual
            ),
            Self::ZeroDimension => write!(f, "image dimensions must be positive"),
        }
    }
}

impl std::error::Error for OpError {}

impl From<OpError> for JsValue {
    fn from(err: OpError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[test]
fn test_display() {
    let err = OpError::SizeMismatch {
        primary: (640, 480),
        secondary: (320, 240),
    };
    assert!(err.to_string().contains("A=640x480"));
    assert!(err.to_string().contains("B=320x240"));
    assert_eq!(
        OpError::UnsupportedOperator("invert".to_string()).to_string(),
        "unsupported operation \"invert\""
    );
}
