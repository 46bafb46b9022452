use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("width and height values ({width}x{height}) do not match depth buffer size {len}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("invalid value {value} for `{name}`, expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        expected: String,
    },
}
