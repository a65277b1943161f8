use std::fmt::{Debug, Display, Formatter, Result};

use crate::device::OperationError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerValidationError {
    pub layer: String,
    pub message: String,
}

impl LayerValidationError {
    pub fn new(layer: &str, message: impl Into<String>) -> Self {
        Self { layer: layer.to_string(), message: message.into() }
    }
}

impl Display for LayerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {}", self.layer, self.message)
    }
}

impl std::error::Error for LayerValidationError {}

#[derive(Debug)]
pub enum LayerError<T: Debug> {
    Validation(LayerValidationError),
    Operation(OperationError<T>),
}

impl<T: Debug> Display for LayerError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Operation(err) => write!(f, "{err}"),
        }
    }
}

impl<T: Debug> std::error::Error for LayerError<T> {}

impl<T: Debug> From<LayerValidationError> for LayerError<T> {
    fn from(value: LayerValidationError) -> Self {
        Self::Validation(value)
    }
}

impl<T: Debug> From<OperationError<T>> for LayerError<T> {
    fn from(value: OperationError<T>) -> Self {
        Self::Operation(value)
    }
}
