use std::fmt::{Debug, Display, Formatter, Result};

#[derive(Debug)]
pub enum OperationError<T: Debug> {
    IndexOutOfBounds,
    MismatchedShapes(String),
    NoBufferWithID(String),
    InvalidArgument(String),
    DeviceError(Box<T>),
}

impl<T: Debug> Display for OperationError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::IndexOutOfBounds => write!(f, "index out of bounds"),
            Self::MismatchedShapes(msg) => write!(f, "mismatched shapes: {msg}"),
            Self::NoBufferWithID(id) => write!(f, "no buffer with id '{id}'"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::DeviceError(err) => write!(f, "device error: {err:?}"),
        }
    }
}

impl<T: Debug> std::error::Error for OperationError<T> {}

impl<T: Debug> From<T> for OperationError<T> {
    fn from(value: T) -> Self {
        Self::DeviceError(Box::new(value))
    }
}

pub type OperationResult<T> = std::result::Result<(), OperationError<T>>;
