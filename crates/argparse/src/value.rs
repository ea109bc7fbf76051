//! Shape-tagged storage for bound argument values.
//!
//! A slot holds either nothing, a single string, or an ordered sequence of
//! strings. Callers ask for the Rust type they expect and get it back only
//! when the stored shape matches.

use std::fmt;

/// The two shapes a bound value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Single,
    Multiple,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single value"),
            Self::Multiple => f.write_str("value list"),
        }
    }
}

/// Why a value could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("expected a {expected}, found a {found}")]
    TypeMismatch { expected: Shape, found: Shape },
    #[error("no value stored")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Content {
    #[default]
    Empty,
    Single(String),
    Multiple(Vec<String>),
}

/// A value of either shape, remembering which one it holds.
///
/// `Clone` deep-copies the content; two clones never share storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Value {
    content: Content,
}

impl Value {
    /// A value holding nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current content with `value`.
    pub fn store(&mut self, value: impl Into<Value>) {
        *self = value.into();
    }

    /// Append to a value list, starting one if nothing is stored yet.
    ///
    /// A stored single value is replaced by a one-element list first.
    pub(crate) fn extend<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        match &mut self.content {
            Content::Multiple(list) => list.extend(values),
            Content::Single(s) => {
                let mut list = vec![std::mem::take(s)];
                list.extend(values);
                self.content = Content::Multiple(list);
            }
            Content::Empty => self.content = Content::Multiple(values.into_iter().collect()),
        }
    }

    /// Extract a copy of the content as `T`.
    pub fn extract<T: FromValue>(&self) -> Result<T, ExtractError> {
        T::from_value(self)
    }

    /// Borrow the content as a single string.
    pub fn as_str(&self) -> Result<&str, ExtractError> {
        match &self.content {
            Content::Single(s) => Ok(s.as_str()),
            Content::Multiple(_) => Err(ExtractError::TypeMismatch {
                expected: Shape::Single,
                found: Shape::Multiple,
            }),
            Content::Empty => Err(ExtractError::Empty),
        }
    }

    /// Borrow the content as a value list.
    pub fn as_slice(&self) -> Result<&[String], ExtractError> {
        match &self.content {
            Content::Multiple(list) => Ok(list.as_slice()),
            Content::Single(_) => Err(ExtractError::TypeMismatch {
                expected: Shape::Multiple,
                found: Shape::Single,
            }),
            Content::Empty => Err(ExtractError::Empty),
        }
    }

    /// Shape of the stored content, if any.
    pub fn shape(&self) -> Option<Shape> {
        match self.content {
            Content::Empty => None,
            Content::Single(_) => Some(Shape::Single),
            Content::Multiple(_) => Some(Shape::Multiple),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, Content::Empty)
    }

    /// Number of strings held.
    pub fn len(&self) -> usize {
        match &self.content {
            Content::Empty => 0,
            Content::Single(_) => 1,
            Content::Multiple(list) => list.len(),
        }
    }

    pub fn clear(&mut self) {
        self.content = Content::Empty;
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self {
            content: Content::Single(value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self {
            content: Content::Multiple(value),
        }
    }
}

/// Types that can be extracted from a [`Value`].
pub trait FromValue: Sized {
    /// The shape this type is extracted from.
    const SHAPE: Shape;

    fn from_value(value: &Value) -> Result<Self, ExtractError>;
}

impl FromValue for String {
    const SHAPE: Shape = Shape::Single;

    fn from_value(value: &Value) -> Result<Self, ExtractError> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Vec<String> {
    const SHAPE: Shape = Shape::Multiple;

    fn from_value(value: &Value) -> Result<Self, ExtractError> {
        value.as_slice().map(<[String]>::to_vec)
    }
}
