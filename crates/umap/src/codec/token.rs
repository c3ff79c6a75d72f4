use crate::value::Value;

/// What a reader found at the current position.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Scalar(Value),
    Null,
    MapStart,
    ArrayStart,
    /// The enclosing structure has no more entries.
    End,
}

impl Token {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Null => "null",
            Self::MapStart => "map",
            Self::ArrayStart => "array",
            Self::End => "end of structure",
        }
    }
}

/// A value token plus whether it was the final entry of its structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueToken {
    pub token: Token,
    pub is_last: bool,
}

impl ValueToken {
    pub fn scalar(value: impl Into<Value>, is_last: bool) -> Self {
        Self {
            token: Token::Scalar(value.into()),
            is_last,
        }
    }

    pub fn null(is_last: bool) -> Self {
        Self {
            token: Token::Null,
            is_last,
        }
    }

    pub fn map_start(is_last: bool) -> Self {
        Self {
            token: Token::MapStart,
            is_last,
        }
    }

    pub fn array_start(is_last: bool) -> Self {
        Self {
            token: Token::ArrayStart,
            is_last,
        }
    }

    pub fn end() -> Self {
        Self {
            token: Token::End,
            is_last: true,
        }
    }
}
