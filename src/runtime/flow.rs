use crate::runtime::value::Value;

/// What a visit callback asks the iteration engine to do next.
///
/// `Break` and `Return` stop the iteration; only `Return` carries a payload.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Flow {
    Continue,
    Break,
    Return(Value),
}

impl From<()> for Flow {
    fn from(_: ()) -> Self {
        Flow::Continue
    }
}

/// How an `iterate` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every element was visited (or there was nothing to visit).
    Exhausted,
    /// A callback returned [`Flow::Break`].
    Broken,
    /// A callback returned [`Flow::Return`] with this value.
    Returned(Value),
}

impl Outcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Outcome::Exhausted)
    }

    /// Whether iteration stopped early.
    pub fn halted(&self) -> bool {
        !self.is_exhausted()
    }

    /// Returned payload, if any.
    pub fn into_returned(self) -> Option<Value> {
        match self {
            Outcome::Returned(value) => Some(value),
            _ => None,
        }
    }
}
