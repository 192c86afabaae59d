//! Status returned by behavior nodes.

/// The result of evaluating a behavior node.
///
/// Evaluation is instantaneous: conditions answer immediately and actions
/// take effect on the blackboard before returning, so two outcomes cover
/// every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The condition held, or the action took effect.
    Success,
    /// The condition did not hold, or the action could not apply.
    Failure,
}

impl Status {
    /// Maps a boolean check onto a status.
    #[inline]
    pub fn from_bool(ok: bool) -> Self {
        if ok { Status::Success } else { Status::Failure }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Flips Success to Failure and back. Used by [`crate::Invert`].
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }
}

impl From<bool> for Status {
    fn from(ok: bool) -> Self {
        Status::from_bool(ok)
    }
}
