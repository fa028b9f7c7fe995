use crate::{command::model::CommandTag, foundation::core::EntityId, scene::model::EntityKind};

/// Why a single command was skipped.
///
/// These never abort a step. The interpreter logs them and collects them into a
/// [`crate::StepReport`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The object has no usable `command` field.
    #[error("command has no 'command' tag")]
    MissingTag,

    /// The tag is not a known command.
    #[error("unknown command '{0}'")]
    UnknownTag(String),

    /// The payload does not match the command's fields.
    #[error("{tag}: malformed payload: {reason}")]
    Malformed {
        /// Raw tag as received.
        tag: String,
        /// Decoder message.
        reason: String,
    },

    /// The command references an entity that does not exist.
    #[error("{tag}: {kind} '{id}' does not exist")]
    Dangling {
        /// Command tag.
        tag: CommandTag,
        /// Expected kind.
        kind: EntityKind,
        /// Missing id.
        id: EntityId,
    },

    /// A cell index is outside its array.
    #[error("{tag}: index {index} out of bounds for array '{array}' (len {len})")]
    OutOfBounds {
        /// Command tag.
        tag: CommandTag,
        /// Array id.
        array: EntityId,
        /// Offending index.
        index: usize,
        /// Array length.
        len: usize,
    },

    /// The scene refused the mutation.
    #[error("{tag}: {reason}")]
    Rejected {
        /// Command tag.
        tag: CommandTag,
        /// Explanation.
        reason: String,
    },
}

impl CommandError {
    pub(crate) fn malformed(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn rejected(tag: CommandTag, reason: impl Into<String>) -> Self {
        Self::Rejected {
            tag,
            reason: reason.into(),
        }
    }

    pub(crate) fn dangling(tag: CommandTag, kind: EntityKind, id: &EntityId) -> Self {
        Self::Dangling {
            tag,
            kind,
            id: id.clone(),
        }
    }
}
