use thiserror::Error;

use crate::ids::{BufferHandle, Generation, ItemId, TopologyId};

pub type Result<T> = std::result::Result<T, SnapError>;

#[derive(Error, Debug)]
pub enum SnapError {
    /// A raycastable object carried no recognised tag and no attached snap
    #[error("invalid snap target")]
    InvalidSnapTarget,

    #[error("stale buffer handle {handle}: cache is at generation {current}")]
    StaleHandle {
        handle: BufferHandle,
        current: Generation,
    },

    #[error("unknown buffer handle {0}")]
    UnknownHandle(BufferHandle),

    #[error("point index {index} out of range for buffer of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no model for topology item {0}")]
    MissingTopology(TopologyId),

    #[error("no model for {0}")]
    MissingItem(ItemId),

    #[error("{0} has no curve representation")]
    NotACurve(ItemId),

    #[error("invalid picker config: {0}")]
    Config(#[from] serde_json::Error),
}
