pub mod model;
pub mod snapshot;

pub use model::{
    Color, LIST_BASE_LEVEL, MAX_HEADER_LEVEL, Node, NodeId, NodeKind, Position, Tree, UnknownColor,
};
pub use snapshot::Snapshot;
