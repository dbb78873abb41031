use crate::tree::NodeId;

/// Rejected edits. The tree is unchanged whenever one of these is returned,
/// and each one is meant to be shown to the user as a notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no node selected")]
    NoTarget,

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("the root node cannot be deleted or moved")]
    RootProtected,

    #[error("cannot move {node} under {target}: target is the node itself or one of its descendants")]
    Cycle { node: NodeId, target: NodeId },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("node {0} is already being edited")]
    EditInProgress(NodeId),

    #[error("no edit in progress")]
    NotEditing,
}
