#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("family F{family} has no identifiable parent")]
    FamilyWithoutParents { family: u32 },

    #[error("branch {branch} has no node without an incoming edge")]
    BranchWithoutRoot { branch: usize },

    #[error(
        "cannot distribute shift between {left} and {right} in branch {branch}: {subtrees} subtrees"
    )]
    InvalidSubtreeShift {
        branch: usize,
        left: String,
        right: String,
        subtrees: i64,
    },

    #[error("not a pedigree node id: {node}")]
    UnknownNode { node: String },

    #[error("no individual id left to duplicate P{original}")]
    IdsExhausted { original: u32 },

    #[error("invalid layout configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to serialize layout: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
