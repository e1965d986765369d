pub mod analytics;
pub mod model;
pub mod store;

pub use model::{Link, Node, NodeType, Snapshot, SnapshotMetadata, slugify};
pub use store::{read_snapshot, write_snapshot};
