mod prune;

pub use prune::{PruneArgs, prune};
