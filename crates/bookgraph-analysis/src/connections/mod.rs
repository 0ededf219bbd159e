//! Connection inference between catalog items.

pub mod analysis;
pub mod graph;
pub mod scorer;

pub use analysis::{ItemAnalysis, ItemAnalyzer};
pub use graph::{ANCHOR_LANGUAGE, ConnectionGraphBuilder, PairTask};
pub use scorer::score_pair;
