pub mod catalog;
pub mod filters;
pub mod formatting;
pub mod recommendations;
pub mod selections;

pub use catalog::GameTable;
pub use recommendations::recommend;
pub use selections::{InMemorySelectionStore, SelectionStore};
