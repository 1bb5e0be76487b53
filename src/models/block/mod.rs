pub mod ordering;
pub mod queries;
pub mod registry;
pub mod types;

pub use ordering::{duplicate, reorder};
pub use queries::{create, delete, get, list, update};
pub use registry::{BlockCategory, PickerEntry, picker_entries};
pub use types::{Block, BlockType, validate_props};
