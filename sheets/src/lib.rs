pub mod config;
pub mod memory;
pub mod provider;
pub mod types;

pub use config::SheetsConfig;
pub use memory::{InMemoryWorkbook, TabSnapshot, WorkbookSnapshot};
pub use provider::{SheetsError, SheetsProvider, SheetsResult};
pub use types::{
    BatchRequest, CopyPasteInstruction, GridRange, PasteType, TabId, ValueRange,
};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::memory::*;
    pub use crate::provider::*;
    pub use crate::types::*;
}
