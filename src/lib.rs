pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod render;
pub mod session;

pub use config::Config;
pub use document::{Action, InvoiceDocument, ItemId, LineItem, Party, TextField};
pub use error::{Result, StudioError};
pub use render::Snapshot;
