//! Prize catalog: templates, the live probability table, and draws.

pub mod data;
pub mod draw;
pub mod table;
pub mod types;

pub use data::*;
pub use draw::*;
pub use table::*;
pub use types::*;
