//! Todenet Board
//!
//! The application layer around the board graph: owned board state
//! (selection, node and link editing), commit-change history, RocksDB
//! persistence keyed by node id, and JSON export/import.
//!
//! Rendering, pan/zoom, and drag mechanics live in whatever frontend
//! consumes this crate; everything here is the state those surfaces call
//! into. The `todenet` binary drives the same operations from the command
//! line.

mod board;
mod error;
mod export;
mod history;
mod storage;

pub use board::{Board, BOARD_SIZE, DEFAULT_NODE_NAME, ROW_SPACING};
pub use error::{Error, Result};
pub use export::{default_export_filename, export_json, import_json};
pub use history::{recent_days, today_key, CommitHistory, DayDeltas, HeatLevel, PANEL_DAYS};
pub use storage::Storage;
