//! 服務層模組
//!
//! 提供回合狀態機、狀態快照與牌桌 actor（延時自動摸牌排程）

pub mod session;
pub mod snapshot;
pub mod table;

pub use session::{Phase, Session, SessionStats};
pub use snapshot::{hand_to_text, history_to_json, Snapshot};
pub use table::{EventSource, Table, TableConfig, TableError, TableEvent, TableHandle};
