//! 遊戲核心模組
//!
//! 包含麻將單人練習的純邏輯：
//! - `constants`: 遊戲常量
//! - `tiles`: 牌種目錄、實體牌、牌名
//! - `deck`: 牌牆建構與洗牌
//! - `ordering`: 理牌排序
//! - `compose`: 自定義牌型
//! - `history`: 胡牌紀錄
//! - `error`: 錯誤定義
//!
//! 注意：胡牌不做判定，由玩家自行宣告

pub mod constants;
pub mod tiles;
pub mod deck;
pub mod ordering;
pub mod compose;
pub mod history;
pub mod error;

// Re-export 常用類型
pub use constants::*;
pub use tiles::{Suit, TileType, TileId, TileInstance, TileIds, all_tile_types, same_type};
pub use deck::{build_full_deck, shuffle, type_counts};
pub use ordering::{compare_tiles, sort_hand};
pub use compose::{compose, validate, ComposedHand};
pub use history::{HistoryLedger, HistoryRecord};
pub use error::{GameError, ParseTileError};
