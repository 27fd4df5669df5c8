//! 錯誤定義

use thiserror::Error;

use super::tiles::{TileId, TileType};

/// 回合狀態機與自定義牌型的錯誤
///
/// 全部可恢復，不影響行程。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// 牌牆摸空，直到新局前不能再摸牌
    #[error("deck exhausted")]
    DeckExhausted,

    /// 手牌張數不在該動作的階段
    #[error("{action} not allowed with {hand_len} tiles in hand")]
    InvalidPhase { action: &'static str, hand_len: usize },

    /// 手牌中沒有這張牌
    #[error("tile {0} is not in hand")]
    UnknownInstance(TileId),

    #[error("custom hand has {len} tiles, at most {max} allowed")]
    HandTooLarge { len: usize, max: usize },

    #[error("custom hand has {count} copies of {tile}, at most {max} exist")]
    TooManyCopies { tile: TileType, count: usize, max: usize },
}

impl GameError {
    /// 可直接忽略的事件（重複/過時的操作）
    pub fn is_ignorable(&self) -> bool {
        matches!(self, GameError::InvalidPhase { .. } | GameError::UnknownInstance(_))
    }
}

/// 牌名或牌 ID 解析失敗
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot parse tile: {0:?}")]
pub struct ParseTileError(pub String);
