//! 理牌排序
//!
//! 排序優先級：癩子 > 花色（萬 < 筒 < 條 < 字）> 點數。

use std::cmp::Ordering;

use super::tiles::{TileInstance, TileType};

/// 比較兩張牌在手牌中的先後
pub fn compare_tiles(a: &TileInstance, b: &TileInstance, wildcard: Option<&TileType>) -> Ordering {
    // 癩子最前（true 排在 false 前）
    let a_wild = a.is_wild(wildcard);
    let b_wild = b.is_wild(wildcard);

    b_wild
        .cmp(&a_wild)
        .then_with(|| a.tile.suit().to_int().cmp(&b.tile.suit().to_int()))
        .then_with(|| a.tile.rank().cmp(&b.tile.rank()))
}

/// 理牌，返回新序列
///
/// 穩定排序：同種牌保持原相對順序。
pub fn sort_hand(hand: &[TileInstance], wildcard: Option<&TileType>) -> Vec<TileInstance> {
    let mut sorted = hand.to_vec();
    sorted.sort_by(|a, b| compare_tiles(a, b, wildcard));
    sorted
}

// ============================================================================
// 單元測試
// ============================================================================
