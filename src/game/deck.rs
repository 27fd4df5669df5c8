//! 牌牆建構
//!
//! 建立 120 張完整牌牆（30 種 x 4 張）並洗牌。

use rand::seq::SliceRandom;
use rand::Rng;

use super::constants::{COPIES_PER_TYPE, DECK_SIZE, TILE_TYPE_COUNT};
use super::tiles::{all_tile_types, TileIds, TileInstance, TileType};

/// 創建完整牌牆（目錄順序，未洗牌）
///
/// 每張實體牌都從 `ids` 取得新 ID。
pub fn build_full_deck(ids: &mut TileIds) -> Vec<TileInstance> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for tile in all_tile_types() {
        for _ in 0..COPIES_PER_TYPE {
            deck.push(ids.mint(tile));
        }
    }
    deck
}

/// 洗牌，返回新序列，不修改輸入
///
/// `SliceRandom::shuffle` 為 Fisher-Yates：第 i 步從 [0, i] 均勻取一個位置交換，
/// 共 n! 種等機率路徑，對應 n! 種排列各一條，因此在均勻亂數源下無偏。
pub fn shuffle<R: Rng + ?Sized>(deck: &[TileInstance], rng: &mut R) -> Vec<TileInstance> {
    let mut shuffled = deck.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// 統計每種牌的張數（以目錄索引）
pub fn type_counts<'a, I>(tiles: I) -> [usize; TILE_TYPE_COUNT]
where
    I: IntoIterator<Item = &'a TileType>,
{
    let mut counts = [0; TILE_TYPE_COUNT];
    for tile in tiles {
        counts[tile.index()] += 1;
    }
    counts
}

// ============================================================================
// 單元測試
// ============================================================================
