//! 自定義牌型
//!
//! 把玩家挑選的牌種組成手牌，並重建一致的牌牆：
//! 全新洗好的 120 張中，按牌種逐張扣除手牌用掉的牌。

use rand::Rng;

use super::constants::{COPIES_PER_TYPE, MAX_CUSTOM_HAND};
use super::deck::{build_full_deck, shuffle, type_counts};
use super::error::GameError;
use super::ordering::sort_hand;
use super::tiles::{all_tile_types, TileIds, TileInstance, TileType};

/// 組牌結果
#[derive(Clone, Debug)]
pub struct ComposedHand {
    /// 已理牌的手牌
    pub hand: Vec<TileInstance>,
    /// 剩餘牌牆（已洗牌）
    pub deck: Vec<TileInstance>,
}

/// 檢查挑選的牌是否可能存在：不超過 14 張，每種不超過 4 張
pub fn validate(chosen: &[TileType]) -> Result<(), GameError> {
    if chosen.len() > MAX_CUSTOM_HAND {
        return Err(GameError::HandTooLarge {
            len: chosen.len(),
            max: MAX_CUSTOM_HAND,
        });
    }

    let counts = type_counts(chosen);
    for tile in all_tile_types() {
        let count = counts[tile.index()];
        if count > COPIES_PER_TYPE {
            return Err(GameError::TooManyCopies {
                tile,
                count,
                max: COPIES_PER_TYPE,
            });
        }
    }
    Ok(())
}

/// 組成自定義手牌
///
/// 每個挑選的牌種生成一張新實體牌；牌牆中同種的牌按種類（非實體）扣除一張。
pub fn compose<R: Rng + ?Sized>(
    chosen: &[TileType],
    wildcard: Option<&TileType>,
    ids: &mut TileIds,
    rng: &mut R,
) -> Result<ComposedHand, GameError> {
    validate(chosen)?;

    let full = build_full_deck(ids);
    let mut deck = shuffle(&full, rng);

    for tile in chosen {
        if let Some(pos) = deck.iter().position(|t| t.tile == *tile) {
            deck.remove(pos);
        }
    }

    let hand: Vec<TileInstance> = chosen.iter().map(|&tile| ids.mint(tile)).collect();
    let hand = sort_hand(&hand, wildcard);

    Ok(ComposedHand { hand, deck })
}

// ============================================================================
// 單元測試
// ============================================================================
