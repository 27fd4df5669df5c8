//! 牌種目錄
//!
//! 定義 30 種牌（萬/筒/條 1-9 + 中發白）以及實體牌。
//! 牌種相等只看 (花色, 點數)，實體牌另帶唯一 ID 用於選取與移除。

use std::fmt;
use std::str::FromStr;

use super::constants::{HONOR_RANKS, NUMBERED_RANKS, TILE_TYPE_COUNT};
use super::error::ParseTileError;

/// 花色（宣告順序即理牌順序）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Wan,    // 萬
    Tong,   // 筒
    Tiao,   // 條
    Dragon, // 中發白
}

impl Suit {
    /// 轉換為整數 ID（理牌用）
    pub fn to_int(&self) -> u8 {
        match self {
            Suit::Wan => 0,
            Suit::Tong => 1,
            Suit::Tiao => 2,
            Suit::Dragon => 3,
        }
    }

    /// 所有花色
    pub fn all() -> &'static [Suit] {
        &[Suit::Wan, Suit::Tong, Suit::Tiao, Suit::Dragon]
    }

    pub fn is_honor(&self) -> bool {
        *self == Suit::Dragon
    }

    /// 該花色的最大點數
    pub fn max_rank(&self) -> u8 {
        if self.is_honor() {
            HONOR_RANKS
        } else {
            NUMBERED_RANKS
        }
    }

    /// 數牌花色字
    fn glyph(&self) -> &'static str {
        match self {
            Suit::Wan => "萬",
            Suit::Tong => "筒",
            Suit::Tiao => "條",
            Suit::Dragon => "",
        }
    }
}

/// 牌種：(花色, 點數)
///
/// 字牌點數 1 = 中、2 = 發、3 = 白，只用於排序。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileType {
    suit: Suit,
    rank: u8,
}

impl TileType {
    /// 創建牌種，點數越界返回 None
    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        if rank == 0 || rank > suit.max_rank() {
            return None;
        }
        Some(Self { suit, rank })
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// 在目錄中的索引（0..30）
    pub fn index(&self) -> usize {
        self.suit.to_int() as usize * NUMBERED_RANKS as usize + (self.rank as usize - 1)
    }

    /// 顯示名稱
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Suit::Dragon => {
                let glyph = match self.rank {
                    1 => "中",
                    2 => "發",
                    _ => "白",
                };
                f.write_str(glyph)
            }
            suit => write!(f, "{}{}", self.rank, suit.glyph()),
        }
    }
}

/// 解析牌名
///
/// 支援簡寫 `5m`/`5p`/`5s`/`1z`..`3z`，以及顯示名稱（繁簡皆可）。
impl FromStr for TileType {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let err = || ParseTileError(text.to_string());

        match text {
            "中" => return Ok(Self { suit: Suit::Dragon, rank: 1 }),
            "發" | "发" => return Ok(Self { suit: Suit::Dragon, rank: 2 }),
            "白" => return Ok(Self { suit: Suit::Dragon, rank: 3 }),
            _ => {}
        }

        let mut chars = text.chars();
        let rank = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(err)? as u8;
        let suit = match chars.as_str() {
            "m" | "萬" | "万" => Suit::Wan,
            "p" | "筒" => Suit::Tong,
            "s" | "條" | "条" => Suit::Tiao,
            "z" => Suit::Dragon,
            _ => return Err(err()),
        };
        Self::new(suit, rank).ok_or_else(err)
    }
}

/// 兩張牌是否同種；第二張不存在時為 false
///
/// 癩子判定唯一使用的相等關係。
pub fn same_type(a: &TileType, b: Option<&TileType>) -> bool {
    b.map_or(false, |b| a == b)
}

/// 全部 30 種牌（目錄順序）
///
/// 亦作為自定義牌型的選牌面板。
pub fn all_tile_types() -> Vec<TileType> {
    let mut types = Vec::with_capacity(TILE_TYPE_COUNT);
    for &suit in Suit::all() {
        for rank in 1..=suit.max_rank() {
            types.push(TileType { suit, rank });
        }
    }
    types
}

// ============================================================================
// 實體牌
// ============================================================================

/// 實體牌 ID（不透明，移除後不再重用）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u32);

impl TileId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for TileId {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        text.trim_start_matches('#')
            .parse::<u32>()
            .map(TileId)
            .map_err(|_| ParseTileError(text.to_string()))
    }
}

/// 實體牌：牌種 + 唯一 ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileInstance {
    pub id: TileId,
    pub tile: TileType,
}

impl TileInstance {
    /// 是否為癩子
    pub fn is_wild(&self, wildcard: Option<&TileType>) -> bool {
        same_type(&self.tile, wildcard)
    }
}

/// ID 分配器（單調遞增）
#[derive(Clone, Debug, Default)]
pub struct TileIds {
    next: u32,
}

impl TileIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next += 1;
        id
    }

    /// 為指定牌種生成一張新實體牌
    pub fn mint(&mut self, tile: TileType) -> TileInstance {
        TileInstance {
            id: self.next_id(),
            tile,
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================
