//! 遊戲常量定義

// ============================================================================
// 牌組常量
// ============================================================================

pub const NUMBERED_RANKS: u8 = 9;        // 萬/筒/條 點數 1-9
pub const HONOR_RANKS: u8 = 3;           // 中/發/白
pub const TILE_TYPE_COUNT: usize = 30;   // 9 + 9 + 9 + 3
pub const COPIES_PER_TYPE: usize = 4;    // 每種牌 4 張
pub const DECK_SIZE: usize = TILE_TYPE_COUNT * COPIES_PER_TYPE; // 120

// ============================================================================
// 回合規則常量
// ============================================================================

pub const HAND_SIZE: usize = 13;         // 起手 13 張
pub const MAX_CUSTOM_HAND: usize = 14;   // 自定義牌型上限
pub const HISTORY_LIMIT: usize = 10;     // 保留最近 10 筆胡牌紀錄

// ============================================================================
// 排程常量
// ============================================================================

pub const AUTO_DRAW_DELAY_MS: u64 = 600; // 打牌後自動摸牌延遲
pub const EVENT_BUFFER: usize = 64;      // 事件通道容量

// ============================================================================
// 顯示常量
// ============================================================================

pub const WILDCARD_MARK: &str = "(癩)";
