//! 回合狀態機
//!
//! `Session` 擁有一局的牌牆、手牌、牌河、癩子和輪數。
//! 階段完全由手牌張數 mod 3 決定：1 等待摸牌，2 等待打牌。

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::game::{
    build_full_deck, compose, shuffle, sort_hand, GameError, HistoryLedger, HistoryRecord,
    TileId, TileIds, TileInstance, TileType, HAND_SIZE,
};

/// 回合階段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingDraw,
    AwaitingDiscard,
}

impl Phase {
    /// 由手牌張數推導階段；張數 mod 3 == 0 時兩者皆非
    pub fn of(hand_len: usize) -> Option<Phase> {
        match hand_len % 3 {
            1 => Some(Phase::AwaitingDraw),
            2 => Some(Phase::AwaitingDiscard),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingDraw => "awaiting_draw",
            Phase::AwaitingDiscard => "awaiting_discard",
        }
    }
}

/// 本局統計
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionStats {
    /// 輪數（從 1 開始，每打一張 +1）
    pub turn_count: u32,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self { turn_count: 1 }
    }
}

/// 一局練習的完整狀態
pub struct Session {
    pub(crate) rng: StdRng,
    ids: TileIds,

    // 牌組
    pub(crate) deck: Vec<TileInstance>,
    pub(crate) hand: Vec<TileInstance>,
    pub(crate) discarded: Vec<TileInstance>, // 最新的在前

    pub(crate) wildcard: Option<TileType>,
    pub(crate) stats: SessionStats,

    // 顯示用
    pub(crate) last_action: String,
    pub(crate) last_drawn: Option<TileId>,
    pub(crate) exhausted: bool,
}

impl Session {
    /// 創建空白狀態（尚未發牌）
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ids: TileIds::new(),
            deck: Vec::new(),
            hand: Vec::new(),
            discarded: Vec::new(),
            wildcard: None,
            stats: SessionStats::default(),
            last_action: String::new(),
            last_drawn: None,
            exhausted: false,
        }
    }

    /// 創建並開始新局
    pub fn start(seed: u64) -> Self {
        let mut session = Self::new(seed);
        session.new_game();
        session
    }

    // ========================================================================
    // 查詢
    // ========================================================================

    pub fn phase(&self) -> Option<Phase> {
        Phase::of(self.hand.len())
    }

    pub fn hand(&self) -> &[TileInstance] {
        &self.hand
    }

    pub fn deck(&self) -> &[TileInstance] {
        &self.deck
    }

    pub fn discarded(&self) -> &[TileInstance] {
        &self.discarded
    }

    pub fn wildcard(&self) -> Option<TileType> {
        self.wildcard
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn last_action(&self) -> &str {
        &self.last_action
    }

    pub fn last_drawn(&self) -> Option<TileId> {
        self.last_drawn
    }

    /// 牌牆是否已摸空（流局）
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// 是否應該自動摸牌
    pub fn wants_draw(&self) -> bool {
        self.phase() == Some(Phase::AwaitingDraw) && !self.exhausted
    }

    // ========================================================================
    // 狀態轉移
    // ========================================================================

    /// 新局：發牌後立即摸第一張
    pub fn new_game(&mut self) {
        self.deal();
        if let Err(err) = self.draw() {
            log::warn!("opening draw failed: {}", err);
        }
    }

    /// 洗牌、定癩子、發 13 張
    ///
    /// 癩子只讀取隨機一張牌的牌種，該實體牌仍留在牌牆中可被摸到。
    pub fn deal(&mut self) {
        let full = build_full_deck(&mut self.ids);
        let mut deck = shuffle(&full, &mut self.rng);

        let ref_index = self.rng.gen_range(0..deck.len());
        let wildcard = deck[ref_index].tile;

        let hand: Vec<TileInstance> = deck.drain(..HAND_SIZE).collect();

        self.hand = sort_hand(&hand, Some(&wildcard));
        self.deck = deck;
        self.wildcard = Some(wildcard);
        self.discarded.clear();
        self.stats = SessionStats::default();
        self.last_drawn = None;
        self.exhausted = false;
        self.last_action = "新局開始".to_string();

        log::info!("new game dealt, wildcard {}", wildcard);
    }

    /// 摸牌：從牌牆最前端取一張放到手牌最後（不自動理牌）
    pub fn draw(&mut self) -> Result<TileInstance, GameError> {
        if self.phase() != Some(Phase::AwaitingDraw) {
            return Err(GameError::InvalidPhase {
                action: "draw",
                hand_len: self.hand.len(),
            });
        }

        if self.deck.is_empty() {
            self.exhausted = true;
            self.last_action = "流局 - 牌牆摸空".to_string();
            log::warn!("deck exhausted at turn {}", self.stats.turn_count);
            return Err(GameError::DeckExhausted);
        }

        let tile = self.deck.remove(0);
        self.hand.push(tile);
        self.last_drawn = Some(tile.id);
        self.last_action = format!("摸入: {}", tile.tile);
        Ok(tile)
    }

    /// 打牌：移到牌河最前，輪數 +1
    pub fn discard(&mut self, id: TileId) -> Result<TileInstance, GameError> {
        if self.phase() != Some(Phase::AwaitingDiscard) {
            return Err(GameError::InvalidPhase {
                action: "discard",
                hand_len: self.hand.len(),
            });
        }

        let pos = self
            .hand
            .iter()
            .position(|t| t.id == id)
            .ok_or(GameError::UnknownInstance(id))?;

        let tile = self.hand.remove(pos);
        self.discarded.insert(0, tile);
        self.stats.turn_count += 1;
        self.last_drawn = None;
        self.last_action = format!("打出: {}", tile.tile);
        Ok(tile)
    }

    /// 理牌（任何階段皆可）
    pub fn manual_sort(&mut self) {
        self.hand = sort_hand(&self.hand, self.wildcard.as_ref());
        self.last_action = "理牌完成".to_string();
    }

    /// 宣告胡牌：只寫入紀錄，不動牌牆/手牌/牌河
    pub fn declare_win(&mut self, ledger: &mut HistoryLedger) -> HistoryRecord {
        let record = ledger.record(self.stats.turn_count);
        self.last_action = format!("胡牌！本次耗時 {} 輪", record.turn_count);
        log::info!("win declared after {} turns", record.turn_count);
        record
    }

    /// 套用自定義牌型，重建牌牆，輪數重置為 1
    ///
    /// 驗證失敗時狀態不變。牌河保留。
    pub fn apply_custom_hand(&mut self, chosen: &[TileType]) -> Result<(), GameError> {
        let composed = compose(chosen, self.wildcard.as_ref(), &mut self.ids, &mut self.rng)?;

        self.hand = composed.hand;
        self.deck = composed.deck;
        self.stats = SessionStats::default();
        self.last_drawn = None;
        self.exhausted = false;
        self.last_action = "已套用自定義牌型".to_string();

        log::info!("custom hand applied with {} tiles", self.hand.len());
        Ok(())
    }
}

// ============================================================================
// 單元測試
// ============================================================================
