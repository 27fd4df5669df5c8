//! 可觀測狀態
//!
//! 每個狀態轉移後返回給顯示層的快照，以及手牌的文字/JSON 匯出。

use serde_json::{json, Value};

use crate::game::{
    sort_hand, HistoryRecord, TileId, TileInstance, TileType, WILDCARD_MARK,
};

use super::session::{Phase, Session};

/// 狀態快照
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub hand: Vec<TileInstance>,
    pub deck_len: usize,
    pub discarded: Vec<TileInstance>,
    pub wildcard: Option<TileType>,
    pub turn_count: u32,
    pub phase: Option<Phase>,
    pub last_action: String,
    pub last_drawn: Option<TileId>,
    pub exhausted: bool,
}

impl Session {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            hand: self.hand.clone(),
            deck_len: self.deck.len(),
            discarded: self.discarded.clone(),
            wildcard: self.wildcard,
            turn_count: self.stats.turn_count,
            phase: self.phase(),
            last_action: self.last_action.clone(),
            last_drawn: self.last_drawn,
            exhausted: self.exhausted,
        }
    }
}

impl Snapshot {
    /// 手牌文字（供複製）
    pub fn hand_text(&self) -> String {
        hand_to_text(&self.hand, self.wildcard.as_ref())
    }

    /// JSON 匯出
    pub fn to_json(&self) -> Value {
        let tiles = |tiles: &[TileInstance]| -> Vec<Value> {
            tiles
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id.value(),
                        "name": t.tile.name(),
                        "wild": t.is_wild(self.wildcard.as_ref()),
                    })
                })
                .collect()
        };

        json!({
            "hand": tiles(&self.hand),
            "deck_len": self.deck_len,
            "discarded": tiles(&self.discarded),
            "wildcard": self.wildcard.map(|w| w.name()),
            "turn_count": self.turn_count,
            "phase": self.phase.map(|p| p.name()),
            "last_action": self.last_action,
            "last_drawn": self.last_drawn.map(|id| id.value()),
            "exhausted": self.exhausted,
        })
    }
}

/// 手牌轉文字：按理牌順序，癩子加註
///
/// 純函數，不修改手牌。
pub fn hand_to_text(hand: &[TileInstance], wildcard: Option<&TileType>) -> String {
    sort_hand(hand, wildcard)
        .iter()
        .map(|t| {
            if t.is_wild(wildcard) {
                format!("{}{}", t.tile, WILDCARD_MARK)
            } else {
                t.tile.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 胡牌紀錄 JSON
pub fn history_to_json(records: &[HistoryRecord]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "time": r.time_of_day(),
                    "timestamp_ms": r.unix_millis() as u64,
                    "turn_count": r.turn_count,
                })
            })
            .collect(),
    )
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{HistoryLedger, TileIds};

    #[test]
    fn test_hand_text_marks_wildcard() {
        let mut ids = TileIds::new();
        let hand: Vec<_> = ["9s", "5p", "1m", "5p", "中"]
            .iter()
            .map(|n| ids.mint(n.parse().unwrap()))
            .collect();
        let wild: TileType = "5p".parse().unwrap();

        assert_eq!(
            hand_to_text(&hand, Some(&wild)),
            "5筒(癩) 5筒(癩) 1萬 9條 中"
        );
        assert_eq!(hand_to_text(&hand, None), "1萬 5筒 5筒 9條 中");
        assert_eq!(hand_to_text(&[], None), "");
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let session = Session::start(31);
        let snap = session.snapshot();
        assert_eq!(snap.hand.len(), 14);
        assert_eq!(snap.deck_len, 106);
        assert_eq!(snap.phase, Some(Phase::AwaitingDiscard));
        assert_eq!(snap.turn_count, 1);
        assert_eq!(snap.wildcard, session.wildcard());
        assert_eq!(snap.hand_text().split(' ').count(), 14);
    }

    #[test]
    fn test_snapshot_json_fields() {
        let session = Session::start(31);
        let value = session.snapshot().to_json();
        assert_eq!(value["hand"].as_array().unwrap().len(), 14);
        assert_eq!(value["deck_len"], 106);
        assert_eq!(value["turn_count"], 1);
        assert_eq!(value["phase"], "awaiting_discard");
        assert_eq!(value["exhausted"], false);
        assert_eq!(
            value["wildcard"],
            session.wildcard().map(|w| w.name()).unwrap()
        );
    }

    #[test]
    fn test_history_json() {
        let mut ledger = HistoryLedger::new();
        ledger.record(4);
        ledger.record(8);
        let value = history_to_json(&ledger.all());
        assert_eq!(value[0]["turn_count"], 8);
        assert_eq!(value[1]["turn_count"], 4);
    }
}
