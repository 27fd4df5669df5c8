//! 胡牌紀錄
//!
//! 只保留最近 `HISTORY_LIMIT` 筆，新的在前。行程內有效，不落地。

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use super::constants::HISTORY_LIMIT;

/// 單筆胡牌紀錄（建立後不可變）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: u64,
    pub timestamp: SystemTime,
    pub turn_count: u32,
}

impl HistoryRecord {
    /// Unix 毫秒時間戳
    pub fn unix_millis(&self) -> u128 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }

    /// UTC 時刻 HH:MM:SS
    pub fn time_of_day(&self) -> String {
        let secs = (self.unix_millis() / 1000) as u64 % 86_400;
        format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
    }
}

/// 胡牌紀錄簿
#[derive(Clone, Debug)]
pub struct HistoryLedger {
    records: VecDeque<HistoryRecord>,
    next_id: u64,
    limit: usize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit + 1),
            next_id: 1,
            limit,
        }
    }

    /// 記錄一次胡牌（現在時間）
    pub fn record(&mut self, turn_count: u32) -> HistoryRecord {
        self.record_at(turn_count, SystemTime::now())
    }

    /// 記錄一次胡牌（指定時間）
    ///
    /// 新紀錄放最前，超過上限時丟棄最舊的。
    pub fn record_at(&mut self, turn_count: u32, timestamp: SystemTime) -> HistoryRecord {
        let entry = HistoryRecord {
            id: self.next_id,
            timestamp,
            turn_count,
        };
        self.next_id += 1;

        self.records.push_front(entry.clone());
        self.records.truncate(self.limit);
        entry
    }

    /// 全部紀錄，新的在前
    pub fn all(&self) -> Vec<HistoryRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 最近一筆
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.front()
    }
}

// ============================================================================
// 單元測試
// ============================================================================
