//! 麻將單人牌效練習核心
//!
//! - `game`: 牌種、牌牆、理牌、自定義牌型、胡牌紀錄（純邏輯）
//! - `service`: 回合狀態機與牌桌 actor

pub mod game;
pub mod service;
