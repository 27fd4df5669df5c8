//! 牌桌 actor
//!
//! 單一 tokio 任務獨佔 `Session` 與 `HistoryLedger`，所有操作經由
//! `TableHandle` 串行送入。打牌後的自動摸牌是可取消的延時任務：
//! 同一時間最多一個，新的排程會取消舊的；觸發時對「當下」的狀態摸牌。

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

use crate::game::{
    GameError, HistoryLedger, HistoryRecord, TileId, TileType, AUTO_DRAW_DELAY_MS, EVENT_BUFFER,
};

use super::session::Session;
use super::snapshot::Snapshot;

// ============================================================================
// 設定與錯誤
// ============================================================================

/// 牌桌設定
#[derive(Clone, Debug)]
pub struct TableConfig {
    /// 亂數種子；None 時隨機
    pub seed: Option<u64>,
    /// 打牌後自動摸牌的延遲
    pub auto_draw_delay: Duration,
    /// 事件通道容量
    pub event_buffer: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seed: None,
            auto_draw_delay: Duration::from_millis(AUTO_DRAW_DELAY_MS),
            event_buffer: EVENT_BUFFER,
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table is closed")]
    Closed,

    #[error(transparent)]
    Game(#[from] GameError),
}

// ============================================================================
// 事件
// ============================================================================

/// 狀態變化來源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventSource {
    /// 呼叫端的操作
    Command,
    /// 延時自動摸牌
    AutoDraw,
}

/// 狀態變化通知（包含延時摸牌造成的變化）
#[derive(Clone, Debug)]
pub struct TableEvent {
    pub source: EventSource,
    pub snapshot: Snapshot,
}

// ============================================================================
// 指令
// ============================================================================

type Reply<T> = oneshot::Sender<T>;

enum Command {
    NewGame(Reply<Snapshot>),
    Draw(Reply<Snapshot>),
    Discard(TileId, Reply<Snapshot>),
    Sort(Reply<Snapshot>),
    DeclareWin(Reply<(Snapshot, HistoryRecord)>),
    ApplyCustomHand(Vec<TileType>, Reply<Result<Snapshot, GameError>>),
    HoldAutoDraw(Reply<Snapshot>),
    ResumeAutoDraw(Reply<Snapshot>),
    Snapshot(Reply<Snapshot>),
    History(Reply<Vec<HistoryRecord>>),
    AutoDrawPending(Reply<bool>),
    /// 延時任務觸發（內部）
    AutoDrawFired(u64),
}

/// 已排程的自動摸牌
struct PendingDraw {
    generation: u64,
    task: JoinHandle<()>,
}

// ============================================================================
// Actor
// ============================================================================

pub struct Table {
    session: Session,
    ledger: HistoryLedger,
    config: TableConfig,

    pending: Option<PendingDraw>,
    generation: u64,

    commands: mpsc::WeakSender<Command>,
    events: mpsc::Sender<TableEvent>,
}

impl Table {
    /// 啟動牌桌（需在 tokio runtime 內呼叫），並立即開新局
    pub fn spawn(config: TableConfig) -> (TableHandle, ReceiverStream<TableEvent>) {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("table starting with seed {}", seed);

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer.max(1));

        let table = Table {
            session: Session::start(seed),
            ledger: HistoryLedger::new(),
            config,
            pending: None,
            generation: 0,
            commands: cmd_tx.downgrade(),
            events: event_tx,
        };
        tokio::spawn(table.run(cmd_rx));

        (TableHandle { tx: cmd_tx }, ReceiverStream::new(event_rx))
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(cmd) = rx.recv().await {
            self.handle(cmd);
        }
        self.cancel_auto_draw();
        log::debug!("table stopped");
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::NewGame(reply) => {
                self.cancel_auto_draw();
                self.session.new_game();
                self.reply_changed(reply);
            }
            Command::Draw(reply) => {
                self.cancel_auto_draw();
                self.draw(EventSource::Command);
                let _ = reply.send(self.session.snapshot());
            }
            Command::Discard(id, reply) => {
                match self.session.discard(id) {
                    Ok(_) => {
                        if self.session.wants_draw() {
                            self.schedule_auto_draw();
                        }
                        self.publish(EventSource::Command);
                    }
                    Err(err) => log::debug!("discard ignored: {}", err),
                }
                let _ = reply.send(self.session.snapshot());
            }
            Command::Sort(reply) => {
                self.session.manual_sort();
                self.reply_changed(reply);
            }
            Command::DeclareWin(reply) => {
                self.cancel_auto_draw();
                let record = self.session.declare_win(&mut self.ledger);
                self.publish(EventSource::Command);
                let _ = reply.send((self.session.snapshot(), record));
            }
            Command::ApplyCustomHand(chosen, reply) => {
                self.cancel_auto_draw();
                let result = self.session.apply_custom_hand(&chosen).map(|()| {
                    if self.session.wants_draw() {
                        self.schedule_auto_draw();
                    }
                    self.publish(EventSource::Command);
                    self.session.snapshot()
                });
                if let Err(err) = &result {
                    log::warn!("custom hand rejected: {}", err);
                }
                let _ = reply.send(result);
            }
            Command::HoldAutoDraw(reply) => {
                self.cancel_auto_draw();
                let _ = reply.send(self.session.snapshot());
            }
            Command::ResumeAutoDraw(reply) => {
                if self.pending.is_none() && self.session.wants_draw() {
                    self.schedule_auto_draw();
                }
                let _ = reply.send(self.session.snapshot());
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::History(reply) => {
                let _ = reply.send(self.ledger.all());
            }
            Command::AutoDrawPending(reply) => {
                let _ = reply.send(self.pending.is_some());
            }
            Command::AutoDrawFired(generation) => self.on_auto_draw(generation),
        }
    }

    fn reply_changed(&mut self, reply: Reply<Snapshot>) {
        self.publish(EventSource::Command);
        let _ = reply.send(self.session.snapshot());
    }

    /// 摸牌；階段不符時忽略，摸空時只更新狀態訊息
    fn draw(&mut self, source: EventSource) {
        match self.session.draw() {
            Ok(_) => self.publish(source),
            Err(GameError::DeckExhausted) => self.publish(source),
            Err(err) => log::debug!("draw ignored: {}", err),
        }
    }

    // ========================================================================
    // 自動摸牌排程
    // ========================================================================

    fn schedule_auto_draw(&mut self) {
        self.cancel_auto_draw();

        let Some(tx) = self.commands.upgrade() else {
            return;
        };
        self.generation += 1;
        let generation = self.generation;
        let delay = self.config.auto_draw_delay;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Command::AutoDrawFired(generation)).await;
        });
        self.pending = Some(PendingDraw { generation, task });
    }

    fn cancel_auto_draw(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
            log::debug!("auto draw #{} cancelled", pending.generation);
        }
    }

    fn on_auto_draw(&mut self, generation: u64) {
        // 已取消或被取代的排程
        match &self.pending {
            Some(pending) if pending.generation == generation => self.pending = None,
            _ => {
                log::debug!("stale auto draw #{} dropped", generation);
                return;
            }
        }
        self.draw(EventSource::AutoDraw);
    }

    fn publish(&self, source: EventSource) {
        let event = TableEvent {
            source,
            snapshot: self.session.snapshot(),
        };
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => log::warn!("event buffer full, event dropped"),
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

// ============================================================================
// Handle
// ============================================================================

/// 牌桌操作入口（可複製）
#[derive(Clone)]
pub struct TableHandle {
    tx: mpsc::Sender<Command>,
}

impl TableHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, TableError> {
        let (tx, rx) = oneshot::channel();
        self.tx.send(make(tx)).await.map_err(|_| TableError::Closed)?;
        rx.await.map_err(|_| TableError::Closed)
    }

    pub async fn new_game(&self) -> Result<Snapshot, TableError> {
        self.request(Command::NewGame).await
    }

    pub async fn draw(&self) -> Result<Snapshot, TableError> {
        self.request(Command::Draw).await
    }

    pub async fn discard(&self, id: TileId) -> Result<Snapshot, TableError> {
        self.request(|reply| Command::Discard(id, reply)).await
    }

    pub async fn manual_sort(&self) -> Result<Snapshot, TableError> {
        self.request(Command::Sort).await
    }

    pub async fn declare_win(&self) -> Result<(Snapshot, HistoryRecord), TableError> {
        self.request(Command::DeclareWin).await
    }

    pub async fn apply_custom_hand(&self, chosen: Vec<TileType>) -> Result<Snapshot, TableError> {
        Ok(self
            .request(|reply| Command::ApplyCustomHand(chosen, reply))
            .await??)
    }

    /// 暫停自動摸牌（例如打開自定義牌型編輯器）
    pub async fn hold_auto_draw(&self) -> Result<Snapshot, TableError> {
        self.request(Command::HoldAutoDraw).await
    }

    /// 恢復自動摸牌（編輯器取消時）
    pub async fn resume_auto_draw(&self) -> Result<Snapshot, TableError> {
        self.request(Command::ResumeAutoDraw).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot, TableError> {
        self.request(Command::Snapshot).await
    }

    pub async fn history(&self) -> Result<Vec<HistoryRecord>, TableError> {
        self.request(Command::History).await
    }

    pub async fn auto_draw_pending(&self) -> Result<bool, TableError> {
        self.request(Command::AutoDrawPending).await
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DECK_SIZE, HAND_SIZE, HISTORY_LIMIT};
    use crate::service::Phase;
    use tokio::time::sleep;
    use tokio_stream::StreamExt;

    const DELAY: Duration = Duration::from_millis(AUTO_DRAW_DELAY_MS);

    fn config(seed: u64) -> TableConfig {
        TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        }
    }

    fn parse(names: &[&str]) -> Vec<TileType> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_table_starts_awaiting_discard() {
        let (table, _events) = Table::spawn(config(1));
        let snap = table.snapshot().await.unwrap();
        assert_eq!(snap.hand.len(), HAND_SIZE + 1);
        assert_eq!(snap.deck_len, DECK_SIZE - HAND_SIZE - 1);
        assert_eq!(snap.phase, Some(Phase::AwaitingDiscard));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_schedules_auto_draw() {
        let (table, _events) = Table::spawn(config(2));
        let snap = table.snapshot().await.unwrap();
        let tile = snap.hand[3];

        let after = table.discard(tile.id).await.unwrap();
        assert_eq!(after.hand.len(), HAND_SIZE);
        assert_eq!(after.discarded[0], tile);
        assert_eq!(after.turn_count, 2);
        assert!(table.auto_draw_pending().await.unwrap());

        // 延遲未到
        sleep(DELAY / 2).await;
        assert_eq!(table.snapshot().await.unwrap().hand.len(), HAND_SIZE);

        sleep(DELAY).await;
        let drawn = table.snapshot().await.unwrap();
        assert_eq!(drawn.hand.len(), HAND_SIZE + 1);
        assert_eq!(drawn.deck_len, after.deck_len - 1);
        assert_eq!(drawn.last_drawn, drawn.hand.last().map(|t| t.id));
        assert!(!table.auto_draw_pending().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_declare_win_cancels_auto_draw() {
        let (table, _events) = Table::spawn(config(3));
        let snap = table.snapshot().await.unwrap();
        table.discard(snap.hand[0].id).await.unwrap();

        let (after, record) = table.declare_win().await.unwrap();
        assert_eq!(record.turn_count, 2);
        assert_eq!(after.hand.len(), HAND_SIZE);
        assert!(!table.auto_draw_pending().await.unwrap());

        sleep(DELAY * 2).await;
        assert_eq!(table.snapshot().await.unwrap().hand.len(), HAND_SIZE);
        assert_eq!(table.history().await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hold_and_resume_auto_draw() {
        let (table, _events) = Table::spawn(config(4));
        let snap = table.snapshot().await.unwrap();
        table.discard(snap.hand[0].id).await.unwrap();

        table.hold_auto_draw().await.unwrap();
        sleep(DELAY * 2).await;
        assert_eq!(table.snapshot().await.unwrap().hand.len(), HAND_SIZE);

        table.resume_auto_draw().await.unwrap();
        sleep(DELAY * 2).await;
        assert_eq!(table.snapshot().await.unwrap().hand.len(), HAND_SIZE + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_draw_supersedes_timer() {
        let (table, _events) = Table::spawn(config(5));
        let snap = table.snapshot().await.unwrap();
        table.discard(snap.hand[0].id).await.unwrap();

        let drawn = table.draw().await.unwrap();
        assert_eq!(drawn.hand.len(), HAND_SIZE + 1);
        assert!(!table.auto_draw_pending().await.unwrap());

        sleep(DELAY * 2).await;
        let later = table.snapshot().await.unwrap();
        assert_eq!(later.hand.len(), HAND_SIZE + 1);
        assert_eq!(later.deck_len, drawn.deck_len);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stray_discard_is_ignored() {
        let (table, _events) = Table::spawn(config(6));
        let snap = table.snapshot().await.unwrap();
        table.discard(snap.hand[0].id).await.unwrap();

        // 等待摸牌階段再打一張：忽略
        let ignored = table.discard(snap.hand[1].id).await.unwrap();
        assert_eq!(ignored.hand.len(), HAND_SIZE);
        assert_eq!(ignored.turn_count, 2);
        assert_eq!(ignored.discarded.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_hand_of_thirteen_auto_draws() {
        let (table, _events) = Table::spawn(config(7));
        let chosen = parse(&[
            "1m", "1m", "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "9m", "9m",
        ]);

        let applied = table.apply_custom_hand(chosen).await.unwrap();
        assert_eq!(applied.hand.len(), HAND_SIZE);
        assert_eq!(applied.deck_len, DECK_SIZE - HAND_SIZE);
        assert_eq!(applied.turn_count, 1);
        assert!(table.auto_draw_pending().await.unwrap());

        sleep(DELAY * 2).await;
        let drawn = table.snapshot().await.unwrap();
        assert_eq!(drawn.hand.len(), HAND_SIZE + 1);
        assert_eq!(drawn.deck_len, DECK_SIZE - HAND_SIZE - 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_hand_of_fourteen_waits_for_discard() {
        let (table, _events) = Table::spawn(config(8));
        let chosen = parse(&[
            "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", "中", "中", "中", "白", "白",
        ]);

        let applied = table.apply_custom_hand(chosen).await.unwrap();
        assert_eq!(applied.phase, Some(Phase::AwaitingDiscard));
        assert!(!table.auto_draw_pending().await.unwrap());

        sleep(DELAY * 2).await;
        assert_eq!(table.snapshot().await.unwrap().hand.len(), 14);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_custom_hand_is_reported() {
        let (table, _events) = Table::spawn(config(9));
        let before = table.snapshot().await.unwrap();

        let err = table
            .apply_custom_hand(parse(&["9s", "9s", "9s", "9s", "9s"]))
            .await
            .unwrap_err();
        assert!(matches!(err, TableError::Game(GameError::TooManyCopies { .. })));
        assert_eq!(table.snapshot().await.unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_game_cancels_pending_draw() {
        let (table, _events) = Table::spawn(config(10));
        let snap = table.snapshot().await.unwrap();
        table.discard(snap.hand[0].id).await.unwrap();

        let fresh = table.new_game().await.unwrap();
        assert_eq!(fresh.turn_count, 1);
        assert!(fresh.discarded.is_empty());
        assert!(!table.auto_draw_pending().await.unwrap());

        sleep(DELAY * 2).await;
        assert_eq!(table.snapshot().await.unwrap(), fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_is_capped() {
        let (table, _events) = Table::spawn(config(11));
        for _ in 0..HISTORY_LIMIT + 3 {
            table.declare_win().await.unwrap();
        }
        let history = table.history().await.unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert!(history.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_include_auto_draw() {
        let (table, mut events) = Table::spawn(config(12));
        let snap = table.snapshot().await.unwrap();
        table.discard(snap.hand[0].id).await.unwrap();

        let discarded = events.next().await.unwrap();
        assert_eq!(discarded.source, EventSource::Command);
        assert_eq!(discarded.snapshot.hand.len(), HAND_SIZE);

        let drawn = events.next().await.unwrap();
        assert_eq!(drawn.source, EventSource::AutoDraw);
        assert_eq!(drawn.snapshot.hand.len(), HAND_SIZE + 1);
    }
}
