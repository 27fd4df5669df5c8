//! 終端機練習介面
//!
//! 從標準輸入讀取指令，呼叫牌桌 actor 並印出狀態。

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;

use mahjong_trainer::game::{TileId, TileType, AUTO_DRAW_DELAY_MS};
use mahjong_trainer::service::{
    history_to_json, EventSource, Snapshot, Table, TableConfig, TableError, TableHandle,
};

#[derive(Parser, Debug)]
#[command(name = "mahjong-trainer", about = "Single-player mahjong draw/discard practice")]
struct Args {
    /// RNG seed for reproducible deals.
    #[arg(long)]
    seed: Option<u64>,

    /// Delay before the automatic draw after a discard, in milliseconds.
    #[arg(long, default_value_t = AUTO_DRAW_DELAY_MS)]
    auto_draw_ms: u64,

    /// Print snapshots as JSON.
    #[arg(long)]
    json: bool,
}

const HELP: &str = "\
指令:
  show                 顯示目前狀態
  d <id> | discard <id> 打出指定牌
  draw                 手動摸牌
  sort                 理牌
  copy                 輸出手牌文字
  win                  記錄胡牌
  edit                 暫停自動摸牌（準備自定義）
  custom <牌...>       套用自定義牌型，例如: custom 1m 1m 2p 中
  resume               恢復自動摸牌
  history              近期胡牌紀錄
  new                  新局
  quit                 離開";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = TableConfig {
        seed: args.seed,
        auto_draw_delay: Duration::from_millis(args.auto_draw_ms),
        ..TableConfig::default()
    };
    let (table, mut events) = Table::spawn(config);

    // 延時摸牌的結果另外印出
    let json = args.json;
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            if event.source == EventSource::AutoDraw {
                print_snapshot(&event.snapshot, json);
            }
        }
    });

    println!("麻將牌效訓練器（輸入 help 查看指令）");
    print_snapshot(&table.snapshot().await?, json);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();

        match run_command(&table, cmd, &rest, json).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("錯誤: {:#}", err),
        }
    }

    Ok(())
}

/// 執行一條指令；返回 false 表示離開
async fn run_command(table: &TableHandle, cmd: &str, args: &[&str], json: bool) -> Result<bool> {
    let snapshot = match cmd {
        "quit" | "exit" | "q" => return Ok(false),
        "help" | "?" => {
            println!("{}", HELP);
            return Ok(true);
        }
        "show" => table.snapshot().await?,
        "new" => table.new_game().await?,
        "draw" => table.draw().await?,
        "sort" => table.manual_sort().await?,
        "d" | "discard" => {
            let id: TileId = args
                .first()
                .context("missing tile id")?
                .parse()
                .context("invalid tile id")?;
            table.discard(id).await?
        }
        "copy" => {
            println!("{}", table.snapshot().await?.hand_text());
            return Ok(true);
        }
        "win" => {
            let (snapshot, record) = table.declare_win().await?;
            log::debug!("recorded win #{}", record.id);
            snapshot
        }
        "edit" => table.hold_auto_draw().await?,
        "resume" => table.resume_auto_draw().await?,
        "custom" => {
            let chosen = args
                .iter()
                .map(|s| s.parse::<TileType>())
                .collect::<Result<Vec<_>, _>>()?;
            match table.apply_custom_hand(chosen).await {
                Ok(snapshot) => snapshot,
                Err(TableError::Game(err)) => {
                    println!("無法套用: {}", err);
                    return Ok(true);
                }
                Err(err) => return Err(err.into()),
            }
        }
        "history" => {
            let records = table.history().await?;
            if json {
                println!("{}", history_to_json(&records));
            } else if records.is_empty() {
                println!("暫無胡牌紀錄");
            } else {
                for record in &records {
                    println!("{}  {} 輪", record.time_of_day(), record.turn_count);
                }
            }
            return Ok(true);
        }
        other => {
            println!("未知指令: {}（輸入 help 查看指令）", other);
            return Ok(true);
        }
    };

    print_snapshot(&snapshot, json);
    Ok(true)
}

fn print_snapshot(snapshot: &Snapshot, json: bool) {
    if json {
        println!("{}", snapshot.to_json());
        return;
    }

    let wildcard = snapshot
        .wildcard
        .map(|w| w.name())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "輪數: {} | 剩餘牌山: {} | 癩子: {}",
        snapshot.turn_count, snapshot.deck_len, wildcard
    );
    println!("最新動態: {}", snapshot.last_action);

    let tiles: Vec<String> = snapshot
        .hand
        .iter()
        .map(|t| {
            let mark = if snapshot.last_drawn == Some(t.id) { "*" } else { "" };
            format!("{}{}{}", mark, t.tile, t.id)
        })
        .collect();
    println!("手牌: {}", tiles.join(" "));

    if !snapshot.discarded.is_empty() {
        let pile: Vec<String> = snapshot.discarded.iter().take(24).map(|t| t.tile.name()).collect();
        println!("牌河: {}", pile.join(" "));
    }
}
