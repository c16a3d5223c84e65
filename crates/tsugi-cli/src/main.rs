use std::sync::Arc;

use tokio::time::{Duration, sleep};
use tracing::info;

use tsugi_core::impls::{ChannelEventSink, HttpRemoteApi, JsonFileCache};
use tsugi_core::{AppBuilder, BulkAction, Filter, SessionMode};

/// 配線デモ: HTTP バックエンド + ファイルキャッシュで一連の操作を流す。
/// バックエンドが落ちていてもオフラインに降格して最後まで動く。
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // (A) ports を用意（ベース URL は TSUGI_API_URL、無ければローカル開発用）
    let remote = Arc::new(HttpRemoteApi::from_env());
    let cache = Arc::new(JsonFileCache::at_default_path());
    let (events, mut event_rx) = ChannelEventSink::new();

    println!("remote: {}", remote.base_url());
    println!("cache:  {}", cache.path().display());

    let app = AppBuilder::new()
        .remote(remote)
        .cache(cache)
        .events(Arc::new(events))
        .build()
        .expect("remote and cache are wired above");

    // (B) 表示層の代わり: 表面化したイベントをそのまま印字する
    let event_printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            println!("[event] {event:?}");
        }
    });

    // (C) 接続確認してロード（不達ならキャッシュから、オフラインで続行）
    let mode = app.initialize().await;
    info!(?mode, "session initialized");
    match mode {
        SessionMode::Online => println!("connected to server"),
        SessionMode::Offline => println!("working offline - changes saved locally"),
    }

    // (D) ひととおりの操作
    for name in ["buy milk", "write report", "call home"] {
        match app.create(name).await {
            Ok(record) => println!("created {}: {}", record.id, record.name),
            Err(err) => println!("rejected {name:?}: {err}"),
        }
    }
    // 重複は弾かれる
    if let Err(err) = app.create("BUY MILK").await {
        println!("rejected duplicate: {err}");
    }

    let todos = app.filtered(Filter::All).await;
    if let Some(first) = todos.first() {
        if let Some(record) = app.toggle(first.id).await {
            println!("toggled {}: completed={}", record.id, record.completed);
        }
        if let Some(record) = app.rename(first.id, "buy milk and eggs").await {
            println!("renamed {}: {}", record.id, record.name);
        }
    }

    // debounce 窓（既定 500ms）が明けるのを待ってから様子を見る
    sleep(Duration::from_millis(700)).await;

    let counts = app.counts().await;
    println!(
        "todos: total={} active={} completed={}",
        counts.total, counts.active, counts.completed
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&app.filtered(Filter::All).await).expect("records serialize")
    );

    // (E) bulk は二段階: intent を見せてから無条件適用
    let intent = app.bulk_preview(BulkAction::DeleteCompleted).await;
    println!("confirm: {}", intent.description);
    let outcome = app.apply_bulk(BulkAction::DeleteCompleted).await;
    println!("deleted {} completed todos", outcome.removed.len());

    // (F) 待機中の debounce を流し切ってから終わる
    app.shutdown().await;
    drop(app);
    event_printer.abort();
}
