use std::time::Duration;

use hand_exchange::{
    core::engine::ExchangeEngine,
    rates::{ExchangeRate, RateTable},
    resource::ResourceAlloc,
    runtime::{
        events::ExchangeEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_exchange},
    },
    types::Modifier,
};

async fn next_event(sub: &mut tokio::sync::broadcast::Receiver<ExchangeEvent>) -> ExchangeEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event")
        .expect("recv")
}

#[tokio::test]
async fn runtime_solve_modifier_and_events_ordered() {
    let handle = spawn_exchange(ExchangeEngine::default(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let hand = ResourceAlloc::shells(3);
    let best = handle.best(hand).await.expect("best");
    assert_eq!(best.value, 5);
    assert_eq!(best.legs, vec![hand]);

    assert!(handle.set_shell_modifier(true).await.expect("toggle"));
    assert!(!handle.set_shell_modifier(true).await.expect("toggle"));
    assert_eq!(handle.best(hand).await.expect("best").value, 8);

    assert_eq!(
        next_event(&mut sub).await,
        ExchangeEvent::Solved {
            fingerprint: hand.fingerprint(),
            candidates: 2,
        }
    );
    assert_eq!(
        next_event(&mut sub).await,
        ExchangeEvent::ModifierChanged {
            modifier: Modifier::Shell,
            enabled: true,
        }
    );
    assert_eq!(next_event(&mut sub).await, ExchangeEvent::CacheInvalidated);
    assert!(matches!(next_event(&mut sub).await, ExchangeEvent::Solved { .. }));

    let table = handle.rate_table().await.expect("rate table");
    assert_eq!(table.get(r#"{"s":3}"#), Some(&8));

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn runtime_reports_missing_decomposition_distinctly() {
    let table = RateTable::new(vec![ExchangeRate::new(ResourceAlloc::shells(2), 3)]).expect("table");
    let handle = spawn_exchange(ExchangeEngine::new(table), RuntimeConfig::default());

    let hand = ResourceAlloc::shells(3);
    assert!(handle.solve(hand).await.expect("solve").is_empty());
    match handle.best(hand).await {
        Err(RuntimeError::NoDecomposition { hand: reported }) => assert_eq!(reported, hand),
        other => panic!("expected NoDecomposition, got {other:?}"),
    }

    assert_eq!(handle.best(ResourceAlloc::shells(4)).await.expect("best").value, 6);

    handle.shutdown().await.expect("shutdown");
    assert!(matches!(
        handle.solve(hand).await,
        Err(RuntimeError::ChannelClosed)
    ));
}

#[tokio::test]
async fn concurrent_callers_share_one_cache() {
    let handle = spawn_exchange(ExchangeEngine::default(), RuntimeConfig::default());
    let hand = ResourceAlloc::new(2, 2, 2, 2);

    assert_eq!(handle.best(hand).await.expect("best").value, 24);
    let before = handle.cache_stats().await.expect("stats");

    let mut tasks = Vec::new();
    for _ in 0..7 {
        let h = handle.clone();
        tasks.push(tokio::spawn(async move {
            h.best(hand).await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.expect("join").expect("best").value, 24);
    }

    let stats = handle.cache_stats().await.expect("stats");
    assert_eq!(stats.hits, before.hits + 7);
    assert_eq!(stats.misses, before.misses);

    handle.invalidate_cache().await.expect("invalidate");
    let stats = handle.cache_stats().await.expect("stats");
    assert_eq!(stats.entries, 0);
    assert_eq!(stats.invalidations, 1);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(flavor = "current_thread")]
async fn queued_toggle_waits_for_inline_solve() {
    let handle = spawn_exchange(ExchangeEngine::default(), RuntimeConfig::default());
    let hand = ResourceAlloc::new(4, 4, 4, 4);

    let (best, changed) = tokio::join!(handle.best(hand), handle.set_shell_modifier(true));
    assert_eq!(best.expect("best").value, 50);
    assert!(changed.expect("toggle"));

    let stats = handle.cache_stats().await.expect("stats");
    assert_eq!(stats.invalidations, 1);
    assert_eq!(stats.entries, 0);

    handle.shutdown().await.expect("shutdown");
}
