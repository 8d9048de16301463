//! Behavior that spans the core crate and the server's AI plumbing.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use sheti_core::audio::{
    BROWSER_TTS_SIGNAL, BUSY_MESSAGE, PlaybackPlan, encode_pcm16_base64, pcm_data_uri,
};
use sheti_core::i18n::{keys, translate};
use sheti_core::{Cart, Catalog, Language, Money, Order, OrderError, ShippingInfo, Task, TaskSummary};
use sheti_server::ai::retry::{RetryPolicy, with_retry};
use sheti_server::ai::{AiError, FailureKind, ProviderKind};

fn fast_retries(max_retries: usize) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        min_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
    }
}

#[test]
fn every_key_resolves_in_every_language() {
    for key in keys() {
        for lang in Language::ALL {
            let text = translate(lang, key);
            assert_ne!(text, key, "{key} has no {lang:?} text");
            assert!(!text.trim().is_empty());
        }
    }
    assert_eq!(translate(Language::Hi, "no.such.key"), "no.such.key");
}

#[test]
fn cart_totals_follow_the_catalog_prices() {
    let catalog = Catalog::seeded();
    let products = catalog.products(Language::Mr);
    let mut cart = Cart::new();

    cart.add(products[0].clone());
    cart.add(products[0].clone());
    cart.add(products[2].clone());

    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), products[0].price.times(2) + products[2].price);

    assert!(cart.set_quantity(products[0].id, -5));
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total(), products[2].price);
    assert!(!cart.remove(products[0].id));
}

#[test]
fn checkout_totals_match_the_cart() {
    let catalog = Catalog::seeded();
    let mut cart = Cart::new();
    for product in catalog.products(Language::En) {
        cart.add(product.clone());
    }
    let shipping = ShippingInfo {
        name: "Ramesh Jadhav".to_string(),
        address: "Gat No. 44".to_string(),
        city: "Satara".to_string(),
        pincode: "415001".to_string(),
    };
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 9, 30, 0).unwrap();

    let order = Order::place(&cart, &shipping, "farmer-7", now).unwrap();
    assert_eq!(order.total, cart.total());
    assert!(order.total > Money::zero());

    let empty = Order::place(&Cart::new(), &shipping, "farmer-7", now);
    assert!(matches!(empty, Err(OrderError::EmptyCart)));
}

#[test]
fn dashboard_counts_only_pending_tasks() {
    let now = Utc.with_ymd_and_hms(2026, 6, 10, 6, 0, 0).unwrap();
    let today = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();

    let mut tasks = vec![
        Task::new("Spray neem oil", NaiveDate::from_ymd_opt(2026, 6, 9), "u1", now).unwrap(),
        Task::new("Irrigate plot B", Some(today), "u1", now).unwrap(),
        Task::new("Order seeds", None, "u1", now).unwrap(),
    ];
    tasks[2].toggle();

    assert!(tasks[0].is_overdue(today));
    assert!(!tasks[1].is_overdue(today));
    assert!(!tasks[2].is_overdue(today));

    let summary = TaskSummary::from_tasks(&tasks);
    assert_eq!(summary.pending_count, 2);
    assert!(summary.upcoming.iter().all(|t| !t.is_completed));
}

#[tokio::test]
async fn quota_errors_are_retried_until_success() {
    let calls = AtomicUsize::new(0);

    let result = with_retry(&fast_retries(3), || async {
        if calls.fetch_add(1, Ordering::SeqCst) < 2 {
            Err(AiError::RateLimited {
                provider: ProviderKind::Gemini,
                retry_after: None,
            })
        } else {
            Ok("answer")
        }
    })
    .await;

    assert_eq!(result.unwrap(), "answer");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_surface_a_quota_message() {
    let calls = AtomicUsize::new(0);

    let err = with_retry(&fast_retries(2), || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err::<(), _>(AiError::RateLimited {
            provider: ProviderKind::OpenRouter,
            retry_after: Some(30),
        })
    })
    .await
    .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(err.failure_kind(), FailureKind::Quota);
    assert_eq!(
        err.user_message(Language::Mr),
        translate(Language::Mr, "errors.serviceLimit")
    );
}

#[tokio::test]
async fn permanent_errors_are_not_retried() {
    let calls = AtomicUsize::new(0);

    let result = with_retry(&fast_retries(3), || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err::<(), _>(AiError::InvalidApiKey {
            provider: ProviderKind::Gemini,
        })
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn synthesized_speech_plays_back_as_pcm() {
    // Two seconds of silence is far longer than any prose heuristic threshold
    let samples = vec![0i16; 48_000];
    let uri = pcm_data_uri(&encode_pcm16_base64(&samples));

    match PlaybackPlan::for_input(&uri) {
        PlaybackPlan::Pcm(buffer) => {
            assert_eq!(buffer.frames(), samples.len());
            assert!((buffer.duration_secs() - 2.0).abs() < 1e-9);
        }
        other => panic!("expected PCM, got {other:?}"),
    }

    assert_eq!(
        PlaybackPlan::for_input(BROWSER_TTS_SIGNAL),
        PlaybackPlan::Speak(BUSY_MESSAGE.to_string())
    );
    assert_eq!(PlaybackPlan::for_input(""), PlaybackPlan::Nothing);
}
