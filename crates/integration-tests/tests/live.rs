//! Tests against the real Open-Meteo and generation APIs.
//!
//! These need network access and provider keys in the environment
//! (`GEMINI_API_KEYS` and/or `OPENROUTER_API_KEY`), so they only run with:
//!
//! ```bash
//! cargo test -p sheti-integration-tests --test live -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use sheti_core::Language;
use sheti_core::audio::{PlaybackPlan, pcm_data_uri};
use sheti_server::ai::Assistant;
use sheti_server::ai::retry::RetryPolicy;
use sheti_server::config::AiConfig;
use sheti_server::services::WeatherService;

// Pune
const LAT: f64 = 18.5204;
const LNG: f64 = 73.8567;

fn assistant() -> Assistant {
    let config = AiConfig::from_env().expect("set GEMINI_API_KEYS or OPENROUTER_API_KEY");
    Assistant::from_config(&config).unwrap()
}

#[tokio::test]
#[ignore = "calls api.open-meteo.com"]
async fn open_meteo_reports_current_conditions() {
    let offline = Assistant::new(Vec::new(), RetryPolicy::default());
    let weather = WeatherService::new(offline, Duration::from_secs(20)).unwrap();
    let conditions = weather.fetch(LAT, LNG).await.unwrap();

    assert!((-20.0..=60.0).contains(&conditions.temperature));
    assert!((0.0..=100.0).contains(&conditions.humidity));
}

#[tokio::test]
#[ignore = "calls Open-Meteo and a generation provider"]
async fn weather_card_is_localized() {
    let weather = WeatherService::new(assistant(), Duration::from_secs(20)).unwrap();
    let card = weather.current(LAT, LNG, Language::Mr).await.unwrap();

    assert!(!card.condition.is_empty());
    assert!(!card.recommendation.is_empty());
}

#[tokio::test]
#[ignore = "calls a generation provider"]
async fn chat_answers_in_hindi() {
    let reply = assistant()
        .chat(&[], "गेहूं की बुवाई कब करें?", Language::Hi)
        .await
        .unwrap();

    // Devanagari block
    assert!(reply.text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)));
}

#[tokio::test]
#[ignore = "calls Gemini text-to-speech"]
async fn speech_is_playable_pcm() {
    let Some(pcm) = assistant()
        .text_to_speech("Water the seedlings early in the morning.")
        .await
        .unwrap()
    else {
        return;
    };

    assert!(matches!(
        PlaybackPlan::for_input(&pcm_data_uri(&pcm)),
        PlaybackPlan::Pcm(_)
    ));
}
