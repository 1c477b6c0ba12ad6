//! Integration tests for the full announcement pipeline.
//!
//! These tests verify the complete data flows:
//! - Raw reading → Gatekeeper → Reverse Geocoder → Address Cache
//! - Address change → field callbacks → Notification Queue
//! - Light updates served from the address cache without a network call
//! - Failure containment (a failed lookup never breaks the pipeline)
//!
//! Run with: `cargo test --test pipeline_integration`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};

use guia::config::ConfigFile;
use guia::geocoder::{GeocodeClient, GeocodeError};
use guia::notify::QueueEvent;
use guia::position::RawPosition;
use guia::service::GuiaService;

// ============================================================================
// Test Helpers
// ============================================================================

/// Test coordinates: Praça da Sé, São Paulo.
const SE_LAT: f64 = -23.5505;
const SE_LON: f64 = -46.6333;

/// Test coordinates: a few blocks away (several hundred meters).
const PAULISTA_LAT: f64 = -23.5613;
const PAULISTA_LON: f64 = -46.6565;

/// Shared state behind a scripted client: the queued responses and a
/// lookup counter.
struct ScriptedState {
    responses: Mutex<VecDeque<Result<Value, GeocodeError>>>,
    calls: AtomicUsize,
}

/// Scripted geocoding client: pops one response per lookup and counts
/// the lookups it served. Cloning yields another handle to the same
/// shared state, so a test can keep one handle to inspect `calls()`
/// after handing a clone to the service.
#[derive(Clone)]
struct ScriptedClient {
    state: Arc<ScriptedState>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<Value, GeocodeError>>) -> Self {
        Self {
            state: Arc::new(ScriptedState {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }
}

impl GeocodeClient for ScriptedClient {
    async fn reverse(&self, _lat: f64, _lon: f64) -> Result<Value, GeocodeError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedClient ran out of responses")
    }
}

fn resolved(city: &str, suburb: &str) -> Result<Value, GeocodeError> {
    Ok(json!({
        "display_name": format!("{}, {}", suburb, city),
        "address": { "city": city, "suburb": suburb }
    }))
}

/// Let spawned resolution tasks run to completion.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// ============================================================================
// End-to-end scenario
// ============================================================================

/// The canonical three-reading walk:
///
/// 1. First fix resolves and establishes the baseline - nothing to
///    announce.
/// 2. A same-place reading five seconds later is a light update served
///    from the cache - no network call, nothing to announce.
/// 3. A reading sixty seconds later is a full update; the neighborhood
///    resolved differently, so exactly one announcement is queued.
#[tokio::test]
async fn test_three_reading_walk() {
    let client = ScriptedClient::new(vec![
        resolved("São Paulo", "Bela Vista"),
        resolved("São Paulo", "Centro"),
    ]);
    let service = GuiaService::with_client(&ConfigFile::default(), client.clone());

    // Reading 1: baseline.
    service
        .submit(&RawPosition::new(SE_LAT, SE_LON, 10.0, 0))
        .unwrap();
    settle().await;

    assert_eq!(client.calls(), 1);
    let current = service.address_cache().current().expect("Baseline stored");
    assert_eq!(
        current.standardized.neighborhood.as_deref(),
        Some("Bela Vista")
    );
    assert!(
        service.peek_announcement().is_none(),
        "Baseline must not announce"
    );

    // Reading 2: same place, 5 s later. Light update, cache hit.
    service
        .submit(&RawPosition::new(SE_LAT, SE_LON, 10.0, 5_000))
        .unwrap();
    settle().await;

    assert_eq!(client.calls(), 1, "Light update must not hit the network");
    assert!(service.peek_announcement().is_none());

    // Reading 3: 60 s later. Full update, neighborhood changed.
    service
        .submit(&RawPosition::new(SE_LAT, SE_LON, 10.0, 65_000))
        .unwrap();
    settle().await;

    assert_eq!(client.calls(), 2);
    let announcement = service.next_announcement().expect("Change must announce");
    assert_eq!(announcement.text, "Você entrou no bairro Centro");
    assert_eq!(announcement.priority, 2);
    assert!(service.next_announcement().is_none());
}

// ============================================================================
// Priority ordering at the consumer boundary
// ============================================================================

#[tokio::test]
async fn test_municipality_outranks_neighborhood_and_street() {
    let client = ScriptedClient::new(vec![
        Ok(json!({ "address": {
            "city": "Serro", "suburb": "Milho Verde", "road": "Rua Direita"
        }})),
        Ok(json!({ "address": {
            "city": "Diamantina", "suburb": "Centro", "road": "Rua do Carmo"
        }})),
    ]);
    let service = GuiaService::with_client(&ConfigFile::default(), client);

    service
        .submit(&RawPosition::new(-18.6047, -43.3797, 10.0, 0))
        .unwrap();
    settle().await;

    // Drive far enough for a full update.
    service
        .submit(&RawPosition::new(-18.2494, -43.6005, 10.0, 40_000))
        .unwrap();
    settle().await;

    let texts: Vec<String> = std::iter::from_fn(|| service.next_announcement())
        .map(|a| a.text)
        .collect();
    assert_eq!(
        texts,
        vec![
            "Você entrou em Diamantina",
            "Você entrou no bairro Centro",
            "Você está na Rua do Carmo",
        ]
    );
}

// ============================================================================
// Failure containment
// ============================================================================

#[tokio::test]
async fn test_failed_lookup_does_not_break_the_pipeline() {
    let client = ScriptedClient::new(vec![
        Err(GeocodeError::Http("connection refused".to_string())),
        resolved("São Paulo", "Bela Vista"),
    ]);
    let service = GuiaService::with_client(&ConfigFile::default(), client.clone());

    // First reading fails to resolve: no snapshot, no announcement.
    service
        .submit(&RawPosition::new(SE_LAT, SE_LON, 10.0, 0))
        .unwrap();
    settle().await;
    assert!(service.address_cache().current().is_none());
    assert!(service.peek_announcement().is_none());

    // The pipeline keeps working afterwards.
    service
        .submit(&RawPosition::new(PAULISTA_LAT, PAULISTA_LON, 10.0, 5_000))
        .unwrap();
    settle().await;

    assert_eq!(client.calls(), 2);
    assert!(service.address_cache().current().is_some());
}

// ============================================================================
// Queue events at the consumer boundary
// ============================================================================

#[tokio::test]
async fn test_queue_events_track_announcements() {
    let client = ScriptedClient::new(vec![
        resolved("São Paulo", "Bela Vista"),
        resolved("São Paulo", "Centro"),
    ]);
    let service = GuiaService::with_client(&ConfigFile::default(), client);

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    service.queue().subscribe_fn(move |event: &QueueEvent| {
        let label = match event {
            QueueEvent::Enqueued(a) => format!("enqueued:{}", a.priority),
            QueueEvent::Dequeued(a) => format!("dequeued:{}", a.priority),
            QueueEvent::Cleared { .. } => "cleared".to_string(),
        };
        events_clone.lock().unwrap().push(label);
    });

    service
        .submit(&RawPosition::new(SE_LAT, SE_LON, 10.0, 0))
        .unwrap();
    settle().await;
    service
        .submit(&RawPosition::new(PAULISTA_LAT, PAULISTA_LON, 10.0, 5_000))
        .unwrap();
    settle().await;

    service.next_announcement().unwrap();

    assert_eq!(
        events.lock().unwrap().as_slice(),
        &["enqueued:2", "dequeued:2"]
    );
}

// ============================================================================
// Accuracy flagging end to end
// ============================================================================

#[tokio::test]
async fn test_poor_accuracy_flagged_but_still_resolved() {
    let client = ScriptedClient::new(vec![resolved("São Paulo", "Bela Vista")]);
    let service = GuiaService::with_client(&ConfigFile::default(), client.clone());

    let event = service
        .submit(&RawPosition::new(SE_LAT, SE_LON, 800.0, 0))
        .unwrap();
    match event {
        guia::gatekeeper::PositionEvent::FullUpdate { accuracy_error, .. } => {
            assert!(accuracy_error.is_some());
        }
        other => panic!("Expected FullUpdate, got {:?}", other),
    }

    settle().await;
    assert_eq!(client.calls(), 1, "Flagged reading still resolves");
}
