//! Tests for the win-item detail request.

use std::sync::Arc;

use courier::net::{
    FormRequestSender, NetworkError, OfflineTransport, RequestParams, Result, Transport,
    TransportRequest, TransportResponse,
};
use courier::requests::{WinItemDetailEvent, WinItemDetailRequest};
use courier::{EventBus, RequestScope};
use parking_lot::Mutex;

static_assertions::assert_impl_all!(WinItemDetailRequest: FormRequestSender, Send, Sync);

struct Canned(&'static str);

impl Transport for Canned {
    async fn send(&self, _request: TransportRequest, _scope: &RequestScope) -> Result<TransportResponse> {
        Ok(TransportResponse {
            status: 200,
            body: self.0.to_string(),
        })
    }
}

fn record(bus: &EventBus) -> (courier::Subscription, Arc<Mutex<Vec<WinItemDetailEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let sub = bus.subscribe(move |event: &WinItemDetailEvent| sink.lock().push(event.clone()));
    (sub, events)
}

#[tokio::test]
async fn test_detail_published() {
    let bus = EventBus::new();
    let (_sub, events) = record(&bus);
    let request = WinItemDetailRequest::with_transport(
        bus.clone(),
        Canned(r#"{"code":1,"msg":"ok","data":{"goods_name":"Phone","winner":{"nick_name":"lucky9","join_count":3}}}"#),
    );

    request
        .send_request(
            RequestParams::new().with("period_id", "88"),
            "https://api.example.com/winner/detail",
            &RequestScope::new("detail"),
        )
        .await
        .expect("request failed");

    let events = events.lock();
    assert_eq!(events.len(), 1);
    let detail = events[0].payload().expect("payload");
    assert_eq!(detail.winner_name(), Some("lucky9"));
    assert_eq!(detail.data.as_ref().map(|d| d.goods_name.as_str()), Some("Phone"));
}

#[tokio::test]
async fn test_failure_published_without_payload() {
    let bus = EventBus::new();
    let (_sub, events) = record(&bus);
    let request = WinItemDetailRequest::with_transport(bus.clone(), OfflineTransport::new());

    request
        .send_request(
            RequestParams::new(),
            "https://api.example.com/winner/detail",
            &RequestScope::new("detail"),
        )
        .await
        .expect("failures travel in the event");

    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert!(events[0].payload().is_none());
}

#[tokio::test]
async fn test_unreadable_body_returns_error() {
    let bus = EventBus::new();
    let (_sub, events) = record(&bus);
    let request = WinItemDetailRequest::with_transport(bus.clone(), Canned("server busy"));

    let result = request
        .send_request(
            RequestParams::new(),
            "https://api.example.com/winner/detail",
            &RequestScope::new("detail"),
        )
        .await;

    assert!(matches!(result, Err(NetworkError::Json(_))));
    assert!(events.lock().is_empty());
}

#[tokio::test]
async fn test_spawned_request_publishes() {
    let bus = EventBus::new();
    let (_sub, mut rx) = bus.subscribe_channel::<WinItemDetailEvent>();
    let request = WinItemDetailRequest::with_transport(bus.clone(), Canned(r#"{"code":1}"#));

    let id = request
        .spawn_request(
            RequestParams::new(),
            "https://api.example.com/winner/detail",
            RequestScope::new("detail"),
        )
        .await
        .expect("task panicked")
        .expect("request failed");

    let event = rx.recv().await.expect("event");
    assert_eq!(event.id(), id);
    assert_eq!(event.payload().map(|d| d.code), Some(1));
    assert!(request.adapter().options().show_progress);
    assert!(!request.adapter().options().use_cache);
}
