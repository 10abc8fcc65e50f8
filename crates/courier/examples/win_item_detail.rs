//! Load the detail of a finished draw and print the winner.
//!
//! Run with: cargo run -p courier --example win_item_detail -- <url> <period_id>

use courier::net::{FormRequestSender, RequestParams};
use courier::requests::{WinItemDetailEvent, WinItemDetailRequest};
use courier::{ActivityState, EventBus, RequestScope};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("courier_net=debug,courier_core::bus=debug")
        .init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "http://127.0.0.1:8080/winner/detail".to_string());
    let period_id = args.next().unwrap_or_else(|| "1".to_string());

    let bus = EventBus::new();
    let _subscription = bus.subscribe(|event: &WinItemDetailEvent| match event.outcome() {
        courier::net::RequestOutcome::Completed(detail) => {
            println!("{} code={} msg={}", event.id(), detail.code, detail.msg);
            match detail.data.as_ref() {
                Some(data) => println!(
                    "  {} period {} lucky code {} won by {}",
                    data.goods_name,
                    data.period_number,
                    data.lucky_code,
                    detail.winner_name().unwrap_or("nobody yet"),
                ),
                None => println!("  no draw data"),
            }
        }
        courier::net::RequestOutcome::Failed(err) => println!("{} failed: {err}", event.id()),
    });

    let scope = RequestScope::new("win-item-detail");
    let _progress = scope.progress().changed().connect(|state| match state {
        ActivityState::Busy { message, .. } => {
            println!("loading {}...", message.as_deref().unwrap_or(""))
        }
        ActivityState::Idle => println!("done"),
    });

    let request = WinItemDetailRequest::new(bus.clone())?;
    request
        .send_request(RequestParams::new().with("period_id", period_id), &url, &scope)
        .await?;

    Ok(())
}
