//! Detail of a finished draw: the item, the period and who won it.

use std::future::Future;

use courier_core::{EventBus, RequestScope};
use courier_net::{
    FormRequestSender, HttpTransport, JsonMapper, RequestAdapter, RequestId, RequestParams,
    ResponseEvent, Result, Transport, TransportOptions,
};
use serde::Deserialize;
use tokio::task::JoinHandle;

/// Response body of the win-item detail endpoint.
///
/// Every field tolerates being absent.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WinItemDetail {
    /// Server status code.
    pub code: i32,
    /// Server message.
    pub msg: String,
    /// The draw, when the server found one.
    pub data: Option<WinItemData>,
}

impl WinItemDetail {
    /// Nickname of the winner, if the draw has one.
    pub fn winner_name(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.winner.as_ref())
            .map(|winner| winner.nick_name.as_str())
    }
}

/// One finished draw.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WinItemData {
    pub goods_id: String,
    pub goods_name: String,
    pub goods_img: String,
    pub period_id: String,
    pub period_number: String,
    /// Shares needed to close the period.
    pub total_count: u32,
    pub lucky_code: String,
    pub announce_time: String,
    pub winner: Option<Winner>,
}

/// The user holding the lucky code.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Winner {
    pub user_id: String,
    pub nick_name: String,
    pub head_pic: String,
    pub ip_address: String,
    /// Shares the winner bought in this period.
    pub join_count: u32,
}

/// Event published after every win-item detail request.
pub type WinItemDetailEvent = ResponseEvent<WinItemDetail>;

/// Loads a draw's detail and publishes a [`WinItemDetailEvent`].
///
/// Progress is shown on the caller's scope and caching is off.
pub struct WinItemDetailRequest<Tr = HttpTransport> {
    adapter: RequestAdapter<WinItemDetail, Tr, JsonMapper>,
}

impl WinItemDetailRequest<HttpTransport> {
    /// Request over a default HTTP transport.
    pub fn new(bus: EventBus) -> Result<Self> {
        Ok(Self {
            adapter: RequestAdapter::http(bus)?,
        })
    }
}

impl<Tr: Transport> WinItemDetailRequest<Tr> {
    /// Request over the given transport.
    pub fn with_transport(bus: EventBus, transport: Tr) -> Self {
        Self {
            adapter: RequestAdapter::new(bus, transport, JsonMapper).with_options(
                TransportOptions {
                    show_progress: true,
                    use_cache: false,
                },
            ),
        }
    }

    /// The adapter doing the work.
    pub fn adapter(&self) -> &RequestAdapter<WinItemDetail, Tr, JsonMapper> {
        &self.adapter
    }
}

impl<Tr: Transport + 'static> WinItemDetailRequest<Tr> {
    /// Send on a spawned task; see [`RequestAdapter::spawn_request`].
    pub fn spawn_request(
        &self,
        params: RequestParams,
        url: impl Into<String>,
        scope: RequestScope,
    ) -> JoinHandle<Result<RequestId>> {
        self.adapter.spawn_request(params, url, scope)
    }
}

impl<Tr: Transport> FormRequestSender for WinItemDetailRequest<Tr> {
    fn send_request(
        &self,
        params: RequestParams,
        url: &str,
        scope: &RequestScope,
    ) -> impl Future<Output = Result<RequestId>> + Send {
        self.adapter.send_request(params, url, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "code": 1,
        "msg": "success",
        "data": {
            "goods_id": "1024",
            "goods_name": "Phone 64G",
            "goods_img": "https://img.example.com/1024.jpg",
            "period_id": "88",
            "period_number": "20151126001",
            "total_count": 5288,
            "lucky_code": "10003021",
            "announce_time": "2015-11-26 18:30:00",
            "winner": {
                "user_id": "u-9",
                "nick_name": "lucky9",
                "head_pic": "https://img.example.com/u9.png",
                "ip_address": "10.0.0.9",
                "join_count": 12
            }
        }
    }"#;

    #[test]
    fn test_full_body() {
        let detail: WinItemDetail = serde_json::from_str(FULL).unwrap();
        assert_eq!(detail.code, 1);
        assert_eq!(detail.winner_name(), Some("lucky9"));
        let data = detail.data.unwrap();
        assert_eq!(data.total_count, 5288);
        assert_eq!(data.lucky_code, "10003021");
        assert_eq!(data.winner.unwrap().join_count, 12);
    }

    #[test]
    fn test_partial_body() {
        let detail: WinItemDetail =
            serde_json::from_str(r#"{"code":0,"msg":"period not announced"}"#).unwrap();
        assert!(detail.data.is_none());
        assert_eq!(detail.winner_name(), None);

        let detail: WinItemDetail =
            serde_json::from_str(r#"{"code":1,"data":{"goods_name":"Pad"}}"#).unwrap();
        let data = detail.data.as_ref().unwrap();
        assert_eq!(data.goods_name, "Pad");
        assert!(data.winner.is_none());
    }
}
