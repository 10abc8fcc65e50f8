//! Concrete requests, one module per endpoint.

mod win_item_detail;

pub use win_item_detail::{
    WinItemData, WinItemDetail, WinItemDetailEvent, WinItemDetailRequest, Winner,
};
