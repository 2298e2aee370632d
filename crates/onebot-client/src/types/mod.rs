//! OneBot v11 wire types.

pub mod action;
pub mod event;

pub use action::{
    ActionResponse, GetStrangerInfoParams, IdParam, SendGroupMsgParams, SendPrivateMsgParams,
    Segment, SetGroupAddRequestParams, StatusInfo, StrangerInfo,
};
pub use event::{GroupRequest, OneBotEvent, RequestEvent};
