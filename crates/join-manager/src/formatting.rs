//! Composition of accept and reject notices.
//!
//! The session a request came from gets a message addressed to the new
//! member; every other notified session gets a third-person summary.

use std::path::Path;

use indexmap::IndexSet;
use join_core::{MessageChain, SessionId};

use crate::notice::Notice;

/// Data shown in an accept notice.
#[derive(Debug, Clone, Copy)]
pub struct AcceptNotice<'a> {
    pub group_id: &'a str,
    pub user_id: &'a str,
    pub welcome: &'a str,
    pub comment: &'a str,
    pub category: &'a str,
    /// Rendered source chart, if any.
    pub chart: Option<&'a Path>,
}

impl AcceptNotice<'_> {
    /// Message for the originating session.
    pub fn for_origin(&self) -> MessageChain {
        let mut text = format!(
            "🎉 {}\n📝 验证消息:\n  {}\n🏷️ 分类: {}\n",
            self.welcome, self.comment, self.category
        );
        if self.chart.is_some() {
            text.push_str("\n📊 来源分布:");
        }

        let chain = MessageChain::new().mention(self.user_id).text(text);
        match self.chart {
            Some(path) => chain.image(path),
            None => chain,
        }
    }

    /// Message for any other notified session.
    pub fn for_observer(&self) -> MessageChain {
        let mut text = format!(
            "🎉 群 {} 已自动同意用户 {} 入群\n📝 验证消息:\n  {}\n🏷️ 分类: {}\n",
            self.group_id, self.user_id, self.comment, self.category
        );
        if self.chart.is_some() {
            text.push_str("\n📊 来源分布:");
        }

        let chain = MessageChain::new().text(text);
        match self.chart {
            Some(path) => chain.image(path),
            None => chain,
        }
    }
}

/// Data shown in a reject notice.
#[derive(Debug, Clone, Copy)]
pub struct RejectNotice<'a> {
    pub group_id: &'a str,
    pub user_id: &'a str,
    pub keyword: &'a str,
}

impl RejectNotice<'_> {
    pub fn for_origin(&self) -> MessageChain {
        MessageChain::new().text(format!(
            "🚫 已自动拒绝用户 {}\n📝 原因: 触发拒绝词【{}】",
            self.user_id, self.keyword
        ))
    }

    pub fn for_observer(&self) -> MessageChain {
        MessageChain::new().text(format!(
            "🚫 群 {} 已自动拒绝用户 {}\n📝 原因: 触发拒绝词【{}】",
            self.group_id, self.user_id, self.keyword
        ))
    }
}

/// Pair each target with the origin or observer variant of a message.
pub fn address(
    targets: &IndexSet<SessionId>,
    origin: &SessionId,
    for_origin: &MessageChain,
    for_observer: &MessageChain,
) -> Vec<Notice> {
    targets
        .iter()
        .map(|session| Notice {
            session: session.clone(),
            chain: if session == origin {
                for_origin.clone()
            } else {
                for_observer.clone()
            },
        })
        .collect()
}
