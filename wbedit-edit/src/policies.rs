//! Stock collaborator implementations.

use crate::{
    Actor, EditAction, EditFilterHookRunner, EditTokenChecker, FilterResult, PermissionChecker,
    PermissionResult, RateLimiter, SummaryFormatter, WatchlistUpdater,
};
use serde_json::Value;
use wbedit_model::{Entity, EntityId, Summary};

/// Allows every action, accepts every token, passes every filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllPolicy;

impl PermissionChecker for AllowAllPolicy {
    fn check(&self, _actor: &Actor, _action: EditAction, _entity: &Entity) -> PermissionResult {
        PermissionResult::Allowed
    }
}

impl RateLimiter for AllowAllPolicy {
    fn is_limited(&self, _actor: &Actor, _action: EditAction) -> bool {
        false
    }
}

impl EditTokenChecker for AllowAllPolicy {
    fn check(&self, _actor: &Actor, _token: &str) -> bool {
        true
    }
}

impl EditFilterHookRunner for AllowAllPolicy {
    fn run(&self, _entity: &Entity, _actor: &Actor, _summary: &str) -> FilterResult {
        FilterResult::Pass
    }
}

/// Refuses everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllPolicy;

impl PermissionChecker for DenyAllPolicy {
    fn check(&self, actor: &Actor, action: EditAction, _entity: &Entity) -> PermissionResult {
        PermissionResult::Denied(format!("{actor} may not {action}"))
    }
}

impl RateLimiter for DenyAllPolicy {
    fn is_limited(&self, _actor: &Actor, _action: EditAction) -> bool {
        true
    }
}

impl EditTokenChecker for DenyAllPolicy {
    fn check(&self, _actor: &Actor, _token: &str) -> bool {
        false
    }
}

impl EditFilterHookRunner for DenyAllPolicy {
    fn run(&self, _entity: &Entity, _actor: &Actor, _summary: &str) -> FilterResult {
        FilterResult::Reject("all edits are filtered".to_string())
    }
}

/// Ignores watch-list updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWatchlist;

impl WatchlistUpdater for NoopWatchlist {
    fn update(&self, _actor: &Actor, _id: &EntityId, _watch: bool) {}
}

/// Renders `/* module-action:lang|args */ auto-summary, user summary`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSummaryFormatter;

fn render_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl SummaryFormatter for PlainSummaryFormatter {
    fn render(&self, summary: &Summary) -> String {
        let mut comment = summary.message_key().unwrap_or_default();
        let mut params: Vec<String> = summary.language().map(str::to_string).into_iter().collect();
        params.extend(summary.auto_comment_args().iter().map(render_arg));
        if !params.is_empty() {
            comment.push(':');
            comment.push_str(&params.join("|"));
        }

        let mut out = String::new();
        if !comment.is_empty() {
            out = format!("/* {comment} */");
        }
        let auto = summary
            .auto_summary_args()
            .iter()
            .map(render_arg)
            .collect::<Vec<_>>()
            .join(", ");
        let tail = match summary.user_summary() {
            Some(user) if !auto.is_empty() => format!("{auto}, {user}"),
            Some(user) => user.to_string(),
            None => auto,
        };
        if !tail.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&tail);
        }
        out
    }
}
