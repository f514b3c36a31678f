//! Slack backend: Web API calls plus the RTM WebSocket stream.

mod api;
mod rtm;

pub use api::SlackApi;
pub use rtm::{SlackConnector, SlackSession};
