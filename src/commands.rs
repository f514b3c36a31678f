//! Text commands the bot understands and how it answers them.

mod builtin;
mod respond;
mod table;

pub use builtin::{FALLBACK_RESPONSE, HELP_TEXT, KILL_TAUNT, builtin_commands};
pub use respond::{BotContext, Reply};
pub use table::{Action, CommandEntry, CommandTable, MatchMode};
