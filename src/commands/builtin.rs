use super::{Action, CommandEntry, CommandTable, MatchMode};

pub const HELP_TEXT: &str = "Here are some commands to try:\n\
> `help` – displays list of commands\n\
> `ping` – displays uptime\n\
> `xkcd` – posts a random xkcd comic\n\
> `kill` – kills bot\n";

pub const KILL_TAUNT: &str = "HA! Foolish mortals. I cannot be killed.";

pub const FALLBACK_RESPONSE: &str = "Sorry, I don't speak Japanese. Try `help`.";

const PARADOX: &str = "This sentence is false.";
const PARADOX_RESPONSE: &str = "f̴a̸l̵l̸a̵c̸y̵ ̶e̵r̸r̵o̶r̸,̷ ̸s̶h̵u̷t̴t̷i̴n̸g̸ ̴d̷o̸w̷n̷";

/// The bot's command table, in matching priority order.
#[must_use]
pub fn builtin_commands() -> CommandTable {
    CommandTable::new(
        vec![
            CommandEntry::new("help", MatchMode::Prefix, Action::Reply(HELP_TEXT))
                .with_log_summary("Responded with a list of commands."),
            CommandEntry::new("kill", MatchMode::Prefix, Action::Reply(KILL_TAUNT)),
            CommandEntry::new("ping", MatchMode::Prefix, Action::Uptime),
            CommandEntry::new("uptime", MatchMode::Prefix, Action::Uptime),
            CommandEntry::new("xkcd", MatchMode::Prefix, Action::RandomComic),
            CommandEntry::new(PARADOX, MatchMode::Exact, Action::Reply(PARADOX_RESPONSE)),
        ],
        FALLBACK_RESPONSE,
    )
}
