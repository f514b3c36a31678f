//! Ordered keyword table and first-match lookup.

use log::debug;

/// How a keyword is compared against the trimmed command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Command starts with the keyword, so `pingback` matches `ping`.
    Prefix,
    /// Command equals the keyword.
    Exact,
}

/// What to do once a keyword matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Reply with fixed text.
    Reply(&'static str),
    /// Reply with how long the bot has been running.
    Uptime,
    /// Reply with a random xkcd comic.
    RandomComic,
}

#[derive(Debug, Clone)]
pub struct CommandEntry {
    pub keyword: &'static str,
    pub mode: MatchMode,
    pub action: Action,
    /// Logged instead of the full reply text when set.
    pub log_summary: Option<&'static str>,
}

impl CommandEntry {
    #[must_use]
    pub const fn new(keyword: &'static str, mode: MatchMode, action: Action) -> Self {
        Self {
            keyword,
            mode,
            action,
            log_summary: None,
        }
    }

    #[must_use]
    pub const fn with_log_summary(mut self, summary: &'static str) -> Self {
        self.log_summary = Some(summary);
        self
    }

    /// Case-sensitive comparison against a trimmed command.
    #[must_use]
    pub fn matches(&self, command: &str) -> bool {
        match self.mode {
            MatchMode::Prefix => command.starts_with(self.keyword),
            MatchMode::Exact => command == self.keyword,
        }
    }
}

/// Commands in priority order, plus the reply used when none match.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
    fallback: &'static str,
}

impl CommandTable {
    #[must_use]
    pub fn new(entries: Vec<CommandEntry>, fallback: &'static str) -> Self {
        Self { entries, fallback }
    }

    /// First entry whose keyword matches, in table order.
    #[must_use]
    pub fn resolve(&self, command: &str) -> Option<&CommandEntry> {
        let entry = self.entries.iter().find(|entry| entry.matches(command));
        debug!(
            "Command '{command}' resolved to {:?}",
            entry.map(|entry| entry.keyword)
        );
        entry
    }

    #[must_use]
    pub fn fallback(&self) -> &'static str {
        self.fallback
    }
}
