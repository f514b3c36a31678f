//! Direct-mention parsing for message bodies.

/// Leading characters Slack uses for user (`U`) and enterprise user (`W`) IDs.
const USER_ID_MARKERS: [char; 2] = ['U', 'W'];

/// A message that opens with `<@ID>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMention<'a> {
    pub user_id: &'a str,
    pub text: &'a str,
}

/// Parse a leading direct mention like `<@U123ABC> do something`.
///
/// Only a mention at the very start of the body counts. The trailing text is
/// taken up to the first line break and trimmed. Returns `None` when the body
/// does not open with a mention.
pub fn parse_direct_mention(body: &str) -> Option<DirectMention<'_>> {
    let rest = body.strip_prefix("<@")?;
    let first_line = rest.split('\n').next().unwrap_or_default();

    let (user_id, text) = first_line.split_once('>')?;
    if !user_id.starts_with(USER_ID_MARKERS) || user_id.len() < 2 {
        return None;
    }

    Some(DirectMention {
        user_id,
        text: text.trim(),
    })
}
