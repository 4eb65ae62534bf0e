//! Content-type sniffing
//!
//! Untracked files declare their object type through the leading keyword
//! of the first significant line. Classification is an ordered rule table
//! evaluated top to bottom, first match wins, with an explicit "none"
//! outcome so an unrecognized keyword is never silently misclassified.

use xsync_remote::ObjectType;

/// Ordered (keyword, type) classification rules.
///
/// Compound keywords precede their prefixes so `table_trigger` never falls
/// through to `table`. `trigger` and `channel` are accepted shorthands.
const RULES: &[(&str, ObjectType)] = &[
    ("api_group", ObjectType::ApiGroup),
    ("api", ObjectType::ApiEndpoint),
    ("function", ObjectType::Function),
    ("table_trigger", ObjectType::TableTrigger),
    ("table", ObjectType::Table),
    ("task", ObjectType::Task),
    ("middleware", ObjectType::Middleware),
    ("addon", ObjectType::Addon),
    ("agent_trigger", ObjectType::AgentTrigger),
    ("agent", ObjectType::Agent),
    ("tool", ObjectType::Tool),
    ("mcp_server_trigger", ObjectType::McpServerTrigger),
    ("mcp_server", ObjectType::McpServer),
    ("realtime_channel", ObjectType::RealtimeChannel),
    ("realtime_trigger", ObjectType::RealtimeTrigger),
    ("trigger", ObjectType::TableTrigger),
    ("channel", ObjectType::RealtimeChannel),
];

/// Infer the object type from the leading keyword of the first
/// non-comment, non-blank line. Returns `None` when the keyword is
/// unrecognized or the content has no significant line.
pub fn sniff_object_type(content: &str) -> Option<ObjectType> {
    let line = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("//") && !l.starts_with('#'))?;
    let token = line.split_whitespace().next()?;
    RULES
        .iter()
        .find(|(keyword, _)| *keyword == token)
        .map(|(_, object_type)| *object_type)
}
