//! Remote object model
//!
//! The remote workspace exposes a fixed set of programmable object kinds.
//! `ObjectType` is the closed enumeration shared by every layer: the store
//! records it per tracked file, the path generator keys its rules on it,
//! and the HTTP client maps it to collection endpoints.

use serde::{Deserialize, Serialize};

/// Kind of a remote programmable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Function,
    ApiEndpoint,
    ApiGroup,
    Table,
    TableTrigger,
    Task,
    Middleware,
    Addon,
    Agent,
    AgentTrigger,
    Tool,
    McpServer,
    McpServerTrigger,
    RealtimeChannel,
    RealtimeTrigger,
}

impl ObjectType {
    /// Every object type, in bulk-fetch order. API groups come first so
    /// group display names are known before endpoint paths are generated.
    pub const ALL: [ObjectType; 15] = [
        Self::ApiGroup,
        Self::ApiEndpoint,
        Self::Function,
        Self::Table,
        Self::TableTrigger,
        Self::Task,
        Self::Middleware,
        Self::Addon,
        Self::Agent,
        Self::AgentTrigger,
        Self::Tool,
        Self::McpServer,
        Self::McpServerTrigger,
        Self::RealtimeChannel,
        Self::RealtimeTrigger,
    ];

    /// Stable snake_case name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::ApiEndpoint => "api_endpoint",
            Self::ApiGroup => "api_group",
            Self::Table => "table",
            Self::TableTrigger => "table_trigger",
            Self::Task => "task",
            Self::Middleware => "middleware",
            Self::Addon => "addon",
            Self::Agent => "agent",
            Self::AgentTrigger => "agent_trigger",
            Self::Tool => "tool",
            Self::McpServer => "mcp_server",
            Self::McpServerTrigger => "mcp_server_trigger",
            Self::RealtimeChannel => "realtime_channel",
            Self::RealtimeTrigger => "realtime_trigger",
        }
    }

    /// Default type directory under the project root.
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Function => "functions",
            Self::ApiEndpoint | Self::ApiGroup => "apis",
            Self::Table | Self::TableTrigger => "tables",
            Self::Task => "tasks",
            Self::Middleware => "middleware",
            Self::Addon => "addons",
            Self::Agent | Self::AgentTrigger => "agents",
            Self::Tool => "tools",
            Self::McpServer | Self::McpServerTrigger => "mcp_servers",
            Self::RealtimeChannel | Self::RealtimeTrigger => "realtime",
        }
    }

    /// Remote collection segment in API URLs.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::ApiEndpoint => "api",
            Self::ApiGroup => "apigroup",
            Self::Table => "table",
            Self::TableTrigger => "table_trigger",
            Self::Task => "task",
            Self::Middleware => "middleware",
            Self::Addon => "addon",
            Self::Agent => "agent",
            Self::AgentTrigger => "agent_trigger",
            Self::Tool => "tool",
            Self::McpServer => "mcp_server",
            Self::McpServerTrigger => "mcp_server_trigger",
            Self::RealtimeChannel => "realtime_channel",
            Self::RealtimeTrigger => "realtime_trigger",
        }
    }

    /// Whether update conflicts on this type are recovered by deleting the
    /// remote object and recreating it under a new id.
    ///
    /// The remote enforces a name-uniqueness constraint on these types that
    /// can reject an update even when the name did not change.
    pub fn uses_delete_recreate_recovery(&self) -> bool {
        matches!(
            self,
            Self::Agent | Self::AgentTrigger | Self::Tool | Self::McpServer | Self::McpServerTrigger
        )
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown object type: {s}"))
    }
}

/// Raw object payload as returned by the remote collection endpoints.
///
/// Only the fields the engine consumes are modeled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObject {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// XanoScript source: a plain string or a `{status, value}` wrapper.
    #[serde(default)]
    pub xanoscript: Option<serde_json::Value>,
    /// HTTP verb, present on API endpoints only.
    #[serde(default)]
    pub verb: Option<String>,
    /// URL path shape, present on API endpoints only.
    #[serde(default)]
    pub path: Option<String>,
    /// Owning API group id, present on API endpoints only.
    #[serde(default)]
    pub apigroup_id: Option<u64>,
    /// Stable external reference for groups and endpoints.
    #[serde(default)]
    pub canonical: Option<String>,
}

/// A remote object with its source decoded, ready for path generation and
/// hashing. Ephemeral: produced by bulk fetch, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedObject {
    pub id: u64,
    pub object_type: ObjectType,
    pub name: String,
    pub content: String,
    /// Owning API group id (endpoints only).
    pub group_id: Option<u64>,
    /// HTTP verb (endpoints only).
    pub verb: Option<String>,
    /// URL path shape (endpoints only).
    pub path_shape: Option<String>,
    /// Stable external reference (groups and endpoints).
    pub canonical: Option<String>,
}
