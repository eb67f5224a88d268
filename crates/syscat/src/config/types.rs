//! Connection configuration type definitions.
//!
//! This is the persisted key-value document handed to the session layer:
//! endpoint fields, driver properties, provider properties, lifecycle shell
//! commands, network handler configurations, and bootstrap settings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Connection lifecycle events that can trigger a shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionEventType {
    BeforeConnect,
    AfterConnect,
    BeforeDisconnect,
    AfterDisconnect,
}

/// Shell command bound to a connection lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShellCommand {
    /// Command line to execute.
    pub command: String,

    /// Whether the command is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Wait for the process to finish before continuing.
    #[serde(default)]
    pub wait_for_finish: bool,

    /// Terminate the process when the connection closes.
    #[serde(default)]
    pub terminate_at_disconnect: bool,

    /// Working directory for the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

/// Network handler configuration (tunnels, proxies).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandlerConfiguration {
    /// Handler identifier.
    pub id: String,

    /// Whether the handler is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Handler user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Handler password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Persist the password with the configuration.
    #[serde(default)]
    pub save_password: bool,

    /// Handler-specific properties.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// Commands and defaults applied right after a connection opens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionBootstrap {
    /// Default catalog to select.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_catalog: Option<String>,

    /// Default schema to select.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,

    /// Queries executed in order after connect.
    #[serde(default)]
    pub init_queries: Vec<String>,

    /// Continue past failing init queries.
    #[serde(default)]
    pub ignore_errors: bool,

    /// Override the autocommit mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocommit: Option<bool>,
}

/// Connection configuration document.
///
/// `Clone` is deep: cloned handlers, events, and bootstrap commands are
/// independently mutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfiguration {
    /// Database host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Database port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Server (instance) name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// User name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Full connection URL, overriding the individual endpoint fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Driver connection properties.
    #[serde(default)]
    pub properties: HashMap<String, String>,

    /// Provider-specific extra properties.
    #[serde(default)]
    pub provider_properties: HashMap<String, String>,

    /// Lifecycle event commands.
    #[serde(default)]
    pub events: HashMap<ConnectionEventType, ShellCommand>,

    /// Network handler configurations, in application order.
    #[serde(default)]
    pub handlers: Vec<HandlerConfiguration>,

    /// Post-connect bootstrap settings.
    #[serde(default)]
    pub bootstrap: ConnectionBootstrap,

    /// Display color tag (RGB string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Keep-alive interval in seconds. Zero or negative disables keep-alive.
    #[serde(default)]
    pub keep_alive_interval: i32,
}

/// Compare endpoint fields treating a missing value and an empty string
/// as equal.
fn equal_or_empty(a: &Option<String>, b: &Option<String>) -> bool {
    a.as_deref().unwrap_or("") == b.as_deref().unwrap_or("")
}

impl PartialEq for ConnectionConfiguration {
    fn eq(&self, other: &Self) -> bool {
        equal_or_empty(&self.host, &other.host)
            && equal_or_empty(&self.port, &other.port)
            && equal_or_empty(&self.server, &other.server)
            && equal_or_empty(&self.database, &other.database)
            && equal_or_empty(&self.user, &other.user)
            && equal_or_empty(&self.password, &other.password)
            && equal_or_empty(&self.url, &other.url)
            && self.properties == other.properties
            && self.provider_properties == other.provider_properties
            && self.events == other.events
            && self.handlers == other.handlers
            && self.bootstrap == other.bootstrap
            && self.color == other.color
            && self.keep_alive_interval == other.keep_alive_interval
    }
}

impl Eq for ConnectionConfiguration {}

impl std::fmt::Display for ConnectionConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.url, &self.database) {
            (Some(url), _) => write!(f, "Connection: {}", url),
            (None, Some(database)) => write!(f, "Connection: {}", database),
            (None, None) => write!(f, "Connection: <unnamed>"),
        }
    }
}

impl ConnectionConfiguration {
    /// Get a driver connection property.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Set a driver connection property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Get a provider property.
    pub fn provider_property(&self, name: &str) -> Option<&str> {
        self.provider_properties.get(name).map(String::as_str)
    }

    /// Set a provider property.
    pub fn set_provider_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.provider_properties.insert(name.into(), value.into());
    }

    /// Get the command bound to a lifecycle event.
    pub fn event(&self, event_type: ConnectionEventType) -> Option<&ShellCommand> {
        self.events.get(&event_type)
    }

    /// Bind a command to a lifecycle event; `None` unbinds it.
    pub fn set_event(&mut self, event_type: ConnectionEventType, command: Option<ShellCommand>) {
        match command {
            Some(command) => {
                self.events.insert(event_type, command);
            }
            None => {
                self.events.remove(&event_type);
            }
        }
    }

    /// Event types with a bound command.
    pub fn declared_events(&self) -> Vec<ConnectionEventType> {
        self.events.keys().copied().collect()
    }

    /// Find a network handler by id.
    pub fn handler(&self, id: &str) -> Option<&HandlerConfiguration> {
        self.handlers.iter().find(|h| h.id == id)
    }

    /// Replace a handler with a matching id, or append it.
    pub fn update_handler(&mut self, handler: HandlerConfiguration) {
        if let Some(existing) = self.handlers.iter_mut().find(|h| h.id == handler.id) {
            *existing = handler;
        } else {
            self.handlers.push(handler);
        }
    }

    /// Whether keep-alive pings are enabled.
    pub fn keep_alive_enabled(&self) -> bool {
        self.keep_alive_interval > 0
    }
}
