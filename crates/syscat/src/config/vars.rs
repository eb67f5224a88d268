//! Dynamic variable substitution for connection configurations.
//!
//! Configuration fields may embed `${name}` tokens that are resolved right
//! before the configuration is handed to the session layer. Unknown tokens
//! pass through unchanged so engine-side templating keeps working.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::types::ConnectionConfiguration;

/// Declared variable names.
pub const VAR_HOST: &str = "host";
pub const VAR_PORT: &str = "port";
pub const VAR_SERVER: &str = "server";
pub const VAR_DATABASE: &str = "database";
pub const VAR_USER: &str = "user";
pub const VAR_PASSWORD: &str = "password";
pub const VAR_URL: &str = "url";
pub const VAR_PROJECT_PATH: &str = "project.path";
pub const VAR_PROJECT_NAME: &str = "project.name";

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.]*)\}").expect("variable pattern"));

/// Resolves variable names to values.
///
/// Returning `None` leaves the token in place.
pub trait VariableResolver {
    /// Resolve one variable name.
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> VariableResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Replace every `${name}` token in `text` using the resolver.
pub fn replace_variables(text: &str, resolver: &dyn VariableResolver) -> String {
    VARIABLE_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            resolver
                .resolve(&caps[1])
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn replace_in_place(field: &mut Option<String>, resolver: &dyn VariableResolver) {
    if let Some(value) = field {
        *value = replace_variables(value, resolver);
    }
}

impl ConnectionConfiguration {
    /// Resolve `${name}` tokens in every string field, every property and
    /// provider-property value, enabled handlers, and bootstrap queries.
    pub fn resolve_dynamic_variables(&mut self, resolver: &dyn VariableResolver) {
        replace_in_place(&mut self.host, resolver);
        replace_in_place(&mut self.port, resolver);
        replace_in_place(&mut self.server, resolver);
        replace_in_place(&mut self.database, resolver);
        replace_in_place(&mut self.user, resolver);
        replace_in_place(&mut self.password, resolver);
        replace_in_place(&mut self.url, resolver);

        for value in self.properties.values_mut() {
            *value = replace_variables(value, resolver);
        }
        for value in self.provider_properties.values_mut() {
            *value = replace_variables(value, resolver);
        }
        for handler in self.handlers.iter_mut().filter(|h| h.enabled) {
            replace_in_place(&mut handler.user, resolver);
            replace_in_place(&mut handler.password, resolver);
            for value in handler.properties.values_mut() {
                *value = replace_variables(value, resolver);
            }
        }
        for query in self.bootstrap.init_queries.iter_mut() {
            *query = replace_variables(query, resolver);
        }
    }
}
