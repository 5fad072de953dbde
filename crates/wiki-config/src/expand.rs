//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// - `${VAR}` expands to the value of VAR and fails if it is unset
/// - `${VAR:-default}` falls back to `default`
///
/// Bare `$VAR` is left alone so paths and URLs containing `$` survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(var.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);
