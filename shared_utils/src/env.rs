use std::str::FromStr;

use thiserror::Error;

use crate::config::ConfigError;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Looks a variable up through the process environment.
///
/// Blank values are treated as unset.
pub fn process_env(name: &str) -> Option<String> {
    get_env_var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Reads `name` through `lookup` and parses it, falling back to `default`
/// when the variable is unset.
///
/// `lookup` is usually [`process_env`]; tests pass a closure over a map so
/// they never have to mutate the real environment.
pub fn parse_var_or<T, F>(lookup: F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name: name.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Like [`parse_var_or`] for plain strings, which cannot fail to parse.
pub fn var_or<F>(lookup: F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |k| map.get(k).map(|v| v.to_string())
    }

    #[test]
    fn missing_variable_uses_default() {
        let map = HashMap::new();
        let v: u64 = parse_var_or(lookup_in(&map), "TIMEOUT", 10).unwrap();
        assert_eq!(v, 10);
        assert_eq!(var_or(lookup_in(&map), "URL", "http://x"), "http://x");
    }

    #[test]
    fn present_variable_is_parsed() {
        let map = HashMap::from([("TIMEOUT", " 25 ")]);
        let v: u64 = parse_var_or(lookup_in(&map), "TIMEOUT", 10).unwrap();
        assert_eq!(v, 25);
    }

    #[test]
    fn garbage_is_reported_with_name_and_value() {
        let map = HashMap::from([("TIMEOUT", "soon")]);
        let ConfigError::Invalid { name, value, .. } =
            parse_var_or::<u64, _>(lookup_in(&map), "TIMEOUT", 10).unwrap_err();
        assert_eq!(name, "TIMEOUT");
        assert_eq!(value, "soon");
    }

    #[test]
    fn unset_process_variable_is_an_error() {
        let err = get_env_var("SHARED_UTILS_SURELY_UNSET_VARIABLE").unwrap_err();
        assert_eq!(err.0, "SHARED_UTILS_SURELY_UNSET_VARIABLE");
    }
}
