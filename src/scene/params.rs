//! String-keyed parameter store with defaults and choice validation.

use core::fmt::Display;
use core::str::FromStr;
use hashbrown::HashMap;

/// Error produced when a parameter fails validation.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ParamError {
    /// A closed-choice parameter was set to a value outside its choice set.
    #[error("invalid value \"{value}\" for parameter \"{key}\", must be one of: {}", .allowed.join(", "))]
    InvalidChoice {
        /// The parameter name.
        key: String,
        /// The rejected value.
        value: String,
        /// The set of accepted values.
        allowed: Vec<String>,
    },
}

/// A set of named configuration values.
///
/// Values are stored as strings and parsed on access. Lookups never fail:
/// missing or unparsable values fall back to the supplied default (the
/// latter with a logged warning). Only closed-choice lookups can reject a
/// value, and they do so with a [`ParamError`].
#[derive(Clone, Debug, Default)]
pub struct ParamSet {
    values: HashMap<String, String>,
}

impl ParamSet {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parameter `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        let _ = self.values.insert(key.into(), value.to_string());
    }

    /// Is the parameter `key` set?
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The value of the parameter `key`, or `default` if it is absent.
    ///
    /// A present but unparsable value logs a warning and yields `default`.
    pub fn get_optional<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Display,
    {
        match self.values.get(key) {
            None => default,
            Some(raw) => match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    log::warn!(
                        "parameter \"{}\" has unparsable value \"{}\", using default \"{}\"",
                        key,
                        raw,
                        default
                    );
                    default
                }
            },
        }
    }

    /// The value of the closed-choice parameter `key`, or `default` if it is
    /// absent.
    ///
    /// Returns an error if the stored value is not one of `allowed`. The
    /// default is assumed to be an allowed choice.
    pub fn get_optional_enum(
        &self,
        key: &str,
        default: &str,
        allowed: &[&str],
    ) -> Result<String, ParamError> {
        match self.values.get(key) {
            None => Ok(default.to_string()),
            Some(raw) if allowed.contains(&raw.as_str()) => Ok(raw.clone()),
            Some(raw) => Err(ParamError::InvalidChoice {
                key: key.to_string(),
                value: raw.clone(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}
