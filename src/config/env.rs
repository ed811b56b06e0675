use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

/// Reads `key` from the environment; absent or blank values mean "no
/// override".
pub(super) fn lookup(key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::Other(err.to_string())),
    }
}

pub(super) fn lookup_parse<T>(key: &'static str) -> std::result::Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)?
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|err| ConfigError::InvalidField {
                    field: key,
                    message: err.to_string(),
                })
        })
        .transpose()
}

pub(super) fn lookup_duration(
    key: &'static str,
) -> std::result::Result<Option<Duration>, ConfigError> {
    lookup(key)?
        .map(|value| {
            parse_duration(value.trim()).map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::lookup_parse;

    #[test]
    fn absent_variable_is_no_override() {
        assert!(matches!(
            lookup_parse::<usize>("TOASTQ_TEST_UNSET_VAR"),
            Ok(None)
        ));
    }
}
