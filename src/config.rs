use std::env;

/// Returns the value of the named environment variable, or `default`
/// if it isn’t set.
pub fn get_variable_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

/// Returns whether the named environment variable is set to `1`.
pub fn get_flag(name: &str) -> bool {
    get_variable_or(name, "0") == "1"
}

/// Splits a comma-separated list, dropping blank entries.
///
/// ```
/// use listings::config::split_list;
/// assert_eq!(split_list(" a, b,,c "), vec!["a", "b", "c"]);
/// ```
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
