/// Reads an environment variable, treating unset, non-unicode and blank
/// values alike as absent.
pub fn read_env_trimmed(key: &str) -> Option<String> {
  std::env::var(key)
    .ok()
    .map(|value| value.trim().to_owned())
    .filter(|value| !value.is_empty())
}
