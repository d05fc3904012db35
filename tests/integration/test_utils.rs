//! Shared test utilities for integration tests
//!
//! Serializes access to `DYNSCOPE_*` environment variables so config tests can
//! run in parallel with everything else.

use std::sync::Mutex;

/// Global mutex guarding process environment mutation across tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Saved values of the variables a test overrides
struct EnvState {
    saved: Vec<(String, Option<String>)>,
}

impl EnvState {
    fn capture(keys: &[&str]) -> Self {
        Self {
            saved: keys
                .iter()
                .map(|key| (key.to_string(), std::env::var(key).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (key, value) in self.saved {
            match value {
                Some(orig) => std::env::set_var(&key, orig),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Run `f` with the given environment variables set, restoring them afterwards.
///
/// # Example
/// ```ignore
/// with_env(&[("DYNSCOPE_LIMITS__MAX_SCOPE_DEPTH", "8")], || {
///     let config = ConfigLoader::load(None).unwrap();
///     assert_eq!(config.limits.max_scope_depth, 8);
/// });
/// ```
pub fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let keys: Vec<&str> = vars.iter().map(|(key, _)| *key).collect();
    let env_state = EnvState::capture(&keys);

    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    env_state.restore();

    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
