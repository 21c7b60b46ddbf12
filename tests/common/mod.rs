#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// Serializes tests that read or mutate process environment variables.
pub static ENV_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// `Authorization` value for username `user` and password `pass`.
pub const BASIC_USER_PASS: &str = "Basic dXNlcjpwYXNz";

/// Route client logs to the test harness. Set `RUST_LOG=watson_sdk=debug`
/// to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Set `vars` for the duration of `f`, restoring the previous values after.
///
/// Callers must hold [`ENV_LOCK`].
pub fn with_env<T>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> T) -> T {
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(k, _)| (k.to_string(), std::env::var(k).ok()))
        .collect();
    for (key, value) in vars {
        match value {
            Some(v) => unsafe { std::env::set_var(key, v) },
            None => unsafe { std::env::remove_var(key) },
        }
    }
    let out = f();
    for (key, value) in saved {
        match value {
            Some(v) => unsafe { std::env::set_var(&key, v) },
            None => unsafe { std::env::remove_var(&key) },
        }
    }
    out
}
