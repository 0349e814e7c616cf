use std::{cell::RefCell, env, rc::Rc};

use serde::{Deserialize, Serialize};

/// Runtime knobs. Every field has a default, so a partial JSON document or an
/// empty environment yields a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Warn when a class name is registered twice. The last declaration
    /// still wins.
    pub warn_on_redeclare: bool,
    /// Report non-signal callback errors to the diagnostics sink before they
    /// propagate out of the iteration engine.
    pub report_callback_errors: bool,
    /// Default `tracing` filter for the binary when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            warn_on_redeclare: false,
            report_callback_errors: true,
            log_filter: "warn".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Reads `EXTEND_WARN_REDECLARE`, `EXTEND_REPORT_ERRORS` and `EXTEND_LOG`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(flag) = env_flag("EXTEND_WARN_REDECLARE") {
            config.warn_on_redeclare = flag;
        }
        if let Some(flag) = env_flag("EXTEND_REPORT_ERRORS") {
            config.report_callback_errors = flag;
        }
        if let Ok(filter) = env::var("EXTEND_LOG") {
            config.log_filter = filter;
        }
        config
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<Rc<RuntimeConfig>>> = const { RefCell::new(None) };
}

struct ConfigGuard {
    previous: Option<Rc<RuntimeConfig>>,
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Runs `f` with `config` active on this thread.
pub fn with_config<R>(config: RuntimeConfig, f: impl FnOnce() -> R) -> R {
    let previous = ACTIVE.with(|slot| slot.borrow_mut().replace(Rc::new(config)));
    let _guard = ConfigGuard { previous };
    f()
}

/// Configuration active on this thread, or the default one.
pub fn active() -> Rc<RuntimeConfig> {
    ACTIVE
        .with(|slot| slot.borrow().clone())
        .unwrap_or_else(|| Rc::new(RuntimeConfig::default()))
}
