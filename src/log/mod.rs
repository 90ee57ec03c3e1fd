//! The `log` module configures the crate's logging. Logging records what the simulation is doing
//! (population construction, interventions, per-step event counts) and is not to be confused
//! with _reports_, which record model results.
//!
//! Code in this crate emits messages with the macros of the `log` facade, re-exported here:
//! `error!`, `warn!`, `info!`, `debug!` and `trace!`. Messages are printed to stdout through a
//! `log4rs` console appender once logging is enabled.
//!
//! Logging is _disabled_ by default. It can be enabled/disabled from code using the functions:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only log messages with priority at least `level`
//!
//! Per-module filtering is configured with `set_module_filter()` / `set_module_filters()` and
//! `remove_module_filter()`:
//!
//! ```rust
//! use contact_sim::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! // Enable `info` log messages globally...
//! set_log_level(LevelFilter::Info);
//! // ...but follow every transmission.
//! set_module_filter("contact_sim::transmission", LevelFilter::Trace);
//! ```
//!
//! `apply_log_level_spec()` accepts the same settings as a string, as passed on the command line:
//! `"info"` or `"contact_sim=debug,contact_sim::transmission=trace"`.
mod standard_logger;

use std::collections::hash_map::Entry;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

pub use log::{debug, error, info, trace, warn, LevelFilter};
use log4rs::Handle;

use crate::error::SimError;
use crate::HashMap;

// Logging disabled
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// Different log level filters can be applied to the log messages emitted from different modules
/// according to the module path (e.g. `"contact_sim::interventions"`). These are stored in the
/// global `LogConfiguration`.
#[derive(Debug, PartialEq)]
struct ModuleLogConfiguration {
    /// The module path this configuration applies to
    module: String,
    /// The maximum log level for this module path
    level: LevelFilter,
}

impl From<(&str, LevelFilter)> for ModuleLogConfiguration {
    fn from((module, level): (&str, LevelFilter)) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// Holds logging configuration. Its primary responsibility is to keep track of the filter levels
/// of modules and hold a handle to the global logger.
///
/// Because loggers are globally installed, only one instance of this struct should exist. The
/// public API are free functions which fetch the singleton and call the appropriate member
/// function.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// The "default" level filter for modules ("targets") without an explicitly set filter. A
    /// global filter level of `LevelFilter::Off` disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_configurations: HashMap<String, ModuleLogConfiguration>,
    /// Handle to the `log4rs` logger.
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            module_configurations: HashMap::default(),
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    pub(in crate::log) fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    /// Returns true if the configuration was mutated, false otherwise.
    fn insert_module_filter(&mut self, module: &str, level: LevelFilter) -> bool {
        match self.module_configurations.entry(module.to_string()) {
            Entry::Occupied(mut entry) => {
                let module_config = entry.get_mut();
                if module_config.level == level {
                    return false;
                }
                module_config.level = level;
            }

            Entry::Vacant(entry) => {
                entry.insert((module, level).into());
            }
        }
        true
    }

    pub(in crate::log) fn set_module_filters(&mut self, module_filters: &[(&str, LevelFilter)]) {
        let mut mutated: bool = false;
        for (module, level) in module_filters {
            mutated |= self.insert_module_filter(module, *level);
        }
        if mutated {
            self.set_config();
        }
    }

    pub(in crate::log) fn remove_module_filter(&mut self, module: &str) {
        if self.module_configurations.remove(module).is_some() {
            self.set_config();
        }
    }
}

// The public API

/// Enables the logger with no global level filter / full logging. Equivalent to
/// `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A global filter level of `LevelFilter::Off` disables logging.
pub fn set_log_level(level: LevelFilter) {
    get_log_configuration().set_log_level(level);
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    get_log_configuration().set_module_filters(&[(module_path, level_filter)]);
}

/// Removes a module-specific level filter for the given module path. The global level filter will
/// apply to the module.
pub fn remove_module_filter(module_path: &str) {
    get_log_configuration().remove_module_filter(module_path);
}

/// Sets the level filters for a set of modules. Use this instead of `set_module_filter()` to set
/// filters in bulk.
pub fn set_module_filters(module_filters: &[(&str, LevelFilter)]) {
    get_log_configuration().set_module_filters(module_filters);
}

/// A parsed `--log-level` argument.
#[derive(Debug, Default, PartialEq)]
pub struct LogLevelSpec {
    pub global: Option<LevelFilter>,
    pub modules: Vec<(String, LevelFilter)>,
}

/// Parses a comma separated list of `level` and `module=level` entries. Levels are
/// case-insensitive (`off`, `error`, `warn`, `info`, `debug`, `trace`).
pub fn parse_log_level_spec(spec: &str) -> Result<LogLevelSpec, SimError> {
    let parse_level = |level: &str| {
        level.trim().parse::<LevelFilter>().map_err(|_| {
            SimError::invalid_parameter("log level", level, "one of off, error, warn, info, debug, trace")
        })
    };

    let mut parsed = LogLevelSpec::default();
    for entry in spec.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        match entry.split_once('=') {
            Some((module, level)) => {
                parsed.modules.push((module.trim().to_string(), parse_level(level)?));
            }
            None => parsed.global = Some(parse_level(entry)?),
        }
    }
    Ok(parsed)
}

/// Parses and installs a `--log-level` argument. A spec that only names modules enables logging
/// for those modules and leaves every other module at the current global level.
pub fn apply_log_level_spec(spec: &str) -> Result<LogLevelSpec, SimError> {
    let parsed = parse_log_level_spec(spec)?;
    let mut configuration = get_log_configuration();
    let filters: Vec<(&str, LevelFilter)> = parsed
        .modules
        .iter()
        .map(|(module, level)| (module.as_str(), *level))
        .collect();
    for (module, level) in &filters {
        configuration.insert_module_filter(module, *level);
    }
    let global = parsed.global.unwrap_or(configuration.global_log_level);
    configuration.set_log_level(global);
    Ok(parsed)
}

/// Fetches a mutable reference to the global `LogConfiguration`.
fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Force logging tests to run serially for consistent behavior.
    static TEST_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

    #[test]
    fn test_set_log_level() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Trace);
        set_log_level(LevelFilter::Error);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Error);
            error!("test_set_log_level: global set to error");
            trace!("test_set_log_level: NOT EMITTED");
        }
        set_log_level(LevelFilter::Trace);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Trace);
            assert_eq!(log::max_level(), LevelFilter::Trace);
        }
        disable_logging();
        assert_eq!(get_log_configuration().global_log_level, LevelFilter::Off);
    }

    #[test]
    fn test_set_remove_module_filters() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Trace);

        let filters = [
            ("contact_sim::transmission", LevelFilter::Error),
            ("contact_sim::interventions", LevelFilter::Debug),
        ];
        set_module_filters(&filters);
        {
            let config = get_log_configuration();
            for (module_path, level) in &filters {
                assert_eq!(
                    config.module_configurations.get(*module_path),
                    Some(&((*module_path, *level).into()))
                );
            }
        }

        remove_module_filter("contact_sim::transmission");
        remove_module_filter("contact_sim::interventions");
        {
            let config = get_log_configuration();
            assert!(config
                .module_configurations
                .get("contact_sim::transmission")
                .is_none());
            assert!(config
                .module_configurations
                .get("contact_sim::interventions")
                .is_none());
        }
        disable_logging();
    }

    #[test]
    fn test_parse_log_level_spec() {
        assert_eq!(
            parse_log_level_spec("info").unwrap(),
            LogLevelSpec {
                global: Some(LevelFilter::Info),
                modules: Vec::new(),
            }
        );
        assert_eq!(
            parse_log_level_spec("warn, contact_sim::report=Off,contact_sim=TRACE").unwrap(),
            LogLevelSpec {
                global: Some(LevelFilter::Warn),
                modules: vec![
                    ("contact_sim::report".to_string(), LevelFilter::Off),
                    ("contact_sim".to_string(), LevelFilter::Trace),
                ],
            }
        );
        assert!(matches!(
            parse_log_level_spec("loud"),
            Err(SimError::InvalidParameter(_))
        ));
        assert!(parse_log_level_spec("contact_sim=verbose").is_err());
    }

    #[test]
    fn test_apply_log_level_spec() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        apply_log_level_spec("debug,contact_sim::stepper=off").unwrap();
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Debug);
            assert_eq!(
                config.module_configurations.get("contact_sim::stepper"),
                Some(&("contact_sim::stepper", LevelFilter::Off).into())
            );
        }
        remove_module_filter("contact_sim::stepper");
        disable_logging();
    }

    #[test]
    fn test_module_only_spec_keeps_global_level() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Warn);
        let parsed = apply_log_level_spec("contact_sim::report=debug").unwrap();
        assert_eq!(parsed.global, None);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Warn);
            assert_eq!(
                config.module_configurations.get("contact_sim::report"),
                Some(&("contact_sim::report", LevelFilter::Debug).into())
            );
        }
        remove_module_filter("contact_sim::report");
        disable_logging();
    }
}
