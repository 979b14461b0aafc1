//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Common environment variable names.
pub mod vars {
    /// Keyward home directory override.
    pub const KEYWARD_HOME: &str = "KEYWARD_HOME";

    /// Keyward config file override.
    pub const KEYWARD_CONFIG: &str = "KEYWARD_CONFIG";

    /// Keyward log filter.
    pub const KEYWARD_LOG: &str = "KEYWARD_LOG";

    /// Overrides the keychain service identifier.
    pub const KEYWARD_SERVICE_ID: &str = "KEYWARD_SERVICE_ID";

    /// Overrides the shared keychain access group. `none` disables it.
    pub const KEYWARD_GROUP_ID: &str = "KEYWARD_GROUP_ID";
}
