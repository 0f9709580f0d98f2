pub const APP_NAME: &str = "binspec";

/// Default model file looked up in the working directory.
pub const DEFAULT_MODEL_FILE: &str = "binspec.toml";

/// Overrides the model file path used by the CLI.
pub const MODEL_ENV: &str = "BINSPEC_MODEL";

/// Overrides `PATH` when searching for toolchain executables.
pub const TOOLCHAIN_PATH_ENV: &str = "BINSPEC_TOOLCHAIN_PATH";

/// Reason reported for binaries disabled through `set_buildable(false)`.
pub const EXPLICITLY_DISABLED: &str = "explicitly disabled";
