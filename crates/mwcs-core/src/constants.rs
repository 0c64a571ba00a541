/// Separator placed between labels when pre-nodes are merged or extracted.
pub const DEFAULT_LABEL_SEPARATOR: &str = "\t";

/// Project configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "mwcs.toml";

/// Log level used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
