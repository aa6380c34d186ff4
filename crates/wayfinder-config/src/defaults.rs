use crate::logging::LogFormat;

/// Default log filter expression used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Extension to language mode pairs applied when no associations are configured.
pub const DEFAULT_LANGUAGE_ASSOCIATIONS: &[(&str, &str)] = &[
    ("rs", "rust"),
    ("py", "python"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("js", "javascript"),
    ("jsx", "javascript"),
];

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
