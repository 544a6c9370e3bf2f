//! Application configuration.
//!
//! Compile-time settings for the Filedrop frontend. `FILEDROP_API_BASE` is
//! read when the WASM bundle is built, so a deployment points the client at
//! its API without code changes.

/// API base URL, including the version prefix.
pub const API_BASE: &str = match option_env!("FILEDROP_API_BASE") {
    Some(base) => base,
    None => "http://localhost:8000/api/v1",
};

/// Page title shown in the header.
pub const APP_TITLE: &str = "File Upload Demo";

/// Value sent in `x-csrf-token` on uploads.
///
/// The API only checks that the header is present.
pub const CSRF_TOKEN: &str = "dev";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_has_no_trailing_slash() {
        assert!(!API_BASE.ends_with('/'));
        assert!(API_BASE.starts_with("http"));
    }
}
