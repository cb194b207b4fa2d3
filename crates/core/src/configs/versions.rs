//! Pinned versions of third-party packages that generators register.
//!
//! Passed explicitly into every generator that installs packages, so there is
//! no process-wide version table to keep in sync.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyVersions {
    pub wiremock_rest_client: String,
    pub openapi_generator_cli: String,
}

impl Default for DependencyVersions {
    fn default() -> Self {
        Self {
            wiremock_rest_client: "1.10.0".to_string(),
            openapi_generator_cli: "2.4.26".to_string(),
        }
    }
}
