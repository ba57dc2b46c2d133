//! URL helpers for scoped and unscoped platform endpoints

/// Builds endpoint URLs from the platform base URL and application id.
///
/// Pure string building; no validation beyond trimming slashes.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
    application_id: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>, application_id: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            application_id: application_id.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// `<base>/api/v1/applications/<app_id>/<path>`
    pub fn scoped(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/api/v1/applications/{}/{path}",
            self.base_url, self.application_id
        )
    }

    /// `<base>/<path>`. A base already ending in `/api` absorbs a leading
    /// `api/` in `path`, so both `https://x` and `https://x/api` work.
    pub fn unscoped(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match path.strip_prefix("api/") {
            Some(rest) if self.base_url.ends_with("/api") => {
                format!("{}/{rest}", self.base_url)
            }
            _ => format!("{}/{path}", self.base_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_url_includes_application() {
        let endpoints = Endpoints::new("https://auth.example.com/", "app_123");
        assert_eq!(
            endpoints.scoped("/users/token/refresh"),
            "https://auth.example.com/api/v1/applications/app_123/users/token/refresh"
        );
    }

    #[test]
    fn unscoped_url_strips_leading_slashes() {
        let endpoints = Endpoints::new("https://auth.example.com", "app_123");
        assert_eq!(
            endpoints.unscoped("//oauth/token"),
            "https://auth.example.com/oauth/token"
        );
    }

    #[test]
    fn base_ending_in_api_is_not_doubled_for_unscoped() {
        let endpoints = Endpoints::new("https://auth.example.com/api", "app_123");
        assert_eq!(
            endpoints.unscoped("api/v1/health"),
            "https://auth.example.com/api/v1/health"
        );
        // Paths not starting with api/ are appended as-is
        assert_eq!(
            endpoints.unscoped("oauth/token"),
            "https://auth.example.com/api/oauth/token"
        );
    }

    #[test]
    fn scoped_url_always_adds_api_prefix() {
        let endpoints = Endpoints::new("https://auth.example.com/api/", "app_123");
        assert_eq!(
            endpoints.scoped("users"),
            "https://auth.example.com/api/api/v1/applications/app_123/users"
        );
    }
}
