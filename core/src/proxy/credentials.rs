//! Per-request upstream credentials

/// Values attached to every upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCredentials {
    pub api_key: String,
    pub language: String,
    pub region: String,
}

impl UpstreamCredentials {
    /// Build credentials for one request.
    ///
    /// An absent language falls back to `default_language`. The region is
    /// the second `-` separated token of the language (`en-US` -> `US`),
    /// or `default_region` when there is none.
    pub fn derive(
        api_key: &str,
        requested_language: Option<&str>,
        default_language: &str,
        default_region: &str,
    ) -> Self {
        let language = requested_language.unwrap_or(default_language);
        let region = language
            .split('-')
            .nth(1)
            .filter(|r| !r.is_empty())
            .unwrap_or(default_region);

        Self {
            api_key: api_key.to_string(),
            language: language.to_string(),
            region: region.to_string(),
        }
    }

    pub fn as_params(&self) -> [(&'static str, &str); 3] {
        [
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
            ("region", self.region.as_str()),
        ]
    }
}
