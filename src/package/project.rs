// src/package/project.rs
// =============================================================================
// A Project is one named repository we package, plus the settings that turn
// its name into URLs and paths.
//
// Example (defaults):
//   name            = "sylens"
//   repository URL  = "https://github.com/guerilla-di/sylens"
//   README URL      = "https://github.com/guerilla-di/sylens/raw/master/README.markdown"
//   output dir      = "site/scripts/sylens"
// =============================================================================

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://github.com/guerilla-di";
pub const DEFAULT_SITE_ROOT: &str = "site";
pub const DEFAULT_SUBPATH: &str = "scripts";
pub const DEFAULT_README_PATH: &str = "raw/master/README.markdown";

/// The rendered README is always written under this name.
pub const HTML_FILE_NAME: &str = "index.erb";

/// Where projects come from and where their packages go.
#[derive(Debug, Clone)]
pub struct PackagerConfig {
    /// Hosting URL that project names are appended to
    pub base_url: String,
    /// Root of the generated site
    pub site_root: PathBuf,
    /// Directory under the site root holding one folder per project
    pub subpath: String,
    /// Path of the README relative to the repository URL
    pub readme_path: String,
    /// URL prefixes trusted as asset hosts, on top of the repository itself
    pub extra_asset_prefixes: Vec<String>,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site_root: PathBuf::from(DEFAULT_SITE_ROOT),
            subpath: DEFAULT_SUBPATH.to_string(),
            readme_path: DEFAULT_README_PATH.to_string(),
            extra_asset_prefixes: Vec::new(),
        }
    }
}

/// A project identified by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repository_url(&self, config: &PackagerConfig) -> String {
        join_url(&config.base_url, &self.name)
    }

    pub fn readme_url(&self, config: &PackagerConfig) -> String {
        join_url(&self.repository_url(config), &config.readme_path)
    }

    // Where downloadable files live: the first segment of the README path
    // under the repository ("raw/master/README.markdown" -> "<repo>/raw").
    // Issue, tree and blob pages sit outside it.
    pub fn asset_root(&self, config: &PackagerConfig) -> String {
        let repository_url = self.repository_url(config);
        match config.readme_path.trim_start_matches('/').split_once('/') {
            Some((root, _)) if !root.is_empty() => join_url(&repository_url, root),
            _ => repository_url,
        }
    }

    pub fn output_directory(&self, config: &PackagerConfig) -> PathBuf {
        config.site_root.join(&config.subpath).join(&self.name)
    }
}

// Joins two URL pieces with exactly one '/' between them
fn join_url(base: &str, tail: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), tail.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_repository_url() {
        let config = PackagerConfig::default();
        assert_eq!(
            Project::new("foo").repository_url(&config),
            "https://github.com/guerilla-di/foo"
        );
    }

    #[test]
    fn test_repository_url_trailing_slash_base() {
        let config = PackagerConfig {
            base_url: "https://git.example.com/tools/".to_string(),
            ..PackagerConfig::default()
        };
        assert_eq!(
            Project::new("foo").repository_url(&config),
            "https://git.example.com/tools/foo"
        );
    }

    #[test]
    fn test_readme_url() {
        let config = PackagerConfig::default();
        assert_eq!(
            Project::new("sylens").readme_url(&config),
            "https://github.com/guerilla-di/sylens/raw/master/README.markdown"
        );
    }

    #[test]
    fn test_asset_root_follows_readme_path() {
        let config = PackagerConfig::default();
        assert_eq!(
            Project::new("sylens").asset_root(&config),
            "https://github.com/guerilla-di/sylens/raw"
        );

        let config = PackagerConfig {
            readme_path: "README.md".to_string(),
            ..PackagerConfig::default()
        };
        assert_eq!(
            Project::new("sylens").asset_root(&config),
            "https://github.com/guerilla-di/sylens"
        );
    }

    #[test]
    fn test_output_directory() {
        let config = PackagerConfig::default();
        assert_eq!(
            Project::new("foo").output_directory(&config),
            Path::new("site").join("scripts").join("foo")
        );
    }
}
