// src/package/packager.rs
// =============================================================================
// This module runs the whole pipeline for one project.
//
// How it works:
// 1. Build the README URL from the project name
// 2. Download the README (failure = stop right away, nothing written)
// 3. Render it, collecting the list of remote assets
// 4. Download every asset, one after another, in document order
// 5. Create the output directory
// 6. Write the HTML (index.erb)
// 7. Write every asset under its basename
//
// All downloads finish before anything touches the disk, so a failed asset
// never leaves a fresh index.erb behind. A failure while writing can still
// leave some files written (there is no rollback).
//
// Rust concepts:
// - Generics: PackageFetcher works with any Fetcher (real HTTP or a test fake)
// - map_err: turning a low-level error into our own PackageError
// =============================================================================

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::error::PackageError;
use super::fetch::Fetcher;
use super::project::{PackagerConfig, Project, HTML_FILE_NAME};
use crate::render::{render_readme, AssetPolicy};

// A downloaded asset waiting to be written
struct FetchedAsset {
    local_name: String,
    bytes: Vec<u8>,
}

/// What a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub project: String,
    pub output_directory: PathBuf,
    pub html_file: PathBuf,
    /// Asset file names, in the order they were written
    pub assets: Vec<String>,
}

/// Packages one project using `fetcher` for all network access.
pub struct PackageFetcher<'a, F: Fetcher> {
    project: Project,
    config: &'a PackagerConfig,
    fetcher: &'a F,
}

impl<'a, F: Fetcher> PackageFetcher<'a, F> {
    pub fn new(project: Project, config: &'a PackagerConfig, fetcher: &'a F) -> Self {
        Self { project, config, fetcher }
    }

    pub fn repository_url(&self) -> String {
        self.project.repository_url(self.config)
    }

    pub fn output_directory(&self) -> PathBuf {
        self.project.output_directory(self.config)
    }

    // The repository's raw-content root is always trusted
    fn asset_policy(&self) -> Result<AssetPolicy, PackageError> {
        let asset_root = self.project.asset_root(self.config);
        let prefixes = std::iter::once(asset_root.as_str())
            .chain(self.config.extra_asset_prefixes.iter().map(String::as_str));
        AssetPolicy::new(prefixes).map_err(PackageError::Policy)
    }

    // Runs the full pipeline
    //
    // Returns: PackageReport describing what was written
    pub async fn package(&self) -> Result<PackageReport, PackageError> {
        let policy = self.asset_policy()?;

        let readme_url = self.project.readme_url(self.config);
        println!("📥 Fetching README: {}", readme_url);

        let markdown = self
            .fetcher
            .fetch_text(&readme_url)
            .await
            .map_err(|source| PackageError::Readme { url: readme_url.clone(), source })?;

        let rendered = render_readme(&markdown, &policy);
        println!("   {} asset(s) referenced", rendered.downloads.len());

        let mut assets = Vec::with_capacity(rendered.downloads.len());
        for reference in &rendered.downloads {
            let local_name = reference.local_name();
            if matches!(local_name, "" | "." | "..") {
                return Err(PackageError::AssetName {
                    reference: reference.as_str().to_string(),
                });
            }

            let url = reference.fetch_url();
            println!("   ⬇️  {}", url);
            let bytes = self
                .fetcher
                .fetch_bytes(&url)
                .await
                .map_err(|source| PackageError::Asset { url: url.clone(), source })?;

            assets.push(FetchedAsset { local_name: local_name.to_string(), bytes });
        }

        let output_directory = self.output_directory();
        tokio::fs::create_dir_all(&output_directory)
            .await
            .map_err(|source| PackageError::Io { path: output_directory.clone(), source })?;

        let html_file = output_directory.join(HTML_FILE_NAME);
        write_file(&html_file, rendered.html.as_bytes()).await?;

        let mut written = Vec::with_capacity(assets.len());
        for asset in assets {
            write_file(&output_directory.join(&asset.local_name), &asset.bytes).await?;
            written.push(asset.local_name);
        }

        println!("✅ Packaged {} into {}", self.project.name(), output_directory.display());

        Ok(PackageReport {
            project: self.project.name().to_string(),
            output_directory,
            html_file,
            assets: written,
        })
    }
}

// Writes (or overwrites) a file
async fn write_file(path: &Path, contents: &[u8]) -> Result<(), PackageError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| PackageError::Io { path: path.to_path_buf(), source })
}

// Packages several projects, one after another
//
// Stops at the first failure: projects after it are not attempted.
// Callers that want to keep going should loop over PackageFetcher themselves.
pub async fn package_all<F: Fetcher>(
    projects: &[Project],
    config: &PackagerConfig,
    fetcher: &F,
) -> Result<Vec<PackageReport>, PackageError> {
    let mut reports = Vec::with_capacity(projects.len());
    for project in projects {
        let report = PackageFetcher::new(project.clone(), config, fetcher).package().await?;
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const README_URL: &str = "https://github.com/guerilla-di/sylens/raw/master/README.markdown";
    const ASSET_BASE: &str = "https://github.com/guerilla-di/sylens/raw/master/";

    // In-memory Fetcher: serves canned bodies and records every request
    #[derive(Default)]
    struct FakeFetcher {
        bodies: HashMap<String, Vec<u8>>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn with(mut self, url: &str, body: &[u8]) -> Self {
            self.bodies.insert(url.to_string(), body.to_vec());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl Fetcher for FakeFetcher {
        async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
            let bytes = self.fetch_bytes(url).await?;
            Ok(String::from_utf8(bytes)?)
        }

        async fn fetch_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>> {
            self.requests.borrow_mut().push(url.to_string());
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow!("Failed to fetch {}: HTTP 404 Not Found", url))
        }
    }

    fn config_in(dir: &Path) -> PackagerConfig {
        PackagerConfig {
            site_root: dir.to_path_buf(),
            ..PackagerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_package_writes_html_and_assets() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let readme = format!(
            "# SyLens\n\nSee [Nuke](https://www.foundry.com).\n\n![Shot]({}shot.png)\n",
            ASSET_BASE
        );
        let fetcher = FakeFetcher::default()
            .with(README_URL, readme.as_bytes())
            .with(&format!("{}shot.png", ASSET_BASE), b"PNGDATA");

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        let report = packager.package().await.unwrap();

        let out = tmp.path().join("scripts").join("sylens");
        assert_eq!(report.output_directory, out);
        assert_eq!(report.assets, vec!["shot.png".to_string()]);

        let html = std::fs::read_to_string(out.join("index.erb")).unwrap();
        assert!(html.contains("<a href=\"https://www.foundry.com\">Nuke</a>"));
        assert!(html.contains("src=\"shot.png\""));
        assert!(html.contains("max-width: 912px"));
        assert_eq!(std::fs::read(out.join("shot.png")).unwrap(), b"PNGDATA");
    }

    #[tokio::test]
    async fn test_readme_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let fetcher = FakeFetcher::default();

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        let err = packager.package().await.unwrap_err();

        assert!(matches!(err, PackageError::Readme { .. }));
        assert_eq!(fetcher.requests(), vec![README_URL.to_string()]);
        assert!(!tmp.path().join("scripts").join("sylens").exists());
    }

    #[tokio::test]
    async fn test_asset_failure_names_url_and_skips_html() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let missing = format!("{}missing.png", ASSET_BASE);
        let readme = format!("![gone]({})", missing);
        let fetcher = FakeFetcher::default().with(README_URL, readme.as_bytes());

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        let err = packager.package().await.unwrap_err();

        assert!(matches!(err, PackageError::Asset { .. }));
        assert!(err.to_string().contains(&missing));
        assert!(!tmp.path().join("scripts").join("sylens").join("index.erb").exists());
    }

    #[tokio::test]
    async fn test_space_encoded_for_fetch_not_for_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let readme = format!("![shot](<{}my shot.png>)", ASSET_BASE);
        let encoded = format!("{}my%20shot.png", ASSET_BASE);
        let fetcher = FakeFetcher::default()
            .with(README_URL, readme.as_bytes())
            .with(&encoded, b"bytes");

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        packager.package().await.unwrap();

        assert_eq!(fetcher.requests(), vec![README_URL.to_string(), encoded]);
        let out = tmp.path().join("scripts").join("sylens");
        assert_eq!(std::fs::read(out.join("my shot.png")).unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_duplicate_assets_fetched_per_occurrence() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let asset = format!("{}a.png", ASSET_BASE);
        let readme = format!("![one]({0})\n\n![two]({0})\n", asset);
        let fetcher = FakeFetcher::default()
            .with(README_URL, readme.as_bytes())
            .with(&asset, b"A");

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        let report = packager.package().await.unwrap();

        assert_eq!(fetcher.requests(), vec![README_URL.to_string(), asset.clone(), asset]);
        assert_eq!(report.assets, vec!["a.png".to_string(), "a.png".to_string()]);
    }

    #[tokio::test]
    async fn test_rerun_overwrites_previous_output() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let out = tmp.path().join("scripts").join("sylens");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("index.erb"), "stale").unwrap();

        let fetcher = FakeFetcher::default().with(README_URL, b"fresh");
        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        packager.package().await.unwrap();

        let html = std::fs::read_to_string(out.join("index.erb")).unwrap();
        assert_eq!(html, "<p>fresh</p>\n");
    }

    #[tokio::test]
    async fn test_repository_pages_not_downloaded() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let readme = "\
[issues](https://github.com/guerilla-di/sylens/issues)
[tree](https://github.com/guerilla-di/sylens/tree/master)
";
        let fetcher = FakeFetcher::default().with(README_URL, readme.as_bytes());

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        let report = packager.package().await.unwrap();

        assert!(report.assets.is_empty());
        assert_eq!(fetcher.requests(), vec![README_URL.to_string()]);
        let html = std::fs::read_to_string(report.html_file).unwrap();
        assert!(html.contains("href=\"https://github.com/guerilla-di/sylens/issues\""));
        assert!(html.contains("href=\"https://github.com/guerilla-di/sylens/tree/master\""));
    }

    #[tokio::test]
    async fn test_dot_dot_asset_name_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let readme = format!("[up]({}master/..)", ASSET_BASE);
        let fetcher = FakeFetcher::default().with(README_URL, readme.as_bytes());

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        let err = packager.package().await.unwrap_err();

        assert!(matches!(err, PackageError::AssetName { .. }));
        assert_eq!(fetcher.requests(), vec![README_URL.to_string()]);
        assert!(!tmp.path().join("scripts").join("sylens").exists());
    }

    #[tokio::test]
    async fn test_dot_asset_name_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let readme = format!("[here]({}master/.)", ASSET_BASE);
        let fetcher = FakeFetcher::default().with(README_URL, readme.as_bytes());

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        let err = packager.package().await.unwrap_err();

        assert!(matches!(err, PackageError::AssetName { .. }));
        assert!(!tmp.path().join("scripts").join("sylens").exists());
    }

    #[tokio::test]
    async fn test_bad_asset_prefix_fails_before_fetching() {
        let tmp = tempfile::tempdir().unwrap();
        let config = PackagerConfig {
            extra_asset_prefixes: vec!["not a url".to_string()],
            ..config_in(tmp.path())
        };
        let fetcher = FakeFetcher::default().with(README_URL, b"hello");

        let packager = PackageFetcher::new(Project::new("sylens"), &config, &fetcher);
        let err = packager.package().await.unwrap_err();

        assert!(matches!(err, PackageError::Policy(_)));
        assert!(fetcher.requests().is_empty());
        assert!(!tmp.path().join("scripts").join("sylens").exists());
    }

    #[tokio::test]
    async fn test_package_all_stops_at_first_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let fetcher = FakeFetcher::default().with(README_URL, b"hello");
        let projects = vec![
            Project::new("sylens"),
            Project::new("missing"),
            Project::new("never-reached"),
        ];

        let err = package_all(&projects, &config, &fetcher).await.unwrap_err();

        assert!(matches!(err, PackageError::Readme { .. }));
        assert!(tmp.path().join("scripts").join("sylens").join("index.erb").exists());
        assert!(!fetcher
            .requests()
            .iter()
            .any(|url| url.contains("never-reached")));
    }

    #[test]
    fn test_repository_url_and_output_directory() {
        let config = PackagerConfig::default();
        let fetcher = FakeFetcher::default();
        let packager = PackageFetcher::new(Project::new("foo"), &config, &fetcher);
        assert_eq!(packager.repository_url(), "https://github.com/guerilla-di/foo");
        assert_eq!(packager.output_directory(), Path::new("site/scripts/foo"));
    }
}
