// src/render/collect.rs
// =============================================================================
// This module decides which README links are "remote assets" and rewrites them.
//
// A remote asset is a file (screenshot, PDF, ...) hosted next to the project's
// source that we want to download and store beside the rendered HTML.
//
// Classification rule:
// - A target is an asset ONLY if it is an absolute URL that starts with one of
//   the trusted prefixes in the AssetPolicy (scheme, host and path prefix)
// - Everything else (relative paths, anchors, mailto:, other hosts) is
//   external and passes through unchanged
//
// Assets are rewritten to their basename ("https://host/a/b/shot.png" ->
// "shot.png") and recorded so the packager can fetch them later.
// =============================================================================

use anyhow::{anyhow, Result};
use url::Url;

use super::markdown::{href_attr, render_with, text_attr, LinkHandler};

/// Images never render wider than this (pixels).
pub const IMAGE_MAX_WIDTH: u32 = 912;

/// A remote asset exactly as it appeared in the Markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference(String);

impl AssetReference {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // The final path segment, used both as the file name on disk and as the
    // rewritten reference in the HTML.
    //
    // Example:
    //   "https://github.com/o/p/raw/master/my shot.png?raw=true" -> "my shot.png"
    pub fn local_name(&self) -> &str {
        let path = self.0.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
        path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
    }

    /// The URL to request: literal spaces become `%20`.
    pub fn fetch_url(&self) -> String {
        self.0.replace(' ', "%20")
    }
}

/// The allow-list of URL prefixes whose targets count as remote assets.
#[derive(Debug, Clone)]
pub struct AssetPolicy {
    trusted: Vec<Url>,
}

impl AssetPolicy {
    // Builds a policy from URL prefixes
    //
    // Each prefix is treated as a directory: "https://github.com/o/p" trusts
    // "https://github.com/o/p/raw/..." but not "https://github.com/o/p-fork/...".
    //
    // Returns an error if a prefix isn't an absolute URL with a host
    pub fn new<I, S>(prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trusted = Vec::new();
        for prefix in prefixes {
            let prefix = prefix.as_ref();
            let mut url = Url::parse(prefix)
                .map_err(|e| anyhow!("Invalid asset prefix '{}': {}", prefix, e))?;

            if url.host_str().is_none() {
                return Err(anyhow!("Asset prefix has no host: {}", prefix));
            }

            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            trusted.push(url);
        }
        Ok(Self { trusted })
    }

    pub fn is_remote_asset(&self, target: &str) -> bool {
        let url = match Url::parse(target) {
            Ok(url) => url,
            // Relative paths and garbage are never assets
            Err(_) => return false,
        };

        self.trusted.iter().any(|prefix| {
            url.scheme() == prefix.scheme()
                && url.host_str() == prefix.host_str()
                && url.port_or_known_default() == prefix.port_or_known_default()
                && url.path().starts_with(prefix.path())
        })
    }
}

/// The output of one render pass.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub html: String,
    /// Assets in the order they were encountered, duplicates included.
    pub downloads: Vec<AssetReference>,
}

// LinkHandler that rewrites trusted asset URLs and remembers them
struct AssetCollector<'p> {
    policy: &'p AssetPolicy,
    downloads: Vec<AssetReference>,
}

impl AssetCollector<'_> {
    fn rewrite(&mut self, target: &str) -> String {
        if !self.policy.is_remote_asset(target) {
            return target.to_string();
        }
        let reference = AssetReference::new(target);
        let local = reference.local_name().to_string();
        self.downloads.push(reference);
        local
    }
}

impl LinkHandler for AssetCollector<'_> {
    fn render_link(&mut self, target: &str, title: &str, text_html: &str) -> String {
        let href = self.rewrite(target);
        format!("<a href=\"{}\"{}>{}</a>", href_attr(&href), title_attr(title), text_html)
    }

    fn render_image(&mut self, target: &str, title: &str, alt: &str) -> String {
        let src = self.rewrite(target);
        format!(
            "<img style=\"max-width: {}px\" src=\"{}\"{} alt=\"{}\" />",
            IMAGE_MAX_WIDTH,
            href_attr(&src),
            title_attr(title),
            text_attr(alt)
        )
    }
}

// ` title="..."`, or nothing when the Markdown gave no title
fn title_attr(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", text_attr(title))
    }
}

// Renders a README and collects every remote asset it references
//
// Parameters:
//   markdown: the README text
//   policy: which URLs count as remote assets
//
// Returns: RenderResult with the HTML and the download list
pub fn render_readme(markdown: &str, policy: &AssetPolicy) -> RenderResult {
    let mut collector = AssetCollector { policy, downloads: Vec::new() };
    let html = render_with(markdown, &mut collector);
    RenderResult { html, downloads: collector.downloads }
}
