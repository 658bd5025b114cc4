// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are no subcommands: you list the project names to package and,
// optionally, tweak where they come from and where they go.
//
// Example:
//   readme-packager sylens tracksperanto --site-root public --json
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::package::{
    HttpOptions, PackagerConfig, DEFAULT_BASE_URL, DEFAULT_README_PATH, DEFAULT_SITE_ROOT,
    DEFAULT_SUBPATH,
};

#[derive(Parser, Debug)]
#[command(
    name = "readme-packager",
    version = "0.1.0",
    about = "Package a project's README and its assets into a local site directory",
    long_about = "readme-packager downloads each project's README, renders it to HTML, \
                  downloads the images and files it references from the project's repository, \
                  and writes everything to <site-root>/scripts/<project>/."
)]
pub struct Cli {
    /// Project names to package, processed in order
    #[arg(default_value = "sylens")]
    pub names: Vec<String>,

    /// Hosting URL that project names are appended to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Root directory of the generated site
    #[arg(long, default_value = DEFAULT_SITE_ROOT)]
    pub site_root: PathBuf,

    /// Directory under the site root that holds one folder per project
    #[arg(long, default_value = DEFAULT_SUBPATH)]
    pub subpath: String,

    /// README location relative to the repository URL
    #[arg(long, default_value = DEFAULT_README_PATH)]
    pub readme_path: String,

    /// Extra URL prefix whose links count as downloadable assets
    ///
    /// The project's own repository URL is always trusted.
    /// Can be repeated: --asset-prefix https://a --asset-prefix https://b
    #[arg(long = "asset-prefix", value_name = "URL")]
    pub asset_prefixes: Vec<String>,

    /// Don't verify TLS certificates (applies to this tool's requests only)
    #[arg(long)]
    pub insecure: bool,

    /// Give up on a request after this many seconds (default: wait forever)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Keep packaging the remaining projects when one fails
    #[arg(long)]
    pub keep_going: bool,

    /// Output run reports in JSON format
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn packager_config(&self) -> PackagerConfig {
        PackagerConfig {
            base_url: self.base_url.clone(),
            site_root: self.site_root.clone(),
            subpath: self.subpath.clone(),
            readme_path: self.readme_path.clone(),
            extra_asset_prefixes: self.asset_prefixes.clone(),
        }
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            insecure: self.insecure,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}
