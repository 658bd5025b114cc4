// src/package/mod.rs
// =============================================================================
// This module packages a project's README into the local site directory.
//
// Submodules:
// - project: project names -> repository URL, README URL, output directory
// - fetch: the Fetcher trait and its reqwest-backed implementation
// - packager: the fetch -> render -> download -> write pipeline
// - error: PackageError, the ways a run can fail
// =============================================================================

mod error;
mod fetch;
mod packager;
mod project;

pub use error::PackageError;
pub use fetch::{HttpFetcher, HttpOptions};
pub use packager::{package_all, PackageFetcher, PackageReport};
pub use project::{
    PackagerConfig, Project, DEFAULT_BASE_URL, DEFAULT_README_PATH, DEFAULT_SITE_ROOT,
    DEFAULT_SUBPATH,
};
