// src/render/mod.rs
// =============================================================================
// This module renders README Markdown into HTML.
//
// Submodules:
// - markdown: the generic Markdown -> HTML engine with a LinkHandler plug-in
// - collect: the LinkHandler that rewrites and records remote assets
//
// Rendering never touches the network. It only returns the HTML plus the
// list of assets that someone else (the packager) has to download.
// =============================================================================

mod collect;
mod markdown;

pub use collect::{render_readme, AssetPolicy};
