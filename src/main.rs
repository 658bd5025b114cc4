// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the HTTP client and packager settings
// 3. Package each project, one after another
// 4. Print the reports and exit with the proper code
//    (0 = all packaged, 1 = some projects failed with --keep-going, 2 = error)
//
// Rust concepts used:
// - async/await: our HTTP client (reqwest) is async, driven by tokio
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

mod cli;      // src/cli.rs - command-line parsing
mod package;  // src/package/ - fetch, render, download, write
mod render;   // src/render/ - Markdown -> HTML with asset rewriting

use clap::Parser;
use cli::Cli;
use package::{package_all, HttpFetcher, PackageError, PackageFetcher, PackageReport, Project};

use anyhow::Result;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every project packaged
//   Ok(1) = at least one project failed (only with --keep-going)
//   Err = a project failed, or setup went wrong
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let config = cli.packager_config();
    let fetcher = HttpFetcher::new(&cli.http_options())?;
    let projects: Vec<Project> = cli.names.iter().map(Project::new).collect();

    println!("📦 Packaging {} project(s) into {}", projects.len(), config.site_root.display());
    if cli.insecure {
        eprintln!("⚠️  TLS certificate verification is disabled");
    }

    if !cli.keep_going {
        let reports = package_all(&projects, &config, &fetcher).await?;
        print_reports(&reports, cli.json)?;
        return Ok(0);
    }

    // --keep-going: isolate each project so one failure doesn't stop the rest
    let mut reports = Vec::new();
    let mut failures: Vec<(String, PackageError)> = Vec::new();
    for project in projects {
        let name = project.name().to_string();
        match PackageFetcher::new(project, &config, &fetcher).package().await {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("❌ {}: {}", name, e);
                failures.push((name, e));
            }
        }
    }

    print_reports(&reports, cli.json)?;

    if failures.is_empty() {
        Ok(0)
    } else {
        eprintln!("\n{} project(s) failed:", failures.len());
        for (name, error) in &failures {
            eprintln!("   {}: {}", name, error);
        }
        Ok(1)
    }
}

// Prints the reports either as a summary or JSON
fn print_reports(reports: &[PackageReport], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(reports)?;
        println!("{}", json_output);
    } else {
        println!();
        println!("📊 Summary:");
        for report in reports {
            println!(
                "   {} -> {} ({} asset(s))",
                report.project,
                report.html_file.display(),
                report.assets.len()
            );
        }
    }
    Ok(())
}
