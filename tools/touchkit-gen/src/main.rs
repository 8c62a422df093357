//! Regenerates `catalog/src/generated.rs` from the LocalAuthentication header.

mod ast;
mod emit;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;

use crate::ast::AstNode;

/// Deprecated aliases and constants unavailable on macOS. clang's JSON dump
/// carries no availability information, so they are listed by hand.
const IGNORED_ERRORS: &[&str] = &[
    "LAErrorTouchIDNotAvailable",
    "LAErrorTouchIDNotEnrolled",
    "LAErrorTouchIDLockout",
    "LAErrorWatchNotAvailable",
];

const IGNORED_POLICIES: &[&str] = &[
    "LAPolicyDeviceOwnerAuthenticationWithWristDetection",
    "LAPolicyDeviceOwnerAuthenticationWithWatch",
    "LAPolicyDeviceOwnerAuthenticationWithBiometricsOrWatch",
    "LAPolicyDeviceOwnerAuthenticationWithCompanion",
    "LAPolicyDeviceOwnerAuthenticationWithBiometricsOrCompanion",
];

#[derive(Parser)]
#[command(name = "touchkit-gen")]
#[command(about = "Generate the LocalAuthentication error and policy catalogs", long_about = None)]
struct Cli {
    /// Path of the generated Rust module
    #[arg(short, long)]
    output: PathBuf,

    /// Framework header to import
    #[arg(long, default_value = "LocalAuthentication/LocalAuthentication.h")]
    header: String,

    /// clang executable used to dump the AST
    #[arg(long, default_value = "clang")]
    clang: String,

    /// Read a pre-dumped JSON AST instead of running clang
    #[arg(long)]
    ast: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json = match &cli.ast {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => ast::dump_ast(&cli.clang, &cli.header)?,
    };
    let root: AstNode = serde_json::from_slice(&json).context("Failed to parse AST JSON")?;

    let enums = ast::parse_enums(&root, &["LAError", "LAPolicy"])?;
    let errors = emit::convert(&enums["LAError"], "LAError", IGNORED_ERRORS)?;
    let policies = emit::convert(&enums["LAPolicy"], "LAPolicy", IGNORED_POLICIES)?;

    let source = emit::render(&cli.header, &errors, &policies)?;
    std::fs::write(&cli.output, source)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("{} {}", "Generated".green().bold(), cli.output.display());
    println!("  LAError: {} constants", errors.len());
    println!("  LAPolicy: {} constants", policies.len());
    Ok(())
}
