// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use std::process::Command;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    // Supply the commit as a compile-time environment variable when available.
    if let Ok(output) = Command::new("git").args(["rev-parse", "HEAD"]).output() {
        if output.status.success() {
            let git_hash = String::from_utf8(output.stdout)?;
            println!("cargo:rustc-env=GIT_HASH={}", git_hash.trim());
        }
    }

    Ok(())
}
