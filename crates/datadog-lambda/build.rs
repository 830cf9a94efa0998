// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Build script for datadog-lambda.
//!
//! Records the compiler version as `DD_LAMBDA_RUSTC_VERSION` so enhanced metrics
//! can report the runtime the function was built with (`runtime:Rust 1.82.0`).

use std::env;
use std::process::Command;

fn main() {
    // Cargo always provides RUSTC to build scripts, fall back to PATH otherwise
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|stdout| stdout.split_whitespace().nth(1).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=DD_LAMBDA_RUSTC_VERSION={version}");
    println!("cargo:rerun-if-env-changed=RUSTC");
}
