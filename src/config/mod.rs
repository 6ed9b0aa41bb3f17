// ABOUTME: Config resolution — collapses namespace/endpoint/tool-override layers into one view.
// ABOUTME: Re-exports the pure resolve function and the caching, single-flight resolver service.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

mod resolve;
mod resolver;

pub use resolve::resolve;
pub use resolver::{ConfigResolver, ResolverConfig};
