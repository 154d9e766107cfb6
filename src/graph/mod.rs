// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency-graph construction.
//!
//! [`GraphBuilder`] discovers everything a root selection transitively
//! depends on and hands the node set to the ordering pass; the result is a
//! [`DependencyGraph`] whose `creation_order` lists every node with
//! dependencies first.

mod builder;
mod node;

pub use builder::{BuildOptions, GraphBuilder};
pub use node::{DependencyGraph, DependencyNode};

#[cfg(test)]
mod integration_tests;
