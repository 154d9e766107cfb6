// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use tagweave::export::load_export;
use tagweave::graph::{BuildOptions, GraphBuilder};
use tagweave::model::{EntityKind, EntityRef};

/// Parse a `kind:id` root argument, e.g. `tag:12` or `template:195`.
fn parse_root(arg: &str) -> Result<EntityRef> {
    let (kind, id) = arg
        .split_once(':')
        .with_context(|| format!("root '{arg}' is not of the form kind:id"))?;
    let kind = match kind {
        "tag" => EntityKind::Tag,
        "trigger" => EntityKind::Trigger,
        "variable" => EntityKind::Variable,
        "template" => EntityKind::Template,
        other => bail!("unknown entity kind '{other}' in root '{arg}'"),
    };
    if id.is_empty() {
        bail!("root '{arg}' has an empty ID");
    }
    Ok(EntityRef::new(kind, id))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut reverse_tracking = false;
    let mut positional: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "--reverse-tracking" => reverse_tracking = true,
            other => positional.push(other),
        }
    }

    if positional.len() < 2 {
        eprintln!("Usage: {} <export.json> <kind:id> [kind:id ...] [--reverse-tracking]", args[0]);
        eprintln!("Example: {} container.json tag:12 tag:14", args[0]);
        std::process::exit(1);
    }

    let export = load_export(positional[0])
        .with_context(|| format!("loading export '{}'", positional[0]))?;
    let roots: Vec<EntityRef> = positional[1..]
        .iter()
        .map(|arg| parse_root(arg))
        .collect::<Result<_>>()?;

    println!("📦 Container {} ({} entities)", export.container_id, export.entities.len());

    let mut builder = GraphBuilder::new(BuildOptions {
        reverse_tracking,
        container_id: (!export.container_id.is_empty()).then(|| export.container_id.clone()),
        ..BuildOptions::default()
    });
    let graph = builder.build_from_pool(&export.entities, &roots);

    println!(
        "🕸️  Graph from {} ('{}'): {} nodes",
        graph.root, graph.root_name, graph.len()
    );
    for kind in [
        EntityKind::Template,
        EntityKind::Variable,
        EntityKind::Trigger,
        EntityKind::Tag,
    ] {
        let count = graph.nodes().filter(|n| n.kind == kind).count();
        if count > 0 {
            println!("   {count} {kind}(s)");
        }
    }

    println!("\nCreation order:");
    for (i, node_ref) in graph.creation_order.iter().enumerate() {
        let name = graph
            .get(node_ref)
            .map(|n| n.name.as_str())
            .unwrap_or_default();
        let flag = if graph.recovered.contains(node_ref) {
            "  ⚠ recovered"
        } else {
            ""
        };
        println!("  {:>3}. {} '{}'{}", i + 1, node_ref, name, flag);
    }

    Ok(())
}
