//! Terminal rendering of a loaded descriptor.

use std::path::Path;
use toolchain_config::ConfigDescriptor;

const RULE: &str = "════════════════════════════════════════════════════════════════";

/// Render the resolved configuration as a boxed summary. Project directories
/// are shown anchored at `root`.
pub fn render(config: &ConfigDescriptor, root: &Path) -> String {
    let (default_name, _) = config.default_network();
    let optimizer = config.optimizer();
    let paths = config.project_paths(root);

    let mut lines = vec![
        format!("╔{RULE}╗"),
        format!("║{:^64}║", "TOOLCHAIN CONFIGURATION RESOLVED"),
        format!("╚{RULE}╝"),
        format!("  Compiler:            {}", config.compiler_version()),
    ];

    if optimizer.enabled {
        lines.push(format!("  Optimizer:           enabled ({} runs)", optimizer.runs));
    } else {
        lines.push("  Optimizer:           disabled".to_string());
    }
    lines.push(format!("  Default Network:     {default_name}"));

    if config.plugins().is_empty() {
        lines.push("  Plugins:             (none)".to_string());
    } else {
        lines.push(format!("  Plugins:             {}", config.plugins().join(", ")));
    }

    lines.push(format!("  Sources:             {}", paths.sources.display()));
    lines.push(format!("  Artifacts:           {}", paths.artifacts.display()));

    lines.push("  Networks:".to_string());
    for (name, params) in config.networks() {
        let chain = params
            .chain_id
            .map(|id| format!(" (chain {id})"))
            .unwrap_or_default();
        lines.push(format!("    {name:<18} {}{chain}", params.endpoint()));
    }
    lines.push(format!("╚{RULE}╝"));

    lines.join("\n") + "\n"
}

/// One line per profile, the default marked with `*`.
pub fn network_list(config: &ConfigDescriptor) -> String {
    let (default_name, _) = config.default_network();
    config
        .network_names()
        .map(|name| {
            let marker = if name == default_name { '*' } else { ' ' };
            format!("{marker} {name}\n")
        })
        .collect()
}
