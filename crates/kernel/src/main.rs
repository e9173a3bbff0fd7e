//! navgate
//!
//! Offline CLI over the navigation kernel: evaluates a role payload against
//! the navigation config and prints the landing route, the filtered sidebar,
//! or a single visibility decision.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use navgate_kernel::config::Config;
use navgate_kernel::menu::NavigationRegistry;
use navgate_kernel::models::{MenuNode, PermissionTree};
use navgate_kernel::permissions::MatchMode;

/// Permission-driven navigation for the facility console.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Navigation TOML (defaults to NAVGATE_NAV_CONFIG, then the built-in menu).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Name comparison strictness: substring or exact.
    #[arg(long, global = true)]
    match_mode: Option<MatchMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the first accessible route, or "none".
    Landing {
        /// Role payload JSON; omit when permissions are not loaded.
        #[arg(long)]
        role: Option<PathBuf>,
    },
    /// Print the permission-filtered sidebar as JSON.
    Sidebar {
        #[arg(long)]
        role: Option<PathBuf>,
    },
    /// Print whether a single menu entry is visible.
    Check {
        /// Menu entry name.
        name: String,

        /// Route of the entry; omit for a category.
        #[arg(long)]
        href: Option<String>,

        #[arg(long)]
        role: Option<PathBuf>,
    },
    /// Load and validate the navigation config.
    Validate,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let output = run(cli, config)?;
    println!("{output}");

    Ok(())
}

/// Execute one command and return what it prints.
fn run(cli: Cli, mut config: Config) -> Result<String> {
    if let Some(path) = cli.config {
        config.nav_config = Some(path);
    }
    if let Some(mode) = cli.match_mode {
        config.match_mode = mode;
    }

    let registry = config
        .load_navigation()
        .context("failed to load navigation config")?;

    match cli.command {
        Command::Landing { role } => {
            let tree = load_role(role.as_deref())?;
            Ok(landing(&registry, &config, tree.as_ref()))
        }
        Command::Sidebar { role } => {
            let tree = load_role(role.as_deref())?;
            sidebar(&registry, &config, tree.as_ref())
        }
        Command::Check { name, href, role } => {
            let tree = load_role(role.as_deref())?;
            let node = MenuNode {
                name,
                href,
                sub_items: Vec::new(),
            };
            Ok(check(&registry, &config, tree.as_ref(), &node))
        }
        Command::Validate => Ok(summary(&registry)),
    }
}

/// Read a role payload; `None` means permissions were not loaded.
fn load_role(path: Option<&Path>) -> Result<Option<PermissionTree>> {
    let Some(path) = path else {
        warn!("no role payload given; evaluating without permissions");
        return Ok(None);
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read role payload {}", path.display()))?;
    let tree = PermissionTree::from_role_json(&json)
        .with_context(|| format!("failed to parse role payload {}", path.display()))?;

    info!(
        modules = tree.modules.len(),
        functions = tree.functions().count(),
        "role payload loaded"
    );
    Ok(Some(tree))
}

fn landing(
    registry: &NavigationRegistry,
    config: &Config,
    tree: Option<&PermissionTree>,
) -> String {
    let matcher = registry.matcher(tree, config.match_mode);
    registry
        .first_accessible_route(&matcher, config.resolver_options())
        .unwrap_or("none")
        .to_string()
}

fn sidebar(
    registry: &NavigationRegistry,
    config: &Config,
    tree: Option<&PermissionTree>,
) -> Result<String> {
    let matcher = registry.matcher(tree, config.match_mode);
    let sidebar = registry.filter_sidebar(&matcher);
    serde_json::to_string_pretty(&sidebar).context("failed to serialize sidebar")
}

fn check(
    registry: &NavigationRegistry,
    config: &Config,
    tree: Option<&PermissionTree>,
    node: &MenuNode,
) -> String {
    let matcher = registry.matcher(tree, config.match_mode);
    if matcher.is_permitted(node) {
        "allowed".to_string()
    } else {
        "denied".to_string()
    }
}

fn summary(registry: &NavigationRegistry) -> String {
    let mut lines: Vec<String> = registry
        .packages()
        .iter()
        .map(|package| format!("{}: {} items", package.name, package.items.len()))
        .collect();
    lines.extend(
        registry
            .dead_ends()
            .into_iter()
            .map(|(package, node)| format!("dead end: {package} / {}", node.name)),
    );
    lines.push(format!(
        "ok: {} packages, {} alias entries",
        registry.len(),
        registry.aliases().len()
    ));
    lines.join("\n")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
