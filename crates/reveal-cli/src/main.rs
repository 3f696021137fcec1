mod dump;
mod models;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dump::Dump;
use models::{ElementView, TypeSummary, ViolationView};
use reveal_core::{registry, Config, ElementQuery, TypeRegistry, TypedElement};

#[derive(Parser)]
#[command(name = "reveal")]
#[command(about = "Progressive code exploration over analyzer element dumps", long_about = None)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to ./reveal.toml, then the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered language schemas
    Types,
    /// Show the resolved entity definitions of a schema
    Schema {
        /// Schema name or URI scheme
        name: String,
    },
    /// Print the element tree of a dump
    Outline {
        dump: PathBuf,
        /// Deepest level to show (0 = roots only)
        #[arg(long)]
        depth: Option<usize>,
    },
    /// List elements matching a filter
    Find {
        dump: PathBuf,
        /// Exact category (e.g. function)
        #[arg(long)]
        category: Option<String>,
        /// Substring of the element name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show the innermost element enclosing a line
    At { dump: PathBuf, line: u32 },
    /// Look up an element by dotted path (e.g. MyClass.process)
    Get { dump: PathBuf, path: String },
    /// Report nesting the schema does not allow
    Check { dump: PathBuf },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("REVEAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    *registry::write_global() = TypeRegistry::from_config(&config.registry)?;
    let registry = registry::read_global();

    match cli.command {
        Commands::Types => {
            let types: Vec<TypeSummary> =
                registry.types().iter().map(|t| TypeSummary::from(t.as_ref())).collect();
            if cli.json {
                print_json(&types)?;
            } else {
                for ty in types {
                    println!(
                        "{:<12} {:<12} {:>3} kinds  {}",
                        ty.name,
                        format!("{}://", ty.scheme),
                        ty.entities,
                        ty.extensions.join(" ")
                    );
                }
            }
        }
        Commands::Schema { name } => {
            let ty = registry
                .get(&name)
                .or_else(|| registry.from_scheme(&name))
                .ok_or_else(|| eyre!("Unknown type '{name}'"))?;

            let resolved: BTreeMap<&str, _> = ty
                .entity_kinds()
                .filter_map(|kind| ty.get_entity(kind).map(|def| (kind, def)))
                .collect();

            if cli.json {
                print_json(&resolved)?;
            } else {
                println!("{ty}");
                for (kind, def) in resolved {
                    let inherits = def
                        .inherits
                        .as_deref()
                        .map(|p| format!(" < {p}"))
                        .unwrap_or_default();
                    println!("  {kind}{inherits}");
                    if !def.contains.is_empty() {
                        let kinds: Vec<&str> = def.contains.iter().map(String::as_str).collect();
                        println!("    contains: {}", kinds.join(", "));
                    }
                    for (prop, prop_type) in &def.properties {
                        println!("    {prop}: {prop_type}");
                    }
                }
            }
        }
        Commands::Outline { dump, depth } => {
            let structure = Dump::read(&dump)?.into_structure(&registry)?;
            let max_depth = depth.or(config.navigation.max_depth);

            if cli.json {
                let trees: Vec<ElementView> = structure
                    .roots()
                    .into_iter()
                    .map(|root| ElementView::tree(root, max_depth))
                    .collect();
                print_json(&trees)?;
            } else {
                println!("{} ({})", structure.path(), structure.reveal_type().name());
                for root in structure.roots() {
                    for el in root.walk() {
                        let level = el.depth();
                        if max_depth.map_or(true, |max| level <= max) {
                            println!("{}{}", "  ".repeat(level + 1), describe(el));
                        }
                    }
                }
            }
        }
        Commands::Find {
            dump,
            category,
            name,
        } => {
            let structure = Dump::read(&dump)?.into_structure(&registry)?;

            let query = match (category, name) {
                (category, Some(needle)) => ElementQuery::matching(move |el| {
                    el.name().contains(needle.as_str())
                        && category.as_deref().map_or(true, |c| el.category() == c)
                }),
                (Some(category), None) => ElementQuery::category(category),
                (None, None) => ElementQuery::all(),
            };

            print_elements(structure.find(query).collect(), cli.json)?;
        }
        Commands::At { dump, line } => {
            let structure = Dump::read(&dump)?.into_structure(&registry)?;
            let el = structure
                .find_by_line(line)
                .ok_or_else(|| eyre!("No element encloses line {line}"))?;
            print_element(el, cli.json)?;
        }
        Commands::Get { dump, path } => {
            let structure = Dump::read(&dump)?.into_structure(&registry)?;
            let el = structure
                .get(&path)
                .ok_or_else(|| eyre!("No element at path '{path}'"))?;
            print_element(el, cli.json)?;
        }
        Commands::Check { dump } => {
            let structure = Dump::read(&dump)?.into_structure(&registry)?;
            let violations = structure.schema_violations();

            if cli.json {
                let views: Vec<ViolationView> = violations
                    .iter()
                    .map(|v| ViolationView {
                        parent: ElementView::flat(v.parent),
                        child: ElementView::flat(v.child),
                    })
                    .collect();
                print_json(&views)?;
            } else if violations.is_empty() {
                println!("{}: no violations", structure.path());
            } else {
                for violation in &violations {
                    println!("{}: {}", structure.path(), violation);
                }
            }

            if !violations.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn describe(el: TypedElement<'_>) -> String {
    format!(
        "{} {} ({}-{})",
        el.category(),
        el.name(),
        el.line(),
        el.line_end()
    )
}

fn print_element(el: TypedElement<'_>, json: bool) -> Result<()> {
    if json {
        print_json(&ElementView::flat(el))
    } else {
        println!("{}  {}", el.path(), describe(el));
        Ok(())
    }
}

fn print_elements(elements: Vec<TypedElement<'_>>, json: bool) -> Result<()> {
    if json {
        let views: Vec<ElementView> = elements.into_iter().map(ElementView::flat).collect();
        return print_json(&views);
    }
    for el in elements {
        println!("{}  {}", el.path(), describe(el));
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
