//! Catalog CLI - manage a validated, searchable store of named records.
//!
//! This is the command-line interface for Catalog. It parses arguments,
//! opens the store, calls the `EntityStore` contract, and renders results;
//! all query and validation semantics live in `catalog-core`.

mod config;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use comfy_table::Table;
use uuid::Uuid;

use catalog_core::{
    CatalogError, Entity, EntityQuery, EntityStore, NewEntity, SortKey, SqliteStore, VERSION,
};

use crate::config::{default_config_path, CatalogConfig};

/// Catalog - a validated, searchable store of named records
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the catalog database
    #[arg(short, long, global = true, env = "CATALOG_DB")]
    db: Option<PathBuf>,

    /// Path to a config file (default: $XDG_CONFIG_HOME/catalog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new entity
    Add {
        /// Entity name (3-50 characters)
        #[arg(value_name = "NAME")]
        name: String,

        /// Optional description (up to 255 characters)
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// List entities, filtered, sorted, and paged
    List {
        /// Free-text search over name and description
        #[arg(long)]
        search: Option<String>,

        /// Only entities whose name is letters from A to Z
        #[arg(long)]
        letters_only: bool,

        /// Created on or after this time (ISO-8601 or YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Created on or before this time (ISO-8601 or YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,

        /// Sort column
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// Page index (zero-based)
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Page size
        #[arg(long, default_value_t = 20)]
        page_size: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count entities matching a filter
    Count {
        /// Free-text search over name and description
        #[arg(long)]
        search: Option<String>,

        /// Only entities whose name is letters from A to Z
        #[arg(long)]
        letters_only: bool,

        /// Created on or after this time (ISO-8601 or YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Created on or before this time (ISO-8601 or YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
    },

    /// Show a specific entity by ID
    Show {
        /// Entity ID (UUID)
        #[arg(value_name = "ID")]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an entity's name or description
    Edit {
        /// Entity ID (UUID)
        #[arg(value_name = "ID")]
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(short = 'D', long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },

    /// Delete an entity by ID
    Delete {
        /// Entity ID (UUID)
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    /// Case-insensitive name order
    Name,
    /// Creation-time order
    Created,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Created => SortKey::CreatedAt,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "catalog", &mut std::io::stdout());
        return Ok(());
    }

    let db_path = resolve_db_path(cli.db, cli.config)?;
    let store = SqliteStore::open(&db_path)?;

    match cli.command {
        Commands::Add { name, description } => {
            let new = NewEntity::new(name, description)?;
            let entity = store.add(&new)?;
            if !cli.quiet {
                println!("Added entity {}", entity.id());
            }
        }
        Commands::List {
            search,
            letters_only,
            since,
            until,
            sort,
            desc,
            page,
            page_size,
            json,
        } => {
            let query = build_query(search, letters_only, since, until, sort, desc)?;
            let count = store.get_count(&query)?;
            let entities = store.search(&query, page, page_size)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entities)?);
            } else {
                let mut table = Table::new();
                table.set_header(vec!["ID", "NAME", "DESCRIPTION", "CREATED", "UPDATED"]);
                for entity in &entities {
                    table.add_row(vec![
                        entity.id().to_string(),
                        entity.name().to_string(),
                        entity.description().unwrap_or("").to_string(),
                        format_ts(entity.created_at()),
                        format_ts(entity.updated_at()),
                    ]);
                }
                println!("{table}");
                if !cli.quiet {
                    let pages = count.div_ceil(page_size.max(1)).max(1);
                    println!("Page {} of {} ({} total)", page + 1, pages, count);
                }
            }
        }
        Commands::Count {
            search,
            letters_only,
            since,
            until,
        } => {
            let query = build_query(search, letters_only, since, until, SortArg::Name, false)?;
            println!("{}", store.get_count(&query)?);
        }
        Commands::Show { id, json } => {
            let id = parse_id(&id)?;
            let entity = store
                .get(&id)?
                .ok_or_else(|| CatalogError::NotFound(format!("No entity with id {}", id)))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entity)?);
            } else {
                print_entity(&entity);
            }
        }
        Commands::Edit {
            id,
            name,
            description,
            clear_description,
        } => {
            let id = parse_id(&id)?;
            let mut entity = store
                .get(&id)?
                .ok_or_else(|| CatalogError::NotFound(format!("No entity with id {}", id)))?;

            if let Some(name) = name {
                entity.set_name(name)?;
            }
            if clear_description {
                entity.set_description(None)?;
            } else if let Some(description) = description {
                entity.set_description(Some(description))?;
            }

            if !store.update(&mut entity)? {
                return Err(CatalogError::NotFound(format!("No entity with id {}", id)).into());
            }
            if !cli.quiet {
                println!("Updated entity {}", id);
            }
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            store.delete(&id)?;
            if !cli.quiet {
                println!("Deleted entity {}", id);
            }
        }
        Commands::Completions { .. } => unreachable!("handled before opening the store"),
    }

    Ok(())
}

/// Resolve the database path: `--db`/`CATALOG_DB` wins, then the config
/// file. There is no implicit default location.
fn resolve_db_path(db: Option<PathBuf>, config: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = db {
        return Ok(path);
    }

    let config_path = config.or_else(default_config_path);
    if let Some(config_path) = config_path {
        if config_path.exists() {
            let config = CatalogConfig::load(&config_path)?;
            return Ok(PathBuf::from(config.database.path));
        }
    }

    Err(anyhow::anyhow!(
        "No database path provided. Use --db, set CATALOG_DB, or configure [database] path."
    ))
}

fn build_query(
    search: Option<String>,
    letters_only: bool,
    since: Option<String>,
    until: Option<String>,
    sort: SortArg,
    desc: bool,
) -> anyhow::Result<EntityQuery> {
    let mut query = EntityQuery::new().sort(sort.into());
    if let Some(term) = search {
        query = query.term(term);
    }
    if letters_only {
        query = query.letters_only();
    }
    if let Some(value) = since {
        query = query.since(parse_datetime(&value)?);
    }
    if let Some(value) = until {
        query = query.until(parse_datetime(&value)?);
    }
    if desc {
        query = query.descending();
    }
    Ok(query)
}

fn parse_id(value: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| anyhow::anyhow!("Invalid entity ID: {}", e))
}

fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid date value: {}", value))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(anyhow::anyhow!(
        "Invalid date/time (expected ISO-8601 or YYYY-MM-DD): {}",
        value
    ))
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn print_entity(entity: &Entity) {
    println!("ID: {}", entity.id());
    println!("Name: {}", entity.name());
    println!("Description: {}", entity.description().unwrap_or("N/A"));
    println!("Created: {}", format_ts(entity.created_at()));
    println!("Updated: {}", format_ts(entity.updated_at()));
}
