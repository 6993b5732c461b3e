use std::{
    error::Error,
    path::PathBuf,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use patmore::{
    category::CategoryId,
    initialize_db,
    item::ItemId,
    session::{SQLiteShoppingListStore, ShoppingList},
    store_type::StoreId,
};

/// A command line client for the patmore shopping list.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "PATMORE_DB_PATH")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the list grouped by category.
    List {
        /// Only show items fuzzy matching this text.
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only show items at this store (name or ID). May be repeated.
        #[arg(short, long = "store")]
        stores: Vec<String>,
    },
    /// Add an item to the list.
    Add {
        name: String,

        /// The item's category (name or ID).
        #[arg(short, long)]
        category: String,
    },
    /// Mark an item as needed.
    Need {
        item_id: ItemId,

        /// Mark the item as not needed instead.
        #[arg(long)]
        not: bool,
    },
    /// Add a store to an item, or remove it if the item already has it.
    ToggleStore {
        item_id: ItemId,

        /// The store (name or ID).
        store: String,
    },
    /// Delete an item.
    Remove { item_id: ItemId },
    /// List the known stores.
    Stores,
    /// List the known categories.
    Categories,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(Args::parse()) {
        eprintln!("Error: {error}");
        exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    let store = SQLiteShoppingListStore::new(Arc::new(Mutex::new(connection)));
    let mut session = ShoppingList::new(store);
    session.refresh()?;

    match args.command {
        Command::List { query, stores } => {
            for store in &stores {
                let store_id = resolve_store(&session, store)?;
                session.select_store_filter(store_id);
            }
            session.set_query(&query);

            print_list(&session);
        }
        Command::Add { name, category } => {
            let category_id = resolve_category(&session, &category)?;
            let item = session.create_item(&name, category_id)?;
            println!("Added {} \"{}\"", item.id, item.name);
        }
        Command::Need { item_id, not } => {
            session.set_needed(item_id, !not)?;
            print_list(&session);
        }
        Command::ToggleStore { item_id, store } => {
            let store_id = resolve_store(&session, &store)?;
            session.toggle_item_store(item_id, store_id)?;
            print_list(&session);
        }
        Command::Remove { item_id } => {
            session.delete_item(item_id)?;
            println!("Removed {item_id}");
        }
        Command::Stores => {
            for store in session.state().stores() {
                println!("{:>4}  {}", store.id, store.name);
            }
        }
        Command::Categories => {
            for category in session.state().categories() {
                println!("{:>4}  {}", category.id, category.name);
            }
        }
    }

    Ok(())
}

fn print_list(session: &ShoppingList<SQLiteShoppingListStore>) {
    let groups = session.view();

    if groups.is_empty() {
        println!("Nothing on the list.");
        return;
    }

    for group in groups {
        println!("{}", group.category);

        for item in group.items {
            let stores: Vec<&str> = item
                .stores
                .iter()
                .map(|store| store.name.as_ref())
                .collect();
            let marker = if item.needed { "[x]" } else { "[ ]" };
            println!(
                "  {marker} {:>4}  {}  ({})",
                item.id,
                item.name,
                stores.join(", ")
            );
        }
    }
}

/// Find a store by ID or case-insensitive name.
fn resolve_store(
    session: &ShoppingList<SQLiteShoppingListStore>,
    store: &str,
) -> Result<StoreId, String> {
    session
        .state()
        .stores()
        .iter()
        .find(|candidate| {
            store.parse::<StoreId>().ok() == Some(candidate.id)
                || candidate.name.as_ref().eq_ignore_ascii_case(store)
        })
        .map(|candidate| candidate.id)
        .ok_or_else(|| format!("no store called \"{store}\""))
}

/// Find a category by ID or case-insensitive name.
fn resolve_category(
    session: &ShoppingList<SQLiteShoppingListStore>,
    category: &str,
) -> Result<CategoryId, String> {
    session
        .state()
        .categories()
        .iter()
        .find(|candidate| {
            category.parse::<CategoryId>().ok() == Some(candidate.id)
                || candidate.name.as_ref().eq_ignore_ascii_case(category)
        })
        .map(|candidate| candidate.id)
        .ok_or_else(|| format!("no category called \"{category}\""))
}
