//! Pocket Wishlist - Pokemon TCG Pocket card catalog and wishlist manager
//!
//! Browses and filters the public card list, keeps a local wishlist, and
//! moves the wishlist in and out of spreadsheets.

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use pocket_wishlist::api::DEFAULT_BASE_URL;
use pocket_wishlist::cache::CatalogCache;
use pocket_wishlist::config::{
    quota_from_bytes, DEFAULT_CACHE_MAX_AGE_HOURS, DEFAULT_QUOTA_BYTES,
};
use pocket_wishlist::formatters::{
    format_card_list, format_packs, format_rarities, format_sets, format_wishlist,
};
use pocket_wishlist::spreadsheet::{
    export_cards_to_file, export_wishlist_to_file, import_into_store, read_wishlist_file,
    write_template_file,
};
use pocket_wishlist::{
    all_packs, filter_cards, filter_wishlist, load_catalog, matching_entries, AddOutcome, Card,
    CardKey, Catalog, CatalogClient, Config, ExportError, FilterCriteria, ImportError, Storage,
    StorageBackend, WishlistStore,
};
use std::collections::HashSet;
use std::path::PathBuf;

/// Pokemon TCG Pocket card catalog browser and wishlist manager
#[derive(Parser, Debug)]
#[command(name = "pocket_wishlist")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the wishlist storage (default: ~/.local/share/pocket_wishlist)
    #[arg(long, global = true, env = "POCKET_WISHLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Storage backend for the wishlist
    #[arg(long, global = true, value_enum, env = "POCKET_WISHLIST_BACKEND", default_value_t = StorageBackend::File)]
    backend: StorageBackend,

    /// Storage quota in bytes (0 disables the check)
    #[arg(long, global = true, env = "POCKET_WISHLIST_QUOTA_BYTES", default_value_t = DEFAULT_QUOTA_BYTES)]
    quota_bytes: usize,

    /// Base URL of the card database
    #[arg(long, global = true, env = "POCKET_WISHLIST_CATALOG_URL", default_value = DEFAULT_BASE_URL)]
    catalog_url: String,

    /// Catalog cache file (default: ~/.cache/pocket_wishlist/catalog.json)
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    /// How long a cached catalog is used before fetching again
    #[arg(long, global = true, default_value_t = DEFAULT_CACHE_MAX_AGE_HOURS)]
    cache_max_age_hours: u64,

    /// Ignore the cached catalog and fetch it again
    #[arg(long, global = true, default_value_t = false)]
    refresh: bool,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            data_dir: self.data_dir.clone().unwrap_or(defaults.data_dir),
            backend: self.backend,
            quota_bytes: quota_from_bytes(self.quota_bytes),
            catalog_url: self.catalog_url.clone(),
            cache_path: self
                .cache_file
                .clone()
                .unwrap_or_else(CatalogCache::default_path),
            cache_max_age_hours: self.cache_max_age_hours,
            refresh: self.refresh,
        }
    }
}

#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
    /// Part of the card name (case-insensitive)
    #[arg(long, default_value = "")]
    search: String,

    /// Set code, e.g. A1
    #[arg(long, default_value = "")]
    set: String,

    /// Rarity label, e.g. Common
    #[arg(long, default_value = "")]
    rarity: String,

    /// Booster pack name
    #[arg(long, default_value = "")]
    pack: String,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            search: args.search,
            set: args.set,
            rarity: args.rarity,
            pack: args.pack,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List cards matching the filters
    Cards {
        #[command(flatten)]
        filter: FilterArgs,

        /// Only show cards on the wishlist
        #[arg(long, default_value_t = false)]
        wishlist: bool,
    },
    /// List every booster pack in the catalog
    Packs,
    /// List the card sets
    Sets,
    /// List rarity codes and labels
    Rarities,
    /// Add a catalog card to the wishlist
    Add { set: String, number: u32 },
    /// Remove a card from the wishlist
    Remove { set: String, number: u32 },
    /// Show whether a card is on the wishlist
    Status { set: String, number: u32 },
    /// Show the wishlist
    List,
    /// Remove every card from the wishlist
    Clear,
    /// Add the cards of a spreadsheet (.csv) to the wishlist
    Import { file: PathBuf },
    /// Export filtered catalog cards, or the filtered wishlist, to a spreadsheet
    Export {
        file: PathBuf,

        /// Export the wishlist instead of catalog cards
        #[arg(long, default_value_t = false)]
        wishlist: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Write a sample wishlist spreadsheet
    Template { file: PathBuf },
}

#[tokio::main]
async fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Examples: RUST_LOG=info, RUST_LOG=warn, RUST_LOG=pocket_wishlist=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.config();
    let storage = config
        .open_storage()
        .context("Failed to open wishlist storage")?;
    let store = WishlistStore::new(storage);

    match args.command {
        Command::Cards {
            filter,
            wishlist: true,
        } => {
            let entries = store.list();
            let outcome = filter_wishlist(&entries, &filter.into());
            let keys: HashSet<CardKey> = entries.iter().map(|e| e.key()).collect();
            print!("{}", format_card_list(&outcome, &keys, true));
        }
        Command::Cards {
            filter,
            wishlist: false,
        } => {
            let catalog = fetch_catalog(&config).await?;
            let outcome = filter_cards(&catalog.cards, &filter.into());
            print!("{}", format_card_list(&outcome, &wishlist_keys(&store), false));
        }
        Command::Packs => {
            let catalog = fetch_catalog(&config).await?;
            print!("{}", format_packs(&all_packs(&catalog.cards)));
        }
        Command::Sets => {
            let catalog = fetch_catalog(&config).await?;
            print!("{}", format_sets(&catalog.sets));
        }
        Command::Rarities => {
            let catalog = fetch_catalog(&config).await?;
            print!("{}", format_rarities(&catalog.rarities));
        }
        Command::Add { set, number } => {
            let catalog = fetch_catalog(&config).await?;
            let key = CardKey::new(set, number);
            let card = catalog
                .find(&key)
                .with_context(|| format!("Card {key} not found in catalog"))?;
            match store.add(card)? {
                AddOutcome::Added => println!(
                    "Added {} ({}) to your wishlist",
                    key,
                    card.display_name().unwrap_or("unnamed")
                ),
                AddOutcome::AlreadyPresent => println!("{key} is already on your wishlist"),
            }
        }
        Command::Remove { set, number } => {
            let key = CardKey::new(set, number);
            match store.remove(&key)? {
                0 => println!("{key} was not on your wishlist"),
                _ => println!("Removed {key} from your wishlist"),
            }
        }
        Command::Status { set, number } => {
            let key = CardKey::new(set, number);
            if store.contains(&key) {
                println!("{key} is on your wishlist");
            } else {
                println!("{key} is not on your wishlist");
            }
        }
        Command::List => print!("{}", format_wishlist(&store.list())),
        Command::Clear => {
            store.clear()?;
            println!("Wishlist cleared");
        }
        Command::Import { file } => run_import(&store, &file)?,
        Command::Export {
            file,
            wishlist,
            filter,
        } => {
            let result = if wishlist {
                let entries = matching_entries(&store.list(), &filter.into());
                export_wishlist_to_file(&entries, &file)
            } else {
                let catalog = fetch_catalog(&config).await?;
                let cards: Vec<Card> = filter_cards(&catalog.cards, &filter.into())
                    .cards
                    .into_iter()
                    .cloned()
                    .collect();
                export_cards_to_file(&cards, &file)
            };
            match result {
                Ok(count) => println!("Exported {count} cards to {}", file.display()),
                Err(ExportError::Empty(msg)) => println!("{msg}"),
                Err(e) => return Err(e).context("Failed to export"),
            }
        }
        Command::Template { file } => {
            write_template_file(&file).context("Failed to write template")?;
            println!("Wrote template to {}", file.display());
        }
    }

    Ok(())
}

async fn fetch_catalog(config: &Config) -> Result<Catalog> {
    let client = CatalogClient::with_base_url(&config.catalog_url);
    load_catalog(&client, &config.catalog_cache(), config.refresh)
        .await
        .context("Failed to load card catalog")
}

fn wishlist_keys<S: Storage>(store: &WishlistStore<S>) -> HashSet<CardKey> {
    store.list().iter().map(|e| e.key()).collect()
}

fn run_import<S: Storage>(store: &WishlistStore<S>, file: &std::path::Path) -> Result<()> {
    const SHOWN_ERRORS: usize = 5;

    let cards = match read_wishlist_file(file) {
        Ok(cards) => cards,
        Err(ImportError::InvalidRows {
            details,
            valid_items,
        }) => {
            eprintln!("Some rows contain errors ({valid_items} valid items found)");
            for detail in details.iter().take(SHOWN_ERRORS) {
                eprintln!("  {detail}");
            }
            if details.len() > SHOWN_ERRORS {
                eprintln!("  ...and {} more errors", details.len() - SHOWN_ERRORS);
            }
            bail!("Import rejected, nothing was added");
        }
        Err(e) => return Err(e).context("Failed to import wishlist"),
    };

    let added = import_into_store(store, &cards)?;
    println!("Added {added} cards to your wishlist");
    Ok(())
}
