//! listkv CLI
//!
//! Command-line interface for browsing and editing a listkv database file.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use listkv::{
    get_db_info, get_list_info, search, Config, ListKvError, ListStore, Page, RedbStore, Result,
    Row, SearchQuery,
};

/// listkv CLI
#[derive(Parser, Debug)]
#[command(name = "listkv")]
#[command(about = "Browse, edit and search lists of key/value rows")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long, default_value = "./listkv.redb")]
    db: String,

    /// How long to wait for a locked database file (milliseconds)
    #[arg(long, default_value = "2000")]
    open_timeout_ms: u64,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every list with its row count
    Lists,

    /// Create an empty list
    CreateList {
        name: String,
    },

    /// Delete a list and all its rows
    DeleteList {
        name: String,
    },

    /// Insert a new row (fails if the key exists)
    Put {
        list: String,
        key: String,
        value: String,
    },

    /// Print a row's value
    Get {
        list: String,
        key: String,
    },

    /// Replace an existing row's value
    Update {
        list: String,
        key: String,
        value: String,
    },

    /// Delete a row
    Del {
        list: String,
        key: String,
    },

    /// Print one page of a list's rows
    Page {
        list: String,

        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Rows per page (defaults to the configured page size)
        #[arg(short, long)]
        size: Option<usize>,
    },

    /// Search row values across lists
    Search {
        /// List to search (repeatable); all lists when omitted
        #[arg(short, long = "list")]
        lists: Vec<String>,

        /// Regular expression matched against values
        #[arg(short = 'e', long, default_value = "")]
        pattern: String,

        /// Keep rows that do NOT match the pattern
        #[arg(short = 'x', long)]
        exclude: bool,

        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Results per page (defaults to the configured page size)
        #[arg(short, long)]
        size: Option<usize>,
    },

    /// Print store statistics, or one list's statistics
    Info {
        list: Option<String>,
    },
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout stays clean for output)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,listkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .path(&args.db)
        .open_timeout_ms(args.open_timeout_ms)
        .build();

    let store = match RedbStore::open(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let result = run(&store, &config, &args);
    store.close();

    if let Err(e) = result {
        match &e {
            ListKvError::NotFound { .. } => eprintln!("not found: {}", e),
            ListKvError::AlreadyExists { .. } => eprintln!("already exists: {}", e),
            _ => eprintln!("error: {}", e),
        }
        std::process::exit(1);
    }
}

/// Execute one subcommand against the open store
fn run(store: &dyn ListStore, config: &Config, args: &Args) -> Result<()> {
    let page_size = |size: Option<usize>| size.unwrap_or(config.rows_per_page);

    match &args.command {
        Commands::Lists => {
            let mut counts = Vec::new();
            for name in store.list_names()? {
                let rows = store.num_rows(&name)?;
                counts.push((name, rows));
            }
            if args.json {
                print_json(&counts)?;
            } else {
                for (name, rows) in counts {
                    println!("{}\t{}", name, rows);
                }
            }
        }
        Commands::CreateList { name } => store.create_list(name)?,
        Commands::DeleteList { name } => store.delete_list(name)?,
        Commands::Put { list, key, value } => {
            store.create_row(list, &Row::new(key.as_bytes(), value.as_bytes()))?
        }
        Commands::Get { list, key } => {
            let row = store.read_row(list, key.as_bytes())?;
            if args.json {
                print_json(&row)?;
            } else {
                println!("{}", row.value_str());
            }
        }
        Commands::Update { list, key, value } => {
            store.update_row(list, key.as_bytes(), value.as_bytes())?
        }
        Commands::Del { list, key } => store.delete_row(list, key.as_bytes())?,
        Commands::Page { list, page, size } => {
            let page = Page::new(*page, page_size(*size))?;
            let total = store.num_rows(list)?;
            let rows = store.read_row_page(list, page)?;
            if args.json {
                print_json(&rows)?;
            } else {
                for row in &rows {
                    println!("{}\t{}", row.key_str(), row.value_str());
                }
                println!("-- page {}/{}", page.index() + 1, page.num_pages(total));
            }
        }
        Commands::Search { lists, pattern, exclude, page, size } => {
            let query = SearchQuery::new(Page::new(*page, page_size(*size))?)
                .lists(lists.iter().cloned())
                .pattern(SearchQuery::parse_pattern(pattern)?)
                .exclude_matches(*exclude);
            let result = search(store, &query)?;
            if args.json {
                print_json(&result)?;
            } else {
                for hit in &result.rows {
                    println!("[{}] {}\t{}", hit.list, hit.row.key_str(), hit.row.value_str());
                }
                println!(
                    "-- {} results, page {}/{}",
                    result.total_results,
                    query.page.index() + 1,
                    result.num_pages()
                );
            }
        }
        Commands::Info { list: Some(list) } => {
            let info = get_list_info(store, list)?;
            if args.json {
                print_json(&info)?;
            } else {
                println!("rows:           {}", info.num_rows);
                println!("total row size: {} B", info.total_row_size);
                println!("avg row size:   {} B", info.avg_row_size);
            }
        }
        Commands::Info { list: None } => {
            let info = get_db_info(store)?;
            if args.json {
                print_json(&info)?;
            } else {
                if let Some(path) = &info.disk_path {
                    println!("path:      {}", path.display());
                }
                println!("size:      {} B", info.size);
                println!("disk size: {} B", info.disk_size);
                println!("lists:     {}", info.num_lists);
                for (name, list) in &info.lists {
                    println!(
                        "  {}\t{} rows\t{} B\tavg {} B",
                        name, list.num_rows, list.total_row_size, list.avg_row_size
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| ListKvError::Serialization(e.to_string()))?;
    println!("{}", out);
    Ok(())
}
