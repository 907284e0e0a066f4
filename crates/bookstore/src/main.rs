//! bookstore CLI entry point.
//!
//! Developer tool for inspecting and seeding a bookstore database.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookstore::{BookDao, BookRepository, Config, EngineHandle, StoreLocation};
use bookstore_core::catalog::{book_to_template, Book, BookTemplate};

/// Bookstore - inspect the local catalog store
#[derive(Parser, Debug)]
#[command(name = "bookstore")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Database file, or ":memory:" for a throwaway store
    #[arg(long, global = true, env = "BOOKSTORE_DB_PATH")]
    db: Option<String>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert or replace books from a JSON array file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// List every book
    Books,
    /// Search books by title
    Search {
        /// Substring to look for
        query: String,
    },
    /// Show one book with its comments
    Show {
        /// ISBN-13 of the book
        isbn13: String,
    },
    /// Print the book list every time it changes, until Ctrl+C
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookstore=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(db) = &cli.db {
        config.store = StoreLocation::parse(db);
    }

    let handle = EngineHandle::new(config);
    let dao = BookDao::from_handle(&handle)
        .await
        .context("Failed to open the bookstore database")?;
    let repository = BookRepository::new(dao.clone());

    match cli.command {
        Commands::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let books: Vec<Book> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of books", file.display()))?;

            dao.insert_books(&books).await?;
            println!("Imported {} books", books.len());
        }
        Commands::Books => {
            let books: Vec<BookTemplate> =
                dao.list_books().await?.iter().map(book_to_template).collect();
            print_books(&books, cli.json)?;
        }
        Commands::Search { query } => {
            let books = repository.search_books(&query).await?;
            print_books(&books, cli.json)?;
        }
        Commands::Show { isbn13 } => {
            let Some(book) = repository.get_book(&isbn13).await? else {
                bail!("No book with ISBN-13 {isbn13}");
            };
            let comments = repository.get_comments(&isbn13).await?;

            if cli.json {
                let value = serde_json::json!({ "book": book, "comments": comments });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} ({})", book.title, book.isbn13);
                if !book.subtitle.is_empty() {
                    println!("  {}", book.subtitle);
                }
                println!("  Price:   {}", book.price);
                println!("  Authors: {}", book.authors);
                println!("  Pages:   {}", book.pages);
                println!("  Rating:  {}", book.rating);
                println!("  Comments: {}", comments.len());
                for comment in &comments {
                    println!("    - {}", comment.comment);
                }
            }
        }
        Commands::Watch => {
            let feed = repository.watch_books();
            tokio::pin!(feed);

            loop {
                tokio::select! {
                    books = feed.next() => match books {
                        Some(books) => print_books(&books, cli.json)?,
                        None => break,
                    },
                    _ = signal::ctrl_c() => break,
                }
            }
        }
    }

    Ok(())
}

fn print_books(books: &[BookTemplate], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(books)?);
        return Ok(());
    }

    println!("{} books", books.len());
    for book in books {
        println!("{:<16} {:<10} {}", book.isbn13, book.price, book.title);
    }
    Ok(())
}
