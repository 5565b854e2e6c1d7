//! Dear Failure - anonymous letter archive
//!
//! Visitors read and submit short letters to the failures that made them
//! grow, optionally signed with a nickname and tagged with a category.
//!
//! - Seed letters bundled with the binary (or loaded from a JSON file)
//! - In-memory repository for letters submitted while the process runs
//! - Server-rendered pages and a small JSON API on axum
//!
//! # Example
//!
//! ```no_run
//! use dear_failure::{LetterRepository, MemoryLetterRepository, NewLetter, SeedStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let repo = MemoryLetterRepository::new(SeedStore::bundled()?);
//!     repo.add(NewLetter::new("Dear failure, thanks.").with_category("Other"))?;
//!     for letter in repo.recent(3) {
//!         println!("{}", letter.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod error;
pub mod letters;
pub mod config;
pub mod server;
pub mod cli;

pub use types::{Category, Letter, NewLetter};
pub use error::{AppError, LetterError};
pub use letters::{LetterRepository, MemoryLetterRepository, SeedStore};
pub use config::Config;
pub use server::{router, ServerState, start as start_server};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Anonymous letter archive", NAME, VERSION)
}
