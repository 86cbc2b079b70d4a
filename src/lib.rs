pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod loader;
pub mod parser;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::Cli;
pub use commands::{execute, ApiSeed, Mode, Outcome};
pub use error::{FetchError, SeedError};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui, UiApp};
