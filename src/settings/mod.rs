//! Process settings, loaded from a TOML file picked by the `--settings` flag.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
