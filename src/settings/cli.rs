use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "userdesk", about = "User records addressed by UUID over HTTP")]
pub struct Cli {
    /// Path to the settings file; defaults to `settings/dev.toml` in debug builds.
    #[arg(long)]
    pub settings: Option<String>,
}
