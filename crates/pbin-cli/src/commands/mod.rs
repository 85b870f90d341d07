pub mod extract;
pub mod list;
pub mod pack;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// List the textures inside a BIN archive
    List(list::ListArgs),
    /// Extract a BIN archive into a directory
    Extract(extract::ExtractArgs),
    /// Pack a directory of textures into a BIN archive
    Pack(pack::PackArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::List(list) => list.handle(),
            Commands::Extract(extract) => extract.handle(),
            Commands::Pack(pack) => pack.handle(),
        }
    }
}
