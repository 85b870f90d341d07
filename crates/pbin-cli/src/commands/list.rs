use clap::Args;
use miette::{Context, Result};
use owo_colors::{OwoColorize, Stream::Stdout};
use pbin::{BinArchive, TextureFormat};
use std::path::PathBuf;

#[derive(Args)]
pub struct ListArgs {
    /// An input BIN file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let archive = BinArchive::open(&self.file)
            .context(format!("opening {}", &self.file.display()))?;

        match archive.declared_size() {
            Some(declared) => println!(
                "{} textures, {} bytes on disk, {} bytes declared",
                archive.len(),
                archive.total_size(),
                declared
            ),
            None => println!(
                "{} textures, {} bytes on disk",
                archive.len(),
                archive.total_size()
            ),
        }

        let mut textures = archive.load_all(|_, _| {})?;
        textures.sort_by_key(|t| t.index);

        for texture in &textures {
            let format = match texture.format {
                TextureFormat::Gzip => "gzip",
                TextureFormat::TaggedImage => "image",
                TextureFormat::Unknown => "?",
            };

            println!(
                "{:>4}  {:<5}  {:>10}  {:>10}  {}",
                texture.index,
                format,
                texture.size,
                texture.uncompressed_size,
                texture.name().if_supports_color(Stdout, |name| name.cyan()),
            );
        }

        Ok(())
    }
}
