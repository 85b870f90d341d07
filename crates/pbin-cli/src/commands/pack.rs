use clap::Args;
use miette::{miette, Context, Result};
use pbin::{write, Texture};
use std::path::PathBuf;
use tracing::info;
use walkdir::WalkDir;

#[derive(Args)]
pub struct PackArgs {
    /// An input directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target BIN file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl PackArgs {
    pub fn handle(&self) -> Result<()> {
        info!("creating {}", &self.file.display());

        let files = WalkDir::new(&self.directory)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }

        if !self.overwrite && self.file.exists() {
            return Err(miette!("{} already exists", self.file.display()));
        }

        let textures = files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                info!("adding {}", file.path().display());
                Texture::from_file(file.path(), index)
                    .context(format!("importing {}", file.path().display()))
            })
            .collect::<Result<Vec<_>>>()?;

        write::save(&self.file, &textures, |texture, total| {
            info!("packed {} of {}", texture.index + 1, total);
        })
        .context("finalizing bin file")?;

        Ok(())
    }
}
