use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use pbin::{BinArchive, TextureFormat};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input BIN file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Decompress gzip-wrapped textures instead of extracting them as-is
    #[arg(long, default_value_t = false)]
    decompress: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let archive = BinArchive::open(&self.file)
            .context(format!("opening {}", &self.file.display()))?;

        let mut textures = archive.load_all(|texture, total| {
            info!("loaded {} of {}", texture.index + 1, total);
        })?;
        textures.sort_by_key(|t| t.index);

        std::fs::create_dir_all(&self.directory).into_diagnostic()?;

        for texture in &textures {
            // Gzip members keep their wrapper (and a .gz suffix) unless the
            // caller asked for decompression.
            let mut name = texture.name();
            if texture.format == TextureFormat::Gzip && !self.decompress {
                name.push_str(".gz");
            }

            let p = self.directory.join(name);
            info!("writing {}", p.display());

            let mut out = if !self.overwrite {
                File::create_new(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            } else {
                File::create(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            };

            let bytes = if self.decompress {
                texture.decompress()?
            } else {
                texture.bytes().unwrap_or_default().to_vec()
            };

            out.write_all(&bytes).into_diagnostic()?;
        }

        Ok(())
    }
}
