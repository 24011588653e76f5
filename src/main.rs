// SPDX-License-Identifier: MPL-2.0

mod output;

use std::{io, path::PathBuf};

use android_etc::{
    Loader, MediaCodecsDescriptors, SearchDirs, scan_media_codecs, scan_media_codecs_in,
};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::{codec_records, write_lines};

/// Lists the media codecs declared in Android's `media_codecs*.xml` files.
#[derive(Debug, Parser)]
#[command(name = "android-media-codecs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode every media_codecs*.xml in the search dirs, one line per file
    Scan {
        /// Directory to scan instead of the stock Android list (repeatable)
        #[arg(long = "search-dir", value_name = "DIR")]
        search_dirs: Vec<PathBuf>,
        /// Print only codecs classified as hardware-accelerated
        #[arg(long)]
        hardware_only: bool,
    },
    /// Load one file and its includes, one line per descriptor
    Load {
        /// File name or path, resolved through the search dirs
        file: String,
        /// Directory to resolve names in, highest priority first (repeatable)
        #[arg(long = "search-dir", value_name = "DIR")]
        search_dirs: Vec<PathBuf>,
    },
    /// Every decoder and encoder found by a scan, one line per codec
    Codecs {
        #[arg(long = "search-dir", value_name = "DIR")]
        search_dirs: Vec<PathBuf>,
    },
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let command = Cli::parse().command.unwrap_or(Command::Scan {
        search_dirs: Vec::new(),
        hardware_only: false,
    });

    let stdout = io::stdout().lock();
    match command {
        Command::Scan {
            search_dirs,
            hardware_only,
        } => {
            let descriptors = scan(search_dirs)?;
            if hardware_only {
                let records = codec_records(&descriptors)
                    .into_iter()
                    .filter(|record| record.hardware);
                write_lines(stdout, records)?;
            } else {
                write_lines(stdout, &descriptors)?;
            }
        }
        Command::Load { file, search_dirs } => {
            let descriptors = Loader::new(SearchDirs::new(search_dirs)).load_recursive(&file)?;
            for descriptor in &descriptors {
                if descriptor
                    .downcast_ref::<android_etc::MediaCodecsDescriptor>()
                    .is_none()
                {
                    warn!(root = descriptor.root_name(), "skipping non media codecs descriptor");
                }
            }
            write_lines(stdout, &MediaCodecsDescriptors::from_descriptors(descriptors))?;
        }
        Command::Codecs { search_dirs } => {
            let descriptors = scan(search_dirs)?;
            write_lines(stdout, codec_records(&descriptors))?;
        }
    }

    Ok(())
}

fn scan(search_dirs: Vec<PathBuf>) -> android_etc::Result<MediaCodecsDescriptors> {
    if search_dirs.is_empty() {
        scan_media_codecs()
    } else {
        scan_media_codecs_in(&SearchDirs::new(search_dirs))
    }
}
