// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use dctpress::{CompressOptions, DecompressOptions, TransformKind, quantize::DEFAULT_QUALITY};
use dctpress_cli::{compress_png, uncompress_to_png};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Transform {
    /// Direct evaluation against the cosine basis
    #[default]
    Cosine,
    /// Radix-2 FFT
    Fft,
}

impl From<Transform> for TransformKind {
    fn from(transform: Transform) -> TransformKind {
        match transform {
            Transform::Cosine => TransformKind::Cosine,
            Transform::Fft => TransformKind::Fft,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compresses a PNG image
    Compress {
        /// Input PNG file
        input: PathBuf,

        /// Output compressed file
        output: PathBuf,

        /// Quality, from 1 (smallest) to 99 (best). From 77 on, flat areas near
        /// full black or white clip toward gray.
        #[clap(
            long,
            default_value_t = DEFAULT_QUALITY,
            value_parser = clap::value_parser!(u8).range(1..=99)
        )]
        quality: u8,

        #[clap(long, value_enum, default_value_t)]
        transform: Transform,

        /// Averages chroma over 2x2 pixels before coding
        #[clap(long)]
        subsample: bool,

        /// Number of worker threads, defaults to one per core
        #[clap(long)]
        threads: Option<usize>,
    },
    /// Restores a compressed image as PNG
    Uncompress {
        /// Input compressed file
        input: PathBuf,

        /// Output PNG file
        output: PathBuf,

        /// Inverse transform; either one decodes any file
        #[clap(long, value_enum, default_value_t)]
        transform: Transform,

        #[clap(long)]
        threads: Option<usize>,
    },
}

#[derive(Parser)]
#[command(version, about = "Block-based lossy image compression")]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).wrap_err_with(|| format!("Cannot read {}", path.display()))
}

fn write(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).wrap_err_with(|| format!("Cannot write {}", path.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    match Opt::parse().command {
        Command::Compress {
            input,
            output,
            quality,
            transform,
            subsample,
            threads,
        } => {
            let options = CompressOptions {
                quality,
                transform: transform.into(),
                chroma_subsampling: subsample,
                num_threads: threads,
            };
            let data = read(&input)?;
            let start = Instant::now();
            let compressed = compress_png(&data, &options)?;
            let elapsed = start.elapsed();
            let bytes = compressed.to_bytes()?;
            write(&output, &bytes)?;
            println!(
                "{}x{}, quality {}: {} -> {} bytes ({} payload, {:.3} bpp) in {:.1} ms",
                compressed.width,
                compressed.height,
                compressed.quality,
                data.len(),
                bytes.len(),
                compressed.payload_len(),
                compressed.bits_per_pixel(),
                elapsed.as_secs_f64() * 1000.0,
            );
        }
        Command::Uncompress {
            input,
            output,
            transform,
            threads,
        } => {
            let options = DecompressOptions {
                transform: transform.into(),
                num_threads: threads,
            };
            let data = read(&input)?;
            let start = Instant::now();
            let png = uncompress_to_png(&data, &options)?;
            let elapsed = start.elapsed();
            write(&output, &png)?;
            println!(
                "{} -> {} bytes in {:.1} ms",
                data.len(),
                png.len(),
                elapsed.as_secs_f64() * 1000.0
            );
        }
    }
    Ok(())
}
