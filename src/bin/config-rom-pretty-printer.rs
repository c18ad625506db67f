// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 Takashi Sakamoto

//! Pretty printer for image of configuration ROM in IEEE 1212.
//!
//! The tool reads the image from the given file or standard input, then prints annotated text
//! lines for the blocks in the image to standard output. The image should be dumped from any
//! process or shell redirection; e.g. the `config_rom` attribute of the node under Linux sysfs.

use std::fs::File;
use std::io::{IsTerminal, Read, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ieee1212_config_rom_printer::{align_to_host_order, render, MAX_ROM_SIZE};

/// Pretty printer for image of configuration ROM in IEEE 1212.
#[derive(Debug, Parser)]
#[command(name = "config-rom-pretty-printer", version, about)]
struct Arguments {
    /// The name of file for the image of configuration ROM, or "-" for standard input.
    #[arg(default_value = "-")]
    image: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let arguments = Arguments::parse();

    let mut data = read_image(&arguments.image)?;
    align_to_host_order(&mut data);

    let lines = render(&data).context("failed to detect layout of blocks in the image")?;

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    for line in &lines {
        writeln!(output, "{}", line)?;
    }
    output.flush()?;

    Ok(())
}

fn read_image(image: &str) -> Result<Vec<u8>> {
    let mut data = Vec::new();

    if image == "-" {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            bail!(
                "A terminal is detected for standard input. Output from any process or shell \
                 redirection should be referred instead."
            );
        }
        stdin
            .lock()
            .take(MAX_ROM_SIZE as u64)
            .read_to_end(&mut data)
            .context("failed to read standard input")?;
    } else {
        File::open(image)
            .with_context(|| format!("failed to open {}", image))?
            .take(MAX_ROM_SIZE as u64)
            .read_to_end(&mut data)
            .with_context(|| format!("failed to read {}", image))?;
    }

    if data.is_empty() {
        bail!("nothing available for the image of configuration ROM");
    }

    Ok(data)
}
