//! Subcommand handlers
//!
//! Handlers write their normal output to the supplied sink so they can be
//! driven from tests; diagnostics go through `tracing`.

use anyhow::{Context, Result};
use fast_asar_formats::{Archive, DecodeOptions, EncodeOptions, PackOptions};
use memmap2::{Mmap, MmapOptions};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::output::{OutputStyle, format_label};

/// Pack `input` into the archive at `output`
pub fn pack(input: &Path, output: &Path, sort: bool, out: &mut impl Write) -> Result<()> {
    let archive = Archive::from_directory(input, &PackOptions::default())
        .with_context(|| format!("failed to pack {}", input.display()))?;
    let written = archive
        .save(output, &EncodeOptions::default().with_sort(sort))
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        files = archive.file_count(),
        bytes = written,
        sorted = sort,
        "packed archive"
    );
    writeln!(
        out,
        "packed {} files into {} ({written} bytes)",
        archive.file_count(),
        output.display()
    )?;
    Ok(())
}

/// Extract the archive at `archive` into `output`
pub fn extract(archive: &Path, output: &Path) -> Result<()> {
    let mmap = map_archive(archive)?;
    let decoded = Archive::decode(&mmap, &DecodeOptions::default())
        .with_context(|| format!("failed to decode {}", archive.display()))?;
    decoded
        .extract_to_directory(output)
        .with_context(|| format!("failed to extract into {}", output.display()))?;

    info!(files = decoded.file_count(), dest = %output.display(), "extracted archive");
    Ok(())
}

/// Print every path in the archive, directories included
pub fn list(archive: &Path, out: &mut impl Write) -> Result<()> {
    let mmap = map_archive(archive)?;
    let decoded = Archive::decode(&mmap, &DecodeOptions::default().with_load_content(false))
        .with_context(|| format!("failed to decode {}", archive.display()))?;

    for item in decoded.walk(true) {
        writeln!(out, "{}", item.path_string())?;
    }
    Ok(())
}

/// Print the header size and header JSON, or write the JSON to `dest`
pub fn inspect(
    archive: &Path,
    dest: Option<&Path>,
    style: OutputStyle,
    out: &mut impl Write,
) -> Result<()> {
    let mmap = map_archive(archive)?;
    let options = DecodeOptions::default()
        .with_load_content(false)
        .with_parse_metadata(true);
    let decoded = Archive::decode(&mmap, &options)
        .with_context(|| format!("failed to decode {}", archive.display()))?;
    let metadata = decoded
        .parse_metadata()
        .context("decoder returned no header metadata")?;

    writeln!(
        out,
        "{} {}",
        format_label("header size:", style),
        metadata.header_size
    )?;

    let pretty = serde_json::to_string_pretty(&metadata.header)?;
    match dest {
        Some(dest) => {
            fs::write(dest, &pretty)
                .with_context(|| format!("failed to write {}", dest.display()))?;
            writeln!(
                out,
                "{} {}",
                format_label("raw header written to", style),
                dest.display()
            )?;
        }
        None => writeln!(out, "{}\n{pretty}", format_label("raw header:", style))?,
    }
    Ok(())
}

fn map_archive(path: &Path) -> Result<Mmap> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    // The map is read-only and dropped before the command returns
    #[allow(unsafe_code)]
    let mmap = unsafe {
        MmapOptions::new()
            .map(&file)
            .with_context(|| format!("failed to map {}", path.display()))?
    };
    Ok(mmap)
}
