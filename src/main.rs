//! Main entry point for the wadlink CLI application.
//!
//! Reads and writes whole files and reports progress; all format work is
//! done by the in-memory codec in [`wadlink::wad`].

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::fs;

use wadlink::cli::{Command, InfoArgs, LinkArgs, UnlinkArgs, has_wad_extension};
use wadlink::wad::{WadBuilder, WadExtractor, WadHeader, compression};
use wadlink::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Unlink(args) => unlink(args, &cli).await,
        Command::Link(args) => link(args, &cli).await,
        Command::Info(args) => info(args).await,
        Command::About => {
            about();
            Ok(())
        }
    }
}

/// Extract every entry of a .wad into a directory.
///
/// Stops at the first entry that fails; files already written are kept.
async fn unlink(args: &UnlinkArgs, cli: &Cli) -> Result<()> {
    // small check to see if the .wad is already unlinked
    if !has_wad_extension(&args.file) {
        bail!(
            "{} is not a .wad file; it may already be unlinked \
             (add the .wad extension if it is not)",
            args.file
        );
    }

    let data = fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file))?;

    let extractor = WadExtractor::with_compressor(&data, compression::select(args.zlib))
        .with_context(|| format!("Failed to unlink {}", args.file))?;

    let output_dir = match &args.extract_dir {
        Some(dir) => PathBuf::from(dir),
        None => default_extract_dir(Path::new(&args.file))?,
    };

    if !cli.is_quiet() {
        println!("Unlinking: {}", args.file);
        print_header(extractor.header());
        println!();
    }

    let mut total = 0u64;
    extractor
        .extract_all(&output_dir, |entry, written| {
            total += written as u64;
            if !cli.is_quiet() {
                println!("  extracting: {}", entry.name);
            }
            if written != entry.decompressed_size as usize && !cli.is_very_quiet() {
                eprintln!(
                    "warning: {} decompressed to {} bytes, table says {}",
                    entry.name, written, entry.decompressed_size
                );
            }
        })
        .await
        .with_context(|| format!("Failed to unlink {}", args.file))?;

    if !cli.is_quiet() {
        eprintln!(
            "\n{} files ({}) extracted to {}",
            extractor.list_files().len(),
            format_size(total),
            output_dir.display()
        );
    }

    Ok(())
}

/// Pack the regular files directly inside a folder into a .wad.
async fn link(args: &LinkArgs, cli: &Cli) -> Result<()> {
    // small check to see if the input is already linked
    if has_wad_extension(&args.folder) {
        bail!(
            "{} is already a .wad file (remove the .wad extension if it is a folder)",
            args.folder
        );
    }

    let folder = Path::new(&args.folder);
    let output = match &args.output {
        Some(path) => PathBuf::from(path),
        None => default_wad_path(folder)?,
    };

    if !cli.is_quiet() {
        println!("Linking: {}", args.folder);
    }

    let files = list_folder(folder)
        .await
        .with_context(|| format!("Failed to list {}", args.folder))?;

    let mut builder = WadBuilder::with_compressor(compression::select(args.zlib))
        .format_version(args.format_version);

    for path in &files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("{} has no usable file name", path.display()))?;
        if !cli.is_quiet() {
            println!("  compressing: {}", name);
        }

        let contents = fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        builder
            .add_file(name, contents)
            .with_context(|| format!("Failed to link {}", args.folder))?;
    }

    let data = builder
        .build()
        .with_context(|| format!("Failed to link {}", args.folder))?;
    fs::write(&output, &data)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if !cli.is_quiet() {
        eprintln!(
            "\n{} files linked into {} ({})",
            files.len(),
            output.display(),
            format_size(data.len() as u64)
        );
    }

    Ok(())
}

/// Print the header, then the entry table.
///
/// Supports two output formats:
/// - Simple format: just entry names, one per line
/// - Verbose format (`-v`): sizes, ratio and payload offset per entry
async fn info(args: &InfoArgs) -> Result<()> {
    let data = fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file))?;
    let extractor = WadExtractor::new(&data)
        .with_context(|| format!("Failed to read {}", args.file))?;

    print_header(extractor.header());
    println!();

    let entries = extractor.list_files();
    if !args.verbose {
        for entry in entries {
            println!("{}", entry.name);
        }
        return Ok(());
    }

    println!(
        "{:>10}  {:>10}  {:>5}  {:>10}  Name",
        "Length", "Size", "Cmpr", "Offset"
    );
    println!("{}", "-".repeat(60));

    let mut total_decompressed = 0u64;
    let mut total_compressed = 0u64;

    for entry in entries {
        println!(
            "{:>10}  {:>10}  {}  {:>10}  {}",
            entry.decompressed_size,
            entry.compressed_size,
            ratio(entry.compressed_size as u64, entry.decompressed_size as u64),
            entry.offset,
            entry.name
        );
        total_decompressed += entry.decompressed_size as u64;
        total_compressed += entry.compressed_size as u64;
    }

    println!("{}", "-".repeat(60));
    println!(
        "{:>10}  {:>10}  {}  {:>10}  {} files",
        total_decompressed,
        total_compressed,
        ratio(total_compressed, total_decompressed),
        "",
        entries.len()
    );

    Ok(())
}

fn about() {
    println!("tool information:");
    println!(
        "wadlink {} :: a linker / unlinker for the .wad asset container",
        env!("CARGO_PKG_VERSION")
    );
    println!("        :: big-endian (console) layout, DEFLATE payloads");
}

fn print_header(header: &WadHeader) {
    let (year, month, day) = header.created_date();
    let (hour, minute, second) = header.created_time();

    println!("WAD Information:");
    println!("Magic: 0x{:08X}", header.magic);
    println!(
        "Timestamp: {:02}:{:02}:{:02}, {:02}/{:02}/{:04} ({:08X})",
        hour, minute, second, day, month, year, header.timestamp
    );
    println!("Entries: {}", header.entry_count);
    println!("Format version: {}", header.format_version);
}

/// `./<file stem>` for an input .wad.
fn default_extract_dir(wad: &Path) -> Result<PathBuf> {
    let stem = wad
        .file_stem()
        .with_context(|| format!("{} has no file name", wad.display()))?;
    Ok(Path::new(".").join(stem))
}

/// `./<folder name>.wad` for an input folder.
fn default_wad_path(folder: &Path) -> Result<PathBuf> {
    let name = folder
        .file_name()
        .with_context(|| format!("cannot derive a .wad name from {}", folder.display()))?;
    let mut file = name.to_os_string();
    file.push(".wad");
    Ok(PathBuf::from(file))
}

/// Regular files directly inside `folder`, sorted by path.
async fn list_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut dir = fs::read_dir(folder).await?;
    let mut files = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Compression ratio as percentage saved.
fn ratio(compressed: u64, decompressed: u64) -> String {
    if decompressed > 0 && compressed <= decompressed {
        format!("{:>4}%", 100 - (compressed * 100 / decompressed))
    } else {
        "  0%".to_string()
    }
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
