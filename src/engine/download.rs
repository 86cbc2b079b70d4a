use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::error::SeedError;
use crate::ui::Ui;

/// Progress is reported once per this many bytes
const REPORT_STEP: u64 = 1 << 20;

/// Board item for the archive transfer, counted in KiB
pub const DOWNLOAD_ITEM: &str = "postgresql.zip (KiB)";
/// Board item for extraction, counted in archive entries
pub const UNPACK_ITEM: &str = "unpack (entries)";

/// Writer that reports how much has passed through it
struct Reporting<'a, W> {
    inner: W,
    written: u64,
    total: u64,
    ui: &'a mut dyn Ui,
}

impl<W: Write> Write for Reporting<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        let before = self.written / REPORT_STEP;
        self.written += n as u64;
        if self.written / REPORT_STEP != before {
            self.ui
                .progress(DOWNLOAD_ITEM, self.written / 1024, self.total / 1024);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Stream `url` to `dest`. Returns the number of bytes written.
pub fn download(url: &str, dest: &Path, ui: &mut dyn Ui) -> Result<u64, SeedError> {
    let client = Client::builder()
        .user_agent(concat!("pokedex-seed/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SeedError::acquisition("download", e))?;

    log::debug!("GET {}", url);
    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| SeedError::acquisition("download", e))?;

    let file = File::create(dest).map_err(|e| SeedError::io(dest, e))?;
    let total = response.content_length().unwrap_or(0);
    let written = copy_reporting(&mut response, file, total, ui)
        .map_err(|e| SeedError::acquisition("download", e))?;

    ui.log(&format!("Download complete ({} KiB)", written / 1024));
    Ok(written)
}

/// Copy `reader` into `writer`, reporting every `REPORT_STEP` bytes and once
/// more at the end
fn copy_reporting(
    reader: &mut impl Read,
    writer: impl Write,
    total: u64,
    ui: &mut dyn Ui,
) -> io::Result<u64> {
    let mut sink = Reporting {
        inner: BufWriter::new(writer),
        written: 0,
        total,
        ui,
    };
    io::copy(reader, &mut sink)?;
    sink.flush()?;

    let written = sink.written;
    let total = if total == 0 { written } else { total };
    sink.ui.progress(DOWNLOAD_ITEM, written / 1024, total / 1024);
    Ok(written)
}

/// Unpack every entry of a zip archive under `dest_dir`, keeping its relative path.
/// Entries that would escape `dest_dir` are skipped.
pub fn extract_zip(zip_path: &Path, dest_dir: &Path, ui: &mut dyn Ui) -> Result<usize, SeedError> {
    let file = File::open(zip_path).map_err(|e| SeedError::io(zip_path, e))?;
    let reader = BufReader::new(file);
    let mut archive = ZipArchive::new(reader).map_err(|e| SeedError::acquisition("unpack", e))?;

    fs::create_dir_all(dest_dir).map_err(|e| SeedError::io(dest_dir, e))?;

    let total_files = archive.len();
    let mut extracted = 0;

    for i in 0..total_files {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| SeedError::acquisition("unpack", e))?;

        let relative = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                log::warn!("skipping unsafe archive entry {}", entry.name());
                continue;
            }
        };
        let dest_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest_path).map_err(|e| SeedError::io(&dest_path, e))?;
        } else {
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent).map_err(|e| SeedError::io(parent, e))?;
            }
            let mut dest_file =
                File::create(&dest_path).map_err(|e| SeedError::io(&dest_path, e))?;
            io::copy(&mut entry, &mut dest_file)
                .map_err(|e| SeedError::acquisition("unpack", e))?;
            extracted += 1;
        }

        ui.progress(UNPACK_ITEM, (i + 1) as u64, total_files as u64);
    }

    Ok(extracted)
}

/// Delete the named directories found directly under any of `bases`
pub fn prune(bases: &[PathBuf], names: &[&str]) -> Result<Vec<PathBuf>, SeedError> {
    let mut removed = Vec::new();
    for base in bases {
        for name in names {
            let dir = base.join(name);
            if dir.is_dir() {
                fs::remove_dir_all(&dir).map_err(|e| SeedError::io(&dir, e))?;
                removed.push(dir);
            }
        }
    }
    Ok(removed)
}
