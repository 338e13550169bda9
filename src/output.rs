use crate::convert::Generated;
use crate::error::Result;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Write each converted quest to `<out_dir>/<filename>.json`, creating the
/// directory when needed. Items are written in order, so when two share a
/// filename the later one is what ends up on disk.
pub fn write_all(out_dir: &Path, generated: &[Generated]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(generated.len());
    for item in generated {
        let path = out_dir.join(format!("{}.json", item.filename));
        fs::write(&path, &item.text)?;
        debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
