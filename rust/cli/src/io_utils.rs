//! File and stdin helpers shared by the commands.
//!
//! History files may be plain JSONL or Zstandard-compressed (`.zst` suffix); both
//! directions pick the codec from the extension.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

/// Reads one trimmed line, `None` on EOF or a read error.
///
/// ```rust,no_run
/// use std::io::{self, BufRead};
/// # use duel21_cli::io_utils::read_stdin_line;
///
/// let stdin = io::stdin();
/// let mut handle = stdin.lock();
/// if let Some(line) = read_stdin_line(&mut handle) {
///     println!("You entered: {}", line);
/// }
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "zst")
}

/// Reads a history file, decompressing `.zst`. A leading UTF-8 BOM is dropped.
pub fn read_text_auto(path: &str) -> Result<String, String> {
    let mut content = if is_compressed(Path::new(path)) {
        let comp = std::fs::read(path).map_err(|e| e.to_string())?;
        let dec = zstd::stream::decode_all(comp.as_slice()).map_err(|e| e.to_string())?;
        String::from_utf8(dec).map_err(|e| e.to_string())?
    } else {
        std::fs::read_to_string(path).map_err(|e| e.to_string())?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// Creates (truncating) an output file, compressing when the path ends in `.zst`.
/// The compressed stream is finished when the writer is dropped.
pub fn create_output(path: &Path) -> Result<Box<dyn Write>, String> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .map_err(|e| format!("Failed to open output file {}: {}", path.display(), e))?;
    if is_compressed(path) {
        let encoder = zstd::Encoder::new(file, 0).map_err(|e| e.to_string())?;
        Ok(Box::new(encoder.auto_finish()))
    } else {
        Ok(Box::new(BufWriter::new(file)))
    }
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
        }
    }
    Ok(())
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}
