use std::path::Path;

/// Reads a whole UTF-8 text file.
///
/// Returns an empty string (and logs why) when the file is missing, unreadable
/// or not valid UTF-8.
pub fn read_file(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("read {} bytes from {}", content.len(), path.display());
            content
        }
        Err(e) => {
            log::error!("unable to read {}: {e}", path.display());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        assert!(read_file("definitely/not/here.wgsl").is_empty());
    }

    #[test]
    fn reads_existing_file() {
        let path = std::env::temp_dir().join(format!("tessera-read-{}.txt", std::process::id()));
        std::fs::write(&path, "fn main() {}").unwrap();
        assert_eq!(read_file(&path), "fn main() {}");
        std::fs::remove_file(&path).unwrap();
    }
}
