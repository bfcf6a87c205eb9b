use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ProcessingError {
    Skipped(String, String), // file_path, reason
    Error(String, String),   // file_path, error_message
}

/// Read a source file as text, refusing anything above `max_file_size`.
///
/// Invalid UTF-8 is an error rather than a skip: the file is reported in
/// the artifact so it is not silently missing from the graph.
pub fn read_text_file(full_path: &Path, max_file_size: usize) -> Result<String, ProcessingError> {
    let file_path = full_path.to_string_lossy().to_string();

    let mut file = File::open(full_path).map_err(|e| {
        ProcessingError::Error(file_path.clone(), format!("Failed to open file: {e}"))
    })?;

    let metadata = file.metadata().map_err(|e| {
        ProcessingError::Error(file_path.clone(), format!("Failed to read metadata: {e}"))
    })?;

    let file_len = metadata.len() as usize;
    if file_len > max_file_size {
        return Err(ProcessingError::Skipped(
            file_path,
            format!("File too large: {} bytes", metadata.len()),
        ));
    }

    if file_len == 0 {
        return Ok(String::new());
    }

    let mut bytes = Vec::with_capacity(file_len);
    file.read_to_end(&mut bytes).map_err(|e| {
        ProcessingError::Error(file_path.clone(), format!("Failed to read file: {e}"))
    })?;

    String::from_utf8(bytes)
        .map_err(|e| ProcessingError::Error(file_path, format!("Non-UTF-8 content: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_text_file_ok() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "class A {}").unwrap();

        let content = read_text_file(file.path(), 1024).expect("should read");
        assert_eq!(content, "class A {}");
    }

    #[test]
    fn test_read_text_file_empty() {
        let file = NamedTempFile::new().unwrap();
        let content = read_text_file(file.path(), 1024).expect("empty ok");
        assert!(content.is_empty());
    }

    #[test]
    fn test_read_text_file_too_large() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), vec![b'a'; 2048]).unwrap();

        let err = read_text_file(file.path(), 1024).expect_err("should error");
        match err {
            ProcessingError::Skipped(_path, reason) => assert!(reason.contains("File too large")),
            _ => panic!("unexpected error type"),
        }
    }

    #[test]
    fn test_read_text_file_invalid_utf8() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), [0xff, 0xfe, 0x00]).unwrap();

        match read_text_file(file.path(), 1024) {
            Err(ProcessingError::Error(_path, message)) => {
                assert!(message.starts_with("Non-UTF-8 content"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
