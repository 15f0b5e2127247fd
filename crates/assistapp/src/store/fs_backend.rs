use super::backend::{LineBackend, RawLine};
use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One record file on disk.
pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// A hand-edited file may lack its final newline; appending straight
    /// after it would glue two records together.
    fn ends_mid_line(file: &mut fs::File) -> Result<bool> {
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::Start(len - 1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }
}

/// Splits on `\n`, dropping a trailing `\r` and the empty tail after a final
/// newline. Each line is decoded on its own.
fn split_lines(bytes: &[u8]) -> Vec<RawLine> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|b| *b == b'\n')
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8(line.to_vec())
        })
        .collect()
}

impl LineBackend for FsBackend {
    fn read_lines(&self) -> Result<Option<Vec<RawLine>>> {
        if !self.path.exists() {
            self.ensure_dir()?;
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        Ok(Some(split_lines(&bytes)))
    }

    fn append_line(&self, line: &str) -> Result<()> {
        self.ensure_dir()?;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut buf = String::with_capacity(line.len() + 2);
        if Self::ends_mid_line(&mut file)? {
            buf.push('\n');
        }
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())?;
        Ok(())
    }

    fn rewrite(&self, lines: &[String]) -> Result<()> {
        self.ensure_dir()?;

        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        // Atomic Write
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_file = self
            .path
            .with_file_name(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));
        fs::write(&tmp_file, content)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(e.into());
        }
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_none_and_creates_dir() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("nested/data/todo_list.txt"));

        assert_eq!(backend.read_lines().unwrap(), None);
        assert!(dir.path().join("nested/data").is_dir());
    }

    #[test]
    fn append_then_read() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("log.txt"));

        backend.append_line("one").unwrap();
        backend.append_line("two").unwrap();

        assert_eq!(
            backend.read_lines().unwrap(),
            Some(vec![Ok("one".to_string()), Ok("two".to_string())])
        );
        assert_eq!(
            fs::read_to_string(backend.path()).unwrap(),
            "one\ntwo\n"
        );
    }

    #[test]
    fn append_repairs_missing_final_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "hand edited").unwrap();

        let backend = FsBackend::new(&path);
        backend.append_line("next").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hand edited\nnext\n");
    }

    #[test]
    fn rewrite_replaces_contents_and_leaves_no_tmp_files() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("log.txt"));
        backend.append_line("old").unwrap();

        backend
            .rewrite(&["a".to_string(), "b".to_string()])
            .unwrap();

        assert_eq!(fs::read_to_string(backend.path()).unwrap(), "a\nb\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn rewrite_with_no_lines_empties_the_file() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("log.txt"));
        backend.append_line("old").unwrap();

        backend.rewrite(&[]).unwrap();

        assert_eq!(fs::read_to_string(backend.path()).unwrap(), "");
        assert_eq!(backend.read_lines().unwrap(), Some(vec![]));
    }

    #[test]
    fn reads_crlf_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "a\r\nb\r\n").unwrap();

        let backend = FsBackend::new(&path);
        assert_eq!(
            backend.read_lines().unwrap(),
            Some(vec![Ok("a".to_string()), Ok("b".to_string())])
        );
    }

    #[test]
    fn invalid_utf8_fails_only_its_own_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, b"a\n\xff\xfe\nb").unwrap();

        let lines = FsBackend::new(&path).read_lines().unwrap().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], Ok("a".to_string()));
        assert!(lines[1].is_err());
        assert_eq!(lines[2], Ok("b".to_string()));
    }

    #[test]
    fn split_keeps_interior_blank_lines() {
        assert!(split_lines(b"").is_empty());
        assert_eq!(split_lines(b"\n"), vec![Ok(String::new())]);
        assert_eq!(
            split_lines(b"x\n\ny\n"),
            vec![Ok("x".to_string()), Ok(String::new()), Ok("y".to_string())]
        );
    }
}
