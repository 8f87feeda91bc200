//! Path classification helpers used by the engine and the stages.
//!
//! Everything here is synchronous and, apart from [`remove_files_of_kind`],
//! read-only: the engine calls these while constructing a job.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::kind::FileKind;

/// Returns the files of `kind` for `path`.
///
/// - directory: its direct children of that kind, sorted by path
/// - file: the file itself if it is of that kind
/// - anything else: nothing
pub fn files_of_kind(path: &Path, kind: FileKind) -> io::Result<Vec<PathBuf>> {
    if path.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();
            // Follows symlinks, like the single-file branch
            if file_path.is_file() && kind.matches(&file_path) {
                files.push(file_path);
            }
        }
        files.sort();
        Ok(files)
    } else if path.is_file() && kind.matches(path) {
        Ok(vec![path.to_path_buf()])
    } else {
        Ok(Vec::new())
    }
}

/// Returns `path` itself for a directory, its parent for a file, and `None`
/// when the path exists in neither form.
pub fn containing_dir(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        Some(path.to_path_buf())
    } else if path.is_file() {
        Some(
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        )
    } else {
        None
    }
}

/// Maps an input item to its converted location: same file stem, `dest`
/// extension, rooted at `output_dir`.
pub fn output_path_for(item: &Path, output_dir: &Path, dest: FileKind) -> PathBuf {
    let file_name = item.file_name().map(Path::new).unwrap_or(item);
    let renamed = match dest.extension() {
        Some(ext) => file_name.with_extension(ext),
        None => file_name.to_path_buf(),
    };
    output_dir.join(renamed)
}

/// Makes `path` absolute against the working directory and folds `.` and
/// `..` lexically, so `.` or `album/disc/..` name a real last component.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

/// Appends `suffix` to the last component of `path` (`/music/album` + `_x` -> `/music/album_x`).
///
/// Trailing separators are dropped first, so `/music/album/` gives the same result.
pub fn with_appended_suffix(path: &Path, suffix: &str) -> PathBuf {
    let normalized: PathBuf = path.components().collect();
    let mut name: OsString = normalized.into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Appends `.ext` to the full path (`/music/album` -> `/music/album.zip`).
pub fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    with_appended_suffix(path, &format!(".{}", ext))
}

/// Whether `path` contains characters the host filesystem rejects.
pub fn has_invalid_chars(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text.chars().any(is_invalid_path_char)
}

#[cfg(windows)]
fn is_invalid_path_char(c: char) -> bool {
    matches!(c, '"' | '<' | '>' | '|') || c.is_control()
}

#[cfg(not(windows))]
fn is_invalid_path_char(c: char) -> bool {
    c == '\0'
}

/// Deletes the files of `kind` for `path` and returns how many were removed.
///
/// For a directory this sweeps its direct children. For a file it removes the
/// sibling with the same stem and the kind's extension.
pub fn remove_files_of_kind(path: &Path, kind: FileKind) -> io::Result<usize> {
    let targets = if path.is_dir() {
        files_of_kind(path, kind)?
    } else if path.is_file() {
        match kind.extension() {
            Some(ext) => vec![path.with_extension(ext)],
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };

    let mut removed = 0;
    for target in targets {
        if target.is_file() {
            std::fs::remove_file(&target)?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, name.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_output_path_for() {
        let output = output_path_for(
            Path::new("/test1/sample1.wav"),
            Path::new("/test1"),
            FileKind::Mp3,
        );
        assert_eq!(output, PathBuf::from("/test1/sample1.mp3"));

        let output = output_path_for(
            Path::new("/in/a.b.wav"),
            Path::new("/out"),
            FileKind::Mp3,
        );
        assert_eq!(output, PathBuf::from("/out/a.b.mp3"));
    }

    #[test]
    fn test_files_of_kind() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        touch(dir, "sample2.wav");
        touch(dir, "sample1.wav");
        touch(dir, "sample1.mp3");
        touch(dir, "sample1.zip");
        std::fs::create_dir(dir.join("nested.wav")).unwrap();

        let waves = files_of_kind(dir, FileKind::Wave).unwrap();
        assert_eq!(waves, vec![dir.join("sample1.wav"), dir.join("sample2.wav")]);

        let mp3s = files_of_kind(dir, FileKind::Mp3).unwrap();
        assert_eq!(mp3s, vec![dir.join("sample1.mp3")]);

        let all = files_of_kind(dir, FileKind::All).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_files_of_kind_follows_symlinks() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        let album = temp.path().join("album");
        std::fs::create_dir(&real).unwrap();
        std::fs::create_dir(&album).unwrap();
        let target = touch(&real, "a.wav");
        let link = album.join("a.wav");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(files_of_kind(&album, FileKind::Wave).unwrap(), vec![link.clone()]);
        assert_eq!(files_of_kind(&link, FileKind::Wave).unwrap(), vec![link]);

        // A dangling link is skipped, not an error
        std::os::unix::fs::symlink(real.join("gone.wav"), album.join("b.wav")).unwrap();
        assert_eq!(files_of_kind(&album, FileKind::Wave).unwrap().len(), 1);
    }

    #[test]
    fn test_files_of_kind_single_file() {
        let temp = TempDir::new().unwrap();
        let wave = touch(temp.path(), "sample1.wav");

        assert_eq!(files_of_kind(&wave, FileKind::Wave).unwrap(), vec![wave.clone()]);
        assert!(files_of_kind(&wave, FileKind::Mp3).unwrap().is_empty());
        assert!(files_of_kind(&temp.path().join("missing.wav"), FileKind::Wave)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_containing_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let file = touch(dir, "sample1.wav");

        assert_eq!(containing_dir(dir), Some(dir.to_path_buf()));
        assert_eq!(containing_dir(&file), Some(dir.to_path_buf()));
        assert_eq!(containing_dir(Path::new("xxx-does-not-exist")), None);
    }

    #[test]
    fn test_resolve() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve(Path::new(".")).unwrap(), cwd);
        assert_eq!(resolve(Path::new("album/disc/..")).unwrap(), cwd.join("album"));
        assert_eq!(
            resolve(Path::new("/music/./album/")).unwrap(),
            PathBuf::from("/music/album")
        );
        assert_eq!(
            with_appended_extension(&resolve(Path::new(".")).unwrap(), "zip"),
            with_appended_extension(&cwd, "zip")
        );
    }

    #[test]
    fn test_with_appended_suffix() {
        assert_eq!(
            with_appended_suffix(Path::new("/music/album/"), "_20240102_030405_006"),
            PathBuf::from("/music/album_20240102_030405_006")
        );
    }

    #[test]
    fn test_with_appended_extension() {
        assert_eq!(
            with_appended_extension(Path::new("/music/album"), "zip"),
            PathBuf::from("/music/album.zip")
        );
        assert_eq!(
            with_appended_extension(Path::new("/music/album/"), "zip"),
            PathBuf::from("/music/album.zip")
        );
        assert_eq!(
            with_appended_extension(Path::new("/music/a.wav"), "zip"),
            PathBuf::from("/music/a.wav.zip")
        );
    }

    #[test]
    fn test_has_invalid_chars() {
        assert!(!has_invalid_chars(Path::new("/music/album")));
        assert!(has_invalid_chars(Path::new("/music/al\0bum")));
    }

    #[test]
    fn test_remove_files_of_kind() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        touch(dir, "a.mp3");
        touch(dir, "b.mp3");
        let keep = touch(dir, "a.wav");

        assert_eq!(remove_files_of_kind(dir, FileKind::Mp3).unwrap(), 2);
        assert!(files_of_kind(dir, FileKind::Mp3).unwrap().is_empty());
        assert!(keep.exists());

        touch(dir, "a.mp3");
        assert_eq!(remove_files_of_kind(&keep, FileKind::Mp3).unwrap(), 1);
        assert!(!dir.join("a.mp3").exists());
    }
}
