//! Locate a named file or directory in a build tree and stage a copy of it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use depforge_core::{PipelineError, PipelineResult};
use tracing::debug;

/// What the search found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Dir(PathBuf),
    File(PathBuf),
}

struct Listing {
    dirs: Vec<(String, PathBuf, bool)>,
    files: Vec<(String, PathBuf)>,
}

/// Read one directory level, sorted byte-wise by name.
///
/// Each dir entry carries whether it may be descended into (symlinked
/// directories are matched but never walked).
fn list(dir: &Path) -> io::Result<Listing> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.filter_map(Result::ok).collect();
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut listing = Listing {
        dirs: Vec::new(),
        files: Vec::new(),
    };
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            listing.dirs.push((name, path, true));
        } else if file_type.is_symlink() && path.is_dir() {
            listing.dirs.push((name, path, false));
        } else {
            listing.files.push((name, path));
        }
    }
    Ok(listing)
}

/// Pre-order search for `name` under `root`.
///
/// At each level directories are checked before files, then subdirectories
/// are descended in name order. The first match wins.
pub fn find(name: &str, root: &Path) -> Option<Found> {
    let listing = match list(root) {
        Ok(listing) => listing,
        Err(e) => {
            debug!(dir = %root.display(), error = %e, "Skipping unreadable directory");
            return None;
        }
    };

    if let Some((_, path, _)) = listing.dirs.iter().find(|(n, _, _)| n == name) {
        return Some(Found::Dir(path.clone()));
    }
    if let Some((_, path)) = listing.files.iter().find(|(n, _)| n == name) {
        return Some(Found::File(path.clone()));
    }

    listing
        .dirs
        .iter()
        .filter(|(_, _, walk)| *walk)
        .find_map(|(_, path, _)| find(name, path))
}

/// Search `search_root` for an entry called `name` and copy the first match to
/// `destination`.
///
/// An existing destination is removed first so the result is always an exact
/// copy of the match. Returns `Ok(false)` without touching the filesystem when
/// nothing matches.
pub fn find_and_copy(name: &str, search_root: &Path, destination: &Path) -> PipelineResult<bool> {
    let Some(found) = find(name, search_root) else {
        debug!(artifact = name, root = %search_root.display(), "No match");
        return Ok(false);
    };

    remove_existing(destination)?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PipelineError::io(format!("Failed to create {}", parent.display()), e)
        })?;
    }

    match &found {
        Found::Dir(src) => copy_dir_recursive(src, destination).map_err(|e| {
            PipelineError::io(
                format!("Failed to copy {} to {}", src.display(), destination.display()),
                e,
            )
        })?,
        Found::File(src) => {
            fs::copy(src, destination).map_err(|e| {
                PipelineError::io(
                    format!("Failed to copy {} to {}", src.display(), destination.display()),
                    e,
                )
            })?;
        }
    }

    debug!(?found, destination = %destination.display(), "Staged");
    Ok(true)
}

fn remove_existing(path: &Path) -> PipelineResult<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| PipelineError::io(format!("Failed to remove {}", path.display()), e))
}

/// Copy a directory recursively, recreating symlinks on Unix.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dst.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            copy_symlink(&path, &dest_path)?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&path, &dest_path)?;
        } else {
            fs::copy(&path, &dest_path)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        copy_dir_recursive(src, dst)
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_directory_matched_before_descending() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("tree");
        touch(&root.join("a").join("include").join("x.h"), "dir");
        // `b` sorts before `include` but is only walked after this level
        touch(&root.join("a").join("b").join("include"), "file");

        match find("include", &root).unwrap() {
            Found::Dir(p) => assert!(p.ends_with("a/include")),
            Found::File(p) => panic!("expected directory, got {}", p.display()),
        }
    }

    #[test]
    fn test_first_match_in_name_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("b").join("lib.a"), "from b");
        touch(&root.join("a").join("lib.a"), "from a");

        let dest = temp.path().join("out").join("lib.a");
        assert!(find_and_copy("lib.a", root, &dest).unwrap());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "from a");
    }

    #[test]
    fn test_shallow_match_wins_over_deeper() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("src");
        touch(&root.join("a").join("deep").join("lib.a"), "deep");
        touch(&root.join("lib.a"), "top");

        assert_eq!(find("lib.a", &root), Some(Found::File(root.join("lib.a"))));
    }

    #[test]
    fn test_missing_root_is_no_match() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");
        assert!(!find_and_copy("lib.a", &temp.path().join("absent"), &dest).unwrap());
        assert!(!dest.exists());
    }

    /// Relative paths and file contents under `root`, sorted.
    fn snapshot(root: &Path) -> Vec<(PathBuf, Option<String>)> {
        fn walk(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, Option<String>)>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                if path.is_dir() {
                    out.push((rel, None));
                    walk(root, &path, out);
                } else {
                    out.push((rel, Some(fs::read_to_string(&path).unwrap())));
                }
            }
        }
        let mut out = Vec::new();
        walk(root, root, &mut out);
        out.sort();
        out
    }

    #[test]
    fn test_empty_tree_is_no_match_and_untouched() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("tree");
        fs::create_dir_all(root.join("empty")).unwrap();
        touch(&root.join("other").join("lib.so"), "so");
        let before = snapshot(temp.path());

        let dest = temp.path().join("out").join("lib.a");
        assert!(!find_and_copy("lib.a", &root, &dest).unwrap());
        assert_eq!(snapshot(temp.path()), before);
    }

    #[test]
    fn test_repeated_directory_copy_replaces_destination() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("src");
        touch(&root.join("include").join("api.h"), "api");
        touch(&root.join("include").join("sub").join("detail.h"), "detail");

        let dest = temp.path().join("stage").join("include");
        assert!(find_and_copy("include", &root, &dest).unwrap());
        let once = snapshot(&dest);

        touch(&dest.join("stale.h"), "left over");
        assert!(find_and_copy("include", &root, &dest).unwrap());
        assert_eq!(snapshot(&dest), once);
        assert!(!dest.join("stale.h").exists());
    }

    #[test]
    fn test_repeated_file_copy_is_identical() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("build");
        touch(&root.join("out").join("lib.a"), "archive bytes");

        let dest = temp.path().join("stage").join("lib.a");
        assert!(find_and_copy("lib.a", &root, &dest).unwrap());
        let once = fs::read(&dest).unwrap();

        fs::write(&dest, "corrupted and longer than before").unwrap();
        assert!(find_and_copy("lib.a", &root, &dest).unwrap());
        assert_eq!(fs::read(&dest).unwrap(), once);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_recreated() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("include");
        touch(&src.join("real.h"), "header");
        std::os::unix::fs::symlink("real.h", src.join("alias.h")).unwrap();

        let dst = temp.path().join("copy");
        copy_dir_recursive(&src, &dst).unwrap();

        assert!(dst.join("alias.h").is_symlink());
        assert_eq!(fs::read_link(dst.join("alias.h")).unwrap(), PathBuf::from("real.h"));
        assert_eq!(fs::read_to_string(dst.join("alias.h")).unwrap(), "header");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dirs_not_descended() {
        let temp = TempDir::new().unwrap();
        let outside = temp.path().join("outside");
        touch(&outside.join("lib.a"), "outside");
        let root = temp.path().join("root");
        fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        assert_eq!(find("lib.a", &root), None);
    }
}
