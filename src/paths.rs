//! Path safety gate
//!
//! Every filesystem read or write triggered by schema retrieval passes
//! through here first. Paths are normalized lexically, rejected if they
//! still climb with `..`, and, when a sandbox root is given, confined to it
//! both lexically and through symbolic links that already exist on disk.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::PathError;

/// Result type for path gate checks
pub type PathResult<T> = std::result::Result<T, PathError>;

/// Resolve `.` and `..` segments without touching the filesystem.
///
/// Leading `..` segments of a relative path are kept, `..` directly under
/// the root is dropped, and trailing separators disappear. An empty result
/// becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Normalize a path and resolve it to an absolute path.
///
/// Without a sandbox root the path resolves against the current working
/// directory. With one, absolute inputs are rejected and the result must
/// stay under the root.
pub fn normalize_and_confine(
    path: impl AsRef<Path>,
    sandbox_root: Option<&Path>,
) -> PathResult<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }

    let normalized = normalize(path);
    if normalized.components().any(|c| c == Component::ParentDir) {
        debug!(path = %path.display(), "rejected path with traversal segments");
        return Err(PathError::Traversal(path.to_path_buf()));
    }

    let Some(root) = sandbox_root else {
        return absolute(&normalized);
    };

    if normalized.is_absolute() {
        debug!(path = %path.display(), "rejected absolute path under sandbox");
        return Err(PathError::AbsolutePathRejected(path.to_path_buf()));
    }

    let root = absolute(root)?;
    let resolved = normalize(&root.join(&normalized));
    if !resolved.starts_with(&root) {
        return Err(escape(resolved, root));
    }
    confine_links(&resolved, &root)?;

    Ok(resolved)
}

/// Require an existing regular file.
///
/// Only a missing path is [`PathError::NotFound`]; any other metadata
/// failure, such as a permission error, is [`PathError::Inaccessible`].
pub fn check_readable(path: &Path) -> PathResult<PathBuf> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PathError::NotFound(path.to_path_buf()),
        _ => PathError::Inaccessible {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    if !metadata.is_file() {
        return Err(PathError::NotAFile(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// Require an existing parent directory; the file itself may be missing
pub fn check_writable(path: &Path) -> PathResult<PathBuf> {
    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Err(PathError::ParentMissing(path.to_path_buf())),
    };

    let metadata =
        fs::metadata(parent).map_err(|_| PathError::ParentMissing(parent.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(PathError::ParentNotDirectory(parent.to_path_buf()));
    }

    // An existing directory cannot be overwritten with schema text
    if fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false) {
        return Err(PathError::NotAFile(path.to_path_buf()));
    }

    Ok(path.to_path_buf())
}

/// Confine a path and require it to be a readable file
pub fn validate_read_path(
    path: impl AsRef<Path>,
    sandbox_root: Option<&Path>,
) -> PathResult<PathBuf> {
    let resolved = normalize_and_confine(path, sandbox_root)?;
    check_readable(&resolved)
}

/// Confine a path and require it to be writable
pub fn validate_write_path(
    path: impl AsRef<Path>,
    sandbox_root: Option<&Path>,
) -> PathResult<PathBuf> {
    let resolved = normalize_and_confine(path, sandbox_root)?;
    check_writable(&resolved)
}

fn absolute(path: &Path) -> PathResult<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    let cwd = std::env::current_dir().map_err(PathError::CurrentDir)?;
    Ok(normalize(&cwd.join(path)))
}

/// Reject paths whose nearest existing ancestor resolves outside the root
fn confine_links(resolved: &Path, root: &Path) -> PathResult<()> {
    let Ok(canonical_root) = root.canonicalize() else {
        return Ok(());
    };

    for ancestor in resolved.ancestors() {
        if ancestor == root {
            break;
        }
        if fs::symlink_metadata(ancestor).is_ok() {
            return match ancestor.canonicalize() {
                Ok(canonical) if canonical.starts_with(&canonical_root) => Ok(()),
                _ => Err(escape(resolved.to_path_buf(), root.to_path_buf())),
            };
        }
    }
    Ok(())
}

fn escape(path: PathBuf, root: PathBuf) -> PathError {
    debug!(path = %path.display(), root = %root.display(), "rejected path outside sandbox");
    PathError::SandboxEscape { path, root }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("a/b/")), PathBuf::from("a/b"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_absolute() {
        assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize(Path::new("/sandbox//x.xsd")), PathBuf::from("/sandbox/x.xsd"));
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(normalize_and_confine("", None), Err(PathError::Empty)));
    }

    #[test]
    fn test_traversal_rejected() {
        for path in [
            "../test.xsd",
            "../../test.xsd",
            "./../test.xsd",
            "test/../../../test.xsd",
        ] {
            assert!(
                matches!(normalize_and_confine(path, None), Err(PathError::Traversal(_))),
                "{}",
                path
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_traversal_checked_before_sandbox() {
        let err = normalize_and_confine("../secret.xsd", Some(Path::new("/sandbox"))).unwrap_err();
        assert!(matches!(err, PathError::Traversal(_)));
    }

    #[test]
    fn test_inner_parent_segments_are_fine() {
        let resolved = normalize_and_confine("dir/../test.xsd", None).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("test.xsd"));
    }

    #[test]
    fn test_relative_resolves_against_cwd() {
        let resolved = normalize_and_confine("./test.xsd", None).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolved, normalize(&cwd.join("test.xsd")));
    }

    #[test]
    fn test_absolute_rejected_under_sandbox() {
        let dir = tempdir().unwrap();
        let absolute = dir.path().join("schema.xsd");
        assert!(matches!(
            normalize_and_confine(&absolute, Some(dir.path())),
            Err(PathError::AbsolutePathRejected(_))
        ));
    }

    #[test]
    fn test_sandbox_resolution() {
        let dir = tempdir().unwrap();
        let resolved = normalize_and_confine("nested/./schema.xsd/", Some(dir.path())).unwrap();
        assert_eq!(resolved, normalize(dir.path()).join("nested/schema.xsd"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let sandbox = tempdir().unwrap();
        let outside = tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), sandbox.path().join("link")).unwrap();

        assert!(matches!(
            normalize_and_confine("link/schema.xsd", Some(sandbox.path())),
            Err(PathError::SandboxEscape { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_rejected() {
        let sandbox = tempdir().unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", sandbox.path().join("dangling")).unwrap();

        assert!(matches!(
            normalize_and_confine("dangling", Some(sandbox.path())),
            Err(PathError::SandboxEscape { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_sandbox_allowed() {
        let sandbox = tempdir().unwrap();
        fs::create_dir(sandbox.path().join("real")).unwrap();
        std::os::unix::fs::symlink(sandbox.path().join("real"), sandbox.path().join("alias"))
            .unwrap();

        assert!(normalize_and_confine("alias/schema.xsd", Some(sandbox.path())).is_ok());
    }

    #[test]
    fn test_check_readable() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("test.xsd");
        fs::write(&file, "<test/>").unwrap();

        assert_eq!(check_readable(&file).unwrap(), file);
        assert!(matches!(
            check_readable(&dir.path().join("missing.xsd")),
            Err(PathError::NotFound(_))
        ));
        assert!(matches!(
            check_readable(dir.path()),
            Err(PathError::NotAFile(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_metadata_is_not_reported_missing() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.xsd");
        let b = dir.path().join("b.xsd");
        std::os::unix::fs::symlink(&b, &a).unwrap();
        std::os::unix::fs::symlink(&a, &b).unwrap();

        // A symlink loop exists but cannot be stat'ed
        match check_readable(&a) {
            Err(PathError::Inaccessible { path, source }) => {
                assert_eq!(path, a);
                assert_ne!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected inaccessible path, got {:?}", other),
        }
    }

    #[test]
    fn test_check_writable() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("new-file.xsd");
        assert_eq!(check_writable(&target).unwrap(), target);

        assert!(matches!(
            check_writable(&dir.path().join("missing/new-file.xsd")),
            Err(PathError::ParentMissing(_))
        ));

        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            check_writable(&file.join("child.xsd")),
            Err(PathError::ParentNotDirectory(_))
        ));

        assert!(matches!(
            check_writable(dir.path()),
            Err(PathError::NotAFile(_))
        ));
    }

    #[test]
    fn test_validate_write_path_under_sandbox() {
        let dir = tempdir().unwrap();
        let resolved = validate_write_path("out.xsd", Some(dir.path())).unwrap();
        assert_eq!(resolved, normalize(dir.path()).join("out.xsd"));

        assert!(matches!(
            validate_write_path("../out.xsd", Some(dir.path())),
            Err(PathError::Traversal(_))
        ));
    }
}
