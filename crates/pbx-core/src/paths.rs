//! Lexical path arithmetic.
//!
//! Nothing here touches the filesystem: `..` is folded against the preceding
//! component and symlinks are not followed.

use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components.
///
/// `..` directly under the root is dropped; leading `..` of a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// `base` joined with `relative`, normalized.
pub fn join(base: &Path, relative: &Path) -> PathBuf {
    normalize(&base.join(relative))
}

/// Path that leads from `base` to `path`.
///
/// Identical paths give `.`. Otherwise the common prefix is dropped, one `..`
/// is emitted for every remaining component of `base`, and the rest of `path`
/// follows, so `join(base, relative_to(path, base)) == normalize(path)`.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &path_components[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

/// Render a path the way project files spell it.
pub fn to_project_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a/..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn relative_paths() {
        assert_eq!(relative_to(Path::new("/a/b"), Path::new("/a/b")), PathBuf::from("."));
        assert_eq!(
            relative_to(Path::new("/a/b/c/d.swift"), Path::new("/a/b")),
            PathBuf::from("c/d.swift")
        );
        assert_eq!(
            relative_to(Path::new("/tmp/newfile.swift"), Path::new("/tmp/iOS/iOS")),
            PathBuf::from("../../newfile.swift")
        );
        assert_eq!(
            relative_to(Path::new("/x/y"), Path::new("/a/b")),
            PathBuf::from("../../x/y")
        );
    }

    #[test]
    fn join_undoes_relative() {
        let base = Path::new("/tmp/iOS");
        let relative = relative_to(Path::new("/tmp/newfile.swift"), base);
        assert_eq!(join(base, &relative), PathBuf::from("/tmp/newfile.swift"));
    }
}
