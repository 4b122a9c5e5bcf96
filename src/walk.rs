use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name suffixes treated as HEIC. Matched exactly: `.Heic` or `.heif`
/// files are not picked up.
const HEIC_SUFFIXES: &[&str] = &[".heic", ".HEIC"];

/// Lazily walk the directory `root` and yield every non-directory entry
/// with a HEIC suffix.
///
/// Directory symlinks are not descended into, but symlinks to files are
/// candidates, dangling ones included, so they surface as skip records
/// instead of vanishing. Unreadable entries are skipped. A missing root, or
/// a root that is a plain file, yields nothing. Siblings are visited in file
/// name order, so the sequence is stable between runs.
///
/// ```rust,no_run
/// use heic_convert::walk::heic_candidates;
///
/// for path in heic_candidates("./photos".as_ref()) {
///     println!("{}", path.display());
/// }
/// ```
pub fn heic_candidates(root: &Path) -> impl Iterator<Item = PathBuf> + use<> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir() && is_heic_name(entry.path()))
        .filter(|entry| !entry.path_is_symlink() || !entry.path().is_dir())
        .map(walkdir::DirEntry::into_path)
}

/// Check whether a path's file name ends in `.heic` or `.HEIC`.
pub fn is_heic_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| HEIC_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn heic_name_matching() {
        assert!(is_heic_name(Path::new("photo.heic")));
        assert!(is_heic_name(Path::new("PHOTO.HEIC")));
        assert!(is_heic_name(Path::new("dir/IMG_0001.HEIC")));
        assert!(is_heic_name(Path::new(".heic")));
    }

    #[test]
    fn heic_name_is_narrow() {
        assert!(!is_heic_name(Path::new("photo.Heic")));
        assert!(!is_heic_name(Path::new("photo.hEIC")));
        assert!(!is_heic_name(Path::new("photo.heif")));
        assert!(!is_heic_name(Path::new("photo.heic.png")));
        assert!(!is_heic_name(Path::new("heic")));
        assert!(!is_heic_name(Path::new("")));
    }

    #[test]
    fn walks_recursively() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();

        fs::write(dir.path().join("top.heic"), b"x").unwrap();
        fs::write(deep.join("deep.HEIC"), b"x").unwrap();
        fs::write(deep.join("skip.jpg"), b"x").unwrap();
        fs::write(deep.join("skip.Heic"), b"x").unwrap();

        let found: Vec<_> = heic_candidates(dir.path()).collect();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&dir.path().join("top.heic")));
        assert!(found.contains(&deep.join("deep.HEIC")));
    }

    #[test]
    fn directories_are_not_candidates() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("album.heic");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("inner.heic"), b"x").unwrap();

        let found: Vec<_> = heic_candidates(dir.path()).collect();
        assert_eq!(found, vec![folder.join("inner.heic")]);
    }

    #[test]
    fn order_is_by_file_name() {
        let dir = TempDir::new().unwrap();
        for name in ["c.heic", "a.heic", "b.heic"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let found: Vec<_> = heic_candidates(dir.path()).collect();
        assert_eq!(names(&found), ["a.heic", "b.heic", "c.heic"]);
    }

    #[test]
    fn empty_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(heic_candidates(dir.path()).count(), 0);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(heic_candidates(&dir.path().join("missing")).count(), 0);
    }

    #[test]
    fn root_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("single.heic");
        fs::write(&file, b"x").unwrap();
        assert_eq!(heic_candidates(&file).count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn file_symlinks_are_candidates() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        let target = dir.path().join("real.heic");
        fs::write(&target, b"x").unwrap();

        symlink(&target, root.join("link.heic")).unwrap();
        symlink(dir.path().join("gone.heic"), root.join("dangling.heic")).unwrap();

        let found: Vec<_> = heic_candidates(&root).collect();
        assert_eq!(names(&found), ["dangling.heic", "link.heic"]);
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlinks_are_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        let elsewhere = dir.path().join("elsewhere");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&elsewhere).unwrap();
        fs::write(elsewhere.join("inside.heic"), b"x").unwrap();

        symlink(&elsewhere, root.join("album.heic")).unwrap();

        assert_eq!(heic_candidates(&root).count(), 0);
    }
}
