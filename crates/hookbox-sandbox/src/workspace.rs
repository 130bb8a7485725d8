//! Per-request sandbox: a working copy of the target repository plus a
//! private cache directory for pre-commit's store.
//!
//! Both directories are uniquely named `tempfile` directories, so concurrent
//! requests never share state. They are removed by [`Sandbox::teardown`] on
//! the normal path and by `TempDir`'s `Drop` on every other path (early
//! return, `?`, panic).

use std::fs;
use std::path::{Path, PathBuf};

use hookbox_core::config::env_keys::tool;
use tempfile::TempDir;
use tracing::Span;
use walkdir::WalkDir;

use crate::error::SandboxError;
use crate::runner::{inherited_env, EnvMap};

const ROOT_PREFIX: &str = "hookbox-";
const CACHE_PREFIX: &str = "hookbox-cache-";
const WORK_DIR: &str = "work";

pub struct Sandbox {
    root: TempDir,
    cache: TempDir,
    working_copy: PathBuf,
    span: Span,
}

impl Sandbox {
    /// Create both directories under `tmp_base` (OS temp dir when `None`)
    /// and copy `source` into the working copy. `source` is only read.
    pub fn create(source: &Path, tmp_base: Option<&Path>, span: Span) -> Result<Self, SandboxError> {
        let root = make_temp_dir(ROOT_PREFIX, tmp_base)?;
        let cache = make_temp_dir(CACHE_PREFIX, tmp_base)?;
        let working_copy = root.path().join(WORK_DIR);
        fs::create_dir_all(&working_copy).map_err(|source| SandboxError::Copy {
            path: working_copy.clone(),
            source,
        })?;

        let skip = nested_dirs(source, &[root.path(), cache.path()]);
        copy_tree_skipping(source, &working_copy, &skip)?;

        tracing::debug!(
            parent: &span,
            source = %source.display(),
            working_copy = %working_copy.display(),
            cache = %cache.path().display(),
            "Sandbox created"
        );

        Ok(Self {
            root,
            cache,
            working_copy,
            span,
        })
    }

    /// Mutable clone of the target repository.
    pub fn working_copy(&self) -> &Path {
        &self.working_copy
    }

    /// pre-commit's private store for this request only.
    pub fn cache_dir(&self) -> &Path {
        self.cache.path()
    }

    /// Parent of the working copy; removed on teardown.
    pub fn root_dir(&self) -> &Path {
        self.root.path()
    }

    /// Environment for the pre-commit process: everything inherited, plus
    /// the private cache, UTF-8 mode and a dumb terminal.
    pub fn tool_env(&self) -> EnvMap {
        let mut env = inherited_env();
        env.insert(
            tool::PRE_COMMIT_HOME.into(),
            self.cache_dir().as_os_str().to_owned(),
        );
        env.insert(tool::PYTHONUTF8.into(), "1".into());
        env.insert(tool::TERM.into(), "dumb".into());
        env
    }

    /// Remove both directories. Failures are logged and swallowed: cleanup is
    /// best-effort and must not replace the request's result.
    pub fn teardown(self) {
        let Sandbox {
            root, cache, span, ..
        } = self;
        for dir in [root, cache] {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::debug!(parent: &span, path = %path.display(), error = %e, "Sandbox cleanup failed");
            }
        }
    }
}

fn make_temp_dir(prefix: &str, base: Option<&Path>) -> Result<TempDir, SandboxError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix);
    match base {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    }
    .map_err(SandboxError::CreateTempDir)
}

/// Recursively copy `src` into `dst`. Existing directories in `dst` are
/// reused and existing files overwritten.
///
/// Symlinks never point back into `src` from the copy: on Unix, a link whose
/// target stays inside `src` is recreated relative to `dst` (so a copied
/// virtualenv keeps its interpreter links), and any other link is replaced by
/// a copy of the file it points to. Links to directories outside `src` and
/// dangling links are skipped.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), SandboxError> {
    copy_tree_skipping(src, dst, &[])
}

/// [`copy_tree`], leaving out the `skip` subtrees of `src`.
fn copy_tree_skipping(src: &Path, dst: &Path, skip: &[PathBuf]) -> Result<(), SandboxError> {
    let walker = WalkDir::new(src)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !skip.iter().any(|s| e.path() == s));
    for entry in walker {
        let entry = entry.map_err(|source| SandboxError::Walk {
            root: src.to_path_buf(),
            source,
        })?;
        let rel = match entry.path().strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = dst.join(rel);
        let io_err = |source| SandboxError::Copy {
            path: entry.path().to_path_buf(),
            source,
        };
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(io_err)?;
        } else if file_type.is_symlink() {
            copy_symlink(src, dst, entry.path(), &target).map_err(io_err)?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_err)?;
        }
    }
    Ok(())
}

/// Sandbox directories that live inside `source` (a temp base under the
/// repository), as paths under `source` as the walker spells them.
fn nested_dirs(source: &Path, dirs: &[&Path]) -> Vec<PathBuf> {
    let Ok(source_canon) = source.canonicalize() else {
        return Vec::new();
    };
    dirs.iter()
        .filter_map(|d| d.canonicalize().ok())
        .filter_map(|d| d.strip_prefix(&source_canon).ok().map(|rel| source.join(rel)))
        .collect()
}

/// Lexically resolve `.` and `..` in `path`.
#[cfg(unix)]
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path, link: &Path, target: &Path) -> std::io::Result<()> {
    let points_to = fs::read_link(link)?;
    let resolved = normalize(&link.parent().unwrap_or(src).join(&points_to));

    if let Ok(inner) = resolved.strip_prefix(src) {
        let relinked = if points_to.is_absolute() {
            dst.join(inner)
        } else {
            points_to
        };
        remove_existing(target)?;
        return std::os::unix::fs::symlink(relinked, target);
    }

    match fs::metadata(link) {
        Ok(meta) if meta.is_file() => {
            remove_existing(target)?;
            fs::copy(link, target).map(|_| ())
        }
        Ok(_) => {
            tracing::debug!(link = %link.display(), "Skipping directory symlink leaving the repository");
            Ok(())
        }
        Err(_) => {
            tracing::debug!(link = %link.display(), "Skipping dangling symlink leaving the repository");
            Ok(())
        }
    }
}

#[cfg(unix)]
fn remove_existing(target: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(target).is_ok() {
        fs::remove_file(target)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(_src: &Path, _dst: &Path, link: &Path, target: &Path) -> std::io::Result<()> {
    match fs::metadata(link) {
        Ok(meta) if meta.is_file() => fs::copy(link, target).map(|_| ()),
        _ => {
            // Directory links are not followed: a cycle would copy forever.
            tracing::debug!(link = %link.display(), "Skipping directory or dangling symlink");
            Ok(())
        }
    }
}
