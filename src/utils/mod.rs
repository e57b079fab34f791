//! Utilities for path collection, PDF object copying, etc.

use crate::{Result, error::BatesError};
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Expand multiple glob patterns into filesystem paths.
///
/// Patterns are expanded in the order given; matches of a single pattern come
/// back in the order `glob` yields them (alphabetical). A pattern without glob
/// metacharacters is passed through as-is, even when the file does not exist,
/// so that it can be reported as unsupported later.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let pattern = pattern.as_ref();
        if !is_glob_pattern(pattern) {
            resolved_paths.push(PathBuf::from(pattern));
            continue;
        }
        resolved_paths.extend(collect_paths_for_pattern(pattern)?);
    }

    Ok(resolved_paths)
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand a single glob pattern into filesystem paths.
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| {
        BatesError::invalid_config(format!("Invalid glob pattern '{pattern}': {err}"))
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| BatesError::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Copy the objects reachable from `obj` out of `source` into `target`.
///
/// Objects keep their ids, so `target.max_id` must be at least
/// `source.max_id` before any new object is allocated in `target`. Page and
/// page-tree nodes are never pulled in: a page reaching another page (link
/// destinations, annotation back-pointers) must not drag the whole source
/// document along. Such references are left dangling; see
/// [`null_dangling_references`].
pub fn copy_references(target: &mut Document, source: &Document, obj: &Object) {
    match obj {
        Object::Reference(ref_id) => {
            if target.objects.contains_key(ref_id) {
                return;
            }
            let Ok(referenced_obj) = source.get_object(*ref_id) else {
                return;
            };
            if is_page_tree_node(referenced_obj) {
                return;
            }
            target.objects.insert(*ref_id, referenced_obj.clone());
            copy_references(target, source, referenced_obj);
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                copy_references(target, source, value);
            }
        }
        Object::Array(arr) => {
            for item in arr {
                copy_references(target, source, item);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                copy_references(target, source, value);
            }
        }
        _ => {}
    }
}

/// Replace every reference to an object missing from `doc` with `null`.
///
/// A dangling reference is harmless on its own but would silently retarget to
/// an unrelated object once the document is renumbered and merged.
pub fn null_dangling_references(doc: &mut Document) {
    let known: BTreeSet<ObjectId> = doc.objects.keys().copied().collect();
    for object in doc.objects.values_mut() {
        null_dangling(object, &known);
    }
}

fn null_dangling(obj: &mut Object, known: &BTreeSet<ObjectId>) {
    let dangling = matches!(obj, Object::Reference(id) if !known.contains(id));
    if dangling {
        *obj = Object::Null;
        return;
    }

    match obj {
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                null_dangling(value, known);
            }
        }
        Object::Array(arr) => {
            for item in arr.iter_mut() {
                null_dangling(item, known);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                null_dangling(value, known);
            }
        }
        _ => {}
    }
}

fn is_page_tree_node(obj: &Object) -> bool {
    let dict = match obj {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Type"),
        Ok(Object::Name(name)) if name == b"Page" || name == b"Pages"
    )
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
