//! Operation positions recovered from the document text.
//!
//! A line scan, not a parser: it finds each path key under `paths` and the
//! method keys directly beneath it. Pretty-printed JSON and block-style YAML
//! both keep one key per line, which is all this needs. When a method key
//! cannot be found the operation gets its path key's position.

use crate::model::{Document, LocationMap, SourceLocation};

/// A key-bearing line: 1-based line number, indentation and key text.
struct KeyLine<'a> {
    line: usize,
    indent: usize,
    key: &'a str,
}

fn key_line(number: usize, raw: &str) -> Option<KeyLine<'_>> {
    let rest = raw.trim_start();
    if rest.is_empty() || rest.starts_with('#') {
        return None;
    }
    let indent = raw.len() - rest.len();
    let key = match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &rest[1..];
            let end = body.find(quote)?;
            if !body[end + 1..].trim_start().starts_with(':') {
                return None;
            }
            &body[..end]
        }
        _ => {
            let end = rest.find(':')?;
            rest[..end].trim_end()
        }
    };
    Some(KeyLine {
        line: number + 1,
        indent,
        key,
    })
}

/// Locate every operation of `document` within `content`.
#[must_use]
pub fn locate_operations(content: &str, file: &str, document: &Document) -> LocationMap {
    let keys: Vec<KeyLine<'_>> = content
        .lines()
        .enumerate()
        .filter_map(|(number, raw)| key_line(number, raw))
        .collect();

    let mut locations = LocationMap::new();
    let Some(paths_start) = keys.iter().position(|k| k.key == "paths") else {
        return locations;
    };
    let at = |k: &KeyLine<'_>| SourceLocation {
        file: file.to_string(),
        line: k.line,
        column: k.indent + 1,
    };

    for (path, item) in &document.paths {
        let Some(offset) = keys[paths_start + 1..].iter().position(|k| k.key == path) else {
            continue;
        };
        let path_index = paths_start + 1 + offset;
        let path_key = &keys[path_index];

        let children: Vec<&KeyLine<'_>> = keys[path_index + 1..]
            .iter()
            .take_while(|k| k.indent > path_key.indent)
            .collect();
        let child_indent = children.first().map(|k| k.indent);

        for (method, _) in item.operations() {
            let found = children
                .iter()
                .find(|k| {
                    Some(k.indent) == child_indent && k.key.eq_ignore_ascii_case(method.as_str())
                });
            let location = found.map_or_else(|| at(path_key), |k| at(k));
            locations.insert((path.clone(), method), location);
        }
    }
    locations
}
