//! `.properties` files: flat `key=value` text used as macro property sets.

use indexmap::IndexMap;

/// One flat property set, in file order.
pub type Properties = IndexMap<String, String>;

/// Parses `.properties` text.
///
/// `key=value` and `key: value` are both accepted, split at the first `=` or
/// `:`. Lines starting with `#` or `!` are comments. A line ending in a
/// single backslash continues on the next line.
pub fn parse_properties(text: &str) -> Properties {
    let mut properties = Properties::new();
    let mut pending = String::new();

    for raw in text.lines() {
        let line = raw.trim_start();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }

        let trailing = line.len() - line.trim_end_matches('\\').len();
        if trailing % 2 == 1 {
            pending.push_str(&line[..line.len() - 1]);
            continue;
        }
        pending.push_str(line);

        let entry = std::mem::take(&mut pending);
        if let Some(idx) = entry.find(['=', ':']) {
            let key = entry[..idx].trim();
            if !key.is_empty() {
                properties.insert(key.to_string(), entry[idx + 1..].trim().to_string());
            }
        } else if !entry.trim().is_empty() {
            properties.insert(entry.trim().to_string(), String::new());
        }
    }

    properties
}
