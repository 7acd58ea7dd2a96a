use crate::file::{FileEntry, Row};

/// Format bytes into human-readable string (KB, MB, GB)
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a single directory entry for `list --long`
pub fn format_entry(entry: &FileEntry) -> String {
    let modified = entry
        .modified
        .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".repeat(19));
    let size = if entry.is_dir {
        "<DIR>".to_string()
    } else {
        format_bytes(entry.size)
    };

    format!("{}  {:>10}  {}", modified, size, entry.name)
}

/// Format a listing for display (human or JSON)
pub fn format_entries(entries: &[FileEntry], long: bool, json: bool) -> String {
    if json {
        if long {
            serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
        } else {
            let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
            serde_json::to_string_pretty(&names).unwrap_or_else(|_| "[]".to_string())
        }
    } else {
        if entries.is_empty() {
            return "No files found.".to_string();
        }

        entries
            .iter()
            .map(|entry| {
                if long {
                    format_entry(entry)
                } else {
                    entry.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Format CSV rows as an aligned text table (human or JSON)
pub fn format_rows(rows: &[Row], json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string());
    }

    let Some(first) = rows.first() else {
        return "No rows.".to_string();
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let widths: Vec<usize> = headers
        .iter()
        .map(|h| {
            rows.iter()
                .filter_map(|row| row.get(*h))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render(headers.clone())];
    for row in rows {
        lines.push(render(
            headers
                .iter()
                .map(|h| row.get(*h).map(String::as_str).unwrap_or(""))
                .collect(),
        ));
    }

    lines.join("\n")
}
