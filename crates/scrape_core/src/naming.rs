/// Builds an artifact filename from the leading cell values of a row:
/// `{cell1}_{cell2}_..._{cellN}.{extension}`, with `"unknown"` standing in
/// for missing or empty cells, stripped to `[A-Za-z0-9_.-]`.
pub fn artifact_name(cells: &[String], lead: usize, extension: &str) -> String {
    let mut parts = Vec::with_capacity(lead);
    for index in 0..lead {
        let value = cells
            .get(index)
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .unwrap_or("unknown");
        parts.push(value);
    }
    strip_unsafe(&format!("{}.{}", parts.join("_"), extension))
}

/// Positional fallback used when cell extraction fails: `table{T}_row{R}.{extension}`.
/// Both numbers are 1-based.
pub fn fallback_artifact_name(table_no: usize, row_no: usize, extension: &str) -> String {
    format!("table{table_no}_row{row_no}.{extension}")
}

fn strip_unsafe(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect()
}

/// Filesystem-safe destination folder name.
///
/// Forbidden characters become `_`, runs of `_` collapse, leading/trailing
/// separators are trimmed and Windows-reserved device names get a suffix.
/// Returns an empty string when nothing usable remains; callers reject that
/// as invalid input.
pub fn sanitize_folder_name(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();

    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let mut final_name = compacted;
    if final_name.len() > 80 {
        // Back off to a char boundary; a byte-offset truncate panics on
        // multibyte names.
        let mut cut = 80;
        while !final_name.is_char_boundary(cut) {
            cut -= 1;
        }
        final_name.truncate(cut);
    }
    if is_reserved_windows_name(&final_name) {
        final_name.push('_');
    }
    final_name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
