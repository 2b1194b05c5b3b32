use pretty_assertions::assert_eq;
use scrape_core::{artifact_name, fallback_artifact_name, sanitize_folder_name};

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn unsafe_characters_are_stripped() {
    let name = artifact_name(&cells(&["A/B", "1:2", "Dist*"]), 3, "pdf");
    assert_eq!(name, "AB_12_Dist.pdf");
    assert!(name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')));
}

#[test]
fn missing_cells_fall_back_to_unknown() {
    let name = artifact_name(&cells(&["W123"]), 3, "pdf");
    assert_eq!(name, "W123_unknown_unknown.pdf");
}

#[test]
fn blank_cells_count_as_missing() {
    let name = artifact_name(&cells(&["W123", "  ", "East"]), 3, "pdf");
    assert_eq!(name, "W123_unknown_East.pdf");
}

#[test]
fn extra_cells_beyond_lead_are_ignored() {
    let name = artifact_name(&cells(&["a", "b", "c", "d"]), 2, "pdf");
    assert_eq!(name, "a_b.pdf");
}

#[test]
fn positional_fallback_name() {
    assert_eq!(fallback_artifact_name(2, 14, "pdf"), "table2_row14.pdf");
}

#[test]
fn folder_names_replace_separators() {
    assert_eq!(sanitize_folder_name("east/district: 2026"), "east_district_ 2026");
}

#[test]
fn folder_names_collapse_and_trim_underscores() {
    assert_eq!(sanitize_folder_name("__a///b__"), "a_b");
}

#[test]
fn reserved_device_names_are_suffixed() {
    assert_eq!(sanitize_folder_name("CON"), "CON_");
    assert_eq!(sanitize_folder_name("aux"), "aux_");
}

#[test]
fn long_folder_names_are_truncated() {
    let name = sanitize_folder_name(&"a".repeat(120));
    assert_eq!(name.len(), 80);
}

#[test]
fn long_multibyte_folder_names_truncate_on_a_char_boundary() {
    // 1 + 50*2 = 101 bytes, with byte offset 80 falling inside an 'é'.
    let name = sanitize_folder_name(&format!("a{}", "é".repeat(50)));
    assert!(name.len() <= 80);
    assert_eq!(name, format!("a{}", "é".repeat(39)));
}

#[test]
fn unusable_folder_name_becomes_empty() {
    assert_eq!(sanitize_folder_name("///"), "");
    assert_eq!(sanitize_folder_name("  . "), "");
}
