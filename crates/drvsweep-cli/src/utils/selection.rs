//! Parsing of operator-typed package selections.

use drvsweep_core::DriverRecord;

/// Token that expands to every package with no bound device.
pub const UNUSED_KEYWORD: &str = "unused";

/// Split a typed selection into package names.
///
/// Names are separated by commas and/or whitespace. [`UNUSED_KEYWORD`]
/// expands to the unused packages of `records`, in inventory order.
/// Repeats are dropped case-insensitively, keeping the first occurrence.
/// Names not present in `records` are kept; the utility decides.
pub fn parse_selection(input: &str, records: &[DriverRecord]) -> Vec<String> {
    let mut selection: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !selection.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            selection.push(name.to_string());
        }
    };

    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if token.eq_ignore_ascii_case(UNUSED_KEYWORD) {
            records
                .iter()
                .filter(|r| r.is_unused())
                .for_each(|r| push(&r.package_name));
        } else {
            push(token);
        }
    }
    selection
}
