//! Quote- and parenthesis-aware helpers for function argument text

use crate::references::mask_string_literals;

/// Split an argument list on top-level commas
///
/// Commas inside parentheses or string literals do not split. Each
/// argument is trimmed. An empty list yields no arguments, but an empty
/// argument between commas is kept (`"1,,2"` has three).
///
/// # Example
/// ```
/// use offer_sheets_formula::arguments::split_arguments;
///
/// assert_eq!(
///     split_arguments("A1>0, SUM(B1, B2), \"x,y\""),
///     vec!["A1>0", "SUM(B1, B2)", "\"x,y\""]
/// );
/// ```
pub fn split_arguments(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut start = 0;

    for (i, c) in args.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());

    parts
}

/// Byte offset of the `)` matching the `(` at `open`
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_string = false;

    for (i, c) in text[open..].char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Whether the text is a single `"..."` literal
pub fn is_quoted(text: &str) -> bool {
    let text = text.trim();
    if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
        return false;
    }

    // Every interior quote must be part of a doubled pair
    let inner = &text[1..text.len() - 1];
    inner.replace("\"\"", "").find('"').is_none()
}

/// Strip surrounding quotes from a literal, unescaping `""`
///
/// Text that is not a quoted literal comes back trimmed and unchanged.
pub fn unquote(text: &str) -> String {
    let trimmed = text.trim();
    if is_quoted(trimmed) {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}

/// Find the first of `candidates` occurring at the top level of `text`
///
/// Occurrences inside string literals or parentheses are ignored.
/// Candidates are tried in order, so `">="` listed before `">"` wins on
/// `"A1>=2"`. Returns the byte offset and the candidate found.
pub fn find_top_level<'c>(text: &str, candidates: &[&'c str]) -> Option<(usize, &'c str)> {
    let masked = mask_string_literals(text);
    let mut top_level = String::with_capacity(masked.len());
    let mut depth: usize = 0;

    for c in masked.chars() {
        match c {
            '(' => {
                depth += 1;
                top_level.push(' ');
            }
            ')' => {
                depth = depth.saturating_sub(1);
                top_level.push(' ');
            }
            c if depth > 0 => top_level.extend(std::iter::repeat(' ').take(c.len_utf8())),
            c => top_level.push(c),
        }
    }

    candidates
        .iter()
        .find_map(|op| top_level.find(op).map(|pos| (pos, *op)))
}
