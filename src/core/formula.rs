//! IMAGE() formula construction

use crate::types::Dimensions;

/// Sizing argument telling Excel to use the explicit height and width
const CUSTOM_SIZING: u8 = 3;

/// Prefix Excel stores in front of functions newer than the original file format
const FUTURE_PREFIX: &str = "_xlfn.";

/// Build the preview formula for `url` at `size`
///
/// Example:
/// - Input: `https://cdn.example.com/a.jpg`, 80x60
/// - Output: `=IMAGE("https://cdn.example.com/a.jpg","",3,60,80)`
pub fn image_formula(url: &str, size: Dimensions) -> String {
    format!(
        "=IMAGE(\"{}\",\"\",{},{},{})",
        url.replace('"', "\"\""),
        CUSTOM_SIZING,
        size.height,
        size.width
    )
}

/// True if the formula is a call to IMAGE, prefixed or not
pub fn is_image_formula(formula: &str) -> bool {
    let body = formula.trim_start_matches('=').trim_start();
    let upper = body.to_ascii_uppercase();
    upper.starts_with("IMAGE(") || upper.starts_with("_XLFN.IMAGE(")
}

/// Remove `_xlfn.` prefixes that Excel adds to newer functions
pub fn strip_future_prefix(formula: &str) -> String {
    rewrite_identifiers(formula, |ident, _| {
        let prefix = ident.get(..FUTURE_PREFIX.len())?;
        let rest = ident.get(FUTURE_PREFIX.len()..)?;
        (prefix.eq_ignore_ascii_case(FUTURE_PREFIX) && !rest.is_empty()).then(|| rest.to_string())
    })
}

/// Add the `_xlfn.` prefix to IMAGE calls so Excel recognizes the function
pub fn with_future_prefix(formula: &str) -> String {
    rewrite_identifiers(formula, |ident, next| {
        if next == Some('(') && ident.eq_ignore_ascii_case("IMAGE") {
            Some(format!("{FUTURE_PREFIX}{ident}"))
        } else {
            None
        }
    })
}

/// Walk the formula outside of string literals and let `f` replace
/// identifiers (runs of letters, digits, `_` and `.`). `f` also sees the
/// character that follows the identifier.
fn rewrite_identifiers<F>(formula: &str, f: F) -> String
where
    F: Fn(&str, Option<char>) -> Option<String>,
{
    let chars: Vec<char> = formula.chars().collect();
    let mut out = String::with_capacity(formula.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            // Doubled quotes inside a literal read as close+open, which is fine here
            out.push(c);
            i += 1;
            while i < chars.len() {
                out.push(chars[i]);
                i += 1;
                if chars[i - 1] == '"' {
                    break;
                }
            }
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
            {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            match f(&ident, chars.get(i).copied()) {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(&ident),
            }
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}
