//! Filename validation and uniquification helpers
//!
//! These helpers are shared by the item tree (sibling-level name
//! uniquification), the operation registry (unique operation names) and the
//! overwrite resolver (renaming colliding output paths).

/// Characters rejected by common filesystems and export backends.
const INVALID_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Returns the file extension of `name`, if any.
///
/// The extension is the part after the last `.`, excluding names that start
/// with a dot and names ending in a dot.
pub fn file_extension(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    if dot == 0 || dot == name.len() - 1 {
        return None;
    }
    Some(&name[dot + 1..])
}

/// Replaces the file extension of `name` with `ext`, or appends it when
/// `name` has none.
pub fn with_file_extension(name: &str, ext: &str) -> String {
    match file_extension(name) {
        Some(old) => {
            let stem = &name[..name.len() - old.len() - 1];
            format!("{stem}.{ext}")
        }
        None => format!("{name}.{ext}"),
    }
}

/// Cleans `name` of characters the output backend cannot accept.
///
/// Control characters and filesystem-reserved characters are stripped;
/// trailing dots and spaces are removed. An empty result becomes `"_"`.
pub fn validate_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !INVALID_FILENAME_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim_end_matches(['.', ' ']).to_string();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Makes `base` unique against `is_taken` by inserting a numeric suffix.
///
/// The suffix produced by `suffix` (e.g. `" (2)"`, `"_2"`) is inserted at
/// byte `position` when given (and on a char boundary), otherwise appended.
/// Suffix numbers start at 2 and grow until a free candidate is found.
pub fn uniquify<F, G>(base: &str, mut is_taken: F, mut suffix: G, position: Option<usize>) -> String
where
    F: FnMut(&str) -> bool,
    G: FnMut(u32) -> String,
{
    if !is_taken(base) {
        return base.to_string();
    }

    let mut n = 2;
    loop {
        let sfx = suffix(n);
        let candidate = match position {
            Some(pos) if pos <= base.len() && base.is_char_boundary(pos) => {
                let mut s = String::with_capacity(base.len() + sfx.len());
                s.push_str(&base[..pos]);
                s.push_str(&sfx);
                s.push_str(&base[pos..]);
                s
            }
            _ => format!("{base}{sfx}"),
        };
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Uniquifies a filename by inserting `" (n)"` before its extension.
pub fn uniquify_filename<F>(name: &str, is_taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let position = file_extension(name).map(|ext| name.len() - ext.len() - 1);
    uniquify(name, is_taken, |n| format!(" ({n})"), position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("a.png", Some("png"); "simple extension")]
    #[test_case("a.tar.gz", Some("gz"); "last extension wins")]
    #[test_case("noext", None; "no dot")]
    #[test_case(".hidden", None; "leading dot only")]
    #[test_case("trailing.", None; "trailing dot")]
    fn test_file_extension(name: &str, expected: Option<&str>) {
        assert_eq!(file_extension(name), expected);
    }

    #[test]
    fn test_with_file_extension() {
        assert_eq!(with_file_extension("a.tif", "png"), "a.png");
        assert_eq!(with_file_extension("a", "png"), "a.png");
        assert_eq!(with_file_extension("a.b.tif", "png"), "a.b.png");
    }

    #[test]
    fn test_validate_filename_strips_reserved() {
        assert_eq!(validate_filename("a/b:c*d"), "abcd");
        assert_eq!(validate_filename("name. . "), "name");
        assert_eq!(validate_filename("???"), "_");
        assert_eq!(validate_filename("ok name"), "ok name");
    }

    #[test]
    fn test_uniquify_no_collision() {
        let taken: Vec<String> = vec![];
        let result = uniquify("a", |s| taken.iter().any(|t| t == s), |n| format!("_{n}"), None);
        assert_eq!(result, "a");
    }

    #[test]
    fn test_uniquify_appends_suffix() {
        let taken = ["a".to_string(), "a_2".to_string()];
        let result = uniquify("a", |s| taken.iter().any(|t| t == s), |n| format!("_{n}"), None);
        assert_eq!(result, "a_3");
    }

    #[test]
    fn test_uniquify_filename_inserts_before_extension() {
        let taken = ["a.png".to_string()];
        let result = uniquify_filename("a.png", |s| taken.iter().any(|t| t == s));
        assert_eq!(result, "a (2).png");
    }

    #[test]
    fn test_uniquify_filename_without_extension() {
        let taken = ["group".to_string(), "group (2)".to_string()];
        let result = uniquify_filename("group", |s| taken.iter().any(|t| t == s));
        assert_eq!(result, "group (3)");
    }
}
