//! `${name}` / `${name:-default}` substitution.

/// Result of substituting a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    /// The expanded text
    pub value: String,
    /// Names that had neither a value nor a default
    pub undefined: Vec<String>,
}

/// Expand every `${...}` reference in `input` using `lookup`.
///
/// An unterminated `${` is kept literally. Undefined names without a default
/// expand to `<name>_IS_UNDEFINED` and are reported.
pub fn substitute(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Substituted {
    let mut value = String::with_capacity(input.len());
    let mut undefined = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        value.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            value.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let reference = &after[..end];
        let (name, default) = match reference.split_once(":-") {
            Some((name, default)) => (name.trim(), Some(default)),
            None => (reference.trim(), None),
        };

        match (lookup(name), default) {
            (Some(found), _) => value.push_str(&found),
            (None, Some(default)) => value.push_str(default),
            (None, None) => {
                value.push_str(&format!("{}_IS_UNDEFINED", name));
                undefined.push(name.to_string());
            }
        }
        rest = &after[end + 1..];
    }
    value.push_str(rest);

    Substituted { value, undefined }
}
