//! Go Source Prelude
//!
//! Reads just enough of a Go file to find its package clause. Comments and
//! blank lines before the clause are skipped; nothing after it is looked at.

/// Extract the package name declared at the top of a Go source file
///
/// Returns `None` when the first token after comments is not `package`
/// followed by an identifier.
pub fn package_name(source: &str) -> Option<String> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = skip_comments_and_space(source)?;

    let rest = rest.strip_prefix("package")?;
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '/') {
        return None;
    }
    let rest = skip_comments_and_space(rest)?;

    let name: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        None
    } else {
        Some(name)
    }
}

/// True when the source declares `package main`
pub fn is_main_package(source: &str) -> bool {
    package_name(source).as_deref() == Some("main")
}

/// Skip whitespace, `//` and `/* */` comments. `None` on an unterminated block comment.
fn skip_comments_and_space(mut text: &str) -> Option<&str> {
    loop {
        text = text.trim_start();

        if let Some(after) = text.strip_prefix("//") {
            text = match after.find('\n') {
                Some(end) => &after[end + 1..],
                None => "",
            };
        } else if let Some(after) = text.strip_prefix("/*") {
            let end = after.find("*/")?;
            text = &after[end + 2..];
        } else {
            return Some(text);
        }
    }
}
