//! Positional placeholder substitution (`%1`, `%2`, ...).
//!
//! Substitution is a single pass: inserted values are never scanned for
//! placeholders again. Placeholders without a matching argument are left
//! as written.

use std::collections::BTreeSet;

/// Longest placeholder index, in digits (`%1` .. `%99`).
const MAX_INDEX_DIGITS: usize = 2;

/// Splits `text` at the next placeholder.
///
/// Returns the text before the `%`, the digits that follow it (possibly
/// empty) and the remainder after the digits.
fn split_placeholder(text: &str) -> Option<(&str, &str, &str)> {
    let percent = text.find('%')?;
    let (head, tail) = text.split_at(percent);
    let after = tail.get(1..).unwrap_or_default();
    let digits = after.bytes().take(MAX_INDEX_DIGITS).take_while(u8::is_ascii_digit).count();
    let (number, rest) = after.split_at(digits);
    Some((head, number, rest))
}

/// Replaces each `%N` with the Nth argument (1-indexed).
///
/// `%0`, indices beyond `args.len()` and a `%` not followed by a digit are
/// copied unchanged.
///
/// # Examples
/// ```
/// use ts_translator::format::substitute;
///
/// assert_eq!(substitute("[Processing %1 | %2]", &["3", "10"]), "[Processing 3 | 10]");
/// assert_eq!(substitute("%1 of %3", &["1"]), "1 of %3");
/// ```
#[must_use]
pub fn substitute<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    expand(template, None, args)
}

/// Replaces `%n` with `count`, as done for plural messages.
#[must_use]
pub fn substitute_count(template: &str, count: u64) -> String {
    expand::<&str>(template, Some(count), &[])
}

/// `%n` と `%1`..`%99` を一度の走査で置換する
///
/// 置換後の文字列は再走査しないため、`"%%n"` に 2 を渡すと `"%2"` になる。
///
/// # Examples
/// ```
/// use ts_translator::format::substitute_with_count;
///
/// assert_eq!(substitute_with_count("%n files in %1", 3, &["/tmp"]), "3 files in /tmp");
/// assert_eq!(substitute_with_count("%%n items", 2, &["X", "Y"]), "%2 items");
/// ```
#[must_use]
pub fn substitute_with_count<S: AsRef<str>>(template: &str, count: u64, args: &[S]) -> String {
    expand(template, Some(count), args)
}

/// `count` が `None` のとき `%n` はそのまま残る。
fn expand<S: AsRef<str>>(template: &str, count: Option<u64>, args: &[S]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((head, number, tail)) = split_placeholder(rest) {
        result.push_str(head);
        if number.is_empty()
            && let Some(count) = count
            && let Some(after) = tail.strip_prefix('n')
        {
            result.push_str(&count.to_string());
            rest = after;
            continue;
        }
        let arg = number
            .parse::<usize>()
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| args.get(index));
        match arg {
            Some(arg) => result.push_str(arg.as_ref()),
            None => {
                result.push('%');
                result.push_str(number);
            }
        }
        rest = tail;
    }

    result.push_str(rest);
    result
}

/// Collects the numbered placeholders used in `text`.
#[must_use]
pub fn placeholders(text: &str) -> BTreeSet<usize> {
    let mut found = BTreeSet::new();
    let mut rest = text;
    while let Some((_, number, tail)) = split_placeholder(rest) {
        if let Ok(index) = number.parse::<usize>()
            && index > 0
        {
            found.insert(index);
        }
        rest = tail;
    }
    found
}
