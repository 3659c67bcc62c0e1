/// Returns true when `text`, once trimmed, starts with an emoji.
///
/// Accepted first code points:
/// * `U+00A9` and `U+00AE`
/// * `U+2000..=U+33FF` (punctuation, symbols, dingbats and CJK symbols)
/// * `U+1F000..=U+1FBFF`, the three supplementary blocks behind the high
///   surrogates `U+D83C`, `U+D83D` and `U+D83E`
///
/// Only the first code point is inspected; emoji later in the line do not count.
pub fn starts_with_emoji(text: &str) -> bool {
    text.trim().chars().next().is_some_and(is_emoji)
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x00A9 | 0x00AE | 0x2000..=0x33FF | 0x1F000..=0x1FBFF
    )
}
