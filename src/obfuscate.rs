use rand::seq::SliceRandom;
use rand::Rng;

/// Glyphs a masked character can become. Shades are repeated so they dominate
/// the output over the punctuation-like glyphs.
const PALETTE: [char; 15] = [
    '█', '▓', '▒', '░', '█', '▓', '▒', '░', '█', '▓', '▒', '░', '<', '>', '/',
];

/// Masked previews longer than this many characters are cut short
pub const PREVIEW_LIMIT: usize = 200;

const ELLIPSIS: &str = " ...";

/// Replace every non-space character with a random glyph from the palette.
/// Output has exactly as many chars as the input.
pub fn obfuscate_with<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    text.chars()
        .map(|c| match c {
            ' ' => ' ',
            _ => *PALETTE.choose(&mut *rng).unwrap_or(&'█'),
        })
        .collect()
}

/// Mask `text` for inline display, truncating long previews to
/// [`PREVIEW_LIMIT`] characters followed by an ellipsis.
pub fn mask_preview<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    truncate_preview(obfuscate_with(text, rng))
}

fn truncate_preview(masked: String) -> String {
    match masked.char_indices().nth(PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}{}", &masked[..cut], ELLIPSIS),
        None => masked,
    }
}
