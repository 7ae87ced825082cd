//! Alphabet-presence facets for the browsable letter index.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Cyrillic uppercase collation, А through Я without Ё.
pub const RUSSIAN_ALPHABET: [char; 32] = [
    'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ж', 'З', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р', 'С',
    'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш', 'Щ', 'Ъ', 'Ы', 'Ь', 'Э', 'Ю', 'Я',
];

pub const LATIN_ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Whether at least one item name leads with `letter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphabetFacet {
    pub letter: char,
    pub present: bool,
}

/// Mark each alphabet symbol present when some name leads with it.
///
/// The output always has one entry per alphabet symbol, in alphabet order,
/// whatever the input size. Leading characters are compared per Unicode
/// codepoint after uppercasing.
pub fn alphabet_facets<'a, I>(names: I, alphabet: &[char]) -> Vec<AlphabetFacet>
where
    I: IntoIterator<Item = &'a str>,
{
    let leading: HashSet<char> = names.into_iter().filter_map(leading_symbol).collect();

    alphabet
        .iter()
        .map(|&letter| AlphabetFacet {
            letter,
            present: leading.contains(&letter),
        })
        .collect()
}

fn leading_symbol(name: &str) -> Option<char> {
    let first = name.chars().next()?;
    first.to_uppercase().next()
}
