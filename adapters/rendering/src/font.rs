//! Blocky 3×5 cell font used for the game-over banner.

/// Number of cells the cursor advances after a full glyph or an unsupported character.
pub const GLYPH_ADVANCE: i32 = 4;

/// Number of cells the cursor advances after a period.
pub const PERIOD_ADVANCE: i32 = 2;

/// Height of every glyph in cells.
pub const GLYPH_HEIGHT: i32 = 5;

const G: &[(i32, i32)] = &[
    (1, 0),
    (2, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (2, 3),
    (1, 4),
    (2, 4),
];
const A: &[(i32, i32)] = &[
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (2, 0),
    (2, 1),
    (2, 2),
    (2, 3),
    (2, 4),
    (1, 0),
    (1, 2),
];
const M: &[(i32, i32)] = &[
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (2, 0),
    (2, 1),
    (2, 2),
    (2, 3),
    (2, 4),
    (1, 1),
];
const E: &[(i32, i32)] = &[
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 0),
    (2, 0),
    (1, 2),
    (2, 2),
    (1, 4),
    (2, 4),
];
// D shares the outline of O.
const O: &[(i32, i32)] = &[
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (2, 0),
    (2, 1),
    (2, 2),
    (2, 3),
    (2, 4),
    (1, 0),
    (1, 4),
];
const V: &[(i32, i32)] = &[
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (2, 0),
    (2, 1),
    (2, 2),
    (2, 3),
    (1, 4),
];
const R: &[(i32, i32)] = &[
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 0),
    (2, 1),
    (1, 2),
    (2, 3),
    (2, 4),
];
const N: &[(i32, i32)] = &[
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 0),
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 4),
    (2, 0),
    (2, 1),
    (2, 2),
    (2, 3),
    (2, 4),
];
const PERIOD: &[(i32, i32)] = &[(0, 2)];

/// Returns the lit cells of a glyph relative to its top-left corner.
///
/// Letters are matched case-insensitively. Unsupported characters yield `None`.
#[must_use]
pub fn glyph(character: char) -> Option<&'static [(i32, i32)]> {
    match character.to_ascii_uppercase() {
        'G' => Some(G),
        'A' => Some(A),
        'M' => Some(M),
        'E' => Some(E),
        'O' | 'D' => Some(O),
        'V' => Some(V),
        'R' => Some(R),
        'N' => Some(N),
        '.' => Some(PERIOD),
        _ => None,
    }
}

/// Number of cells the cursor advances after drawing the character.
#[must_use]
pub fn advance(character: char) -> i32 {
    if character == '.' {
        PERIOD_ADVANCE
    } else {
        GLYPH_ADVANCE
    }
}

/// Width in cells covered by the cursor after laying out the text.
#[must_use]
pub fn text_width(text: &str) -> i32 {
    text.chars().map(advance).sum()
}

/// Lays out `text` with its top-left corner at the provided cell.
#[must_use]
pub fn text_cells(text: &str, column: i32, row: i32) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    let mut cursor = column;
    for character in text.chars() {
        if let Some(lit) = glyph(character) {
            cells.extend(lit.iter().map(|&(dx, dy)| (cursor + dx, row + dy)));
        }
        cursor += advance(character);
    }
    cells
}
