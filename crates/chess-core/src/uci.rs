//! UCI move strings and screen-coordinate helpers.
//! Screen coordinates put row 0 on rank 8 and col 0 on file a.

use regex::Regex;
use std::sync::LazyLock;

const FILES: &[u8; 8] = b"abcdefgh";
const RANKS: &[u8; 8] = b"87654321";

static UCI_MOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-h][1-8][a-h][1-8][qrbn]?$").unwrap());

/// Origin square, destination square and an optional promotion letter.
pub fn is_well_formed(uci_move: &str) -> bool {
    UCI_MOVE_RE.is_match(uci_move)
}

/// Screen coordinates to a square name, e.g. (6, 4) -> "e2".
pub fn coords_to_square(row: usize, col: usize) -> Option<String> {
    let rank = *RANKS.get(row)? as char;
    let file = *FILES.get(col)? as char;
    Some(format!("{file}{rank}"))
}

/// Square name to screen coordinates, e.g. "e2" -> (6, 4).
pub fn square_to_coords(square: &str) -> Option<(usize, usize)> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let col = FILES.iter().position(|&f| f == bytes[0])?;
    let row = RANKS.iter().position(|&r| r == bytes[1])?;
    Some((row, col))
}

/// Origin and destination coordinates of a UCI move.
pub fn move_to_coords(uci_move: &str) -> Option<((usize, usize), (usize, usize))> {
    if !is_well_formed(uci_move) {
        return None;
    }
    let from = square_to_coords(&uci_move[0..2])?;
    let to = square_to_coords(&uci_move[2..4])?;
    Some((from, to))
}

/// Build a UCI move from two screen squares.
pub fn coords_to_move(from: (usize, usize), to: (usize, usize)) -> Option<String> {
    Some(format!(
        "{}{}",
        coords_to_square(from.0, from.1)?,
        coords_to_square(to.0, to.1)?
    ))
}
