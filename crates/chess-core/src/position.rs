//! Immutable position wrapper around `shakmaty::Chess`.

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Move, Position as _, Rank, Square};

use crate::error::CoreError;
use crate::uci;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// 75 full moves without a capture or pawn move.
const SEVENTYFIVE_MOVE_PLIES: u32 = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::White => "w",
            Side::Black => "b",
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal and state predicates of a single position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub insufficient_material: bool,
    pub seventyfive_moves: bool,
    pub fivefold_repetition: bool,
}

impl Flags {
    /// Names of the flags that are set, in wire order.
    pub fn active(&self) -> Vec<&'static str> {
        [
            ("check", self.check),
            ("checkmate", self.checkmate),
            ("stalemate", self.stalemate),
            ("insufficient_material", self.insufficient_material),
            ("seventyfive_moves", self.seventyfive_moves),
            ("fivefold_repetition", self.fivefold_repetition),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

/// A validated chess position. Every successor is a new value.
#[derive(Clone, Debug)]
pub struct Position {
    chess: Chess,
    fen: String,
}

impl Position {
    /// Parse a FEN string. Syntactically broken FENs and impossible
    /// positions (missing kings, side not to move in check, ...) are rejected.
    pub fn parse(fen: &str) -> Result<Self, CoreError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidFen(fen.to_string()))?;
        let chess: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| CoreError::InvalidFen(fen.to_string()))?;
        Ok(Self::from_chess(chess))
    }

    pub fn start() -> Self {
        Self::from_chess(Chess::default())
    }

    fn from_chess(chess: Chess) -> Self {
        let fen = Fen::from_position(&chess, EnPassantMode::Legal).to_string();
        Self { chess, fen }
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn side_to_move(&self) -> Side {
        self.chess.turn().into()
    }

    /// Legal moves in UCI notation, in generation order.
    pub fn legal_moves(&self) -> Vec<String> {
        self.chess
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    pub fn is_legal(&self, uci_move: &str) -> bool {
        self.find_legal(uci_move).is_ok()
    }

    /// Apply a UCI move, returning the successor position.
    pub fn apply(&self, uci_move: &str) -> Result<Position, CoreError> {
        let mv = self.find_legal(uci_move)?;
        let mut next = self.chess.clone();
        next.play_unchecked(mv);
        Ok(Self::from_chess(next))
    }

    fn find_legal(&self, uci_move: &str) -> Result<Move, CoreError> {
        let uci_move = uci_move.trim();
        if !uci::is_well_formed(uci_move) {
            return Err(CoreError::InvalidMoveFormat(uci_move.to_string()));
        }
        let parsed: UciMove = uci_move
            .parse()
            .map_err(|_| CoreError::InvalidMoveFormat(uci_move.to_string()))?;

        self.chess
            .legal_moves()
            .into_iter()
            .find(|m| m.to_uci(CastlingMode::Standard) == parsed)
            .ok_or_else(|| CoreError::IllegalMove(uci_move.to_string()))
    }

    pub fn flags(&self) -> Flags {
        let has_moves = !self.chess.legal_moves().is_empty();
        Flags {
            check: self.chess.is_check(),
            checkmate: self.chess.is_checkmate(),
            stalemate: self.chess.is_stalemate(),
            insufficient_material: self.chess.is_insufficient_material(),
            seventyfive_moves: has_moves && self.chess.halfmoves() >= SEVENTYFIVE_MOVE_PLIES,
            // A position parsed from a FEN carries no move history.
            fivefold_repetition: false,
        }
    }

    /// No legal moves, or an automatic draw applies.
    pub fn is_terminal(&self) -> bool {
        if self.chess.legal_moves().is_empty() {
            return true;
        }
        let flags = self.flags();
        flags.insufficient_material || flags.seventyfive_moves || flags.fivefold_repetition
    }

    /// FEN letter of the piece on a screen square (row 0 = rank 8, col 0 = file a).
    pub fn piece_at(&self, row: usize, col: usize) -> Option<char> {
        if row > 7 || col > 7 {
            return None;
        }
        let square = Square::from_coords(File::new(col as u32), Rank::new(7 - row as u32));
        self.chess.board().piece_at(square).map(|p| p.char())
    }

    /// Whether the piece on a screen square belongs to the side to move.
    pub fn owns_square(&self, row: usize, col: usize) -> bool {
        match (self.piece_at(row, col), self.side_to_move()) {
            (Some(piece), Side::White) => piece.is_ascii_uppercase(),
            (Some(piece), Side::Black) => piece.is_ascii_lowercase(),
            (None, _) => false,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_round_trips() {
        let pos = Position::parse(STARTING_FEN).unwrap();
        assert_eq!(pos.fen(), STARTING_FEN);
        assert_eq!(pos.side_to_move(), Side::White);
        assert_eq!(pos.legal_moves().len(), 20);
    }

    #[test]
    fn test_rejects_garbage_fen() {
        assert_eq!(
            Position::parse("invalid").unwrap_err(),
            CoreError::InvalidFen("invalid".to_string())
        );
        // Syntactically fine, but no kings on the board
        assert!(Position::parse("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn test_rejects_side_not_to_move_in_check() {
        // Black king on a8 is attacked by the queen while white is to move
        assert!(Position::parse("k7/1Q6/2K5/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn test_apply_flips_side_and_leaves_input_untouched() {
        let pos = Position::start();
        let next = pos.apply("e2e4").unwrap();

        assert_eq!(next.fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        assert_eq!(pos.fen(), STARTING_FEN);

        let reparsed = Position::parse(next.fen()).unwrap();
        assert_eq!(reparsed.side_to_move(), pos.side_to_move().opposite());
    }

    #[test]
    fn test_illegal_and_malformed_moves() {
        let pos = Position::start();
        assert_eq!(
            pos.apply("e2e5").unwrap_err(),
            CoreError::IllegalMove("e2e5".to_string())
        );
        assert_eq!(
            pos.apply("zzzz").unwrap_err(),
            CoreError::InvalidMoveFormat("zzzz".to_string())
        );
        assert!(matches!(pos.apply("e2"), Err(CoreError::InvalidMoveFormat(_))));
    }

    #[test]
    fn test_legality_check_is_idempotent() {
        let pos = Position::start();
        for mv in ["e2e4", "e2e5", "g1f3", "a1a2"] {
            assert_eq!(pos.is_legal(mv), pos.is_legal(mv), "{mv}");
        }
        assert!(pos.is_legal("g1f3"));
        assert!(!pos.is_legal("a1a2"));
    }

    #[test]
    fn test_promotion_requires_piece_letter() {
        let pos = Position::parse("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert!(!pos.is_legal("a7a8"));
        let promoted = pos.apply("a7a8q").unwrap();
        assert_eq!(promoted.piece_at(0, 0), Some('Q'));
    }

    #[test]
    fn test_castling_uses_king_destination() {
        let pos = Position::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(pos.legal_moves().contains(&"e1g1".to_string()));
        let castled = pos.apply("e1g1").unwrap();
        assert_eq!(castled.piece_at(7, 6), Some('K'));
        assert_eq!(castled.piece_at(7, 5), Some('R'));
    }

    #[test]
    fn test_checkmate_flags() {
        let mut pos = Position::start();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            pos = pos.apply(mv).unwrap();
        }
        let flags = pos.flags();
        assert!(flags.check);
        assert!(flags.checkmate);
        assert!(!flags.stalemate);
        assert!(pos.is_terminal());
        assert_eq!(flags.active(), vec!["check", "checkmate"]);
    }

    #[test]
    fn test_stalemate_flags() {
        let pos = Position::parse("k7/8/2K5/8/8/8/1Q6/8 w - - 0 1")
            .unwrap()
            .apply("b2b6")
            .unwrap();
        assert_eq!(
            pos.flags(),
            Flags {
                stalemate: true,
                ..Flags::default()
            }
        );
        assert!(pos.legal_moves().is_empty());
        assert!(pos.is_terminal());
    }

    #[test]
    fn test_insufficient_material_is_terminal() {
        let pos = Position::parse("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(pos.flags().insufficient_material);
        assert!(!pos.legal_moves().is_empty());
        assert!(pos.is_terminal());
    }

    #[test]
    fn test_seventyfive_move_rule() {
        let pos = Position::parse("8/8/8/4k3/8/8/R7/4K3 w - - 150 120").unwrap();
        assert!(pos.flags().seventyfive_moves);
        assert!(pos.is_terminal());

        let pos = Position::parse("8/8/8/4k3/8/8/R7/4K3 w - - 149 120").unwrap();
        assert!(!pos.flags().seventyfive_moves);
        assert!(!pos.is_terminal());
    }

    #[test]
    fn test_piece_at_and_ownership() {
        let pos = Position::start();
        assert_eq!(pos.piece_at(7, 4), Some('K'));
        assert_eq!(pos.piece_at(0, 3), Some('q'));
        assert_eq!(pos.piece_at(4, 4), None);
        assert_eq!(pos.piece_at(8, 0), None);

        assert!(pos.owns_square(6, 4));
        assert!(!pos.owns_square(1, 4));
        assert!(!pos.owns_square(4, 4));

        let black = pos.apply("e2e4").unwrap();
        assert!(black.owns_square(1, 4));
        assert!(!black.owns_square(4, 4));
    }
}
