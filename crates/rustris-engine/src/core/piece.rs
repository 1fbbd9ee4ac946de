use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A tetromino with kind, rotation state, anchor position and color.
///
/// Pieces are immutable values: moving or rotating returns a new `Piece`.
/// Whether the result is a legal placement is decided by the
/// [`placement`](super::placement) functions, never by the piece itself.
///
/// # Coordinate System
///
/// - The anchor is the top-left corner of the piece's 4×4 bounding box
/// - Columns grow rightward, rows grow downward
/// - Coordinates are signed; an anchor may sit outside the board as long as
///   the occupied cells do not
///
/// # Example
///
/// ```
/// use rustris_engine::{Piece, PieceKind, Position, RotationDirection};
///
/// let piece = Piece::new(PieceKind::T, Position::new(3, 0));
/// let moved = piece.shifted(1, 0);
/// let rotated = moved.rotated(RotationDirection::Clockwise);
/// assert_eq!(rotated.rotation().index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    anchor: Position,
    color: ColorId,
}

impl Piece {
    /// Creates a piece in spawn rotation with its kind's default color.
    #[must_use]
    pub fn new(kind: PieceKind, anchor: Position) -> Self {
        Self {
            kind,
            rotation: Rotation::SPAWN,
            anchor,
            color: kind.color(),
        }
    }

    #[must_use]
    pub fn with_color(self, color: ColorId) -> Self {
        Self { color, ..self }
    }

    #[must_use]
    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    #[must_use]
    pub fn color(&self) -> ColorId {
        self.color
    }

    /// Absolute board positions of the four occupied cells.
    #[must_use]
    pub fn cells(&self) -> [Position; 4] {
        self.kind
            .cell_offsets(self.rotation)
            .map(|(dx, dy)| self.anchor.offset(i32::from(dx), i32::from(dy)))
    }

    /// Returns the piece translated by `(dx, dy)`.
    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            anchor: self.anchor.offset(dx, dy),
            ..*self
        }
    }

    /// Returns the piece rotated in place, without any wall kick.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            rotation: self.rotation.rotated(direction),
            ..*self
        }
    }

    /// Ordered kick offsets to try when rotating from the current state.
    ///
    /// The first offset is always `(0, 0)`.
    #[must_use]
    pub fn kicks(&self, direction: RotationDirection) -> &'static [(i8, i8)] {
        self.kind.kicks(self.rotation, direction)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "kind#rotation@col,row" with ":color" when the color is not the kind's default
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.anchor.col,
            self.anchor.row
        )?;
        if self.color != self.kind.color() {
            write!(f, ":{}", self.color.as_char())?;
        }
        Ok(())
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_piece(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_piece(s: &str) -> Result<Piece, String> {
    let (kind_str, rest) = s
        .split_once('#')
        .ok_or_else(|| format!("missing '#' in format 'kind#rotation@col,row', got '{s}'"))?;

    let mut kind_chars = kind_str.chars();
    let (Some(kind_char), None) = (kind_chars.next(), kind_chars.next()) else {
        return Err(format!(
            "piece kind must be single character, got '{kind_str}'"
        ));
    };
    let kind =
        PieceKind::from_char(kind_char).ok_or_else(|| format!("invalid piece kind: {kind_char}"))?;

    let (rotation_str, rest) = rest
        .split_once('@')
        .ok_or_else(|| format!("missing '@' in format 'kind#rotation@col,row', got '{s}'"))?;
    let rotation = rotation_str
        .parse::<u8>()
        .ok()
        .and_then(Rotation::new)
        .ok_or_else(|| format!("rotation must be 0-3, got '{rotation_str}'"))?;

    let (position_str, color_str) = match rest.split_once(':') {
        Some((position, color)) => (position, Some(color)),
        None => (rest, None),
    };
    let (col_str, row_str) = position_str
        .split_once(',')
        .ok_or_else(|| format!("missing ',' in format 'kind#rotation@col,row', got '{s}'"))?;
    let col = col_str
        .parse::<i32>()
        .map_err(|e| format!("invalid column: {col_str} ({e})"))?;
    let row = row_str
        .parse::<i32>()
        .map_err(|e| format!("invalid row: {row_str} ({e})"))?;

    let mut piece = Piece::new(kind, Position::new(col, row)).with_rotation(rotation);
    if let Some(color_str) = color_str {
        let mut color_chars = color_str.chars();
        let color = match (color_chars.next(), color_chars.next()) {
            (Some(c), None) => ColorId::from_char(c),
            _ => None,
        }
        .ok_or_else(|| format!("invalid color: '{color_str}'"))?;
        piece = piece.with_color(color);
    }
    Ok(piece)
}

/// Column/row coordinate on (or near) the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.col + dx, self.row + dy)
    }
}

/// Color identifier of an occupied cell.
///
/// Valid identifiers are `1..=35` so that every color has a one-character
/// base-36 form used in board and piece text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ColorId(u8);

impl ColorId {
    pub const MAX: u8 = 35;

    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if id == 0 || id > Self::MAX {
            None
        } else {
            Some(Self(id))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Single base-36 character for this color (`1`-`9`, then `a`-`z`).
    #[must_use]
    pub fn as_char(self) -> char {
        char::from_digit(u32::from(self.0), 36).unwrap_or('?')
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        let digit = c.to_digit(36)?;
        Self::new(u8::try_from(digit).ok()?)
    }
}

impl TryFrom<u8> for ColorId {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id).ok_or_else(|| format!("color id must be 1-{}, got {id}", Self::MAX))
    }
}

impl From<ColorId> for u8 {
    fn from(color: ColorId) -> Self {
        color.0
    }
}

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    const fn index(self) -> usize {
        match self {
            RotationDirection::Clockwise => 0,
            RotationDirection::CounterClockwise => 1,
        }
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation wraps around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation(u8);

impl Rotation {
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub const fn new(state: u8) -> Option<Self> {
        if state < 4 { Some(Self(state)) } else { None }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % 4),
            RotationDirection::CounterClockwise => Self((self.0 + 3) % 4),
        }
    }
}

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Side length of the square the piece rotates in.
    #[must_use]
    pub const fn box_size(self) -> usize {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    /// Default color of the kind (`I=1` through `T=7`).
    #[must_use]
    pub const fn color(self) -> ColorId {
        ColorId(self as u8 + 1)
    }

    /// Cell offsets relative to the anchor for the given rotation.
    #[must_use]
    pub const fn cell_offsets(self, rotation: Rotation) -> [(i8, i8); 4] {
        PIECE_CELLS[self as usize][rotation.index()]
    }

    /// Anchor that places the piece at the top-center of a board with
    /// `columns` columns, with its highest cell on row 0.
    #[must_use]
    pub fn spawn_anchor(self, columns: usize) -> Position {
        let col = columns.saturating_sub(self.box_size()) / 2;
        let top = self
            .cell_offsets(Rotation::SPAWN)
            .iter()
            .map(|&(_, dy)| i32::from(dy))
            .min()
            .unwrap_or(0);
        Position::new(i32::try_from(col).unwrap_or(i32::MAX), -top)
    }

    /// Ordered wall kick offsets `(dx, dy)` for rotating from `from`.
    #[must_use]
    pub fn kicks(self, from: Rotation, direction: RotationDirection) -> &'static [(i8, i8)] {
        match self {
            PieceKind::O => &O_KICKS,
            PieceKind::I => &I_KICKS[from.index()][direction.index()],
            _ => &JLSTZ_KICKS[from.index()][direction.index()],
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use rustris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use rustris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// A piece within its 4×4 bounding box: one `u8` per row, bit `x` set for
/// an occupied column.
type PieceMask = [u8; 4];

/// Generates all 4 rotation states of a piece mask by rotating 90° clockwise
/// inside a `size`×`size` box.
///
/// Rotating inside the box reproduces the standard rotation states for
/// J, L, S, T, Z (3×3) and I (4×4); O (2×2) is unchanged.
const fn mask_rotations(size: usize, mask: PieceMask) -> [PieceMask; 4] {
    let mut rotates = [mask; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_mask = [0; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                if (rotates[i - 1][size - 1 - x] & (1 << y)) != 0 {
                    new_mask[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_mask;
        i += 1;
    }
    rotates
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn mask_cells(mask: PieceMask) -> [(i8, i8); 4] {
    let mut cells = [(0, 0); 4];
    let mut n = 0;
    let mut y = 0;
    while y < 4 {
        let mut x = 0;
        while x < 4 {
            if (mask[y] & (1 << x)) != 0 {
                assert!(n < 4, "tetromino has more than four cells");
                cells[n] = (x as i8, y as i8);
                n += 1;
            }
            x += 1;
        }
        y += 1;
    }
    assert!(n == 4, "tetromino has fewer than four cells");
    cells
}

const PIECE_MASKS: [[PieceMask; 4]; PieceKind::LEN] = {
    const fn m(bits: [bool; 4]) -> u8 {
        let mut mask = 0;
        let mut i = 0;
        while i < 4 {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;
    const EEEE: u8 = m([E; 4]);

    [
        // I-piece
        mask_rotations(4, [EEEE, m([C, C, C, C]), EEEE, EEEE]),
        // O-piece
        mask_rotations(2, [m([C, C, E, E]), m([C, C, E, E]), EEEE, EEEE]),
        // S-piece
        mask_rotations(3, [m([E, C, C, E]), m([C, C, E, E]), EEEE, EEEE]),
        // Z-piece
        mask_rotations(3, [m([C, C, E, E]), m([E, C, C, E]), EEEE, EEEE]),
        // J-piece
        mask_rotations(3, [m([C, E, E, E]), m([C, C, C, E]), EEEE, EEEE]),
        // L-piece
        mask_rotations(3, [m([E, E, C, E]), m([C, C, C, E]), EEEE, EEEE]),
        // T-piece
        mask_rotations(3, [m([E, C, E, E]), m([C, C, C, E]), EEEE, EEEE]),
    ]
};

const PIECE_CELLS: [[[(i8, i8); 4]; 4]; PieceKind::LEN] = {
    let mut cells = [[[(0, 0); 4]; 4]; PieceKind::LEN];
    let mut kind = 0;
    while kind < PieceKind::LEN {
        let mut rotation = 0;
        while rotation < 4 {
            cells[kind][rotation] = mask_cells(PIECE_MASKS[kind][rotation]);
            rotation += 1;
        }
        kind += 1;
    }
    cells
};

type KickTable = [[[(i8, i8); 5]; 2]; 4];

const O_KICKS: [(i8, i8); 1] = [(0, 0)];

// SRS kick data in board coordinates (rows grow downward).
// Indexed by [from rotation][clockwise, counterclockwise].
const JLSTZ_KICKS: KickTable = [
    [
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    [
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
    [
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
];

const I_KICKS: KickTable = [
    [
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    ],
    [
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    ],
    [
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    ],
    [
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_cells(piece: &Piece) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = piece.cells().iter().map(|p| (p.col, p.row)).collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_every_rotation_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for state in 0..4 {
                let rotation = Rotation::new(state).unwrap();
                let mut offsets = kind.cell_offsets(rotation).to_vec();
                offsets.sort_unstable();
                offsets.dedup();
                assert_eq!(offsets.len(), 4, "{kind} rotation {state}");
                assert!(offsets.iter().all(|&(x, y)| (0..4).contains(&x) && (0..4).contains(&y)));
            }
        }
    }

    #[test]
    fn test_t_piece_rotation_states() {
        let piece = Piece::new(PieceKind::T, Position::new(0, 0));
        assert_eq!(sorted_cells(&piece), vec![(0, 1), (1, 0), (1, 1), (2, 1)]);

        let east = piece.rotated(RotationDirection::Clockwise);
        assert_eq!(sorted_cells(&east), vec![(1, 0), (1, 1), (1, 2), (2, 1)]);

        let west = piece.rotated(RotationDirection::CounterClockwise);
        assert_eq!(sorted_cells(&west), vec![(0, 1), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_i_piece_rotation_states() {
        let piece = Piece::new(PieceKind::I, Position::new(0, 0));
        assert_eq!(sorted_cells(&piece), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);

        let east = piece.rotated(RotationDirection::Clockwise);
        assert_eq!(sorted_cells(&east), vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_o_piece_is_rotation_invariant() {
        let piece = Piece::new(PieceKind::O, Position::new(4, 0));
        let mut rotated = piece;
        for _ in 0..4 {
            rotated = rotated.rotated(RotationDirection::Clockwise);
            assert_eq!(sorted_cells(&rotated), sorted_cells(&piece));
        }
    }

    #[test]
    fn test_rotation_wraps_modulo_four() {
        let mut rotation = Rotation::SPAWN;
        for expected in [1, 2, 3, 0] {
            rotation = rotation.rotated(RotationDirection::Clockwise);
            assert_eq!(rotation.index(), expected);
        }
        for expected in [3, 2, 1, 0] {
            rotation = rotation.rotated(RotationDirection::CounterClockwise);
            assert_eq!(rotation.index(), expected);
        }
        assert_eq!(Rotation::new(4), None);
    }

    #[test]
    fn test_spawn_anchor_centers_pieces() {
        assert_eq!(PieceKind::I.spawn_anchor(10), Position::new(3, -1));
        assert_eq!(PieceKind::O.spawn_anchor(10), Position::new(4, 0));
        assert_eq!(PieceKind::T.spawn_anchor(10), Position::new(3, 0));

        for kind in PieceKind::ALL {
            let piece = Piece::new(kind, kind.spawn_anchor(10));
            let top = piece.cells().iter().map(|p| p.row).min().unwrap();
            assert_eq!(top, 0, "{kind} should spawn touching row 0");
        }
    }

    #[test]
    fn test_kicks_start_with_zero_offset() {
        for kind in PieceKind::ALL {
            for state in 0..4 {
                let rotation = Rotation::new(state).unwrap();
                for direction in [
                    RotationDirection::Clockwise,
                    RotationDirection::CounterClockwise,
                ] {
                    assert_eq!(kind.kicks(rotation, direction)[0], (0, 0));
                }
            }
        }
        assert_eq!(
            PieceKind::O
                .kicks(Rotation::SPAWN, RotationDirection::Clockwise)
                .len(),
            1
        );
    }

    #[test]
    fn test_kick_tables_are_mirrored_by_reverse_rotation() {
        // Rotating A->B with kick k and then B->A must be able to undo it with -k.
        for kind in [PieceKind::I, PieceKind::T] {
            for state in 0..4 {
                let from = Rotation::new(state).unwrap();
                let to = from.rotated(RotationDirection::Clockwise);
                let forward = kind.kicks(from, RotationDirection::Clockwise);
                let backward = kind.kicks(to, RotationDirection::CounterClockwise);
                for (f, b) in forward.iter().zip(backward) {
                    assert_eq!((f.0, f.1), (-b.0, -b.1), "{kind} from {state}");
                }
            }
        }
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceKind::S, Position::new(4, 18))
            .with_rotation(Rotation::new(1).unwrap());

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@4,18\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_serialization_negative_anchor_and_color() {
        let piece = Piece::new(PieceKind::I, Position::new(-1, -1))
            .with_color(ColorId::new(12).unwrap());

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"I#0@-1,-1:c\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        assert!(serde_json::from_str::<Piece>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1#4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"X#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"SS#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#4@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@abc,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4,18:0\"").is_err());
    }

    #[test]
    fn test_color_id_bounds() {
        assert_eq!(ColorId::new(0), None);
        assert_eq!(ColorId::new(36), None);
        assert_eq!(ColorId::new(35).unwrap().as_char(), 'z');
        assert_eq!(ColorId::from_char('7'), ColorId::new(7));
        assert_eq!(ColorId::from_char('0'), None);
        assert_eq!(PieceKind::I.color().get(), 1);
        assert_eq!(PieceKind::T.color().get(), 7);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }
}
