use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{
    TOTAL_HEIGHT, TOTAL_WIDTH,
    board::{Board, PIECE_SPAWN_X, PIECE_SPAWN_Y},
};

/// A falling piece: kind, rotation, and position on the board.
///
/// Pieces are immutable values; movement and rotation return new instances.
/// The position is the top-left anchor of the piece's 4x4 bounding box in
/// absolute board coordinates (including the sentinel margins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece of the given kind at the spawn position.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: PieceRotation::default(),
            position: PiecePosition::SPAWN,
        }
    }

    /// Creates a placement candidate at the spawn row: the given rotation
    /// with the bounding box anchored at column `x`.
    ///
    /// Used by the placement search, which tries every anchor column of the
    /// board; candidates whose cells would leave the grid collide with the
    /// sentinel walls and are discarded by the caller.
    #[must_use]
    pub const fn candidate(kind: PieceKind, rotation: PieceRotation, x: u8) -> Self {
        Self {
            kind,
            rotation,
            position: PiecePosition::new(x, PIECE_SPAWN_Y as u8),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub(crate) fn mask(&self) -> PieceMask {
        self.kind.mask(self.rotation)
    }

    /// Iterates over the absolute board coordinates of the piece's cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mask = self.mask();
        let x0 = self.position.x();
        let y0 = self.position.y();
        (0..4).flat_map(move |dy| {
            (0..4).filter_map(move |dx| {
                ((mask[dy] >> dx) & 1 != 0).then_some((x0 + dx, y0 + dy))
            })
        })
    }

    #[must_use]
    pub fn left(&self) -> Option<Self> {
        Some(Self {
            position: self.position.left()?,
            ..*self
        })
    }

    #[must_use]
    pub fn right(&self) -> Option<Self> {
        Some(Self {
            position: self.position.right()?,
            ..*self
        })
    }

    #[must_use]
    pub fn down(&self) -> Option<Self> {
        Some(Self {
            position: self.position.down()?,
            ..*self
        })
    }

    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_left(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_left(),
            ..*self
        }
    }

    /// Returns where this piece comes to rest when dropped straight down.
    ///
    /// Pure simulation: neither the piece nor the board is modified.
    #[must_use]
    pub fn rest_position(&self, board: &Board) -> Self {
        let mut rested = *self;
        while let Some(next) = rested.down().filter(|p| !board.is_colliding(*p)) {
            rested = next;
        }
        rested
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Compact format: "kind#rotation@x,y", e.g. "T#1@5,0".
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.index(),
            self.position.x,
            self.position.y,
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_piece(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("expected format 'kind#rotation@x,y', got '{s}'"))
        })
    }
}

fn parse_piece(s: &str) -> Option<Piece> {
    let (kind, rest) = s.split_once('#')?;
    let (rotation, position) = rest.split_once('@')?;
    let (x, y) = position.split_once(',')?;

    let mut kind_chars = kind.chars();
    let kind = PieceKind::from_char(kind_chars.next()?)?;
    if kind_chars.next().is_some() {
        return None;
    }
    let rotation: u8 = rotation.parse().ok()?;
    if rotation > 3 {
        return None;
    }
    let x: u8 = x.parse().ok()?;
    let y: u8 = y.parse().ok()?;
    if x as usize >= TOTAL_WIDTH || y as usize >= TOTAL_HEIGHT {
        return None;
    }
    Some(Piece {
        kind,
        rotation: PieceRotation(rotation),
        position: PiecePosition::new(x, y),
    })
}

/// Anchor of a piece's 4x4 bounding box in absolute board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: u8,
    y: u8,
}

impl PiecePosition {
    #[expect(clippy::cast_possible_truncation)]
    pub const SPAWN: Self = Self::new(PIECE_SPAWN_X as u8, PIECE_SPAWN_Y as u8);

    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!((x as usize) < TOTAL_WIDTH);
        assert!((y as usize) < TOTAL_HEIGHT);
        Self { x, y }
    }

    #[must_use]
    pub fn x(self) -> usize {
        usize::from(self.x)
    }

    #[must_use]
    pub fn y(self) -> usize {
        usize::from(self.y)
    }

    #[must_use]
    pub const fn left(self) -> Option<Self> {
        if self.x == 0 {
            None
        } else {
            Some(Self::new(self.x - 1, self.y))
        }
    }

    #[must_use]
    pub const fn right(self) -> Option<Self> {
        if self.x as usize >= TOTAL_WIDTH - 1 {
            None
        } else {
            Some(Self::new(self.x + 1, self.y))
        }
    }

    #[must_use]
    pub const fn down(self) -> Option<Self> {
        if self.y as usize >= TOTAL_HEIGHT - 1 {
            None
        } else {
            Some(Self::new(self.x, self.y + 1))
        }
    }
}

/// One of the four rotation states, clockwise from the spawn orientation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    /// Builds a rotation state from an index, wrapping modulo 4.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Self(index % 4)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::S,
            3 => PieceKind::Z,
            4 => PieceKind::J,
            5 => PieceKind::L,
            _ => PieceKind::T,
        }
    }
}

impl PieceKind {
    /// Number of piece kinds.
    pub const LEN: usize = 7;

    /// All kinds, in declaration order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
        Self::T,
    ];

    /// Number of geometrically distinct orientations of this kind.
    ///
    /// Rotating past this count only revisits shapes already seen: O is
    /// rotation-invariant, I/S/Z repeat after two states, J/L/T need all
    /// four. The placement search enumerates exactly this many rotations.
    #[must_use]
    pub const fn distinct_rotation_count(self) -> u8 {
        match self {
            PieceKind::O => 1,
            PieceKind::I | PieceKind::S | PieceKind::Z => 2,
            PieceKind::J | PieceKind::L | PieceKind::T => 4,
        }
    }

    pub(crate) fn mask(self, rotation: PieceRotation) -> PieceMask {
        PIECE_MASKS[self as usize][rotation.as_usize()]
    }

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

/// A piece shape within its 4x4 bounding box: one 4-bit row mask per row.
pub(crate) type PieceMask = [u16; 4];

/// Generates the four rotation states of a mask by rotating 90 degrees
/// clockwise within the piece's effective `size` x `size` sub-box.
const fn rotation_table(size: usize, spawn: PieceMask) -> [PieceMask; 4] {
    let mut states = [spawn; 4];
    let mut i = 1;
    while i < 4 {
        let mut rotated = [0; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                if (states[i - 1][size - 1 - x] >> y) & 1 != 0 {
                    rotated[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        states[i] = rotated;
        i += 1;
    }
    states
}

const PIECE_MASKS: [[PieceMask; 4]; PieceKind::LEN] = {
    const fn row(bits: [u16; 4]) -> u16 {
        bits[0] | bits[1] << 1 | bits[2] << 2 | bits[3] << 3
    }

    [
        // I
        rotation_table(4, [0, row([1, 1, 1, 1]), 0, 0]),
        // O
        rotation_table(2, [row([1, 1, 0, 0]), row([1, 1, 0, 0]), 0, 0]),
        // S
        rotation_table(3, [row([0, 1, 1, 0]), row([1, 1, 0, 0]), 0, 0]),
        // Z
        rotation_table(3, [row([1, 1, 0, 0]), row([0, 1, 1, 0]), 0, 0]),
        // J
        rotation_table(3, [row([1, 0, 0, 0]), row([1, 1, 1, 0]), 0, 0]),
        // L
        rotation_table(3, [row([0, 0, 1, 0]), row([1, 1, 1, 0]), 0, 0]),
        // T
        rotation_table(3, [row([0, 1, 0, 0]), row([1, 1, 1, 0]), 0, 0]),
    ]
};
