use crate::N_SMALLVEC_SIZE;
use core::fmt;
use grid_util::point::Point;
use smallvec::SmallVec;

/// A grid position packed into a single index, `x * width + y`.
pub type Cell = usize;

/// Per-cell bit set of [CellFlags::PERSON], [CellFlags::BLOCKED] and [CellFlags::EXIT].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellFlags(u8);

impl CellFlags {
    pub const EMPTY: CellFlags = CellFlags(0);
    pub const PERSON: CellFlags = CellFlags(1);
    pub const BLOCKED: CellFlags = CellFlags(1 << 1);
    pub const EXIT: CellFlags = CellFlags(1 << 2);

    pub fn contains(self, other: CellFlags) -> bool {
        self.0 & other.0 == other.0
    }
    pub fn insert(&mut self, other: CellFlags) {
        self.0 |= other.0;
    }
    pub fn is_person(self) -> bool {
        self.contains(CellFlags::PERSON)
    }
    pub fn is_blocked(self) -> bool {
        self.contains(CellFlags::BLOCKED)
    }
    pub fn is_exit(self) -> bool {
        self.contains(CellFlags::EXIT)
    }
}

/// The board: fixed dimensions and a flag set per cell. Built once by the loader (or a test) through
/// the `set_*` methods and only read afterwards; share it by reference between workers.
///
/// Coordinates follow the input format: `x` is the row (`0..height`), `y` the column (`0..width`).
#[derive(Clone, Debug, Default)]
pub struct RescueGrid {
    height: usize,
    width: usize,
    flags: Vec<CellFlags>,
    persons: Vec<Cell>,
    obstacle_count: usize,
    exit_count: usize,
}

impl RescueGrid {
    pub fn new(height: usize, width: usize) -> RescueGrid {
        RescueGrid {
            height,
            width,
            flags: vec![CellFlags::EMPTY; height * width],
            persons: Vec::new(),
            obstacle_count: 0,
            exit_count: 0,
        }
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn width(&self) -> usize {
        self.width
    }
    /// Number of cells, which is also the size of every per-traversal buffer.
    pub fn len(&self) -> usize {
        self.flags.len()
    }
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        0 <= x && (x as usize) < self.height && 0 <= y && (y as usize) < self.width
    }
    pub fn pack(&self, x: i32, y: i32) -> Cell {
        debug_assert!(self.is_valid(x, y), "({x},{y}) is outside the grid");
        x as usize * self.width + y as usize
    }
    pub fn unpack(&self, cell: Cell) -> Point {
        debug_assert!(cell < self.len(), "cell {cell} is outside the grid");
        Point::new((cell / self.width) as i32, (cell % self.width) as i32)
    }
    pub fn flags(&self, cell: Cell) -> CellFlags {
        self.flags[cell]
    }

    /// Marks a person. Listing the same cell twice keeps a single person there.
    pub fn set_person(&mut self, x: i32, y: i32) {
        let cell = self.pack(x, y);
        if !self.flags[cell].is_person() {
            self.persons.push(cell);
        }
        self.flags[cell].insert(CellFlags::PERSON);
    }
    pub fn set_blocked(&mut self, x: i32, y: i32) {
        let cell = self.pack(x, y);
        self.flags[cell].insert(CellFlags::BLOCKED);
        self.obstacle_count += 1;
    }
    pub fn set_exit(&mut self, x: i32, y: i32) {
        let cell = self.pack(x, y);
        self.flags[cell].insert(CellFlags::EXIT);
        self.exit_count += 1;
    }

    /// Distinct person cells, in the order they were first placed.
    pub fn persons(&self) -> &[Cell] {
        &self.persons
    }
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }
    pub fn obstacle_count(&self) -> usize {
        self.obstacle_count
    }
    pub fn exit_count(&self) -> usize {
        self.exit_count
    }

    /// The king-move neighbours of `cell` that are on the board and not blocked.
    pub fn neighbours(&self, cell: Cell) -> SmallVec<[Cell; N_SMALLVEC_SIZE]> {
        let p = self.unpack(cell);
        let mut result = SmallVec::new();
        for nx in p.x - 1..=p.x + 1 {
            for ny in p.y - 1..=p.y + 1 {
                if (nx != p.x || ny != p.y) && self.is_valid(nx, ny) {
                    let nb = self.pack(nx, ny);
                    if !self.flags[nb].is_blocked() {
                        result.push(nb);
                    }
                }
            }
        }
        result
    }

    /// Formats a cell as `(x,y)`.
    pub fn format_cell(&self, cell: Cell) -> String {
        let p = self.unpack(cell);
        format!("({},{})", p.x, p.y)
    }
}

impl fmt::Display for RescueGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid {}x{}:", self.height, self.width)?;
        for x in 0..self.height {
            let row = (0..self.width)
                .map(|y| {
                    let flags = self.flags[x * self.width + y];
                    if flags.is_blocked() {
                        '#'
                    } else if flags.is_person() && flags.is_exit() {
                        'B'
                    } else if flags.is_person() {
                        'P'
                    } else if flags.is_exit() {
                        'E'
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
