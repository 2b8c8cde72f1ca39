//! The generated tile grid and its derived openness map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::LevelFormatError;
use crate::geometry::GridShape;
use crate::types::{Pos, TileKind, Transparency};

/// Per-tile count of positions visible from that tile through floor, taken
/// while the level was generated. Walls and the outer ring hold zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpennessMap {
    shape: GridShape,
    counts: Vec<u32>,
}

impl OpennessMap {
    pub fn new(shape: GridShape) -> Self {
        Self { shape, counts: vec![0; shape.cell_count()] }
    }

    pub fn get(&self, pos: Pos) -> u32 {
        self.shape.index(pos).and_then(|index| self.counts.get(index)).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, pos: Pos, count: u32) {
        if let Some(slot) = self.shape.index(pos).and_then(|index| self.counts.get_mut(index)) {
            *slot = count;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, u32)> + '_ {
        self.shape.positions().map(|pos| (pos, self.get(pos)))
    }

    /// Number of tiles per openness bucket of `bucket_size`, keyed by the
    /// bucket's lower bound. Zero-openness tiles are skipped.
    pub fn histogram(&self, bucket_size: u32) -> BTreeMap<u32, usize> {
        let bucket_size = bucket_size.max(1);
        let mut buckets = BTreeMap::new();
        for (_, count) in self.iter().filter(|&(_, count)| count > 0) {
            *buckets.entry(count / bucket_size * bucket_size).or_insert(0) += 1;
        }
        buckets
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "LevelRecord", try_from = "LevelRecord")]
pub struct Level {
    shape: GridShape,
    tiles: Vec<TileKind>,
    start: Pos,
    openness: OpennessMap,
}

impl Level {
    /// A level with every playable tile set to `kind`.
    pub fn filled(shape: GridShape, kind: TileKind, start: Pos) -> Self {
        Self {
            shape,
            tiles: vec![kind; shape.cell_count()],
            start,
            openness: OpennessMap::new(shape),
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn width(&self) -> i32 {
        self.shape.width
    }

    pub fn height(&self) -> i32 {
        self.shape.height
    }

    /// Where the player begins. Always a tile inside the playable region.
    pub fn start(&self) -> Pos {
        self.start
    }

    pub(crate) fn set_start(&mut self, start: Pos) {
        self.start = start;
    }

    pub fn tile(&self, pos: Pos) -> Option<TileKind> {
        self.shape.index(pos).and_then(|index| self.tiles.get(index)).copied()
    }

    /// Overwrites the tile at `pos`. Returns false, changing nothing, when
    /// `pos` lies outside the playable region.
    pub fn set_tile(&mut self, pos: Pos, kind: TileKind) -> bool {
        match self.shape.index(pos).and_then(|index| self.tiles.get_mut(index)) {
            Some(slot) => {
                *slot = kind;
                true
            }
            None => false,
        }
    }

    pub fn is(&self, pos: Pos, kind: TileKind) -> bool {
        self.tile(pos) == Some(kind)
    }

    pub fn passable(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(TileKind::passable)
    }

    /// Off-grid positions are opaque.
    pub fn transparency(&self, pos: Pos) -> Transparency {
        self.tile(pos).map_or(Transparency::Opaque, TileKind::transparency)
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Pos, TileKind)> + '_ {
        self.shape.positions().filter_map(|pos| self.tile(pos).map(|kind| (pos, kind)))
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles().filter(|&(_, tile)| tile == kind).count()
    }

    pub fn openness(&self, pos: Pos) -> u32 {
        self.openness.get(pos)
    }

    pub fn openness_map(&self) -> &OpennessMap {
        &self.openness
    }

    pub(crate) fn set_openness(&mut self, openness: OpennessMap) {
        self.openness = openness;
    }

    /// One line per row with trailing blanks trimmed; cells outside the
    /// playable region render as spaces.
    pub fn render_ascii(&self) -> String {
        self.render_with(|_, kind| kind.glyph())
    }

    /// Like [`Level::render_ascii`], with `glyph` choosing each cell's character.
    pub fn render_with(&self, mut glyph: impl FnMut(Pos, TileKind) -> char) -> String {
        let mut out = String::new();
        for y in 0..self.shape.height {
            let mut line = String::with_capacity(self.shape.width.max(0) as usize);
            for x in 0..self.shape.width {
                let pos = self.shape.xy2pos(x, y);
                line.push(self.tile(pos).map_or(' ', |kind| glyph(pos, kind)));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    /// Rebuilds a level from [`Level::render_ascii`] output. The openness
    /// map comes back empty.
    pub fn from_ascii(shape: GridShape, text: &str, start: Pos) -> Result<Self, LevelFormatError> {
        if shape.positions().next().is_none() {
            return Err(LevelFormatError::EmptyGrid { width: shape.width, height: shape.height });
        }
        let rows: Vec<&str> = text.lines().collect();
        if i32::try_from(rows.len()).ok() != Some(shape.height) {
            return Err(LevelFormatError::RowCount { expected: shape.height, found: rows.len() });
        }
        if !shape.in_bounds(start) {
            return Err(LevelFormatError::StartOutOfBounds { pos: start });
        }

        let mut level = Level::filled(shape, TileKind::Wall, start);
        for (y, row) in (0..shape.height).zip(rows) {
            let cells: Vec<char> = row.chars().collect();
            let row_width = i32::try_from(cells.len()).unwrap_or(i32::MAX);
            for x in 0..shape.width.max(row_width) {
                let glyph = usize::try_from(x).ok().and_then(|x| cells.get(x)).copied();
                let pos = shape.xy2pos(x, y);
                let inside = x < shape.width && shape.in_bounds(pos);
                match (inside, glyph) {
                    (true, None | Some(' ')) => return Err(LevelFormatError::MissingTile { x, y }),
                    (true, Some(glyph)) => {
                        let kind = TileKind::from_glyph(glyph)
                            .ok_or(LevelFormatError::UnknownGlyph { glyph, x, y })?;
                        level.set_tile(pos, kind);
                    }
                    (false, None | Some(' ')) => {}
                    (false, Some(_)) => return Err(LevelFormatError::StrayTile { x, y }),
                }
            }
        }
        Ok(level)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.shape.width.to_le_bytes());
        bytes.extend(self.shape.height.to_le_bytes());
        bytes.extend(self.start.0.to_le_bytes());
        for (_, kind) in self.tiles() {
            bytes.push(kind.code());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

/// Serialized form: rows of glyphs keep save files readable.
#[derive(Serialize, Deserialize)]
struct LevelRecord {
    width: i32,
    height: i32,
    start: Pos,
    rows: Vec<String>,
    openness: Vec<u32>,
}

impl From<Level> for LevelRecord {
    fn from(level: Level) -> Self {
        Self {
            width: level.shape.width,
            height: level.shape.height,
            start: level.start,
            rows: level.render_ascii().lines().map(str::to_string).collect(),
            openness: level.openness.counts,
        }
    }
}

impl TryFrom<LevelRecord> for Level {
    type Error = LevelFormatError;

    fn try_from(record: LevelRecord) -> Result<Self, Self::Error> {
        let shape = GridShape::new(record.width, record.height);
        let mut text = record.rows.join("\n");
        text.push('\n');
        let mut level = Level::from_ascii(shape, &text, record.start)?;
        if record.openness.len() != shape.cell_count() {
            return Err(LevelFormatError::OpennessSize {
                expected: shape.cell_count(),
                found: record.openness.len(),
            });
        }
        level.openness = OpennessMap { shape, counts: record.openness };
        Ok(level)
    }
}
