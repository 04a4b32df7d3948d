//! Relation-keyed count cubes
//!
//! A cube maps a [`Coord`] (dependent label, gold-head label, predicted-head
//! label) to a count. Any axis may hold [`Slot::All`], the marginal over that
//! axis, so one cube answers queries at all 2³ granularities.

use std::collections::BTreeMap;
use std::fmt;

/// One axis value: a concrete relation label or the marginal over the axis
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// Sum over every label of the axis
    All,
    /// A concrete relation label
    Label(String),
}

impl Slot {
    /// Concrete label slot
    pub fn label(label: impl Into<String>) -> Self {
        Slot::Label(label.into())
    }

    /// Parse user input, mapping `marker` onto [`Slot::All`]
    pub fn parse(text: &str, marker: &str) -> Self {
        if text == marker {
            Slot::All
        } else {
            Slot::Label(text.to_string())
        }
    }

    /// Whether this is the marginal slot
    pub fn is_all(&self) -> bool {
        matches!(self, Slot::All)
    }

    /// Render with `marker` standing in for [`Slot::All`]
    pub fn display_with<'a>(&'a self, marker: &'a str) -> &'a str {
        match self {
            Slot::All => marker,
            Slot::Label(label) => label,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_with("ALL"))
    }
}

/// A cube cell address
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    /// Relation of the dependent token
    pub dep: Slot,
    /// Relation of the gold head
    pub gold: Slot,
    /// Relation of the predicted head
    pub head: Slot,
}

impl Coord {
    /// Create a coordinate
    pub fn new(dep: Slot, gold: Slot, head: Slot) -> Self {
        Self { dep, gold, head }
    }

    /// Coordinate with concrete labels on every axis
    pub fn labels(dep: &str, gold: &str, head: &str) -> Self {
        Self::new(Slot::label(dep), Slot::label(gold), Slot::label(head))
    }

    /// The grand-total coordinate `[ALL][ALL][ALL]`
    pub fn all() -> Self {
        Self::new(Slot::All, Slot::All, Slot::All)
    }

    /// All 8 coordinates obtained by replacing any subset of the axes of
    /// a concrete cell with [`Slot::All`]
    pub fn fanout(dep: &str, gold: &str, head: &str) -> [Coord; 8] {
        let pick = |mask: u8, bit: u8, label: &str| {
            if mask & bit == 0 {
                Slot::label(label)
            } else {
                Slot::All
            }
        };

        std::array::from_fn(|mask| {
            let mask = mask as u8;
            Coord::new(
                pick(mask, 0b100, dep),
                pick(mask, 0b010, gold),
                pick(mask, 0b001, head),
            )
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.dep, self.gold, self.head)
    }
}

/// Integer counts keyed by coordinate
///
/// Cells remember the order in which they were first populated. Label
/// enumeration follows that order, so report rows that tie on every sort
/// key come out in the order their cells were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cube {
    cells: BTreeMap<Coord, usize>,
    first_seen: Vec<Coord>,
}

impl Cube {
    /// Create an empty cube
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to a cell
    pub fn increment(&mut self, coord: Coord) {
        self.add(coord, 1);
    }

    /// Add `count` to a cell
    pub fn add(&mut self, coord: Coord, count: usize) {
        match self.cells.get_mut(&coord) {
            Some(cell) => *cell += count,
            None => {
                self.first_seen.push(coord.clone());
                self.cells.insert(coord, count);
            }
        }
    }

    /// Count at a cell (zero if absent)
    pub fn get(&self, coord: &Coord) -> usize {
        self.cells.get(coord).copied().unwrap_or(0)
    }

    /// Whether a cell has been populated
    pub fn contains(&self, coord: &Coord) -> bool {
        self.cells.contains_key(coord)
    }

    /// Populated cells in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&Coord, usize)> {
        self.first_seen
            .iter()
            .map(|coord| (coord, self.get(coord)))
    }

    /// Number of populated cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell has been populated
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Add every cell of `other` into this cube.
    ///
    /// Cells new to this cube are placed after the existing ones, in the
    /// order `other` first saw them.
    pub fn merge(&mut self, other: Cube) {
        let Cube {
            mut cells,
            first_seen,
        } = other;
        for coord in first_seen {
            if let Some(count) = cells.remove(&coord) {
                self.add(coord, count);
            }
        }
    }

    /// Concrete dependent labels present in the cube, in first-seen order
    pub fn dep_labels(&self) -> Vec<Slot> {
        concrete(self.first_seen.iter().map(|c| &c.dep))
    }

    /// Concrete gold-head labels present under `dep`, in first-seen order
    pub fn gold_labels(&self, dep: &Slot) -> Vec<Slot> {
        concrete(
            self.first_seen
                .iter()
                .filter(|c| &c.dep == dep)
                .map(|c| &c.gold),
        )
    }

    /// Concrete predicted-head labels present under `dep` and `gold`, in
    /// first-seen order
    pub fn head_labels(&self, dep: &Slot, gold: &Slot) -> Vec<Slot> {
        concrete(
            self.first_seen
                .iter()
                .filter(|c| &c.dep == dep && &c.gold == gold)
                .map(|c| &c.head),
        )
    }
}

fn concrete<'a>(slots: impl Iterator<Item = &'a Slot>) -> Vec<Slot> {
    let mut labels: Vec<Slot> = Vec::new();
    for slot in slots.filter(|s| !s.is_all()) {
        if !labels.contains(slot) {
            labels.push(slot.clone());
        }
    }
    labels
}

/// Sentence ids that produced an error, per coordinate, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceIndex {
    cells: BTreeMap<Coord, Vec<usize>>,
}

impl SentenceIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sentence id at a coordinate
    pub fn push(&mut self, coord: Coord, sentence_id: usize) {
        self.cells.entry(coord).or_default().push(sentence_id);
    }

    /// Ids recorded at a coordinate
    pub fn get(&self, coord: &Coord) -> &[usize] {
        self.cells.get(coord).map(Vec::as_slice).unwrap_or(&[])
    }

    /// At most `limit` ids recorded at a coordinate
    pub fn sample(&self, coord: &Coord, limit: usize) -> Vec<usize> {
        self.get(coord).iter().take(limit).copied().collect()
    }

    /// Append every list of `other` after the lists of this index
    pub fn merge(&mut self, other: SentenceIndex) {
        for (coord, ids) in other.cells {
            self.cells.entry(coord).or_default().extend(ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fanout_covers_every_aggregation_level() {
        let coords = Coord::fanout("nsubj", "root", "obj");
        assert_eq!(coords[0], Coord::labels("nsubj", "root", "obj"));
        assert_eq!(coords[7], Coord::all());

        let mut unique = coords.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 8);

        let all_counts: Vec<usize> = coords
            .iter()
            .map(|c| [&c.dep, &c.gold, &c.head].iter().filter(|s| s.is_all()).count())
            .collect();
        assert_eq!(all_counts.iter().filter(|&&n| n == 0).count(), 1);
        assert_eq!(all_counts.iter().filter(|&&n| n == 1).count(), 3);
        assert_eq!(all_counts.iter().filter(|&&n| n == 2).count(), 3);
        assert_eq!(all_counts.iter().filter(|&&n| n == 3).count(), 1);
    }

    #[test]
    fn test_slot_parse_and_display() {
        assert_eq!(Slot::parse("ALL", "ALL"), Slot::All);
        assert_eq!(Slot::parse("nsubj", "ALL"), Slot::label("nsubj"));
        assert_eq!(Slot::All.display_with("*"), "*");
        assert_eq!(Slot::All.to_string(), "ALL");
        assert_eq!(Coord::labels("a", "b", "c").to_string(), "a-b-c");
    }

    #[test]
    fn test_cube_counts_and_merge() {
        let mut cube = Cube::new();
        cube.increment(Coord::labels("det", "nsubj", "nsubj"));
        cube.increment(Coord::labels("det", "nsubj", "nsubj"));

        let mut other = Cube::new();
        other.add(Coord::labels("det", "nsubj", "nsubj"), 3);
        other.increment(Coord::all());
        cube.merge(other);

        assert_eq!(cube.get(&Coord::labels("det", "nsubj", "nsubj")), 5);
        assert_eq!(cube.get(&Coord::all()), 1);
        assert_eq!(cube.get(&Coord::labels("x", "y", "z")), 0);
        assert!(!cube.contains(&Coord::labels("x", "y", "z")));
        assert_eq!(cube.len(), 2);
    }

    #[test]
    fn test_label_enumeration_skips_marginals() {
        let mut cube = Cube::new();
        for coord in Coord::fanout("nsubj", "root", "obj") {
            cube.increment(coord);
        }
        for coord in Coord::fanout("det", "nsubj", "root") {
            cube.increment(coord);
        }

        assert_eq!(
            cube.dep_labels(),
            vec![Slot::label("nsubj"), Slot::label("det")]
        );
        assert_eq!(cube.gold_labels(&Slot::label("nsubj")), vec![Slot::label("root")]);
        assert_eq!(
            cube.gold_labels(&Slot::All),
            vec![Slot::label("root"), Slot::label("nsubj")]
        );
        assert_eq!(
            cube.head_labels(&Slot::All, &Slot::All),
            vec![Slot::label("obj"), Slot::label("root")]
        );
        assert!(cube.gold_labels(&Slot::label("amod")).is_empty());
    }

    #[test]
    fn test_labels_follow_first_seen_not_alphabetical_order() {
        let mut cube = Cube::new();
        cube.increment(Coord::labels("zz", "root", "aa"));
        cube.increment(Coord::labels("aa", "root", "zz"));
        cube.increment(Coord::labels("zz", "root", "aa"));

        assert_eq!(cube.dep_labels(), vec![Slot::label("zz"), Slot::label("aa")]);
        let cells: Vec<(String, usize)> =
            cube.iter().map(|(c, n)| (c.to_string(), n)).collect();
        assert_eq!(
            cells,
            vec![("zz-root-aa".to_string(), 2), ("aa-root-zz".to_string(), 1)]
        );
    }

    #[test]
    fn test_merge_appends_new_cells_after_existing_ones() {
        let mut first = Cube::new();
        first.increment(Coord::labels("zz", "g", "h"));

        let mut second = Cube::new();
        second.increment(Coord::labels("mm", "g", "h"));
        second.increment(Coord::labels("zz", "g", "h"));
        second.increment(Coord::labels("aa", "g", "h"));
        first.merge(second);

        assert_eq!(
            first.dep_labels(),
            vec![Slot::label("zz"), Slot::label("mm"), Slot::label("aa")]
        );
        assert_eq!(first.get(&Coord::labels("zz", "g", "h")), 2);
    }

    #[test]
    fn test_sentence_index_keeps_insertion_order() {
        let mut index = SentenceIndex::new();
        let coord = Coord::labels("a", "b", "c");
        index.push(coord.clone(), 4);
        index.push(coord.clone(), 1);

        let mut later = SentenceIndex::new();
        later.push(coord.clone(), 9);
        index.merge(later);

        assert_eq!(index.get(&coord), &[4, 1, 9]);
        assert_eq!(index.sample(&coord, 2), vec![4, 1]);
        assert!(index.get(&Coord::all()).is_empty());
    }
}
