use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use crate::variable::{Direction, Variable};
use crate::{GridCoord, VariableId, WordId, MAX_SLOT_LENGTH};

/// A word that can be chosen for a slot. Words are stored upper-cased, so comparing glyphs is
/// case-insensitive with respect to the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

// Blank entries are dropped before a `Word` is built, so a word is never empty.
#[allow(clippy::len_without_is_empty)]
impl Word {
    fn new(string: String) -> Word {
        let glyphs = string.chars().collect();
        Word { string, glyphs }
    }

    /// Length in characters, which is what slot lengths are measured in.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }
}

/// A crossing between one variable and another, referencing the other variable's id and the
/// location of the intersection within the other variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_variable: VariableId,
    pub other_cell: usize,
}

/// The single shared cell between two crossing variables `x` and `y`, as the index of that cell
/// within `x` (`cell`) and within `y` (`other_cell`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub cell: usize,
    pub other_cell: usize,
}

/// The static description of a puzzle: the grid, the word list, the variables derived from the
/// grid, and the overlaps between them. Built once and read-only afterwards.
pub struct Crossword {
    height: usize,
    width: usize,

    /// `structure[row][col]` is true for open cells.
    structure: Vec<Vec<bool>>,

    words: Vec<Word>,

    /// Across variables in row-major order, followed by down variables in column-major order.
    /// This is the enumeration order used for every tie-break in the solver.
    variables: Vec<Variable>,
    variable_ids: HashMap<Variable, VariableId>,

    /// Indexed by variable id, then by cell index within the variable.
    crossings: Vec<SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>>,

    /// Sorted by variable id.
    neighbors: Vec<SmallVec<[VariableId; MAX_SLOT_LENGTH]>>,
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossword")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("variables", &self.variables)
            .field("words", &format!("({} entries)", self.words.len()))
            .finish()
    }
}

/// Find the maximal runs of open cells along a line of `len` cells, returned as
/// (start, length) pairs. Runs shorter than two cells aren't slots.
fn open_runs(len: usize, is_open: impl Fn(usize) -> bool) -> Vec<(usize, usize)> {
    let mut runs = vec![];
    let mut run_start: Option<usize> = None;

    for idx in 0..=len {
        let open = idx < len && is_open(idx);

        match (open, run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                if idx - start > 1 {
                    runs.push((start, idx - start));
                }
                run_start = None;
            }
            _ => {}
        }
    }

    runs
}

impl Crossword {
    /// Build a crossword from a grid of open (`true`) and blocked (`false`) cells and a word list.
    /// Rows shorter than the widest row are padded with blocked cells. Words are trimmed,
    /// upper-cased, and de-duplicated, keeping the first occurrence; blank entries are dropped.
    pub fn new<I, S>(structure: Vec<Vec<bool>>, words: I) -> Crossword
        where
            I: IntoIterator<Item=S>,
            S: AsRef<str>,
    {
        let height = structure.len();
        let width = structure.iter().map(Vec::len).max().unwrap_or(0);
        let structure: Vec<Vec<bool>> = structure.into_iter().map(|mut row| {
            row.resize(width, false);
            row
        }).collect();

        let mut seen: HashSet<String> = HashSet::new();
        let words: Vec<Word> = words.into_iter().filter_map(|word| {
            let normalized = word.as_ref().trim().to_uppercase();
            if normalized.is_empty() || !seen.insert(normalized.clone()) {
                None
            } else {
                Some(Word::new(normalized))
            }
        }).collect();

        let mut variables: Vec<Variable> = vec![];
        for row in 0..height {
            for (col, length) in open_runs(width, |col| structure[row][col]) {
                variables.push(Variable::new(row, col, Direction::Across, length));
            }
        }
        for col in 0..width {
            for (row, length) in open_runs(height, |row| structure[row][col]) {
                variables.push(Variable::new(row, col, Direction::Down, length));
            }
        }

        let variable_ids: HashMap<Variable, VariableId> =
            variables.iter().enumerate().map(|(id, &variable)| (variable, id)).collect();

        // Build a map from cell location to the variables passing through it, which we can then
        // use to calculate crossings. At most one across and one down variable share a cell.
        let mut cell_by_loc: HashMap<GridCoord, SmallVec<[(VariableId, usize); 2]>> =
            HashMap::new();
        for (variable_id, variable) in variables.iter().enumerate() {
            for (cell_idx, loc) in variable.cells().enumerate() {
                cell_by_loc.entry(loc).or_default().push((variable_id, cell_idx));
            }
        }

        let crossings: Vec<SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>> =
            variables.iter().enumerate().map(|(variable_id, variable)| {
                variable.cells().map(|loc| {
                    cell_by_loc[&loc].iter()
                        .find(|&&(other, _)| other != variable_id)
                        .map(|&(other_variable, other_cell)| Crossing { other_variable, other_cell })
                }).collect()
            }).collect();

        let neighbors: Vec<SmallVec<[VariableId; MAX_SLOT_LENGTH]>> =
            crossings.iter().map(|variable_crossings| {
                let mut ids: SmallVec<[VariableId; MAX_SLOT_LENGTH]> = variable_crossings.iter()
                    .flatten()
                    .map(|crossing| crossing.other_variable)
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            }).collect();

        Crossword {
            height,
            width,
            structure,
            words,
            variables,
            variable_ids,
            crossings,
            neighbors,
        }
    }

    /// Build a crossword from a template string, with `_` or `.` representing open cells and
    /// anything else representing blocks. Unlike [`crate::loader::parse_structure`], lines are
    /// trimmed and blank lines skipped, so the template can be indented.
    pub fn from_template<I, S>(template: &str, words: I) -> Crossword
        where
            I: IntoIterator<Item=S>,
            S: AsRef<str>,
    {
        Crossword::new(crate::loader::template_rows(template), words)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.structure.get(row).and_then(|cells| cells.get(col)).copied().unwrap_or(false)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, variable_id: VariableId) -> &Variable {
        &self.variables[variable_id]
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.variable_ids.get(variable).copied()
    }

    /// Per-cell crossings for a variable; `None` where no other variable passes through the cell.
    pub fn crossings(&self, variable_id: VariableId) -> &[Option<Crossing>] {
        &self.crossings[variable_id]
    }

    /// The overlap between `x` and `y`, oriented so that `cell` indexes into `x`.
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<Overlap> {
        if x == y {
            return None;
        }

        self.crossings[x].iter().enumerate().find_map(|(cell, crossing)| match crossing {
            Some(crossing) if crossing.other_variable == y => {
                Some(Overlap { cell, other_cell: crossing.other_cell })
            }
            _ => None,
        })
    }

    /// Every variable sharing a cell with `variable_id`, in ascending id order.
    pub fn neighbors(&self, variable_id: VariableId) -> &[VariableId] {
        &self.neighbors[variable_id]
    }

    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.neighbors[variable_id].len()
    }

    /// Every unordered pair of overlapping variables, once each, with `x < y`.
    pub fn overlaps(&self) -> impl Iterator<Item=(VariableId, VariableId, Overlap)> + '_ {
        (0..self.variables.len()).flat_map(move |x| {
            self.neighbors[x].iter()
                .filter(move |&&y| x < y)
                .filter_map(move |&y| self.overlap(x, y).map(|overlap| (x, y, overlap)))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Crossword, Direction, Overlap, Variable};

    fn structure0() -> Crossword {
        Crossword::from_template(
            "
            #___#
            #_##_
            #_##_
            #_##_
            #____
            ",
            ["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten"],
        )
    }

    #[test]
    fn test_variables_are_maximal_runs() {
        let crossword = structure0();

        assert_eq!(crossword.height(), 5);
        assert_eq!(crossword.width(), 5);
        assert_eq!(crossword.variables(), &[
            Variable::new(0, 1, Direction::Across, 3),
            Variable::new(4, 1, Direction::Across, 4),
            Variable::new(0, 1, Direction::Down, 5),
            Variable::new(1, 4, Direction::Down, 4),
        ]);
    }

    #[test]
    fn test_overlaps_are_oriented() {
        let crossword = structure0();

        assert_eq!(crossword.overlap(0, 2), Some(Overlap { cell: 0, other_cell: 0 }));
        assert_eq!(crossword.overlap(1, 2), Some(Overlap { cell: 0, other_cell: 4 }));
        assert_eq!(crossword.overlap(2, 1), Some(Overlap { cell: 4, other_cell: 0 }));
        assert_eq!(crossword.overlap(1, 3), Some(Overlap { cell: 3, other_cell: 3 }));
        assert_eq!(crossword.overlap(0, 1), None);
        assert_eq!(crossword.overlap(0, 3), None);
        assert_eq!(crossword.overlap(2, 2), None);
    }

    #[test]
    fn test_neighbors_and_degree() {
        let crossword = structure0();

        assert_eq!(crossword.neighbors(0), &[2]);
        assert_eq!(crossword.neighbors(1), &[2, 3]);
        assert_eq!(crossword.neighbors(2), &[0, 1]);
        assert_eq!(crossword.neighbors(3), &[1]);
        assert_eq!(crossword.degree(1), 2);
        assert_eq!(crossword.overlaps().count(), 3);
    }

    #[test]
    fn test_overlap_indices_point_at_shared_cell() {
        let crossword = structure0();

        for (x, y, overlap) in crossword.overlaps() {
            assert_eq!(
                crossword.variable(x).cell(overlap.cell),
                crossword.variable(y).cell(overlap.other_cell),
            );
        }
    }

    /// ___
    /// #_#
    /// #__
    #[test]
    fn test_single_cells_are_not_variables() {
        let crossword = Crossword::from_template("___\n#_#\n#__", Vec::<String>::new());

        assert_eq!(crossword.variables(), &[
            Variable::new(0, 0, Direction::Across, 3),
            Variable::new(2, 1, Direction::Across, 2),
            Variable::new(0, 1, Direction::Down, 3),
        ]);
        assert_eq!(crossword.variable_id(&Variable::new(0, 1, Direction::Down, 3)), Some(2));
        assert_eq!(crossword.variable_id(&Variable::new(1, 1, Direction::Down, 2)), None);
    }

    #[test]
    fn test_ragged_rows_are_padded_with_blocks() {
        let crossword = Crossword::from_template("____\n__", ["ab"]);

        assert_eq!(crossword.width(), 4);
        assert!(!crossword.is_open(1, 2));
        assert!(!crossword.is_open(9, 9));
        assert_eq!(crossword.variables().len(), 4);
    }

    #[test]
    fn test_words_are_normalized_and_deduplicated() {
        let crossword = Crossword::from_template("__", ["ox", " OX ", "", "Ax"]);

        let words: Vec<&str> = crossword.words().iter().map(|word| word.as_str()).collect();
        assert_eq!(words, vec!["OX", "AX"]);
    }

    #[test]
    fn test_fully_blocked_grid_has_no_variables() {
        let crossword = Crossword::from_template("###\n###", ["abc"]);

        assert_eq!(crossword.variable_count(), 0);
        assert_eq!(crossword.overlaps().count(), 0);
    }
}
