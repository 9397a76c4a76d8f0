use bit_set::BitSet;

use crate::structure::Crossword;
use crate::{VariableId, WordId};

/// A partial mapping from variables to words, indexed by variable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    words: Vec<Option<WordId>>,

    /// Word ids currently bound to any variable. Word ids are unique per spelling, so this is
    /// enough to detect duplicate words.
    used_words: BitSet,
    bound_count: usize,
}

impl Assignment {
    /// An empty assignment for a puzzle with `variable_count` variables.
    pub fn new(variable_count: usize) -> Assignment {
        Assignment {
            words: vec![None; variable_count],
            used_words: BitSet::new(),
            bound_count: 0,
        }
    }

    pub fn get(&self, variable_id: VariableId) -> Option<WordId> {
        self.words.get(variable_id).copied().flatten()
    }

    pub fn is_bound(&self, variable_id: VariableId) -> bool {
        self.get(variable_id).is_some()
    }

    pub fn is_word_used(&self, word_id: WordId) -> bool {
        self.used_words.contains(word_id)
    }

    /// The number of bound variables.
    pub fn len(&self) -> usize {
        self.bound_count
    }

    pub fn is_empty(&self) -> bool {
        self.bound_count == 0
    }

    /// True when every variable in the puzzle is bound.
    pub fn is_complete(&self) -> bool {
        self.bound_count == self.words.len()
    }

    /// Bound (variable, word) pairs in variable id order.
    pub fn iter(&self) -> impl Iterator<Item=(VariableId, WordId)> + '_ {
        self.words.iter().enumerate()
            .filter_map(|(variable_id, word_id)| word_id.map(|word_id| (variable_id, word_id)))
    }

    /// The bound word for a variable, as a string.
    pub fn word<'a>(&self, crossword: &'a Crossword, variable_id: VariableId) -> Option<&'a str> {
        self.get(variable_id).map(|word_id| crossword.word(word_id).as_str())
    }

    pub fn bind(&mut self, variable_id: VariableId, word_id: WordId) {
        self.unbind(variable_id);
        self.words[variable_id] = Some(word_id);
        self.used_words.insert(word_id);
        self.bound_count += 1;
    }

    pub fn unbind(&mut self, variable_id: VariableId) -> Option<WordId> {
        let previous = self.words[variable_id].take();
        if let Some(word_id) = previous {
            self.bound_count -= 1;
            if !self.words.contains(&Some(word_id)) {
                self.used_words.remove(word_id);
            }
        }
        previous
    }

    /// Would binding `variable_id := word_id` keep this assignment consistent? The word must have
    /// the right length, must not already be bound elsewhere, and must agree with every bound
    /// neighbor at their shared cell.
    pub fn is_consistent_with(&self, crossword: &Crossword, variable_id: VariableId, word_id: WordId) -> bool {
        let word = crossword.word(word_id);

        if word.len() != crossword.variable(variable_id).length {
            return false;
        }

        if self.iter().any(|(other, other_word)| other != variable_id && other_word == word_id) {
            return false;
        }

        crossword.neighbors(variable_id).iter().all(|&neighbor| {
            match (self.get(neighbor), crossword.overlap(variable_id, neighbor)) {
                (Some(neighbor_word), Some(overlap)) => {
                    word.glyphs[overlap.cell] == crossword.word(neighbor_word).glyphs[overlap.other_cell]
                }
                _ => true,
            }
        })
    }

    /// Check every consistency invariant over every pair of bound variables.
    pub fn is_consistent(&self, crossword: &Crossword) -> bool {
        if self.words.len() != crossword.variable_count() {
            return false;
        }

        let bound: Vec<(VariableId, WordId)> = self.iter().collect();

        let lengths_match = bound.iter().all(|&(variable_id, word_id)| {
            crossword.word(word_id).len() == crossword.variable(variable_id).length
        });

        let distinct = bound.iter().enumerate().all(|(idx, &(_, word_id))| {
            bound[idx + 1..].iter().all(|&(_, other_word)| other_word != word_id)
        });

        let overlaps_agree = crossword.overlaps().all(|(x, y, overlap)| {
            match (self.get(x), self.get(y)) {
                (Some(x_word), Some(y_word)) => {
                    crossword.word(x_word).glyphs.get(overlap.cell)
                        == crossword.word(y_word).glyphs.get(overlap.other_cell)
                }
                _ => true,
            }
        });

        lengths_match && distinct && overlaps_agree
    }
}
