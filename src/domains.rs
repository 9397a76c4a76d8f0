use bit_set::BitSet;

use crate::structure::Crossword;
use crate::{VariableId, WordId};

/// A marker returned by [`DomainStore::checkpoint`]. Every change made to the store after the
/// checkpoint can be undone by passing it back to [`DomainStore::rollback`].
#[derive(Debug)]
#[must_use]
pub struct Checkpoint {
    trail_len: usize,
}

/// The live set of candidate words for each variable, as a bit set over word ids.
///
/// Domains only ever shrink. While at least one checkpoint is open, every change records the
/// variable's previous domain on a trail so that it can be restored exactly on backtrack.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<BitSet>,
    trail: Vec<(VariableId, BitSet)>,
    open_checkpoints: usize,
}

impl DomainStore {
    /// Build a node-consistent store: each variable starts with exactly the words whose length
    /// matches its own.
    pub fn node_consistent(crossword: &Crossword) -> DomainStore {
        let word_count = crossword.words().len();

        let domains = crossword.variables().iter().map(|variable| {
            let mut domain = BitSet::with_capacity(word_count);
            for (word_id, word) in crossword.words().iter().enumerate() {
                if word.len() == variable.length {
                    domain.insert(word_id);
                }
            }
            domain
        }).collect();

        DomainStore { domains, trail: vec![], open_checkpoints: 0 }
    }

    pub fn variable_count(&self) -> usize {
        self.domains.len()
    }

    pub fn domain(&self, variable_id: VariableId) -> &BitSet {
        &self.domains[variable_id]
    }

    /// Remaining candidates for a variable, in ascending word id order.
    pub fn words(&self, variable_id: VariableId) -> impl Iterator<Item=WordId> + '_ {
        self.domains[variable_id].iter()
    }

    pub fn len(&self, variable_id: VariableId) -> usize {
        self.domains[variable_id].len()
    }

    pub fn is_empty(&self, variable_id: VariableId) -> bool {
        self.domains[variable_id].is_empty()
    }

    pub fn contains(&self, variable_id: VariableId, word_id: WordId) -> bool {
        self.domains[variable_id].contains(word_id)
    }

    /// The first variable whose domain is empty, if any.
    pub fn first_empty(&self) -> Option<VariableId> {
        self.domains.iter().position(BitSet::is_empty)
    }

    fn record(&mut self, variable_id: VariableId) {
        if self.open_checkpoints > 0 {
            self.trail.push((variable_id, self.domains[variable_id].clone()));
        }
    }

    /// Replace a variable's domain with a subset of itself.
    pub fn replace(&mut self, variable_id: VariableId, domain: BitSet) {
        debug_assert!(domain.is_subset(&self.domains[variable_id]), "domains may only shrink");

        self.record(variable_id);
        self.domains[variable_id] = domain;
    }

    /// Remove a single word from a variable's domain. Returns whether it was present.
    pub fn remove(&mut self, variable_id: VariableId, word_id: WordId) -> bool {
        if !self.domains[variable_id].contains(word_id) {
            return false;
        }

        self.record(variable_id);
        self.domains[variable_id].remove(word_id);
        true
    }

    /// Shrink a variable's domain down to the single word it has been assigned.
    pub fn fix(&mut self, variable_id: VariableId, word_id: WordId) {
        debug_assert!(self.domains[variable_id].contains(word_id));

        if self.domains[variable_id].len() == 1 {
            return;
        }

        let mut domain = BitSet::with_capacity(word_id + 1);
        domain.insert(word_id);
        self.replace(variable_id, domain);
    }

    pub fn checkpoint(&mut self) -> Checkpoint {
        self.open_checkpoints += 1;
        Checkpoint { trail_len: self.trail.len() }
    }

    /// Undo every change made since `checkpoint`, newest first.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        while self.trail.len() > checkpoint.trail_len {
            if let Some((variable_id, domain)) = self.trail.pop() {
                self.domains[variable_id] = domain;
            }
        }
        self.close(checkpoint);
    }

    /// Keep the changes made since `checkpoint`. An enclosing checkpoint can still undo them.
    pub fn commit(&mut self, checkpoint: Checkpoint) {
        self.close(checkpoint);
    }

    fn close(&mut self, _checkpoint: Checkpoint) {
        self.open_checkpoints -= 1;
        if self.open_checkpoints == 0 {
            self.trail.clear();
        }
    }
}
