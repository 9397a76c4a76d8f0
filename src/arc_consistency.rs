use std::collections::{HashSet, VecDeque};

use bit_set::BitSet;

use crate::domains::DomainStore;
use crate::structure::Crossword;
use crate::VariableId;

/// An ordered pair `(x, y)`: make `x` consistent with `y`.
pub type Arc = (VariableId, VariableId);

/// Work done by a successful call to `enforce_arc_consistency`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    pub revisions: u64,
    pub eliminations: u64,
}

/// Returned when propagation empties a domain. `variable` is the one that bottomed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub variable: VariableId,
    pub revisions: u64,
    pub eliminations: u64,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// FIFO queue of arcs still to be checked. Arcs are not de-duplicated, which keeps the number of
/// revisions for a given input reproducible.
#[derive(Debug)]
struct ArcQueue {
    queue: VecDeque<Arc>,
}

impl ArcQueue {
    /// Every ordered pair of overlapping variables, in variable enumeration order.
    fn all_arcs(crossword: &Crossword) -> ArcQueue {
        ArcQueue {
            queue: (0..crossword.variable_count()).flat_map(|x| {
                crossword.neighbors(x).iter().map(move |&y| (x, y))
            }).collect(),
        }
    }

    fn with_initial_queue<Items>(items: Items) -> ArcQueue
        where
            Items: IntoIterator<Item=Arc>
    {
        ArcQueue { queue: items.into_iter().collect() }
    }

    fn pop_front(&mut self) -> Option<Arc> {
        self.queue.pop_front()
    }

    fn push_back(&mut self, arc: Arc) {
        self.queue.push_back(arc);
    }
}

/// Remove words from `x`'s domain that have no partner in `y`'s domain agreeing at the overlap.
/// Returns the number of words removed.
fn revise_counting(crossword: &Crossword, domains: &mut DomainStore, x: VariableId, y: VariableId) -> usize {
    let overlap = match crossword.overlap(x, y) {
        Some(overlap) => overlap,
        None => return 0,
    };

    // Rather than comparing every pair of words, collect the letters `y` can still place in the
    // shared cell.
    let supported_glyphs: HashSet<char> = domains.words(y)
        .map(|word_id| crossword.word(word_id).glyphs[overlap.other_cell])
        .collect();

    let mut revised = BitSet::with_capacity(crossword.words().len());
    let mut removed = 0;

    for word_id in domains.words(x) {
        if supported_glyphs.contains(&crossword.word(word_id).glyphs[overlap.cell]) {
            revised.insert(word_id);
        } else {
            removed += 1;
        }
    }

    if removed > 0 {
        domains.replace(x, revised);
    }

    removed
}

/// Make `x` arc-consistent with `y`. Returns whether `x`'s domain changed. Variables that don't
/// overlap are left alone.
pub fn revise(crossword: &Crossword, domains: &mut DomainStore, x: VariableId, y: VariableId) -> bool {
    revise_counting(crossword, domains, x, y) > 0
}

/// AC-3. Starting from `arcs`, or from every arc in the puzzle if `arcs` is `None`, revise arcs
/// until the queue drains. Whenever `x` shrinks while revising `(x, y)`, every arc `(z, x)` with
/// `z` a neighbor of `x` other than `y` is appended to the queue. Fails as soon as any domain
/// becomes empty.
pub fn enforce_arc_consistency(
    crossword: &Crossword,
    domains: &mut DomainStore,
    arcs: Option<Vec<Arc>>,
) -> ArcConsistencyResult {
    let mut queue = match arcs {
        Some(arcs) => ArcQueue::with_initial_queue(arcs),
        None => ArcQueue::all_arcs(crossword),
    };

    let mut revisions: u64 = 0;
    let mut eliminations: u64 = 0;

    while let Some((x, y)) = queue.pop_front() {
        if x == y {
            continue;
        }

        revisions += 1;
        let removed = revise_counting(crossword, domains, x, y);
        if removed == 0 {
            continue;
        }
        eliminations += removed as u64;

        if domains.is_empty(x) {
            return Err(ArcConsistencyFailure { variable: x, revisions, eliminations });
        }

        for &z in crossword.neighbors(x) {
            if z != y {
                queue.push_back((z, x));
            }
        }
    }

    Ok(ArcConsistencySuccess { revisions, eliminations })
}

/// Check that every word in every domain has a supporting word in each overlapping variable's
/// domain.
pub fn is_arc_consistent(crossword: &Crossword, domains: &DomainStore) -> bool {
    (0..crossword.variable_count()).all(|x| {
        crossword.neighbors(x).iter().all(|&y| {
            let overlap = match crossword.overlap(x, y) {
                Some(overlap) => overlap,
                None => return true,
            };

            domains.words(x).all(|word_id| {
                let glyph = crossword.word(word_id).glyphs[overlap.cell];
                domains.words(y).any(|other| crossword.word(other).glyphs[overlap.other_cell] == glyph)
            })
        })
    })
}
