use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use instant::{Duration, Instant};

use crate::arc_consistency::{enforce_arc_consistency, Arc, ArcConsistencyResult};
use crate::assignment::Assignment;
use crate::domains::DomainStore;
use crate::structure::{Crossword, Overlap};
use crate::{VariableId, WordId};

/// Knobs for a single solve.
///
/// ```
/// use crossword_fill::SolverConfig;
/// use instant::Duration;
///
/// let config = SolverConfig::default()
///     .with_max_states(10_000)
///     .with_time_limit(Duration::from_secs(5));
/// assert!(config.propagate);
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Re-run AC-3 from the newly bound variable after every tentative assignment.
    pub propagate: bool,

    /// After binding a word, remove it from every other unbound variable's domain, since no word
    /// may appear twice in a fill.
    pub prune_duplicates: bool,

    /// Give up after visiting this many search states.
    pub max_states: Option<u64>,

    /// Give up once this much wall-clock time has passed.
    pub time_limit: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            propagate: true,
            prune_duplicates: true,
            max_states: None,
            time_limit: None,
        }
    }
}

impl SolverConfig {
    pub fn with_propagation(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    pub fn with_duplicate_pruning(mut self, prune_duplicates: bool) -> Self {
        self.prune_duplicates = prune_duplicates;
        self
    }

    pub fn with_max_states(mut self, max_states: u64) -> Self {
        self.max_states = Some(max_states);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Search nodes visited, not counting the final complete one.
    pub states: u64,
    pub backtracks: u64,
    pub revisions: u64,
    pub eliminations: u64,
    pub duration: Duration,
}

impl Statistics {
    fn record_propagation(&mut self, result: &ArcConsistencyResult) {
        let (revisions, eliminations) = match result {
            Ok(success) => (success.revisions, success.eliminations),
            Err(failure) => (failure.revisions, failure.eliminations),
        };
        self.revisions += revisions;
        self.eliminations += eliminations;
    }
}

/// A successful fill: every variable is bound and the assignment is consistent.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

#[derive(Debug)]
pub enum FillFailure {
    /// The search space was exhausted without finding a consistent fill.
    NoSolution { statistics: Statistics },

    /// The state or time budget ran out before the search finished.
    BudgetExhausted { statistics: Statistics },
}

impl FillFailure {
    pub fn statistics(&self) -> &Statistics {
        match self {
            FillFailure::NoSolution { statistics } => statistics,
            FillFailure::BudgetExhausted { statistics } => statistics,
        }
    }
}

impl Display for FillFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FillFailure::NoSolution { .. } => write!(f, "no solution"),
            FillFailure::BudgetExhausted { statistics } => write!(
                f,
                "search budget exhausted after {} states ({:?})",
                statistics.states, statistics.duration
            ),
        }
    }
}

impl std::error::Error for FillFailure {}

/// Raised inside the search when the budget runs out; unwinds to the root.
#[derive(Debug)]
struct BudgetExhausted;

/// Backtracking search over a single crossword. The solver owns its domain store for the
/// duration of one solve.
pub struct Solver<'a> {
    crossword: &'a Crossword,
    config: SolverConfig,
    domains: DomainStore,
    statistics: Statistics,
    deadline: Option<Instant>,
}

impl<'a> Solver<'a> {
    /// Set up a solver with node-consistent domains.
    pub fn new(crossword: &'a Crossword, config: SolverConfig) -> Solver<'a> {
        Solver {
            crossword,
            config,
            domains: DomainStore::node_consistent(crossword),
            statistics: Statistics::default(),
            deadline: None,
        }
    }

    pub fn domains(&self) -> &DomainStore {
        &self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Enforce node and arc consistency, then search for a complete, consistent assignment.
    pub fn solve(mut self) -> Result<FillSuccess, FillFailure> {
        let start = Instant::now();
        self.deadline = self.config.time_limit.map(|time_limit| start + time_limit);

        let outcome = self.run();
        self.statistics.duration = start.elapsed();
        let statistics = self.statistics;

        match outcome {
            Ok(Some(assignment)) => {
                debug_assert!(assignment.is_complete());
                debug_assert!(assignment.is_consistent(self.crossword));
                Ok(FillSuccess { statistics, assignment })
            }
            Ok(None) => Err(FillFailure::NoSolution { statistics }),
            Err(BudgetExhausted) => Err(FillFailure::BudgetExhausted { statistics }),
        }
    }

    fn run(&mut self) -> Result<Option<Assignment>, BudgetExhausted> {
        // A slot with no word of the right length can never be filled.
        if self.domains.first_empty().is_some() {
            return Ok(None);
        }

        let result = enforce_arc_consistency(self.crossword, &mut self.domains, None);
        self.statistics.record_propagation(&result);
        if result.is_err() {
            return Ok(None);
        }

        let mut assignment = Assignment::new(self.crossword.variable_count());
        if self.backtrack(&mut assignment)? {
            Ok(Some(assignment))
        } else {
            Ok(None)
        }
    }

    fn check_budget(&self) -> Result<(), BudgetExhausted> {
        if let Some(max_states) = self.config.max_states {
            if self.statistics.states > max_states {
                return Err(BudgetExhausted);
            }
        }

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(BudgetExhausted);
            }
        }

        Ok(())
    }

    /// Extend `assignment` to a complete one. Returns `Ok(true)` with `assignment` complete on
    /// success, and `Ok(false)` with `assignment` and the domain store exactly as they were on
    /// entry otherwise.
    fn backtrack(&mut self, assignment: &mut Assignment) -> Result<bool, BudgetExhausted> {
        if assignment.is_complete() {
            return Ok(true);
        }

        self.statistics.states += 1;
        self.check_budget()?;

        let variable_id = match self.select_unassigned_variable(assignment) {
            Some(variable_id) => variable_id,
            None => return Ok(true),
        };

        for word_id in self.order_domain_values(variable_id, assignment) {
            assignment.bind(variable_id, word_id);

            if !assignment.is_consistent_with(self.crossword, variable_id, word_id) {
                assignment.unbind(variable_id);
                continue;
            }

            // Everything the inference step and the deeper search prune is undone through this
            // checkpoint unless the branch succeeds.
            let checkpoint = self.domains.checkpoint();

            let outcome = if self.infer(variable_id, word_id, assignment) {
                self.backtrack(assignment)
            } else {
                Ok(false)
            };

            match outcome {
                Ok(true) => {
                    self.domains.commit(checkpoint);
                    return Ok(true);
                }
                Ok(false) => {
                    self.domains.rollback(checkpoint);
                    assignment.unbind(variable_id);
                }
                Err(budget_exhausted) => {
                    self.domains.rollback(checkpoint);
                    assignment.unbind(variable_id);
                    return Err(budget_exhausted);
                }
            }
        }

        self.statistics.backtracks += 1;
        Ok(false)
    }

    /// Apply the consequences of binding `variable_id := word_id` to the domain store. Returns
    /// false if some unbound variable is left without candidates.
    fn infer(&mut self, variable_id: VariableId, word_id: WordId, assignment: &Assignment) -> bool {
        let crossword = self.crossword;

        // The bound variable's domain becomes just its word, so propagation treats it as fixed.
        self.domains.fix(variable_id, word_id);

        let mut arcs: Vec<Arc> = crossword.neighbors(variable_id).iter()
            .filter(|&&neighbor| !assignment.is_bound(neighbor))
            .map(|&neighbor| (neighbor, variable_id))
            .collect();

        if self.config.prune_duplicates {
            for other in 0..crossword.variable_count() {
                if assignment.is_bound(other) || !self.domains.remove(other, word_id) {
                    continue;
                }

                if self.domains.is_empty(other) {
                    return false;
                }

                arcs.extend(
                    crossword.neighbors(other).iter()
                        .filter(|&&neighbor| !assignment.is_bound(neighbor))
                        .map(|&neighbor| (neighbor, other))
                );
            }
        }

        if !self.config.propagate {
            return true;
        }

        let result = enforce_arc_consistency(crossword, &mut self.domains, Some(arcs));
        self.statistics.record_propagation(&result);
        result.is_ok()
    }

    /// Choose the unbound variable with the fewest remaining candidates, preferring the one with
    /// the most neighbors on a tie, and then the lowest id.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<VariableId> {
        (0..self.crossword.variable_count())
            .filter(|&variable_id| !assignment.is_bound(variable_id))
            .min_by_key(|&variable_id| {
                (
                    self.domains.len(variable_id),
                    Reverse(self.crossword.degree(variable_id)),
                    variable_id,
                )
            })
    }

    /// The candidates for `variable_id`, ordered by how many words each would rule out of its
    /// unbound neighbors' domains (fewest first), then by word id.
    pub fn order_domain_values(&self, variable_id: VariableId, assignment: &Assignment) -> Vec<WordId> {
        let crossword = self.crossword;

        // For each unbound neighbor, count how many of its candidates place each letter in the
        // shared cell. A candidate for `variable_id` rules out every neighbor word that doesn't
        // share its letter there.
        let neighbor_glyph_counts: Vec<(Overlap, HashMap<char, usize>, usize)> =
            crossword.neighbors(variable_id).iter()
                .filter(|&&neighbor| !assignment.is_bound(neighbor))
                .filter_map(|&neighbor| {
                    let overlap = crossword.overlap(variable_id, neighbor)?;

                    let mut glyph_counts: HashMap<char, usize> = HashMap::new();
                    for neighbor_word in self.domains.words(neighbor) {
                        let glyph = crossword.word(neighbor_word).glyphs[overlap.other_cell];
                        *glyph_counts.entry(glyph).or_insert(0) += 1;
                    }

                    Some((overlap, glyph_counts, self.domains.len(neighbor)))
                })
                .collect();

        let mut scored: Vec<(usize, WordId)> = self.domains.words(variable_id).map(|word_id| {
            let word = crossword.word(word_id);

            let ruled_out: usize = neighbor_glyph_counts.iter()
                .map(|(overlap, glyph_counts, total)| {
                    total - glyph_counts.get(&word.glyphs[overlap.cell]).copied().unwrap_or(0)
                })
                .sum();

            (ruled_out, word_id)
        }).collect();

        scored.sort_unstable();
        scored.into_iter().map(|(_, word_id)| word_id).collect()
    }
}

/// Search for a valid fill for the given crossword.
pub fn solve(crossword: &Crossword, config: &SolverConfig) -> Result<FillSuccess, FillFailure> {
    Solver::new(crossword, config.clone()).solve()
}
