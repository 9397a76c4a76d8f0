use crossword_fill::{
    enforce_arc_consistency, is_arc_consistent, solve, Crossword, DomainStore, SolverConfig,
    WordId,
};
use proptest::prelude::*;

fn grid_strategy() -> impl Strategy<Value=Vec<Vec<bool>>> {
    (2usize..=4, 2usize..=4).prop_flat_map(|(height, width)| {
        prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.7), width), height)
    })
}

fn words_strategy() -> impl Strategy<Value=Vec<String>> {
    prop::collection::vec("[abc]{2,4}", 0..10)
}

/// Exhaustively look for a fill, checking every constraint directly against the overlap table.
fn brute_force_fill(crossword: &Crossword) -> Option<Vec<WordId>> {
    fn extend(crossword: &Crossword, chosen: &mut Vec<WordId>) -> bool {
        let variable_id = chosen.len();
        if variable_id == crossword.variable_count() {
            return true;
        }

        for word_id in 0..crossword.words().len() {
            let word = crossword.word(word_id);
            if word.len() != crossword.variable(variable_id).length || chosen.contains(&word_id) {
                continue;
            }

            let agrees = (0..variable_id).all(|other| match crossword.overlap(variable_id, other) {
                Some(overlap) => {
                    word.glyphs[overlap.cell] == crossword.word(chosen[other]).glyphs[overlap.other_cell]
                }
                None => true,
            });
            if !agrees {
                continue;
            }

            chosen.push(word_id);
            if extend(crossword, chosen) {
                return true;
            }
            chosen.pop();
        }

        false
    }

    let mut chosen = vec![];
    if extend(crossword, &mut chosen) {
        Some(chosen)
    } else {
        None
    }
}

/// Every pair of bound variables satisfies every constraint, checked without going through the
/// crate's own consistency code.
fn independently_consistent(crossword: &Crossword, words: &[WordId]) -> bool {
    (0..words.len()).all(|x| {
        let x_word = crossword.word(words[x]);
        x_word.len() == crossword.variable(x).length
            && (0..words.len()).filter(|&y| y != x).all(|y| {
                words[x] != words[y] && match crossword.overlap(x, y) {
                    Some(overlap) => {
                        x_word.glyphs[overlap.cell] == crossword.word(words[y]).glyphs[overlap.other_cell]
                    }
                    None => true,
                }
            })
    })
}

proptest! {
    #[test]
    fn ac3_only_shrinks_domains_and_leaves_them_consistent(
        grid in grid_strategy(),
        words in words_strategy(),
    ) {
        let crossword = Crossword::new(grid, words);
        let mut domains = DomainStore::node_consistent(&crossword);
        let before = domains.clone();

        let result = enforce_arc_consistency(&crossword, &mut domains, None);

        for variable_id in 0..crossword.variable_count() {
            prop_assert!(domains.domain(variable_id).is_subset(before.domain(variable_id)));
        }
        match result {
            Ok(_) => prop_assert!(is_arc_consistent(&crossword, &domains)),
            Err(failure) => prop_assert!(domains.is_empty(failure.variable)),
        }
    }

    #[test]
    fn search_is_sound_and_complete(
        grid in grid_strategy(),
        words in words_strategy(),
    ) {
        let crossword = Crossword::new(grid, words);
        let expected = brute_force_fill(&crossword);

        for config in [
            SolverConfig::default(),
            SolverConfig::default().with_propagation(false).with_duplicate_pruning(false),
        ] {
            match solve(&crossword, &config) {
                Ok(result) => {
                    prop_assert!(expected.is_some(), "solver found a fill brute force didn't");
                    prop_assert!(result.assignment.is_complete());

                    let words: Vec<WordId> = (0..crossword.variable_count())
                        .map(|variable_id| result.assignment.get(variable_id))
                        .collect::<Option<_>>()
                        .expect("complete assignment binds every variable");
                    prop_assert!(independently_consistent(&crossword, &words));
                }
                Err(_) => prop_assert!(expected.is_none(), "solver missed {:?}", expected),
            }
        }
    }

    #[test]
    fn repeated_solves_agree(
        grid in grid_strategy(),
        words in words_strategy(),
    ) {
        let crossword = Crossword::new(grid, words);

        let first = solve(&crossword, &SolverConfig::default()).ok().map(|result| result.assignment);
        let second = solve(&crossword, &SolverConfig::default()).ok().map(|result| result.assignment);

        prop_assert_eq!(first, second);
    }
}
