use crate::assignment::Assignment;
use crate::structure::Crossword;

/// Character used for blocked cells by `render_grid`.
pub const BLOCK: char = '█';

/// Lay the letters of each bound word out on the grid. Cells no bound word passes through are
/// `None`.
pub fn letter_grid(crossword: &Crossword, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; crossword.width()]; crossword.height()];

    for (variable_id, word_id) in assignment.iter() {
        let variable = crossword.variable(variable_id);
        let word = crossword.word(word_id);

        for ((row, col), &glyph) in variable.cells().zip(&word.glyphs) {
            letters[row][col] = Some(glyph);
        }
    }

    letters
}

/// Turn the given crossword and assignment into a rendered string: blocks as `█`, unfilled open
/// cells as spaces.
pub fn render_grid(crossword: &Crossword, assignment: &Assignment) -> String {
    let letters = letter_grid(crossword, assignment);

    letters.iter().enumerate().map(|(row, cells)| {
        cells.iter().enumerate().map(|(col, letter)| {
            if crossword.is_open(row, col) {
                letter.unwrap_or(' ')
            } else {
                BLOCK
            }
        }).collect::<String>()
    }).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use crate::{letter_grid, render_grid, Assignment, Crossword};

    /// ___
    /// #_#
    /// #_#
    #[test]
    fn test_letter_grid_places_words() {
        let crossword = Crossword::from_template("___\n#_#\n#_#", ["car", "art"]);
        let mut assignment = Assignment::new(crossword.variable_count());
        assignment.bind(1, 1);

        let letters = letter_grid(&crossword, &assignment);

        assert_eq!(letters, vec![
            vec![None, Some('A'), None],
            vec![None, Some('R'), None],
            vec![None, Some('T'), None],
        ]);
    }

    #[test]
    fn test_render_grid() {
        let crossword = Crossword::from_template("___\n#_#\n#_#", ["car", "art"]);
        let mut assignment = Assignment::new(crossword.variable_count());

        assert_eq!(render_grid(&crossword, &assignment), "   \n█ █\n█ █");

        assignment.bind(0, 0);
        assignment.bind(1, 1);
        assert_eq!(render_grid(&crossword, &assignment), "CAR\n█R█\n█T█");
    }
}
