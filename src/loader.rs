use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::structure::Crossword;

fn parse_row(line: &str) -> Vec<bool> {
    line.chars().map(|cell| cell == '_' || cell == '.').collect()
}

/// Grid rows from an inline template. Blank lines are skipped and each line is trimmed, so
/// templates can be indented inside string literals.
pub(crate) fn template_rows(text: &str) -> Vec<Vec<bool>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_row)
        .collect()
}

/// Parse a structure, one grid row per line, with `_` or `.` representing open cells and
/// anything else (spaces included) representing blocks. Every line is a row, so a blank line is a
/// fully blocked row and leading characters keep their columns. Fails if there are no cells.
pub fn parse_structure(text: &str) -> Result<Vec<Vec<bool>>, LoadError> {
    let rows: Vec<Vec<bool>> = text.lines()
        .map(|line| parse_row(line.trim_end_matches('\r')))
        .collect();

    if rows.iter().all(Vec::is_empty) {
        return Err(LoadError::EmptyStructure { path: None });
    }
    Ok(rows)
}

/// Parse a word list with one word per line. Blank lines are skipped.
pub fn parse_words(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

/// Read a structure file and a word file and build the crossword they describe.
pub fn load_crossword(structure_path: &Path, words_path: &Path) -> Result<Crossword, LoadError> {
    let structure = parse_structure(&read(structure_path)?).map_err(|error| match error {
        LoadError::EmptyStructure { .. } => {
            LoadError::EmptyStructure { path: Some(structure_path.to_path_buf()) }
        }
        other => other,
    })?;
    let words = parse_words(&read(words_path)?);

    Ok(Crossword::new(structure, words))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::{load_crossword, parse_structure, parse_words, Crossword, Direction, LoadError, Variable};

    #[test]
    fn test_parse_structure() {
        let rows = parse_structure("#_.#\r\n##_\r\n").expect("structure has rows");

        assert_eq!(rows, vec![
            vec![false, true, true, false],
            vec![false, false, true],
        ]);
    }

    #[test]
    fn test_parse_structure_keeps_columns_and_blank_rows() {
        let rows = parse_structure(" __\n\n___").expect("structure has rows");

        assert_eq!(rows, vec![
            vec![false, true, true],
            vec![],
            vec![true, true, true],
        ]);

        let crossword = Crossword::new(rows, ["ab", "abc"]);
        assert_eq!(crossword.height(), 3);
        assert_eq!(crossword.width(), 3);
        assert!(!crossword.is_open(0, 0));
        assert!(!crossword.is_open(1, 1));
        assert_eq!(crossword.variable(0), &Variable::new(0, 1, Direction::Across, 2));
    }

    #[test]
    fn test_parse_empty_structure_fails() {
        for text in ["", "\n\n"] {
            let error = parse_structure(text).expect_err("no cells");

            assert!(matches!(error, LoadError::EmptyStructure { path: None }));
        }
    }

    #[test]
    fn test_parse_words() {
        assert_eq!(parse_words("one\n  two \n\nthree\r\n"), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let error = load_crossword(
            Path::new("does/not/exist/structure.txt"),
            Path::new("does/not/exist/words.txt"),
        ).expect_err("file is missing");

        assert!(matches!(error, LoadError::Io { .. }));
        assert!(error.to_string().contains("does/not/exist/structure.txt"));
    }

    #[test]
    fn test_load_sample_data() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let crossword = load_crossword(&data.join("structure0.txt"), &data.join("words0.txt"))
            .expect("sample data loads");

        assert_eq!(crossword.variable_count(), 4);
        assert_eq!(crossword.words().len(), 10);
    }
}
