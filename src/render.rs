//! Text rendering of a (possibly partial) assignment.

use crate::backtracking_search::Assignment;
use crate::grid_config::GridConfig;

/// The character drawn for blocked cells.
pub const BLOCK_CHAR: char = '█';

/// Place each assigned word's letters into a grid the size of the puzzle. Cells not covered by
/// any assigned word are `None`.
pub fn letter_grid(config: &GridConfig, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; config.width]; config.height];

    for (variable_id, word_id) in assignment.iter() {
        let variable = &config.variables[variable_id];
        let word = config.word_list.get(word_id);

        for (&(row, col), &letter) in variable.cells().iter().zip(word.chars.iter()) {
            letters[row][col] = Some(letter);
        }
    }

    letters
}

/// Turn the given grid config and assignment into a rendered string: letters in filled cells,
/// spaces in open but unfilled cells, and blocks elsewhere.
pub fn render_grid(config: &GridConfig, assignment: &Assignment) -> String {
    let letters = letter_grid(config, assignment);

    config
        .structure
        .iter()
        .zip(letters)
        .map(|(structure_row, letter_row)| {
            structure_row
                .iter()
                .zip(letter_row)
                .map(|(&open, letter)| if open { letter.unwrap_or(' ') } else { BLOCK_CHAR })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use crate::backtracking_search::Assignment;
    use crate::grid_config::generate_grid_config_from_structure_string;
    use crate::render::{letter_grid, render_grid};
    use crate::word_list::WordList;

    #[test]
    fn test_render_partial_assignment() {
        let config = generate_grid_config_from_structure_string(
            "___\n_#_\n___",
            WordList::from_words(["top", "tan", "bat"]),
        )
        .unwrap();
        let top_across = config.variables.iter().position(|v| v.row == 0).unwrap();
        let top = config.word_list.find("top").unwrap();

        let assignment = Assignment::new().with(top_across, top);

        assert_eq!(render_grid(&config, &assignment), "TOP\n █ \n   ");
        assert_eq!(letter_grid(&config, &assignment)[0][2], Some('P'));
        assert_eq!(letter_grid(&config, &assignment)[2][0], None);
    }
}
