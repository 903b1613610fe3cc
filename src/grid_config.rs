//! Static geometry of a puzzle: the variables (word slots), the overlaps between crossing
//! variables, and the vocabulary that seeds their domains. Nothing here changes during filling.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::fs;

use crate::errors::GridError;
use crate::word_list::WordList;
use crate::{GridCoord, VariableId, MAX_SLOT_LENGTH};

/// Direction that a variable is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

/// A word slot in the grid. Two variables are the same variable iff their position, direction
/// and length all match, so this can be used directly as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Variable {
        Variable { row, col, direction, length }
    }

    /// Generate the coords for each cell of this variable, in word order.
    pub fn cells(&self) -> SmallVec<[GridCoord; MAX_SLOT_LENGTH]> {
        (0..self.length)
            .map(|cell_idx| match self.direction {
                Direction::Across => (self.row, self.col + cell_idx),
                Direction::Down => (self.row + cell_idx, self.col),
            })
            .collect()
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let direction = match self.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        write!(f, "({}, {}) {} : {}", self.row, self.col, direction, self.length)
    }
}

/// For an ordered pair of variables (x, y), character `i` of x's word must equal character `j`
/// of y's word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overlap {
    pub i: usize,
    pub j: usize,
}

/// A crossing between one variable and another, referencing the other variable's id and the
/// location of the shared cell within each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_variable_id: VariableId,
    pub cell_idx: usize,
    pub other_cell_idx: usize,
}

/// A struct representing the aspects of a puzzle that are static during filling.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,

    /// `structure[row][col]` is true for open cells.
    pub structure: Vec<Vec<bool>>,

    /// All variables, in their natural order. A variable's index here is its `VariableId`.
    pub variables: Vec<Variable>,

    /// Crossings for each variable, indexed by `VariableId` and ordered by cell index.
    pub crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,

    pub word_list: WordList,
}

impl GridConfig {
    /// Build a config from an explicit list of variables. The grid structure is the union of
    /// the variables' cells.
    pub fn from_variables(
        variables: Vec<Variable>,
        word_list: WordList,
    ) -> Result<GridConfig, GridError> {
        let cells: Vec<GridCoord> = variables.iter().flat_map(|variable| variable.cells()).collect();
        let height = cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(0);
        let width = cells.iter().map(|&(_, col)| col + 1).max().unwrap_or(0);

        let mut structure = vec![vec![false; width]; height];
        for (row, col) in cells {
            structure[row][col] = true;
        }

        GridConfig::build(width, height, structure, variables, word_list)
    }

    fn build(
        width: usize,
        height: usize,
        structure: Vec<Vec<bool>>,
        mut variables: Vec<Variable>,
        word_list: WordList,
    ) -> Result<GridConfig, GridError> {
        variables.sort();

        for pair in variables.windows(2) {
            if pair[0] == pair[1] {
                return Err(GridError::DuplicateVariable(pair[0]));
            }
        }
        if let Some(variable) = variables.iter().find(|variable| variable.length == 0) {
            return Err(GridError::ZeroLengthVariable { row: variable.row, col: variable.col });
        }

        // Build a map from cell location to the variables covering it, which we can then use to
        // calculate crossings.
        let mut variables_by_cell: HashMap<GridCoord, Vec<(VariableId, usize)>> = HashMap::new();
        for (variable_id, variable) in variables.iter().enumerate() {
            for (cell_idx, cell) in variable.cells().into_iter().enumerate() {
                variables_by_cell.entry(cell).or_default().push((variable_id, cell_idx));
            }
        }

        let mut crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>> =
            Vec::with_capacity(variables.len());

        for (variable_id, variable) in variables.iter().enumerate() {
            let mut variable_crossings: SmallVec<[Crossing; MAX_SLOT_LENGTH]> = SmallVec::new();

            for (cell_idx, cell) in variable.cells().into_iter().enumerate() {
                for &(other_variable_id, other_cell_idx) in &variables_by_cell[&cell] {
                    if other_variable_id == variable_id {
                        continue;
                    }
                    if variable_crossings.iter().any(|c| c.other_variable_id == other_variable_id) {
                        return Err(GridError::MultipleSharedCells(
                            *variable,
                            variables[other_variable_id],
                        ));
                    }
                    variable_crossings.push(Crossing { other_variable_id, cell_idx, other_cell_idx });
                }
            }

            crossings.push(variable_crossings);
        }

        log::debug!(
            "Built grid config: {}x{}, {} variables, {} arcs, {} words",
            width,
            height,
            variables.len(),
            crossings.iter().map(|c| c.len()).sum::<usize>(),
            word_list.len(),
        );

        Ok(GridConfig { width, height, structure, variables, crossings, word_list })
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Find the id of a variable by its identity.
    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.variables.binary_search(variable).ok()
    }

    /// The variables sharing a cell with the given one.
    pub fn neighbors(&self, variable_id: VariableId) -> impl Iterator<Item = VariableId> + '_ {
        self.crossings[variable_id].iter().map(|crossing| crossing.other_variable_id)
    }

    /// Number of neighbors, used as the degree heuristic.
    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.crossings[variable_id].len()
    }

    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<Overlap> {
        self.crossings[x]
            .iter()
            .find(|crossing| crossing.other_variable_id == y)
            .map(|crossing| Overlap { i: crossing.cell_idx, j: crossing.other_cell_idx })
    }

    /// Every ordered pair of variables with a defined overlap.
    pub fn arcs(&self) -> Vec<(VariableId, VariableId)> {
        self.crossings
            .iter()
            .enumerate()
            .flat_map(|(x, crossings)| crossings.iter().map(move |c| (x, c.other_variable_id)))
            .collect()
    }
}

/// Generate a GridConfig from a structure string, with `_` representing open cells and anything
/// else representing blocks. Short lines are padded with blocks.
pub fn generate_grid_config_from_structure_string(
    structure: &str,
    word_list: WordList,
) -> Result<GridConfig, GridError> {
    let mut lines: Vec<&str> = structure.lines().collect();
    while lines.last().map_or(false, |line| line.trim().is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return Err(GridError::EmptyStructure);
    }

    let height = lines.len();
    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

    let structure: Vec<Vec<bool>> = lines
        .iter()
        .map(|line| {
            let mut row: Vec<bool> = line.chars().map(|c| c == '_').collect();
            row.resize(width, false);
            row
        })
        .collect();

    let is_open = |row: usize, col: usize| structure[row][col];
    let mut variables: Vec<Variable> = vec![];

    for row in 0..height {
        for col in 0..width {
            if !is_open(row, col) {
                continue;
            }

            if col == 0 || !is_open(row, col - 1) {
                let length = (col..width).take_while(|&c| is_open(row, c)).count();
                if length > 1 {
                    variables.push(Variable::new(row, col, Direction::Across, length));
                }
            }

            if row == 0 || !is_open(row - 1, col) {
                let length = (row..height).take_while(|&r| is_open(r, col)).count();
                if length > 1 {
                    variables.push(Variable::new(row, col, Direction::Down, length));
                }
            }
        }
    }

    GridConfig::build(width, height, structure, variables, word_list)
}

/// Load a structure file and a words file from disk and build a GridConfig from them.
pub fn load_grid_config(structure_path: &str, words_path: &str) -> Result<GridConfig, GridError> {
    let structure =
        fs::read_to_string(structure_path).map_err(|e| GridError::io(structure_path, e))?;
    let word_list = WordList::load_from_path(words_path)?;

    generate_grid_config_from_structure_string(&structure, word_list)
}
