//! Backtracking search over partial assignments, run after node and arc consistency have pruned
//! the domains. Variables are chosen by minimum remaining values (ties broken by degree) and
//! words are tried in least-constraining-value order.

use instant::{Duration, Instant};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::arc_consistency::{establish_arc_consistency, Arc};
use crate::domains::Domains;
use crate::grid_config::{GridConfig, Variable};
use crate::{VariableId, WordId};

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Number of partial assignments the search tried to extend.
    pub states: u64,

    /// Number of times every option for a variable failed and the search had to back up.
    pub backtracks: u64,

    /// Number of arc revisions performed by AC-3.
    pub revisions: usize,

    pub node_consistency_eliminations: usize,
    pub arc_consistency_eliminations: usize,
    pub duration: Duration,
}

/// A mapping from some subset of the variables to the words chosen for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    choices: BTreeMap<VariableId, WordId>,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment::default()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn get(&self, variable_id: VariableId) -> Option<WordId> {
        self.choices.get(&variable_id).copied()
    }

    pub fn contains(&self, variable_id: VariableId) -> bool {
        self.choices.contains_key(&variable_id)
    }

    /// Set a variable's word in place.
    pub fn insert(&mut self, variable_id: VariableId, word_id: WordId) {
        self.choices.insert(variable_id, word_id);
    }

    /// Return a copy of this assignment extended with one more choice, leaving `self` untouched.
    pub fn with(&self, variable_id: VariableId, word_id: WordId) -> Assignment {
        let mut extended = self.clone();
        extended.insert(variable_id, word_id);
        extended
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, WordId)> + '_ {
        self.choices.iter().map(|(&variable_id, &word_id)| (variable_id, word_id))
    }

    /// Resolve the ids in this assignment to variables and word strings.
    pub fn words<'a>(&self, config: &'a GridConfig) -> Vec<(Variable, &'a str)> {
        self.iter()
            .map(|(variable_id, word_id)| {
                (config.variables[variable_id], config.word_list.get(word_id).string.as_str())
            })
            .collect()
    }

    /// Look up the word assigned to a variable.
    pub fn word_for<'a>(&self, config: &'a GridConfig, variable: &Variable) -> Option<&'a str> {
        let variable_id = config.variable_id(variable)?;
        self.get(variable_id).map(|word_id| config.word_list.get(word_id).string.as_str())
    }
}

/// A struct representing the results of a fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

#[derive(Debug, thiserror::Error)]
pub enum FillFailure {
    /// Propagation wiped out a domain before search started.
    #[error("No solution: no words remain for {variable}")]
    EmptyDomain { variable: Variable },

    /// Search tried every branch without completing the grid.
    #[error("No solution: every branch of the search failed")]
    Exhausted,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// The live state of a single solve: the domains being pruned, plus statistics.
#[derive(Debug)]
pub struct Solver<'a> {
    config: &'a GridConfig,
    pub(crate) domains: Domains,
    statistics: Statistics,
    start: Instant,
    deadline: Option<Instant>,
}

impl<'a> Solver<'a> {
    pub fn new(config: &'a GridConfig) -> Solver<'a> {
        Solver {
            config,
            domains: Domains::new(config),
            statistics: Statistics::default(),
            start: Instant::now(),
            deadline: None,
        }
    }

    /// Give up with `FillFailure::Timeout` once the given amount of time has passed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Solver<'a> {
        self.deadline = timeout.map(|timeout| self.start + timeout);
        self
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn enforce_node_consistency(&mut self) {
        self.statistics.node_consistency_eliminations += self.domains.enforce_node_consistency(self.config);
    }

    /// Run AC-3 from the given arcs (or every arc). Returns the variable whose domain was emptied
    /// on failure.
    pub fn ac3(&mut self, arcs: Option<Vec<Arc>>) -> Result<(), VariableId> {
        match establish_arc_consistency(self.config, &mut self.domains, arcs) {
            Ok(success) => {
                self.statistics.revisions += success.revisions;
                self.statistics.arc_consistency_eliminations += success.eliminations;
                Ok(())
            }
            Err(failure) => {
                self.statistics.revisions += failure.revisions;
                Err(failure.variable_id)
            }
        }
    }

    pub fn assignment_complete(&self, assignment: &Assignment) -> bool {
        (0..self.config.variable_count()).all(|variable_id| assignment.contains(variable_id))
    }

    /// Does this (possibly partial) assignment avoid repeated words, wrong lengths and mismatched
    /// letters at every crossing where both sides are assigned?
    pub fn consistent(&self, assignment: &Assignment) -> bool {
        let mut seen: HashSet<WordId> = HashSet::with_capacity(assignment.len());
        if !assignment.iter().all(|(_, word_id)| seen.insert(word_id)) {
            return false;
        }

        for (variable_id, word_id) in assignment.iter() {
            if self.config.word_list.get(word_id).len() != self.config.variables[variable_id].length {
                return false;
            }
        }

        for (variable_id, word_id) in assignment.iter() {
            let word = self.config.word_list.get(word_id);

            for crossing in &self.config.crossings[variable_id] {
                if let Some(other_word_id) = assignment.get(crossing.other_variable_id) {
                    let other_word = self.config.word_list.get(other_word_id);
                    if word.chars[crossing.cell_idx] != other_word.chars[crossing.other_cell_idx] {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Return the words in `variable_id`'s domain, ordered by how many options they would rule
    /// out among its unassigned neighbors, fewest first. Ties keep word id order.
    pub fn order_domain_values(&self, variable_id: VariableId, assignment: &Assignment) -> Vec<WordId> {
        // For each unassigned crossing, how many of the neighbor's options place each letter in
        // the shared cell? A word rules out every option that doesn't share its letter.
        let crossing_counts: Vec<(usize, usize, HashMap<char, usize>)> = self.config.crossings
            [variable_id]
            .iter()
            .filter(|crossing| !assignment.contains(crossing.other_variable_id))
            .map(|crossing| {
                let other_domain = self.domains.get(crossing.other_variable_id);
                let mut counts: HashMap<char, usize> = HashMap::new();
                for other_word_id in other_domain {
                    let other_word = self.config.word_list.get(other_word_id);
                    if let Some(&letter) = other_word.chars.get(crossing.other_cell_idx) {
                        *counts.entry(letter).or_insert(0) += 1;
                    }
                }
                (crossing.cell_idx, other_domain.len(), counts)
            })
            .collect();

        let mut ordered: Vec<(WordId, usize)> = self
            .domains
            .get(variable_id)
            .iter()
            .map(|word_id| {
                let word = self.config.word_list.get(word_id);
                let eliminated: usize = crossing_counts
                    .iter()
                    .map(|(cell_idx, total, counts)| {
                        let matching = word.chars.get(*cell_idx).and_then(|letter| counts.get(letter));
                        total - matching.copied().unwrap_or(0)
                    })
                    .sum();
                (word_id, eliminated)
            })
            .collect();

        ordered.sort_by_key(|&(_, eliminated)| eliminated);
        ordered.into_iter().map(|(word_id, _)| word_id).collect()
    }

    /// Choose the unassigned variable with the fewest remaining options, preferring the one with
    /// the most neighbors on a tie and then the lowest id.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<VariableId> {
        (0..self.config.variable_count())
            .filter(|&variable_id| !assignment.contains(variable_id))
            .min_by_key(|&variable_id| {
                (self.domains.len(variable_id), Reverse(self.config.degree(variable_id)))
            })
    }

    /// Extend `assignment` to a complete, consistent assignment if possible. `Ok(None)` means
    /// every option on this branch failed.
    pub fn backtrack(&mut self, assignment: Assignment) -> Result<Option<Assignment>, FillFailure> {
        if self.assignment_complete(&assignment) {
            return Ok(Some(assignment));
        }

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(FillFailure::Timeout(self.start.elapsed()));
            }
        }

        let variable_id = match self.select_unassigned_variable(&assignment) {
            Some(variable_id) => variable_id,
            None => return Ok(Some(assignment)),
        };

        self.statistics.states += 1;
        log::trace!(
            "State {}: {} of {} assigned, filling {} ({} options)",
            self.statistics.states,
            assignment.len(),
            self.config.variable_count(),
            self.config.variables[variable_id],
            self.domains.len(variable_id),
        );

        for word_id in self.order_domain_values(variable_id, &assignment) {
            let candidate = assignment.with(variable_id, word_id);

            if self.consistent(&candidate) {
                if let Some(result) = self.backtrack(candidate)? {
                    return Ok(Some(result));
                }
            }
        }

        self.statistics.backtracks += 1;
        Ok(None)
    }

    /// Enforce node and arc consistency, then search for a complete assignment.
    pub fn solve(&mut self) -> Result<Assignment, FillFailure> {
        self.enforce_node_consistency();

        // AC-3 only notices a wipeout when it removes the last word itself, so check for domains
        // that node consistency already emptied.
        if let Some(variable_id) =
            (0..self.config.variable_count()).find(|&variable_id| self.domains.is_empty(variable_id))
        {
            return Err(FillFailure::EmptyDomain { variable: self.config.variables[variable_id] });
        }

        if let Err(variable_id) = self.ac3(None) {
            return Err(FillFailure::EmptyDomain { variable: self.config.variables[variable_id] });
        }

        let result = self.backtrack(Assignment::new());
        self.statistics.duration = self.start.elapsed();

        match result? {
            Some(assignment) => Ok(assignment),
            None => Err(FillFailure::Exhausted),
        }
    }
}

/// Search for a valid fill for the given grid, giving up once `timeout` has passed.
pub fn find_fill_with_timeout(
    config: &GridConfig,
    timeout: Option<Duration>,
) -> Result<FillSuccess, FillFailure> {
    let mut solver = Solver::new(config).with_timeout(timeout);
    let result = solver.solve();

    match &result {
        Ok(_) => log::info!(
            "Filled {} variables in {:?} ({} states, {} backtracks)",
            config.variable_count(),
            solver.statistics.duration,
            solver.statistics.states,
            solver.statistics.backtracks,
        ),
        Err(failure) => log::info!("Fill failed: {}", failure),
    }

    result.map(|assignment| FillSuccess { statistics: solver.statistics, assignment })
}

/// Search for a valid fill for the given grid.
pub fn find_fill(config: &GridConfig) -> Result<FillSuccess, FillFailure> {
    find_fill_with_timeout(config, None)
}
