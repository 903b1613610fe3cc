//! The domain store: for each variable, the set of words still considered possible for it.
//! Domains start out as the full vocabulary and only ever shrink.

use bit_set::BitSet;

use crate::grid_config::GridConfig;
use crate::{VariableId, WordId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    /// Bit sets of `WordId`s, indexed by `VariableId`.
    sets: Vec<BitSet>,
}

impl Domains {
    /// Seed every variable's domain with the whole vocabulary.
    pub fn new(config: &GridConfig) -> Domains {
        let word_count = config.word_list.len();
        let full: BitSet = (0..word_count).collect();

        Domains { sets: config.variables.iter().map(|_| full.clone()).collect() }
    }

    pub fn get(&self, variable_id: VariableId) -> &BitSet {
        &self.sets[variable_id]
    }

    pub fn len(&self, variable_id: VariableId) -> usize {
        self.sets[variable_id].len()
    }

    pub fn is_empty(&self, variable_id: VariableId) -> bool {
        self.sets[variable_id].is_empty()
    }

    pub fn contains(&self, variable_id: VariableId, word_id: WordId) -> bool {
        self.sets[variable_id].contains(word_id)
    }

    /// Remove a word from a variable's domain, returning whether it was present.
    pub(crate) fn remove(&mut self, variable_id: VariableId, word_id: WordId) -> bool {
        self.sets[variable_id].remove(word_id)
    }

    /// Total number of candidate words across all domains.
    pub fn total_len(&self) -> usize {
        self.sets.iter().map(|set| set.len()).sum()
    }

    /// Is every domain a subset of the corresponding domain in `other`?
    pub fn is_subset(&self, other: &Domains) -> bool {
        self.sets.len() == other.sets.len()
            && self.sets.iter().zip(&other.sets).all(|(a, b)| a.is_subset(b))
    }

    /// Remove every word whose length doesn't match its variable's length. Returns the number of
    /// words removed.
    pub fn enforce_node_consistency(&mut self, config: &GridConfig) -> usize {
        let mut removed = 0;

        for (variable_id, variable) in config.variables.iter().enumerate() {
            let snapshot = self.sets[variable_id].clone();

            for word_id in &snapshot {
                if config.word_list.get(word_id).len() != variable.length {
                    self.sets[variable_id].remove(word_id);
                    removed += 1;
                }
            }
        }

        log::debug!("Node consistency removed {} candidates", removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::Domains;
    use crate::grid_config::generate_grid_config_from_structure_string;
    use crate::word_list::WordList;

    fn config() -> crate::GridConfig {
        generate_grid_config_from_structure_string(
            "____\n_###\n_###",
            WordList::from_words(["tree", "word", "cat", "dog", "ab", "abcde"]),
        )
        .unwrap()
    }

    #[test]
    fn test_domains_start_full() {
        let config = config();
        let domains = Domains::new(&config);

        assert_eq!(domains.len(0), 6);
        assert_eq!(domains.len(1), 6);
    }

    #[test]
    fn test_node_consistency_filters_by_length() {
        let config = config();
        let mut domains = Domains::new(&config);

        let removed = domains.enforce_node_consistency(&config);

        // Variable 0 is the 4-letter across, variable 1 the 3-letter down.
        let across: Vec<&str> =
            domains.get(0).iter().map(|id| config.word_list.get(id).string.as_str()).collect();
        let down: Vec<&str> =
            domains.get(1).iter().map(|id| config.word_list.get(id).string.as_str()).collect();

        assert_eq!(across, vec!["TREE", "WORD"]);
        assert_eq!(down, vec!["CAT", "DOG"]);
        assert_eq!(removed, 8);
    }

    #[test]
    fn test_node_consistency_is_idempotent() {
        let config = config();
        let mut domains = Domains::new(&config);
        let original = domains.clone();

        domains.enforce_node_consistency(&config);
        let once = domains.clone();
        let removed = domains.enforce_node_consistency(&config);

        assert_eq!(removed, 0);
        assert_eq!(domains, once);
        assert!(once.is_subset(&original));
    }

    #[test]
    fn test_node_consistency_can_empty_a_domain() {
        let config = generate_grid_config_from_structure_string(
            "_____",
            WordList::from_words(["tree", "cat"]),
        )
        .unwrap();
        let mut domains = Domains::new(&config);

        domains.enforce_node_consistency(&config);

        assert!(domains.is_empty(0));
        assert_eq!(domains.total_len(), 0);
    }
}
