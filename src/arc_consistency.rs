//! An implementation of the AC-3 algorithm. A pair of variables (x, y) with an overlap is
//! arc-consistent when every word left in x's domain has at least one word in y's domain with the
//! same letter in the shared cell. We keep revising arcs until no more eliminations are possible,
//! or until some domain is wiped out.

use std::collections::{HashSet, VecDeque};

use crate::domains::Domains;
use crate::grid_config::GridConfig;
use crate::VariableId;

/// An ordered pair of variables to make consistent, with the first being the one revised.
pub type Arc = (VariableId, VariableId);

/// Results from a successful call to `establish_arc_consistency`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many times `revise` was called.
    pub revisions: usize,

    /// How many words were removed across all domains.
    pub eliminations: usize,
}

/// Returned when revising an arc leaves a variable with no options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub variable_id: VariableId,
    pub revisions: usize,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Make the domain of `x` consistent with the domain of `y`, removing any word of `x` that has no
/// supporting word in `y`. Returns true if anything was removed. Does nothing if the variables
/// don't overlap.
pub fn revise(config: &GridConfig, domains: &mut Domains, x: VariableId, y: VariableId) -> bool {
    revise_counting(config, domains, x, y) > 0
}

fn revise_counting(config: &GridConfig, domains: &mut Domains, x: VariableId, y: VariableId) -> usize {
    let Some(overlap) = config.overlap(x, y) else {
        return 0;
    };

    // The letters y can still place in the shared cell. This is read once up front; only x's
    // domain changes below.
    let supported_chars: HashSet<char> = domains
        .get(y)
        .iter()
        .filter_map(|word_id| config.word_list.get(word_id).chars.get(overlap.j).copied())
        .collect();

    let snapshot = domains.get(x).clone();
    let mut removed = 0;

    for word_id in &snapshot {
        let letter = config.word_list.get(word_id).chars.get(overlap.i);
        if !letter.map_or(false, |letter| supported_chars.contains(letter)) {
            domains.remove(x, word_id);
            removed += 1;
        }
    }

    removed
}

/// Establish arc consistency starting from the given arcs, or from every arc in the grid if
/// `arcs` is `None`. Arcs are processed first-in-first-out.
pub fn establish_arc_consistency(
    config: &GridConfig,
    domains: &mut Domains,
    arcs: Option<Vec<Arc>>,
) -> ArcConsistencyResult {
    let mut queue: VecDeque<Arc> = VecDeque::from(arcs.unwrap_or_else(|| config.arcs()));
    let mut result = ArcConsistencySuccess::default();

    while let Some((x, y)) = queue.pop_front() {
        result.revisions += 1;

        let removed = revise_counting(config, domains, x, y);
        if removed == 0 {
            continue;
        }
        result.eliminations += removed;

        if domains.is_empty(x) {
            log::debug!(
                "Arc consistency emptied the domain of {} after {} revisions",
                config.variables[x],
                result.revisions,
            );
            return Err(ArcConsistencyFailure { variable_id: x, revisions: result.revisions });
        }

        // Shrinking x's domain may have removed the only support for words in x's other
        // neighbors, so they need to be looked at again.
        for z in config.neighbors(x) {
            if z != y {
                queue.push_back((z, x));
            }
        }
    }

    log::debug!(
        "Arc consistency established: {} revisions, {} eliminations",
        result.revisions,
        result.eliminations,
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use crate::arc_consistency::{establish_arc_consistency, revise};
    use crate::domains::Domains;
    use crate::grid_config::{generate_grid_config_from_structure_string, GridConfig};
    use crate::word_list::WordList;
    use crate::Direction::{Across, Down};
    use crate::Variable;

    fn words_in(config: &GridConfig, domains: &Domains, variable_id: usize) -> Vec<String> {
        domains.get(variable_id).iter().map(|id| config.word_list.get(id).string.clone()).collect()
    }

    /// Every word of every variable has a supporting word in each neighbor.
    fn assert_arc_consistent(config: &GridConfig, domains: &Domains) {
        for (x, y) in config.arcs() {
            let overlap = config.overlap(x, y).unwrap();
            for word_id in domains.get(x) {
                let letter = config.word_list.get(word_id).chars[overlap.i];
                assert!(
                    domains.get(y).iter().any(|other| config.word_list.get(other).chars[overlap.j] == letter),
                    "{} has no support in {}",
                    config.word_list.get(word_id).string,
                    config.variables[y],
                );
            }
        }
    }

    fn crossing_pair(words: &[&str]) -> GridConfig {
        GridConfig::from_variables(
            vec![Variable::new(1, 0, Across, 3), Variable::new(0, 1, Down, 3)],
            WordList::from_words(words),
        )
        .unwrap()
    }

    #[test]
    fn test_revise_removes_unsupported_words() {
        // The down word (id 0) is limited to words with an O in the middle.
        let config = crossing_pair(&["cat", "car", "dog", "bob"]);
        let mut domains = Domains::new(&config);
        domains.enforce_node_consistency(&config);
        let across = 1;
        let down = 0;
        let cat = config.word_list.find("cat").unwrap();
        let car = config.word_list.find("car").unwrap();
        domains.remove(down, cat);
        domains.remove(down, car);

        assert!(revise(&config, &mut domains, across, down));
        assert_eq!(words_in(&config, &domains, across), vec!["BOB", "DOG"]);

        // The down domain is untouched, and a second pass finds nothing to do.
        assert_eq!(words_in(&config, &domains, down), vec!["BOB", "DOG"]);
        assert!(!revise(&config, &mut domains, across, down));
    }

    #[test]
    fn test_revise_without_overlap_is_a_no_op() {
        let config = generate_grid_config_from_structure_string(
            "___\n###\n___",
            WordList::from_words(["abc", "xyz"]),
        )
        .unwrap();
        let mut domains = Domains::new(&config);
        let before = domains.clone();

        assert!(!revise(&config, &mut domains, 0, 1));
        assert_eq!(domains, before);
    }

    #[test]
    fn test_ac3_reaches_consistent_fixed_point() {
        let config = generate_grid_config_from_structure_string(
            "#___#\n#_##_\n#_##_\n#_##_\n#____\n",
            WordList::from_words([
                "six", "one", "two", "ten", "seven", "eight", "three", "nine", "five", "four",
            ]),
        )
        .unwrap();
        let mut domains = Domains::new(&config);
        domains.enforce_node_consistency(&config);
        let before = domains.clone();

        let result = establish_arc_consistency(&config, &mut domains, None).unwrap();

        assert_arc_consistent(&config, &domains);
        assert!(domains.is_subset(&before));
        assert_eq!(before.total_len() - domains.total_len(), result.eliminations);
        assert!(result.revisions >= config.arcs().len());
    }

    #[test]
    fn test_ac3_detects_wipeout() {
        // No 3-letter word shares a middle letter with another.
        let config = crossing_pair(&["cat", "dog"]);
        let mut domains = Domains::new(&config);
        domains.enforce_node_consistency(&config);
        domains.remove(0, config.word_list.find("cat").unwrap());
        domains.remove(1, config.word_list.find("dog").unwrap());

        let failure = establish_arc_consistency(&config, &mut domains, None).unwrap_err();

        assert!(domains.is_empty(failure.variable_id));
    }

    #[test]
    fn test_ac3_with_explicit_arcs() {
        let config = crossing_pair(&["cat", "dog", "bob"]);
        let mut domains = Domains::new(&config);
        domains.enforce_node_consistency(&config);
        domains.remove(0, config.word_list.find("cat").unwrap());

        // Only revising the down word against the across word changes nothing, since every down
        // option still has support.
        let result = establish_arc_consistency(&config, &mut domains, Some(vec![(0, 1)])).unwrap();
        assert_eq!(result.eliminations, 0);
        assert_eq!(words_in(&config, &domains, 1), vec!["BOB", "CAT", "DOG"]);

        let result = establish_arc_consistency(&config, &mut domains, Some(vec![(1, 0)])).unwrap();
        assert_eq!(result.eliminations, 1);
        assert_eq!(words_in(&config, &domains, 1), vec!["BOB", "DOG"]);
    }
}
