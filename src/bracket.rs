use crate::scoring::Score;
use std::collections::HashMap;
use std::fmt;

/// Index into the tournament roster. Competitors are keyed by id, never by
/// name, so two entrants named "alex" stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompetitorId(pub usize);

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One competitor's slot in the pairing table.
///
/// The opponent is a non-owning id lookup, rewritten each round; `None`
/// marks the unpaired trailing competitor of an odd bracket.
#[derive(Debug, Clone)]
pub struct BracketNode {
    pub opponent: Option<CompetitorId>,
    /// Tournament size class, `floor(log2(N))` of the initial roster.
    /// Computed once at build time; not a live round counter.
    pub round_tag: u32,
    pub results: Vec<Score>,
}

/// Pairing table for one round, keyed by competitor id.
pub type Bracket = HashMap<CompetitorId, BracketNode>;

/// Pairs competitors positionally: `(c[0],c[1]), (c[2],c[3]), ...`.
///
/// The opponent relation is symmetric wherever both sides exist. With an
/// odd roster the last competitor is left without an opponent; deciding
/// what happens to them is the orchestrator's bye policy, not ours.
pub fn build(competitors: &[CompetitorId]) -> Bracket {
    let round_tag = if competitors.is_empty() {
        0
    } else {
        (competitors.len() as u32).ilog2()
    };

    let mut table = Bracket::with_capacity(competitors.len());
    for pair in competitors.chunks(2) {
        let first = pair[0];
        let second = pair.get(1).copied();
        table.insert(
            first,
            BracketNode {
                opponent: second,
                round_tag,
                results: Vec::new(),
            },
        );
        if let Some(second) = second {
            table.insert(
                second,
                BracketNode {
                    opponent: Some(first),
                    round_tag,
                    results: Vec::new(),
                },
            );
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<CompetitorId> {
        (0..n).map(CompetitorId).collect()
    }

    #[test]
    fn four_competitors_pair_in_order() {
        let roster = ids(4);
        let table = build(&roster);

        assert_eq!(table.len(), 4);
        assert_eq!(table[&roster[0]].opponent, Some(roster[1]));
        assert_eq!(table[&roster[1]].opponent, Some(roster[0]));
        assert_eq!(table[&roster[2]].opponent, Some(roster[3]));
        assert_eq!(table[&roster[3]].opponent, Some(roster[2]));
    }

    #[test]
    fn round_tag_is_floor_log2_of_roster_size() {
        let table = build(&ids(4));
        assert!(table.values().all(|node| node.round_tag == 2));

        let table = build(&ids(8));
        assert!(table.values().all(|node| node.round_tag == 3));

        // non-power-of-two rosters round down
        let table = build(&ids(6));
        assert!(table.values().all(|node| node.round_tag == 2));
    }

    #[test]
    fn opponent_relation_is_symmetric() {
        let roster = ids(8);
        let table = build(&roster);

        for (id, node) in &table {
            if let Some(opponent) = node.opponent {
                assert_eq!(table[&opponent].opponent, Some(*id));
            }
        }
    }

    #[test]
    fn odd_roster_leaves_last_competitor_unpaired() {
        let roster = ids(5);
        let table = build(&roster);

        assert_eq!(table.len(), 5);
        assert_eq!(table[&roster[4]].opponent, None);
    }

    #[test]
    fn nodes_start_without_results() {
        let table = build(&ids(2));
        assert!(table.values().all(|node| node.results.is_empty()));
    }

    #[test]
    fn empty_roster_builds_empty_table() {
        let table = build(&[]);
        assert!(table.is_empty());
    }
}
