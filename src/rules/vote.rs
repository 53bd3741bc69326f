//! Day vote tallying.

use std::collections::BTreeMap;

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, VoteTarget};

/// How a vote ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteDecision {
    /// A single player held the most votes.
    Eliminated { player: PlayerId, votes: usize },
    /// Two or more targets shared the most votes.
    Tie { candidates: Vec<VoteTarget>, votes: usize },
    /// Abstention alone held the most votes.
    Abstained { votes: usize },
    /// Nobody voted.
    NoVotes,
}

/// Tally and decision for one day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// Votes per target, highest first (ties in target order).
    pub tally: Vec<(VoteTarget, usize)>,

    /// The decision.
    pub decision: VoteDecision,
}

impl VoteOutcome {
    /// The eliminated player, if any.
    #[must_use]
    pub fn eliminated(&self) -> Option<PlayerId> {
        match self.decision {
            VoteDecision::Eliminated { player, .. } => Some(player),
            VoteDecision::Tie { .. } | VoteDecision::Abstained { .. } | VoteDecision::NoVotes => {
                None
            }
        }
    }

    /// Votes counted for `target`.
    #[must_use]
    pub fn votes_for(&self, target: VoteTarget) -> usize {
        self.tally
            .iter()
            .find(|(t, _)| *t == target)
            .map_or(0, |(_, count)| *count)
    }
}

/// Turns ballots into a decision.
///
/// Only living voters count, and only living players can be eliminated.
/// A tie or an abstention majority is final; it never triggers a re-vote.
pub struct VoteResolver;

impl VoteResolver {
    /// Tally `ballots` (voter, target).
    ///
    /// ```
    /// use im::OrdSet;
    /// use werewolf_engine::core::{PlayerId, VoteTarget};
    /// use werewolf_engine::rules::VoteResolver;
    ///
    /// let alive: OrdSet<PlayerId> = (1..=4).map(PlayerId::new).collect();
    /// let a = VoteTarget::Player(PlayerId::new(1));
    /// let ballots = [(PlayerId::new(2), a), (PlayerId::new(3), a), (PlayerId::new(4), VoteTarget::Abstain)];
    ///
    /// let outcome = VoteResolver::resolve(ballots, &alive);
    /// assert_eq!(outcome.eliminated(), Some(PlayerId::new(1)));
    /// ```
    pub fn resolve(
        ballots: impl IntoIterator<Item = (PlayerId, VoteTarget)>,
        alive: &OrdSet<PlayerId>,
    ) -> VoteOutcome {
        let mut counts: BTreeMap<VoteTarget, usize> = BTreeMap::new();

        for (voter, target) in ballots {
            if !alive.contains(&voter) {
                continue;
            }
            if let VoteTarget::Player(player) = target {
                if !alive.contains(&player) {
                    continue;
                }
            }
            *counts.entry(target).or_insert(0) += 1;
        }

        let mut tally: Vec<(VoteTarget, usize)> = counts.into_iter().collect();
        tally.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then(ta.cmp(tb)));

        let decision = match tally.first() {
            None => VoteDecision::NoVotes,
            Some(&(_, max)) => {
                let leaders: Vec<VoteTarget> = tally
                    .iter()
                    .take_while(|(_, count)| *count == max)
                    .map(|(target, _)| *target)
                    .collect();

                match leaders.as_slice() {
                    [VoteTarget::Player(player)] => VoteDecision::Eliminated {
                        player: *player,
                        votes: max,
                    },
                    [VoteTarget::Abstain] => VoteDecision::Abstained { votes: max },
                    _ => VoteDecision::Tie {
                        candidates: leaders,
                        votes: max,
                    },
                }
            }
        };

        VoteOutcome { tally, decision }
    }
}
