//! Property tests for the pure rule resolvers.
//!
//! These use proptest to check that the rules hold for arbitrary rosters,
//! action orders, and ballots:
//! - Role dealing always matches the seat table
//! - Night deaths follow the guard/antidote/poison rules
//! - Votes eliminate only a strict single leader
//! - Win conditions match the living headcount

use im::OrdSet;
use proptest::prelude::*;
use werewolf_engine::core::{
    ActionRecord, GameRng, NightAction, PlayerId, PotionStock, Role, Submission, Team, VoteTarget,
    WolfConsensus,
};
use werewolf_engine::error::EngineError;
use werewolf_engine::rules::{
    Headcount, NightInput, NightOutcome, NightResolver, RoleAssigner, RoleMap, VoteDecision,
    VoteResolver, WinConditionEvaluator,
};

fn p(id: u64) -> PlayerId {
    PlayerId::new(id)
}

fn roster(n: usize) -> Vec<PlayerId> {
    (1..=n as u64).map(p).collect()
}

// Strategy for roster sizes at or above the minimum
fn roster_size_strategy() -> impl Strategy<Value = usize> {
    6usize..=40
}

// Strategy for ballots over a roster of 8: target 0 means abstain
fn ballots_strategy() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((1u64..=8, 0u64..=8), 0..16)
}

// =============================================================================
// Role dealing
// =============================================================================

/// Seat counts follow the table for every roster size.
#[test]
fn prop_role_counts_match_table() {
    proptest!(|(n in roster_size_strategy(), seed in any::<u64>())| {
        let players = roster(n);
        let roles = RoleAssigner::assign(&players, &mut GameRng::new(seed)).unwrap();
        let counts = roles.counts();

        let expected = match n {
            6 | 7 => (1, 1, 0, 0, 0),
            8 | 9 => (2, 1, 1, 0, 0),
            10 | 11 => (2, 1, 1, 1, 0),
            _ => (2, 1, 1, 1, 1),
        };
        prop_assert_eq!(
            (counts.werewolf, counts.seer, counts.witch, counts.hunter, counts.guard),
            expected
        );
        prop_assert_eq!(counts.total(), n);
        prop_assert_eq!(Some(counts), RoleAssigner::distribution(n));
    });
}

/// Every player gets exactly one role.
#[test]
fn prop_every_player_dealt_once() {
    proptest!(|(n in roster_size_strategy(), seed in any::<u64>())| {
        let players = roster(n);
        let roles = RoleAssigner::assign(&players, &mut GameRng::new(seed)).unwrap();

        prop_assert_eq!(roles.len(), n);
        for player in &players {
            prop_assert!(roles.get(*player).is_some());
        }
    });
}

/// Rosters below six are refused.
#[test]
fn test_small_rosters_refused() {
    for n in 0..6 {
        let result = RoleAssigner::assign(&roster(n), &mut GameRng::new(1));
        assert!(matches!(
            result,
            Err(EngineError::NotEnoughPlayers { required: 6, .. })
        ));
    }
}

/// Over many seeds, every seat ends up with every role at least once.
#[test]
fn test_dealing_is_shuffled() {
    let players = roster(12);
    for player in &players {
        let mut seen: Vec<Role> = Vec::new();
        for seed in 0..400 {
            let roles = RoleAssigner::assign(&players, &mut GameRng::new(seed)).unwrap();
            let role = roles.get(*player).unwrap();
            if !seen.contains(&role) {
                seen.push(role);
            }
        }
        for role in Role::ALL {
            assert!(seen.contains(&role), "{player} never dealt {role}");
        }
    }
}

// =============================================================================
// Night resolution
// =============================================================================

/// 8 seats: 1,2 werewolves; 3 seer; 4 witch; 5 guard; 6,7 villagers; 8 hunter.
fn eight_roles() -> RoleMap {
    RoleMap::from_pairs([
        (p(1), Role::Werewolf),
        (p(2), Role::Werewolf),
        (p(3), Role::Seer),
        (p(4), Role::Witch),
        (p(5), Role::Guard),
        (p(6), Role::Villager),
        (p(7), Role::Villager),
        (p(8), Role::Hunter),
    ])
}

fn night(actions: &[(u64, NightAction)]) -> NightOutcome {
    let roles = eight_roles();
    let alive: OrdSet<PlayerId> = (1..=8).map(p).collect();
    let records: Vec<ActionRecord> = actions
        .iter()
        .enumerate()
        .map(|(seq, (player, action))| {
            ActionRecord::new(p(*player), Submission::Night(*action), 1, seq as u64)
        })
        .collect();

    NightResolver::resolve(&NightInput {
        roles: &roles,
        alive: &alive,
        actions: &records,
        consensus: WolfConsensus::Majority,
        potions: PotionStock::default(),
    })
}

/// Guard covering the wolves' target saves them.
#[test]
fn test_guard_blocks_attack() {
    let outcome = night(&[
        (5, NightAction::Protect(p(6))),
        (1, NightAction::Eliminate(p(6))),
    ]);
    assert!(!outcome.killed.contains(&p(6)));
}

/// Antidote on an unguarded target saves them.
#[test]
fn test_antidote_blocks_attack() {
    let outcome = night(&[
        (1, NightAction::Eliminate(p(6))),
        (4, NightAction::Save { uses_antidote: true }),
    ]);
    assert!(outcome.killed.is_empty());
    assert!(outcome.was_saved);
}

/// Poison kills whatever the guard did elsewhere.
#[test]
fn test_poison_independent_of_guard() {
    let outcome = night(&[
        (5, NightAction::Protect(p(6))),
        (1, NightAction::Eliminate(p(6))),
        (4, NightAction::Poison(p(7))),
    ]);
    assert_eq!(outcome.killed.as_slice(), &[p(7)]);
}

/// Villagers and hunters have nothing to resolve.
#[test]
fn test_non_acting_roles_ignored() {
    let outcome = night(&[
        (6, NightAction::Eliminate(p(3))),
        (8, NightAction::Eliminate(p(3))),
    ]);
    assert!(outcome.is_peaceful());
    assert_eq!(outcome.attacked, None);
}

/// Whatever the action mix, deaths are alive players, never repeated,
/// and a guarded attack target survives unless poisoned.
#[test]
fn prop_night_deaths_are_consistent() {
    let action_strategy = (1u64..=8, 0u8..5, 1u64..=8).prop_map(|(actor, kind, target)| {
        let action = match kind {
            0 => NightAction::Protect(p(target)),
            1 => NightAction::Eliminate(p(target)),
            2 => NightAction::Inspect(p(target)),
            3 => NightAction::Save { uses_antidote: true },
            _ => NightAction::Poison(p(target)),
        };
        (actor, action)
    });

    proptest!(|(actions in prop::collection::vec(action_strategy, 0..12))| {
        let outcome = night(&actions);

        let mut seen = OrdSet::new();
        for player in &outcome.killed {
            prop_assert!(seen.insert(*player).is_none());
        }
        prop_assert!(outcome.killed.len() <= 2);

        if let Some(target) = outcome.attacked {
            let shielded = outcome.protected == Some(target) || outcome.was_saved;
            if shielded && outcome.poisoned != Some(target) {
                prop_assert!(!outcome.killed.contains(&target));
            }
        }
        if let Some(target) = outcome.poisoned {
            prop_assert!(outcome.killed.contains(&target));
        }
    });
}

// =============================================================================
// Voting
// =============================================================================

fn ballots(votes: &[(u64, VoteTarget)]) -> Vec<(PlayerId, VoteTarget)> {
    votes.iter().map(|(voter, target)| (p(*voter), *target)).collect()
}

/// {A:3, B:3} eliminates nobody.
#[test]
fn test_three_three_tie() {
    let alive: OrdSet<PlayerId> = (1..=8).map(p).collect();
    let a = VoteTarget::Player(p(7));
    let b = VoteTarget::Player(p(8));
    let votes = ballots(&[(1, a), (2, a), (3, a), (4, b), (5, b), (6, b)]);

    let outcome = VoteResolver::resolve(votes, &alive);
    assert_eq!(outcome.eliminated(), None);
    assert_eq!(outcome.votes_for(a), 3);
}

/// {A:4, B:2} eliminates A.
#[test]
fn test_four_two_majority() {
    let alive: OrdSet<PlayerId> = (1..=8).map(p).collect();
    let a = VoteTarget::Player(p(7));
    let b = VoteTarget::Player(p(8));
    let votes = ballots(&[(1, a), (2, a), (3, a), (4, a), (5, b), (6, b)]);

    let outcome = VoteResolver::resolve(votes, &alive);
    assert_eq!(outcome.decision, VoteDecision::Eliminated { player: p(7), votes: 4 });
}

/// All-abstain eliminates nobody.
#[test]
fn test_all_abstain() {
    let alive: OrdSet<PlayerId> = (1..=6).map(p).collect();
    let votes = ballots(&[(1, VoteTarget::Abstain), (2, VoteTarget::Abstain)]);

    let outcome = VoteResolver::resolve(votes, &alive);
    assert_eq!(outcome.decision, VoteDecision::Abstained { votes: 2 });
}

/// An elimination always goes to a living player holding a strict maximum.
#[test]
fn prop_elimination_is_strict_leader() {
    proptest!(|(raw in ballots_strategy(), dead in prop::collection::btree_set(1u64..=8, 0..3))| {
        let alive: OrdSet<PlayerId> = (1..=8).filter(|id| !dead.contains(id)).map(p).collect();
        let votes: Vec<(PlayerId, VoteTarget)> = raw
            .iter()
            .map(|(voter, target)| {
                let target = if *target == 0 {
                    VoteTarget::Abstain
                } else {
                    VoteTarget::Player(p(*target))
                };
                (p(*voter), target)
            })
            .collect();

        let outcome = VoteResolver::resolve(votes, &alive);
        let counted: usize = outcome.tally.iter().map(|(_, count)| count).sum();
        prop_assert!(counted <= raw.len());

        if let Some(player) = outcome.eliminated() {
            prop_assert!(alive.contains(&player));
            let votes = outcome.votes_for(VoteTarget::Player(player));
            for (target, count) in &outcome.tally {
                if *target != VoteTarget::Player(player) {
                    prop_assert!(*count < votes);
                }
            }
        }
    });
}

// =============================================================================
// Win conditions
// =============================================================================

/// Headcount thresholds.
#[test]
fn test_win_thresholds() {
    assert_eq!(
        WinConditionEvaluator::decide(Headcount { werewolves: 0, others: 4 }),
        Some(Team::Villagers)
    );
    assert_eq!(
        WinConditionEvaluator::decide(Headcount { werewolves: 2, others: 1 }),
        Some(Team::Werewolves)
    );
    assert_eq!(WinConditionEvaluator::decide(Headcount { werewolves: 1, others: 3 }), None);
    assert_eq!(
        WinConditionEvaluator::decide(Headcount { werewolves: 0, others: 0 }),
        Some(Team::Werewolves)
    );
}

/// Evaluation over a role map agrees with the counted headcount.
#[test]
fn prop_evaluate_matches_headcount() {
    proptest!(|(dead in prop::collection::btree_set(1u64..=8, 0..8))| {
        let roles = eight_roles();
        let alive: OrdSet<PlayerId> = (1..=8).filter(|id| !dead.contains(id)).map(p).collect();
        let count = WinConditionEvaluator::headcount(&roles, &alive);

        prop_assert_eq!(count.werewolves + count.others, alive.len());
        prop_assert_eq!(
            WinConditionEvaluator::evaluate(&roles, &alive),
            WinConditionEvaluator::decide(count)
        );
    });
}
