use std::collections::{HashMap, HashSet};

use crate::content::{Outcome, ProjectDef, ProjectKind};
use crate::effects::{EffectKind, Param, ResolvedEffect};
use crate::state::{ProjectState, ProjectStatus};

/// Effects a project currently exerts, or would exert once completed.
///
/// Policies keep their outcomes secret until they are active. Projects that
/// have not been rolled yet show every possible outcome merged together.
/// Upgrade tiers replace the base effects rather than stacking on them.
pub fn active_effects(project: &ProjectState, def: &ProjectDef) -> Vec<ResolvedEffect> {
    let rolled_outcome = || -> Vec<ResolvedEffect> {
        project
            .active_outcome
            .and_then(|idx| def.outcomes.get(idx))
            .map(|outcome| outcome.effects.iter().map(ResolvedEffect::from).collect())
            .unwrap_or_default()
    };
    let baseline = || def.effects.iter().map(ResolvedEffect::from);

    if def.kind == ProjectKind::Policy && project.status != ProjectStatus::Active {
        return baseline().collect();
    }

    match project.status {
        ProjectStatus::Inactive | ProjectStatus::Building => {
            let mut effects: Vec<_> = baseline().collect();
            effects.extend(merge_outcome_effects(&def.outcomes));
            effects
        }
        _ if project.level == 0 => {
            let mut effects: Vec<_> = baseline().collect();
            effects.extend(rolled_outcome());
            effects
        }
        _ => {
            let mut effects: Vec<ResolvedEffect> = def
                .upgrades
                .get(project.level - 1)
                .map(|upgrade| upgrade.effects.iter().map(ResolvedEffect::from).collect())
                .unwrap_or_default();
            if effects.is_empty() && def.upgrades.len() < project.level {
                tracing::debug!(
                    target: "factors::projects",
                    project = project.id,
                    level = project.level,
                    "upgrade_tier.missing"
                );
            }
            effects.extend(rolled_outcome());
            effects
        }
    }
}

struct MergedEntry {
    first: ResolvedEffect,
    count: usize,
    records: HashSet<(EffectKind, u32, Option<u64>)>,
}

/// Merge every outcome's effects by `(type, subtype)`.
///
/// When all records under a key are identical the magnitude is kept. When
/// they differ the magnitude becomes [`Param::Uncertain`]; conflicting values
/// are never averaged. A key missing from some outcomes is flagged `random`
/// but keeps its magnitude if the outcomes that carry it agree.
///
/// Outcome probability is not part of a record's identity: equal magnitudes
/// at different probabilities agree, and the first probability seen is kept.
pub fn merge_outcome_effects(outcomes: &[Outcome]) -> Vec<ResolvedEffect> {
    let mut order: Vec<EffectKind> = Vec::new();
    let mut merged: HashMap<EffectKind, MergedEntry> = HashMap::new();

    for outcome in outcomes {
        for effect in &outcome.effects {
            let fingerprint = effect.fingerprint();
            match merged.get_mut(&effect.kind) {
                Some(entry) => {
                    entry.count += 1;
                    entry.records.insert(fingerprint);
                }
                None => {
                    let mut first = ResolvedEffect::from(effect);
                    first.probability = Some(outcome.probability);
                    order.push(effect.kind.clone());
                    merged.insert(
                        effect.kind.clone(),
                        MergedEntry {
                            first,
                            count: 1,
                            records: HashSet::from([fingerprint]),
                        },
                    );
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .map(|entry| {
            let conflicting = entry.records.len() > 1;
            let mut effect = entry.first;
            effect.random = conflicting || entry.count != outcomes.len();
            if conflicting {
                effect.param = Param::Uncertain;
            }
            effect
        })
        .collect()
}
