//! Collision-free rename planning

use super::naming::{staging_name, with_counter};
use crate::error::{RenameError, Result};
use crate::fs::FileSystem;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default bound on counter suffixes tried for one colliding target
pub const DEFAULT_MAX_RETRIES: usize = 100;

/// Default text placed between a stem and its counter
pub const DEFAULT_COUNTER_SEPARATOR: &str = "_";

/// Knobs for [`plan_renames`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameOptions {
    /// Replace paths outside the batch instead of failing
    pub overwrite: bool,

    /// Counter suffixes tried before giving up on a colliding target
    pub max_retries: usize,

    /// Joins the stem and counter of a disambiguated name
    pub separator: String,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            max_retries: DEFAULT_MAX_RETRIES,
            separator: DEFAULT_COUNTER_SEPARATOR.to_string(),
        }
    }
}

impl RenameOptions {
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// Why a step goes through a temporary name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingReason {
    /// The step closes a cycle of renames inside the batch
    Cycle,
    /// The step replaces a path that is not part of the batch
    Overwrite,
}

/// One source to target move in a [`RenamePlan`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameStep {
    pub source: PathBuf,
    pub target: PathBuf,
    pub needs_staging: bool,

    /// Temporary name the source is parked under when staged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_reason: Option<StagingReason>,

    /// The target received a counter suffix to avoid a collision
    pub disambiguated: bool,
}

/// A single primitive rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOperation {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Ordered steps that are collision-free when executed in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    steps: Vec<RenameStep>,
}

impl RenamePlan {
    pub fn steps(&self) -> &[RenameStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenameStep> {
        self.steps.iter()
    }

    /// `(source, target, needs_staging)` for every step, in execution order
    pub fn triples(&self) -> Vec<(&Path, &Path, bool)> {
        self.steps
            .iter()
            .map(|s| (s.source.as_path(), s.target.as_path(), s.needs_staging))
            .collect()
    }

    pub fn staged_count(&self) -> usize {
        self.steps.iter().filter(|s| s.needs_staging).count()
    }

    /// Primitive renames in execution order.
    ///
    /// A staged step moves its source to the staging path in place, and the
    /// move from the staging path to the target runs after every other step.
    pub fn operations(&self) -> Vec<RenameOperation> {
        let mut operations = Vec::with_capacity(self.steps.len() + self.staged_count());
        let mut completions = Vec::new();

        for step in &self.steps {
            match &step.staging_path {
                Some(staging) => {
                    operations.push(RenameOperation {
                        from: step.source.clone(),
                        to: staging.clone(),
                    });
                    completions.push(RenameOperation {
                        from: staging.clone(),
                        to: step.target.clone(),
                    });
                }
                None => operations.push(RenameOperation {
                    from: step.source.clone(),
                    to: step.target.clone(),
                }),
            }
        }

        operations.extend(completions);
        operations
    }
}

impl<'a> IntoIterator for &'a RenamePlan {
    type Item = &'a RenameStep;
    type IntoIter = std::slice::Iter<'a, RenameStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Compute a collision-free plan for renaming `sources`.
///
/// `transform` receives each source with its position and returns the
/// desired target. Later sources that want an already claimed target get a
/// counter suffix; the earliest source keeps the plain name. Targets that
/// exist outside the batch fail with [`RenameError::ExternalCollision`]
/// unless `options.overwrite` is set. Renames whose target is another
/// source in the batch are ordered so each target is free when its step
/// runs, with cycles broken through a temporary name.
pub fn plan_renames<F, S>(
    sources: &[PathBuf],
    mut transform: F,
    options: &RenameOptions,
    fs: &S,
) -> Result<RenamePlan>
where
    F: FnMut(&Path, usize) -> PathBuf,
    S: FileSystem + ?Sized,
{
    let mut source_set: HashSet<&Path> = HashSet::with_capacity(sources.len());
    for source in sources {
        if !source_set.insert(source.as_path()) {
            return Err(RenameError::DuplicateSource {
                path: source.clone(),
            }
            .into());
        }
    }

    let proposed: Vec<PathBuf> = sources
        .iter()
        .enumerate()
        .map(|(index, source)| transform(source, index))
        .collect();

    let is_external = |path: &Path| !source_set.contains(path) && fs.exists(path);

    let mut first_claim: HashMap<&Path, usize> = HashMap::with_capacity(proposed.len());
    for (index, target) in proposed.iter().enumerate() {
        first_claim.entry(target.as_path()).or_insert(index);
    }
    let mut claimed: HashSet<PathBuf> = proposed.iter().cloned().collect();

    let mut targets = Vec::with_capacity(proposed.len());
    let mut disambiguated = vec![false; proposed.len()];
    for (index, target) in proposed.iter().enumerate() {
        if first_claim[target.as_path()] == index {
            targets.push(target.clone());
            continue;
        }

        let resolved = next_free_name(target, &claimed, &is_external, options)?;
        debug!(
            source = %sources[index].display(),
            wanted = %target.display(),
            resolved = %resolved.display(),
            "target already claimed in batch"
        );
        claimed.insert(resolved.clone());
        targets.push(resolved);
        disambiguated[index] = true;
    }

    let mut overwrites = vec![false; targets.len()];
    for (index, (source, target)) in sources.iter().zip(&targets).enumerate() {
        if source == target || !is_external(target) {
            continue;
        }
        if !options.overwrite {
            return Err(RenameError::ExternalCollision {
                path: source.clone(),
                target: target.clone(),
            }
            .into());
        }
        overwrites[index] = true;
    }

    let order = execution_order(sources, &targets);

    let mut steps = Vec::with_capacity(order.len());
    for (index, closes_cycle) in order {
        let reason = if closes_cycle {
            Some(StagingReason::Cycle)
        } else if overwrites[index] {
            Some(StagingReason::Overwrite)
        } else {
            None
        };

        let staging_path = match reason {
            Some(_) => Some(free_staging_path(&targets[index], &mut claimed, fs, options)?),
            None => None,
        };

        steps.push(RenameStep {
            source: sources[index].clone(),
            target: targets[index].clone(),
            needs_staging: staging_path.is_some(),
            staging_path,
            staging_reason: reason,
            disambiguated: disambiguated[index],
        });
    }

    let plan = RenamePlan { steps };
    info!(
        sources = sources.len(),
        steps = plan.len(),
        staged = plan.staged_count(),
        disambiguated = disambiguated.iter().filter(|d| **d).count(),
        "rename plan ready"
    );

    Ok(plan)
}

fn next_free_name(
    target: &Path,
    claimed: &HashSet<PathBuf>,
    is_external: &dyn Fn(&Path) -> bool,
    options: &RenameOptions,
) -> Result<PathBuf> {
    for n in 1..=options.max_retries {
        let candidate = with_counter(target, n, &options.separator);
        if !claimed.contains(&candidate) && !is_external(&candidate) {
            return Ok(candidate);
        }
    }

    Err(RenameError::UnresolvableConflict {
        target: target.to_path_buf(),
        attempts: options.max_retries,
    }
    .into())
}

fn free_staging_path<S: FileSystem + ?Sized>(
    target: &Path,
    claimed: &mut HashSet<PathBuf>,
    fs: &S,
    options: &RenameOptions,
) -> Result<PathBuf> {
    for _ in 0..options.max_retries.max(1) {
        let candidate = staging_name(target);
        if !claimed.contains(&candidate) && !fs.exists(&candidate) {
            claimed.insert(candidate.clone());
            return Ok(candidate);
        }
    }

    Err(RenameError::UnresolvableConflict {
        target: target.to_path_buf(),
        attempts: options.max_retries,
    }
    .into())
}

/// Order non-identity renames so that every target is vacated first.
///
/// Step `i` depends on step `j` when `targets[i] == sources[j]`. Targets are
/// unique, so each step has at most one dependant and the dependency graph
/// is a set of chains and simple cycles. Chains run tail first. In a cycle
/// the earliest member is flagged for staging and the rest run as a chain.
fn execution_order(sources: &[PathBuf], targets: &[PathBuf]) -> Vec<(usize, bool)> {
    let active: Vec<usize> = (0..sources.len())
        .filter(|&index| {
            let identity = sources[index] == targets[index];
            if identity {
                debug!(path = %sources[index].display(), "dropping identity rename");
            }
            !identity
        })
        .collect();

    let by_source: HashMap<&Path, usize> = active
        .iter()
        .map(|&index| (sources[index].as_path(), index))
        .collect();
    let next: HashMap<usize, usize> = active
        .iter()
        .filter_map(|&index| {
            by_source
                .get(targets[index].as_path())
                .map(|&blocker| (index, blocker))
        })
        .collect();

    let mut emitted = vec![false; sources.len()];
    let mut order = Vec::with_capacity(active.len());

    for &start in &active {
        if emitted[start] {
            continue;
        }

        let mut chain = vec![start];
        let mut in_chain = HashSet::from([start]);
        let mut cyclic = false;
        let mut current = start;
        while let Some(&following) = next.get(&current) {
            if emitted[following] {
                break;
            }
            if !in_chain.insert(following) {
                cyclic = true;
                break;
            }
            chain.push(following);
            current = following;
        }

        for &index in &chain {
            emitted[index] = true;
        }

        if cyclic {
            order.push((chain[0], true));
            order.extend(chain[1..].iter().rev().map(|&index| (index, false)));
        } else {
            order.extend(chain.iter().rev().map(|&index| (index, false)));
        }
    }

    order
}
