//! Expansion of declarative [`Pattern`]s into concrete [`Instance`]s.
//!
//! For a detection node with `k` argument slots, the expander:
//!
//! 1. expands each slot's pattern recursively, producing lists `E₁ … Eₖ`,
//! 2. takes the cartesian product `E₁ × … × Eₖ`, in which the first slot varies slowest,
//! 3. if the node is commutative, replaces every combination with all of its distinct orderings,
//! 4. emits one instance per resulting argument list.
//!
//! Since this is repeated for every rule at every node of every simplification pass, expansions
//! are memoized in an [`ExpansionCache`] owned by the [`Expander`].

use cas_error::Error;
use crate::error::{CacheError, MaxDepthExceeded};
use itertools::Itertools;
use std::{num::NonZeroUsize, sync::Arc};
use super::{cache::{CacheStats, ExpansionCache}, DetectionNode, Instance, Pattern};

/// Settings for an [`Expander`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpanderConfig {
    /// Maximum nesting depth of patterns. Expanding a pattern nested more deeply than this is an
    /// error. Defaults to 100.
    pub max_depth: NonZeroUsize,

    /// Whether expansions are cached. Defaults to true.
    pub cache_enabled: bool,

    /// Maximum number of cached expansions. Defaults to 500.
    pub max_cache_entries: NonZeroUsize,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            max_depth: NonZeroUsize::new(100).unwrap_or(NonZeroUsize::MIN),
            cache_enabled: true,
            max_cache_entries: NonZeroUsize::new(500).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl ExpanderConfig {
    /// Sets the maximum nesting depth.
    pub fn max_depth(mut self, max_depth: NonZeroUsize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables the expansion cache.
    pub fn cache_enabled(mut self, cache_enabled: bool) -> Self {
        self.cache_enabled = cache_enabled;
        self
    }

    /// Sets the maximum number of cached expansions.
    pub fn max_cache_entries(mut self, max_cache_entries: NonZeroUsize) -> Self {
        self.max_cache_entries = max_cache_entries;
        self
    }
}

/// Expands patterns into their concrete instances.
///
/// The cache is owned by the expander, so independent expanders never share expansions. An
/// expander is not meant to be shared between threads without external synchronization.
#[derive(Debug)]
pub struct Expander {
    config: ExpanderConfig,
    cache: ExpansionCache,
}

impl Default for Expander {
    fn default() -> Self {
        Self::new(ExpanderConfig::default())
    }
}

impl Expander {
    /// Creates an expander with the given settings.
    pub fn new(config: ExpanderConfig) -> Self {
        Self {
            config,
            cache: ExpansionCache::new(config.max_cache_entries),
        }
    }

    /// Returns the current settings.
    pub fn config(&self) -> ExpanderConfig {
        self.config
    }

    /// Replaces the current settings. If the cache capacity shrinks, the least recently used
    /// entries are evicted immediately.
    pub fn set_config(&mut self, config: ExpanderConfig) {
        self.config = config;
        self.cache.set_capacity(config.max_cache_entries);
    }

    /// Removes every cached expansion and resets the cache statistics.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Returns the cache usage statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Returns the number of cached expansions.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Expands the pattern into every concrete instance it implies.
    pub fn expand(&mut self, pattern: &Pattern) -> Result<Arc<[Instance]>, Error> {
        if !self.config.cache_enabled {
            return Ok(Arc::from(self.expand_pattern(pattern, 0)?));
        }

        let key = serde_json::to_string(pattern)
            .map_err(|err| CacheError { reason: err.to_string() })?;
        if let Some(instances) = self.cache.get(&key) {
            return Ok(instances);
        }

        let instances: Arc<[Instance]> = Arc::from(self.expand_pattern(pattern, 0)?);
        log::trace!("expanded pattern into {} instances", instances.len());
        self.cache.insert(key, Arc::clone(&instances));
        Ok(instances)
    }

    /// Expands every alternative of the pattern, in order.
    fn expand_pattern(&self, pattern: &Pattern, depth: usize) -> Result<Vec<Instance>, Error> {
        if depth > self.config.max_depth.get() {
            return Err(MaxDepthExceeded {
                depth,
                max_depth: self.config.max_depth.get(),
            }.into());
        }

        let mut instances = Vec::new();
        for node in pattern.alternatives() {
            instances.extend(self.expand_node(node, depth + 1)?);
        }
        Ok(instances)
    }

    /// Expands a single detection node.
    fn expand_node(&self, node: &DetectionNode, depth: usize) -> Result<Vec<Instance>, Error> {
        let Some(slots) = &node.args else {
            return Ok(vec![Instance::resolve(node, None)]);
        };

        let expanded = slots.iter()
            .map(|slot| self.expand_pattern(slot, depth))
            .collect::<Result<Vec<_>, _>>()?;

        let mut instances = Vec::new();
        for combination in cartesian_product(expanded) {
            if node.commutative {
                instances.extend(permutations(combination)
                    .into_iter()
                    .map(|args| Instance::resolve(node, Some(args))));
            } else {
                instances.push(Instance::resolve(node, Some(combination)));
            }
        }
        Ok(instances)
    }
}

/// Returns every list that picks one item from each of the given lists, in order. The first list
/// varies slowest.
fn cartesian_product<T: Clone>(lists: Vec<Vec<T>>) -> Vec<Vec<T>> {
    if lists.is_empty() {
        return vec![Vec::new()];
    }

    lists.into_iter()
        .map(Vec::into_iter)
        .multi_cartesian_product()
        .collect()
}

/// Returns every distinct ordering of the given items, in the order each first appears.
///
/// Instances are compared structurally, so slots that expanded to equal instances never produce
/// duplicate orderings.
fn permutations<T: Clone + PartialEq>(items: Vec<T>) -> Vec<Vec<T>> {
    let len = items.len();
    let mut distinct: Vec<Vec<T>> = Vec::new();
    for permutation in items.into_iter().permutations(len) {
        if !distinct.contains(&permutation) {
            distinct.push(permutation);
        }
    }
    distinct
}
