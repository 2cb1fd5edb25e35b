// core/src/resolver.rs
//
// Prefix-based candidate resolution over the syllable lexicon.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::{CandidateList, Config, Lexicon};

/// Hard ceiling on candidates per buffer state. Larger configured values are
/// clamped to it.
pub const CANDIDATE_LIMIT: usize = 9;

/// Turns a partial syllable into a bounded, ordered candidate list.
///
/// Ranking is a fixed heuristic:
/// 1. every word of the exact syllable, in lexicon order
/// 2. up to `prefix_words_per_key` words of each longer syllable that starts
///    with the prefix, syllables visited in lexicographic order
/// 3. truncate to `max_candidates`
///
/// Results are memoised per prefix. The lexicon is immutable so cached lists
/// never go stale.
pub struct CandidateResolver {
    lexicon: Arc<Lexicon>,
    max_candidates: usize,
    prefix_words_per_key: usize,
    cache: RefCell<lru::LruCache<String, CandidateList>>,
    cache_hits: RefCell<usize>,
    cache_misses: RefCell<usize>,
}

impl CandidateResolver {
    /// Create a resolver with default caps.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_config(lexicon, &Config::default())
    }

    pub fn with_config(lexicon: Arc<Lexicon>, config: &Config) -> Self {
        let capacity = NonZeroUsize::new(config.max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            lexicon,
            max_candidates: config.max_candidates.min(CANDIDATE_LIMIT),
            prefix_words_per_key: config.prefix_words_per_key,
            cache: RefCell::new(lru::LruCache::new(capacity)),
            cache_hits: RefCell::new(0),
            cache_misses: RefCell::new(0),
        }
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Resolve candidates for `prefix`.
    ///
    /// An empty prefix yields an empty list; the session never asks for one.
    pub fn resolve(&self, prefix: &str) -> CandidateList {
        if prefix.is_empty() {
            return CandidateList::new();
        }

        if let Some(cached) = self.cache.borrow_mut().get(prefix) {
            *self.cache_hits.borrow_mut() += 1;
            return cached.clone();
        }
        *self.cache_misses.borrow_mut() += 1;

        let list = self.rank(prefix);
        self.cache
            .borrow_mut()
            .put(prefix.to_string(), list.clone());
        list
    }

    fn rank(&self, prefix: &str) -> CandidateList {
        let mut words: Vec<String> = self.lexicon.lookup(prefix).to_vec();

        for (key, list) in self.lexicon.prefixed(prefix) {
            if words.len() >= self.max_candidates {
                break;
            }
            if key == prefix {
                continue;
            }
            words.extend(list.iter().take(self.prefix_words_per_key).cloned());
        }

        CandidateList::from_words(words, self.max_candidates)
    }

    /// Get cache statistics as a (hits, misses) tuple.
    pub fn cache_stats(&self) -> (usize, usize) {
        (*self.cache_hits.borrow(), *self.cache_misses.borrow())
    }

    /// Get current cache size (number of entries).
    pub fn cache_size(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Clear the cache and reset statistics.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        *self.cache_hits.borrow_mut() = 0;
        *self.cache_misses.borrow_mut() = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LexiconBuilder;

    fn resolver() -> CandidateResolver {
        let mut b = LexiconBuilder::new();
        b.extend("a", ["啊", "阿", "呵"]).unwrap();
        b.extend("ai", ["爱", "哎", "唉", "矮"]).unwrap();
        b.extend("an", ["安", "按", "暗", "岸"]).unwrap();
        b.extend("hao", ["好", "号", "毫"]).unwrap();
        CandidateResolver::new(Arc::new(b.build().unwrap()))
    }

    fn words(list: &CandidateList) -> Vec<&str> {
        list.iter().collect()
    }

    #[test]
    fn exact_then_prefix_then_truncate() {
        let r = resolver();
        assert_eq!(
            words(&r.resolve("a")),
            ["啊", "阿", "呵", "爱", "哎", "唉", "安", "按", "暗"]
        );
    }

    #[test]
    fn exact_only_keeps_full_list() {
        let r = resolver();
        assert_eq!(words(&r.resolve("ai")), ["爱", "哎", "唉", "矮"]);
    }

    #[test]
    fn prefix_only_when_no_exact_key() {
        let r = resolver();
        assert_eq!(words(&r.resolve("h")), ["好", "号", "毫"]);
        assert_eq!(words(&r.resolve("ha")), ["好", "号", "毫"]);
    }

    #[test]
    fn unknown_and_empty_prefix() {
        let r = resolver();
        assert!(r.resolve("zzz").is_empty());
        assert!(r.resolve("").is_empty());
        // empty prefix never touches the cache
        assert_eq!(r.cache_stats(), (0, 1));
    }

    #[test]
    fn cache_hits_return_same_list() {
        let r = resolver();
        let first = r.resolve("an");
        let second = r.resolve("an");
        assert_eq!(first, second);
        assert_eq!(r.cache_stats(), (1, 1));
        assert_eq!(r.cache_size(), 1);
        r.clear_cache();
        assert_eq!(r.cache_stats(), (0, 0));
        assert_eq!(r.cache_size(), 0);
    }

    #[test]
    fn custom_caps_from_config() {
        let mut b = LexiconBuilder::new();
        b.extend("a", ["啊"]).unwrap();
        b.extend("ai", ["爱", "哎", "唉"]).unwrap();
        let cfg = Config {
            max_candidates: 2,
            prefix_words_per_key: 1,
            ..Config::default()
        };
        let r = CandidateResolver::with_config(Arc::new(b.build().unwrap()), &cfg);
        assert_eq!(words(&r.resolve("a")), ["啊", "爱"]);
    }

    #[test]
    fn oversized_cap_is_clamped() {
        let mut b = LexiconBuilder::new();
        b.extend("a", (0..20).map(|i| format!("字{}", i))).unwrap();
        let cfg = Config {
            max_candidates: 50,
            ..Config::default()
        };
        let r = CandidateResolver::with_config(Arc::new(b.build().unwrap()), &cfg);
        assert_eq!(r.resolve("a").len(), CANDIDATE_LIMIT);
    }
}
