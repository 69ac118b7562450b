//! Pattern matching against series aliases and cell identifiers.
//!
//! A pattern is either a plain string, compiled as the anchored expression
//! `^pattern$`, or a `/body/flags` literal whose body is used verbatim.
//! Supported flags: `i` (case-insensitive), `m` (multi-line), `s`
//! (dot matches newline), `g` (replace every occurrence). `u` and `y` are
//! accepted and ignored.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use regex::{NoExpand, Regex, RegexBuilder};

/// Distinct patterns kept compiled before the cache starts over.
const PATTERN_CACHE_LIMIT: usize = 1024;

type PatternCache = Mutex<HashMap<String, Result<CompiledPattern, PatternError>>>;

static PATTERN_CACHE: OnceLock<PatternCache> = OnceLock::new();

/// Errors raised while turning a pattern string into a regular expression.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
    /// `/.../flags` literal without a closing slash or with unknown flags.
    #[error("malformed pattern literal: '{0}'")]
    Malformed(String),

    /// Body rejected by the regex engine.
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
}

/// A pattern compiled once and reusable across candidates.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    global: bool,
}

impl CompiledPattern {
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Substitute matches inside `haystack` with the literal `replacement`.
    ///
    /// Only the first occurrence is replaced unless the pattern carried the
    /// `g` flag. Returns `None` when nothing matched.
    pub fn replace(&self, haystack: &str, replacement: &str) -> Option<String> {
        if !self.regex.is_match(haystack) {
            return None;
        }
        let replaced = if self.global {
            self.regex.replace_all(haystack, NoExpand(replacement))
        } else {
            self.regex.replace(haystack, NoExpand(replacement))
        };
        Some(replaced.into_owned())
    }
}

/// Compile `pattern` into a [`CompiledPattern`].
pub fn compile_pattern(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let Some(literal) = pattern.strip_prefix('/') else {
        let regex = Regex::new(&format!("^{}$", pattern))?;
        return Ok(CompiledPattern { regex, global: false });
    };

    let (body, flags) = literal
        .rsplit_once('/')
        .ok_or_else(|| PatternError::Malformed(pattern.to_string()))?;

    let mut builder = RegexBuilder::new(body);
    let mut global = false;
    let mut seen = String::new();
    for flag in flags.chars() {
        if seen.contains(flag) {
            return Err(PatternError::Malformed(pattern.to_string()));
        }
        seen.push(flag);
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'g' => global = true,
            'u' | 'y' => {}
            _ => return Err(PatternError::Malformed(pattern.to_string())),
        }
    }

    Ok(CompiledPattern {
        regex: builder.build()?,
        global,
    })
}

/// [`compile_pattern`] memoized per pattern string, failures included.
///
/// Rules are matched on every render, so each distinct pattern is compiled
/// once per process.
pub fn cached_pattern(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let cache = PATTERN_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(hit) = cache.get(pattern) {
        return hit.clone();
    }
    if cache.len() >= PATTERN_CACHE_LIMIT {
        cache.clear();
    }
    let compiled = compile_pattern(pattern);
    cache.insert(pattern.to_string(), compiled.clone());
    compiled
}

#[cfg(test)]
fn is_cached(pattern: &str) -> bool {
    PATTERN_CACHE
        .get()
        .map(|c| c.lock().unwrap_or_else(PoisonError::into_inner).contains_key(pattern))
        .unwrap_or(false)
}

/// Match `candidate` against `pattern`, surfacing configuration errors.
///
/// Empty candidate or pattern never matches. Exact equality short-circuits
/// before any compilation.
pub fn try_match(candidate: &str, pattern: &str) -> Result<bool, PatternError> {
    if candidate.is_empty() || pattern.is_empty() {
        return Ok(false);
    }
    if candidate == pattern {
        return Ok(true);
    }
    Ok(cached_pattern(pattern)?.is_match(candidate))
}

/// Total variant of [`try_match`]: a pattern that fails to compile is no match.
pub fn match_string(candidate: &str, pattern: &str) -> bool {
    try_match(candidate, pattern).unwrap_or(false)
}
