use crate::robots::{NormalizedUrl, PatternRule, Polarity};
use std::fmt;
use tracing::debug;

/// Requests for the policy document itself are never refused.
pub const ROBOTS_TXT_PATH: &str = "/robots.txt";

/// The rules and crawl delay that apply to one agent name.
///
/// Rules are kept in declaration order for rendering, alongside a ranking by
/// descending specificity used for resolution. The ranking is updated on every
/// insert with a stable insertion point, so among equally specific rules the
/// first declared wins.
#[derive(Debug, Clone, Default)]
pub struct AgentPolicy {
    rules: Vec<PatternRule>,
    ranking: Vec<usize>,
    delay: Option<f64>,
    host: Option<String>,
}

impl AgentPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that ignores rules for, and refuses queries against, any host but `host`.
    pub fn bound_to(host: &str) -> Self {
        Self {
            host: Some(host.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn allow(&mut self, pattern: &str) -> &mut Self {
        self.add(pattern, Polarity::Allow)
    }

    pub fn disallow(&mut self, pattern: &str) -> &mut Self {
        self.add(pattern, Polarity::Disallow)
    }

    pub fn add(&mut self, pattern: &str, polarity: Polarity) -> &mut Self {
        if pattern.is_empty() && polarity == Polarity::Disallow {
            // "Disallow:" means "Allow: /".
            self.push(PatternRule::new("", Polarity::Allow));
            return self;
        }

        let normalized = NormalizedUrl::parse(pattern);
        if !self.is_same_origin(&normalized) {
            debug!(
                pattern,
                host = normalized.host(),
                "dropping rule declared for another host"
            );
            return self;
        }
        self.push(PatternRule::new(normalized.path(), polarity));
        self
    }

    /// Parses a `Crawl-delay` value. Anything but a finite, non-negative number unsets the delay.
    pub fn set_delay(&mut self, value: &str) -> &mut Self {
        match value.trim().parse::<f64>() {
            Ok(seconds) => self.set_delay_secs(seconds),
            Err(_) => {
                debug!(value, "ignoring unparseable crawl delay");
                self.delay = None;
                self
            }
        }
    }

    pub fn set_delay_secs(&mut self, seconds: f64) -> &mut Self {
        self.delay = (seconds.is_finite() && seconds >= 0.0).then_some(seconds);
        self
    }

    pub fn delay(&self) -> Option<f64> {
        self.delay
    }

    /// Rules in the order they are consulted.
    pub fn rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.ranking.iter().map(|&index| &self.rules[index])
    }

    /// Rules in the order they were declared.
    pub fn declared_rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns true if `path` (a bare path or a full URL) may be fetched.
    pub fn resolve(&self, path: &str) -> bool {
        let normalized = NormalizedUrl::parse(path);
        if !self.is_same_origin(&normalized) {
            return false;
        }

        let candidate = normalized.path();
        if candidate == ROBOTS_TXT_PATH {
            return true;
        }

        self.rules()
            .find(|rule| rule.matches(candidate))
            .is_none_or(PatternRule::allowed)
    }

    pub fn allowed(&self, path: &str) -> bool {
        self.resolve(path)
    }

    fn is_same_origin(&self, normalized: &NormalizedUrl) -> bool {
        match &self.host {
            Some(host) => !normalized.is_absolute() || normalized.host() == host,
            None => true,
        }
    }

    fn push(&mut self, rule: PatternRule) {
        let specificity = rule.specificity();
        let position = self
            .ranking
            .partition_point(|&index| self.rules[index].specificity() >= specificity);
        self.ranking.insert(position, self.rules.len());
        self.rules.push(rule);
    }
}

impl fmt::Display for AgentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(delay) = self.delay {
            write!(f, "Crawl-Delay: {delay} ")?;
        }
        f.write_str("[")?;
        for (index, rule) in self.rules.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "Directive({rule})")?;
        }
        f.write_str("]")
    }
}
