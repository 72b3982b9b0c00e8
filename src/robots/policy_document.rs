use crate::robots::{AgentPolicy, PolicyError, Polarity};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use tracing::{debug, trace};
use url::Url;

/// Name of the policy every agent without its own record falls back to.
pub const DEFAULT_AGENT: &str = "*";

/// A parsed policy document: per-agent rule sets plus the sitemaps it lists.
#[derive(Debug, Clone, Default)]
pub struct PolicyDocument {
    agents: BTreeMap<String, AgentPolicy>,
    sitemaps: Vec<String>,
    host: Option<String>,
}

impl PolicyDocument {
    /// Parses `text` with no origin; rules and queries are matched on their path alone.
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        DocumentParser::new(None).run(text)
    }

    /// Parses `text` as served by `origin`. Rules naming another host are dropped and
    /// queries against another host are refused.
    pub fn parse_for_origin(text: &str, origin: &str) -> Result<Self, PolicyError> {
        let origin_url = Url::parse(origin)?;
        let host = origin_url
            .host_str()
            .ok_or_else(|| PolicyError::MissingHost(origin.to_owned()))?;
        DocumentParser::new(Some(host.to_owned())).run(text)
    }

    /// Returns true if `agent_name` may fetch `path`.
    pub fn allowed(&self, path: &str, agent_name: &str) -> bool {
        self.find_agent(agent_name)
            .or_else(|| self.default_agent())
            .is_none_or(|agent| agent.resolve(path))
    }

    /// The policy declared for `name`, or an empty one. Unlike `allowed`, this never
    /// falls back to the `*` policy.
    pub fn agent(&self, name: &str) -> Cow<'_, AgentPolicy> {
        match self.find_agent(name) {
            Some(agent) => Cow::Borrowed(agent),
            None => Cow::Owned(self.empty_agent()),
        }
    }

    pub fn default_agent(&self) -> Option<&AgentPolicy> {
        self.agents.get(DEFAULT_AGENT)
    }

    /// Declared agent names, case-folded.
    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn find_agent(&self, name: &str) -> Option<&AgentPolicy> {
        self.agents.get(&name.to_lowercase())
    }

    fn empty_agent(&self) -> AgentPolicy {
        match &self.host {
            Some(host) => AgentPolicy::bound_to(host),
            None => AgentPolicy::new(),
        }
    }
}

impl FromStr for PolicyDocument {
    type Err = PolicyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// One line of a policy document, stripped of comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    UserAgent(&'a str),
    Rule(&'a str, Polarity, &'a str),
    CrawlDelay(&'a str, &'a str),
    Sitemap(&'a str),
    Unknown(&'a str),
    Malformed(&'a str),
    Blank,
}

impl<'a> Line<'a> {
    fn classify(raw: &'a str) -> Self {
        let content = raw.split_once('#').map_or(raw, |(before, _)| before).trim();
        if content.is_empty() {
            return Line::Blank;
        }
        let Some((key, value)) = content.split_once(':') else {
            return Line::Malformed(content);
        };
        let key = key.trim();
        let value = value.trim();
        match key.to_ascii_lowercase().as_str() {
            "user-agent" => Line::UserAgent(value),
            "allow" => Line::Rule(key, Polarity::Allow, value),
            "disallow" => Line::Rule(key, Polarity::Disallow, value),
            "crawl-delay" => Line::CrawlDelay(key, value),
            "sitemap" => Line::Sitemap(value),
            _ => Line::Unknown(key),
        }
    }
}

/// Whether further `User-agent` lines join the current record or start a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupState {
    CollectingNames,
    ApplyingDirectives,
}

struct DocumentParser {
    document: PolicyDocument,
    pending: BTreeSet<String>,
    state: GroupState,
}

impl DocumentParser {
    fn new(host: Option<String>) -> Self {
        Self {
            document: PolicyDocument {
                host,
                ..PolicyDocument::default()
            },
            pending: BTreeSet::new(),
            state: GroupState::CollectingNames,
        }
    }

    fn run(mut self, text: &str) -> Result<PolicyDocument, PolicyError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        for (index, physical_line) in text.lines().enumerate() {
            for line in physical_line.split('\r') {
                self.feed(index + 1, Line::classify(line))?;
            }
        }
        debug!(
            agents = self.document.agents.len(),
            sitemaps = self.document.sitemaps.len(),
            "parsed policy document"
        );
        Ok(self.document)
    }

    fn feed(&mut self, line_number: usize, line: Line<'_>) -> Result<(), PolicyError> {
        match line {
            Line::UserAgent(name) => self.declare_agent(name),
            Line::Rule(key, polarity, pattern) => {
                self.begin_directives(line_number, key)?;
                self.for_each_pending(|agent| {
                    agent.add(pattern, polarity);
                });
            }
            Line::CrawlDelay(key, value) => {
                self.begin_directives(line_number, key)?;
                self.for_each_pending(|agent| {
                    agent.set_delay(value);
                });
            }
            Line::Sitemap(url) => self.document.sitemaps.push(url.to_owned()),
            Line::Unknown(key) => {
                trace!(line_number, key, "ignoring unknown directive");
                self.state = GroupState::ApplyingDirectives;
            }
            Line::Malformed(content) => {
                debug!(line_number, content, "skipping line without a separator");
            }
            Line::Blank => {}
        }
        Ok(())
    }

    fn declare_agent(&mut self, name: &str) {
        if self.state == GroupState::ApplyingDirectives {
            self.pending.clear();
            self.state = GroupState::CollectingNames;
        }
        let name = name.to_lowercase();
        if !self.document.agents.contains_key(&name) {
            let agent = self.document.empty_agent();
            self.document.agents.insert(name.clone(), agent);
        }
        self.pending.insert(name);
    }

    fn begin_directives(&mut self, line_number: usize, key: &str) -> Result<(), PolicyError> {
        if self.pending.is_empty() {
            return Err(PolicyError::DirectiveBeforeAgent {
                line: line_number,
                directive: key.to_owned(),
            });
        }
        self.state = GroupState::ApplyingDirectives;
        Ok(())
    }

    fn for_each_pending(&mut self, mut apply: impl FnMut(&mut AgentPolicy)) {
        for name in &self.pending {
            if let Some(agent) = self.document.agents.get_mut(name) {
                apply(agent);
            }
        }
    }
}
