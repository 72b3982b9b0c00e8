use robots_policy::DEFAULT_AGENT;

#[derive(Clone)]
pub struct CheckerConfig {
    agent: String,
    origin: Option<String>,
}

impl CheckerConfig {
    pub fn new(agent: Option<String>, origin: Option<String>) -> Self {
        Self {
            agent: agent.unwrap_or_else(|| DEFAULT_AGENT.to_owned()),
            origin,
        }
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}
