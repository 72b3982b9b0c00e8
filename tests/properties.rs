use proptest::prelude::*;
use robots_policy::{AgentPolicy, PatternRule, Polarity};

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

proptest! {
    #[test]
    fn empty_policy_allows_everything(path in "/[a-zA-Z0-9/._-]{0,40}") {
        prop_assert!(AgentPolicy::new().resolve(&path));
    }

    #[test]
    fn empty_disallow_allows_everything(path in "/[a-zA-Z0-9/._-]{0,40}") {
        let mut agent = AgentPolicy::new();
        agent.disallow("");
        prop_assert!(agent.resolve(&path));
    }

    #[test]
    fn blanket_disallow_spares_robots_txt(path in "/[a-z0-9/]{0,20}") {
        let mut agent = AgentPolicy::new();
        agent.disallow("/");
        prop_assert!(agent.resolve("/robots.txt"));
        prop_assert_eq!(agent.resolve(&path), path == "/robots.txt");
    }

    #[test]
    fn more_specific_rule_governs(
        base in segment(),
        extension in segment(),
        deny_first in any::<bool>(),
    ) {
        let short = format!("/{base}");
        let long = format!("/{base}/{extension}");
        let mut agent = AgentPolicy::new();
        if deny_first {
            agent.disallow(&short).allow(&long);
        } else {
            agent.allow(&long).disallow(&short);
        }
        let under_long = format!("{long}/page");
        let under_short = format!("{short}/0");
        prop_assert!(agent.resolve(&under_long));
        prop_assert!(!agent.resolve(&under_short));
    }

    #[test]
    fn ranking_never_increases(patterns in prop::collection::vec("/[a-z*]{0,8}\\$?", 0..12)) {
        let mut agent = AgentPolicy::new();
        for pattern in &patterns {
            agent.allow(pattern);
        }
        let ranks: Vec<usize> = agent.rules().map(PatternRule::specificity).collect();
        prop_assert!(ranks.windows(2).all(|pair| pair[0] >= pair[1]));
        prop_assert_eq!(ranks.len(), patterns.len());
    }

    #[test]
    fn unanchored_literal_matches_any_extension(
        prefix in "/[a-z/]{0,10}",
        suffix in "[a-z/?=]{0,10}",
    ) {
        let rule = PatternRule::new(prefix.clone(), Polarity::Disallow);
        let candidate = format!("{prefix}{suffix}");
        prop_assert!(rule.matches(&candidate));
    }
}
