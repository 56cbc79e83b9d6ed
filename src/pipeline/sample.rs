//! Offline placeholder analyses built from episode metadata alone.
//!
//! Lets the index and enrichment stages run without any model calls.

use super::truncate_chars;
use crate::store::{Analysis, Audience, Category, Difficulty, Episode, EpisodeUseCase};
use regex::Regex;
use std::sync::LazyLock;

static GUEST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\|\s*(.+?)(?:\s*\(|$)",
        r"with\s+(.+?)(?:\s*\(|$)",
        r":\s*(.+?)'s\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

const NOT_A_NAME: [&str; 5] = ["how", "what", "the", "a ", "an "];
const MAX_NAME_TOKENS: usize = 4;

const KNOWN_TOOLS: &[&str] = &[
    "ChatGPT", "Claude", "Claude Code", "Cursor", "Copilot", "Devin",
    "GitHub", "Zapier", "Vercel", "v0", "Replit", "Lovable",
    "Midjourney", "Sora", "Gemini", "Perplexity", "NotebookLM",
    "Notebook LM", "Google NotebookLM", "Figma", "Slack", "Linear",
    "Granola", "Coda", "Suno", "Webflow", "Next.js", "Descript",
    "Obsidian", "Codex", "GitHub Spark", "Goose", "Magic Patterns",
    "ElevenLabs", "GitHub Copilot", "MCPs", "MCP", "GPT-4", "GPT-5",
    "Grok", "HubSpot", "Jira", "Trello", "Square",
];

/// Checked in order; the first bucket with any keyword present wins.
const CATEGORY_BUCKETS: &[(Category, &[&str])] = &[
    (Category::Coding, &["code", "coding", "cursor", "developer", "engineer", "git"]),
    (Category::Design, &["design", "prototype", "figma", "ui", "ux"]),
    (Category::Automation, &["automat", "zapier", "workflow", "agent"]),
    (Category::Writing, &["writ", "content", "blog", "edit"]),
    (Category::DataAnalysis, &["data", "analytics", "analy"]),
    (Category::Hiring, &["hiring", "recruit", "interview"]),
    (Category::Marketing, &["market", "seo", "growth"]),
    (Category::Research, &["research", "study"]),
];

const SUMMARY_CHARS: usize = 300;
const USE_CASE_TITLE_CHARS: usize = 100;
const USE_CASE_DESCRIPTION_CHARS: usize = 200;
const USE_CASE_TOOLS: usize = 5;

pub fn guess_guest(title: &str) -> Option<String> {
    for pattern in GUEST_PATTERNS.iter() {
        let Some(caps) = pattern.captures(title) else {
            continue;
        };
        let name = caps[1].trim();
        let lower = name.to_lowercase();
        if name.split_whitespace().count() <= MAX_NAME_TOKENS
            && !NOT_A_NAME.iter().any(|w| lower.contains(w))
        {
            return Some(name.to_string());
        }
    }
    None
}

/// Vocabulary tools named anywhere in the description, in vocabulary order
pub fn find_tools(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    KNOWN_TOOLS
        .iter()
        .filter(|tool| lower.contains(&tool.to_lowercase()))
        .map(|tool| tool.to_string())
        .collect()
}

pub fn guess_category(title: &str, description: &str) -> Category {
    let text = format!("{} {}", title, description).to_lowercase();
    CATEGORY_BUCKETS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Productivity)
}

/// First non-empty paragraph of the description, else the title
pub fn summarize(title: &str, description: &str) -> String {
    description
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())
        .map(|p| truncate_chars(p, SUMMARY_CHARS).to_string())
        .unwrap_or_else(|| title.to_string())
}

pub fn sample_analysis(episode: &Episode) -> Analysis {
    let tools = find_tools(&episode.description);
    let summary = summarize(&episode.title, &episode.description);

    let use_case = EpisodeUseCase {
        title: truncate_chars(&episode.title, USE_CASE_TITLE_CHARS).to_string(),
        description: truncate_chars(&summary, USE_CASE_DESCRIPTION_CHARS).to_string(),
        tools: tools.iter().take(USE_CASE_TOOLS).cloned().collect(),
        category: guess_category(&episode.title, &episode.description),
        audience: Audience::Everyone,
        difficulty: Difficulty::Intermediate,
    };

    Analysis {
        guest_name: guess_guest(&episode.title),
        guest_role: None,
        summary,
        key_takeaways: Vec::new(),
        use_cases: vec![use_case],
        tools_mentioned: tools,
        notable_quotes: Vec::new(),
    }
}

/// Replace every episode's analysis with a generated one
pub fn generate_samples(episodes: &mut [Episode]) -> usize {
    for episode in episodes.iter_mut() {
        episode.analysis = Some(sample_analysis(episode));
    }
    episodes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::episode;

    // =========================================================================
    // Guests
    // =========================================================================

    #[test]
    fn test_guest_after_pipe_or_with() {
        assert_eq!(guess_guest("Ep2 | Jane Doe").as_deref(), Some("Jane Doe"));
        assert_eq!(
            guess_guest("Shipping faster | Jane Doe (Head of Product, Acme)").as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(guess_guest("Ep1: Building with Claude").as_deref(), Some("Claude"));
    }

    #[test]
    fn test_guest_possessive_after_colon() {
        assert_eq!(
            guess_guest("Inside the stack: Mike Chen's agent setup").as_deref(),
            Some("Mike Chen")
        );
    }

    #[test]
    fn test_rejected_candidate_tries_next_pattern() {
        // The pipe candidate has too many tokens; the "with" pattern succeeds
        assert_eq!(
            guess_guest("AI for ops | a very long list of things with Sam Lee").as_deref(),
            Some("Sam Lee")
        );
    }

    #[test]
    fn test_stop_words_reject_candidates() {
        assert_eq!(guess_guest("Ep3 | How I use agents"), None);
        assert_eq!(guess_guest("Working with the team"), None);
        assert_eq!(guess_guest("No markers here"), None);
    }

    // =========================================================================
    // Tools and categories
    // =========================================================================

    #[test]
    fn test_tools_matched_case_insensitively_in_vocabulary_order() {
        let tools = find_tools("We use cursor, then claude code and FIGMA.");
        assert_eq!(tools, vec!["Claude", "Claude Code", "Cursor", "Figma"]);
    }

    #[test]
    fn test_category_first_bucket_wins() {
        assert_eq!(guess_category("Design systems in code", ""), Category::Coding);
        assert_eq!(guess_category("Ep1: Building with Claude", ""), Category::Design);
        assert_eq!(guess_category("Hiring loops", ""), Category::Hiring);
        assert_eq!(guess_category("Plan your week", ""), Category::Productivity);
    }

    // =========================================================================
    // Analyses
    // =========================================================================

    #[test]
    fn test_summary_is_first_paragraph_or_title() {
        assert_eq!(summarize("T", "\n\n  First para.  \n\nSecond."), "First para.");
        assert_eq!(summarize("T", "   "), "T");
        assert_eq!(summarize("T", &"s".repeat(400)).chars().count(), 300);
    }

    #[test]
    fn test_sample_analysis_has_exactly_one_use_case() {
        let mut ep = episode("a", &"T".repeat(150), 600);
        ep.description = format!(
            "{}\n\nTools: ChatGPT, Claude, Cursor, Figma, Slack, Linear, Notion",
            "p".repeat(250)
        );

        let analysis = sample_analysis(&ep);
        assert_eq!(analysis.use_cases.len(), 1);
        let uc = &analysis.use_cases[0];
        assert_eq!(uc.title.chars().count(), 100);
        assert_eq!(uc.description.chars().count(), 200);
        assert_eq!(uc.tools.len(), 5);
        assert_eq!(uc.audience, Audience::Everyone);
        assert_eq!(uc.difficulty, Difficulty::Intermediate);
        assert_eq!(analysis.tools_mentioned.len(), 6);
        assert_eq!(analysis.guest_role, None);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut first = vec![episode("a", "Ep1: Building with Claude", 600)];
        let mut second = first.clone();
        generate_samples(&mut first);
        generate_samples(&mut second);
        assert_eq!(first, second);
    }
}
