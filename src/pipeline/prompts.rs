//! Prompt text for the two model passes

pub fn analysis_system(show_name: &str) -> String {
    format!(
        "You are an expert analyst for AI workflows and use cases.\n\
         You will be given a podcast transcript from \"{}\", a show where guests share practical AI workflows.\n\
         Extract structured information from the transcript.",
        show_name
    )
}

pub const EXTRACTION_INSTRUCTIONS: &str = r#"Analyze this podcast content and extract the following information as JSON.

Return ONLY valid JSON with this exact structure:
{
  "guest_name": "Full Name",
  "guest_role": "Title at Company",
  "summary": "2-3 sentence summary of the episode",
  "key_takeaways": ["takeaway 1", "takeaway 2", "takeaway 3"],
  "use_cases": [
    {
      "title": "Short descriptive title of the workflow/use case",
      "description": "1-2 sentence description of what the workflow does",
      "tools": ["Tool1", "Tool2"],
      "category": "one of: coding, writing, design, automation, data-analysis, productivity, hiring, marketing, research, personal, other",
      "audience": "one of: engineers, product-managers, designers, executives, marketers, everyone, non-technical",
      "difficulty": "one of: beginner, intermediate, advanced"
    }
  ],
  "tools_mentioned": ["Tool1", "Tool2", "Tool3"],
  "notable_quotes": ["A short impactful quote from the episode"]
}

Rules:
- Extract ALL distinct use cases / workflows discussed, not just the main one
- Be specific in use case titles: "Automate CRM updates with Claude + Zapier" is better than "CRM automation"
- tools_mentioned should be a comprehensive list of every tool, product, or platform named
- If you cannot determine a field, use null
- Return ONLY the JSON object, no markdown fencing, no explanation

CONTENT:
"#;

pub fn enrichment_system(show_name: &str) -> String {
    format!(
        r#"You are an expert curator of AI use cases. You will be given a batch of AI use cases extracted from the "{}" podcast. Your job is two-fold:

1. **Assign 1-2 intent tags** to each use case from this fixed set:
   - "ship-faster": helps people get real work done more efficiently
   - "automate": eliminates tedious, repetitive work
   - "tinker": personal projects, side quests, creative exploration
   - "get-inspired": novel, surprising, "I didn't know you could do that" ideas
   - "level-up": learning, growing, getting better at your craft
   - "think-strategically": planning, decision-making, seeing the big picture

2. **Flag the standout picks**: use cases that are especially useful, surprising, creative, or broadly applicable. Across ALL batches combined we want roughly 6-8% of use cases flagged, so flag about 3-4 per batch of 50. For each pick, write a short (1 sentence) reason explaining why it stands out.

Be thoughtful about intent assignment. A use case can have 1 or 2 intents, but every use case must have at least 1. Choose the most fitting; don't default to "ship-faster" for everything."#,
        show_name
    )
}

pub const ENRICHMENT_INSTRUCTIONS: &str = r#"Here is a batch of use cases. For each one, return a JSON array with one object per use case, in the same order.

Each object should have:
- "index": the use case's index number (as provided)
- "intents": array of 1-2 intent tags from the allowed set
- "is_pick": boolean, true only for the ~3-4 most standout use cases in this batch
- "pick_reason": a short sentence explaining why this stands out (null if is_pick is false)

Return ONLY a valid JSON array, no markdown fencing, no explanation.

ALLOWED INTENTS: "ship-faster", "automate", "tinker", "get-inspired", "level-up", "think-strategically"

USE CASES:
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Audience, Category, Difficulty, Intent};

    #[test]
    fn test_extraction_instructions_list_every_vocabulary_value() {
        for c in Category::ALL {
            assert!(EXTRACTION_INSTRUCTIONS.contains(c.as_str()), "missing {}", c);
        }
        for a in Audience::ALL {
            assert!(EXTRACTION_INSTRUCTIONS.contains(a.as_str()), "missing {}", a);
        }
        for d in Difficulty::ALL {
            assert!(EXTRACTION_INSTRUCTIONS.contains(d.as_str()), "missing {}", d);
        }
    }

    #[test]
    fn test_enrichment_prompts_list_every_intent() {
        let system = enrichment_system("Show");
        for intent in Intent::ALL {
            let quoted = format!("\"{}\"", intent);
            assert!(system.contains(&quoted));
            assert!(ENRICHMENT_INSTRUCTIONS.contains(&quoted));
        }
    }

    #[test]
    fn test_show_name_is_interpolated() {
        assert!(analysis_system("How I AI").contains("\"How I AI\""));
        assert!(enrichment_system("How I AI").contains("\"How I AI\" podcast"));
    }
}
