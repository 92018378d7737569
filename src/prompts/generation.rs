//! Prompts for research, question generation and the quality review.

/// Maximum number of characters of reference text sent to the research call.
pub const RESEARCH_INPUT_LIMIT: usize = 25_000;

/// System prompt for the research call.
pub const RESEARCH_AGENT_SYSTEM: &str = r#"You are an Expert Curriculum Researcher.
You analyze reference material for quantitative aptitude exams and extract the math categories it covers, its difficulty and its writing style.
OUTPUT VALID JSON ONLY. NO MARKDOWN. NO TEXT BEFORE/AFTER."#;

/// Builds the research request body for the given reference text.
///
/// The text is truncated to [`RESEARCH_INPUT_LIMIT`] characters.
pub fn build_research_prompt(reference_text: &str) -> String {
    let material: String = reference_text.chars().take(RESEARCH_INPUT_LIMIT).collect();
    format!(
        r#"Analyze the following reference material to extract specific Math Categories.

REFERENCE MATERIAL:
{}

TASK:
1. Identify ALL unique Categories/Domains listed (e.g., "Time Speed Distance", "Work & Time").
2. Analyze difficulty and style.

Respond with this JSON object:
{{
    "topics": ["Exact Category Name 1", "Exact Category Name 2", "Exact Category Name 3"],
    "difficulty_analysis": "Brief analysis",
    "style_rules": ["Rule 1", "Rule 2"]
}}"#,
        material
    )
}

/// Marker identifying the generator's system prompt.
pub const GENERATOR_ROLE: &str = "You are a Specialized Quant Generator.";

/// Builds the generator system prompt from the research catalog.
pub fn build_generator_system_prompt(topics: &[String], style_rules: &[String]) -> String {
    let topics_list = topics.join(", ");
    let style = if style_rules.is_empty() {
        "- Real-world story, multiple steps, one unambiguous numeric answer".to_string()
    } else {
        style_rules
            .iter()
            .map(|r| format!("- {}", r))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"{}

MANDATE: Generate multiple-choice quant word problems based on this research.
AVAILABLE CATEGORIES: {}
STYLE:
{}

RULES:
- Exactly 4 options.
- "correct_option" must be copied exactly from "options".
- "correct_answer_numeric" is the bare number of the correct answer.

OUTPUT JSON FORMAT:
{{
    "category": "The specific category chosen",
    "story": "The problem text...",
    "options": ["A", "B", "C", "D"],
    "correct_answer_numeric": "10",
    "correct_option": "10",
    "difficulty": "Easy/Medium/Hard"
}}"#,
        GENERATOR_ROLE, topics_list, style
    )
}

/// User message asking for one question about `topic`.
pub fn build_topic_prompt(topic: &str) -> String {
    format!("Generate a unique question specifically about: {}", topic)
}

/// Prefix of the quality review request.
pub const QUALITY_REVIEW_PREFIX: &str = "Review grammar. Return PASS or FAIL.";

/// Builds the quality review request for a question story.
pub fn build_quality_prompt(story: &str) -> String {
    format!("{} Q: {}", QUALITY_REVIEW_PREFIX, story)
}
