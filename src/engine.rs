use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::ApiClient;
use crate::config::{Config, Provider};
use crate::model::{CompetitiveInsight, CriteriaSet, ExampleIdea, GeneratedIdea, Opportunity, ProductContext};
use crate::output::OutputHandler;

/// Literal delimiter the prompt instructs the model to place before each
/// idea. The parser splits on this exact token; the instructions block in
/// `build_generation_prompt` and `parse_ideas` must stay in sync.
pub const IDEA_MARKER: &str = "### IDEA";

const MAX_IDEAS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Live,
    Mock,
}

/// Turns the collected session records into scored, optionally-ranked
/// solution ideas, either through a hosted provider or the deterministic
/// mock set.
pub struct IdeaEngine<'a> {
    config: &'a Config,
    mode: GenerationMode,
}

impl<'a> IdeaEngine<'a> {
    pub fn new(config: &'a Config, mode: GenerationMode) -> Self {
        Self { config, mode }
    }

    /// Generate ideas for the collected records. Provider failures of any
    /// kind fall back to the mock set; the only error this returns is an
    /// empty criteria set, which callers must never pass.
    pub async fn generate(
        &self,
        opportunity: &Opportunity,
        context: &ProductContext,
        criteria: &CriteriaSet,
        insights: &[CompetitiveInsight],
        examples: &[ExampleIdea],
        out: &mut OutputHandler,
    ) -> Result<Vec<GeneratedIdea>> {
        if criteria.is_empty() {
            return Err(anyhow::anyhow!(
                "criteria set must contain at least one criterion"
            ));
        }

        out.print_debug(&format!("mode = {:?}", self.mode))?;
        out.print_debug(&format!("provider = {}", self.config.provider()))?;

        if self.mode == GenerationMode::Mock {
            out.print_system("Generating mock ideas (API not configured)...\n")?;
            return Ok(mock_ideas());
        }

        let provider = self.config.provider();
        if provider == Provider::None {
            out.print_warning("No API key configured. Using mock generation.")?;
            return Ok(mock_ideas());
        }

        println!("Generating ideas using AI...");
        println!("This may take a moment...\n");

        match self.generate_live(provider, opportunity, context, criteria, insights, examples, out).await {
            Ok(ideas) if !ideas.is_empty() => {
                out.print_success(&format!("Generated {} ideas\n", ideas.len()))?;
                Ok(ideas)
            }
            Ok(_) => {
                out.print_warning("Provider response contained no ideas.")?;
                out.print_warning("Falling back to mock generation...\n")?;
                Ok(mock_ideas())
            }
            Err(err) => {
                out.print_error(&format!("Error during AI generation: {}", err))?;
                out.print_warning("Falling back to mock generation...\n")?;
                Ok(mock_ideas())
            }
        }
    }

    async fn generate_live(
        &self,
        provider: Provider,
        opportunity: &Opportunity,
        context: &ProductContext,
        criteria: &CriteriaSet,
        insights: &[CompetitiveInsight],
        examples: &[ExampleIdea],
        out: &mut OutputHandler,
    ) -> Result<Vec<GeneratedIdea>> {
        let prompt = build_generation_prompt(opportunity, context, criteria, insights, examples);
        out.print_debug(&format!("prompt length: {} characters", prompt.chars().count()))?;
        out.print_debug(&format!("model: {}", self.config.model))?;

        let endpoint = match provider {
            Provider::Anthropic => self.config.anthropic_base_url.clone(),
            _ => self.config.openai_base_url.clone(),
        };
        let client = ApiClient::new(
            provider,
            endpoint,
            self.config.api_key().unwrap_or_default().to_string(),
            self.config.model.clone(),
            self.config.max_tokens,
            self.config.temperature,
        );

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
        spinner.set_message("Waiting for the model...");
        spinner.enable_steady_tick(Duration::from_millis(120));

        let response = client.complete(&prompt).await;
        spinner.finish_and_clear();

        let response = response?;
        out.print_debug(&format!("response length: {} characters", response.chars().count()))?;

        Ok(parse_ideas(&response, criteria))
    }
}

/// Assemble the generation prompt from the collected records. Pure; the
/// section order is fixed and the closing instructions carry the marker
/// contract the parser relies on.
pub fn build_generation_prompt(
    opportunity: &Opportunity,
    context: &ProductContext,
    criteria: &CriteriaSet,
    insights: &[CompetitiveInsight],
    examples: &[ExampleIdea],
) -> String {
    let mut parts: Vec<String> = vec![
        "You are an expert product strategist and innovation consultant. Your task is to \
         generate 7-10 innovative solution ideas for a specific customer opportunity."
            .to_string(),
        "\n## OPPORTUNITY".to_string(),
        format!("\nProblem/Desire: {}", opportunity.description),
    ];

    if let Some(who) = &opportunity.who {
        parts.push(format!("Who: {}", who));
    }
    if let Some(ctx) = &opportunity.context {
        parts.push(format!("Context: {}", ctx));
    }
    if let Some(impact) = &opportunity.impact {
        parts.push(format!("Impact: {}", impact));
    }

    parts.push("\n## PRODUCT CONTEXT".to_string());
    if let Some(icp) = &context.icp {
        parts.push(format!("\nTarget Audience:\n{}", icp));
    }
    if let Some(vision) = &context.vision {
        parts.push(format!("\nProduct Vision:\n{}", vision));
    }
    if let Some(description) = &context.product_description {
        parts.push(format!("\nProduct Description:\n{}", description));
    }
    if let Some(metric) = &context.primary_metric {
        parts.push(format!("\nPrimary Metric:\n{}", metric));
    }
    if let Some(constraints) = &context.constraints {
        parts.push(format!("\nConstraints:\n{}", constraints));
    }

    if !insights.is_empty() {
        parts.push("\n## COMPETITIVE INSIGHTS".to_string());
        for insight in insights {
            parts.push(format!("\n- {}", insight.url));
            if let Some(notes) = &insight.notes {
                parts.push(format!("  {}", notes));
            }
        }
    }

    parts.push("\n## EXAMPLE IDEAS (for calibration)".to_string());
    for (i, example) in examples.iter().enumerate() {
        parts.push(format!("\n{}. {}", i + 1, example.description));
    }

    parts.push("\n## EVALUATION CRITERIA".to_string());
    parts.push("\nGenerated ideas should be optimized for:".to_string());
    for (criterion, weight) in criteria.pairs() {
        parts.push(format!("- {} (importance: {}/5)", criterion, weight));
    }

    parts.push("\n## INSTRUCTIONS".to_string());
    parts.push(
        r#"
Generate 7-10 innovative solution ideas. For each idea, provide:

1. **Title**: A clear, compelling title (5-10 words)
2. **Description**: A detailed explanation of the solution (2-4 paragraphs)
3. **How it addresses the opportunity**: Specific connection to the problem/desire
4. **Expected impact**: How it drives the primary metric
5. **Implementation considerations**: Key aspects to consider

Format each idea as follows:

---
### IDEA [NUMBER]: [TITLE]

**Description:**
[Detailed description]

**How it addresses the opportunity:**
[Explanation]

**Expected impact:**
[Impact analysis]

**Implementation considerations:**
[Key considerations]

---

After all ideas, provide:

## TOP 3 FORCE RANKED IDEAS

Rank the top 3 ideas and explain your reasoning based on the evaluation criteria.

1. **[Idea Title]** - [Reasoning]
2. **[Idea Title]** - [Reasoning]
3. **[Idea Title]** - [Reasoning]
"#
        .to_string(),
    );

    parts.join("\n")
}

/// Decompose a provider response into ideas. Text before the first marker
/// is preamble and dropped; a response with no markers yields an empty
/// list, which the engine treats as malformed.
pub fn parse_ideas(response: &str, criteria: &CriteriaSet) -> Vec<GeneratedIdea> {
    let mut ideas = Vec::new();

    let mut sections = response.split(IDEA_MARKER);
    sections.next();

    for section in sections {
        let section = section.trim();
        let mut lines = section.lines();
        let title_line = lines.next().unwrap_or("");
        let title = match title_line.split_once(':') {
            Some((_, rest)) => rest.trim().to_string(),
            None => title_line.trim().to_string(),
        };
        let content = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        let score = score_idea(&content, criteria);

        ideas.push(GeneratedIdea { title, content, score, rank: None });
    }

    if has_rank_header(response) {
        assign_force_ranking(&mut ideas);
    }

    ideas
}

fn has_rank_header(response: &str) -> bool {
    response.contains("TOP 3 FORCE RANKED") || response.contains("FORCE RANKED IDEAS")
}

/// Ranks 1..=3 go to the first three ideas in parse order. The ordering
/// the model asserts in its ranking prose is not re-mapped onto titles;
/// known limitation kept for output compatibility.
fn assign_force_ranking(ideas: &mut [GeneratedIdea]) {
    for (i, idea) in ideas.iter_mut().take(3).enumerate() {
        idea.rank = Some(i as u8 + 1);
    }
}

/// Length-based proxy score scaled by average criteria importance, capped
/// at 100 and rounded to one decimal. Longer, more detailed ideas score
/// higher; this is not a quality judgment.
pub fn score_idea(content: &str, criteria: &CriteriaSet) -> f64 {
    let average_weight = match criteria.average_weight() {
        Some(avg) => avg,
        None => return 0.0,
    };
    let base = (content.chars().count() as f64 / 1000.0).min(1.0);
    let score = base * average_weight * 100.0;
    (score.min(100.0) * 10.0).round() / 10.0
}

/// Deterministic fallback set used when no live generation path is
/// available or viable. Independent of every session input.
pub fn mock_ideas() -> Vec<GeneratedIdea> {
    let fixed = vec![
        GeneratedIdea {
            title: "Smart Notification System".to_string(),
            content: "**Description:**\nImplement an intelligent notification system that learns \
                      from user behavior to deliver timely, relevant updates without overwhelming \
                      users.\n\n**How it addresses the opportunity:**\nDirectly addresses user \
                      frustration with notification overload by using ML to predict optimal \
                      timing and relevance.\n\n**Expected impact:**\nExpected to increase user \
                      engagement by 25% while reducing notification dismissal rate by 40%.\n\n\
                      **Implementation considerations:**\nRequires user behavior tracking, ML \
                      model development, and A/B testing infrastructure."
                .to_string(),
            score: 85.0,
            rank: Some(1),
        },
        GeneratedIdea {
            title: "Contextual Quick Actions".to_string(),
            content: "**Description:**\nAdd context-aware quick actions that appear based on \
                      user's current task and historical patterns.\n\n**How it addresses the \
                      opportunity:**\nReduces friction in common workflows by anticipating user \
                      needs and surfacing relevant actions.\n\n**Expected impact:**\nCould reduce \
                      time-to-task completion by 30% for power users.\n\n**Implementation \
                      considerations:**\nNeeds careful UX design to avoid cluttering interface. \
                      Requires usage analytics."
                .to_string(),
            score: 82.0,
            rank: Some(2),
        },
        GeneratedIdea {
            title: "Collaborative Templates Library".to_string(),
            content: "**Description:**\nCreate a community-driven template library where users \
                      can share and discover pre-built workflows.\n\n**How it addresses the \
                      opportunity:**\nAddresses the cold start problem for new users and \
                      accelerates productivity.\n\n**Expected impact:**\nExpected to improve new \
                      user activation rate by 35%.\n\n**Implementation considerations:**\n\
                      Requires moderation system, quality controls, and discovery mechanisms."
                .to_string(),
            score: 78.0,
            rank: Some(3),
        },
        GeneratedIdea {
            title: "Automated Workflow Suggestions".to_string(),
            content: "**Description:**\nAnalyze user behavior to automatically suggest workflow \
                      optimizations and automation opportunities.\n\n**How it addresses the \
                      opportunity:**\nHelps users discover efficiency gains they might not know \
                      exist.\n\n**Expected impact:**\nCould increase feature adoption by 20% and \
                      reduce manual repetitive tasks.\n\n**Implementation considerations:**\n\
                      Requires sophisticated pattern recognition and non-intrusive suggestion UI."
                .to_string(),
            score: 75.0,
            rank: None,
        },
        GeneratedIdea {
            title: "Cross-Platform Sync Intelligence".to_string(),
            content: "**Description:**\nSmart synchronization that prioritizes and batches \
                      updates based on connection quality and device state.\n\n**How it addresses \
                      the opportunity:**\nAddresses frustration with slow syncing and conflicts \
                      across devices.\n\n**Expected impact:**\nExpected to reduce sync-related \
                      support tickets by 50%.\n\n**Implementation considerations:**\nComplex \
                      technical implementation requiring robust conflict resolution."
                .to_string(),
            score: 72.0,
            rank: None,
        },
    ];

    fixed.into_iter().take(MAX_IDEAS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionState;
    use pretty_assertions::assert_eq;

    fn criteria(pairs: &[(&str, u8)]) -> CriteriaSet {
        CriteriaSet::new(pairs.iter().map(|(n, w)| (n.to_string(), *w)).collect())
    }

    fn unit_criteria() -> CriteriaSet {
        criteria(&[("impact", 1), ("effort", 1)])
    }

    fn sample_opportunity() -> Opportunity {
        Opportunity {
            description: "Users abandon checkout due to surprise fees".to_string(),
            who: Some("first-time buyers".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_two_segments_no_rank_header() {
        let response = "Here are some ideas.\n\
                        ### IDEA 1: Fee Preview Widget\nShow fees early.\nMore detail.\n\
                        ### IDEA 2: Flat Shipping Tiers\nPredictable pricing.";
        let ideas = parse_ideas(response, &unit_criteria());

        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "Fee Preview Widget");
        assert_eq!(ideas[0].content, "Show fees early.\nMore detail.");
        assert_eq!(ideas[1].title, "Flat Shipping Tiers");
        assert!(ideas.iter().all(|i| i.rank.is_none()));
    }

    #[test]
    fn test_parse_title_without_colon_uses_whole_line() {
        let response = "### IDEA\nOne Big Idea\nbody";
        let ideas = parse_ideas(response, &unit_criteria());
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "One Big Idea");
        assert_eq!(ideas[0].content, "body");
    }

    #[test]
    fn test_parse_rank_header_ranks_first_three_in_parse_order() {
        let response = "### IDEA 1: A\nbody\n### IDEA 2: B\nbody\n### IDEA 3: C\nbody\n\
                        ### IDEA 4: D\nbody\n\n## TOP 3 FORCE RANKED IDEAS\n\
                        1. **D** - strongest\n2. **A** - second\n3. **B** - third";
        let ideas = parse_ideas(response, &unit_criteria());

        assert_eq!(ideas.len(), 4);
        // Positional assignment, not the ordering asserted in the prose.
        assert_eq!(ideas[0].rank, Some(1));
        assert_eq!(ideas[1].rank, Some(2));
        assert_eq!(ideas[2].rank, Some(3));
        assert_eq!(ideas[3].rank, None);
    }

    #[test]
    fn test_parse_no_markers_yields_empty() {
        let ideas = parse_ideas("The model ignored the format entirely.", &unit_criteria());
        assert!(ideas.is_empty());
    }

    #[test]
    fn test_score_exact_value() {
        // 500 chars at unit average weight: 0.5 * 1 * 100 = 50.0
        let content = "x".repeat(500);
        assert_eq!(score_idea(&content, &unit_criteria()), 50.0);
    }

    #[test]
    fn test_score_monotonic_up_to_cap() {
        let set = unit_criteria();
        let mut last = 0.0;
        for len in [0, 100, 500, 999, 1000, 2000] {
            let score = score_idea(&"x".repeat(len), &set);
            assert!(score >= last, "score regressed at length {}", len);
            last = score;
        }
        // Capped past 1000 characters.
        assert_eq!(
            score_idea(&"x".repeat(1000), &set),
            score_idea(&"x".repeat(5000), &set)
        );
    }

    #[test]
    fn test_score_never_exceeds_bound() {
        let set = criteria(&[("impact", 5), ("innovation", 5)]);
        assert_eq!(score_idea(&"x".repeat(3000), &set), 100.0);
    }

    #[test]
    fn test_score_empty_criteria_is_zero() {
        assert_eq!(score_idea("anything", &CriteriaSet::default()), 0.0);
    }

    #[test]
    fn test_mock_ideas_fixed_scores_and_ranks() {
        let ideas = mock_ideas();
        assert_eq!(ideas.len(), 5);

        let scores: Vec<f64> = ideas.iter().map(|i| i.score).collect();
        assert_eq!(scores, vec![85.0, 82.0, 78.0, 75.0, 72.0]);

        let ranks: Vec<Option<u8>> = ideas.iter().map(|i| i.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(2), Some(3), None, None]);
    }

    #[test]
    fn test_prompt_sections_and_order() {
        let state = SessionState {
            opportunity: sample_opportunity(),
            context: ProductContext {
                icp: Some("online shoppers".to_string()),
                primary_metric: Some("checkout completion rate".to_string()),
                ..Default::default()
            },
            criteria: criteria(&[("Impact", 5), ("Effort", 2)]),
            ..Default::default()
        };
        let examples = vec![ExampleIdea::new(1, "show total cost up front".to_string())];

        let prompt =
            build_generation_prompt(&state.opportunity, &state.context, &state.criteria, &[], &examples);

        assert!(prompt.contains("## OPPORTUNITY"));
        assert!(prompt.contains("Problem/Desire: Users abandon checkout due to surprise fees"));
        assert!(prompt.contains("Who: first-time buyers"));
        assert!(prompt.contains("Target Audience:\nonline shoppers"));
        assert!(prompt.contains("Primary Metric:\ncheckout completion rate"));
        assert!(!prompt.contains("## COMPETITIVE INSIGHTS"));
        assert!(prompt.contains("1. show total cost up front"));
        assert!(prompt.contains("- Impact (importance: 5/5)"));
        assert!(prompt.contains("- Effort (importance: 2/5)"));
        assert!(prompt.contains("### IDEA [NUMBER]: [TITLE]"));
        assert!(prompt.contains("## TOP 3 FORCE RANKED IDEAS"));

        let opportunity_at = prompt.find("## OPPORTUNITY").unwrap();
        let criteria_at = prompt.find("## EVALUATION CRITERIA").unwrap();
        let instructions_at = prompt.find("## INSTRUCTIONS").unwrap();
        assert!(opportunity_at < criteria_at && criteria_at < instructions_at);
    }

    #[test]
    fn test_prompt_includes_competitive_section_when_present() {
        let insights = vec![CompetitiveInsight {
            url: "https://example.com/rival".to_string(),
            notes: Some("transparent pricing page".to_string()),
        }];
        let examples = vec![ExampleIdea::new(1, "example".to_string())];
        let prompt = build_generation_prompt(
            &sample_opportunity(),
            &ProductContext::default(),
            &unit_criteria(),
            &insights,
            &examples,
        );

        assert!(prompt.contains("## COMPETITIVE INSIGHTS"));
        assert!(prompt.contains("- https://example.com/rival"));
        assert!(prompt.contains("  transparent pricing page"));
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_criteria() {
        let config = Config::default();
        let engine = IdeaEngine::new(&config, GenerationMode::Mock);
        let mut out = OutputHandler::new();

        let result = engine
            .generate(
                &sample_opportunity(),
                &ProductContext::default(),
                &CriteriaSet::default(),
                &[],
                &[],
                &mut out,
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_generate_mock_mode_ignores_inputs() {
        let config = Config::default();
        let engine = IdeaEngine::new(&config, GenerationMode::Mock);
        let mut out = OutputHandler::new();

        let ideas = engine
            .generate(
                &sample_opportunity(),
                &ProductContext::default(),
                &unit_criteria(),
                &[],
                &[],
                &mut out,
            )
            .await
            .unwrap();
        assert_eq!(ideas, mock_ideas());
    }

    #[tokio::test]
    async fn test_generate_live_without_provider_falls_back() {
        let config = Config::default();
        let engine = IdeaEngine::new(&config, GenerationMode::Live);
        let mut out = OutputHandler::new();

        let ideas = engine
            .generate(
                &sample_opportunity(),
                &ProductContext::default(),
                &unit_criteria(),
                &[],
                &[],
                &mut out,
            )
            .await
            .unwrap();
        assert_eq!(ideas, mock_ideas());
    }
}
