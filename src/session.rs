use std::io::BufRead;

use anyhow::Result;

use crate::config::Config;
use crate::engine::{GenerationMode, IdeaEngine};
use crate::input::InputCollector;
use crate::model::SessionState;
use crate::output::OutputHandler;
use crate::phases;

/// Owns the session state and walks the phases in order. Each phase
/// returns a finished record that is stored here and never mutated again.
pub struct SessionManager<'a, R> {
    config: &'a Config,
    input: InputCollector<R>,
    out: OutputHandler,
    state: SessionState,
}

impl<'a, R: BufRead> SessionManager<'a, R> {
    pub fn new(config: &'a Config, input: InputCollector<R>, out: OutputHandler) -> Self {
        let state = SessionState { phase: 1, ..Default::default() };
        Self { config, input, out, state }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("Let's start your ideation session!\n");

        self.out.print_phase_header("PHASE 1: OPPORTUNITY DISCOVERY")?;
        self.state.opportunity = phases::opportunity::run(&mut self.input, &mut self.out)?;
        self.state.phase = 2;

        println!();
        self.out.print_phase_header("PHASE 2: CONTEXT GATHERING")?;
        self.state.context = phases::context::run(&mut self.input, &mut self.out)?;
        self.state.phase = 3;

        println!();
        self.out.print_phase_header("PHASE 3: EVALUATION CRITERIA")?;
        self.state.criteria =
            phases::criteria::run(&mut self.input, &mut self.out, &self.config.default_criteria)?;
        self.state.phase = 4;

        println!();
        self.out.print_phase_header("PHASE 4: COMPETITIVE ANALYSIS (OPTIONAL)")?;
        self.state.competitive_insights = phases::competitive::run(&mut self.input, &mut self.out)?;
        self.state.phase = 5;

        println!();
        self.out.print_phase_header("PHASE 5: EXAMPLE IDEAS")?;
        self.state.example_ideas = phases::examples::run(&mut self.input, &mut self.out)?;
        self.state.phase = 6;

        println!();
        self.out.print_phase_header("PHASE 6: GENERATING IDEAS")?;

        let mode = if self.config.has_api_key() {
            self.out
                .print_success(&format!("API key detected. Provider: {}", self.config.provider()))?;
            GenerationMode::Live
        } else {
            self.out.print_warning("WARNING: No API key found for Anthropic or OpenAI.")?;
            self.out.print_warning(
                "Please set ANTHROPIC_API_KEY or OPENAI_API_KEY, or add a key to the config file.",
            )?;
            println!("\nFor now, generating mock ideas for demonstration purposes...");
            GenerationMode::Mock
        };

        let engine = IdeaEngine::new(self.config, mode);
        self.state.generated_ideas = engine
            .generate(
                &self.state.opportunity,
                &self.state.context,
                &self.state.criteria,
                &self.state.competitive_insights,
                &self.state.example_ideas,
                &mut self.out,
            )
            .await?;
        self.state.phase = 7;

        println!();
        self.out.print_phase_header("PHASE 7: RESULTS & OUTPUT")?;
        phases::report::run(
            &mut self.input,
            &mut self.out,
            self.config,
            &self.state.generated_ideas,
            &self.state.opportunity,
            &self.state.context,
            &self.state.criteria,
        )?;

        println!();
        self.out.print_phase_header("SESSION COMPLETE")?;
        println!("Thank you for using Ideation Agent!");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Full scripted session: phase 1 through save, mock generation.
    #[tokio::test]
    async fn test_full_session_with_mock_generation() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.output_dir = dir.path().join("out");

        let script = "surprise fees at checkout\n\
                      \n\n\n\n\n\n\
                      y\n\
                      3\n3\n3\n3\n3\n\
                      y\n\
                      5\n4\n3\n2\n\
                      n\n\
                      show the full cost in the cart\n###\n\
                      ###\n\
                      y\n";
        let input = InputCollector::new(Cursor::new(script.as_bytes().to_vec()));
        let mut session = SessionManager::new(&config, input, OutputHandler::new());

        session.run().await.unwrap();

        assert_eq!(session.state.phase, 7);
        assert_eq!(session.state.generated_ideas.len(), 5);
        assert_eq!(session.state.opportunity.description, "surprise fees at checkout");
        assert_eq!(session.state.criteria.len(), 4);
        assert!(session.state.competitive_insights.is_empty());
        assert_eq!(session.state.example_ideas.len(), 1);

        let entries: Vec<_> = std::fs::read_dir(&config.output_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
