use std::io::BufRead;

use anyhow::Result;
use console::style;

use crate::config::Config;
use crate::input::InputCollector;
use crate::model::{CriteriaSet, GeneratedIdea, Opportunity, ProductContext};
use crate::output::OutputHandler;
use crate::report;

/// Phase 7: show every idea and the force ranking, then persist all of
/// them or a selected subset. A failed write is reported; the session
/// still completes.
pub fn run<R: BufRead>(
    input: &mut InputCollector<R>,
    out: &mut OutputHandler,
    config: &Config,
    ideas: &[GeneratedIdea],
    opportunity: &Opportunity,
    context: &ProductContext,
    criteria: &CriteriaSet,
) -> Result<()> {
    display_all_ideas(ideas);
    display_force_ranking(ideas, out)?;

    println!();
    out.print_phase_header("SAVE IDEAS")?;

    let selected: Vec<GeneratedIdea> = if input.confirm("Would you like to save all ideas to a file?")? {
        ideas.to_vec()
    } else {
        println!("Which ideas would you like to save?");
        println!("Enter the idea numbers separated by commas (e.g., 1,3,5)");
        println!("Available ideas: 1-{}", ideas.len());

        let response = input.text("Idea numbers:", false)?;
        let indices = parse_selection(&response, ideas.len());
        if indices.is_empty() {
            println!("\nNo ideas saved.");
            return Ok(());
        }
        indices.into_iter().map(|i| ideas[i].clone()).collect()
    };

    match report::save_ideas_to_file(&config.output_dir, &selected, opportunity, context, criteria) {
        Ok(path) => {
            println!();
            out.print_success(&format!("Ideas saved to: {}", path.display()))?;
            println!("  ({} idea(s) saved)", selected.len());
        }
        Err(err) => {
            println!();
            out.print_error(&format!("Error saving file: {}", err))?;
        }
    }

    Ok(())
}

fn display_all_ideas(ideas: &[GeneratedIdea]) {
    println!("Generated Ideas:\n");

    for (i, idea) in ideas.iter().enumerate() {
        println!("{}", style("=".repeat(60)).cyan());
        println!("{}", style(format!("IDEA {}: {}", i + 1, idea.title)).bold());
        println!("{}", style("=".repeat(60)).cyan());
        println!("{}", idea.content);
        println!("\nScore: {:.1}/100", idea.score);
        if let Some(rank) = idea.rank {
            println!("Rank: #{}", rank);
        }
        println!();
    }
}

fn display_force_ranking(ideas: &[GeneratedIdea], out: &mut OutputHandler) -> Result<()> {
    let mut ranked: Vec<&GeneratedIdea> = ideas.iter().filter(|i| i.rank.is_some()).collect();
    if ranked.is_empty() {
        return Ok(());
    }
    ranked.sort_by_key(|i| i.rank);

    println!();
    out.print_phase_header("TOP 3 FORCE RANKED IDEAS")?;

    for idea in ranked.iter().take(3) {
        println!("{}. {}", idea.rank.unwrap_or(0), idea.title);
        println!("   Score: {:.1}/100", idea.score);
        if let Some(reasoning) = extract_ranking_reasoning(&idea.content) {
            let preview: String = reasoning.chars().take(200).collect();
            println!("   Reasoning: {}...", preview);
        }
        println!();
    }
    Ok(())
}

fn extract_ranking_reasoning(content: &str) -> Option<&str> {
    let after = content.split("**Force Ranking Reasoning:**").nth(1)?;
    Some(after.split("**").next().unwrap_or(after).trim())
}

/// Parse a comma-separated idea selection into zero-based indices.
/// Out-of-range numbers are warned and skipped; any unparsable token
/// abandons the selection entirely.
pub fn parse_selection(response: &str, count: usize) -> Vec<usize> {
    if response.is_empty() {
        return Vec::new();
    }

    let mut indices = Vec::new();
    for token in response.split(',') {
        match token.trim().parse::<usize>() {
            Ok(num) if (1..=count).contains(&num) => indices.push(num - 1),
            Ok(num) => {
                println!(
                    "{}",
                    style(format!("Warning: Ignoring invalid idea number: {}", num)).yellow()
                );
            }
            Err(_) => {
                println!("{}", style("Invalid format. No ideas saved.").yellow());
                return Vec::new();
            }
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock_ideas;
    use std::io::Cursor;

    fn collector(script: &str) -> InputCollector<Cursor<Vec<u8>>> {
        InputCollector::new(Cursor::new(script.as_bytes().to_vec()))
    }

    #[test]
    fn test_parse_selection_valid_and_out_of_range() {
        assert_eq!(parse_selection("1,3,5", 5), vec![0, 2, 4]);
        assert_eq!(parse_selection(" 2 , 9 ", 5), vec![1]);
    }

    #[test]
    fn test_parse_selection_invalid_format_saves_nothing() {
        assert!(parse_selection("1,two,3", 5).is_empty());
        assert!(parse_selection("", 5).is_empty());
    }

    #[test]
    fn test_extract_ranking_reasoning() {
        let content = "body\n**Force Ranking Reasoning:**\nhighest leverage\n**Next:**";
        assert_eq!(extract_ranking_reasoning(content), Some("highest leverage"));
        assert!(extract_ranking_reasoning("no marker here").is_none());
    }

    #[test]
    fn test_run_save_all_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.output_dir = dir.path().join("out");

        let mut input = collector("y\n");
        let mut out = OutputHandler::new();
        let opportunity = Opportunity {
            description: "surprise fees".to_string(),
            ..Default::default()
        };
        let criteria = CriteriaSet::new(vec![("Impact".to_string(), 5)]);

        run(
            &mut input,
            &mut out,
            &config,
            &mock_ideas(),
            &opportunity,
            &ProductContext::default(),
            &criteria,
        )
        .unwrap();

        let entries: Vec<_> = std::fs::read_dir(config.output_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_run_selection_declined_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.output_dir = dir.path().join("out");

        let mut input = collector("n\n\n");
        let mut out = OutputHandler::new();
        let opportunity = Opportunity {
            description: "surprise fees".to_string(),
            ..Default::default()
        };
        let criteria = CriteriaSet::new(vec![("Impact".to_string(), 5)]);

        run(
            &mut input,
            &mut out,
            &config,
            &mock_ideas(),
            &opportunity,
            &ProductContext::default(),
            &criteria,
        )
        .unwrap();

        assert!(!config.output_dir.exists());
    }
}
