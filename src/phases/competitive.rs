use std::io::BufRead;

use anyhow::Result;
use console::style;

use crate::input::{non_empty, InputCollector};
use crate::model::CompetitiveInsight;
use crate::output::OutputHandler;

/// Phase 4: optional competitor/alternative review. URLs must carry an
/// http(s) scheme; each gets a free-form notes block.
pub fn run<R: BufRead>(
    input: &mut InputCollector<R>,
    out: &mut OutputHandler,
) -> Result<Vec<CompetitiveInsight>> {
    println!("Would you like to review competitors, user alternatives, or other");
    println!("interesting players for inspiration?\n");

    if !input.confirm("Include competitive analysis?")? {
        println!("\nSkipping competitive analysis.");
        return Ok(Vec::new());
    }

    println!("\nGreat! Let's gather some competitive intelligence.\n");
    println!("Please provide URLs to competitors or alternative solutions.");
    println!("You can add multiple URLs (enter empty line when done).\n");

    let mut urls: Vec<String> = Vec::new();
    loop {
        let url = input.text(&format!("URL {} (or press Enter to finish):", urls.len() + 1), false)?;
        if url.is_empty() {
            break;
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            println!(
                "{}",
                style("Please enter a valid URL starting with http:// or https://").yellow()
            );
            continue;
        }
        urls.push(url);
    }

    if urls.is_empty() {
        println!("\nNo URLs provided. Skipping competitive analysis.");
        return Ok(Vec::new());
    }

    println!("\n{} URL(s) provided.", urls.len());
    println!("\nFor each competitor, please provide your observations or notes:");
    println!("(This will help inform the idea generation)\n");

    let mut insights = Vec::with_capacity(urls.len());
    for (i, url) in urls.into_iter().enumerate() {
        println!("\n{}. {}", i + 1, url);
        let notes = input.multiline("What's interesting about this competitor/alternative?", false)?;
        insights.push(CompetitiveInsight { url, notes: non_empty(notes) });
    }

    display_summary(&insights, out)?;

    Ok(insights)
}

fn display_summary(insights: &[CompetitiveInsight], out: &mut OutputHandler) -> Result<()> {
    println!();
    out.print_section_rule("COMPETITIVE INSIGHTS SUMMARY")?;
    println!();

    for (i, insight) in insights.iter().enumerate() {
        println!("{}. {}", i + 1, insight.url);
        if let Some(notes) = &insight.notes {
            let preview: String = notes.chars().take(100).collect();
            let ellipsis = if notes.chars().count() > 100 { "..." } else { "" };
            println!("   Notes: {}{}\n", preview, ellipsis);
        }
    }
    Ok(())
}
