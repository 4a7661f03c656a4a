//! Markdown artifact for a completed session.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::model::{CriteriaSet, GeneratedIdea, Opportunity, ProductContext};

/// Render the session document: opportunity, context, criteria by
/// descending weight, optional top-3 ranking, then every idea.
pub fn build_markdown_output(
    ideas: &[GeneratedIdea],
    opportunity: &Opportunity,
    context: &ProductContext,
    criteria: &CriteriaSet,
    generated_at: DateTime<Local>,
) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "# Ideation Session Output")?;
    writeln!(output)?;
    writeln!(output, "*Generated: {}*", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(output)?;
    writeln!(output, "---")?;
    writeln!(output)?;

    writeln!(output, "## Opportunity")?;
    writeln!(output)?;
    writeln!(output, "**Problem/Desire:** {}", opportunity.description)?;
    if let Some(who) = &opportunity.who {
        writeln!(output, "\n**Who:** {}", who)?;
    }
    if let Some(ctx) = &opportunity.context {
        writeln!(output, "\n**Context:** {}", ctx)?;
    }
    writeln!(output)?;
    writeln!(output, "---")?;
    writeln!(output)?;

    writeln!(output, "## Context")?;
    if let Some(icp) = &context.icp {
        writeln!(output, "\n### Target Audience\n{}", icp)?;
    }
    if let Some(metric) = &context.primary_metric {
        writeln!(output, "\n### Primary Metric\n{}", metric)?;
    }
    writeln!(output)?;
    writeln!(output, "---")?;
    writeln!(output)?;

    writeln!(output, "## Evaluation Criteria")?;
    writeln!(output)?;
    for (criterion, weight) in criteria.pairs_by_weight_desc() {
        writeln!(output, "- {}: {}/5", criterion, weight)?;
    }

    let mut ranked: Vec<&GeneratedIdea> = ideas.iter().filter(|i| i.rank.is_some()).collect();
    if !ranked.is_empty() {
        ranked.sort_by_key(|i| i.rank);
        writeln!(output)?;
        writeln!(output, "---")?;
        writeln!(output)?;
        writeln!(output, "## Top 3 Force Ranked Ideas")?;
        for idea in ranked.iter().take(3) {
            writeln!(
                output,
                "\n{}. **{}** (Score: {:.1}/100)",
                idea.rank.unwrap_or(0),
                idea.title,
                idea.score
            )?;
        }
    }

    writeln!(output)?;
    writeln!(output, "---")?;
    writeln!(output)?;
    writeln!(output, "## Generated Ideas")?;
    for (i, idea) in ideas.iter().enumerate() {
        writeln!(output, "\n### Idea {}: {}", i + 1, idea.title)?;
        match idea.rank {
            Some(rank) => writeln!(output, "**Score:** {:.1}/100 | **Rank:** #{}", idea.score, rank)?,
            None => writeln!(output, "**Score:** {:.1}/100", idea.score)?,
        }
        writeln!(output, "\n{}", idea.content)?;
    }

    writeln!(output)?;
    writeln!(output, "---")?;
    writeln!(output)?;
    writeln!(output, "*Generated by Ideation Agent*")?;

    Ok(output)
}

/// Write the document to a timestamp-named file under the output
/// directory, creating it on demand. Returns the path written.
pub fn save_ideas_to_file(
    output_dir: &Path,
    ideas: &[GeneratedIdea],
    opportunity: &Opportunity,
    context: &ProductContext,
    criteria: &CriteriaSet,
) -> Result<PathBuf> {
    let now = Local::now();
    let filename = format!("ideation_session_{}.md", now.format("%Y%m%d_%H%M%S"));
    let filepath = output_dir.join(filename);

    let content = build_markdown_output(ideas, opportunity, context, criteria, now)?;

    fs::create_dir_all(output_dir)?;
    fs::write(&filepath, content)?;
    Ok(filepath)
}
