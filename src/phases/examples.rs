use std::io::BufRead;

use anyhow::Result;

use crate::input::InputCollector;
use crate::model::{ExampleIdea, ExamplePatterns};
use crate::output::OutputHandler;

const MAX_EXAMPLES: usize = 5;

/// Phase 5: collect 1-5 seed ideas to calibrate generation. The first is
/// required; an empty response ends the collection early.
pub fn run<R: BufRead>(
    input: &mut InputCollector<R>,
    out: &mut OutputHandler,
) -> Result<Vec<ExampleIdea>> {
    println!("To help calibrate the idea generation, please provide 1-5 example ideas.\n");
    println!("These don't need to be your best ideas - they help me understand:");
    println!("  • The level of detail you're looking for");
    println!("  • The types of solutions you're interested in");
    println!("  • The scope and scale of ideas\n");
    println!("You can provide 1-5 ideas. Enter an empty response when done.\n");

    let mut examples = Vec::new();
    for i in 0..MAX_EXAMPLES {
        println!();
        out.print_section_rule(&format!("EXAMPLE IDEA {}/{} (or press Enter to finish)", i + 1, MAX_EXAMPLES))?;

        let description = input.multiline("Describe the idea:", i == 0)?;
        if description.is_empty() && i > 0 {
            println!("\nFinished with {} example idea(s).", i);
            break;
        }
        examples.push(ExampleIdea::new(i + 1, description));
    }

    display_summary(&examples, out)?;

    Ok(examples)
}

fn display_summary(examples: &[ExampleIdea], out: &mut OutputHandler) -> Result<()> {
    println!();
    out.print_section_rule("EXAMPLE IDEAS SUMMARY")?;
    println!();

    out.print_success(&format!("Collected {} example ideas", examples.len()))?;

    if let Some(patterns) = ExamplePatterns::analyze(examples) {
        println!("\nPattern Analysis:");
        println!("  • Average length: {} characters", patterns.avg_length);
        println!("  • Average words: {} words", patterns.avg_word_count);
        println!("  • Detail level: {}", patterns.detail_level);
    }

    println!("\nExample ideas preview:");
    for example in examples {
        let preview: String = example.description.chars().take(80).collect();
        let ellipsis = if example.description.chars().count() > 80 { "..." } else { "" };
        println!("  {}. {}{}", example.id, preview, ellipsis);
    }
    Ok(())
}
