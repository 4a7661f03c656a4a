use std::io::BufRead;

use anyhow::Result;

use crate::input::{non_empty, InputCollector};
use crate::model::ProductContext;
use crate::output::OutputHandler;

/// Phase 2: gather product and business context. Every item is optional
/// and can be typed directly or loaded from a file/folder.
pub fn run<R: BufRead>(
    input: &mut InputCollector<R>,
    out: &mut OutputHandler,
) -> Result<ProductContext> {
    println!("Now let's gather context about your product and business.\n");
    println!("For each item, you can type directly, provide a file/folder path, or skip.\n");

    let mut context = ProductContext::default();

    println!();
    out.print_section_rule("1. ICP / TARGET AUDIENCE")?;
    context.icp = input
        .text_or_file("Describe your Ideal Customer Profile (ICP) or target audience:", false)?
        .and_then(non_empty);

    println!();
    out.print_section_rule("2. PRODUCT VISION & STRATEGY")?;
    context.vision = input
        .text_or_file("What is your product vision and strategy?", false)?
        .and_then(non_empty);

    println!();
    out.print_section_rule("3. PRODUCT CATEGORY & DESCRIPTION")?;
    context.product_description = input
        .text_or_file("Describe your product category and what your product does:", false)?
        .and_then(non_empty);

    println!();
    out.print_section_rule("4. PRIMARY PRODUCT METRIC")?;
    context.primary_metric = input
        .text_or_file(
            "What is the #1 product metric you're trying to drive by addressing this opportunity?",
            false,
        )?
        .and_then(non_empty);

    println!();
    out.print_section_rule("5. CONSTRAINTS")?;
    context.constraints = input
        .text_or_file(
            "Are there areas where you don't want to play, or any other important constraints?",
            false,
        )?
        .and_then(non_empty);

    display_summary(&context, out)?;

    Ok(context)
}

fn display_summary(context: &ProductContext, out: &mut OutputHandler) -> Result<()> {
    println!();
    out.print_section_rule("CONTEXT SUMMARY")?;

    let items = [
        ("ICP/Target Audience", &context.icp),
        ("Product Vision", &context.vision),
        ("Product Description", &context.product_description),
        ("Primary Metric", &context.primary_metric),
        ("Constraints", &context.constraints),
    ];
    for (label, value) in items {
        if let Some(value) = value {
            out.print_success(&format!(
                "{}: Provided ({} chars)",
                label,
                value.chars().count()
            ))?;
        }
    }

    println!("\nTotal context items provided: {}/5", context.provided_count());
    Ok(())
}
