use std::io::BufRead;

use anyhow::Result;

use crate::input::{non_empty, InputCollector};
use crate::model::Opportunity;
use crate::output::OutputHandler;

/// Phase 1: capture the pain point and its clarifying context, then
/// confirm the summary. Declining the summary restarts the phase.
pub fn run<R: BufRead>(
    input: &mut InputCollector<R>,
    out: &mut OutputHandler,
) -> Result<Opportunity> {
    loop {
        println!("Let's understand the opportunity you want to address.\n");

        let description = input.text(
            "What is the customer pain point, wish, or desire you want to solve?",
            true,
        )?;

        println!("\nGreat! Now let me ask some clarifying questions...\n");

        let opportunity = Opportunity {
            description,
            who: non_empty(input.text(
                "Who is experiencing this problem/desire? (e.g., specific user persona, role, or segment)",
                false,
            )?),
            context: non_empty(input.text(
                "In which context or during the execution of which task does this occur?",
                false,
            )?),
            frequency: non_empty(input.text("How frequently does this problem/desire arise?", false)?),
            impact: non_empty(input.text(
                "What is the impact when this problem is not solved or desire is not met?",
                false,
            )?),
            current_solutions: non_empty(input.text(
                "How are people currently trying to solve this or fulfill this desire?",
                false,
            )?),
            additional_notes: non_empty(input.text(
                "Any other important context or details about this opportunity?",
                false,
            )?),
        };

        println!();
        out.print_section_rule("OPPORTUNITY SUMMARY")?;
        display_summary(&opportunity);

        if input.confirm("\nDoes this accurately capture the opportunity?")? {
            return Ok(opportunity);
        }
        println!("\nLet's refine the opportunity description...\n");
    }
}

fn display_summary(opportunity: &Opportunity) {
    println!("\nOpportunity: {}", opportunity.description);

    let optional_fields = [
        ("Who", &opportunity.who),
        ("Context", &opportunity.context),
        ("Frequency", &opportunity.frequency),
        ("Impact", &opportunity.impact),
        ("Current Solutions", &opportunity.current_solutions),
        ("Additional Notes", &opportunity.additional_notes),
    ];
    for (label, value) in optional_fields {
        if let Some(value) = value {
            println!("\n{}: {}", label, value);
        }
    }
}
