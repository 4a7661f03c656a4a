use std::io::BufRead;

use anyhow::Result;
use console::style;

use crate::input::InputCollector;
use crate::model::CriteriaSet;
use crate::output::OutputHandler;

const MAX_CUSTOM_CRITERIA: usize = 10;

/// Phase 3: pick or define evaluation criteria and weight each 1-5.
pub fn run<R: BufRead>(
    input: &mut InputCollector<R>,
    out: &mut OutputHandler,
    defaults: &[String],
) -> Result<CriteriaSet> {
    println!("Let's define criteria for evaluating ideas.\n");

    println!("Default criteria:");
    for (i, criterion) in defaults.iter().enumerate() {
        println!("  {}. {}", i + 1, criterion);
    }

    let use_defaults = input.confirm("\nWould you like to use these default criteria?")?;
    let criteria_list = if use_defaults {
        defaults.to_vec()
    } else {
        custom_criteria(input, defaults)?
    };

    println!("\nNow, let's rate the importance of each criterion.");
    println!("Rate each from 1 (least important) to 5 (most important)\n");

    let mut pairs = Vec::with_capacity(criteria_list.len());
    for criterion in criteria_list {
        let weight = input.rating(&format!("Importance of '{}':", criterion), 1, 5)?;
        pairs.push((criterion, weight));
    }

    let criteria = CriteriaSet::new(pairs);
    display_summary(&criteria, out)?;

    Ok(criteria)
}

fn custom_criteria<R: BufRead>(
    input: &mut InputCollector<R>,
    defaults: &[String],
) -> Result<Vec<String>> {
    println!("\nLet's define your custom criteria.");
    println!("You can add 1-10 criteria. Enter an empty line when done.\n");

    let mut criteria = Vec::new();
    for i in 0..MAX_CUSTOM_CRITERIA {
        let criterion = if i == 0 {
            input.text(&format!("Criterion {}:", i + 1), true)?
        } else {
            input.text(&format!("Criterion {} (or press Enter to finish):", i + 1), false)?
        };

        if criterion.is_empty() {
            break;
        }
        criteria.push(criterion);
    }

    if criteria.is_empty() {
        println!("No criteria provided. Using default criteria.");
        return Ok(defaults.to_vec());
    }
    Ok(criteria)
}

fn display_summary(criteria: &CriteriaSet, out: &mut OutputHandler) -> Result<()> {
    println!();
    out.print_section_rule("EVALUATION CRITERIA SUMMARY")?;
    println!();

    let pairs = criteria.pairs_by_weight_desc();
    let max_weight = pairs.iter().map(|(_, w)| *w).max().unwrap_or(0);

    println!("Criteria (sorted by importance):\n");
    for (criterion, weight) in pairs {
        let bars = "█".repeat(weight as usize) + &"░".repeat(5 - weight as usize);
        let star = if weight == max_weight { " ⭐" } else { "" };
        println!("  {}", criterion);
        println!("    {} {}/5{}\n", style(bars).cyan(), weight, star);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collector(script: &str) -> InputCollector<Cursor<Vec<u8>>> {
        InputCollector::new(Cursor::new(script.as_bytes().to_vec()))
    }

    fn defaults() -> Vec<String> {
        vec!["Impact".to_string(), "Effort".to_string()]
    }

    #[test]
    fn test_run_with_defaults() {
        let mut input = collector("y\n5\n2\n");
        let mut out = OutputHandler::new();

        let criteria = run(&mut input, &mut out, &defaults()).unwrap();
        assert_eq!(criteria.criteria_list, vec!["Impact", "Effort"]);
        assert_eq!(criteria.weights["Impact"], 5);
        assert_eq!(criteria.weights["Effort"], 2);
    }

    #[test]
    fn test_run_with_custom_criteria() {
        let script = "n\n\
                      Retention lift\n\
                      Time to ship\n\
                      \n\
                      4\n3\n";
        let mut input = collector(script);
        let mut out = OutputHandler::new();

        let criteria = run(&mut input, &mut out, &defaults()).unwrap();
        assert_eq!(criteria.criteria_list, vec!["Retention lift", "Time to ship"]);
        assert_eq!(criteria.weights["Retention lift"], 4);
        assert_eq!(criteria.len(), 2);
    }

    #[test]
    fn test_every_listed_criterion_has_a_weight() {
        let mut input = collector("y\n1\n1\n");
        let mut out = OutputHandler::new();

        let criteria = run(&mut input, &mut out, &defaults()).unwrap();
        for name in &criteria.criteria_list {
            assert!(criteria.weights.contains_key(name));
        }
    }
}
