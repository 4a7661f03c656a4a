use std::io;

use console::style;

const RULE_WIDTH: usize = 60;

/// Owns all styled terminal output. Diagnostic lines only appear when the
/// debug flag is set.
pub struct OutputHandler {
    debug: bool,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self { debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn print_banner(&mut self) -> io::Result<()> {
        println!("{}", style("╔══════════════════════════════════════════════════════════╗").cyan().bold());
        println!("{}", style("║  IDEATION AGENT                                          ║").cyan().bold());
        println!("{}", style("║  Generate innovative solutions for customer opportunities║").cyan().bold());
        println!("{}", style("╚══════════════════════════════════════════════════════════╝").cyan().bold());
        println!();
        Ok(())
    }

    pub fn print_phase_header(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        println!("{}", style(&rule).cyan());
        println!("{}", style(title).cyan().bold());
        println!("{}\n", style(&rule).cyan());
        Ok(())
    }

    pub fn print_section_rule(&mut self, title: &str) -> io::Result<()> {
        let rule = "-".repeat(RULE_WIDTH);
        println!("{}", style(&rule).dim());
        println!("{}", style(title).bold());
        println!("{}", style(&rule).dim());
        Ok(())
    }

    pub fn print_success(&mut self, content: &str) -> io::Result<()> {
        println!("{} {}", style("✓").green().bold(), content);
        Ok(())
    }

    pub fn print_error(&mut self, content: &str) -> io::Result<()> {
        println!("{} {}", style("✗").red().bold(), style(content).red());
        Ok(())
    }

    pub fn print_warning(&mut self, content: &str) -> io::Result<()> {
        println!("{}", style(content).yellow());
        Ok(())
    }

    pub fn print_system(&mut self, content: &str) -> io::Result<()> {
        println!("{}", style(content).dim());
        Ok(())
    }

    pub fn print_debug(&mut self, content: &str) -> io::Result<()> {
        if self.debug {
            eprintln!("{} {}", style("DEBUG:").magenta().bold(), style(content).dim());
        }
        Ok(())
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
