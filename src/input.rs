use std::fmt;
use std::fs;
use std::io::{self, BufRead, BufReader, Stdin, Write};
use std::path::PathBuf;

use anyhow::Result;
use console::style;
use walkdir::WalkDir;

/// Sentinel error for a closed stdin. The top level maps it to a clean
/// exit rather than a failure.
#[derive(Debug)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session interrupted by user")
    }
}

impl std::error::Error for Interrupted {}

/// Line-oriented prompt/response collection. Generic over the reader so
/// tests can script a session.
pub struct InputCollector<R> {
    reader: R,
}

impl InputCollector<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> InputCollector<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut buf = String::new();
        let n = self.reader.read_line(&mut buf)?;
        if n == 0 {
            return Err(Interrupted.into());
        }
        Ok(buf.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Single-line input. Required fields re-prompt until non-empty.
    pub fn text(&mut self, prompt: &str, required: bool) -> Result<String> {
        let suffix = if required {
            " (required)"
        } else {
            " (optional, press Enter to skip)"
        };

        loop {
            println!("{}{}", style(prompt).bold(), style(suffix).dim());
            print!("> ");
            io::stdout().flush()?;
            let response = self.read_line()?.trim().to_string();

            if required && response.is_empty() {
                println!("{}", style("This field is required. Please provide a response.").yellow());
                continue;
            }
            return Ok(response);
        }
    }

    /// Multiline input terminated by a lone `###` line.
    pub fn multiline(&mut self, prompt: &str, required: bool) -> Result<String> {
        let suffix = if required {
            " (required)"
        } else {
            " (optional, press Enter to skip)"
        };

        loop {
            println!("{}{}", style(prompt).bold(), style(suffix).dim());
            println!("{}", style("(Enter '###' on a new line when done)").dim());

            let mut lines = Vec::new();
            loop {
                let line = self.read_line()?;
                if line.trim() == "###" {
                    break;
                }
                lines.push(line);
            }
            let response = lines.join("\n").trim().to_string();

            if required && response.is_empty() {
                println!("{}", style("This field is required. Please provide a response.").yellow());
                continue;
            }
            return Ok(response);
        }
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            println!("{} {}", style(prompt).bold(), style("(y/n)").dim());
            print!("> ");
            io::stdout().flush()?;

            match self.read_line()?.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("{}", style("Please answer 'y' or 'n'").yellow()),
            }
        }
    }

    /// Numbered menu selection; returns the chosen index.
    pub fn choice(&mut self, prompt: &str, options: &[&str]) -> Result<usize> {
        println!("\n{}", style(prompt).bold());
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }

        loop {
            print!("\nEnter choice (1-{}): ", options.len());
            io::stdout().flush()?;

            match self.read_line()?.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= options.len() => return Ok(n - 1),
                _ => println!(
                    "{}",
                    style(format!("Please enter a valid number between 1 and {}", options.len()))
                        .yellow()
                ),
            }
        }
    }

    /// Integer rating in [min, max].
    pub fn rating(&mut self, prompt: &str, min: u8, max: u8) -> Result<u8> {
        loop {
            println!("{} {}", style(prompt).bold(), style(format!("({}-{})", min, max)).dim());
            print!("> ");
            io::stdout().flush()?;

            match self.read_line()?.trim().parse::<u8>() {
                Ok(n) if n >= min && n <= max => return Ok(n),
                _ => println!(
                    "{}",
                    style(format!("Please enter a valid number between {} and {}", min, max))
                        .yellow()
                ),
            }
        }
    }

    /// Three-way collection: type directly, load from a file/folder path,
    /// or skip. Skipping a required field re-prompts.
    pub fn text_or_file(&mut self, prompt: &str, required: bool) -> Result<Option<String>> {
        loop {
            println!("\n{}", style(prompt).bold());
            let selected = self.choice(
                "How would you like to provide this?",
                &["Type it directly", "Provide file/folder path", "Skip"],
            )?;

            match selected {
                0 => return Ok(Some(self.multiline("Please enter the content:", required)?)),
                1 => {
                    let path = self.text("Enter the file or folder path:", false)?;
                    if path.is_empty() {
                        return Ok(None);
                    }
                    match read_path_content(&path) {
                        Some(content) => {
                            println!(
                                "{}",
                                style(format!(
                                    "✓ Successfully loaded content ({} characters)",
                                    content.chars().count()
                                ))
                                .green()
                            );
                            return Ok(Some(content));
                        }
                        None => {
                            println!("{}", style("Failed to read file. Let's try again.").yellow());
                        }
                    }
                }
                _ => {
                    if required {
                        println!("{}", style("This field is required.").yellow());
                        continue;
                    }
                    return Ok(None);
                }
            }
        }
    }
}

/// Read a file, or concatenate the `.txt`/`.md` files directly inside a
/// folder, each under a `=== name ===` header. None on any read failure.
pub fn read_path_content(path: &str) -> Option<String> {
    let expanded = expand_home(path);

    if !expanded.exists() {
        println!("{}", style(format!("Error: File not found: {}", path)).red());
        return None;
    }

    if expanded.is_dir() {
        let mut parts = Vec::new();
        for entry in WalkDir::new(&expanded)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type().is_file() && (name.ends_with(".txt") || name.ends_with(".md")) {
                match fs::read_to_string(entry.path()) {
                    Ok(content) => parts.push(format!("=== {} ===\n{}\n", name, content)),
                    Err(err) => {
                        println!("{}", style(format!("Error reading file: {}", err)).red());
                        return None;
                    }
                }
            }
        }
        if parts.is_empty() {
            return None;
        }
        return Some(parts.join("\n"));
    }

    match fs::read_to_string(&expanded) {
        Ok(content) => Some(content),
        Err(err) => {
            println!("{}", style(format!("Error reading file: {}", err)).red());
            None
        }
    }
}

/// Collapse an empty or whitespace-only answer to None.
pub fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
