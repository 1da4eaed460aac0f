//! Interactive prompts.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// List `objects` and ask for one by number. `None` on cancel.
pub fn pick_object(objects: &[String]) -> Result<Option<String>> {
    println!("\nTracked objects:");
    for (i, object) in objects.iter().enumerate() {
        println!("{}. {}", i + 1, object);
    }

    let mut editor = DefaultEditor::new()?;
    let line = match editor.readline("\nEnter object number (0 to cancel): ") {
        Ok(line) => line,
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match selection(&line, objects.len()) {
        Some(0) => Ok(None),
        Some(n) => Ok(objects.get(n - 1).cloned()),
        None => {
            println!("Invalid selection.");
            Ok(None)
        }
    }
}

/// Ask a yes/no question; anything but `y`/`yes` is no.
pub fn confirm(question: &str) -> Result<bool> {
    let mut editor = DefaultEditor::new()?;
    match editor.readline(&format!("{} [y/N] ", question)) {
        Ok(answer) => Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Parse a menu choice in `0..=count`
fn selection(line: &str, count: usize) -> Option<usize> {
    line.trim().parse::<usize>().ok().filter(|n| *n <= count)
}
