use std::io::{self, BufRead as _, Write as _};

use anyhow::{Context as _, Result};

/// Asks a yes/no question on the terminal. An empty answer means yes; end of input means no.
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    print!("{question} (Y/n): ");
    if assume_yes {
        println!("y");
        return Ok(true);
    }
    io::stdout().flush().context("failed to flush stdout")?;

    let mut answer = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read answer")?;
    if read == 0 {
        println!();
        return Ok(false);
    }

    Ok(parse_answer(&answer))
}

fn parse_answer(answer: &str) -> bool {
    !matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_yes_answers_accept() {
        assert!(parse_answer("\n"));
        assert!(parse_answer("Y\n"));
        assert!(parse_answer("yes"));
    }

    #[test]
    fn no_answers_decline() {
        assert!(!parse_answer("n\n"));
        assert!(!parse_answer(" No "));
    }
}
