use crate::error::Result;
use colored::*;
use serde::Serialize;

pub fn print_colored_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    let json_str = serde_json::to_string_pretty(data)?;
    println!("{}", colorize_json(&json_str));
    Ok(())
}

/// Color the keys of pretty-printed JSON, line by line
pub(crate) fn colorize_json(json_str: &str) -> String {
    json_str
        .lines()
        .map(|line| {
            let indent = line.len() - line.trim_start().len();
            let trimmed = line.trim_start();
            // Keys are the only quoted strings followed by `": `
            match trimmed.strip_prefix('"').and_then(|rest| rest.split_once("\": ")) {
                Some((key, value)) => format!("{}{}: {}", " ".repeat(indent), key.cyan(), value),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split an interactive command line into words, honouring single and double quotes
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    in_word = true;
                }
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}
