/// Interactive C64 BASIC detokenizer console

use c64basic::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "errors", "exit", "help", "info", "lines", "load", "open", "quit", "save-text",
                "save-table", "tags",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".c64basic_history");
        p
    })
}

fn main() {
    println!("=== c64basic ===");
    println!("Interactive console for detokenizing Commodore 64 BASIC programs.");
    println!("Type 'help' for available commands\n");

    let mut rl = Editor::new().expect("Failed to create editor");
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut error_policy = ErrorPolicy::Replace;
    let mut decoded: Option<(String, BasicFile)> = None;

    loop {
        let readline = rl.readline("> ");
        let input = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => print_help(),
            "quit" | "exit" => {
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                println!("Goodbye!");
                break;
            }
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <path>");
                    continue;
                }
                let decoder = Decoder::new(error_policy);
                match decoder.decode_file(&parts[1]) {
                    Ok(file) => {
                        println!(
                            "Decoded {}: {} lines, {} tokens",
                            parts[1],
                            file.len(),
                            file.token_count()
                        );
                        decoded = Some((parts[1].clone(), file));
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "errors" => {
                if parts.len() < 2 {
                    println!("Error policy: {:?}", error_policy);
                    println!("Options: replace, raise");
                    continue;
                }
                match parts[1].to_lowercase().as_str() {
                    "replace" => {
                        error_policy = ErrorPolicy::Replace;
                        println!("Error policy set to replace");
                    }
                    "raise" => {
                        error_policy = ErrorPolicy::Raise;
                        println!("Error policy set to raise");
                    }
                    other => println!("Unknown error policy: {}. Options: replace, raise", other),
                }
            }
            "info" => {
                if let Some((name, file)) = &decoded {
                    println!("File: {}", name);
                    println!("Lines: {}", file.len());
                    println!("Tokens: {}", file.token_count());
                    println!("Contains ASSEMBLY: {}", file.has_assembly());
                } else {
                    println!("No file loaded. Use 'open <path>' first.");
                }
            }
            "lines" => {
                if let Some((_, file)) = &decoded {
                    let (lo, hi) = match (parts.get(1), parts.get(2)) {
                        (Some(lo), Some(hi)) => (
                            lo.parse().unwrap_or(0),
                            hi.parse().unwrap_or(u16::MAX),
                        ),
                        (Some(lo), None) => (lo.parse().unwrap_or(0), u16::MAX),
                        _ => (0, u16::MAX),
                    };
                    for (lineno, tokens) in file.lines_in_range(lo, hi) {
                        println!("{}", BasicFile::render_line(*lineno, tokens));
                    }
                } else {
                    println!("No file loaded.");
                }
            }
            "tags" => {
                if let Some((_, file)) = &decoded {
                    println!(
                        "{:<6} {:<4} {:<10} {:<12} {:<6} {}",
                        "line", "id", "bytes", "token", "tag", "language"
                    );
                    for row in file.table_rows() {
                        println!(
                            "{:<6} {:<4} {:<10} {:<12} {:<6} {}",
                            row.line, row.token_id, row.bytes, row.token, row.tag, row.language
                        );
                    }
                } else {
                    println!("No file loaded.");
                }
            }
            "save-text" => {
                if let Some((_, file)) = &decoded {
                    if parts.len() < 2 {
                        println!("Usage: save-text <path>");
                        continue;
                    }
                    match file.save_text(&parts[1]) {
                        Ok(()) => println!("Saved to: {}", parts[1]),
                        Err(e) => println!("Error: {}", e),
                    }
                } else {
                    println!("No file loaded.");
                }
            }
            "save-table" => {
                if let Some((_, file)) = &decoded {
                    if parts.len() < 2 {
                        println!("Usage: save-table <path>");
                        continue;
                    }
                    match file.save_table_csv(&parts[1]) {
                        Ok(()) => println!("Saved to: {}", parts[1]),
                        Err(e) => println!("Error: {}", e),
                    }
                } else {
                    println!("No file loaded.");
                }
            }
            _ => {
                println!("Unknown command: {}. Type 'help' for available commands.", command);
            }
        }
    }
}

/// Parse command line input, respecting quoted strings
fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(current.clone());
                    current.clear();
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn print_help() {
    println!("Available commands:");
    println!("  open <path>, load <path>   - Decode a tokenized BASIC file");
    println!("  errors [replace|raise]     - Show or set the unrecognized-command policy");
    println!("  info                       - Summarize the loaded program");
    println!("  lines [lo] [hi]            - Print decoded text, optionally line-range filtered");
    println!("  tags                       - Print the per-token tabular view");
    println!("  save-text <path>           - Write the decoded text to a file");
    println!("  save-table <path>          - Write the tabular view as CSV");
    println!("  help                       - Show this help");
    println!("  quit, exit                 - Exit");
}
