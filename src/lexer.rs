//! The context-sensitive lexer: the stateful heart of the decoder. Consumes
//! one line's payload byte-by-byte, maintains the per-line mode flags, and
//! emits the final chunked, tagged token list.

use crate::error::{DetokError, Result};
use crate::petscii::{self, AsciiClass};
use crate::tagger::Tagger;
use crate::tagset::Tagset;
use crate::token::{Language, Token};

/// Behavior when an unrecognized command byte (`>= 0x80` with no assigned
/// keyword) is encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Substitute U+FFFD for the unknown keyword and continue.
    #[default]
    Replace,
    /// Fail the whole file with [`DetokError::UnrecognizedCommand`].
    Raise,
}

/// Per-line transient lexer state: scoped to a value created at line
/// start and dropped at line end, never leaking across lines.
#[derive(Debug, Default)]
struct LineState {
    in_string: bool,
    in_comment: bool,
    in_print: bool,
    in_data: bool,
    quote_count: u8,
    out: Vec<Token>,
}

impl LineState {
    fn within_string_like(&self) -> bool {
        self.in_string || self.in_comment || self.in_print
    }
}

/// Resolve a non-printable byte's `petcat`-style glyph, falling back to
/// lowercase ASCII for printables and a verbatim Latin-1 pass-through
/// otherwise.
fn resolve_glyph(value: u8) -> String {
    if let Some(name) = petscii::control_glyph(value) {
        return format!("{{{}}}", name);
    }
    if (0x20..=0x7F).contains(&value) {
        return (value as char).to_ascii_lowercase().to_string();
    }
    (value as char).to_string()
}

fn is_statement_separator(token: &Token) -> bool {
    token.text == ":" || token.text == ";" || token.text.eq_ignore_ascii_case("THEN")
}

/// The stateful, context-sensitive BASIC lexer.
///
/// Holds only read-only references (a [`Tagger`]/[`Tagset`]) plus a fixed
/// [`ErrorPolicy`]; all per-line mutable state lives in a fresh
/// [`LineState`] built inside `lex_line`, so a `Lexer` may be reused
/// (even shared across threads) for any number of lines.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    tagset: &'a Tagset,
    tagger: Tagger<'a>,
    error_policy: ErrorPolicy,
}

impl<'a> Lexer<'a> {
    /// Build a lexer over the given tagset and error policy.
    pub fn new(tagset: &'a Tagset, error_policy: ErrorPolicy) -> Self {
        Lexer {
            tagset,
            tagger: Tagger::new(tagset),
            error_policy,
        }
    }

    /// Lex one line's payload into its final token list.
    pub fn lex_line(&self, lineno: u16, payload: &[u8]) -> Result<Vec<Token>> {
        let mut state = LineState::default();

        for &value in payload {
            let mut btoken = Token::new(value, lineno);

            if btoken.is_whitespace() && !state.within_string_like() {
                continue;
            }

            let append = if state.in_string {
                self.decode_string(&mut btoken, &mut state)
            } else if state.in_comment {
                self.decode_comment(&mut btoken, &mut state)
            } else if value < 0x20 {
                btoken.text = resolve_glyph(value);
                btoken.tag = self.tagger.parse_string();
                true
            } else if (0x20..=0x7F).contains(&value) {
                self.decode_ascii(&mut btoken, &mut state)
            } else {
                self.decode_command(&mut btoken, &mut state)?
            };

            self.disambiguate_unary(&mut state.out);

            if append {
                state.out.push(btoken);
            } else if let Some(last) = state.out.pop() {
                state.out.push(last.concat(btoken)?);
            } else {
                state.out.push(btoken);
            }

            self.check_system_var(&mut state.out);
        }

        Self::detect_line_language(&mut state.out);
        Ok(state.out)
    }

    fn decode_string(&self, btoken: &mut Token, state: &mut LineState) -> bool {
        if btoken.value == b'"' {
            state.quote_count += 1;
            btoken.text = "\"".to_string();
            btoken.tag = self.tagger.parse_string();
            if state.quote_count == 2 {
                state.quote_count = 0;
                state.in_string = false;
                return false; // closing quote chunks onto the open string token
            }
            return true; // opening quote starts a new string token
        }

        btoken.text = resolve_glyph(btoken.value);
        btoken.tag = self.tagger.parse_string();
        false
    }

    fn decode_comment(&self, btoken: &mut Token, state: &LineState) -> bool {
        btoken.text = resolve_glyph(btoken.value);
        btoken.tag = self.tagger.parse_comment();
        match state.out.last() {
            Some(last) if last.value != petscii::REM_BYTE => false,
            _ => true,
        }
    }

    fn decode_ascii(&self, btoken: &mut Token, state: &mut LineState) -> bool {
        btoken.text = (btoken.value as char).to_ascii_lowercase().to_string();
        btoken.tag = self.tagger.parse_ascii(btoken, &state.out);

        let mut append = !Self::belongs_to_previous(btoken, state.out.last());

        if btoken.value == b'"' {
            state.quote_count += 1;
            state.in_string = true;
            if state.quote_count == 2 {
                state.in_string = false;
                state.quote_count = 0;
            }
        }

        if state.in_string {
            btoken.tag = self.tagger.parse_string();
        } else if btoken.is_digit() || btoken.text == "." {
            if self.disambiguate_dot(btoken, &mut state.out) {
                append = false;
            }
        } else if btoken.is_sigil() {
            if let Some(last) = state.out.last_mut().filter(|t| t.is_alpha()) {
                let kind = if btoken.text == "$" { "string" } else { "integer" };
                last.tag = self.tagset.tag("variables", kind).to_string();
            } else {
                btoken.tag = self.tagset.tag("punctuations", "other").to_string();
            }
        } else if btoken.text == "(" {
            if let Some(last) = state.out.last_mut().filter(|t| t.tag.starts_with('V')) {
                let suffix = last.tag.chars().last().expect("tag is non-empty");
                last.tag = format!("VA{}", suffix);
            }
        }

        if state.in_data && btoken.text != "," {
            btoken.tag = self.tagset.tag("data", "data").to_string();
        }

        append
    }

    fn belongs_to_previous(btoken: &Token, last: Option<&Token>) -> bool {
        let Some(last) = last else {
            return false;
        };
        (btoken.is_letter() && last.is_letter())
            || (btoken.is_digit() && last.is_digit())
            || (btoken.is_digit() && last.is_letter())
            || (btoken.is_sigil() && last.tag.starts_with('V'))
    }

    /// Merge a `.` onto a preceding digit or a digit onto a preceding `.`,
    /// retagging the combined token as a real number. Returns whether the
    /// byte should be chunked onto the previous token.
    fn disambiguate_dot(&self, btoken: &mut Token, out: &mut [Token]) -> bool {
        let Some(last) = out.last_mut() else {
            return false;
        };
        let merges = (btoken.text == "." && last.is_digit()) || last.text.ends_with('.');
        if !merges {
            return false;
        }
        let real_tag = self.tagset.tag("numbers", "real").to_string();
        btoken.tag = real_tag.clone();
        last.tag = real_tag;
        true
    }

    fn decode_command(&self, btoken: &mut Token, state: &mut LineState) -> Result<bool> {
        let mut append = true;

        if petscii::RELATIONAL_BYTES.contains(&btoken.value) {
            if let Some(last) = state.out.last() {
                if petscii::RELATIONAL_BYTES.contains(&last.value) && last.value != btoken.value {
                    append = false;
                }
            }
        } else if btoken.value == petscii::DATA_BYTE && state.out.is_empty() {
            state.in_data = true;
        }

        if petscii::PRINT_BYTES.contains(&btoken.value) {
            state.in_print = true;
        }
        if btoken.value == petscii::REM_BYTE {
            state.in_comment = true;
        }

        btoken.text = match petscii::command_keyword(btoken.value) {
            Some(kw) => kw.to_string(),
            None => match self.error_policy {
                ErrorPolicy::Replace => "\u{FFFD}".to_string(),
                ErrorPolicy::Raise => {
                    return Err(DetokError::UnrecognizedCommand {
                        byte: btoken.value,
                        lineno: btoken.lineno,
                    })
                }
            },
        };

        btoken.tag = if btoken.value == petscii::EQUALS_BYTE {
            self.disambiguate_equal_sign(&state.out)
        } else {
            self.tagger.parse_command(btoken)
        };

        Ok(append)
    }

    /// `=` defaults to assignment; scanning backwards, an `IF` found
    /// before any statement separator (`:`, `;`, `THEN`) makes it
    /// relational instead.
    fn disambiguate_equal_sign(&self, out: &[Token]) -> String {
        for prior in out.iter().rev() {
            if prior.text.eq_ignore_ascii_case("IF") {
                return self.tagset.tag("operators", "relational").to_string();
            }
            if is_statement_separator(prior) {
                break;
            }
        }
        self.tagset.tag("operators", "assignment").to_string()
    }

    /// A `+`/`-` token is unary if it opens the line, or if the token
    /// before it isn't expression-producing (not a variable, number,
    /// string, or closing paren).
    fn disambiguate_unary(&self, out: &mut [Token]) {
        let len = out.len();
        if len == 0 {
            return;
        }
        if out[len - 1].text != "+" && out[len - 1].text != "-" {
            return;
        }

        let is_first = len == 1;
        let is_nonexpr = if len >= 2 {
            let prev = &out[len - 2];
            !(prev.tag.starts_with('V')
                || prev.tag.starts_with('N')
                || prev.tag.starts_with('S')
                || prev.text == ")")
        } else {
            true
        };

        if is_first || is_nonexpr {
            out[len - 1].tag = self.tagset.tag("operators", "unary").to_string();
        }
    }

    /// Retag `TI$`/`TIME$` and `ST`/`STATUS` variable tokens to their
    /// system-variable tags; also catches `TI`/`TIME` one slot back from
    /// the newest token (the case where a sigil has just been chunked
    /// onto the base name).
    fn check_system_var(&self, out: &mut [Token]) {
        let len = out.len();
        if len == 0 {
            return;
        }

        if out[len - 1].tag.starts_with('V') {
            let text = out[len - 1].text.to_lowercase();
            if text == "ti$" || text == "time$" {
                out[len - 1].tag = self.tagset.tag("system", "time").to_string();
            } else if text == "st" || text == "status" {
                out[len - 1].tag = self.tagset.tag("system", "IO").to_string();
            }
        } else if len > 2 {
            let text = out[len - 2].text.to_lowercase();
            if text == "ti" || text == "time" {
                out[len - 2].tag = self.tagset.tag("system", "time").to_string();
            }
        }
    }

    /// A line is `ASSEMBLY` iff its first token is `DATA` and every
    /// character of every subsequent token is a hex digit, comma, space
    /// or `$`.
    fn detect_line_language(out: &mut [Token]) {
        let Some(first) = out.first() else {
            return;
        };
        if !first.text.eq_ignore_ascii_case("DATA") {
            return;
        }
        let all_assembly = out[1..]
            .iter()
            .all(|t| t.text.chars().all(petscii::is_assembly_char));
        if all_assembly {
            for t in out.iter_mut() {
                t.language = Language::Assembly;
            }
        }
    }
}

/// Classify an ASCII byte for tests that want to assert on the partition
/// directly (the lexer itself goes through `petscii::classify_ascii`).
#[cfg(test)]
fn classify(byte: u8) -> Option<AsciiClass> {
    petscii::classify_ascii(byte)
}
