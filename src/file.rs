//! The `BasicFile` model: an ordered `(lineno, [Token])` sequence plus its
//! text and tabular serializers.

use std::path::Path;

use crate::error::Result;
use crate::token::Token;

/// One row of the tabular view: one per token, `token_id` restarting
/// at zero for each line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// The BASIC line number.
    pub line: u16,
    /// Zero-based token index within the line.
    pub token_id: usize,
    /// Rendered byte representation (`Token::byte_repr`).
    pub bytes: String,
    /// Rendered text (`Token::text`).
    pub token: String,
    /// Assigned tag.
    pub tag: String,
    /// Detected language for this token.
    pub language: String,
}

/// A decoded Commodore BASIC program: an ordered sequence of lines, each a
/// `(lineno, tokens)` pair. No uniqueness is enforced on line numbers — the
/// binary format doesn't guarantee it either.
#[derive(Debug, Clone, Default)]
pub struct BasicFile {
    lines: Vec<(u16, Vec<Token>)>,
}

impl BasicFile {
    /// Build an empty file.
    pub fn new() -> Self {
        BasicFile::default()
    }

    /// Append a new line's tokens at the end, preserving insertion order.
    pub fn add_line(&mut self, tokens: Vec<Token>, lineno: u16) {
        self.lines.push((lineno, tokens));
    }

    /// The decoded `(lineno, tokens)` pairs, in insertion order.
    pub fn lines(&self) -> &[(u16, Vec<Token>)] {
        &self.lines
    }

    /// Number of decoded lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether any line has been added yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total token count across every line.
    pub fn token_count(&self) -> usize {
        self.lines.iter().map(|(_, tokens)| tokens.len()).sum()
    }

    /// Whether any token in the file was tagged `ASSEMBLY` (i.e. the
    /// program embeds at least one inline machine-code `DATA` block).
    pub fn has_assembly(&self) -> bool {
        self.lines.iter().any(|(_, tokens)| {
            tokens
                .iter()
                .any(|t| t.language == crate::token::Language::Assembly)
        })
    }

    /// Render one line as `"<5-wide right-justified lineno> <tokens>"`.
    pub fn render_line(lineno: u16, tokens: &[Token]) -> String {
        let body = tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{:>5} {}", lineno, body)
    }

    /// The full UTF-8 text rendering: one `render_line` per decoded line,
    /// joined with `\n`.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|(lineno, tokens)| Self::render_line(*lineno, tokens))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the text rendering to `path`.
    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    /// The tabular view: one row per token, columns `[line, token_id,
    /// bytes, token, tag, language]`. Writing it to a spreadsheet/CSV sink
    /// is left to the caller; this is just the underlying data.
    pub fn table_rows(&self) -> Vec<TableRow> {
        let mut rows = Vec::with_capacity(self.token_count());
        for (lineno, tokens) in &self.lines {
            for (token_id, token) in tokens.iter().enumerate() {
                rows.push(TableRow {
                    line: *lineno,
                    token_id,
                    bytes: token.byte_repr.clone(),
                    token: token.text.clone(),
                    tag: token.tag.clone(),
                    language: token.language.to_string(),
                });
            }
        }
        rows
    }

    /// Write the tabular view as CSV to `path`, a convenience sink left
    /// deliberately simple (no external spreadsheet crate) — the sink
    /// format itself is a caller concern, not this crate's.
    pub fn save_table_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = String::from("line,token_id,bytes,token,tag,language\n");
        for row in self.table_rows() {
            out.push_str(&format!(
                "{},{},\"{}\",\"{}\",{},{}\n",
                row.line,
                row.token_id,
                row.bytes,
                row.token.replace('"', "\"\""),
                row.tag,
                row.language
            ));
        }
        std::fs::write(path, out)?;
        Ok(())
    }

    /// Filter the decoded lines to an inclusive line-number range,
    /// returning the matching `(lineno, tokens)` pairs.
    pub fn lines_in_range(&self, lo: u16, hi: u16) -> impl Iterator<Item = &(u16, Vec<Token>)> {
        self.lines
            .iter()
            .filter(move |(lineno, _)| *lineno >= lo && *lineno <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn token(text: &str, tag: &str, lineno: u16) -> Token {
        let mut t = Token::new(text.as_bytes()[0], lineno);
        t.text = text.to_string();
        t.tag = tag.to_string();
        t
    }

    #[test]
    fn test_add_line_preserves_order() {
        let mut file = BasicFile::new();
        file.add_line(vec![token("a", "VR", 20)], 20);
        file.add_line(vec![token("b", "VR", 10)], 10);
        assert_eq!(file.lines()[0].0, 20);
        assert_eq!(file.lines()[1].0, 10);
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn test_render_line_formatting() {
        let tokens = vec![token("PRINT", "CPR", 10), token("\"hi\"", "SST", 10)];
        assert_eq!(BasicFile::render_line(10, &tokens), "   10 PRINT \"hi\"");
    }

    #[test]
    fn test_to_text_joins_lines() {
        let mut file = BasicFile::new();
        file.add_line(vec![token("a", "VR", 10)], 10);
        file.add_line(vec![token("b", "VR", 20)], 20);
        assert_eq!(file.to_text(), "   10 a\n   20 b");
    }

    #[test]
    fn test_table_rows_restart_token_id_per_line() {
        let mut file = BasicFile::new();
        file.add_line(vec![token("a", "VR", 10), token("b", "VR", 10)], 10);
        file.add_line(vec![token("c", "VR", 20)], 20);

        let rows = file.table_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].token_id, 0);
        assert_eq!(rows[1].token_id, 1);
        assert_eq!(rows[2].token_id, 0);
        assert_eq!(rows[2].line, 20);
    }

    #[test]
    fn test_has_assembly() {
        let mut file = BasicFile::new();
        file.add_line(vec![token("a", "VR", 10)], 10);
        assert!(!file.has_assembly());

        let mut asm_token = token("a9", "DAT", 20);
        asm_token.language = crate::token::Language::Assembly;
        file.add_line(vec![asm_token], 20);
        assert!(file.has_assembly());
    }

    #[test]
    fn test_lines_in_range() {
        let mut file = BasicFile::new();
        file.add_line(vec![token("a", "VR", 10)], 10);
        file.add_line(vec![token("b", "VR", 20)], 20);
        file.add_line(vec![token("c", "VR", 30)], 30);

        let filtered: Vec<_> = file.lines_in_range(15, 25).collect();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].0, 20);
    }

    #[test]
    fn test_empty_file() {
        let file = BasicFile::new();
        assert!(file.is_empty());
        assert_eq!(file.to_text(), "");
        assert!(file.table_rows().is_empty());
    }
}
