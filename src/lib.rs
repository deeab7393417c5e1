/*!
# c64basic

A Rust library for detokenizing Commodore 64 BASIC program files into
human-readable ASCII source, with a context-sensitive lexer that tags
every token for downstream corpus analysis.

## Features

- Binary line-record parsing of tokenized PRG/BASIC files
- A stateful, context-sensitive lexer resolving string vs. command bytes,
  unary vs. binary signs, multi-byte relational operators, real vs.
  integer numerals, typed variable suffixes, array-access parentheses,
  inline assembly in `DATA` blocks and system variables
- A declarative tagset (category -> subcategory -> tag) loaded once and
  consulted read-only by a stateless tagger
- Text and tabular output, suitable for corpus/spreadsheet pipelines

## Quick Start

```rust,no_run
use c64basic::{Decoder, ErrorPolicy};

let decoder = Decoder::new(ErrorPolicy::Replace);
let file = decoder.decode_file("program.prg")?;

println!("{}", file.to_text());
for row in file.table_rows() {
    println!("{} {} {} {} {} {}", row.line, row.token_id, row.bytes, row.token, row.tag, row.language);
}
# Ok::<(), c64basic::DetokError>(())
```

## Modules

- `petscii`: PETSCII lookup tables (command keywords, control glyphs, ASCII classes)
- `tagset`: the declarative tag catalog
- `token`: the `Token` value object and its chunking operation
- `file`: `BasicFile`, the decoded program and its serializers
- `tagger`: the stateless `Tagger`
- `reader`: the binary line-record parser
- `lexer`: the context-sensitive lexer
- `decoder`: the `Decoder` facade tying the above together
- `error`: error types and the `Result` alias
*/

#![warn(missing_docs)]

/// The `Decoder` facade tying the reader, lexer and tagset together
pub mod decoder;
/// Error types and the `Result` alias
pub mod error;
/// The decoded `BasicFile` model and its text/tabular serializers
pub mod file;
/// The context-sensitive lexer
pub mod lexer;
/// PETSCII lookup tables
pub mod petscii;
/// The binary line-record parser
pub mod reader;
/// The stateless tagger
pub mod tagger;
/// The declarative tagset
pub mod tagset;
/// The `Token` value object
pub mod token;

pub use decoder::Decoder;
pub use error::{DetokError, Result};
pub use file::{BasicFile, TableRow};
pub use lexer::{ErrorPolicy, Lexer};
pub use reader::{LineRecord, LineRecordReader};
pub use tagger::Tagger;
pub use tagset::Tagset;
pub use token::{Language, Token};
