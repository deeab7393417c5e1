//! The `Decoder` facade: ties the binary line-record parser, the
//! context-sensitive lexer and the tagset together into the single
//! entry point callers use to turn a tokenized file into a [`BasicFile`].

use std::path::Path;

use crate::error::Result;
use crate::file::BasicFile;
use crate::lexer::{ErrorPolicy, Lexer};
use crate::reader::LineRecordReader;
use crate::tagset::Tagset;

/// Decodes tokenized C64 BASIC files into a [`BasicFile`].
///
/// Owns a read-only, shareable [`Tagset`] and a fixed [`ErrorPolicy`];
/// holds no per-file mutable state, so one `Decoder` can decode any
/// number of files, sequentially or from multiple threads.
#[derive(Debug, Clone)]
pub struct Decoder {
    tagset: Tagset,
    error_policy: ErrorPolicy,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder {
            tagset: Tagset::embedded_default(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl Decoder {
    /// Build a decoder with the embedded default tagset and the given
    /// error policy.
    pub fn new(error_policy: ErrorPolicy) -> Self {
        Decoder {
            tagset: Tagset::embedded_default(),
            error_policy,
        }
    }

    /// Build a decoder that loads its tagset from a user-supplied JSON
    /// file instead of the crate's embedded default.
    pub fn with_tagset_file<P: AsRef<Path>>(path: P, error_policy: ErrorPolicy) -> Result<Self> {
        Ok(Decoder {
            tagset: Tagset::load_file(path)?,
            error_policy,
        })
    }

    /// The error policy this decoder applies to unrecognized command bytes.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Change the error policy used by subsequent decodes.
    pub fn set_error_policy(&mut self, policy: ErrorPolicy) {
        self.error_policy = policy;
    }

    /// Decode a full tokenized file buffer into a [`BasicFile`].
    ///
    /// A record with a missing `0x00` terminator yields one final
    /// best-effort line from the remaining bytes; the warning is reported
    /// on stderr and decoding of that file stops there with all prior
    /// lines retained.
    pub fn decode_bytes(&self, data: &[u8]) -> Result<BasicFile> {
        let lexer = Lexer::new(&self.tagset, self.error_policy);
        let mut file = BasicFile::new();

        for record in LineRecordReader::new(data) {
            let tokens = lexer.lex_line(record.lineno, &record.payload)?;
            file.add_line(tokens, record.lineno);

            if record.truncated {
                eprintln!(
                    "warning: no 0x00 terminator found for line {}, assuming EOF",
                    record.lineno
                );
                break;
            }
        }

        Ok(file)
    }

    /// Read `path` into memory and decode it. The parser is not
    /// streaming: the whole file is loaded up front, which is fine since
    /// tokenized C64 BASIC programs are bounded by the original machine's
    /// memory (<= 64KB).
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<BasicFile> {
        let data = std::fs::read(path)?;
        self.decode_bytes(&data)
    }
}
