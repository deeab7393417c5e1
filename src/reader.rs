//! The binary line-record parser: walks the tokenized C64 BASIC file
//! layout and yields `(lineno, payload)` pairs.

/// One parsed line record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// The BASIC line number (0..=65535).
    pub lineno: u16,
    /// The raw tokenized payload bytes for this line (excludes the
    /// terminating `0x00`).
    pub payload: Vec<u8>,
    /// Set when no `0x00` terminator was found and the remainder of the
    /// file was consumed as a single truncated payload. The reader stops
    /// after yielding such a record.
    pub truncated: bool,
}

/// A lazy walker over a tokenized C64 BASIC file's line records.
///
/// Skips the 2-byte load address, then reads `{link_ptr: u16 LE,
/// lineno: u16 LE, payload..., 0x00}` records until it sees the
/// link-pointer-zero/lineno-zero end-of-program marker, runs out of
/// bytes, or hits a missing terminator.
pub struct LineRecordReader<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> LineRecordReader<'a> {
    /// Build a reader over the full file buffer, including its 2-byte
    /// load-address header.
    pub fn new(data: &'a [u8]) -> Self {
        LineRecordReader {
            data,
            pos: data.len().min(2),
            done: data.len() < 2,
        }
    }
}

impl<'a> Iterator for LineRecordReader<'a> {
    type Item = LineRecord;

    fn next(&mut self) -> Option<LineRecord> {
        if self.done {
            return None;
        }

        // Need at least link-ptr(2) + lineno(2) + a 0x00 terminator(1).
        if self.data.len().saturating_sub(self.pos) < 5 {
            self.done = true;
            return None;
        }

        let link_ptr = u16::from_le_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        let lineno = u16::from_le_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;

        let rest = &self.data[self.pos..];
        if link_ptr == 0 && lineno == 0 && rest.iter().all(|&b| b == 0) {
            self.done = true;
            return None;
        }

        match rest.iter().position(|&b| b == 0) {
            Some(offset) => {
                let payload = rest[..offset].to_vec();
                self.pos += offset + 1;
                Some(LineRecord {
                    lineno,
                    payload,
                    truncated: false,
                })
            }
            None => {
                self.done = true;
                Some(LineRecord {
                    lineno,
                    payload: rest.to_vec(),
                    truncated: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_record() {
        // header(2) | link(2)=0x0C08 lineno(2)=10 | PRINT " HI " 00 | eop
        let data = [
            0x01, 0x08, // header
            0x0C, 0x08, 0x0A, 0x00, // link ptr, lineno=10
            0x99, 0x20, 0x22, 0x48, 0x49, 0x22, 0x00, // PRINT "HI"
            0x00, 0x00, // end of program
        ];
        let records: Vec<_> = LineRecordReader::new(&data).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lineno, 10);
        assert_eq!(records[0].payload, vec![0x99, 0x20, 0x22, 0x48, 0x49, 0x22]);
        assert!(!records[0].truncated);
    }

    #[test]
    fn test_multiple_lines() {
        let data = [
            0x01, 0x08, // header
            0x0A, 0x08, 0x0A, 0x00, // lineno 10
            0x41, 0x00, // "A"
            0x14, 0x08, 0x14, 0x00, // lineno 20
            0x42, 0x00, // "B"
            0x00, 0x00,
        ];
        let records: Vec<_> = LineRecordReader::new(&data).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lineno, 10);
        assert_eq!(records[1].lineno, 20);
    }

    #[test]
    fn test_truncated_payload_stops_cleanly() {
        let data = [
            0x01, 0x08, // header
            0x0A, 0x08, 0x0A, 0x00, // lineno 10, no terminator follows
            0x41, 0x42, 0x43,
        ];
        let records: Vec<_> = LineRecordReader::new(&data).collect();
        assert_eq!(records.len(), 1);
        assert!(records[0].truncated);
        assert_eq!(records[0].payload, vec![0x41, 0x42, 0x43]);
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        let records: Vec<_> = LineRecordReader::new(&[]).collect();
        assert!(records.is_empty());
    }

    #[test]
    fn test_short_file_yields_nothing() {
        let records: Vec<_> = LineRecordReader::new(&[0x01, 0x08, 0x00]).collect();
        assert!(records.is_empty());
    }

    #[test]
    fn test_reader_never_panics_on_arbitrary_bytes() {
        for len in 0..40 {
            let data: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
            let _: Vec<_> = LineRecordReader::new(&data).collect();
        }
    }

    // ------------------------------------------------------------------
    // Property-based tests - the reader must be total over arbitrary bytes
    // ------------------------------------------------------------------

    #[test]
    fn test_property_never_panics_on_arbitrary_buffers() {
        use proptest::prelude::*;

        proptest!(|(data in prop::collection::vec(any::<u8>(), 0..256))| {
            let records: Vec<_> = LineRecordReader::new(&data).collect();
            for record in &records {
                prop_assert!(!record.truncated || record.payload.len() <= data.len());
            }
        });
    }

    #[test]
    fn test_property_payload_bytes_are_a_subrange_of_input() {
        use proptest::prelude::*;

        proptest!(|(data in prop::collection::vec(any::<u8>(), 5..256))| {
            for record in LineRecordReader::new(&data) {
                for &byte in &record.payload {
                    prop_assert!(data.contains(&byte));
                }
            }
        });
    }
}
