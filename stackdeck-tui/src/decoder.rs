//! Raw keystroke decoding for the selection session.
//!
//! The terminal is in raw mode, so everything arrives as bytes: plain
//! characters, control bytes, and multi-byte escape sequences whose exact
//! shape varies by terminal. Decoding must never fail — terminal input is
//! inherently noisy, and anything we cannot make sense of is discarded as
//! `Unrecognized` rather than surfaced as an error.

/// One logical key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    MoveUp,
    MoveDown,
    ToggleSelect,
    Confirm,
    Backspace,
    Printable(char),
    Interrupt,
    Unrecognized,
}

/// Known escape sequences. CSI (`ESC [`) and SS3 (`ESC O`) arrow encodings
/// both appear in the wild depending on terminal mode.
const ESCAPE_SEQUENCES: &[(&[u8], Key)] = &[
    (b"\x1b[A", Key::MoveUp),
    (b"\x1bOA", Key::MoveUp),
    (b"\x1b[B", Key::MoveDown),
    (b"\x1bOB", Key::MoveDown),
];

const CTRL_C: u8 = 0x03;
const BACKSPACE: u8 = 0x7f;
const CTRL_H: u8 = 0x08;
const ESC: u8 = 0x1b;

/// Decode one chunk of raw input into logical events.
///
/// An escape-introduced sequence that matches no table entry discards the
/// remainder of the chunk as a single `Unrecognized` event: modified-arrow
/// and function-key sequences have terminal-dependent lengths, and guessing
/// where they end risks misreading their tail bytes as typed characters.
pub fn decode_chunk(bytes: &[u8]) -> Vec<Key> {
    let mut events = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            CTRL_C => {
                events.push(Key::Interrupt);
                i += 1;
            }
            b'\r' | b'\n' => {
                events.push(Key::Confirm);
                i += 1;
            }
            BACKSPACE | CTRL_H => {
                events.push(Key::Backspace);
                i += 1;
            }
            b' ' => {
                events.push(Key::ToggleSelect);
                i += 1;
            }
            ESC => {
                match ESCAPE_SEQUENCES
                    .iter()
                    .find(|(sequence, _)| bytes[i..].starts_with(sequence))
                {
                    Some((sequence, key)) => {
                        events.push(*key);
                        i += sequence.len();
                    }
                    None => {
                        events.push(Key::Unrecognized);
                        break;
                    }
                }
            }
            b if b.is_ascii_graphic() => {
                events.push(Key::Printable(b as char));
                i += 1;
            }
            b if b < 0x80 => {
                // Remaining control bytes (tab, other Ctrl chords)
                events.push(Key::Unrecognized);
                i += 1;
            }
            _ => {
                // Multi-byte UTF-8: decode the next whole character if valid
                let len = utf8_len(bytes[i]);
                match std::str::from_utf8(bytes.get(i..i + len).unwrap_or_default()) {
                    Ok(s) if !s.is_empty() => {
                        events.push(Key::Printable(s.chars().next().unwrap_or('\u{fffd}')));
                        i += len;
                    }
                    _ => {
                        events.push(Key::Unrecognized);
                        i += 1;
                    }
                }
            }
        }
    }

    events
}

const fn utf8_len(first: u8) -> usize {
    match first {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_decode_in_both_encodings() {
        assert_eq!(decode_chunk(b"\x1b[A"), [Key::MoveUp]);
        assert_eq!(decode_chunk(b"\x1bOA"), [Key::MoveUp]);
        assert_eq!(decode_chunk(b"\x1b[B"), [Key::MoveDown]);
        assert_eq!(decode_chunk(b"\x1bOB"), [Key::MoveDown]);
    }

    #[test]
    fn control_bytes_decode_to_their_events() {
        assert_eq!(decode_chunk(b"\r"), [Key::Confirm]);
        assert_eq!(decode_chunk(b"\n"), [Key::Confirm]);
        assert_eq!(decode_chunk(b"\x7f"), [Key::Backspace]);
        assert_eq!(decode_chunk(b"\x08"), [Key::Backspace]);
        assert_eq!(decode_chunk(b" "), [Key::ToggleSelect]);
        assert_eq!(decode_chunk(b"\x03"), [Key::Interrupt]);
    }

    #[test]
    fn printable_ascii_decodes_to_chars() {
        assert_eq!(
            decode_chunk(b"ab1"),
            [Key::Printable('a'), Key::Printable('b'), Key::Printable('1')]
        );
    }

    #[test]
    fn multibyte_utf8_decodes_to_one_char() {
        assert_eq!(decode_chunk("é".as_bytes()), [Key::Printable('é')]);
        assert_eq!(decode_chunk("日".as_bytes()), [Key::Printable('日')]);
    }

    #[test]
    fn unknown_escape_sequence_is_discarded_not_an_error() {
        // Ctrl+Up in many terminals: ESC [ 1 ; 5 A
        assert_eq!(decode_chunk(b"\x1b[1;5A"), [Key::Unrecognized]);
        // A lone escape byte
        assert_eq!(decode_chunk(b"\x1b"), [Key::Unrecognized]);
    }

    #[test]
    fn unknown_escape_discards_the_rest_of_the_chunk() {
        // The bytes after the unknown introducer are part of the sequence,
        // not typed characters; they must not leak into the query.
        let events = decode_chunk(b"\x1b[1;5Axyz");
        assert_eq!(events, [Key::Unrecognized]);
    }

    #[test]
    fn events_before_an_unknown_escape_still_decode() {
        let events = decode_chunk(b"ab\x1b[Z");
        assert_eq!(
            events,
            [Key::Printable('a'), Key::Printable('b'), Key::Unrecognized]
        );
    }

    #[test]
    fn chunk_with_mixed_events_decodes_in_order() {
        let events = decode_chunk(b"\x1b[Bx\r");
        assert_eq!(events, [Key::MoveDown, Key::Printable('x'), Key::Confirm]);
    }

    #[test]
    fn stray_control_and_invalid_utf8_bytes_are_ignored_individually() {
        assert_eq!(decode_chunk(b"\t"), [Key::Unrecognized]);
        assert_eq!(decode_chunk(&[0xff, b'a']), [Key::Unrecognized, Key::Printable('a')]);
    }
}
