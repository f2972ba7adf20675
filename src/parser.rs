use std::collections::HashMap;

use crate::error::{Result, Y86Error};

/// Parses a Y86-64 assembler's textual `.yo` object-file listing into a
/// sparse address-to-byte mapping.
///
/// A line is ignored if it is empty, has no `:`, or its portion before `|`
/// is empty after trimming. Otherwise it must be `<addr>: <hex bytes>`, and
/// any deviation from that shape is a hard parse error naming the
/// offending line (the silent-skip behavior of the program this was
/// modeled on is deliberately not reproduced; see the design notes).
pub fn parse_yo(content: &str) -> Result<HashMap<u64, u8>> {
    let mut image = HashMap::new();

    for (line_no, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || !line.contains(':') {
            continue;
        }

        let before_comment = line.split('|').next().unwrap_or("").trim();
        if before_comment.is_empty() {
            continue;
        }

        let (addr_str, bytes_str) = split_once_colon(before_comment, line_no + 1)?;

        let addr_str = addr_str.trim();
        let addr_str = addr_str.strip_prefix("0x").or_else(|| addr_str.strip_prefix("0X")).unwrap_or(addr_str);
        let addr = u64::from_str_radix(addr_str, 16).map_err(|_| Y86Error::Parse {
            line: line_no + 1,
            fragment: addr_str.to_string(),
        })?;

        let hex_digits: String = bytes_str.chars().filter(|c| !c.is_whitespace()).collect();
        if hex_digits.is_empty() {
            // Label-only line: address present, no bytes.
            continue;
        }
        if hex_digits.len() % 2 != 0 {
            return Err(Y86Error::Parse {
                line: line_no + 1,
                fragment: hex_digits,
            });
        }

        for (i, offset) in (0..hex_digits.len()).step_by(2).enumerate() {
            let byte_str = &hex_digits[offset..offset + 2];
            let byte = u8::from_str_radix(byte_str, 16).map_err(|_| Y86Error::Parse {
                line: line_no + 1,
                fragment: byte_str.to_string(),
            })?;
            image.insert(addr + i as u64, byte);
        }
    }

    Ok(image)
}

fn split_once_colon(line: &str, line_no: usize) -> Result<(&str, &str)> {
    line.split_once(':').ok_or_else(|| Y86Error::Parse {
        line: line_no,
        fragment: line.to_string(),
    })
}
