// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub mod mac;

use std::mem::size_of;

use serde::Deserialize;
use serde_aco::Help;
use zerocopy::IntoBytes;

use self::mac::MacAddr;

/// Marks the end of the variable area inside the blob.
pub const END_OF_VARS: u8 = 0xff;
pub const MAC_CELL_NAME: &str = "mfg-mac";
/// Width of a MAC address stored as colon-hex text, e.g. `00:11:22:33:44:55`.
pub const MAC_TEXT_SIZE: u32 = 17;
pub const DEFAULT_BLOB_SIZE: u32 = 1024;

const COMMENT_BYTE: u8 = b'#';
const SEPARATOR_BYTE: u8 = b'=';

/// A read-time conversion applied to a cell's stored bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Colon-hex MAC text plus an index to a derived binary address.
    EthAddr,
}

impl Transform {
    /// Number of stored bytes the transform consumes.
    pub fn raw_len(&self) -> u32 {
        match self {
            Transform::EthAddr => MAC_TEXT_SIZE,
        }
    }

    pub fn apply(&self, raw: &[u8], index: u32) -> Result<Vec<u8>, mac::Error> {
        match self {
            Transform::EthAddr => {
                let base = MacAddr::parse_ascii(raw)?;
                Ok(base.offset_by(index).as_bytes().to_vec())
            }
        }
    }
}

/// A named span of the blob. `len` is the length consumers see, which for
/// transformed cells differs from the stored length ([`Cell::raw_len`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub name: String,
    pub offset: u32,
    pub len: u32,
    pub transform: Option<Transform>,
}

impl Cell {
    pub fn raw_len(&self) -> u32 {
        match &self.transform {
            Some(transform) => transform.raw_len(),
            None => self.len,
        }
    }
}

/// Lowercases `name` and replaces `_` with `-`, producing a device-tree
/// compatible identifier. Idempotent.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

fn parse_line(line: &[u8], offset: u32) -> Option<Cell> {
    if line.first() == Some(&COMMENT_BYTE) {
        return None;
    }
    let sep = line.iter().position(|&b| b == SEPARATOR_BYTE)?;
    let Ok(name) = std::str::from_utf8(&line[..sep]) else {
        log::debug!("skipping a line with a non-UTF-8 name at {offset:#x}");
        return None;
    };
    if name.is_empty() {
        log::debug!("skipping a line with an empty name at {offset:#x}");
        return None;
    }
    let name = normalize_name(name);
    let val_len = (line.len() - sep - 1) as u32;
    let (len, transform) = if name == MAC_CELL_NAME {
        (size_of::<MacAddr>() as u32, Some(Transform::EthAddr))
    } else {
        (val_len, None)
    };
    Some(Cell {
        name,
        offset: offset + sep as u32 + 1,
        len,
        transform,
    })
}

/// Splits the variable area of `blob` into cells, one per `name=value` line.
///
/// Lines are terminated by `\n`; a line starting with `#` is a comment and a
/// line without `=` is ignored. Scanning stops at the first line starting
/// with [`END_OF_VARS`] or at the end of the buffer, whichever comes first.
pub fn parse(blob: &[u8]) -> Vec<Cell> {
    let mut cells = vec![];
    let mut pos = 0;
    while let Some(&byte) = blob.get(pos) {
        if byte == END_OF_VARS {
            break;
        }
        let line_end = match blob[pos..].iter().position(|&b| b == b'\n') {
            Some(count) => pos + count,
            None => blob.len(),
        };
        if let Some(cell) = parse_line(&blob[pos..line_end], pos as u32) {
            cells.push(cell);
        }
        pos = line_end + 1;
    }
    cells
}

fn default_blob_size() -> u32 {
    DEFAULT_BLOB_SIZE
}

#[derive(Debug, Deserialize, Help)]
pub struct LayoutConfig {
    /// Declared size of the mfginfo blob in bytes. [default: 1024]
    #[serde(default = "default_blob_size")]
    pub size: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            size: DEFAULT_BLOB_SIZE,
        }
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
