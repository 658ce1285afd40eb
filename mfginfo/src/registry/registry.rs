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

use snafu::Snafu;

use crate::layout::mac;
use crate::layout::{self, Cell, LayoutConfig};
use crate::store::{self, Store};

pub const CELL_NAME_SIZE: usize = 56;
pub const MAX_CELLS: usize = 512;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub), context(suffix(false)))]
pub enum Error {
    #[snafu(display("Failed to read the mfginfo blob"), context(false))]
    Blob { source: store::Error },
    #[snafu(display("Cannot register a cell with an empty name"))]
    EmptyName,
    #[snafu(display("Cell name {name:?} is longer than {max} bytes"))]
    NameTooLong { name: String, max: usize },
    #[snafu(display("{name:?} (offset={offset:#x}, len={len:#x}) exceeds the blob size {size:#x}"))]
    OutOfBounds {
        name: String,
        offset: u32,
        len: u32,
        size: u32,
    },
    #[snafu(display("The registry is full ({max} cells)"))]
    Full { max: usize },
    #[snafu(display("No cell named {name:?}"))]
    NotFound { name: String },
    #[snafu(display("Failed to derive the cell value"), context(false))]
    Derive { source: mac::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Named cells registered over an immutable mfginfo blob.
///
/// Duplicate names may be registered; [`CellRegistry::lookup`] resolves to
/// the most recently registered cell with the requested name.
#[derive(Debug)]
pub struct CellRegistry {
    blob: Vec<u8>,
    cells: Vec<Cell>,
}

impl CellRegistry {
    pub fn new(blob: Vec<u8>) -> Self {
        CellRegistry {
            blob,
            cells: vec![],
        }
    }

    /// Reads the declared blob from `store`, parses it, and registers every
    /// cell in textual order. The first registration failure stops the loop;
    /// cells registered before it are kept.
    pub fn attach(store: &Store, config: &LayoutConfig) -> Result<CellRegistry> {
        let blob = store.read_blob(config.size)?;
        let cells = layout::parse(&blob);
        let mut registry = CellRegistry::new(blob);
        for cell in cells {
            registry.add_cell(cell)?;
        }
        log::debug!("registered {} cells", registry.cells.len());
        Ok(registry)
    }

    pub fn add_cell(&mut self, cell: Cell) -> Result<()> {
        if cell.name.is_empty() {
            return error::EmptyName.fail();
        }
        if cell.name.len() > CELL_NAME_SIZE {
            return error::NameTooLong {
                name: cell.name,
                max: CELL_NAME_SIZE,
            }
            .fail();
        }
        if self.cells.len() >= MAX_CELLS {
            return error::Full { max: MAX_CELLS }.fail();
        }
        let raw_len = cell.raw_len();
        if cell.offset as u64 + raw_len as u64 > self.blob.len() as u64 {
            return error::OutOfBounds {
                name: cell.name,
                offset: cell.offset,
                len: raw_len,
                size: self.blob.len() as u32,
            }
            .fail();
        }
        self.cells.push(cell);
        Ok(())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn lookup(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().rev().find(|cell| cell.name == name)
    }

    /// Reads the value of the cell named `name`, applying its transform with
    /// `index` if it has one. A transform failure affects this read only.
    pub fn read(&self, name: &str, index: u32) -> Result<Vec<u8>> {
        let Some(cell) = self.lookup(name) else {
            return error::NotFound { name }.fail();
        };
        let start = cell.offset as usize;
        let raw = &self.blob[start..start + cell.raw_len() as usize];
        match &cell.transform {
            Some(transform) => Ok(transform.apply(raw, index)?),
            None => Ok(raw.to_vec()),
        }
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
