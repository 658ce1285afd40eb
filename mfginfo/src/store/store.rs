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

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub), context(suffix(false)))]
pub enum Error {
    #[snafu(display("Failed to open {path:?}"))]
    Open {
        path: PathBuf,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("Failed to query the source size"))]
    Metadata {
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("Failed to read from the source"))]
    Read {
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("Expected {want} bytes, got {got}"))]
    ShortRead { want: u32, got: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A byte addressable source holding an mfginfo blob.
#[derive(Debug)]
pub enum Store {
    Bytes(Vec<u8>),
    Slice(&'static [u8]),
    File(File),
}

impl Default for Store {
    fn default() -> Self {
        Store::Slice(&[])
    }
}

pub struct StoreAccess<'a> {
    store: &'a Store,
    offset: u64,
}

impl Read for StoreAccess<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let count = match self.store {
            Store::File(f) => {
                (&*f).seek(SeekFrom::Start(self.offset))?;
                (&*f).read(buf)?
            }
            Store::Bytes(b) => match b.get(self.offset as usize..) {
                Some(mut s) => s.read(buf)?,
                None => Err(ErrorKind::UnexpectedEof)?,
            },
            Store::Slice(b) => match b.get(self.offset as usize..) {
                Some(mut s) => s.read(buf)?,
                None => Err(ErrorKind::UnexpectedEof)?,
            },
        };
        self.offset += count as u64;
        Ok(count)
    }
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).context(error::Open { path })?;
        Ok(Store::File(f))
    }

    pub fn size(&self) -> Result<u64> {
        let ret = match self {
            Store::Bytes(v) => v.len() as u64,
            Store::Slice(s) => s.len() as u64,
            Store::File(f) => f.metadata().context(error::Metadata)?.len(),
        };
        Ok(ret)
    }

    pub fn access(&self, offset: u64) -> StoreAccess<'_> {
        StoreAccess {
            store: self,
            offset,
        }
    }

    /// Reads `size` bytes at offset 0. A source holding fewer than `size`
    /// bytes fails with [`Error::ShortRead`].
    pub fn read_blob(&self, size: u32) -> Result<Vec<u8>> {
        let mut blob = vec![0u8; size as usize];
        let mut access = self.access(0);
        let mut filled = 0;
        while filled < blob.len() {
            let count = access.read(&mut blob[filled..]).context(error::Read)?;
            if count == 0 {
                break;
            }
            filled += count;
        }
        if filled < blob.len() {
            return error::ShortRead {
                want: size,
                got: filled as u32,
            }
            .fail();
        }
        Ok(blob)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
