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

use std::fmt;

use serde::Deserialize;
use serde::de::{self, Visitor};
use snafu::Snafu;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[derive(Debug, PartialEq, Snafu)]
#[snafu(module, visibility(pub), context(suffix(false)))]
pub enum Error {
    #[snafu(display("Expected 6 colon-separated bytes, got {count}"))]
    ByteCount { count: usize },
    #[snafu(display("{part:?} is not a hex byte"))]
    NotHex { part: String },
    #[snafu(display("Expected ASCII text, got {text:02x?}"))]
    NotAscii { text: Vec<u8> },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout,
)]
#[repr(transparent)]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    pub fn new(addr: [u8; 6]) -> Self {
        MacAddr(addr)
    }

    /// Parses colon-hex MAC text like `ea:d7:a8:e8:c6:2f`.
    pub fn parse_ascii(text: &[u8]) -> Result<MacAddr> {
        let Ok(text) = std::str::from_utf8(text) else {
            return error::NotAscii {
                text: text.to_vec(),
            }
            .fail();
        };
        let mut addr = [0u8; 6];
        let mut index = 0;
        for part in text.split(':') {
            let Some(b) = addr.get_mut(index) else {
                return error::ByteCount { count: index + 1 }.fail();
            };
            let Ok(v) = u8::from_str_radix(part, 16) else {
                return error::NotHex { part }.fail();
            };
            *b = v;
            index += 1;
        }
        if index != 6 {
            return error::ByteCount { count: index }.fail();
        }
        Ok(MacAddr(addr))
    }

    /// Adds `index` to the address as a big-endian 48-bit integer, wrapping
    /// around at 2^48.
    pub fn offset_by(&self, index: u32) -> MacAddr {
        let mut buf = [0u8; 8];
        buf[2..].copy_from_slice(&self.0);
        let sum = u64::from_be_bytes(buf).wrapping_add(index as u64) & 0xffff_ffff_ffff;
        let mut addr = [0u8; 6];
        addr.copy_from_slice(&sum.to_be_bytes()[2..]);
        MacAddr(addr)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [b0, b1, b2, b3, b4, b5] = self.0;
        write!(f, "{b0:02x}:{b1:02x}:{b2:02x}:{b3:02x}:{b4:02x}:{b5:02x}")
    }
}

struct MacAddrVisitor;

impl Visitor<'_> for MacAddrVisitor {
    type Value = MacAddr;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a MAC address like ea:d7:a8:e8:c6:2f")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        MacAddr::parse_ascii(v.as_bytes()).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(MacAddrVisitor)
    }
}
