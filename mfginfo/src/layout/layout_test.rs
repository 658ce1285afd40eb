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

use assert_matches::assert_matches;
use rstest::rstest;

use crate::layout::mac::Error as MacError;
use crate::layout::{Cell, END_OF_VARS, Transform, normalize_name, parse};

#[rstest]
#[case("MFG_MAC", "mfg-mac")]
#[case("mfg_mac", "mfg-mac")]
#[case("Mfg-Mac", "mfg-mac")]
#[case("SERIAL_NUM", "serial-num")]
#[case("already-normal", "already-normal")]
fn test_normalize_name(#[case] raw: &str, #[case] normalized: &str) {
    assert_eq!(normalize_name(raw), normalized);
    assert_eq!(normalize_name(&normalize_name(raw)), normalized);
}

#[test]
fn test_parse() {
    let blob = b"SERIAL_NUM=ABC123\nMFG_MAC=00:11:22:33:44:00\n\xff";
    let cells = parse(blob);
    assert_eq!(
        cells,
        [
            Cell {
                name: "serial-num".to_owned(),
                offset: 11,
                len: 6,
                transform: None,
            },
            Cell {
                name: "mfg-mac".to_owned(),
                offset: 26,
                len: 6,
                transform: Some(Transform::EthAddr),
            }
        ]
    );
}

#[test]
fn test_parse_stops_at_end_marker() {
    let blob = b"A=1\n\xffB=2\n";
    let cells = parse(blob);
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].name, "a");
}

#[test]
fn test_parse_without_end_marker() {
    let cells = parse(b"A=1\nB=23");
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[1].name, "b");
    assert_eq!(cells[1].offset, 6);
    assert_eq!(cells[1].len, 2);
}

#[rstest]
#[case(b"# a comment\nA=1\n\xff".as_slice())]
#[case(b"no separator here\nA=1\n\xff".as_slice())]
#[case(b"\nA=1\n\xff".as_slice())]
#[case(b"=orphan\nA=1\n\xff".as_slice())]
#[case(b"\xfe\xfd=x\nA=1\n\xff".as_slice())]
fn test_parse_skips_line(#[case] blob: &[u8]) {
    let cells = parse(blob);
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].name, "a");
    assert_eq!(cells[0].len, 1);
}

#[test]
fn test_parse_empty_value() {
    let cells = parse(b"A=\nB=1\n\xff");
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].len, 0);
    assert_eq!(cells[0].offset, 2);
}

#[test]
fn test_parse_duplicate_names() {
    let cells = parse(b"A=1\nA=2\n\xff");
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].name, "a");
    assert_eq!(cells[1].name, "a");
    assert_eq!(cells[1].offset, 6);
}

#[test]
fn test_mac_cell_len() {
    let cells = parse(b"MFG_MAC=00:11:22:33:44:00\n\xff");
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].len, 6);
    assert_eq!(cells[0].raw_len(), 17);
    assert_eq!(cells[0].transform, Some(Transform::EthAddr));
}

#[test]
fn test_transform_eth_addr() {
    let derived = Transform::EthAddr.apply(b"00:11:22:33:44:00", 3);
    assert_matches!(derived, Ok(v) if v == [0x00, 0x11, 0x22, 0x33, 0x44, 0x03]);
    let base = Transform::EthAddr.apply(b"00:11:22:33:44:00", 0);
    assert_matches!(base, Ok(v) if v == [0x00, 0x11, 0x22, 0x33, 0x44, 0x00]);
    assert_matches!(
        Transform::EthAddr.apply(b"not a mac address", 0),
        Err(MacError::NotHex { .. })
    );
}

#[test]
fn test_parse_value_containing_end_marker() {
    let mut blob = b"A=1".to_vec();
    blob.push(END_OF_VARS);
    blob.extend_from_slice(b"2\nB=3\n\xff");
    let cells = parse(&blob);
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].len, 3);
}
