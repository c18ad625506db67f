// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 Takashi Sakamoto

//! End-to-end scenarios over synthetic images of configuration ROM.

use ieee1212_config_rom_printer::crc::itu_t_crc16;
use ieee1212_config_rom_printer::{align_to_host_order, render, BlockLayout};

fn image(quadlets: &[u32]) -> Vec<u8> {
    quadlets.iter().flat_map(|q| q.to_ne_bytes()).collect()
}

fn render_image(quadlets: &[u32]) -> Vec<String> {
    let mut raw = image(quadlets);
    align_to_host_order(&mut raw);
    render(&raw).unwrap()
}

// Bus information block of 5 quadlets with the correct CRC in its header.
const BUS_INFO: [u32; 5] = [0x04046f71, 0x31333934, 0x0064dc00, 0x0800278b, 0x00000001];

#[test]
fn minimal_bus_info_is_rendered() {
    let lines = render_image(&[0x04040400, 0x31333934, 0x0064dc00, 0x0800278b, 0x00000001]);

    assert_eq!(
        vec![
            "               ROM header and bus information block".to_string(),
            format!("               {}", "-".repeat(65)),
            "400  04040400  bus_info_length 4, crc_length 4, crc 1024 (should be 28529)"
                .to_string(),
            "404  31333934  bus_name \"1394\"".to_string(),
            "408  0064dc00  irmc 0, cmc 0, isc 0, bmc 0, cyc_clk_acc 100, max_rec 13 (16384)"
                .to_string(),
            "40c  0800278b  company_id 080027     |".to_string(),
            "410  00000001  device_id 8b00000001  | EUI-64 0800278b00000001".to_string(),
            "".to_string(),
        ],
        lines
    );
}

#[test]
fn big_endian_image_renders_identically() {
    let quadlets = [0x04040400, 0x31333934, 0x0064dc00, 0x0800278b, 0x00000001];

    let mut host_order = image(&quadlets);
    align_to_host_order(&mut host_order);
    let expected = render(&host_order).unwrap();

    let mut big_endian: Vec<u8> = quadlets.iter().flat_map(|q| q.to_be_bytes()).collect();
    align_to_host_order(&mut big_endian);
    let rendered = render(&big_endian).unwrap();

    assert_eq!(expected, rendered);
}

#[test]
fn wrong_crc_is_annotated() {
    let lines = render_image(&[0x04040401, 0x31333934, 0x0064dc00, 0x0800278b, 0x00000001]);
    assert!(lines[2].contains("crc 1025 (should be 28529)"));
}

#[test]
fn correct_crc_has_no_annotation() {
    let lines = render_image(&BUS_INFO);
    assert!(lines[2].ends_with("bus_info_length 4, crc_length 4, crc 28529"));
    assert!(!lines[2].contains("should be"));
}

#[test]
fn overlapping_leaf_is_rendered_with_actual_length() {
    let mut quadlets = BUS_INFO.to_vec();
    quadlets.extend_from_slice(&[
        // Root directory with two leaf entries.
        0x00023bbb, 0x8d000002, 0x8d000003,
        // The first leaf declares 3 quadlets of content and overlaps the second.
        0x00033a51, 0x0800278b,
        // The second leaf.
        0x00011021, 0x00000001,
    ]);
    let lines = render_image(&quadlets);

    assert!(lines.contains(&"418  8d000002  --> eui-64 leaf at 420".to_string()));
    assert!(lines.contains(&"41c  8d000003  --> eui-64 leaf at 428".to_string()));
    assert!(lines.contains(&"               eui-64 leaf at 420".to_string()));
    assert!(lines
        .contains(&"420  00033a51  leaf_length 3 (actual length 1), crc 14929".to_string()));
    assert!(lines.contains(&"428  00011021  leaf_length 1, crc 4129".to_string()));
}

#[test]
fn unreferenced_data_is_rendered_as_orphan() {
    let mut quadlets = BUS_INFO.to_vec();
    quadlets.extend_from_slice(&[
        // Root directory with one immediate entry.
        0x000194eb, 0x17123456,
        // Nothing refers to the trailing quadlets.
        0xdeadbeef, 0xcafebabe,
    ]);
    let lines = render_image(&quadlets);

    assert!(lines.contains(&"414  000194eb  directory_length 1, crc 38123".to_string()));
    assert!(lines.contains(&"418  17123456  model".to_string()));
    assert!(lines.contains(&"41c  deadbeef  (unreferenced data)".to_string()));
    assert!(lines.contains(&"420  cafebabe  (unreferenced data)".to_string()));
}

fn sbp2_unit_image() -> Vec<u32> {
    let mut quadlets = BUS_INFO.to_vec();
    quadlets.extend_from_slice(&[
        // Root directory referring to the unit directory.
        0x0002a15e, 0xd1000002, 0x17123456,
        // Unit directory for SBP-2 with a logical unit number.
        0x0003b3c3, 0x1200609e, 0x13010483, 0x14000000,
    ]);
    quadlets
}

#[test]
fn sbp2_unit_directory_is_rendered_with_spec_names() {
    let lines = render_image(&sbp2_unit_image());

    assert!(lines.contains(&"418  d1000002  --> unit directory at 420".to_string()));
    assert!(lines.contains(&"               unit directory at 420".to_string()));
    assert!(lines.contains(&"420  0003b3c3  directory_length 3, crc 46019".to_string()));
    assert!(lines.contains(&"424  1200609e  specifier id".to_string()));
    assert!(lines.contains(&"428  13010483  version".to_string()));
    assert!(lines
        .contains(&"42c  14000000  SBP-2 logical unit number: ordered 0, type Disk,".to_string()));
}

#[test]
fn endianness_does_not_change_sbp2_rendering() {
    let quadlets = sbp2_unit_image();

    let mut host_order = image(&quadlets);
    align_to_host_order(&mut host_order);
    let expected = render(&host_order).unwrap();

    let mut big_endian: Vec<u8> = quadlets.iter().flat_map(|q| q.to_be_bytes()).collect();
    align_to_host_order(&mut big_endian);
    let rendered = render(&big_endian).unwrap();

    assert_eq!(expected, rendered);
}

#[test]
fn blocks_tile_the_image_without_duplication() {
    let mut images: Vec<Vec<u8>> = Vec::new();

    images.push(image(&sbp2_unit_image()));

    let mut quadlets = BUS_INFO.to_vec();
    quadlets.extend_from_slice(&[0x000194eb, 0x17123456, 0xdeadbeef, 0xcafebabe]);
    images.push(image(&quadlets));

    // The same image with a partial quadlet at the tail.
    let mut truncated = image(&quadlets);
    truncated.extend_from_slice(&[0x12, 0x34]);
    images.push(truncated);

    for raw in &images {
        let mut layout = BlockLayout::discover(raw).unwrap();
        layout.normalize();

        let mut end = 0;
        let mut offsets = Vec::new();
        for (_, block) in layout.blocks() {
            assert_eq!(end, block.offset);
            end += block.length;
            offsets.push(block.offset);
        }
        assert_eq!(raw.len(), end);

        let count = offsets.len();
        offsets.dedup();
        assert_eq!(count, offsets.len());
    }
}

#[test]
fn computed_crc_closes_the_round_trip() {
    // Root directory of 3 entries, then the referred leaf of 1 quadlet.
    let entries = [0x0c000000u32, 0x03001234, 0x8d000001];
    let leaf_content = 0x00000002u32;
    let root_crc = itu_t_crc16(entries.iter().copied()) as u32;
    let leaf_crc = itu_t_crc16([leaf_content]) as u32;

    let mut quadlets = BUS_INFO.to_vec();
    quadlets.push((3 << 16) | root_crc);
    quadlets.extend_from_slice(&entries);
    quadlets.push((1 << 16) | leaf_crc);
    quadlets.push(leaf_content);

    let lines = render_image(&quadlets);
    for line in &lines {
        assert!(!line.contains("should be"), "unexpected annotation: {}", line);
    }
}

#[test]
fn every_line_has_prefix_of_biased_offset_or_blank() {
    let lines = render_image(&sbp2_unit_image());

    for line in lines.iter().filter(|line| !line.is_empty()) {
        if line.starts_with("               ") {
            continue;
        }
        let offset = usize::from_str_radix(&line[..3], 16).unwrap();
        assert!(offset >= 0x400, "offset below the base address: {}", line);
        assert_eq!(&line[3..5], "  ");
        let quadlet = &line[5..13];
        assert!(
            quadlet.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "raw quadlet is not lowercase hex: {}",
            line
        );
    }
}
