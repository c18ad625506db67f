// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 Takashi Sakamoto

//! Helpers to format content of blocks.
//!
//! Every line of content begins with a fixed prefix of the offset biased to the base address of
//! configuration ROM in IEEE 1212 and the raw quadlet. Continuation and title lines begin with
//! blank columns of the same width. Lines are bounded to 100 characters.

use crate::block::{BlockData, BlockId, BlockLayout};
use crate::crc::itu_t_crc16;
use crate::entry::{DirectoryEntry, EntryType};
use crate::spec::{self, ContentFormat, LeafContentFormat, SpecIdentifier};
use crate::{quadlet_at, quadlets, BUS_NAME_1394};

/// The maximum width of rendered line.
pub const LINE_WIDTH: usize = 100;

/// The base address of configuration ROM in the register space of IEEE 1212.
pub const CONFIG_ROM_OFFSET: usize = 0x400;

/// The base address of register space in IEEE 1212.
pub const REGISTER_SPACE_ADDRESS: u64 = 0xfffff0000000;

const HORIZONTAL_RULE: &str = "-----------------------------------------------------------------";

fn line_prefix(offset: usize, quadlet: u32) -> String {
    format!("{:3x}  {:08x}  ", offset + CONFIG_ROM_OFFSET, quadlet)
}

fn bare_line_prefix(offset: usize, quadlet: u32) -> String {
    format!("{:3x}  {:08x}", offset + CONFIG_ROM_OFFSET, quadlet)
}

fn blank_prefix() -> String {
    " ".repeat(15)
}

fn push_line(lines: &mut Vec<String>, line: String) {
    let mut line = line;
    if line.chars().count() > LINE_WIDTH {
        line = line.chars().take(LINE_WIDTH).collect();
    }
    line.truncate(line.trim_end().len());
    lines.push(line);
}

/// Render the blocks in ascending order of offset, with one empty line after each block.
pub fn render_blocks(layout: &BlockLayout<'_>) -> Vec<String> {
    let mut lines = Vec::new();

    for (id, block) in layout.blocks() {
        match block.data {
            BlockData::BusInfo => render_bus_info_block(&mut lines, layout, id),
            BlockData::RootDirectory => render_root_directory_block(&mut lines, layout, id),
            BlockData::Directory { key_id, parent } => {
                render_directory_block(&mut lines, layout, id, key_id, parent)
            }
            BlockData::Leaf { key_id, parent } => {
                render_leaf_block(&mut lines, layout, id, key_id, parent)
            }
            BlockData::Orphan => render_orphan_block(&mut lines, layout, id),
        }
        lines.push(String::new());
    }

    lines
}

struct BusEntry {
    bus_name_value: u32,
    bus_name: &'static str,
    format: fn(lines: &mut Vec<String>, offset: usize, quadlet: u32),
}

static BUS_ENTRIES: &[BusEntry] = &[
    BusEntry {
        bus_name_value: BUS_NAME_1394,
        bus_name: "1394",
        format: format_ieee1394_bus_dependent_information,
    },
    BusEntry {
        bus_name_value: 0xffffffff,
        bus_name: "unspecified",
        format: format_unspecified_bus_dependent_information,
    },
];

fn format_ieee1394_bus_dependent_information(lines: &mut Vec<String>, offset: usize, quadlet: u32) {
    let irm_capable = (quadlet >> 31) & 0x1;
    let cm_capable = (quadlet >> 30) & 0x1;
    let is_capable = (quadlet >> 29) & 0x1;
    let bm_capable = (quadlet >> 28) & 0x1;
    let cyc_clk_acc = (quadlet >> 16) & 0xff;
    let max_rec = (quadlet >> 12) & 0xf;
    let generation = (quadlet >> 4) & 0xf;

    if generation > 0 {
        let pm_capable = (quadlet >> 27) & 0x1;
        let max_rom = (quadlet >> 8) & 0x3;
        let spd = quadlet & 0x7;

        push_line(
            lines,
            line_prefix(offset, quadlet)
                + &format!(
                    "irmc {}, cmc {}, isc {}, bmc {}, pmc {}, cyc_clk_acc {},",
                    irm_capable, cm_capable, is_capable, bm_capable, pm_capable, cyc_clk_acc
                ),
        );
        push_line(
            lines,
            blank_prefix()
                + &format!(
                    "max_rec {} ({}), max_rom {}, gen {}, spd {} (S{}00)",
                    max_rec,
                    2u32 << max_rec,
                    max_rom,
                    generation,
                    spd,
                    1u32 << spd
                ),
        );
    } else {
        push_line(
            lines,
            line_prefix(offset, quadlet)
                + &format!(
                    "irmc {}, cmc {}, isc {}, bmc {}, cyc_clk_acc {}, max_rec {} ({})",
                    irm_capable,
                    cm_capable,
                    is_capable,
                    bm_capable,
                    cyc_clk_acc,
                    max_rec,
                    2u32 << max_rec
                ),
        );
    }
}

fn format_unspecified_bus_dependent_information(lines: &mut Vec<String>, offset: usize, quadlet: u32) {
    push_line(lines, bare_line_prefix(offset, quadlet));
}

fn render_bus_info_block(lines: &mut Vec<String>, layout: &BlockLayout<'_>, id: BlockId) {
    let data = layout.image();
    let quadlet = quadlet_at(data, 0);

    push_line(
        lines,
        blank_prefix() + "ROM header and bus information block",
    );
    push_line(lines, blank_prefix() + HORIZONTAL_RULE);

    let block_length = (quadlet >> 24) & 0xff;
    let crc_length = ((quadlet >> 16) & 0xff) as usize;
    let crc = (quadlet & 0xffff) as u16;
    let mut metadata = format!("bus_info_length {}, crc_length {}", block_length, crc_length);
    let actual_crc = if 4 * (crc_length + 1) <= data.len() {
        itu_t_crc16(quadlets(&data[4..(4 + 4 * crc_length)]))
    } else {
        // The coverage of CRC runs past the image; compute against the available prefix.
        let effective_crc_length = (data.len() - 4) / 4;
        metadata.push_str(&format!(" (up to {})", effective_crc_length));
        itu_t_crc16(quadlets(&data[4..(4 + 4 * effective_crc_length)]))
    };
    metadata.push_str(&format!(", crc {}", crc));
    if crc != actual_crc {
        metadata.push_str(&format!(" (should be {})", actual_crc));
    }
    push_line(lines, line_prefix(0, quadlet) + &metadata);

    if data.len() < 8 {
        return;
    }
    let quadlet = quadlet_at(data, 1);
    let bus_entry = BUS_ENTRIES
        .iter()
        .find(|entry| entry.bus_name_value == quadlet)
        .unwrap_or(&BUS_ENTRIES[BUS_ENTRIES.len() - 1]);
    push_line(
        lines,
        line_prefix(4, quadlet) + &format!("bus_name \"{}\"", bus_entry.bus_name),
    );

    if data.len() >= 12 {
        (bus_entry.format)(lines, 8, quadlet_at(data, 2));
    }

    if data.len() >= 20 {
        let high = quadlet_at(data, 3);
        let low = quadlet_at(data, 4);
        let company_id = (high & 0xffffff00) >> 8;
        let device_id = (((high as u64) & 0x000000ff) << 32) | low as u64;
        let eui64 = ((high as u64) << 32) | low as u64;

        push_line(
            lines,
            line_prefix(12, high) + &format!("company_id {:06x}     | ", company_id),
        );
        push_line(
            lines,
            line_prefix(16, low)
                + &format!("device_id {:010x}  | EUI-64 {:016x}", device_id, eui64),
        );
    }

    let quadlet_count = layout.block(id).length / 4;
    for i in 5..quadlet_count {
        push_line(lines, bare_line_prefix(4 * i, quadlet_at(data, i)));
    }
}

fn format_block_metadata(block_name: &str, content: &[u8]) -> String {
    let quadlet_count = content.len() / 4;
    let quadlet = quadlet_at(content, 0);
    let block_length = ((quadlet >> 16) & 0xffff) as usize;
    let block_crc = (quadlet & 0xffff) as u16;
    let actual_block_crc = itu_t_crc16(quadlets(&content[4..]));
    let mut metadata = format!("{}_length {}", block_name, block_length);

    if 1 + block_length != quadlet_count {
        metadata.push_str(&format!(" (actual length {})", quadlet_count - 1));
    }

    metadata.push_str(&format!(", crc {}", block_crc));
    if block_crc != actual_block_crc {
        metadata.push_str(&format!(" (should be {})", actual_block_crc));
    }

    metadata
}

/// Render the header line and every entry of a directory block.
pub(crate) fn format_directory_entries(
    lines: &mut Vec<String>,
    directory_offset: usize,
    content: &[u8],
    identifier: &SpecIdentifier,
) {
    push_line(
        lines,
        line_prefix(directory_offset, quadlet_at(content, 0))
            + &format_block_metadata("directory", content),
    );

    for i in 1..(content.len() / 4) {
        let quadlet = quadlet_at(content, i);
        let entry = DirectoryEntry::from(quadlet);
        let offset = directory_offset + 4 * i;
        let (formatter, spec_name) =
            spec::detect_key_formatter(identifier, entry.entry_type, entry.key_id);
        let mut rendered = String::new();

        match entry.entry_type {
            EntryType::Immediate => {
                if let Some(name) = spec_name {
                    rendered.push_str(name);
                    rendered.push(' ');
                }
                if formatter.has_known_key() {
                    rendered.push_str(formatter.name);
                }
                if let ContentFormat::Immediate(Some(format)) = formatter.content {
                    if formatter.has_known_key() {
                        rendered.push_str(": ");
                    }
                    rendered.push_str(&format(entry.value));
                }
            }
            EntryType::CsrOffset => {
                rendered.push_str("--> ");
                if let Some(name) = spec_name {
                    rendered.push_str(name);
                    rendered.push(' ');
                }
                if formatter.has_known_key() {
                    rendered.push_str(formatter.name);
                    rendered.push(' ');
                } else {
                    rendered.push_str("CSR ");
                }
                let csr_offset = REGISTER_SPACE_ADDRESS + 4 * entry.value as u64;
                rendered.push_str(&format!("at {:012x}", csr_offset));
            }
            EntryType::Leaf | EntryType::Directory => {
                rendered.push_str("--> ");
                if let Some(name) = spec_name {
                    rendered.push_str(name);
                    rendered.push(' ');
                }
                if formatter.has_known_key() {
                    rendered.push_str(formatter.name);
                    rendered.push(' ');
                }
                let block_offset = CONFIG_ROM_OFFSET + offset + 4 * entry.value as usize;
                let label = if entry.entry_type == EntryType::Leaf {
                    "leaf"
                } else {
                    "directory"
                };
                rendered.push_str(&format!("{} at {:x}", label, block_offset));
            }
        }

        push_line(lines, line_prefix(offset, quadlet) + &rendered);
    }
}

fn render_root_directory_block(lines: &mut Vec<String>, layout: &BlockLayout<'_>, id: BlockId) {
    let block = layout.block(id);
    let content = layout.content(id);

    // Vendor information in the root directory stands for the specifier of the whole node.
    let mut identifier = SpecIdentifier::UNSET;
    for i in 1..(content.len() / 4) {
        let entry = DirectoryEntry::from(quadlet_at(content, i));
        if entry.entry_type == EntryType::Immediate && entry.key_id == spec::KEY_ID_VENDOR_INFO {
            identifier.specifier_id = entry.value;
        }
    }

    push_line(lines, blank_prefix() + "root directory");
    push_line(lines, blank_prefix() + HORIZONTAL_RULE);

    format_directory_entries(lines, block.offset, content, &identifier);
}

fn render_directory_block(
    lines: &mut Vec<String>,
    layout: &BlockLayout<'_>,
    id: BlockId,
    key_id: u8,
    parent: BlockId,
) {
    let block = layout.block(id);

    // Directories for unit and feature declare their own specifier entries; the other kinds
    // inherit from the directory which refers to them.
    let base = match key_id {
        spec::KEY_ID_VENDOR_INFO
        | spec::KEY_ID_MODULE_INFO
        | spec::KEY_ID_DESCRIPTOR
        | spec::KEY_ID_BUS_DEPENDENT_INFO
        | spec::KEY_ID_DEPENDENT_INFO
        | spec::KEY_ID_INSTANCE => parent,
        spec::KEY_ID_UNIT | spec::KEY_ID_FEATURE => id,
        _ => id,
    };
    let identifier = spec::accumulate_identifier(layout, Some(base));
    let (formatter, _) = spec::detect_key_formatter(&identifier, EntryType::Directory, key_id);

    push_line(
        lines,
        blank_prefix()
            + &format!(
                "{} directory at {:x}",
                formatter.name,
                CONFIG_ROM_OFFSET + block.offset
            ),
    );
    push_line(lines, blank_prefix() + HORIZONTAL_RULE);

    match formatter.content {
        ContentFormat::Directory(format) => {
            format(lines, block.offset, layout.content(id), &identifier)
        }
        _ => format_directory_entries(lines, block.offset, layout.content(id), &identifier),
    }
}

fn render_leaf_block(
    lines: &mut Vec<String>,
    layout: &BlockLayout<'_>,
    id: BlockId,
    key_id: u8,
    parent: BlockId,
) {
    let block = layout.block(id);
    let content = layout.content(id);
    let identifier = spec::accumulate_identifier(layout, Some(parent));
    let (formatter, spec_name) = spec::detect_key_formatter(&identifier, EntryType::Leaf, key_id);

    let mut title = blank_prefix();
    if let Some(name) = spec_name {
        title.push_str(name);
        title.push(' ');
    }
    title.push_str(&format!(
        "{} leaf at {:x}",
        formatter.name,
        CONFIG_ROM_OFFSET + block.offset
    ));
    push_line(lines, title);
    push_line(lines, blank_prefix() + HORIZONTAL_RULE);

    push_line(
        lines,
        line_prefix(block.offset, quadlet_at(content, 0)) + &format_block_metadata("leaf", content),
    );

    if let ContentFormat::Leaf(format) = formatter.content {
        format(lines, block.offset + 4, &content[4..], None);
    }
}

fn render_orphan_block(lines: &mut Vec<String>, layout: &BlockLayout<'_>, id: BlockId) {
    let block = layout.block(id);
    let content = layout.content(id);

    for i in 0..(content.len() / 4) {
        push_line(
            lines,
            line_prefix(block.offset + 4 * i, quadlet_at(content, i)) + "(unreferenced data)",
        );
    }
}

////////////////////////////////
// Renderers for leaf content.
////////////////////////////////

const CSR_DESC_TYPE_TEXTUAL: u8 = 0x00;
const CSR_DESC_TYPE_ICON: u8 = 0x01;

pub(crate) fn format_csr_descriptor_leaf_content(
    lines: &mut Vec<String>,
    offset: usize,
    content: &[u8],
    spec_name: Option<&str>,
) {
    if content.len() < 4 {
        return;
    }

    let quadlet = quadlet_at(content, 0);
    let desc_type = ((quadlet >> 24) & 0xff) as u8;
    let spec_id = quadlet & 0x00ffffff;

    let (desc_type_name, format): (String, LeafContentFormat) = match desc_type {
        CSR_DESC_TYPE_TEXTUAL => (
            "textual descriptor".to_string(),
            format_csr_textual_descriptor_leaf_content,
        ),
        CSR_DESC_TYPE_ICON => (
            "icon descriptor".to_string(),
            format_unspecified_leaf_content,
        ),
        _ => (
            format!("descriptor_type {:02x}, specifier_ID {:x}", desc_type, spec_id),
            format_unspecified_leaf_content,
        ),
    };

    push_line(lines, line_prefix(offset, quadlet) + &desc_type_name);
    format(lines, offset + 4, &content[4..], spec_name);
}

pub(crate) fn format_csr_textual_descriptor_leaf_content(
    lines: &mut Vec<String>,
    offset: usize,
    content: &[u8],
    _spec_name: Option<&str>,
) {
    let quadlet_count = content.len() / 4;
    if quadlet_count < 2 {
        return;
    }

    let quadlet = quadlet_at(content, 0);
    let width = quadlet >> 28;
    let character_set = (quadlet & 0x0fff0000) >> 16;
    let language = quadlet & 0x0000ffff;

    let header = if character_set == 0 {
        "minimal ASCII".to_string()
    } else {
        format!(
            "width {}, character_set {}, language {}",
            width, character_set, language
        )
    };
    push_line(lines, line_prefix(offset, quadlet) + &header);

    for i in 1..quadlet_count {
        let quadlet = quadlet_at(content, i);
        let mut line = line_prefix(offset + 4 * i, quadlet);

        if quadlet > 0 {
            line.push('"');
            for j in 0..4 {
                let letter = ((quadlet >> (24 - j * 8)) & 0xff) as u8;
                if letter == 0 {
                    break;
                }
                line.push(letter as char);
            }
            line.push('"');
        }

        push_line(lines, line);
    }
}

pub(crate) fn format_csr_keyword_leaf_content(
    lines: &mut Vec<String>,
    offset: usize,
    content: &[u8],
    _spec_name: Option<&str>,
) {
    let quadlet_count = content.len() / 4;

    for i in 0..quadlet_count {
        let quadlet = quadlet_at(content, i);
        let mut line = line_prefix(offset + 4 * i, quadlet);

        if quadlet > 0 {
            line.push('"');
            for j in 0..4 {
                let letter = ((quadlet >> (24 - j * 8)) & 0xff) as u8;
                if letter != 0 {
                    line.push(letter as char);
                } else if i < quadlet_count - 1 {
                    line.push_str("\" \"");
                } else {
                    break;
                }
            }
            line.push('"');
        }

        push_line(lines, line);
    }
}

pub(crate) fn format_csr_unit_location_leaf_content(
    lines: &mut Vec<String>,
    offset: usize,
    content: &[u8],
    _spec_name: Option<&str>,
) {
    if content.len() < 16 {
        return;
    }

    let quadlet = [
        quadlet_at(content, 0),
        quadlet_at(content, 1),
        quadlet_at(content, 2),
        quadlet_at(content, 3),
    ];
    let base_address = ((quadlet[0] as u64) << 32) | quadlet[1] as u64;
    let upper_bound = ((quadlet[2] as u64) << 32) | quadlet[3] as u64;

    push_line(
        lines,
        line_prefix(offset, quadlet[0]) + &format!("base_address {:016x}", base_address),
    );
    push_line(lines, bare_line_prefix(offset + 4, quadlet[1]));
    push_line(
        lines,
        line_prefix(offset + 8, quadlet[2]) + &format!("upper_bound {:016x}", upper_bound),
    );
    push_line(lines, bare_line_prefix(offset + 12, quadlet[3]));
}

pub(crate) fn format_csr_eui64_leaf_content(
    lines: &mut Vec<String>,
    offset: usize,
    content: &[u8],
    _spec_name: Option<&str>,
) {
    if content.len() < 8 {
        return;
    }

    let high = quadlet_at(content, 0);
    let low = quadlet_at(content, 1);
    let company_id = (high & 0xffffff00) >> 8;
    let device_id = (((high as u64) & 0x000000ff) << 32) | low as u64;
    let eui64 = ((high as u64) << 32) | low as u64;

    push_line(
        lines,
        line_prefix(offset, high) + &format!("company_id {:06x}     | ", company_id),
    );
    push_line(
        lines,
        line_prefix(offset + 4, low)
            + &format!("device_id {:010x}  | EUI-64 {:016x}", device_id, eui64),
    );
}

pub(crate) fn format_iidc_104_leaf_content(
    lines: &mut Vec<String>,
    offset: usize,
    content: &[u8],
    _spec_name: Option<&str>,
) {
    let quadlet_count = content.len() / 4;

    for i in 0..quadlet_count.min(2) {
        push_line(lines, bare_line_prefix(offset + 4 * i, quadlet_at(content, i)));
    }

    for i in 2..quadlet_count {
        let quadlet = quadlet_at(content, i);
        let mut line = line_prefix(offset + 4 * i, quadlet);

        if quadlet > 0 {
            line.push('"');
            for j in 0..4 {
                let letter = ((quadlet >> (24 - j * 8)) & 0xff) as u8;
                if letter == 0 {
                    break;
                }
                line.push(letter as char);
            }
            line.push('"');
        }

        push_line(lines, line);
    }
}

pub(crate) fn format_unspecified_leaf_content(
    lines: &mut Vec<String>,
    offset: usize,
    content: &[u8],
    _spec_name: Option<&str>,
) {
    for i in 0..(content.len() / 4) {
        push_line(lines, bare_line_prefix(offset + 4 * i, quadlet_at(content, i)));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn image(quadlets: &[u32]) -> Vec<u8> {
        quadlets.iter().flat_map(|q| q.to_ne_bytes()).collect()
    }

    #[test]
    fn line_prefix_is_biased_and_padded() {
        assert_eq!("400  04040400  ", line_prefix(0, 0x04040400));
        assert_eq!("414  deadbeef  ", line_prefix(0x14, 0xdeadbeef));
        assert_eq!(15, blank_prefix().len());
        assert_eq!(65, HORIZONTAL_RULE.len());
    }

    #[test]
    fn long_line_is_bounded() {
        let mut lines = Vec::new();
        push_line(&mut lines, "x".repeat(200));
        assert_eq!(LINE_WIDTH, lines[0].len());
    }

    #[test]
    fn bus_capabilities_without_generation_take_one_line() {
        let mut lines = Vec::new();
        format_ieee1394_bus_dependent_information(&mut lines, 8, 0x0064dc00);
        assert_eq!(1, lines.len());
        assert_eq!(
            "408  0064dc00  irmc 0, cmc 0, isc 0, bmc 0, cyc_clk_acc 100, max_rec 13 (16384)",
            lines[0]
        );
    }

    #[test]
    fn bus_capabilities_with_generation_take_two_lines() {
        // irmc, cmc, isc, bmc, pmc are set; cyc_clk_acc 100, max_rec 10, max_rom 1, gen 2,
        // spd 2.
        let mut lines = Vec::new();
        format_ieee1394_bus_dependent_information(&mut lines, 8, 0xf864a122);
        assert_eq!(2, lines.len());
        assert_eq!(
            "408  f864a122  irmc 1, cmc 1, isc 1, bmc 1, pmc 1, cyc_clk_acc 100,",
            lines[0]
        );
        assert_eq!(
            "               max_rec 10 (2048), max_rom 1, gen 2, spd 2 (S400)",
            lines[1]
        );
    }

    #[test]
    fn textual_descriptor_is_quoted() {
        // "Linux Firewire" as minimal ASCII.
        let content = image(&[
            0x00000000, 0x00000000, 0x4c696e75, 0x78204669, 0x72657769, 0x72650000,
        ]);
        let mut lines = Vec::new();
        format_csr_descriptor_leaf_content(&mut lines, 8, &content, None);
        assert_eq!(
            vec![
                "408  00000000  textual descriptor".to_string(),
                "40c  00000000  minimal ASCII".to_string(),
                "410  4c696e75  \"Linu\"".to_string(),
                "414  78204669  \"x Fi\"".to_string(),
                "418  72657769  \"rewi\"".to_string(),
                "41c  72650000  \"re\"".to_string(),
            ],
            lines
        );
    }

    #[test]
    fn keyword_leaf_is_split_at_nul() {
        let content = image(&[0x41420043, 0x44000000]);
        let mut lines = Vec::new();
        format_csr_keyword_leaf_content(&mut lines, 8, &content, None);
        assert_eq!(2, lines.len());
        assert_eq!("408  41420043  \"AB\" \"C\"", lines[0]);
        assert_eq!("40c  44000000  \"D\"", lines[1]);
    }

    #[test]
    fn eui64_leaf_is_decomposed() {
        let content = image(&[0x0800278b, 0x00000001]);
        let mut lines = Vec::new();
        format_csr_eui64_leaf_content(&mut lines, 8, &content, None);
        assert_eq!(2, lines.len());
        assert_eq!("408  0800278b  company_id 080027     |", lines[0]);
        assert_eq!(
            "40c  00000001  device_id 8b00000001  | EUI-64 0800278b00000001",
            lines[1]
        );
    }

    #[test]
    fn unit_location_leaf_is_decomposed() {
        let content = image(&[0x00010203, 0x04050607, 0x08090a0b, 0x0c0d0e0f]);
        let mut lines = Vec::new();
        format_csr_unit_location_leaf_content(&mut lines, 8, &content, None);
        assert_eq!(
            vec![
                "408  00010203  base_address 0001020304050607".to_string(),
                "40c  04050607".to_string(),
                "410  08090a0b  upper_bound 08090a0b0c0d0e0f".to_string(),
                "414  0c0d0e0f".to_string(),
            ],
            lines
        );
    }

    #[test]
    fn unknown_descriptor_type_is_annotated() {
        let content = image(&[0x7f123456, 0xdeadbeef]);
        let mut lines = Vec::new();
        format_csr_descriptor_leaf_content(&mut lines, 8, &content, None);
        assert_eq!(
            "408  7f123456  descriptor_type 7f, specifier_ID 123456",
            lines[0]
        );
        assert_eq!("40c  deadbeef", lines[1]);
    }
}
