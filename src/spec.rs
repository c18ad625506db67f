// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 Takashi Sakamoto

//! Registry of key formatters for directory entries.
//!
//! A key formatter binds the pair of entry type and key to a display name and a renderer for
//! the content. The formatters are grouped per industrial specification, identified by the
//! pair of specifier_id and version accumulated from the chain of parent directories. Lookup
//! falls back from the table of matched specification to the table for IEEE 1394 bus, then to
//! the table of generic keys in IEEE 1212, and finally to a default formatter per entry type.

use crate::block::{BlockData, BlockId, BlockLayout};
use crate::entry::{DirectoryEntry, EntryType};
use crate::format;
use crate::quadlet_at;

pub const KEY_ID_DESCRIPTOR: u8 = 0x01;
pub const KEY_ID_BUS_DEPENDENT_INFO: u8 = 0x02;
pub const KEY_ID_VENDOR_INFO: u8 = 0x03;
pub const KEY_ID_HARDWARE_VERSION: u8 = 0x04;
pub const KEY_ID_MODULE_INFO: u8 = 0x07;
pub const KEY_ID_NODE_CAPABILITIES: u8 = 0x0c;
pub const KEY_ID_EUI_64: u8 = 0x0d;
pub const KEY_ID_UNIT: u8 = 0x11;
pub const KEY_ID_SPECIFIER_ID: u8 = 0x12;
pub const KEY_ID_VERSION: u8 = 0x13;
pub const KEY_ID_DEPENDENT_INFO: u8 = 0x14;
pub const KEY_ID_UNIT_LOCATION: u8 = 0x15;
pub const KEY_ID_MODEL: u8 = 0x17;
pub const KEY_ID_INSTANCE: u8 = 0x18;
pub const KEY_ID_KEYWORD: u8 = 0x19;
pub const KEY_ID_FEATURE: u8 = 0x1a;
pub const KEY_ID_MODIFIABLE_DESCRIPTOR: u8 = 0x1f;
pub const KEY_ID_DIRECTORY_ID: u8 = 0x20;

// 6 bits are allowed for valid key id.
pub const INVALID_KEY_ID: u8 = 0xff;
// 24 bits are allowed for valid value.
pub const INVALID_KEY_VALUE: u32 = 0xffffffff;

const UNSPECIFIED_ENTRY_NAME: &str = "(unspecified)";

/// The pair of specifier_id and version to identify industrial specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecIdentifier {
    pub specifier_id: u32,
    pub version: u32,
}

impl SpecIdentifier {
    pub const UNSET: SpecIdentifier = SpecIdentifier {
        specifier_id: INVALID_KEY_VALUE,
        version: INVALID_KEY_VALUE,
    };

    const fn new(specifier_id: u32, version: u32) -> Self {
        SpecIdentifier {
            specifier_id,
            version,
        }
    }
}

pub type ImmediateContentFormat = fn(value: u32) -> String;
pub type LeafContentFormat =
    fn(lines: &mut Vec<String>, offset: usize, content: &[u8], spec_name: Option<&str>);
pub type DirectoryContentFormat =
    fn(lines: &mut Vec<String>, offset: usize, content: &[u8], identifier: &SpecIdentifier);

/// The enumeration to express renderer for content of entry, tagged by type of entry.
#[derive(Debug, Clone, Copy)]
pub enum ContentFormat {
    Immediate(Option<ImmediateContentFormat>),
    CsrOffset,
    Leaf(LeafContentFormat),
    Directory(DirectoryContentFormat),
}

/// The structure to bind the pair of entry type and key to display name and content renderer.
#[derive(Debug, Clone, Copy)]
pub struct KeyFormatter {
    pub key_id: u8,
    pub name: &'static str,
    pub content: ContentFormat,
}

impl KeyFormatter {
    pub fn entry_type(&self) -> EntryType {
        match self.content {
            ContentFormat::Immediate(_) => EntryType::Immediate,
            ContentFormat::CsrOffset => EntryType::CsrOffset,
            ContentFormat::Leaf(_) => EntryType::Leaf,
            ContentFormat::Directory(_) => EntryType::Directory,
        }
    }

    pub fn has_known_key(&self) -> bool {
        self.key_id != INVALID_KEY_ID
    }
}

/// Accumulate the specification identifier effective for a block, by walking from the given
/// directory toward the block of root directory.
///
/// The first occurrence of specifier_id and version during the walk wins. An immediate entry
/// for vendor information seeds the specifier_id when still unset, as a last resort, and has
/// no other effect.
pub fn accumulate_identifier(layout: &BlockLayout<'_>, base: Option<BlockId>) -> SpecIdentifier {
    let mut identifier = SpecIdentifier::UNSET;
    let mut cursor = base;

    while let Some(id) = cursor {
        let content = layout.content(id);

        for i in 1..(content.len() / 4) {
            let entry = DirectoryEntry::from(quadlet_at(content, i));

            if entry.entry_type != EntryType::Immediate {
                continue;
            }

            match entry.key_id {
                KEY_ID_SPECIFIER_ID => {
                    if identifier.specifier_id == INVALID_KEY_VALUE {
                        identifier.specifier_id = entry.value;
                    }
                }
                KEY_ID_VERSION => {
                    if identifier.version == INVALID_KEY_VALUE {
                        identifier.version = entry.value;
                    }
                }
                KEY_ID_VENDOR_INFO => {
                    if identifier.specifier_id == INVALID_KEY_VALUE {
                        identifier.specifier_id = entry.value;
                    }
                }
                _ => (),
            }
        }

        cursor = match layout.block(id).data {
            BlockData::Directory { parent, .. } => Some(parent),
            _ => None,
        };
    }

    identifier
}

/// Detect the key formatter for the pair of entry type and key, with the name of matched
/// specification when the formatter came from its table.
pub fn detect_key_formatter(
    identifier: &SpecIdentifier,
    entry_type: EntryType,
    key_id: u8,
) -> (&'static KeyFormatter, Option<&'static str>) {
    if let Some(spec) = SPEC_ENTRIES
        .iter()
        .find(|spec| spec.identifier == *identifier)
    {
        if let Some(formatter) = find_formatter(spec.formatters, entry_type, key_id) {
            return (formatter, Some(spec.name));
        }
    }

    if let Some(formatter) = find_formatter(IEEE1394_BUS_KEY_FORMATTERS, entry_type, key_id) {
        return (formatter, None);
    }

    if let Some(formatter) = find_formatter(CSR_KEY_FORMATTERS, entry_type, key_id) {
        return (formatter, None);
    }

    (default_formatter(entry_type), None)
}

fn find_formatter(
    formatters: &'static [KeyFormatter],
    entry_type: EntryType,
    key_id: u8,
) -> Option<&'static KeyFormatter> {
    formatters
        .iter()
        .find(|formatter| formatter.entry_type() == entry_type && formatter.key_id == key_id)
}

fn default_formatter(entry_type: EntryType) -> &'static KeyFormatter {
    match entry_type {
        EntryType::Immediate => &DEFAULT_FORMATTERS[0],
        EntryType::CsrOffset => &DEFAULT_FORMATTERS[1],
        EntryType::Leaf => &DEFAULT_FORMATTERS[2],
        EntryType::Directory => &DEFAULT_FORMATTERS[3],
    }
}

fn format_unspecified_immediate_value(_: u32) -> String {
    "(immediate value)".to_string()
}

static DEFAULT_FORMATTERS: [KeyFormatter; 4] = [
    KeyFormatter {
        key_id: INVALID_KEY_ID,
        name: UNSPECIFIED_ENTRY_NAME,
        content: ContentFormat::Immediate(Some(format_unspecified_immediate_value)),
    },
    KeyFormatter {
        key_id: INVALID_KEY_ID,
        name: UNSPECIFIED_ENTRY_NAME,
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: INVALID_KEY_ID,
        name: UNSPECIFIED_ENTRY_NAME,
        content: ContentFormat::Leaf(format::format_unspecified_leaf_content),
    },
    KeyFormatter {
        key_id: INVALID_KEY_ID,
        name: UNSPECIFIED_ENTRY_NAME,
        content: ContentFormat::Directory(format::format_directory_entries),
    },
];

//////////////////////////////////////////////////
// Directory entries for generic keys in IEEE 1212.
//////////////////////////////////////////////////

static CSR_KEY_FORMATTERS: &[KeyFormatter] = &[
    KeyFormatter {
        key_id: KEY_ID_DESCRIPTOR,
        name: "descriptor",
        content: ContentFormat::Leaf(format::format_csr_descriptor_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_DESCRIPTOR,
        name: "descriptor",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_BUS_DEPENDENT_INFO,
        name: "bus dependent info",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_BUS_DEPENDENT_INFO,
        name: "bus dependent info",
        content: ContentFormat::Leaf(format::format_unspecified_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_BUS_DEPENDENT_INFO,
        name: "bus dependent info",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_VENDOR_INFO,
        name: "vendor",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_VENDOR_INFO,
        name: "vendor",
        content: ContentFormat::Leaf(format::format_unspecified_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_VENDOR_INFO,
        name: "vendor",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_HARDWARE_VERSION,
        name: "hardware version",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_MODULE_INFO,
        name: "module",
        content: ContentFormat::Leaf(format::format_csr_eui64_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_MODULE_INFO,
        name: "module",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_EUI_64,
        name: "eui-64",
        content: ContentFormat::Leaf(format::format_csr_eui64_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_UNIT,
        name: "unit",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_SPECIFIER_ID,
        name: "specifier id",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_VERSION,
        name: "version",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_DEPENDENT_INFO,
        name: "dependent info",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_DEPENDENT_INFO,
        name: "dependent info",
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: KEY_ID_DEPENDENT_INFO,
        name: "dependent info",
        content: ContentFormat::Leaf(format::format_unspecified_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_DEPENDENT_INFO,
        name: "dependent info",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_UNIT_LOCATION,
        name: "unit location",
        content: ContentFormat::Leaf(format::format_csr_unit_location_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_MODEL,
        name: "model",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_INSTANCE,
        name: "instance",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_KEYWORD,
        name: "keyword",
        content: ContentFormat::Leaf(format::format_csr_keyword_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_FEATURE,
        name: "feature",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_MODIFIABLE_DESCRIPTOR,
        name: "modifiable descriptor",
        content: ContentFormat::Leaf(format::format_unspecified_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_DIRECTORY_ID,
        name: "directory id",
        content: ContentFormat::Immediate(None),
    },
];

///////////////////////////////////////////////
// Directory entries specific to IEEE 1394 bus.
///////////////////////////////////////////////

fn format_ieee1394_bus_node_capabilities_immediate_value(_: u32) -> String {
    "per IEEE 1394".to_string()
}

static IEEE1394_BUS_KEY_FORMATTERS: &[KeyFormatter] = &[KeyFormatter {
    key_id: KEY_ID_NODE_CAPABILITIES,
    name: "node capabilities",
    content: ContentFormat::Immediate(Some(format_ieee1394_bus_node_capabilities_immediate_value)),
}];

//////////////////////////////////////
// Directory entries specific to SBP.
//////////////////////////////////////

const KEY_ID_SBP2_UNIT_UNIQUE_ID: u8 = 0x0d; // For leaf.
const KEY_ID_SBP2_LOGICAL_UNIT_NUMBER: u8 = 0x14; // For immediate.
const KEY_ID_SBP2_MANAGEMENT_AGENT: u8 = 0x14; // For CSR offset.
const KEY_ID_SBP2_LOGICAL_UNIT: u8 = 0x14; // For directory.
const KEY_ID_SBP3_REVISION: u8 = 0x21; // For immediate.
const KEY_ID_SBP3_PLUG_CONTROL_REGISTER: u8 = 0x32; // For immediate.
const KEY_ID_SBP2_COMMAND_SET_SPEC_ID: u8 = 0x38; // For immediate.
const KEY_ID_SBP2_COMMAND_SET: u8 = 0x39; // For immediate.
const KEY_ID_SBP2_UNIT_CHARACTERISTIC: u8 = 0x3a; // For immediate.
const KEY_ID_SBP2_COMMAND_SET_REVISION: u8 = 0x3b; // For immediate.
const KEY_ID_SBP2_FIRMWARE_REVISION: u8 = 0x3c; // For immediate.
const KEY_ID_SBP2_RECONNECT_TIMEOUT: u8 = 0x3d; // For immediate.
const KEY_ID_SBP3_FAST_START: u8 = 0x3e; // For immediate.

fn format_sbp_logical_unit_number_immediate_value(value: u32) -> String {
    const DEVICE_TYPES: &[&str] = &[
        "Disk",
        "Tape",
        "Printer",
        "Processor",
        "WORM",
        "CD/DVD",
        "Scanner",
        "MOD",
        "Changer",
        "Comm",
        "Prepress",
        "Prepress",
        "RAID",
        "Enclosure",
        "RBC",
        "OCRW",
        "Bridge",
        "OSD",
        "ADC-2",
    ];
    let extended = (value & 0x800000) > 0;
    let ordered = (value & 0x400000) >> 22;
    let isoc = (value & 0x200000) > 0;
    let device_type = ((value & 0x1f0000) >> 16) as usize;
    let mut rendered = String::new();

    if extended {
        rendered.push_str("extended_status 1, ");
    }

    rendered.push_str(&format!("ordered {}, ", ordered));

    if isoc {
        rendered.push_str("isoch 1, ");
    }

    if device_type < DEVICE_TYPES.len() {
        rendered.push_str(&format!("type {},", DEVICE_TYPES[device_type]));
    } else if device_type == 0x1e {
        rendered.push_str("type w.k.LUN,");
    } else if device_type == 0x1f {
        rendered.push_str("type unknown,");
    } else {
        rendered.push_str(&format!("type {:02x}?,", device_type));
    }

    rendered
}

fn format_sbp3_revision_immediate_value(value: u32) -> String {
    let mut rendered = format!("{}", value);

    match value {
        0 => rendered.push_str(" = SBP-2"),
        1 => rendered.push_str(" = SBP-3"),
        _ => (),
    }

    rendered
}

fn format_sbp3_plug_control_register_immediate_value(value: u32) -> String {
    let is_output = (value & 0x20) > 0;
    let plug_index = value & 0x1f;

    format!(
        "{}PCR, plug_index {}",
        if is_output { "o" } else { "i" },
        plug_index
    )
}

fn format_sbp_command_set_immediate_value(value: u32) -> String {
    match value {
        0x0104d8 => "SCSI Primary Commands 2 and related standards".to_string(),
        0x010001 => "AV/C".to_string(),
        _ => String::new(),
    }
}

fn format_sbp_unit_characteristic_immediate_value(value: u32) -> String {
    // The flag for distributed data is extended by SBP-3.
    let distributed_data = (value & 0x010000) > 0;
    let mgt_orb_timeout_sec = 0.5 * ((value & 0x00ff00) >> 8) as f32;
    let orb_size = value & 0x0000ff;
    let mut rendered = String::new();

    if distributed_data {
        rendered.push_str("distrib. data 1, ");
    }

    rendered.push_str(&format!(
        "mgt_ORB_timeout {}s, ORB_size {} quadlets",
        mgt_orb_timeout_sec, orb_size
    ));

    rendered
}

fn format_sbp_firmware_revision_immediate_value(value: u32) -> String {
    format!("{:06x}", value)
}

fn format_sbp_reconnect_timeout_immediate_value(value: u32) -> String {
    let max_reconnect_hold = 1 + (value & 0x00ffff);

    format!("max_reconnect_hold {}s", max_reconnect_hold)
}

fn format_sbp3_fast_start_immediate_value(value: u32) -> String {
    let max_payload = (value & 0x00ff00) >> 8;
    let fast_start_offset = value & 0x0000ff;
    let mut rendered = String::new();

    if max_payload > 0 {
        rendered.push_str(&format!("max_payload {} bytes, ", max_payload << 2));
    } else {
        rendered.push_str("max_payload per max_rec, ");
    }

    rendered.push_str(&format!("offset {}", fast_start_offset));

    rendered
}

static INCITS_SBP_KEY_FORMATTERS: &[KeyFormatter] = &[
    KeyFormatter {
        key_id: KEY_ID_SBP2_UNIT_UNIQUE_ID,
        name: "unit unique id",
        content: ContentFormat::Leaf(format::format_csr_eui64_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_LOGICAL_UNIT_NUMBER,
        name: "logical unit number",
        content: ContentFormat::Immediate(Some(format_sbp_logical_unit_number_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_MANAGEMENT_AGENT,
        name: "management agent CSR",
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_LOGICAL_UNIT,
        name: "logical unit",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP3_REVISION,
        name: "revision",
        content: ContentFormat::Immediate(Some(format_sbp3_revision_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP3_PLUG_CONTROL_REGISTER,
        name: "plug control register",
        content: ContentFormat::Immediate(Some(format_sbp3_plug_control_register_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_COMMAND_SET_SPEC_ID,
        name: "command set spec id",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_COMMAND_SET,
        name: "command set",
        content: ContentFormat::Immediate(Some(format_sbp_command_set_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_UNIT_CHARACTERISTIC,
        name: "unit char.",
        content: ContentFormat::Immediate(Some(format_sbp_unit_characteristic_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_COMMAND_SET_REVISION,
        name: "command set revision",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_FIRMWARE_REVISION,
        name: "firmware revision",
        content: ContentFormat::Immediate(Some(format_sbp_firmware_revision_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP2_RECONNECT_TIMEOUT,
        name: "reconnect timeout",
        content: ContentFormat::Immediate(Some(format_sbp_reconnect_timeout_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_SBP3_FAST_START,
        name: "fast start",
        content: ContentFormat::Immediate(Some(format_sbp3_fast_start_immediate_value)),
    },
];

///////////////////////////////////////
// Directory entries specific to IIDC.
///////////////////////////////////////

const KEY_ID_IIDC_CMD_REG_BASE: u8 = 0x00; // For CSR offset.
const KEY_ID_IIDC_VENDOR_NAME: u8 = 0x01; // For leaf.
const KEY_ID_IIDC_MODEL_NAME: u8 = 0x02; // For leaf.
const KEY_ID_IIDC_131_UNIT_SUB_SW_VERSION: u8 = 0x38; // For immediate.
const KEY_ID_IIDC_131_RESERVED_0: u8 = 0x39;
const KEY_ID_IIDC_131_RESERVED_1: u8 = 0x3a;
const KEY_ID_IIDC_131_RESERVED_2: u8 = 0x3b;
const KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_0: u8 = 0x3c;
const KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_1: u8 = 0x3d;
const KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_2: u8 = 0x3e;
const KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_3: u8 = 0x3f;

const IIDC_131_RESERVED_NAME: &str = "(reserved)";

fn format_iidc_131_unit_sub_sw_version_immediate_value(value: u32) -> String {
    format!("v1.3{}", value >> 4)
}

fn format_iidc2_100_unit_sub_sw_version_immediate_value(value: u32) -> String {
    let major = value >> 16;
    let minor = (value >> 8) & 0xff;
    let micro = value & 0xff;

    format!("v{}.{}.{}", major, minor, micro)
}

static TA1394_IIDC_104_KEY_FORMATTERS: &[KeyFormatter] = &[
    KeyFormatter {
        key_id: KEY_ID_IIDC_CMD_REG_BASE,
        name: "command_regs_base",
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_VENDOR_NAME,
        name: "vendor name",
        content: ContentFormat::Leaf(format::format_iidc_104_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_MODEL_NAME,
        name: "model name",
        content: ContentFormat::Leaf(format::format_iidc_104_leaf_content),
    },
];

static TA1394_IIDC_131_KEY_FORMATTERS: &[KeyFormatter] = &[
    KeyFormatter {
        key_id: KEY_ID_IIDC_CMD_REG_BASE,
        name: "command_regs_base",
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_VENDOR_NAME,
        name: "vendor name",
        content: ContentFormat::Leaf(format::format_iidc_104_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_MODEL_NAME,
        name: "model name",
        content: ContentFormat::Leaf(format::format_iidc_104_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_UNIT_SUB_SW_VERSION,
        name: "unit sub sw version",
        content: ContentFormat::Immediate(Some(
            format_iidc_131_unit_sub_sw_version_immediate_value,
        )),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_RESERVED_0,
        name: IIDC_131_RESERVED_NAME,
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_RESERVED_1,
        name: IIDC_131_RESERVED_NAME,
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_RESERVED_2,
        name: IIDC_131_RESERVED_NAME,
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_0,
        name: "vendor_unique_info_0",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_1,
        name: "vendor_unique_info_1",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_2,
        name: "vendor_unique_info_2",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_3,
        name: "vendor_unique_info_3",
        content: ContentFormat::Immediate(None),
    },
];

static TA1394_IIDC2_100_KEY_FORMATTERS: &[KeyFormatter] = &[
    KeyFormatter {
        key_id: KEY_ID_IIDC_CMD_REG_BASE,
        name: "IIDC2Entry",
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_VENDOR_NAME,
        name: "vendor name",
        content: ContentFormat::Leaf(format::format_iidc_104_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_MODEL_NAME,
        name: "model name",
        content: ContentFormat::Leaf(format::format_iidc_104_leaf_content),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_UNIT_SUB_SW_VERSION,
        name: "unit sub sw version",
        content: ContentFormat::Immediate(Some(
            format_iidc2_100_unit_sub_sw_version_immediate_value,
        )),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_RESERVED_0,
        name: IIDC_131_RESERVED_NAME,
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_RESERVED_1,
        name: IIDC_131_RESERVED_NAME,
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_RESERVED_2,
        name: IIDC_131_RESERVED_NAME,
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_0,
        name: "vendor_unique_info_0",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_1,
        name: "vendor_unique_info_1",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_2,
        name: "vendor_unique_info_2",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IIDC_131_VENDOR_UNIQUE_INFO_3,
        name: "vendor_unique_info_3",
        content: ContentFormat::Immediate(None),
    },
];

//////////////////////////////////////
// Directory entries specific to DPP.
//////////////////////////////////////

const KEY_ID_DPP_111_COMMAND_SET_DIRECTORY: u8 = 0x14; // Just for directory.
const KEY_ID_DPP_111_COMMAND_SET_SPEC_ID: u8 = 0x38; // Just for immediate.
const KEY_ID_DPP_111_COMMAND_SET: u8 = 0x39; // Just for immediate.
const KEY_ID_DPP_111_COMMAND_SET_DETAILS: u8 = 0x3a; // Just for immediate.
const KEY_ID_DPP_111_CONNECTION_REGISTER: u8 = 0x3b; // Just for CSR offset.
const KEY_ID_DPP_111_WRITE_TRANSACTION_INTERVAL: u8 = 0x3c; // Just for immediate.
const KEY_ID_DPP_111_UNIT_SW_DETAILS: u8 = 0x3d; // Just for immediate.

fn format_dpp_111_command_set_immediate_value(value: u32) -> String {
    match value {
        0xb081f2 => "DPC".to_string(),
        0x020000 => "FTC".to_string(),
        _ => String::new(),
    }
}

fn format_dpp_111_write_transaction_interval_immediate_value(value: u32) -> String {
    format!("{}ms", value)
}

fn format_dpp_111_unit_sw_details_immediate_value(value: u32) -> String {
    let major = (value & 0x00f00000) >> 20;
    let minor = (value & 0x000f0000) >> 16;
    let micro = (value & 0x0000f000) >> 12;
    let sdu_write_order = value & 1;

    format!(
        "v{}.{}.{}, sdu_write_order {}",
        major, minor, micro, sdu_write_order
    )
}

static TA1394_DPP_111_KEY_FORMATTERS: &[KeyFormatter] = &[
    KeyFormatter {
        key_id: KEY_ID_DPP_111_COMMAND_SET_DIRECTORY,
        name: "command set directory",
        content: ContentFormat::Directory(format::format_directory_entries),
    },
    KeyFormatter {
        key_id: KEY_ID_DPP_111_COMMAND_SET_SPEC_ID,
        name: "command set spec id",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_DPP_111_COMMAND_SET,
        name: "command set",
        content: ContentFormat::Immediate(Some(format_dpp_111_command_set_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_DPP_111_COMMAND_SET_DETAILS,
        name: "command set details",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_DPP_111_CONNECTION_REGISTER,
        name: "connection CSR",
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: KEY_ID_DPP_111_WRITE_TRANSACTION_INTERVAL,
        name: "write transaction interval",
        content: ContentFormat::Immediate(Some(
            format_dpp_111_write_transaction_interval_immediate_value,
        )),
    },
    KeyFormatter {
        key_id: KEY_ID_DPP_111_UNIT_SW_DETAILS,
        name: "unit sw details",
        content: ContentFormat::Immediate(Some(format_dpp_111_unit_sw_details_immediate_value)),
    },
];

///////////////////////////////////////
// Directory entries specific to IICP.
///////////////////////////////////////

const KEY_ID_IICP_DETAILS: u8 = 0x38; // For immediate.
const KEY_ID_IICP_COMMAND_SET_SPEC_ID: u8 = 0x39; // For immediate.
const KEY_ID_IICP_COMMAND_SET: u8 = 0x3a; // For immediate.
const KEY_ID_IICP_COMMAND_SET_DETAILS: u8 = 0x3b; // For immediate.
const KEY_ID_IICP_CONNECTION_REG_OFFSET: u8 = 0x3c; // For CSR offset.
const KEY_ID_IICP_CAPABILITIES: u8 = 0x3d; // For immediate.
const KEY_ID_IICP_INTERRUPT_ENABLE_REG_OFFSET: u8 = 0x3e; // For CSR offset.
const KEY_ID_IICP_INTERRUPT_HANDR_REG_OFFSET: u8 = 0x3f; // For CSR offset.

fn format_iicp_version_in_bcd(value: u32) -> String {
    let major = ((value & 0xf00000) >> 20) * 10 + ((value & 0x0f0000) >> 16);
    let minor = ((value & 0x00f000) >> 12) * 10 + ((value & 0x000f00) >> 8);

    format!("v{}.{}", major, minor)
}

fn format_iicp_command_set_immediate_value(value: u32) -> String {
    match value {
        0x4b661f => "IICP only".to_string(),
        0xc27f10 => "IICP488".to_string(),
        _ => String::new(),
    }
}

fn format_iicp_capabilities_immediate_value(value: u32) -> String {
    let reserved_high_proto = (value & 0xff0000) >> 16;
    let reserved_iicp = (value & 0x00ffc0) >> 6;
    let ccli = (value & 0x000020) >> 5;
    let cmgr = (value & 0x000010) >> 4;
    let max_int_length_exponent = value & 0x00000f;
    let mut rendered = format!(
        "hi proto {}, IICP {}, ccli {}, cmgr {}",
        reserved_high_proto, reserved_iicp, ccli, cmgr
    );

    if max_int_length_exponent > 0 {
        rendered.push_str(&format!(
            "  maxIntLength {} bytes",
            2u32 << max_int_length_exponent
        ));
    } else {
        rendered.push_str("  maxIntLength -");
    }

    rendered
}

static TA1394_IICP_KEY_FORMATTERS: &[KeyFormatter] = &[
    KeyFormatter {
        key_id: KEY_ID_IICP_DETAILS,
        name: "details",
        content: ContentFormat::Immediate(Some(format_iicp_version_in_bcd)),
    },
    KeyFormatter {
        key_id: KEY_ID_IICP_COMMAND_SET_SPEC_ID,
        name: "command set spec id",
        content: ContentFormat::Immediate(None),
    },
    KeyFormatter {
        key_id: KEY_ID_IICP_COMMAND_SET,
        name: "command set",
        content: ContentFormat::Immediate(Some(format_iicp_command_set_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_IICP_COMMAND_SET_DETAILS,
        name: "command set details",
        content: ContentFormat::Immediate(Some(format_iicp_version_in_bcd)),
    },
    KeyFormatter {
        key_id: KEY_ID_IICP_CONNECTION_REG_OFFSET,
        name: "connection CSR",
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: KEY_ID_IICP_CAPABILITIES,
        name: "capabilities",
        content: ContentFormat::Immediate(Some(format_iicp_capabilities_immediate_value)),
    },
    KeyFormatter {
        key_id: KEY_ID_IICP_INTERRUPT_ENABLE_REG_OFFSET,
        name: "interrupt_enable CSR",
        content: ContentFormat::CsrOffset,
    },
    KeyFormatter {
        key_id: KEY_ID_IICP_INTERRUPT_HANDR_REG_OFFSET,
        name: "interrupt_handlr CSR",
        content: ContentFormat::CsrOffset,
    },
];

////////////////////////////////////////
// Directory entries specific to Apple.
////////////////////////////////////////

const KEY_ID_APPLE_ISIGHT_AUDIO_REG: u8 = 0x00; // For CSR offset.
const KEY_ID_APPLE_ISIGHT_IRIS_REG: u8 = 0x00; // For CSR offset.

static APPLE_ISIGHT_AUDIO_KEY_FORMATTERS: &[KeyFormatter] = &[KeyFormatter {
    key_id: KEY_ID_APPLE_ISIGHT_AUDIO_REG,
    name: "register file",
    content: ContentFormat::CsrOffset,
}];

static APPLE_ISIGHT_IRIS_KEY_FORMATTERS: &[KeyFormatter] = &[KeyFormatter {
    key_id: KEY_ID_APPLE_ISIGHT_IRIS_REG,
    name: "Iris Status Address register",
    content: ContentFormat::CsrOffset,
}];

//////////////////////////////////////////
// The closed set of known specifications.
//////////////////////////////////////////

struct SpecEntry {
    name: &'static str,
    identifier: SpecIdentifier,
    formatters: &'static [KeyFormatter],
}

const OUI_ICANN_IANA: u32 = 0x00005e;
const OUI_INCITS: u32 = 0x00609e;
const OUI_1394TA: u32 = 0x00a02d;
const OUI_ALESIS: u32 = 0x000595;
const OUI_APPLE: u32 = 0x000a27;
const OUI_LACIE: u32 = 0x00d04b;

static SPEC_ENTRIES: &[SpecEntry] = &[
    SpecEntry {
        name: "IPv4 over 1394 (RFC 2734)",
        identifier: SpecIdentifier::new(OUI_ICANN_IANA, 0x000001),
        formatters: &[],
    },
    SpecEntry {
        name: "IPv6 over 1394 (RFC 3146)",
        identifier: SpecIdentifier::new(OUI_ICANN_IANA, 0x000002),
        formatters: &[],
    },
    // NOTE: both SBP-2 and -3 use the same formatters.
    SpecEntry {
        name: "SBP-2",
        identifier: SpecIdentifier::new(OUI_INCITS, 0x010483),
        formatters: INCITS_SBP_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "AV/C over SBP-3",
        identifier: SpecIdentifier::new(OUI_INCITS, 0x0105bb),
        formatters: INCITS_SBP_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "AV/C",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x010001),
        formatters: &[],
    },
    SpecEntry {
        name: "CAL",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x010002),
        formatters: &[],
    },
    SpecEntry {
        name: "EHS",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x010004),
        formatters: &[],
    },
    SpecEntry {
        name: "HAVi",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x010008),
        formatters: &[],
    },
    SpecEntry {
        name: "Vendor Unique",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x014000),
        formatters: &[],
    },
    SpecEntry {
        name: "Vendor Unique and AV/C",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x014001),
        formatters: &[],
    },
    SpecEntry {
        name: "IIDC 1.04",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x000100),
        formatters: TA1394_IIDC_104_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "IIDC 1.20",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x000101),
        formatters: TA1394_IIDC_104_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "IIDC 1.30",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x000102),
        formatters: TA1394_IIDC_131_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "IIDC2",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x000110),
        formatters: TA1394_IIDC2_100_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "DPP 1.0",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x0a6be2),
        formatters: TA1394_DPP_111_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "IICP 1.0",
        identifier: SpecIdentifier::new(OUI_1394TA, 0x4b661f),
        formatters: TA1394_IICP_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "Alesis audio",
        identifier: SpecIdentifier::new(OUI_ALESIS, 0x000001),
        formatters: &[],
    },
    SpecEntry {
        name: "Apple iSight audio",
        identifier: SpecIdentifier::new(OUI_APPLE, 0x000010),
        formatters: APPLE_ISIGHT_AUDIO_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "Apple iSight factory",
        identifier: SpecIdentifier::new(OUI_APPLE, 0x000011),
        formatters: &[],
    },
    SpecEntry {
        name: "Apple iSight iris",
        identifier: SpecIdentifier::new(OUI_APPLE, 0x000012),
        formatters: APPLE_ISIGHT_IRIS_KEY_FORMATTERS,
    },
    SpecEntry {
        name: "LaCie HID",
        identifier: SpecIdentifier::new(OUI_LACIE, 0x484944),
        formatters: &[],
    },
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formatter_for_registered_spec_is_found_with_name() {
        let identifier = SpecIdentifier::new(OUI_INCITS, 0x010483);
        let (formatter, spec_name) =
            detect_key_formatter(&identifier, EntryType::Immediate, KEY_ID_SBP2_LOGICAL_UNIT_NUMBER);
        assert_eq!("logical unit number", formatter.name);
        assert_eq!(Some("SBP-2"), spec_name);
    }

    #[test]
    fn lookup_falls_back_to_generic_tables() {
        // The key for specifier_id is not in the table for SBP, and resolves without the name
        // of specification.
        let identifier = SpecIdentifier::new(OUI_INCITS, 0x010483);
        let (formatter, spec_name) =
            detect_key_formatter(&identifier, EntryType::Immediate, KEY_ID_SPECIFIER_ID);
        assert_eq!("specifier id", formatter.name);
        assert_eq!(None, spec_name);

        let (formatter, spec_name) =
            detect_key_formatter(&identifier, EntryType::Immediate, KEY_ID_NODE_CAPABILITIES);
        assert_eq!("node capabilities", formatter.name);
        assert_eq!(None, spec_name);
    }

    #[test]
    fn lookup_of_unknown_key_yields_default_formatter() {
        let (formatter, spec_name) =
            detect_key_formatter(&SpecIdentifier::UNSET, EntryType::Immediate, 0x3f);
        assert_eq!(UNSPECIFIED_ENTRY_NAME, formatter.name);
        assert!(!formatter.has_known_key());
        assert_eq!(None, spec_name);

        let (formatter, _) = detect_key_formatter(&SpecIdentifier::UNSET, EntryType::Leaf, 0x3f);
        assert_eq!(EntryType::Leaf, formatter.entry_type());
    }

    #[test]
    fn formatter_table_entries_are_consistent() {
        for formatter in CSR_KEY_FORMATTERS {
            assert!(formatter.has_known_key());
        }
        for spec in SPEC_ENTRIES {
            assert_ne!(INVALID_KEY_VALUE, spec.identifier.specifier_id);
            assert_ne!(INVALID_KEY_VALUE, spec.identifier.version);
        }
    }

    #[test]
    fn identifier_is_accumulated_from_parent_chain() {
        use crate::align_to_host_order;

        let mut raw: Vec<u8> = [
            0x01040000u32,
            0x31333934,
            // Root directory with an entry for unit directory.
            0x00010000,
            0xd1000001, // directory at 12 + 4 = 16
            // Unit directory with specifier_id and version, and an entry for sub directory.
            0x00030000,
            0x1200609e,
            0x13010483,
            0xd4000001, // directory at 28 + 4 = 32
            // Dependent directory without specifier entries.
            0x00010000,
            0x17000001,
        ]
        .iter()
        .flat_map(|q| q.to_ne_bytes())
        .collect();
        align_to_host_order(&mut raw);
        let layout = BlockLayout::discover(&raw).unwrap();

        let (unit, _) = layout
            .blocks()
            .find(|(_, block)| block.offset == 16)
            .unwrap();
        let identifier = accumulate_identifier(&layout, Some(unit));
        assert_eq!(SpecIdentifier::new(0x00609e, 0x010483), identifier);

        // The dependent directory inherits the identifier from the chain of parents.
        let (dependent, _) = layout
            .blocks()
            .find(|(_, block)| block.offset == 32)
            .unwrap();
        let identifier = accumulate_identifier(&layout, Some(dependent));
        assert_eq!(SpecIdentifier::new(0x00609e, 0x010483), identifier);
    }

    #[test]
    fn vendor_info_seeds_specifier_id_as_last_resort() {
        let raw: Vec<u8> = [
            0x01040000u32,
            0x31333934,
            // Root directory with vendor information and an entry for sub directory.
            0x00020000,
            0x03123456,
            0xd1000001, // directory at 16 + 4 = 20
            // The directory declares its own version only.
            0x00010000,
            0x13654321,
        ]
        .iter()
        .flat_map(|q| q.to_ne_bytes())
        .collect();
        let layout = BlockLayout::discover(&raw).unwrap();

        let (directory, _) = layout
            .blocks()
            .find(|(_, block)| block.offset == 20)
            .unwrap();
        let identifier = accumulate_identifier(&layout, Some(directory));
        assert_eq!(0x123456, identifier.specifier_id);
        assert_eq!(0x654321, identifier.version);
    }
}
