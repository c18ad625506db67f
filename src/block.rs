// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 Takashi Sakamoto

//! Helpers to detect layout of blocks according to IEEE 1212.
//!
//! The layout keeps every detected block in one arena, with an index sorted by offset for
//! rendering. A block refers to its parent directory by arena index, so that the chain toward
//! the block of root directory can be walked when the specification identifier is accumulated.

use thiserror::Error;
use tracing::debug;

use crate::entry::{DirectoryEntry, EntryType};
use crate::quadlet_at;

/// The index of block in the arena of [`BlockLayout`].
pub type BlockId = usize;

/// The enumeration to express type of block with its specific context.
///
/// Leaf and directory blocks keep the key under which they were referred and the index of the
/// directory block which referred to them at first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockData {
    BusInfo,
    RootDirectory,
    Leaf { key_id: u8, parent: BlockId },
    Directory { key_id: u8, parent: BlockId },
    Orphan,
}

/// The structure to express one block in the image of configuration ROM.
///
/// The length covers the header quadlet and can be shortened by [`BlockLayout::normalize`] when
/// the declared length overlaps the next block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub offset: usize,
    pub length: usize,
    pub data: BlockData,
}

/// The context in which detection of blocks failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutCtx {
    BusInfo,
    RootDirectory,
    DirectoryEntry(u8),
}

impl std::fmt::Display for LayoutCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutCtx::BusInfo => write!(f, "bus-info"),
            LayoutCtx::RootDirectory => write!(f, "root-directory"),
            LayoutCtx::DirectoryEntry(key) => write!(f, "directory-entry (key: {})", key),
        }
    }
}

/// The structure to express error cause to detect layout of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{ctx}: declared length of {declared} bytes at offset 0x{offset:x} exceeds image of {available} bytes")]
    BufferTooShort {
        ctx: LayoutCtx,
        offset: usize,
        declared: usize,
        available: usize,
    },
    #[error("{ctx}: referred offset 0x{offset:x} is outside image of {available} bytes")]
    OutOfSpace {
        ctx: LayoutCtx,
        offset: usize,
        available: usize,
    },
}

/// The structure to express layout of blocks in the image of configuration ROM.
///
/// The structure refers to content of the raw image, thus has the same lifetime of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout<'a> {
    data: &'a [u8],
    blocks: Vec<Block>,
    order: Vec<BlockId>,
}

impl<'a> BlockLayout<'a> {
    /// Detect the blocks reachable from the block of bus information and the block of root
    /// directory.
    ///
    /// A declared length past the end of image is an error and nothing is rendered for the
    /// image. When the block of bus information covers the whole image, no root directory is
    /// detected.
    pub fn discover(data: &'a [u8]) -> Result<Self, LayoutError> {
        let mut layout = BlockLayout {
            data,
            blocks: Vec::new(),
            order: Vec::new(),
        };

        let ctx = LayoutCtx::BusInfo;
        if data.len() < 4 {
            Err(LayoutError::BufferTooShort {
                ctx,
                offset: 0,
                declared: 4,
                available: data.len(),
            })?
        }
        let length = 4 + 4 * ((quadlet_at(data, 0) >> 24) & 0xff) as usize;
        if length > data.len() {
            Err(LayoutError::BufferTooShort {
                ctx,
                offset: 0,
                declared: length,
                available: data.len(),
            })?
        }
        debug!(length, "block of bus information");
        layout.insert(Block {
            offset: 0,
            length,
            data: BlockData::BusInfo,
        });

        let offset = length;
        if offset + 4 <= data.len() {
            let ctx = LayoutCtx::RootDirectory;
            let length = 4 + 4 * ((quadlet_at(&data[offset..], 0) >> 16) & 0xffff) as usize;
            if offset + length > data.len() {
                Err(LayoutError::BufferTooShort {
                    ctx,
                    offset,
                    declared: length,
                    available: data.len(),
                })?
            }
            debug!(offset, length, "block of root directory");
            let root = layout.insert(Block {
                offset,
                length,
                data: BlockData::RootDirectory,
            });
            layout.traverse_directory(root)?;
        }

        Ok(layout)
    }

    fn traverse_directory(&mut self, id: BlockId) -> Result<(), LayoutError> {
        let (directory_offset, directory_length) = {
            let block = &self.blocks[id];
            (block.offset, block.length)
        };

        for i in 1..(directory_length / 4) {
            let entry_offset = directory_offset + 4 * i;
            let entry = DirectoryEntry::from(quadlet_at(&self.data[entry_offset..], 0));

            if entry.entry_type != EntryType::Leaf && entry.entry_type != EntryType::Directory {
                continue;
            }

            let ctx = LayoutCtx::DirectoryEntry(entry.key_id);
            let offset = entry_offset + 4 * entry.value as usize;
            if offset >= self.data.len() {
                Err(LayoutError::OutOfSpace {
                    ctx,
                    offset,
                    available: self.data.len(),
                })?
            }
            if offset + 4 > self.data.len() {
                Err(LayoutError::BufferTooShort {
                    ctx,
                    offset,
                    declared: 4,
                    available: self.data.len(),
                })?
            }
            let length = 4 + 4 * ((quadlet_at(&self.data[offset..], 0) >> 16) & 0xffff) as usize;
            if offset + length > self.data.len() {
                Err(LayoutError::BufferTooShort {
                    ctx,
                    offset,
                    declared: length,
                    available: self.data.len(),
                })?
            }

            // A block referred by several entries is kept once, for the first entry.
            if self.blocks.iter().any(|block| block.offset == offset) {
                continue;
            }

            let data = if entry.entry_type == EntryType::Leaf {
                BlockData::Leaf {
                    key_id: entry.key_id,
                    parent: id,
                }
            } else {
                BlockData::Directory {
                    key_id: entry.key_id,
                    parent: id,
                }
            };
            debug!(offset, length, key = entry.key_id, "referred block");
            let child = self.insert(Block {
                offset,
                length,
                data,
            });

            if entry.entry_type == EntryType::Directory {
                self.traverse_directory(child)?;
            }
        }

        Ok(())
    }

    /// Shorten each block so that it does not overlap its successor, then synthesize orphan
    /// blocks over the gaps. The blocks cover the whole image exactly afterwards.
    pub fn normalize(&mut self) {
        for position in 0..self.order.len() {
            let next_offset = self.next_offset(position);
            let id = self.order[position];
            let block = &mut self.blocks[id];
            if block.offset + block.length > next_offset {
                block.length = next_offset - block.offset;
            }
        }

        let mut gaps = Vec::new();
        for position in 0..self.order.len() {
            let next_offset = self.next_offset(position);
            let block = &self.blocks[self.order[position]];
            let end = block.offset + block.length;
            if end < next_offset {
                gaps.push((end, next_offset - end));
            }
        }
        for (offset, length) in gaps {
            debug!(offset, length, "orphan block");
            self.insert(Block {
                offset,
                length,
                data: BlockData::Orphan,
            });
        }
    }

    fn next_offset(&self, position: usize) -> usize {
        self.order
            .get(position + 1)
            .map_or(self.data.len(), |&id| self.blocks[id].offset)
    }

    fn insert(&mut self, block: Block) -> BlockId {
        let id = self.blocks.len();
        let position = self
            .order
            .iter()
            .rposition(|&i| self.blocks[i].offset <= block.offset)
            .map_or(0, |position| position + 1);
        self.blocks.push(block);
        self.order.insert(position, id);
        id
    }

    /// The raw image the layout was detected in.
    pub fn image(&self) -> &'a [u8] {
        self.data
    }

    /// The block for the given index.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }

    /// The content of the block, header included.
    pub fn content(&self, id: BlockId) -> &'a [u8] {
        let block = &self.blocks[id];
        &self.data[block.offset..(block.offset + block.length)]
    }

    /// Iterate the blocks in ascending order of offset.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.order.iter().map(move |&id| (id, &self.blocks[id]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn image(quadlets: &[u32]) -> Vec<u8> {
        quadlets.iter().flat_map(|q| q.to_ne_bytes()).collect()
    }

    #[test]
    fn bus_info_and_root_directory_are_detected() {
        // Bus information of 2 quadlets, root directory of 1 entry.
        let raw = image(&[
            0x01040000, 0x31333934, 0x00010000, 0x17123456,
        ]);
        let layout = BlockLayout::discover(&raw).unwrap();
        let blocks: Vec<Block> = layout.blocks().map(|(_, block)| *block).collect();
        assert_eq!(2, blocks.len());
        assert_eq!((0, 8, BlockData::BusInfo), (blocks[0].offset, blocks[0].length, blocks[0].data));
        assert_eq!(
            (8, 8, BlockData::RootDirectory),
            (blocks[1].offset, blocks[1].length, blocks[1].data)
        );
    }

    #[test]
    fn image_covered_by_bus_info_has_no_root_directory() {
        let raw = image(&[0x04040400, 0x31333934, 0x0064dc00, 0x0800278b, 0x00000001]);
        let layout = BlockLayout::discover(&raw).unwrap();
        assert_eq!(1, layout.blocks().count());
    }

    #[test]
    fn referred_blocks_are_detected_once() {
        // Two leaf entries refer to the same block.
        let raw = image(&[
            0x01040000,
            0x31333934,
            // Root directory with two entries.
            0x00020000,
            0x8d000002, // leaf at 8 + 4 + 2 * 4 = 20
            0x8d000001, // leaf at 20 as well
            // The leaf block.
            0x00010000,
            0x0800278b,
        ]);
        let layout = BlockLayout::discover(&raw).unwrap();
        let leaves: Vec<&Block> = layout
            .blocks()
            .filter(|(_, block)| matches!(block.data, BlockData::Leaf { .. }))
            .map(|(_, block)| block)
            .collect();
        assert_eq!(1, leaves.len());
        assert_eq!(20, leaves[0].offset);
    }

    #[test]
    fn overlapping_block_is_shortened() {
        let raw = image(&[
            0x01040000,
            0x31333934,
            // Root directory with two leaf entries.
            0x00020000,
            0x8d000002, // leaf at 20, declares 3 quadlets of content
            0x8d000003, // leaf at 28
            // First leaf, overlaps the second.
            0x00030000,
            0x0800278b,
            // Second leaf.
            0x00010000,
            0x00000001,
        ]);
        let mut layout = BlockLayout::discover(&raw).unwrap();
        layout.normalize();
        let leaves: Vec<&Block> = layout
            .blocks()
            .filter(|(_, block)| matches!(block.data, BlockData::Leaf { .. }))
            .map(|(_, block)| block)
            .collect();
        assert_eq!(2, leaves.len());
        assert_eq!((20, 8), (leaves[0].offset, leaves[0].length));
        assert_eq!((28, 8), (leaves[1].offset, leaves[1].length));
    }

    #[test]
    fn gaps_are_covered_by_orphan_blocks() {
        let raw = image(&[
            0x01040000,
            0x31333934,
            0x00010000,
            0x17123456,
            // Nothing refers to the trailing quadlets.
            0xdeadbeef,
            0xcafebabe,
        ]);
        let mut layout = BlockLayout::discover(&raw).unwrap();
        layout.normalize();
        let blocks: Vec<&Block> = layout.blocks().map(|(_, block)| block).collect();
        assert_eq!(3, blocks.len());
        assert_eq!(BlockData::Orphan, blocks[2].data);
        assert_eq!((16, 8), (blocks[2].offset, blocks[2].length));
    }

    #[test]
    fn blocks_cover_the_whole_image() {
        let raw = image(&[
            0x01040000,
            0x31333934,
            0x00020000,
            0x8d000002,
            0xd1000003, // directory at 28
            0x00030000,
            0x0800278b,
            0x00010000,
            0x1200609e,
            0xdeadbeef,
        ]);
        let mut layout = BlockLayout::discover(&raw).unwrap();
        layout.normalize();
        let mut end = 0;
        for (_, block) in layout.blocks() {
            assert_eq!(end, block.offset);
            end += block.length;
        }
        assert_eq!(raw.len(), end);
    }

    #[test]
    fn declared_length_past_image_is_an_error() {
        let raw = image(&[0x10040000, 0x31333934]);
        let err = BlockLayout::discover(&raw).unwrap_err();
        assert!(matches!(err, LayoutError::BufferTooShort { .. }));
    }

    #[test]
    fn entry_referring_outside_image_is_an_error() {
        let raw = image(&[
            0x01040000,
            0x31333934,
            0x00010000,
            0x8d000100, // leaf far past the end of image
        ]);
        let err = BlockLayout::discover(&raw).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfSpace { .. }));
    }
}
