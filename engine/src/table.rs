//! Fixed-capacity open-addressing rank table
//!
//! Maps card-set masks to dense ranks. The slot space is a flat run of `u64`
//! words split into `count` shards of `size` words each. A key and its value sit
//! in two adjacent words, so probing advances two words at a time, and it wraps
//! inside the key's home shard without ever crossing into another one.
//!
//! There is no resize and no delete. Key 0 marks an empty slot, which is safe
//! because every stored card set has at least one card.
//!
//! On disk (little-endian):
//!
//! ```text
//! size: u32 | count: u32 | total_size: u32 | count x [size x u64] | misses: i32
//! ```

use crate::error::{Error, Result};
use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt, LE};
use rayon::prelude::*;
use std::io::{self, Read, Write};

/// Upper bound on words per shard
pub const MAX_SHARD_WORDS: u64 = 10_000_000;

/// One independently addressed run of slots: key and value words alternate
#[derive(Debug, Clone, PartialEq, Eq)]
struct Shard {
    words: Vec<u64>,
}

impl Shard {
    fn new(size: usize) -> Self {
        Shard {
            words: vec![0u64; size],
        }
    }

    /// Store at the first free (or same-key) slot from `start`. Returns probe misses.
    fn insert(&mut self, start: usize, key: u64, value: u32) -> Option<u32> {
        let len = self.words.len();
        let mut offset = start;
        for misses in 0..(len / 2) as u32 {
            let slot = self.words[offset];
            if slot == 0 || slot == key {
                self.words[offset] = key;
                self.words[offset + 1] = value as u64;
                return Some(misses);
            }
            offset = (offset + 2) % len;
        }
        None
    }

    fn find(&self, start: usize, key: u64) -> Option<u32> {
        let len = self.words.len();
        let mut offset = start;
        for _ in 0..len / 2 {
            match self.words[offset] {
                0 => return None,
                slot if slot == key => return Some(self.words[offset + 1] as u32),
                _ => offset = (offset + 2) % len,
            }
        }
        None
    }

    fn occupied(&self) -> usize {
        self.words.iter().step_by(2).filter(|&&k| k != 0).count()
    }
}

/// Sharded open-addressing map from card-set mask to rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    size: u32,
    count: u32,
    total_size: u32,
    shards: Vec<Shard>,
    misses: i32,
}

impl RankTable {
    /// Allocate room for `entries` key/value pairs.
    ///
    /// Shards double in number until each holds at most `MAX_SHARD_WORDS` words.
    /// Shard size is kept even so a pair never straddles the end of a shard.
    pub fn with_capacity(entries: u64) -> Result<Self> {
        let (size, count) = Self::layout(entries)?;
        log::debug!(
            "allocating rank table: {} shards x {} words ({} MiB)",
            count,
            size,
            (size as u64 * count as u64 * 8) >> 20
        );
        Ok(RankTable {
            size,
            count,
            total_size: size * count,
            shards: (0..count).map(|_| Shard::new(size as usize)).collect(),
            misses: 0,
        })
    }

    /// `(size, count)` for a table holding `entries` pairs
    pub fn layout(entries: u64) -> Result<(u32, u32)> {
        if entries == 0 {
            return Err(Error::Configuration("rank table needs a nonzero capacity".to_string()));
        }
        let words = entries
            .checked_mul(2)
            .ok_or_else(|| Error::Configuration(format!("capacity {} overflows", entries)))?;
        let mut count = 1u64;
        while words / count > MAX_SHARD_WORDS {
            count *= 2;
        }
        let size = words.div_ceil(count).next_multiple_of(2);
        if size * count > u32::MAX as u64 {
            return Err(Error::Configuration(format!(
                "{} slots exceed the 32-bit table header",
                size * count
            )));
        }
        Ok((size as u32, count as u32))
    }

    /// Home shard and word offset of a key
    fn locate(&self, key: u64) -> (usize, usize) {
        let index = key.wrapping_mul(2) % self.total_size as u64;
        let size = self.size as u64;
        ((index / size) as usize, (index % size) as usize)
    }

    /// Store `value` under `key`, replacing any value already stored for it
    pub fn set(&mut self, key: u64, value: u32) -> Result<()> {
        if key == 0 {
            return Err(Error::Validation("key 0 is reserved for empty slots".to_string()));
        }
        let (shard, offset) = self.locate(key);
        let misses = self.shards[shard]
            .insert(offset, key, value)
            .ok_or(Error::ShardFull(shard))?;
        self.misses = self.misses.saturating_add(misses as i32);
        Ok(())
    }

    pub fn get(&self, key: u64) -> Result<u32> {
        if key == 0 {
            return Err(Error::NotFound(key));
        }
        let (shard, offset) = self.locate(key);
        self.shards[shard].find(offset, key).ok_or(Error::NotFound(key))
    }

    /// Insert many pairs, one rayon task per shard.
    ///
    /// Pairs are bucketed by home shard in input order, so the resulting layout
    /// matches sequential insertion of the same pairs. Returns the probe misses
    /// taken by this batch, without saturation.
    pub fn extend_parallel(&mut self, pairs: &[(u64, u32)]) -> Result<u64> {
        if pairs.iter().any(|&(key, _)| key == 0) {
            return Err(Error::Validation("key 0 is reserved for empty slots".to_string()));
        }
        let mut buckets: Vec<Vec<(usize, u64, u32)>> = vec![Vec::new(); self.count as usize];
        for &(key, value) in pairs {
            let (shard, offset) = self.locate(key);
            buckets[shard].push((offset, key, value));
        }
        let misses = self
            .shards
            .par_iter_mut()
            .zip(buckets.par_iter())
            .enumerate()
            .map(|(index, (shard, bucket))| {
                bucket.iter().try_fold(0u64, |acc, &(offset, key, value)| {
                    shard
                        .insert(offset, key, value)
                        .map(|m| acc + m as u64)
                        .ok_or(Error::ShardFull(index))
                })
            })
            .collect::<Result<Vec<u64>>>()?;
        let total: u64 = misses.iter().sum();
        self.misses = self.misses.saturating_add(total.min(i32::MAX as u64) as i32);
        Ok(total)
    }

    /// Words per shard
    pub fn shard_size(&self) -> u32 {
        self.size
    }

    pub fn shard_count(&self) -> u32 {
        self.count
    }

    /// Total words across all shards
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Probe steps past the home slot accumulated by all insertions.
    ///
    /// Stored as the persisted `i32` and saturates at `i32::MAX`, which full
    /// 6- and 7-card builds reach. `BuildSummary::misses` keeps the exact count.
    pub fn misses(&self) -> i32 {
        self.misses
    }

    /// Number of stored keys (full scan)
    pub fn len(&self) -> usize {
        self.shards.par_iter().map(Shard::occupied).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes occupied by the persisted form of this table
    pub fn encoded_len(&self) -> u64 {
        12 + self.total_size as u64 * 8 + 4
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LE>(self.size)?;
        writer.write_u32::<LE>(self.count)?;
        writer.write_u32::<LE>(self.total_size)?;
        let mut buffer = vec![0u8; self.size as usize * 8];
        for shard in &self.shards {
            LE::write_u64_into(&shard.words, &mut buffer);
            writer.write_all(&buffer)?;
        }
        writer.write_i32::<LE>(self.misses)?;
        writer.flush()
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let size = reader.read_u32::<LE>()?;
        let count = reader.read_u32::<LE>()?;
        let total_size = reader.read_u32::<LE>()?;
        if size == 0 || size % 2 != 0 || count == 0 {
            return Err(invalid(format!("bad shard layout: size {} count {}", size, count)));
        }
        if size as u64 * count as u64 != total_size as u64 {
            return Err(invalid(format!(
                "header mismatch: {} x {} != {}",
                size, count, total_size
            )));
        }
        // Shards are allocated only once their bytes have arrived, so a header
        // claiming more data than the stream holds fails without a huge allocation.
        let shard_bytes = size as u64 * 8;
        let mut shards = Vec::new();
        let mut buffer = Vec::new();
        for _ in 0..count {
            buffer.clear();
            reader.by_ref().take(shard_bytes).read_to_end(&mut buffer)?;
            if buffer.len() as u64 != shard_bytes {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("shard data ends after {} of {} bytes", buffer.len(), shard_bytes),
                ));
            }
            let mut shard = Shard::new(size as usize);
            LE::read_u64_into(&buffer, &mut shard.words);
            shards.push(shard);
        }
        let misses = reader.read_i32::<LE>()?;
        Ok(RankTable {
            size,
            count,
            total_size,
            shards,
            misses,
        })
    }
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
