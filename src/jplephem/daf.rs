//! Double Array File format module for reading SPICE DAF files
//!
//! A DAF file is a sequence of 1024-byte records. Record 1 is the file
//! record; a doubly linked list of summary records (each followed by a name
//! record) describes the arrays stored in the rest of the file. Array data is
//! addressed by 1-based double-precision word numbers.

use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use memmap2::Mmap;

use crate::jplephem::errors::{io_err, JplephemError, Result};

/// Size of a DAF record (bytes)
const RECORD_SIZE: usize = 1024;
/// Size of a double-precision value (bytes)
const DOUBLE_SIZE: usize = 8;
/// Bytes taken by the control words (next, previous, count) of a summary record
const SUMMARY_CONTROL_SIZE: usize = 3 * DOUBLE_SIZE;

/// DAF file endianness
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Endian {
    Big,
    Little,
}

/// One array summary: its name plus the ND doubles and NI integers describing it
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub name: String,
    pub doubles: Vec<f64>,
    pub integers: Vec<i32>,
}

/// Double Array File (DAF) file reader
pub struct DAF {
    /// Path to the DAF file
    pub path: PathBuf,
    /// File version word, e.g. `DAF/SPK`
    pub locidw: String,
    /// Number of double-precision components per summary
    pub nd: usize,
    /// Number of integer components per summary
    pub ni: usize,
    /// Forward pointer to first summary record
    pub fward: usize,
    /// Backward pointer to last summary record
    pub bward: usize,
    /// First free address
    pub free: usize,
    /// Internal file name
    pub ifname: String,
    /// Byte order (endianness)
    pub endian: Endian,
    map: Mmap,
}

impl DAF {
    /// Open a DAF file at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| io_err(&path, e))?;

        // SAFETY: the map is read-only and kernels are not rewritten while in use.
        let map = unsafe { Mmap::map(&file) }
            .map_err(|e| JplephemError::MemoryMapError(format!("{}: {}", path.display(), e)))?;

        if map.len() < RECORD_SIZE {
            return Err(JplephemError::InvalidFormat(format!(
                "{} is too short to be a DAF file ({} bytes)",
                path.display(),
                map.len()
            )));
        }

        let locidw = ascii(&map[0..8]);
        if !locidw.starts_with("DAF/") && locidw != "NAIF/DAF" {
            return Err(JplephemError::InvalidFormat(format!(
                "unrecognized file identification word {:?}",
                locidw
            )));
        }

        let endian = match ascii(&map[88..96]).as_str() {
            "LTL-IEEE" => Endian::Little,
            "BIG-IEEE" => Endian::Big,
            // Pre-N0050 files lack LOCFMT; ND is always small, so try both orders
            _ if LittleEndian::read_i32(&map[8..12]) as u32 <= 124 => Endian::Little,
            _ => Endian::Big,
        };

        let mut daf = DAF {
            path,
            locidw,
            nd: 0,
            ni: 0,
            fward: 0,
            bward: 0,
            free: 0,
            ifname: ascii(&map[16..76]),
            endian,
            map,
        };

        daf.nd = daf.read_count(8)?;
        daf.ni = daf.read_count(12)?;
        daf.fward = daf.read_count(76)?;
        daf.bward = daf.read_count(80)?;
        daf.free = daf.read_count(84)?;

        if daf.nd == 0 || daf.ni == 0 || daf.fward == 0 {
            return Err(JplephemError::InvalidFormat(format!(
                "Invalid DAF header: nd={}, ni={}, fward={}",
                daf.nd, daf.ni, daf.fward
            )));
        }

        log::debug!(
            "DAF {}: locidw={}, nd={}, ni={}, fward={}, bward={}, free={}, endian={:?}",
            daf.path.display(),
            daf.locidw,
            daf.nd,
            daf.ni,
            daf.fward,
            daf.bward,
            daf.free,
            daf.endian
        );

        Ok(daf)
    }

    /// Size of one summary in double-precision words
    fn summary_length(&self) -> usize {
        self.nd + (self.ni + 1) / 2
    }

    fn read_f64(&self, offset: usize) -> f64 {
        let bytes = &self.map[offset..offset + DOUBLE_SIZE];
        match self.endian {
            Endian::Little => LittleEndian::read_f64(bytes),
            Endian::Big => BigEndian::read_f64(bytes),
        }
    }

    fn read_i32(&self, offset: usize) -> i32 {
        let bytes = &self.map[offset..offset + 4];
        match self.endian {
            Endian::Little => LittleEndian::read_i32(bytes),
            Endian::Big => BigEndian::read_i32(bytes),
        }
    }

    fn read_count(&self, offset: usize) -> Result<usize> {
        let value = self.read_i32(offset);
        usize::try_from(value).map_err(|_| {
            JplephemError::InvalidFormat(format!("negative header word {} at byte {}", value, offset))
        })
    }

    /// Byte range of a 1-based record, checked against the file length
    fn record_bounds(&self, record_number: usize) -> Result<usize> {
        let start = record_number
            .checked_sub(1)
            .map(|r| r * RECORD_SIZE)
            .ok_or_else(|| JplephemError::InvalidFormat("record number 0".to_string()))?;
        if start + RECORD_SIZE > self.map.len() {
            return Err(JplephemError::InvalidFormat(format!(
                "record {} lies beyond the end of the file",
                record_number
            )));
        }
        Ok(start)
    }

    /// Walk the summary-record list and return every array summary
    pub fn summaries(&self) -> Result<Vec<Summary>> {
        let step = self.summary_length() * DOUBLE_SIZE;
        let per_record = (RECORD_SIZE - SUMMARY_CONTROL_SIZE) / step;

        let mut summaries = Vec::new();
        let mut visited = std::collections::HashSet::new();
        let mut record_number = self.fward;

        while record_number > 0 {
            if !visited.insert(record_number) {
                return Err(JplephemError::InvalidFormat(format!(
                    "cycle in summary records at record {}",
                    record_number
                )));
            }

            let base = self.record_bounds(record_number)?;
            let names = self.record_bounds(record_number + 1)?;

            let next = self.read_f64(base) as usize;
            let count = self.read_f64(base + 2 * DOUBLE_SIZE) as usize;
            if count > per_record {
                return Err(JplephemError::InvalidFormat(format!(
                    "summary record {} claims {} summaries, at most {} fit",
                    record_number, count, per_record
                )));
            }

            for i in 0..count {
                let offset = base + SUMMARY_CONTROL_SIZE + i * step;
                let doubles = (0..self.nd)
                    .map(|k| self.read_f64(offset + k * DOUBLE_SIZE))
                    .collect();
                let int_base = offset + self.nd * DOUBLE_SIZE;
                let integers = (0..self.ni)
                    .map(|k| self.read_i32(int_base + k * 4))
                    .collect();
                let name_offset = names + i * step;
                let name = ascii(&self.map[name_offset..name_offset + step]);

                summaries.push(Summary {
                    name,
                    doubles,
                    integers,
                });
            }

            record_number = next;
        }

        Ok(summaries)
    }

    /// Read words `start..=end` (1-based) as doubles
    pub fn read_array(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        if start == 0 || end < start || end * DOUBLE_SIZE > self.map.len() {
            return Err(JplephemError::InvalidFormat(format!(
                "array words {}..={} outside file of {} bytes",
                start,
                end,
                self.map.len()
            )));
        }
        Ok((start..=end)
            .map(|word| self.read_f64((word - 1) * DOUBLE_SIZE))
            .collect())
    }
}

/// Decode a fixed-width ASCII field, dropping trailing blanks and NULs
fn ascii(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(|c: char| c == ' ' || c == '\0')
        .to_string()
}
