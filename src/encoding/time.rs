//! Encoding implementations for SCTE-35 time structures.

use crate::encoding::{BitWriter, Encodable, EncodingResult};
use crate::time::{BreakDuration, SpliceTime};

impl Encodable for SpliceTime {
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        match self.pts_time {
            Some(pts) => {
                writer.write_bit(true)?;
                writer.write_bits(0x3F, 6)?;
                writer.write_field("pts_time", pts.ticks(), 33)
            }
            None => {
                writer.write_bit(false)?;
                writer.write_bits(0x7F, 7)
            }
        }
    }

    fn encoded_size(&self) -> usize {
        if self.pts_time.is_some() { 5 } else { 1 }
    }
}

impl Encodable for BreakDuration {
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        writer.write_bit(self.auto_return)?;
        writer.write_bits(0x3F, 6)?;
        writer.write_field("break_duration", self.duration, 33)
    }

    fn encoded_size(&self) -> usize {
        5
    }
}
