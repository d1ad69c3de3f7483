//! Encoding implementations for SCTE-35 splice commands.

use crate::encoding::{BitWriter, Encodable, EncodingError, EncodingResult};
use crate::types::{SpliceCommand, SpliceInsert, SpliceInsertComponent, TimeSignal};

impl Encodable for SpliceCommand {
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        match self {
            SpliceCommand::SpliceNull => Ok(()),
            SpliceCommand::SpliceInsert(insert) => insert.encode(writer),
            SpliceCommand::TimeSignal(signal) => signal.encode(writer),
        }
    }

    fn encoded_size(&self) -> usize {
        match self {
            SpliceCommand::SpliceNull => 0,
            SpliceCommand::SpliceInsert(insert) => insert.encoded_size(),
            SpliceCommand::TimeSignal(signal) => signal.encoded_size(),
        }
    }
}

impl Encodable for TimeSignal {
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        self.splice_time.encode(writer)
    }

    fn encoded_size(&self) -> usize {
        self.splice_time.encoded_size()
    }
}

impl Encodable for SpliceInsert {
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        writer.write_bits(self.splice_event_id as u64, 32)?;
        writer.write_bit(self.splice_event_cancel_indicator)?;
        writer.write_bits(0x7F, 7)?;

        if self.splice_event_cancel_indicator {
            return Ok(());
        }

        writer.write_bit(self.out_of_network_indicator)?;
        writer.write_bit(self.program_splice_flag)?;
        writer.write_bit(self.duration_flag())?;
        writer.write_bit(self.splice_immediate_flag)?;
        writer.write_bits(0x0F, 4)?;

        if self.program_splice_flag {
            if !self.splice_immediate_flag {
                match &self.splice_time {
                    Some(splice_time) if splice_time.time_specified_flag() => {
                        splice_time.encode(writer)?
                    }
                    _ => {
                        return Err(EncodingError::InvalidFieldValue {
                            field: "splice_time",
                            value: "a scheduled program splice needs a PTS".to_string(),
                        });
                    }
                }
            }
        } else {
            writer.write_field("component_count", self.components.len() as u64, 8)?;
            for component in &self.components {
                writer.write_bits(component.component_tag as u64, 8)?;
                if !self.splice_immediate_flag {
                    encode_component_time(component, writer)?;
                }
            }
        }

        if let Some(break_duration) = &self.break_duration {
            break_duration.encode(writer)?;
        }

        writer.write_bits(self.unique_program_id as u64, 16)?;
        writer.write_bits(self.avail_num as u64, 8)?;
        writer.write_bits(self.avails_expected as u64, 8)
    }

    fn encoded_size(&self) -> usize {
        // splice_event_id, cancel indicator and reserved bits
        let mut size = 5;
        if self.splice_event_cancel_indicator {
            return size;
        }

        // flags
        size += 1;
        if self.program_splice_flag {
            if !self.splice_immediate_flag {
                size += self.splice_time.map_or(0, |time| time.encoded_size());
            }
        } else {
            size += 1;
            for component in &self.components {
                size += 1;
                if !self.splice_immediate_flag {
                    size += component.splice_time.map_or(0, |time| time.encoded_size());
                }
            }
        }
        if let Some(break_duration) = &self.break_duration {
            size += break_duration.encoded_size();
        }

        // unique_program_id, avail_num, avails_expected
        size + 4
    }
}

fn encode_component_time(
    component: &SpliceInsertComponent,
    writer: &mut BitWriter,
) -> EncodingResult<()> {
    match &component.splice_time {
        Some(splice_time) => splice_time.encode(writer),
        None => Err(EncodingError::InvalidFieldValue {
            field: "component_splice_time",
            value: format!("component {} has no splice_time", component.component_tag),
        }),
    }
}
