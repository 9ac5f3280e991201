//! Cluster scanning for packets.

use mkvdemux_ebml::{ByteSource, EbmlReader, ElementHeader};
use tracing::{debug, trace};

use crate::block::{decode_block_group, decode_simple_block};
use crate::ids;
use crate::packet::Packet;
use crate::Result;

/// Pull-based packet reader over the cluster area of a segment.
///
/// Clusters are descended into rather than read whole, so unknown-size
/// clusters work and only one block is buffered at a time.
#[derive(Debug, Default)]
pub struct PacketReader {
    cluster_timestamp: u64,
    /// Header already consumed by the metadata walk.
    pending: Option<ElementHeader>,
}

impl PacketReader {
    pub fn new(pending: Option<ElementHeader>) -> Self {
        Self {
            cluster_timestamp: 0,
            pending,
        }
    }

    /// Read the next packet, or `Ok(None)` at end of stream.
    pub fn next_packet<S: ByteSource>(
        &mut self,
        reader: &mut EbmlReader<S>,
        timestamp_scale: u64,
    ) -> Result<Option<Packet>> {
        loop {
            let header = match self.pending.take() {
                Some(header) => header,
                None => match reader.read_element_header_lenient()? {
                    Some(header) => header,
                    None => return Ok(None),
                },
            };

            match header.id {
                ids::CLUSTER => {
                    trace!(offset = header.offset, "Cluster");
                    self.cluster_timestamp = 0;
                }
                ids::TIMESTAMP => {
                    self.cluster_timestamp = reader.read_payload(&header)?.as_uint();
                    trace!(timestamp = self.cluster_timestamp, "cluster Timestamp");
                }
                ids::SIMPLE_BLOCK => {
                    let element = reader.read_payload(&header)?;
                    return decode_simple_block(
                        &element,
                        header.data_offset,
                        self.cluster_timestamp,
                        timestamp_scale,
                    )
                    .map(Some);
                }
                ids::BLOCK_GROUP => {
                    let element = reader.read_payload(&header)?;
                    return decode_block_group(
                        &element,
                        header.data_offset,
                        self.cluster_timestamp,
                        timestamp_scale,
                    )
                    .map(Some);
                }
                other => {
                    debug!(id = %other, size = header.size, "skipping element");
                    reader.skip_element(&header)?;
                }
            }
        }
    }
}
