//! Version-dependent record frames.
//!
//! # Layouts (little-endian, packed)
//! ```text
//! v1 (24 bytes)                 v2 (28 bytes)                 v3 (36 bytes)
//! ------------------------      ------------------------      ------------------------
//! 0   u32 clock_time            0   u32 clock_time            0   i64 clock_time
//! 4   u64 obj_id                4   u64 obj_id                8   u64 obj_id
//! 12  u32 obj_size              12  u32 obj_size              16  i64 obj_size
//! 16  i64 next_access_vtime     16  u32 op:8 | tenant:24      24  u32 op:8 | tenant:24
//!                               20  i64 next_access_vtime     28  i64 next_access_vtime
//! ```

use crate::common::config::{LCS_V1_RECORD_SIZE, LCS_V2_RECORD_SIZE, LCS_V3_RECORD_SIZE};
use crate::common::{Error, ObjId, Result};
use crate::trace::request::{NextAccess, Op, Request};

const TENANT_MASK: u32 = 0x00ff_ffff;

/// Record layout negotiated from the header version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LcsVersion {
    V1,
    V2,
    V3,
}

impl LcsVersion {
    /// Map a header version number to a record layout.
    ///
    /// # Errors
    /// Returns `Error::UnknownRecordVersion` for any version without a layout.
    pub fn from_i64(version: i64) -> Result<Self> {
        match version {
            1 => Ok(LcsVersion::V1),
            2 => Ok(LcsVersion::V2),
            3 => Ok(LcsVersion::V3),
            other => Err(Error::UnknownRecordVersion(other)),
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            LcsVersion::V1 => 1,
            LcsVersion::V2 => 2,
            LcsVersion::V3 => 3,
        }
    }

    /// Size of one record frame in bytes.
    #[inline]
    pub fn record_size(self) -> usize {
        match self {
            LcsVersion::V1 => LCS_V1_RECORD_SIZE,
            LcsVersion::V2 => LCS_V2_RECORD_SIZE,
            LcsVersion::V3 => LCS_V3_RECORD_SIZE,
        }
    }

    /// Decode one frame into a valid request.
    ///
    /// The next-access time is normalized through [`NextAccess::from_raw`].
    ///
    /// # Panics
    /// Panics if `data.len() < self.record_size()`.
    pub fn decode(self, data: &[u8]) -> Request {
        assert!(data.len() >= self.record_size(), "buffer too small for record");

        let mut req = Request {
            valid: true,
            ..Request::default()
        };

        match self {
            LcsVersion::V1 => {
                req.clock_time = i64::from(read_u32(data, 0));
                req.obj_id = ObjId(read_u64(data, 4));
                req.obj_size = i64::from(read_u32(data, 12));
                req.next_access = NextAccess::from_raw(read_i64(data, 16));
            }
            LcsVersion::V2 => {
                req.clock_time = i64::from(read_u32(data, 0));
                req.obj_id = ObjId(read_u64(data, 4));
                req.obj_size = i64::from(read_u32(data, 12));
                let (op, tenant) = unpack_op_tenant(read_u32(data, 16));
                req.op = Some(op);
                req.tenant_id = Some(tenant);
                req.next_access = NextAccess::from_raw(read_i64(data, 20));
            }
            LcsVersion::V3 => {
                req.clock_time = read_i64(data, 0);
                req.obj_id = ObjId(read_u64(data, 8));
                req.obj_size = read_i64(data, 16);
                let (op, tenant) = unpack_op_tenant(read_u32(data, 24));
                req.op = Some(op);
                req.tenant_id = Some(tenant);
                req.next_access = NextAccess::from_raw(read_i64(data, 28));
            }
        }

        req
    }

    /// Encode `req` into one frame.
    ///
    /// v1/v2 store timestamp and size as `u32`; wider values are truncated.
    /// Tenant ids are truncated to 24 bits. Missing op/tenant encode as zero.
    ///
    /// # Panics
    /// Panics if `data.len() < self.record_size()`.
    pub fn encode(self, req: &Request, data: &mut [u8]) {
        assert!(data.len() >= self.record_size(), "buffer too small for record");

        let packed = pack_op_tenant(req.op.unwrap_or_default(), req.tenant_id.unwrap_or(0));
        let vtime = req.next_access.to_raw();

        match self {
            LcsVersion::V1 => {
                put(data, 0, &(req.clock_time as u32).to_le_bytes());
                put(data, 4, &req.obj_id.0.to_le_bytes());
                put(data, 12, &(req.obj_size as u32).to_le_bytes());
                put(data, 16, &vtime.to_le_bytes());
            }
            LcsVersion::V2 => {
                put(data, 0, &(req.clock_time as u32).to_le_bytes());
                put(data, 4, &req.obj_id.0.to_le_bytes());
                put(data, 12, &(req.obj_size as u32).to_le_bytes());
                put(data, 16, &packed.to_le_bytes());
                put(data, 20, &vtime.to_le_bytes());
            }
            LcsVersion::V3 => {
                put(data, 0, &req.clock_time.to_le_bytes());
                put(data, 8, &req.obj_id.0.to_le_bytes());
                put(data, 16, &req.obj_size.to_le_bytes());
                put(data, 24, &packed.to_le_bytes());
                put(data, 28, &vtime.to_le_bytes());
            }
        }
    }
}

fn unpack_op_tenant(word: u32) -> (Op, u32) {
    (Op::from_u8((word & 0xff) as u8), word >> 8)
}

fn pack_op_tenant(op: Op, tenant: u32) -> u32 {
    ((tenant & TENANT_MASK) << 8) | op as u32
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

fn read_i64(data: &[u8], offset: usize) -> i64 {
    read_u64(data, offset) as i64
}

fn put(data: &mut [u8], offset: usize, bytes: &[u8]) {
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1_frame(clock: u32, id: u64, size: u32, vtime: i64) -> [u8; LCS_V1_RECORD_SIZE] {
        let mut frame = [0u8; LCS_V1_RECORD_SIZE];
        frame[0..4].copy_from_slice(&clock.to_le_bytes());
        frame[4..12].copy_from_slice(&id.to_le_bytes());
        frame[12..16].copy_from_slice(&size.to_le_bytes());
        frame[16..24].copy_from_slice(&vtime.to_le_bytes());
        frame
    }

    #[test]
    fn test_version_mapping() {
        assert_eq!(LcsVersion::from_i64(1).unwrap(), LcsVersion::V1);
        assert_eq!(LcsVersion::from_i64(3).unwrap().record_size(), 36);
        assert!(matches!(
            LcsVersion::from_i64(0),
            Err(Error::UnknownRecordVersion(0))
        ));
        assert!(matches!(
            LcsVersion::from_i64(4),
            Err(Error::UnknownRecordVersion(4))
        ));
    }

    #[test]
    fn test_decode_v1_leaves_tenant_and_op_unset() {
        let req = LcsVersion::V1.decode(&v1_frame(17, 42, 4096, 99));

        assert!(req.valid);
        assert_eq!(req.clock_time, 17);
        assert_eq!(req.obj_id, ObjId(42));
        assert_eq!(req.obj_size, 4096);
        assert_eq!(req.next_access, NextAccess::At(99));
        assert_eq!(req.tenant_id, None);
        assert_eq!(req.op, None);
    }

    #[test]
    fn test_decode_normalizes_sentinels() {
        let never = LcsVersion::V1.decode(&v1_frame(0, 1, 1, -1));
        assert_eq!(never.next_access, NextAccess::Never);

        let max = LcsVersion::V1.decode(&v1_frame(0, 1, 1, i64::MAX));
        assert_eq!(max.next_access, NextAccess::Never);

        let finite = LcsVersion::V1.decode(&v1_frame(0, 1, 1, i64::MAX - 1));
        assert_eq!(finite.next_access, NextAccess::At(i64::MAX - 1));
    }

    #[test]
    fn test_decode_v2_packed_op_tenant() {
        let mut frame = [0u8; LCS_V2_RECORD_SIZE];
        frame[0..4].copy_from_slice(&5u32.to_le_bytes());
        frame[4..12].copy_from_slice(&7u64.to_le_bytes());
        frame[12..16].copy_from_slice(&128u32.to_le_bytes());
        // op = SET (3), tenant = 0x0abcde
        frame[16..20].copy_from_slice(&((0x0abcde_u32 << 8) | 3).to_le_bytes());
        frame[20..28].copy_from_slice(&1000i64.to_le_bytes());

        let req = LcsVersion::V2.decode(&frame);
        assert_eq!(req.op, Some(Op::Set));
        assert_eq!(req.tenant_id, Some(0x0abcde));
        assert_eq!(req.next_access, NextAccess::At(1000));
    }

    #[test]
    fn test_v3_wide_fields() {
        let req = Request {
            clock_time: 1 << 40,
            obj_id: ObjId(u64::MAX - 1),
            obj_size: 1 << 35,
            next_access: NextAccess::Never,
            tenant_id: Some(12),
            op: Some(Op::Delete),
            valid: true,
        };

        let mut frame = [0u8; LCS_V3_RECORD_SIZE];
        LcsVersion::V3.encode(&req, &mut frame);
        assert_eq!(LcsVersion::V3.decode(&frame), req);
    }

    #[test]
    fn test_v2_encode_truncates_tenant() {
        let req = Request::new(1, 1);
        let req = Request {
            tenant_id: Some(0x1ff_ffff),
            op: Some(Op::Get),
            ..req
        };

        let mut frame = [0u8; LCS_V2_RECORD_SIZE];
        LcsVersion::V2.encode(&req, &mut frame);
        let decoded = LcsVersion::V2.decode(&frame);
        assert_eq!(decoded.tenant_id, Some(0x00ff_ffff));
        assert_eq!(decoded.op, Some(Op::Get));
    }
}
