//! Opcode directive tables for 32-bit decoding.
//!
//! Four 256-entry tables, indexed by the terminal opcode byte: the primary
//! map, `0F`, `0F 38` and `0F 3A`. Entry values are derived from the
//! Intel SDM instruction-set reference and are the external contract of the
//! decoder; rows are laid out 16 entries wide so each can be reviewed
//! against the opcode charts.

use crate::opflags::OpFlags;

const NO: OpFlags = OpFlags::empty();
const ER: OpFlags = OpFlags::ERROR;
const RM: OpFlags = OpFlags::RM;
const I8: OpFlags = OpFlags::I8;
const I16: OpFlags = OpFlags::I16;
const I32: OpFlags = OpFlags::I32;
const R8: OpFlags = OpFlags::R8;
const R32: OpFlags = OpFlags::R32;
const RM_I8: OpFlags = OpFlags::RM.union(OpFlags::I8);
const RM_I32: OpFlags = OpFlags::RM.union(OpFlags::I32);
const I16_I8: OpFlags = OpFlags::I16.union(OpFlags::I8);
const I32_I16: OpFlags = OpFlags::I32.union(OpFlags::I16);
const MOFFS: OpFlags = OpFlags::I32.union(OpFlags::AM);
const MP_RM: OpFlags = OpFlags::MP.union(OpFlags::RM);
const VX_RM: OpFlags = OpFlags::VX.union(OpFlags::RM);
const MP_RM_I8: OpFlags = MP_RM.union(OpFlags::I8);
const VX_RM_I8: OpFlags = VX_RM.union(OpFlags::I8);

/// Primary (single-byte) opcode map.
pub const PRIMARY: [OpFlags; 256] = [
    //  x0      x1      x2      x3      x4      x5      x6      x7      x8      x9      xA      xB      xC      xD      xE      xF
    RM,     RM,     RM,     RM,     I8,     I32,    NO,     NO,     RM,     RM,     RM,     RM,     I8,     I32,    NO,     ER,     // 0x
    RM,     RM,     RM,     RM,     I8,     I32,    NO,     NO,     RM,     RM,     RM,     RM,     I8,     I32,    NO,     NO,     // 1x
    RM,     RM,     RM,     RM,     I8,     I32,    ER,     NO,     RM,     RM,     RM,     RM,     I8,     I32,    ER,     NO,     // 2x
    RM,     RM,     RM,     RM,     I8,     I32,    ER,     NO,     RM,     RM,     RM,     RM,     I8,     I32,    ER,     NO,     // 3x
    NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     // 4x
    NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     // 5x
    NO,     NO,     RM,     RM,     ER,     ER,     ER,     ER,     I32,    RM_I32, I8,     RM_I8,  NO,     NO,     NO,     NO,     // 6x
    R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     // 7x
    RM_I8,  RM_I32, RM_I8,  RM_I8,  RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 8x
    NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     I32_I16, NO,    NO,     NO,     NO,     NO,     // 9x
    MOFFS,  MOFFS,  MOFFS,  MOFFS,  NO,     NO,     NO,     NO,     I8,     I32,    NO,     NO,     NO,     NO,     NO,     NO,     // Ax
    I8,     I8,     I8,     I8,     I8,     I8,     I8,     I8,     I32,    I32,    I32,    I32,    I32,    I32,    I32,    I32,    // Bx
    RM_I8,  RM_I8,  I16,    NO,     RM,     RM,     RM_I8,  RM_I32, I16_I8, NO,     I16,    NO,     NO,     I8,     NO,     NO,     // Cx
    RM,     RM,     RM,     RM,     I8,     I8,     NO,     NO,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Dx
    R8,     R8,     R8,     R8,     I8,     I8,     I8,     I8,     R32,    R32,    I32_I16, R8,    NO,     NO,     NO,     NO,     // Ex
    ER,     NO,     ER,     ER,     NO,     NO,     ER,     ER,     NO,     NO,     NO,     NO,     NO,     NO,     RM,     RM,     // Fx
];

/// Two-byte (`0F xx`) opcode map.
pub const MAP_0F: [OpFlags; 256] = [
    //  x0      x1      x2      x3      x4      x5      x6      x7      x8      x9      xA      xB      xC      xD      xE      xF
    RM,     RM,     RM,     RM,     ER,     ER,     NO,     ER,     NO,     NO,     ER,     NO,     ER,     RM,     NO,     ER,     // 0x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 1x
    RM,     RM,     RM,     RM,     RM,     ER,     RM,     ER,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 2x
    NO,     NO,     NO,     NO,     NO,     NO,     ER,     NO,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 3x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 4x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 5x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 6x
    RM_I8,  RM_I8,  RM_I8,  RM_I8,  RM,     RM,     RM,     NO,     RM,     RM,     ER,     ER,     RM,     RM,     RM,     RM,     // 7x
    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    // 8x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 9x
    NO,     NO,     NO,     RM,     RM_I8,  RM,     ER,     ER,     NO,     NO,     NO,     RM,     RM_I8,  RM,     RM,     RM,     // Ax
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     NO,     I8,     RM,     RM,     RM,     RM,     RM,     // Bx
    RM,     RM,     RM_I8,  RM,     RM_I8,  RM_I8,  RM_I8,  RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Cx
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Dx
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Ex
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Fx
];

/// Three-byte (`0F 38 xx`) opcode map.
pub const MAP_0F38: [OpFlags; 256] = [
    //  x0      x1      x2      x3      x4      x5      x6      x7      x8      x9      xA      xB      xC      xD      xE      xF
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     VX_RM,  VX_RM,  ER,     ER,     // 0x
    MP_RM,  ER,     ER,     ER,     MP_RM,  MP_RM,  ER,     MP_RM,  VX_RM,  ER,     VX_RM,  ER,     RM,     RM,     RM,     ER,     // 1x
    MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  ER,     ER,     MP_RM,  MP_RM,  MP_RM,  MP_RM,  VX_RM,  VX_RM,  ER,     ER,     // 2x
    MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  ER,     MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  // 3x
    MP_RM,  MP_RM,  ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 4x
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  ER,     ER,     ER,     ER,     ER,     ER,     // 5x
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 6x
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  ER,     ER,     ER,     ER,     ER,     ER,     // 7x
    MP_RM,  MP_RM,  ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 8x
    ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     // 9x
    ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     // Ax
    ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     // Bx
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     RM,     RM,     RM,     RM,     RM,     RM,     ER,     ER,     // Cx
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     RM,     RM,     RM,     RM,     RM,     // Dx
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // Ex
    RM,     RM,     ER,     ER,     ER,     ER,     RM,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // Fx
];

/// Three-byte (`0F 3A xx`) opcode map.
pub const MAP_0F3A: [OpFlags; 256] = [
    //  x0        x1        x2        x3        x4        x5        x6        x7        x8        x9        xA        xB        xC        xD        xE        xF
    ER,       ER,       ER,       ER,       ER,       ER,       VX_RM_I8, ER,       MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, RM,       // 0x
    ER,       ER,       ER,       ER,       MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, VX_RM_I8, VX_RM_I8, ER,       ER,       ER,       ER,       ER,       ER,       // 1x
    MP_RM_I8, MP_RM_I8, MP_RM_I8, ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 2x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 3x
    MP_RM,    MP_RM,    MP_RM_I8, ER,       ER,       ER,       ER,       ER,       ER,       ER,       VX_RM_I8, VX_RM_I8, VX_RM_I8, ER,       ER,       ER,       // 4x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 5x
    MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, ER,       ER,       ER,       ER,       VX_RM_I8, ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 6x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 7x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 8x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 9x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Ax
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Bx
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       MP_RM_I8, ER,       ER,       ER,       // Cx
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Dx
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Ex
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Fx
];
