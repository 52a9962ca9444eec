//! Fixed-point numerics, binary angles and the fine trig tables used by the
//! software renderer. All arithmetic here wraps instead of panicking.

mod angle;
mod fixed_point;
mod intercept;
mod trig;

pub use angle::*;
pub use fixed_point::*;
pub use intercept::*;
pub use trig::*;

pub const FRACBITS: i32 = 16;
pub const FRACUNIT: i32 = 1 << FRACBITS;

/// Convert a Doom `fixed_t` to `f32`, for logging and tests
pub const fn fixed_to_float(value: i32) -> f32 {
    value as f32 / FRACUNIT as f32
}
