//! Fixed point sine for the sprite affine unit.
//!
//! Angles use a 32768 unit circle. Results are 4.12 fixed point, so `4096`
//! is 1.0. The table holds a quarter wave in 512ths of a turn; the low six
//! bits of the angle interpolate between entries.

/// `sin(i * 2pi / 512) * 4096` for the first quarter turn, inclusive.
pub const SINE_QUARTER: [i16; 129] = [
    0, 50, 101, 151, 201, 251, 301, 351, 401, 451, 501, 551,
    601, 651, 700, 750, 799, 848, 897, 946, 995, 1044, 1092, 1141,
    1189, 1237, 1285, 1332, 1380, 1427, 1474, 1521, 1567, 1614, 1660, 1706,
    1751, 1797, 1842, 1886, 1931, 1975, 2019, 2062, 2106, 2149, 2191, 2234,
    2276, 2317, 2359, 2399, 2440, 2480, 2520, 2559, 2598, 2637, 2675, 2713,
    2751, 2788, 2824, 2861, 2896, 2932, 2967, 3001, 3035, 3068, 3102, 3134,
    3166, 3198, 3229, 3260, 3290, 3320, 3349, 3378, 3406, 3433, 3461, 3487,
    3513, 3539, 3564, 3588, 3612, 3636, 3659, 3681, 3703, 3724, 3745, 3765,
    3784, 3803, 3822, 3839, 3857, 3873, 3889, 3905, 3920, 3934, 3948, 3961,
    3973, 3985, 3996, 4007, 4017, 4027, 4036, 4044, 4052, 4059, 4065, 4071,
    4076, 4081, 4085, 4088, 4091, 4093, 4095, 4096, 4096,
];

/// Full circle lookup, `step` in 512ths of a turn.
#[inline(always)]
fn step_sin(step: i32) -> i32 {
    let s = (step & 0x1FF) as usize;
    match s >> 7 {
        0 => SINE_QUARTER[s] as i32,
        1 => SINE_QUARTER[256 - s] as i32,
        2 => -(SINE_QUARTER[s - 256] as i32),
        _ => -(SINE_QUARTER[512 - s] as i32),
    }
}

pub fn sin(angle: i32) -> i32 {
    let angle = angle & 0x7FFF;
    let step = angle >> 6;
    let frac = angle & 0x3F;
    let a = step_sin(step);
    let b = step_sin(step + 1);
    a + (((b - a) * frac) >> 6)
}

#[inline(always)]
pub fn cos(angle: i32) -> i32 {
    sin(angle + 0x2000)
}

/// Affine parameters `[pa, pb, pc, pd]` for a rotation group.
///
/// `sx`/`sy` are inverse scales where 256 is 1:1.
pub fn affine_matrix(angle: i32, sx: u16, sy: u16) -> [i16; 4] {
    let s = sin(angle);
    let c = cos(angle);
    let sx = sx as i32;
    let sy = sy as i32;
    [
        ((c * sx) >> 12) as i16,
        ((-s * sx) >> 12) as i16,
        ((s * sy) >> 12) as i16,
        ((c * sy) >> 12) as i16,
    ]
}
