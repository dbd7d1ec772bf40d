//! TLSH (128 buckets, 1-byte checksum).
//!
//! Follows the reference trend-micro implementation: a 5-byte sliding window
//! feeds six salted Pearson-hash triplets into 256 counters, of which the
//! first 128 are encoded as 2-bit quartile codes. The rendered digest is
//! `T1` followed by 70 uppercase hex characters.

use super::Fingerprinter;

/// Inputs shorter than this produce [`NULL_DIGEST`].
pub const MIN_DATA_LENGTH: usize = 50;

/// Sentinel for inputs that cannot be hashed.
pub const NULL_DIGEST: &str = "TNULL";

const WINDOW: usize = 5;
const BUCKETS: usize = 256;
const EFF_BUCKETS: usize = 128;
const CODE_SIZE: usize = 32;

const V_TABLE: [u8; 256] = [
    1, 87, 49, 12, 176, 178, 102, 166, 121, 193, 6, 84, 249, 230, 44, 163, 14, 197, 213, 181, 161,
    85, 218, 80, 64, 239, 24, 226, 236, 142, 38, 200, 110, 177, 104, 103, 141, 253, 255, 50, 77,
    101, 81, 18, 45, 96, 31, 222, 25, 107, 190, 70, 86, 237, 240, 34, 72, 242, 20, 214, 244, 227,
    149, 235, 97, 234, 57, 22, 60, 250, 82, 175, 208, 5, 127, 199, 111, 62, 135, 248, 174, 169,
    211, 58, 66, 154, 106, 195, 245, 171, 17, 187, 182, 179, 0, 243, 132, 56, 148, 75, 128, 133,
    158, 100, 130, 126, 91, 13, 153, 246, 216, 219, 119, 68, 223, 78, 83, 88, 201, 99, 122, 11, 92,
    32, 136, 114, 52, 10, 138, 30, 48, 183, 156, 35, 61, 26, 143, 74, 251, 94, 129, 162, 63, 152,
    170, 7, 115, 167, 241, 206, 3, 150, 55, 59, 151, 220, 90, 53, 23, 131, 125, 173, 15, 238, 79,
    95, 89, 16, 105, 137, 225, 224, 217, 160, 37, 123, 118, 73, 2, 157, 46, 116, 9, 145, 134, 228,
    207, 212, 202, 215, 69, 229, 27, 188, 67, 124, 168, 252, 42, 4, 29, 108, 21, 247, 19, 205, 39,
    203, 233, 40, 186, 147, 198, 192, 155, 33, 164, 191, 98, 204, 165, 180, 117, 76, 140, 36, 210,
    172, 41, 54, 159, 8, 185, 232, 113, 196, 231, 47, 146, 120, 51, 65, 28, 144, 254, 221, 93, 189,
    194, 139, 112, 43, 71, 109, 184, 209,
];

/// The default fingerprint primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tlsh;

impl Fingerprinter for Tlsh {
    fn fingerprint(&self, data: &[u8]) -> String {
        let mut state = TlshState::new();
        state.update(data);
        state.finish().unwrap_or_else(|| NULL_DIGEST.to_string())
    }
}

struct TlshState {
    buckets: [u32; BUCKETS],
    window: [u8; WINDOW],
    checksum: u8,
    len: usize,
}

impl TlshState {
    fn new() -> Self {
        Self {
            buckets: [0; BUCKETS],
            window: [0; WINDOW],
            checksum: 0,
            len: 0,
        }
    }

    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let j = self.len % WINDOW;
            self.window[j] = byte;

            if self.len >= WINDOW - 1 {
                let w = &self.window;
                let b0 = w[j];
                let b1 = w[(j + 4) % WINDOW];
                let b2 = w[(j + 3) % WINDOW];
                let b3 = w[(j + 2) % WINDOW];
                let b4 = w[(j + 1) % WINDOW];

                self.checksum = pearson(0, b0, b1, self.checksum);

                for idx in [
                    pearson(2, b0, b1, b2),
                    pearson(3, b0, b1, b3),
                    pearson(5, b0, b2, b3),
                    pearson(7, b0, b2, b4),
                    pearson(11, b0, b1, b4),
                    pearson(13, b0, b3, b4),
                ] {
                    self.buckets[idx as usize] += 1;
                }
            }
            self.len += 1;
        }
    }

    fn finish(&self) -> Option<String> {
        if self.len < MIN_DATA_LENGTH {
            return None;
        }

        let counts = &self.buckets[..EFF_BUCKETS];
        let nonzero = counts.iter().filter(|&&c| c > 0).count();
        if nonzero <= EFF_BUCKETS / 2 {
            return None;
        }

        let mut sorted = counts.to_vec();
        sorted.sort_unstable();
        let q1 = sorted[EFF_BUCKETS / 4 - 1];
        let q2 = sorted[EFF_BUCKETS / 2 - 1];
        let q3 = sorted[EFF_BUCKETS - EFF_BUCKETS / 4 - 1];
        // More than half the buckets are non-zero, so q2 and q3 are too.
        if q3 == 0 {
            return None;
        }

        let mut code = [0u8; CODE_SIZE];
        for (i, slot) in code.iter_mut().enumerate() {
            let mut h = 0u8;
            for j in 0..4 {
                let k = counts[4 * i + j];
                let level = if q3 < k {
                    3
                } else if q2 < k {
                    2
                } else if q1 < k {
                    1
                } else {
                    0
                };
                h += level << (j * 2);
            }
            *slot = h;
        }

        let lvalue = l_capture(self.len);
        let q1_ratio = ((q1 as u64 * 100) / q3 as u64 % 16) as u8;
        let q2_ratio = ((q2 as u64 * 100) / q3 as u64 % 16) as u8;
        let q_byte = (q2_ratio << 4) | q1_ratio;

        let mut out = String::with_capacity(2 + 2 * (3 + CODE_SIZE));
        out.push_str(super::VERSION_PREFIX);
        for byte in [swap_nibbles(self.checksum), swap_nibbles(lvalue), swap_nibbles(q_byte)] {
            push_hex(&mut out, byte);
        }
        for &byte in code.iter().rev() {
            push_hex(&mut out, byte);
        }
        Some(out)
    }
}

fn pearson(salt: u8, i: u8, j: u8, k: u8) -> u8 {
    let mut h = V_TABLE[salt as usize];
    h = V_TABLE[(h ^ i) as usize];
    h = V_TABLE[(h ^ j) as usize];
    V_TABLE[(h ^ k) as usize]
}

/// Log-bucketed input length.
fn l_capture(len: usize) -> u8 {
    const LOG_1_5: f32 = 0.405_465_1;
    const LOG_1_3: f32 = 0.262_364_26;
    const LOG_1_1: f32 = 0.095_310_18;

    let ln = (len as f32).ln();
    let i = if len <= 656 {
        (ln / LOG_1_5).floor()
    } else if len <= 3199 {
        (ln / LOG_1_3 - 8.727_77).floor()
    } else {
        (ln / LOG_1_1 - 62.547_2).floor()
    };
    (i as i64 & 0xff) as u8
}

fn swap_nibbles(b: u8) -> u8 {
    b.rotate_left(4)
}

fn push_hex(out: &mut String, byte: u8) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    out.push(HEX[(byte >> 4) as usize] as char);
    out.push(HEX[(byte & 0x0f) as usize] as char);
}
