/// Feedback polynomial: taps XOR `$21` into the low byte and `$10` into the
/// high byte whenever a one shifts out of bit 15.
pub const POLYNOMIAL: u16 = 0x1021;

/// CRC-16 over `bytes`, fed last byte first, MSB first.
///
/// Both register bytes start out as the number of bytes covered.
pub fn checksum(bytes: &[u8]) -> u16 {
    let seed = bytes.len() as u8;
    let mut crc = u16::from_le_bytes([seed, seed]);
    for &byte in bytes.iter().rev() {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}
