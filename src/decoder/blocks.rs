//! Block interleaving for ECC 200 symbols.
//!
//! Large symbols split their codewords into `n` Reed-Solomon blocks. Data
//! codeword `i` belongs to block `i % n`; ECC codeword `k` (counted after
//! all data) belongs to block `k % n`. In the 144x144 symbol the data
//! blocks differ in length by one.
use crate::decoder::reed_solomon::{ReedSolomonDecoder, ReedSolomonEncoder};
use crate::error::DecodeError;
use crate::models::SymbolVersion;

fn data_len(version: &SymbolVersion, block: usize) -> usize {
    let base = version.data_codewords / version.blocks;
    let extra = version.data_codewords % version.blocks;
    base + usize::from(block < extra)
}

/// Split raw codewords into `(data ++ ecc)` blocks
pub fn deinterleave(version: &SymbolVersion, raw: &[u8]) -> Vec<Vec<u8>> {
    let n = version.blocks;
    let mut blocks: Vec<Vec<u8>> = (0..n)
        .map(|b| Vec::with_capacity(data_len(version, b) + version.ecc_per_block))
        .collect();

    let (data, ecc) = raw.split_at(version.data_codewords.min(raw.len()));
    for (i, &cw) in data.iter().enumerate() {
        blocks[i % n].push(cw);
    }
    for (k, &cw) in ecc.iter().take(version.ecc_codewords()).enumerate() {
        blocks[k % n].push(cw);
    }
    blocks
}

/// Correct every block and reassemble the data codewords in symbol order.
/// Returns the data and the number of repaired codewords.
pub fn correct(version: &SymbolVersion, raw: &[u8]) -> Result<(Vec<u8>, usize), DecodeError> {
    if raw.len() < version.total_codewords() {
        return Err(DecodeError::NotFound);
    }

    let decoder = ReedSolomonDecoder::new(version.ecc_per_block);
    let n = version.blocks;
    let mut data = vec![0u8; version.data_codewords];
    let mut corrected = 0;

    for (b, mut block) in deinterleave(version, raw).into_iter().enumerate() {
        corrected += decoder.decode(&mut block).map_err(|reason| {
            log::debug!("block {b}/{n}: {reason}");
            DecodeError::Checksum
        })?;
        let len = data_len(version, b);
        for (j, &cw) in block[..len].iter().enumerate() {
            data[j * n + b] = cw;
        }
    }

    Ok((data, corrected))
}

/// Append interleaved ECC codewords to `data` (which must fill the symbol)
pub fn interleave_with_ecc(version: &SymbolVersion, data: &[u8]) -> Vec<u8> {
    let n = version.blocks;
    let encoder = ReedSolomonEncoder::new(version.ecc_per_block);
    let mut out = data.to_vec();
    out.resize(version.total_codewords(), 0);

    for b in 0..n {
        let block_data: Vec<u8> = data.iter().skip(b).step_by(n).copied().collect();
        for (k, cw) in encoder.encode(&block_data).into_iter().enumerate() {
            out[version.data_codewords + k * n + b] = cw;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(rows: usize, cols: usize) -> &'static SymbolVersion {
        SymbolVersion::for_dimensions(rows, cols).unwrap()
    }

    #[test]
    fn test_uneven_blocks_in_largest_symbol() {
        let v = version(144, 144);
        let raw: Vec<u8> = (0..v.total_codewords()).map(|i| i as u8).collect();
        let blocks = deinterleave(v, &raw);
        assert_eq!(blocks.len(), 10);
        assert_eq!(blocks[0].len(), 156 + 62);
        assert_eq!(blocks[7].len(), 156 + 62);
        assert_eq!(blocks[8].len(), 155 + 62);
        assert_eq!(blocks[9].len(), 155 + 62);
    }

    #[test]
    fn test_interleaved_round_trip_with_damage() {
        let v = version(52, 52);
        let data: Vec<u8> = (0..v.data_codewords).map(|i| (i * 7 % 251) as u8).collect();
        let mut raw = interleave_with_ecc(v, &data);
        // Consecutive damage is spread across both blocks
        for cw in raw.iter_mut().skip(10).take(30) {
            *cw ^= 0x5A;
        }
        let (decoded, corrected) = correct(v, &raw).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(corrected, 30);
    }

    #[test]
    fn test_uncorrectable_block() {
        let v = version(10, 10);
        let mut raw = interleave_with_ecc(v, &[142, 164, 186]);
        for cw in raw.iter_mut().take(3) {
            *cw = !*cw;
        }
        assert!(matches!(correct(v, &raw), Err(DecodeError::Checksum)));
    }
}
