//! Reed-Solomon error correction for Data Matrix ECC 200.
//! Codewords live in GF(256) with primitive polynomial x^8 + x^5 + x^3 + x^2 + 1
//! (0x12D); the generator polynomial has roots alpha^1 ..= alpha^n.

/// GF(256) arithmetic through log/exp tables
pub struct Gf256;

const PRIMITIVE: u16 = 0x12D;

const fn build_tables() -> ([u8; 512], [u8; 256]) {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    // Doubled so products of two logs index without a modulo
    while i < 512 {
        exp[i] = exp[i - 255];
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 512], [u8; 256]) = build_tables();
static EXP_TABLE: [u8; 512] = TABLES.0;
static LOG_TABLE: [u8; 256] = TABLES.1;

impl Gf256 {
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize]
    }

    /// `None` when dividing by zero
    pub fn div(a: u8, b: u8) -> Option<u8> {
        if b == 0 {
            return None;
        }
        if a == 0 {
            return Some(0);
        }
        let diff = LOG_TABLE[a as usize] as usize + 255 - LOG_TABLE[b as usize] as usize;
        Some(EXP_TABLE[diff])
    }

    /// alpha^n
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    /// alpha^-n
    pub fn exp_neg(n: usize) -> u8 {
        EXP_TABLE[(255 - n % 255) % 255]
    }

    /// Evaluate a polynomial with ascending coefficients at `x`
    fn eval_ascending(poly: &[u8], x: u8) -> u8 {
        poly.iter()
            .rev()
            .fold(0u8, |acc, &coef| Gf256::mul(acc, x) ^ coef)
    }
}

/// Corrects one interleaved block in place.
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `received` (data followed by ECC, highest-degree coefficient
    /// first). Returns the number of codewords that were repaired.
    pub fn decode(&self, received: &mut [u8]) -> Result<usize, &'static str> {
        if received.len() > 255 || received.len() <= self.num_ecc_codewords {
            return Err("Block length out of range");
        }

        let syndrome = self.calculate_syndrome(received);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        let sigma = Self::find_error_locator(&syndrome)?;
        let error_count = sigma.len() - 1;
        if error_count * 2 > self.num_ecc_codewords {
            return Err("Too many errors");
        }

        let positions = Self::find_error_positions(&sigma, received.len())?;
        let values = Self::find_error_values(&sigma, &syndrome, &positions, received.len())?;

        for (&pos, &value) in positions.iter().zip(&values) {
            received[pos] ^= value;
        }

        if self.calculate_syndrome(received).iter().any(|&s| s != 0) {
            return Err("Uncorrectable error");
        }

        Ok(positions.len())
    }

    /// S_i = r(alpha^(i+1)) via Horner's rule
    fn calculate_syndrome(&self, received: &[u8]) -> Vec<u8> {
        (0..self.num_ecc_codewords)
            .map(|i| {
                let x = Gf256::exp(i + 1);
                received
                    .iter()
                    .fold(0u8, |acc, &coef| Gf256::mul(acc, x) ^ coef)
            })
            .collect()
    }

    /// Berlekamp-Massey; returns the locator with ascending coefficients,
    /// trailing zeros trimmed.
    fn find_error_locator(syndrome: &[u8]) -> Result<Vec<u8>, &'static str> {
        let mut sigma = vec![1u8];
        let mut prev = vec![1u8];
        let mut prev_delta = 1u8;
        let mut l = 0usize;
        let mut m = 1usize;

        for n in 0..syndrome.len() {
            let mut delta = syndrome[n];
            for i in 1..=l.min(sigma.len() - 1) {
                delta ^= Gf256::mul(sigma[i], syndrome[n - i]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let coef = Gf256::div(delta, prev_delta).ok_or("Degenerate locator")?;
            let snapshot = sigma.clone();
            if sigma.len() < prev.len() + m {
                sigma.resize(prev.len() + m, 0);
            }
            for (j, &b) in prev.iter().enumerate() {
                sigma[j + m] ^= Gf256::mul(coef, b);
            }

            if 2 * l <= n {
                l = n + 1 - l;
                prev = snapshot;
                prev_delta = delta;
                m = 1;
            } else {
                m += 1;
            }
        }

        while sigma.len() > 1 && sigma.last() == Some(&0) {
            sigma.pop();
        }
        if sigma.len() - 1 != l {
            return Err("Locator degree mismatch");
        }
        Ok(sigma)
    }

    /// Chien search. An error at index `pos` has locator X = alpha^(n-1-pos)
    /// and is a root of sigma at X^-1.
    fn find_error_positions(sigma: &[u8], n: usize) -> Result<Vec<usize>, &'static str> {
        let positions: Vec<usize> = (0..n)
            .filter(|&pos| Gf256::eval_ascending(sigma, Gf256::exp_neg(n - 1 - pos)) == 0)
            .collect();

        if positions.len() != sigma.len() - 1 {
            return Err("Wrong number of error positions found");
        }
        Ok(positions)
    }

    /// Forney with first consecutive root alpha^1: e = omega(X^-1) / sigma'(X^-1)
    fn find_error_values(
        sigma: &[u8],
        syndrome: &[u8],
        positions: &[usize],
        n: usize,
    ) -> Result<Vec<u8>, &'static str> {
        // omega = S(x) * sigma(x) mod x^(2t)
        let mut omega = vec![0u8; syndrome.len()];
        for (i, slot) in omega.iter_mut().enumerate() {
            for (j, &s) in sigma.iter().enumerate().take(i + 1) {
                *slot ^= Gf256::mul(s, syndrome[i - j]);
            }
        }

        // Formal derivative: odd-degree terms shifted down
        let sigma_prime: Vec<u8> = sigma
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
            .collect();

        positions
            .iter()
            .map(|&pos| {
                let x_inv = Gf256::exp_neg(n - 1 - pos);
                let numerator = Gf256::eval_ascending(&omega, x_inv);
                let denominator = Gf256::eval_ascending(&sigma_prime, x_inv);
                Gf256::div(numerator, denominator).ok_or("Sigma derivative is zero")
            })
            .collect()
    }
}

/// Computes ECC codewords for one block.
pub struct ReedSolomonEncoder {
    /// Generator with descending coefficients, leading 1 omitted
    generator: Vec<u8>,
}

impl ReedSolomonEncoder {
    pub fn new(num_ecc_codewords: usize) -> Self {
        // Ascending coefficients of prod (x + alpha^i), i = 1..=n
        let mut poly = vec![1u8];
        for i in 1..=num_ecc_codewords {
            let root = Gf256::exp(i);
            let mut next = vec![0u8; poly.len() + 1];
            for (j, &c) in poly.iter().enumerate() {
                next[j] ^= Gf256::mul(c, root);
                next[j + 1] ^= c;
            }
            poly = next;
        }
        poly.pop();
        poly.reverse();
        Self { generator: poly }
    }

    /// Remainder of data(x) * x^n divided by the generator
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let n = self.generator.len();
        let mut remainder = vec![0u8; n];
        for &d in data {
            let factor = d ^ remainder[0];
            remainder.rotate_left(1);
            if let Some(last) = remainder.last_mut() {
                *last = 0;
            }
            for (r, &g) in remainder.iter_mut().zip(&self.generator) {
                *r ^= Gf256::mul(g, factor);
            }
        }
        remainder
    }
}
