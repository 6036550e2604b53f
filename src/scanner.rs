#![allow(unsafe_code)]

//! Batched byte-level scanning primitives.
//!
//! Every operation has a scalar implementation that is always compiled, and
//! a 32-byte-chunk AVX2 implementation used when the crate is built with the
//! `avx2` target feature. Both paths must agree on every input; the test
//! module property-checks the equivalence.

#[cfg(test)]
#[path = "./scanner_tests.rs"]
mod tests;

/// Advances past spaces, tabs, carriage returns, and line feeds.
///
/// Returns the offset of the first byte outside the set, or `bytes.len()`.
#[inline]
pub(crate) fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    return avx2::skip_whitespace(bytes, from);
    #[cfg(not(all(target_arch = "x86_64", target_feature = "avx2")))]
    skip_whitespace_scalar(bytes, from)
}

/// Advances past spaces, tabs, and carriage returns, stopping at line feeds.
#[inline]
pub(crate) fn skip_whitespace_no_newline(bytes: &[u8], from: usize) -> usize {
    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    return avx2::skip_whitespace_no_newline(bytes, from);
    #[cfg(not(all(target_arch = "x86_64", target_feature = "avx2")))]
    skip_whitespace_no_newline_scalar(bytes, from)
}

/// Returns the offset of the first occurrence of `a`, or `bytes.len()`.
#[inline]
pub(crate) fn find_byte(bytes: &[u8], from: usize, a: u8) -> usize {
    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    return avx2::find_byte(bytes, from, a);
    #[cfg(not(all(target_arch = "x86_64", target_feature = "avx2")))]
    find_byte_scalar(bytes, from, a)
}

/// Returns the offset of the first byte equal to `a` or `b`, or `bytes.len()`.
#[inline]
pub(crate) fn find_byte2(bytes: &[u8], from: usize, a: u8, b: u8) -> usize {
    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    return avx2::find_byte2(bytes, from, a, b);
    #[cfg(not(all(target_arch = "x86_64", target_feature = "avx2")))]
    find_byte2_scalar(bytes, from, a, b)
}

/// Returns the offset of the first byte equal to `a`, `b`, or `c`, or
/// `bytes.len()`.
#[inline]
pub(crate) fn find_byte3(bytes: &[u8], from: usize, a: u8, b: u8, c: u8) -> usize {
    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    return avx2::find_byte3(bytes, from, a, b, c);
    #[cfg(not(all(target_arch = "x86_64", target_feature = "avx2")))]
    find_byte3_scalar(bytes, from, a, b, c)
}

pub(crate) fn skip_whitespace_scalar(bytes: &[u8], mut i: usize) -> usize {
    while let Some(&b) = bytes.get(i) {
        if b != b' ' && b != b'\t' && b != b'\r' && b != b'\n' {
            break;
        }
        i += 1;
    }
    i
}

pub(crate) fn skip_whitespace_no_newline_scalar(bytes: &[u8], mut i: usize) -> usize {
    while let Some(&b) = bytes.get(i) {
        if b != b' ' && b != b'\t' && b != b'\r' {
            break;
        }
        i += 1;
    }
    i
}

pub(crate) fn find_byte_scalar(bytes: &[u8], mut i: usize, a: u8) -> usize {
    while let Some(&b) = bytes.get(i) {
        if b == a {
            break;
        }
        i += 1;
    }
    i
}

pub(crate) fn find_byte2_scalar(bytes: &[u8], mut i: usize, a: u8, b: u8) -> usize {
    while let Some(&x) = bytes.get(i) {
        if x == a || x == b {
            break;
        }
        i += 1;
    }
    i
}

pub(crate) fn find_byte3_scalar(bytes: &[u8], mut i: usize, a: u8, b: u8, c: u8) -> usize {
    while let Some(&x) = bytes.get(i) {
        if x == a || x == b || x == c {
            break;
        }
        i += 1;
    }
    i
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
mod avx2 {
    use std::arch::x86_64::{
        __m256i, _mm256_cmpeq_epi8, _mm256_loadu_si256, _mm256_movemask_epi8, _mm256_or_si256,
        _mm256_set1_epi8,
    };

    const LANES: usize = 32;

    /// Loads 32 bytes starting at `i` and returns the per-lane equality mask
    /// against each of the splatted needles, OR-combined.
    ///
    /// SAFETY: the caller must guarantee `i + 32 <= bytes.len()`.
    #[inline]
    unsafe fn eq_mask(bytes: &[u8], i: usize, needles: &[u8]) -> u32 {
        unsafe {
            let chunk = _mm256_loadu_si256(bytes.as_ptr().add(i).cast::<__m256i>());
            let mut acc = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(needles[0] as i8));
            for &n in &needles[1..] {
                acc = _mm256_or_si256(acc, _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(n as i8)));
            }
            _mm256_movemask_epi8(acc) as u32
        }
    }

    /// Skip every byte in `set`; the first lane outside the set stops the scan.
    #[inline]
    fn skip_set(bytes: &[u8], mut i: usize, set: &[u8]) -> usize {
        while i + LANES <= bytes.len() {
            // SAFETY: the loop condition guarantees a full 32-byte window.
            let mask = unsafe { eq_mask(bytes, i, set) };
            if mask != u32::MAX {
                return i + (!mask).trailing_zeros() as usize;
            }
            i += LANES;
        }
        i
    }

    /// Stop at the first byte in `set`.
    #[inline]
    fn find_set(bytes: &[u8], mut i: usize, set: &[u8]) -> usize {
        while i + LANES <= bytes.len() {
            // SAFETY: the loop condition guarantees a full 32-byte window.
            let mask = unsafe { eq_mask(bytes, i, set) };
            if mask != 0 {
                return i + mask.trailing_zeros() as usize;
            }
            i += LANES;
        }
        i
    }

    pub(super) fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
        let i = skip_set(bytes, from, &[b' ', b'\t', b'\r', b'\n']);
        super::skip_whitespace_scalar(bytes, i)
    }

    pub(super) fn skip_whitespace_no_newline(bytes: &[u8], from: usize) -> usize {
        let i = skip_set(bytes, from, &[b' ', b'\t', b'\r']);
        super::skip_whitespace_no_newline_scalar(bytes, i)
    }

    pub(super) fn find_byte(bytes: &[u8], from: usize, a: u8) -> usize {
        let i = find_set(bytes, from, &[a]);
        super::find_byte_scalar(bytes, i, a)
    }

    pub(super) fn find_byte2(bytes: &[u8], from: usize, a: u8, b: u8) -> usize {
        let i = find_set(bytes, from, &[a, b]);
        super::find_byte2_scalar(bytes, i, a, b)
    }

    pub(super) fn find_byte3(bytes: &[u8], from: usize, a: u8, b: u8, c: u8) -> usize {
        let i = find_set(bytes, from, &[a, b, c]);
        super::find_byte3_scalar(bytes, i, a, b, c)
    }
}
