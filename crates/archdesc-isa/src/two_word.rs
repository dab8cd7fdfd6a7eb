//! Two word-sized values returned in registers.
//!
//! Entry trampolines hand back a resolved handle and the code address to jump
//! to without touching memory. On 32-bit targets both fit in one 64-bit scalar,
//! which the C ABI returns in a register pair. On 64-bit targets a two-field
//! `repr(C)` struct is decomposed into a register pair instead.
//!
//! Either way, a zero low word means failure and the high word must not be
//! read. Stub code only tests the low word.
//!
//! Handing object pointers through this type does not pin them: the caller
//! must keep the object from moving until the value is consumed.

use crate::fatal::fatal_report;

/// Shared contract of both backings.
pub trait TwoWord: Copy {
    /// A value whose low word is zero.
    fn failure() -> Self;
    /// Pack `lo` (must be nonzero) and `hi`.
    fn success(lo: usize, hi: usize) -> Self;
    fn lo(&self) -> usize;
    fn hi(&self) -> usize;

    fn is_failure(&self) -> bool {
        self.lo() == 0
    }

    /// Both words, or `None` on failure.
    fn into_pair(self) -> Option<(usize, usize)> {
        if self.is_failure() {
            None
        } else {
            Some((self.lo(), self.hi()))
        }
    }
}

/// Both words packed into one scalar: low 32 bits hold `lo`, high 32 bits
/// hold `hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PackedTwoWord(u64);

impl PackedTwoWord {
    /// The all-zero value.
    pub const fn failure() -> Self {
        Self(0)
    }

    pub const fn success(lo: u32, hi: u32) -> Self {
        debug_assert!(lo != 0, "a successful two-word value needs a nonzero low word");
        Self(((hi as u64) << 32) | lo as u64)
    }

    pub const fn lo(self) -> u32 {
        self.0 as u32
    }

    pub const fn hi(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub const fn is_failure(self) -> bool {
        self.lo() == 0
    }

    /// The raw scalar as the ABI sees it.
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

fn narrow(word: usize, which: &str) -> u32 {
    u32::try_from(word).unwrap_or_else(|_| {
        fatal_report(&format!("{which} word {word:#x} does not fit a packed two-word value"))
    })
}

impl TwoWord for PackedTwoWord {
    fn failure() -> Self {
        PackedTwoWord::failure()
    }

    fn success(lo: usize, hi: usize) -> Self {
        PackedTwoWord::success(narrow(lo, "low"), narrow(hi, "high"))
    }

    fn lo(&self) -> usize {
        PackedTwoWord::lo(*self) as usize
    }

    fn hi(&self) -> usize {
        PackedTwoWord::hi(*self) as usize
    }
}

/// Both words side by side.
///
/// The failure value zeroes `hi` too, but callers must not rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct PairedTwoWord {
    pub lo: usize,
    pub hi: usize,
}

impl PairedTwoWord {
    pub const fn failure() -> Self {
        Self { lo: 0, hi: 0 }
    }

    pub const fn success(lo: usize, hi: usize) -> Self {
        debug_assert!(lo != 0, "a successful two-word value needs a nonzero low word");
        Self { lo, hi }
    }

    pub const fn is_failure(self) -> bool {
        self.lo == 0
    }
}

impl TwoWord for PairedTwoWord {
    fn failure() -> Self {
        PairedTwoWord::failure()
    }

    fn success(lo: usize, hi: usize) -> Self {
        PairedTwoWord::success(lo, hi)
    }

    fn lo(&self) -> usize {
        self.lo
    }

    fn hi(&self) -> usize {
        self.hi
    }
}

/// The backing native to the compiled target.
#[cfg(target_pointer_width = "64")]
pub type TwoWordReturn = PairedTwoWord;
#[cfg(not(target_pointer_width = "64"))]
pub type TwoWordReturn = PackedTwoWord;

#[cfg(not(target_pointer_width = "64"))]
const _: () = assert!(std::mem::size_of::<usize>() == std::mem::size_of::<u32>());

/// Failure value for the compiled target.
pub fn two_word_failure() -> TwoWordReturn {
    <TwoWordReturn as TwoWord>::failure()
}

/// Success value for the compiled target, `lo` in the low word.
pub fn two_word_success(lo: usize, hi: usize) -> TwoWordReturn {
    <TwoWordReturn as TwoWord>::success(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layout() {
        let v = PackedTwoWord::success(5, 7);
        assert_eq!(v.lo(), 5);
        assert_eq!(v.hi(), 7);
        assert_eq!(v.to_bits(), (7u64 << 32) | 5);
        assert!(!v.is_failure());
        assert_eq!(std::mem::size_of::<PackedTwoWord>(), 8);
    }

    #[test]
    fn packed_failure_is_zero() {
        let v = PackedTwoWord::failure();
        assert_eq!(v.to_bits(), 0);
        assert!(v.is_failure());
        // Only the low half decides.
        assert!(PackedTwoWord::from_bits(0xdead_beef_0000_0000).is_failure());
    }

    #[test]
    fn paired_layout() {
        let v = PairedTwoWord::success(5, 7);
        assert_eq!((v.lo, v.hi), (5, 7));
        assert!(!v.is_failure());
        assert_eq!(
            std::mem::size_of::<PairedTwoWord>(),
            2 * std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn paired_failure() {
        let v = PairedTwoWord::failure();
        assert_eq!(v.lo, 0);
        assert!(v.is_failure());
        assert!(PairedTwoWord { lo: 0, hi: 99 }.is_failure());
    }

    fn contract<T: TwoWord>() {
        let ok = T::success(5, 7);
        assert_eq!(ok.into_pair(), Some((5, 7)));
        assert_ne!(ok.lo(), 0);
        let failed = T::failure();
        assert_eq!(failed.lo(), 0);
        assert_eq!(failed.into_pair(), None);
    }

    #[test]
    fn both_backings_share_contract() {
        contract::<PackedTwoWord>();
        contract::<PairedTwoWord>();
    }

    #[test]
    fn native_backing() {
        let ok = two_word_success(0x1000, 0x2000);
        assert_eq!(ok.into_pair(), Some((0x1000, 0x2000)));
        assert!(two_word_failure().is_failure());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    #[should_panic(expected = "does not fit a packed two-word value")]
    fn packed_rejects_wide_words() {
        <PackedTwoWord as TwoWord>::success(1, usize::MAX);
    }
}
