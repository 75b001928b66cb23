//! Flag-exact arithmetic and shift helpers shared by the executor.
//!
//! The NES variant of the 6502 has no BCD unit, so every operation here is
//! binary regardless of the decimal flag.

use crate::cpu::status::Status;

/// Binary add with carry-in. Overflow is set when both inputs share a sign
/// that the result does not.
pub(crate) fn adc(p: &mut Status, a: u8, m: u8) -> u8 {
    let sum = a as u16 + m as u16 + p.carry() as u16;
    let result = sum as u8;
    p.set(Status::CARRY, sum > 0xFF);
    p.set(Status::OVERFLOW, !(a ^ m) & (a ^ result) & 0x80 != 0);
    p.set_zn(result);
    result
}

/// Subtract with borrow: `a - m - !C`, which is `adc` of the complement.
pub(crate) fn sbc(p: &mut Status, a: u8, m: u8) -> u8 {
    adc(p, a, !m)
}

/// CMP/CPX/CPY. Carry means "no borrow".
pub(crate) fn compare(p: &mut Status, reg: u8, m: u8) {
    p.set(Status::CARRY, reg >= m);
    p.set_zn(reg.wrapping_sub(m));
}

pub(crate) fn bit(p: &mut Status, a: u8, m: u8) {
    p.set(Status::ZERO, a & m == 0);
    p.set(Status::OVERFLOW, m & 0x40 != 0);
    p.set(Status::NEGATIVE, m & 0x80 != 0);
}

pub(crate) fn asl(p: &mut Status, v: u8) -> u8 {
    p.set(Status::CARRY, v & 0x80 != 0);
    let r = v << 1;
    p.set_zn(r);
    r
}

pub(crate) fn lsr(p: &mut Status, v: u8) -> u8 {
    p.set(Status::CARRY, v & 0x01 != 0);
    let r = v >> 1;
    p.set_zn(r);
    r
}

pub(crate) fn rol(p: &mut Status, v: u8) -> u8 {
    let r = (v << 1) | p.carry();
    p.set(Status::CARRY, v & 0x80 != 0);
    p.set_zn(r);
    r
}

pub(crate) fn ror(p: &mut Status, v: u8) -> u8 {
    let r = (v >> 1) | (p.carry() << 7);
    p.set(Status::CARRY, v & 0x01 != 0);
    p.set_zn(r);
    r
}

/// ARR: AND then rotate right, with C and V taken from bits 6 and 5 of the
/// rotated value.
pub(crate) fn arr(p: &mut Status, a: u8, imm: u8) -> u8 {
    let r = ((a & imm) >> 1) | (p.carry() << 7);
    p.set_zn(r);
    p.set(Status::CARRY, r & 0x40 != 0);
    p.set(Status::OVERFLOW, ((r >> 6) ^ (r >> 5)) & 0x01 != 0);
    r
}

/// SBX: `X = (A & X) - imm` without borrow-in; carry as in CMP.
pub(crate) fn sbx(p: &mut Status, a: u8, x: u8, imm: u8) -> u8 {
    let t = a & x;
    compare(p, t, imm);
    t.wrapping_sub(imm)
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::tests::TEST_COUNT;

    fn with_carry(carry: bool) -> Status {
        let mut p = Status::empty();
        p.set(Status::CARRY, carry);
        p
    }

    #[test]
    fn adc_signed_overflow() {
        let mut p = with_carry(false);
        let r = adc(&mut p, 0x50, 0x50);
        assert_eq!(r, 0xA0);
        assert!(p.contains(Status::OVERFLOW | Status::NEGATIVE));
        assert!(!p.intersects(Status::CARRY | Status::ZERO));
    }

    #[test]
    fn adc_matches_wide_arithmetic() {
        let mut rng = rand::rng();
        for _ in 0..TEST_COUNT {
            let a: u8 = rng.random();
            let m: u8 = rng.random();
            let c: bool = rng.random();
            let mut p = with_carry(c);
            let r = adc(&mut p, a, m);

            let unsigned = a as u16 + m as u16 + c as u16;
            let signed = a as i8 as i16 + m as i8 as i16 + c as i16;
            assert_eq!(r, unsigned as u8);
            assert_eq!(p.contains(Status::CARRY), unsigned > 0xFF);
            assert_eq!(
                p.contains(Status::OVERFLOW),
                !(-128..=127).contains(&signed)
            );
            assert_eq!(p.contains(Status::ZERO), r == 0);
        }
    }

    #[test]
    fn sbc_matches_wide_arithmetic() {
        let mut rng = rand::rng();
        for _ in 0..TEST_COUNT {
            let a: u8 = rng.random();
            let m: u8 = rng.random();
            let c: bool = rng.random();
            let mut p = with_carry(c);
            let r = sbc(&mut p, a, m);

            let borrow = (!c) as i16;
            let unsigned = a as i16 - m as i16 - borrow;
            let signed = a as i8 as i16 - m as i8 as i16 - borrow;
            assert_eq!(r, unsigned as u8);
            assert_eq!(p.contains(Status::CARRY), unsigned >= 0);
            assert_eq!(
                p.contains(Status::OVERFLOW),
                !(-128..=127).contains(&signed)
            );
        }
    }

    #[test]
    fn compare_sets_carry_when_not_less() {
        let mut p = Status::empty();
        compare(&mut p, 0x40, 0x40);
        assert!(p.contains(Status::CARRY | Status::ZERO));
        compare(&mut p, 0x3F, 0x40);
        assert!(!p.contains(Status::CARRY));
        assert!(p.contains(Status::NEGATIVE));
    }

    #[test]
    fn rotates_thread_the_carry() {
        let mut p = with_carry(true);
        assert_eq!(rol(&mut p, 0x80), 0x01);
        assert!(p.contains(Status::CARRY));
        assert_eq!(ror(&mut p, 0x00), 0x80);
        assert!(!p.contains(Status::CARRY));
        assert!(p.contains(Status::NEGATIVE));
    }

    #[test]
    fn arr_takes_flags_from_bits_six_and_five() {
        let mut p = with_carry(true);
        // (0xFF & 0xC0) >> 1 | 0x80 = 0xE0: bit 6 set, bit 5 set.
        assert_eq!(arr(&mut p, 0xFF, 0xC0), 0xE0);
        assert!(p.contains(Status::CARRY));
        assert!(!p.contains(Status::OVERFLOW));

        let mut p = with_carry(false);
        // 0x40 >> 1 = 0x20: bit 6 clear, bit 5 set.
        assert_eq!(arr(&mut p, 0x40, 0xFF), 0x20);
        assert!(!p.contains(Status::CARRY));
        assert!(p.contains(Status::OVERFLOW));
    }

    #[test]
    fn sbx_ignores_incoming_carry() {
        let mut p = with_carry(false);
        assert_eq!(sbx(&mut p, 0xF0, 0x3C, 0x10), 0x20);
        assert!(p.contains(Status::CARRY));
        assert_eq!(sbx(&mut p, 0x01, 0x01, 0x02), 0xFF);
        assert!(!p.contains(Status::CARRY));
    }
}
