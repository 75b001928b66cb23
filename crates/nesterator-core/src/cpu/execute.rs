use crate::bus::Bus;
use crate::cpu::{
    Cpu,
    addressing::{Access, Addressing, Operand},
    alu,
    instruction::Instruction,
    mnemonic::Mnemonic as M,
    status::Status,
};
use crate::memory::cpu as cpu_mem;

impl Cpu {
    /// Executes a decoded instruction whose opcode byte was already fetched.
    pub(crate) fn execute(&mut self, bus: &mut impl Bus, instr: Instruction) {
        match instr.mnemonic {
            M::BRK => self.brk(bus),
            M::JSR => self.jsr(bus),
            M::RTS => self.rts(bus),
            M::RTI => self.rti(bus),
            M::PHA => {
                bus.read(self.pc);
                self.push(bus, self.a);
            }
            M::PHP => {
                bus.read(self.pc);
                self.push(bus, self.p.to_stack(true));
            }
            M::PLA => {
                self.pull_prologue(bus);
                self.a = self.pop(bus);
                self.p.set_zn(self.a);
            }
            M::PLP => {
                self.pull_prologue(bus);
                let value = self.pop(bus);
                self.p = Status::from_stack(value);
            }
            M::JMP => {
                if let Operand::Address(target) = self.resolve(bus, instr.addressing, Access::Read)
                {
                    self.pc = target;
                }
            }
            M::BCC => self.branch(bus, !self.p.contains(Status::CARRY)),
            M::BCS => self.branch(bus, self.p.contains(Status::CARRY)),
            M::BNE => self.branch(bus, !self.p.contains(Status::ZERO)),
            M::BEQ => self.branch(bus, self.p.contains(Status::ZERO)),
            M::BPL => self.branch(bus, !self.p.contains(Status::NEGATIVE)),
            M::BMI => self.branch(bus, self.p.contains(Status::NEGATIVE)),
            M::BVC => self.branch(bus, !self.p.contains(Status::OVERFLOW)),
            M::BVS => self.branch(bus, self.p.contains(Status::OVERFLOW)),
            mnemonic => {
                let access = mnemonic.access();
                let operand = self.resolve(bus, instr.addressing, access);
                match access {
                    Access::Read => self.read_op(bus, mnemonic, operand),
                    Access::Write => self.write_op(bus, mnemonic, instr.addressing, operand),
                    Access::ReadModifyWrite => self.rmw_op(bus, mnemonic, operand),
                }
            }
        }
    }

    /// Operand value for read-class instructions.
    fn load(bus: &mut impl Bus, operand: Operand) -> u8 {
        match operand {
            Operand::Value(value) => value,
            Operand::Address(addr) => bus.read(addr),
            Operand::Implied | Operand::Accumulator => 0,
        }
    }

    fn read_op(&mut self, bus: &mut impl Bus, mnemonic: M, operand: Operand) {
        match mnemonic {
            M::LDA => {
                self.a = Self::load(bus, operand);
                self.p.set_zn(self.a);
            }
            M::LDX => {
                self.x = Self::load(bus, operand);
                self.p.set_zn(self.x);
            }
            M::LDY => {
                self.y = Self::load(bus, operand);
                self.p.set_zn(self.y);
            }
            M::LAX => {
                let value = Self::load(bus, operand);
                self.a = value;
                self.x = value;
                self.p.set_zn(value);
            }
            M::LAS => {
                let value = Self::load(bus, operand) & self.s;
                self.a = value;
                self.x = value;
                self.s = value;
                self.p.set_zn(value);
            }
            M::AND => {
                self.a &= Self::load(bus, operand);
                self.p.set_zn(self.a);
            }
            M::ORA => {
                self.a |= Self::load(bus, operand);
                self.p.set_zn(self.a);
            }
            M::EOR => {
                self.a ^= Self::load(bus, operand);
                self.p.set_zn(self.a);
            }
            M::BIT => {
                let value = Self::load(bus, operand);
                alu::bit(&mut self.p, self.a, value);
            }
            M::ADC => {
                let value = Self::load(bus, operand);
                self.a = alu::adc(&mut self.p, self.a, value);
            }
            M::SBC => {
                let value = Self::load(bus, operand);
                self.a = alu::sbc(&mut self.p, self.a, value);
            }
            M::CMP => {
                let value = Self::load(bus, operand);
                alu::compare(&mut self.p, self.a, value);
            }
            M::CPX => {
                let value = Self::load(bus, operand);
                alu::compare(&mut self.p, self.x, value);
            }
            M::CPY => {
                let value = Self::load(bus, operand);
                alu::compare(&mut self.p, self.y, value);
            }
            M::ANC => {
                self.a &= Self::load(bus, operand);
                self.p.set_zn(self.a);
                self.p.set(Status::CARRY, self.p.contains(Status::NEGATIVE));
            }
            M::ALR => {
                let value = Self::load(bus, operand);
                self.a = alu::lsr(&mut self.p, self.a & value);
            }
            M::ARR => {
                let value = Self::load(bus, operand);
                self.a = alu::arr(&mut self.p, self.a, value);
            }
            M::SBX => {
                let value = Self::load(bus, operand);
                self.x = alu::sbx(&mut self.p, self.a, self.x, value);
            }
            M::XAA => {
                let value = Self::load(bus, operand);
                self.a = (self.a | 0xEE) & self.x & value;
                self.p.set_zn(self.a);
            }
            M::NOP | M::JAM => {
                if let Operand::Address(addr) = operand {
                    bus.read(addr);
                }
            }
            M::TAX => {
                self.x = self.a;
                self.p.set_zn(self.x);
            }
            M::TAY => {
                self.y = self.a;
                self.p.set_zn(self.y);
            }
            M::TSX => {
                self.x = self.s;
                self.p.set_zn(self.x);
            }
            M::TXA => {
                self.a = self.x;
                self.p.set_zn(self.a);
            }
            M::TXS => self.s = self.x,
            M::TYA => {
                self.a = self.y;
                self.p.set_zn(self.a);
            }
            M::INX => {
                self.x = self.x.wrapping_add(1);
                self.p.set_zn(self.x);
            }
            M::INY => {
                self.y = self.y.wrapping_add(1);
                self.p.set_zn(self.y);
            }
            M::DEX => {
                self.x = self.x.wrapping_sub(1);
                self.p.set_zn(self.x);
            }
            M::DEY => {
                self.y = self.y.wrapping_sub(1);
                self.p.set_zn(self.y);
            }
            M::CLC => self.p.remove(Status::CARRY),
            M::SEC => self.p.insert(Status::CARRY),
            M::CLD => self.p.remove(Status::DECIMAL),
            M::SED => self.p.insert(Status::DECIMAL),
            M::CLI => self.p.remove(Status::INTERRUPT),
            M::SEI => self.p.insert(Status::INTERRUPT),
            M::CLV => self.p.remove(Status::OVERFLOW),
            other => unreachable!("{other} is not a read instruction"),
        }
    }

    fn write_op(&mut self, bus: &mut impl Bus, mnemonic: M, mode: Addressing, operand: Operand) {
        let Operand::Address(addr) = operand else {
            unreachable!("{mnemonic} without an effective address");
        };
        match mnemonic {
            M::STA => bus.write(addr, self.a),
            M::STX => bus.write(addr, self.x),
            M::STY => bus.write(addr, self.y),
            M::SAX => bus.write(addr, self.a & self.x),
            M::SHA => self.unstable_store(bus, addr, self.index_for(mode), self.a & self.x),
            M::SHX => self.unstable_store(bus, addr, self.y, self.x),
            M::SHY => self.unstable_store(bus, addr, self.x, self.y),
            M::SHS => {
                self.s = self.a & self.x;
                self.unstable_store(bus, addr, self.y, self.s);
            }
            other => unreachable!("{other} is not a write instruction"),
        }
    }

    fn rmw_op(&mut self, bus: &mut impl Bus, mnemonic: M, operand: Operand) {
        match operand {
            Operand::Accumulator => self.a = self.modify(mnemonic, self.a),
            Operand::Address(addr) => {
                let old = bus.read(addr);
                // The old value goes back out while the ALU works.
                bus.write(addr, old);
                let new = self.modify(mnemonic, old);
                bus.write(addr, new);
            }
            Operand::Implied | Operand::Value(_) => {
                unreachable!("{mnemonic} without a modifiable operand")
            }
        }
    }

    /// Computes the value written back by a read-modify-write instruction,
    /// applying any accumulator side effect of the combined opcodes.
    fn modify(&mut self, mnemonic: M, value: u8) -> u8 {
        match mnemonic {
            M::ASL => alu::asl(&mut self.p, value),
            M::LSR => alu::lsr(&mut self.p, value),
            M::ROL => alu::rol(&mut self.p, value),
            M::ROR => alu::ror(&mut self.p, value),
            M::INC => {
                let r = value.wrapping_add(1);
                self.p.set_zn(r);
                r
            }
            M::DEC => {
                let r = value.wrapping_sub(1);
                self.p.set_zn(r);
                r
            }
            M::SLO => {
                let r = alu::asl(&mut self.p, value);
                self.a |= r;
                self.p.set_zn(self.a);
                r
            }
            M::RLA => {
                let r = alu::rol(&mut self.p, value);
                self.a &= r;
                self.p.set_zn(self.a);
                r
            }
            M::SRE => {
                let r = alu::lsr(&mut self.p, value);
                self.a ^= r;
                self.p.set_zn(self.a);
                r
            }
            M::RRA => {
                let r = alu::ror(&mut self.p, value);
                self.a = alu::adc(&mut self.p, self.a, r);
                r
            }
            M::DCP => {
                let r = value.wrapping_sub(1);
                alu::compare(&mut self.p, self.a, r);
                r
            }
            M::ISC => {
                let r = value.wrapping_add(1);
                self.a = alu::sbc(&mut self.p, self.a, r);
                r
            }
            other => unreachable!("{other} is not a read-modify-write instruction"),
        }
    }

    fn index_for(&self, mode: Addressing) -> u8 {
        match mode {
            Addressing::AbsoluteX | Addressing::ZeroPageX => self.x,
            _ => self.y,
        }
    }

    /// SHA/SHX/SHY/SHS store `value & (H + 1)`, where H is the high byte of
    /// the unindexed base. On a page cross the stored byte also replaces the
    /// high byte of the target address.
    fn unstable_store(&mut self, bus: &mut impl Bus, addr: u16, index: u8, value: u8) {
        let base = addr.wrapping_sub(index as u16);
        let high = ((base >> 8) as u8).wrapping_add(1);
        let result = value & high;
        let target = if (base ^ addr) & 0xFF00 != 0 {
            ((result as u16) << 8) | (addr & 0x00FF)
        } else {
            addr
        };
        bus.write(target, result);
    }

    fn branch(&mut self, bus: &mut impl Bus, taken: bool) {
        let offset = self.fetch(bus) as i8;
        if !taken {
            return;
        }
        bus.read(self.pc);
        let target = self.pc.wrapping_add_signed(offset as i16);
        if (target ^ self.pc) & 0xFF00 != 0 {
            bus.read((self.pc & 0xFF00) | (target & 0x00FF));
        }
        self.pc = target;
    }

    fn brk(&mut self, bus: &mut impl Bus) {
        // Padding byte: read and skipped, never part of the operand.
        bus.read(self.pc);
        self.incr_pc();
        self.push_word(bus, self.pc);
        self.push(bus, self.p.to_stack(true));
        self.p.insert(Status::INTERRUPT);
        self.pc = self.read_vector(bus, cpu_mem::IRQ_VECTOR_LO);
    }

    fn jsr(&mut self, bus: &mut impl Bus) {
        let lo = self.fetch(bus);
        bus.read(self.stack_addr());
        self.push_word(bus, self.pc);
        let hi = self.fetch(bus);
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    fn rts(&mut self, bus: &mut impl Bus) {
        self.pull_prologue(bus);
        let lo = self.pop(bus);
        let hi = self.pop(bus);
        self.pc = u16::from_le_bytes([lo, hi]);
        bus.read(self.pc);
        self.incr_pc();
    }

    fn rti(&mut self, bus: &mut impl Bus) {
        self.pull_prologue(bus);
        let value = self.pop(bus);
        self.p = Status::from_stack(value);
        let lo = self.pop(bus);
        let hi = self.pop(bus);
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    /// Dummy read of the next opcode, then of the current stack slot, before
    /// the first pull.
    fn pull_prologue(&mut self, bus: &mut impl Bus) {
        bus.read(self.pc);
        bus.read(self.stack_addr());
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::mock::{Access, MockBus};
    use crate::config::ResetKind;
    use crate::cpu::{Cpu, status::Status};

    const ORIGIN: u16 = 0x0600;

    fn boot(program: &[u8]) -> (Cpu, MockBus) {
        let mut bus = MockBus::with_program(ORIGIN, program);
        let mut cpu = Cpu::new();
        cpu.reset(ResetKind::PowerOn, &mut bus);
        (cpu, bus)
    }

    fn run(program: &[u8], steps: usize) -> (Cpu, MockBus, Vec<u8>) {
        let (mut cpu, mut bus) = boot(program);
        let cycles = (0..steps).map(|_| cpu.step(&mut bus)).collect();
        (cpu, bus, cycles)
    }

    #[test]
    fn reset_vector_fetch_is_untimed() {
        let (cpu, bus) = boot(&[0xEA]);
        assert_eq!(cpu.pc, ORIGIN);
        assert_eq!(bus.cycles, 0);
        assert_eq!(cpu.snapshot().p, 0x24);
        assert_eq!(cpu.snapshot().s, 0xFD);
    }

    #[test]
    fn soft_reset_keeps_registers_and_drops_the_stack() {
        let (mut cpu, mut bus, _) = run(&[0xA9, 0x42, 0x58], 2);
        cpu.reset(ResetKind::Soft, &mut bus);
        assert_eq!(cpu.a, 0x42);
        assert_eq!(cpu.s, 0xFA);
        assert!(cpu.p.contains(Status::INTERRUPT));
        assert_eq!(cpu.pc, ORIGIN);
    }

    #[test]
    fn adc_overflow_example() {
        // CLC; LDA #$50; ADC #$50
        let (cpu, _, cycles) = run(&[0x18, 0xA9, 0x50, 0x69, 0x50], 3);
        assert_eq!(cycles, vec![2, 2, 2]);
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.p.contains(Status::OVERFLOW | Status::NEGATIVE));
        assert!(!cpu.p.intersects(Status::CARRY | Status::ZERO));
    }

    #[test]
    fn branch_costs_depend_on_outcome_and_page() {
        // LDA #$01 clears Z. BEQ not taken, BNE taken within the page.
        let (_, _, cycles) = run(&[0xA9, 0x01, 0xF0, 0x10, 0xD0, 0x00], 3);
        assert_eq!(cycles, vec![2, 2, 3]);

        // Taken BNE at $06FD lands across the page boundary.
        let mut program = vec![0xEA; 0xFD];
        program.extend_from_slice(&[0xD0, 0x10]);
        let (mut cpu, mut bus) = boot(&program);
        cpu.pc = 0x06FD;
        cpu.p.remove(Status::ZERO);
        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.pc, 0x070F);
    }

    #[test]
    fn indexed_reads_pay_only_on_page_cross() {
        // LDX #$01; LDA $06F0,X; LDX #$20; LDA $06F0,X
        let program = [0xA2, 0x01, 0xBD, 0xF0, 0x06, 0xA2, 0x20, 0xBD, 0xF0, 0x06];
        let (_, bus, cycles) = run(&program, 4);
        assert_eq!(cycles, vec![2, 4, 2, 5]);
        // The page-cross dummy read hits the uncorrected address.
        assert!(bus.log.contains(&Access::Read(0x0610)));
        assert!(bus.log.contains(&Access::Read(0x0710)));
    }

    #[test]
    fn indexed_writes_always_pay_the_fixup() {
        // LDX #$01; STA $0200,X
        let (_, bus, cycles) = run(&[0xA2, 0x01, 0x9D, 0x00, 0x02], 2);
        assert_eq!(cycles, vec![2, 5]);
        assert_eq!(bus.writes(), vec![(0x0201, 0x00)]);
    }

    #[test]
    fn read_modify_write_writes_twice() {
        // LDA #$41; STA $10; ASL $10
        let (cpu, bus, cycles) = run(&[0xA9, 0x41, 0x85, 0x10, 0x06, 0x10], 3);
        assert_eq!(cycles, vec![2, 3, 5]);
        assert_eq!(bus.writes(), vec![(0x10, 0x41), (0x10, 0x41), (0x10, 0x82)]);
        assert!(cpu.p.contains(Status::NEGATIVE));
    }

    #[test]
    fn jsr_rts_round_trip() {
        // JSR $0610; BRK ... at $0610: RTS
        let mut program = vec![0x20, 0x10, 0x06];
        program.resize(0x10, 0xEA);
        program.push(0x60);
        let (cpu, bus, cycles) = run(&program, 2);
        assert_eq!(cycles, vec![6, 6]);
        assert_eq!(cpu.pc, 0x0603);
        assert_eq!(cpu.s, 0xFD);
        assert_eq!(bus.writes(), vec![(0x01FD, 0x06), (0x01FC, 0x02)]);
    }

    #[test]
    fn stack_instruction_timing() {
        // PHA; PHP; PLA; PLP
        let (cpu, bus, cycles) = run(&[0x48, 0x08, 0x68, 0x28], 4);
        assert_eq!(cycles, vec![3, 3, 4, 4]);
        // PHP pushes B and the unused bit.
        assert_eq!(bus.writes()[1], (0x01FC, 0x34));
        assert_eq!(cpu.a, 0x34);
        assert_eq!(cpu.p.bits(), 0x20);
    }

    #[test]
    fn brk_and_rti() {
        let mut program = vec![0x00, 0xFF, 0xEA];
        program.resize(0x20, 0xEA);
        program.push(0x40); // RTI at $0620
        let (mut cpu, mut bus) = boot(&program);
        bus.load(0xFFFE, &[0x20, 0x06]);
        cpu.p.remove(Status::INTERRUPT);

        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.pc, 0x0620);
        assert!(cpu.p.contains(Status::INTERRUPT));
        assert_eq!(
            bus.writes(),
            vec![(0x01FD, 0x06), (0x01FC, 0x02), (0x01FB, 0x30)]
        );

        assert_eq!(cpu.step(&mut bus), 6);
        assert_eq!(cpu.pc, 0x0602);
        assert!(!cpu.p.contains(Status::INTERRUPT));
    }

    #[test]
    fn nmi_entry_pushes_hardware_status() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        bus.load(0xFFFA, &[0x00, 0x07]);
        cpu.signal_nmi();
        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.pc, 0x0700);
        assert!(!cpu.nmi_pending());
        let pushed_p = bus.writes()[2].1;
        assert_eq!(pushed_p & 0x30, 0x20);
    }

    #[test]
    fn cli_delays_a_pending_irq_by_one_instruction() {
        // CLI; NOP; NOP
        let (mut cpu, mut bus) = boot(&[0x58, 0xEA, 0xEA]);
        bus.load(0xFFFE, &[0x00, 0x07]);
        cpu.request_irq();

        assert_eq!(cpu.step(&mut bus), 2); // CLI
        assert_eq!(cpu.step(&mut bus), 2); // NOP still runs
        assert_eq!(cpu.pc, 0x0602);
        assert_eq!(cpu.step(&mut bus), 7); // IRQ entry
        assert_eq!(cpu.pc, 0x0700);
        assert_eq!(cpu.pending_irqs(), 0);
    }

    #[test]
    fn sei_lets_one_irq_through() {
        // CLI; NOP; SEI
        let (mut cpu, mut bus) = boot(&[0x58, 0xEA, 0x78, 0xEA]);
        bus.load(0xFFFE, &[0x00, 0x07]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 2); // SEI
        // Raised while SEI ran: the poll still saw I clear.
        cpu.request_irq();
        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.pc, 0x0700);
    }

    #[test]
    fn plp_delays_a_pending_irq() {
        // LDA #$00; PHA; PLP; NOP; NOP
        let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0x48, 0x28, 0xEA, 0xEA]);
        bus.load(0xFFFE, &[0x00, 0x07]);
        cpu.request_irq();

        assert_eq!(cpu.step(&mut bus), 2); // LDA
        assert_eq!(cpu.step(&mut bus), 3); // PHA
        assert_eq!(cpu.step(&mut bus), 4); // PLP clears I
        assert!(!cpu.p.contains(Status::INTERRUPT));
        assert_eq!(cpu.step(&mut bus), 2); // NOP still runs
        assert_eq!(cpu.pc, 0x0605);
        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.pc, 0x0700);
    }

    #[test]
    fn rti_unmasks_immediately() {
        // RTI to $0610 with I clear in the pulled status.
        let (mut cpu, mut bus) = boot(&[0x40]);
        bus.load(0xFFFE, &[0x00, 0x07]);
        bus.load(0x01F1, &[0x20, 0x10, 0x06]);
        cpu.s = 0xF0;
        cpu.request_irq();

        assert_eq!(cpu.step(&mut bus), 6);
        assert_eq!(cpu.pc, 0x0610);
        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.pc, 0x0700);
        assert_eq!(cpu.pending_irqs(), 0);
    }

    #[test]
    fn jmp_indirect_does_not_cross_pages() {
        let (mut cpu, mut bus) = boot(&[0x6C, 0xFF, 0x02]);
        bus.load(0x02FF, &[0x34]);
        bus.load(0x0200, &[0x12]);
        bus.load(0x0300, &[0x56]);
        assert_eq!(cpu.step(&mut bus), 5);
        assert_eq!(cpu.pc, 0x1234);
    }

    #[test]
    fn undocumented_combined_opcodes() {
        // LDA #$FF; STA $20; LDA #$03; DCP $20 -> $20 = $FE, A < M so C clear
        let (cpu, bus, cycles) = run(&[0xA9, 0xFF, 0x85, 0x20, 0xA9, 0x03, 0xC7, 0x20], 4);
        assert_eq!(cycles[3], 5);
        assert_eq!(bus.mem[0x20], 0xFE);
        assert!(!cpu.p.contains(Status::CARRY));

        // LAX $30 loads both A and X.
        let (mut cpu, mut bus) = boot(&[0xA7, 0x30]);
        bus.load(0x30, &[0x9C]);
        assert_eq!(cpu.step(&mut bus), 3);
        assert_eq!((cpu.a, cpu.x), (0x9C, 0x9C));

        // ANC copies N into C.
        let (cpu, _, _) = run(&[0xA9, 0xF0, 0x0B, 0x80], 2);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.p.contains(Status::CARRY | Status::NEGATIVE));
    }

    #[test]
    fn shx_masks_with_base_high_byte_plus_one() {
        // LDX #$FF; LDY #$01; SHX $0210,Y
        let (_, bus, cycles) = run(&[0xA2, 0xFF, 0xA0, 0x01, 0x9E, 0x10, 0x02], 3);
        assert_eq!(cycles[2], 5);
        assert_eq!(bus.writes(), vec![(0x0211, 0x03)]);
    }

    #[test]
    fn jam_is_a_two_cycle_no_op() {
        let (cpu, _, cycles) = run(&[0x02, 0xEA], 2);
        assert_eq!(cycles, vec![2, 2]);
        assert_eq!(cpu.pc, ORIGIN + 2);
    }

    #[test]
    fn trace_captures_state_before_execution() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x10, 0x8D, 0x00, 0x02]);
        cpu.set_trace_enabled(true);
        cpu.step(&mut bus);
        let line = cpu.last_trace().cloned().expect("trace line");
        assert_eq!(line.pc, ORIGIN);
        assert_eq!(line.bytes, vec![0xA9, 0x10]);
        assert_eq!(line.a, 0x00);
        assert_eq!(line.cycles, 0);

        cpu.step(&mut bus);
        let line = cpu.last_trace().expect("trace line");
        assert_eq!(line.bytes, vec![0x8D, 0x00, 0x02]);
        assert_eq!(line.a, 0x10);
        assert_eq!(line.cycles, 2);
    }
}
