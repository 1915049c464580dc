//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6502 processor state and
//! the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): 8-bit offset into stack page (0x0100-0x01FF)
//! - **Status flags**: N, V, D, I, Z, C (individual bool fields). B only
//!   exists in status bytes pushed to the stack.
//! - **Cycle counter**: u64 monotonically increasing cycle count
//! - **Interrupt latches**: pending IRQ and NMI, serviced at instruction
//!   boundaries
//!
//! ## Execution Model
//!
//! Each call to [`CPU::step`] does, in order:
//! 1. Consult the execution hook (unless bypassed for this step). If it
//!    returns `false` the step is abandoned with no side effects.
//! 2. Service a pending NMI.
//! 3. Service a pending IRQ if the I flag is clear.
//! 4. Otherwise fetch, decode and execute one instruction.
//!
//! Undocumented opcodes execute as two-cycle NOPs and are logged; the CPU
//! never halts on them.

use crate::addressing::AddressingMode;
use crate::instructions::{alu, branches, control, flags, inc_dec, load_store, shifts, stack, transfer};
use crate::logging::{Fault, Logger};
use crate::opcodes::Operation;
use crate::{MemoryBus, OPCODE_TABLE};
use serde::{Deserialize, Serialize};

/// NMI vector address.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Reset vector address.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// IRQ/BRK vector address.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles taken to service an IRQ or NMI.
pub const INTERRUPT_CYCLES: u8 = 7;

/// Pre-instruction callback. Receives the PC about to execute and returns
/// `false` to stop before the instruction retires.
pub type ExecutionHook = Box<dyn FnMut(u16) -> bool>;

/// Result of one [`CPU::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction or interrupt sequence ran and took `cycles` cycles.
    Executed { cycles: u8 },
    /// The execution hook refused the instruction at `pc`. Nothing changed.
    Blocked { pc: u16 },
}

impl StepOutcome {
    /// Cycles consumed (0 when blocked).
    pub fn cycles(&self) -> u8 {
        match self {
            StepOutcome::Executed { cycles } => *cycles,
            StepOutcome::Blocked { .. } => 0,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, StepOutcome::Blocked { .. })
    }
}

/// Serializable copy of the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuRegisters {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub flag_n: bool,
    pub flag_v: bool,
    pub flag_d: bool,
    pub flag_i: bool,
    pub flag_z: bool,
    pub flag_c: bool,
    pub cycles: u64,
    pub pending_irq: bool,
    pub pending_nmi: bool,
}

/// Execution count for one opcode, reported by [`CPU::profile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcodeCount {
    pub opcode: u8,
    pub mnemonic: String,
    pub count: u64,
}

/// Register file plus the decoded instruction at PC, for debug views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuDebug {
    pub registers: CpuRegisters,
    pub status: u8,
    /// Disassembly of the next instruction, e.g. `"LDA #$8D"`.
    pub next_instruction: String,
    pub hook_installed: bool,
    pub profiling: bool,
}

/// 6502 CPU state and execution context.
///
/// The CPU struct contains all processor state including registers, flags, program counter,
/// stack pointer, and cycle counter. It is generic over the memory implementation via the
/// `MemoryBus` trait.
///
/// # Examples
///
/// ```
/// use mos6502_core::{CPU, FlatMemory, Logger, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
///
/// let cpu = CPU::new(memory, Logger::detached("cpu"));
///
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0xFD);
/// assert!(cpu.flag_i());
/// assert_eq!(cpu.cycles(), 0);
/// ```
pub struct CPU<M: MemoryBus> {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub(crate) sp: u8,

    /// Negative flag (set if bit 7 of result is 1)
    pub(crate) flag_n: bool,

    /// Overflow flag (set on signed overflow)
    pub(crate) flag_v: bool,

    /// Decimal mode flag (enables BCD arithmetic)
    pub(crate) flag_d: bool,

    /// Interrupt disable flag (blocks IRQ when set)
    pub(crate) flag_i: bool,

    /// Zero flag (set if result is zero)
    pub(crate) flag_z: bool,

    /// Carry flag (set on unsigned overflow/underflow)
    pub(crate) flag_c: bool,

    /// Total CPU cycles executed
    pub(crate) cycles: u64,

    pending_irq: bool,
    pending_nmi: bool,

    hook: Option<ExecutionHook>,
    bypass_hook: bool,

    profiling: bool,
    opcode_counts: Box<[u64; 256]>,

    /// Memory bus implementation
    pub(crate) memory: M,

    logger: Logger,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a new CPU with the given memory bus.
    ///
    /// The CPU is initialized to the 6502 power-on reset state:
    /// - Program counter (PC) is loaded from the reset vector at 0xFFFC/0xFFFD (little-endian)
    /// - Stack pointer (SP) is set to 0xFD
    /// - Interrupt Disable flag set
    /// - A, X, Y and the cycle counter are zeroed
    pub fn new(memory: M, logger: Logger) -> Self {
        let mut cpu = Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            pc: 0x0000,
            sp: 0xFD,
            flag_n: false,
            flag_v: false,
            flag_d: false,
            flag_i: true,
            flag_z: false,
            flag_c: false,
            cycles: 0,
            pending_irq: false,
            pending_nmi: false,
            hook: None,
            bypass_hook: false,
            profiling: false,
            opcode_counts: Box::new([0; 256]),
            memory,
            logger,
        };
        cpu.pc = cpu.read_word(RESET_VECTOR);
        cpu
    }

    /// Re-runs the reset sequence.
    ///
    /// Registers and flags return to their power-on values, pending
    /// interrupts are dropped and the cycle counter restarts at zero. The
    /// execution hook stays installed.
    pub fn reset(&mut self) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.flag_n = false;
        self.flag_v = false;
        self.flag_d = false;
        self.flag_i = true;
        self.flag_z = false;
        self.flag_c = false;
        self.cycles = 0;
        self.pending_irq = false;
        self.pending_nmi = false;
        self.bypass_hook = false;
        self.pc = self.read_word(RESET_VECTOR);
        self.logger
            .info(format!("reset, PC=0x{:04X}", self.pc));
    }

    /// Executes one instruction (or interrupt entry) and advances the CPU state.
    ///
    /// # Examples
    ///
    /// ```
    /// use mos6502_core::{CPU, FlatMemory, Logger, MemoryBus, StepOutcome};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    /// mem.write(0x8000, 0xEA); // NOP
    ///
    /// let mut cpu = CPU::new(mem, Logger::detached("cpu"));
    /// assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 2 });
    /// assert_eq!(cpu.pc(), 0x8001);
    /// ```
    pub fn step(&mut self) -> StepOutcome {
        if self.bypass_hook {
            self.bypass_hook = false;
        } else if let Some(hook) = self.hook.as_mut() {
            if !hook(self.pc) {
                return StepOutcome::Blocked { pc: self.pc };
            }
        }

        let start_cycles = self.cycles;

        if self.pending_nmi {
            self.pending_nmi = false;
            self.service_interrupt(NMI_VECTOR);
        } else if self.pending_irq && !self.flag_i {
            self.pending_irq = false;
            self.service_interrupt(IRQ_VECTOR);
        } else {
            let opcode = self.memory.read(self.pc);
            if self.profiling {
                self.opcode_counts[opcode as usize] += 1;
            }
            self.execute(opcode);
        }

        StepOutcome::Executed {
            cycles: (self.cycles - start_cycles) as u8,
        }
    }

    /// Executes one instruction with the hook suppressed, so stepping off
    /// a breakpoint does not immediately trip it again.
    pub fn perform_single_step(&mut self) -> StepOutcome {
        self.bypass_hook = true;
        self.step()
    }

    /// Runs the CPU for a specified number of cycles.
    ///
    /// Stops early if the execution hook blocks. Returns the number of
    /// cycles actually consumed, which may overshoot the budget by up to
    /// one instruction.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> u64 {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles + cycle_budget;

        while self.cycles < target_cycles {
            if self.step().is_blocked() {
                break;
            }
        }

        self.cycles - start_cycles
    }

    fn execute(&mut self, opcode: u8) {
        let metadata = &OPCODE_TABLE[opcode as usize];

        match metadata.operation {
            Operation::Adc => alu::execute_adc(self, opcode),
            Operation::And => alu::execute_and(self, opcode),
            Operation::Bit => alu::execute_bit(self, opcode),
            Operation::Cmp => alu::execute_cmp(self, opcode),
            Operation::Cpx => alu::execute_cpx(self, opcode),
            Operation::Cpy => alu::execute_cpy(self, opcode),
            Operation::Eor => alu::execute_eor(self, opcode),
            Operation::Ora => alu::execute_ora(self, opcode),
            Operation::Sbc => alu::execute_sbc(self, opcode),

            Operation::Bcc
            | Operation::Bcs
            | Operation::Beq
            | Operation::Bmi
            | Operation::Bne
            | Operation::Bpl
            | Operation::Bvc
            | Operation::Bvs => branches::execute_branch(self, opcode),

            Operation::Brk => control::execute_brk(self, opcode),
            Operation::Jmp => control::execute_jmp(self, opcode),
            Operation::Jsr => control::execute_jsr(self, opcode),
            Operation::Nop => control::execute_nop(self, opcode),
            Operation::Rti => control::execute_rti(self, opcode),
            Operation::Rts => control::execute_rts(self, opcode),

            Operation::Clc => flags::execute_clc(self, opcode),
            Operation::Cld => flags::execute_cld(self, opcode),
            Operation::Cli => flags::execute_cli(self, opcode),
            Operation::Clv => flags::execute_clv(self, opcode),
            Operation::Sec => flags::execute_sec(self, opcode),
            Operation::Sed => flags::execute_sed(self, opcode),
            Operation::Sei => flags::execute_sei(self, opcode),

            Operation::Dec => inc_dec::execute_dec(self, opcode),
            Operation::Dex => inc_dec::execute_dex(self, opcode),
            Operation::Dey => inc_dec::execute_dey(self, opcode),
            Operation::Inc => inc_dec::execute_inc(self, opcode),
            Operation::Inx => inc_dec::execute_inx(self, opcode),
            Operation::Iny => inc_dec::execute_iny(self, opcode),

            Operation::Lda => load_store::execute_lda(self, opcode),
            Operation::Ldx => load_store::execute_ldx(self, opcode),
            Operation::Ldy => load_store::execute_ldy(self, opcode),
            Operation::Sta => load_store::execute_sta(self, opcode),
            Operation::Stx => load_store::execute_stx(self, opcode),
            Operation::Sty => load_store::execute_sty(self, opcode),

            Operation::Asl => shifts::execute_asl(self, opcode),
            Operation::Lsr => shifts::execute_lsr(self, opcode),
            Operation::Rol => shifts::execute_rol(self, opcode),
            Operation::Ror => shifts::execute_ror(self, opcode),

            Operation::Pha => stack::execute_pha(self, opcode),
            Operation::Php => stack::execute_php(self, opcode),
            Operation::Pla => stack::execute_pla(self, opcode),
            Operation::Plp => stack::execute_plp(self, opcode),

            Operation::Tax => transfer::execute_tax(self, opcode),
            Operation::Tay => transfer::execute_tay(self, opcode),
            Operation::Tsx => transfer::execute_tsx(self, opcode),
            Operation::Txa => transfer::execute_txa(self, opcode),
            Operation::Txs => transfer::execute_txs(self, opcode),
            Operation::Tya => transfer::execute_tya(self, opcode),

            Operation::Illegal => {
                self.logger.fault(
                    Fault::IllegalOpcode,
                    format_args!("0x{:02X} at 0x{:04X} executed as NOP", opcode, self.pc),
                );
                self.finish(metadata.base_cycles, metadata.size_bytes);
            }
        }
    }

    // ========== Interrupts ==========

    /// Latches an IRQ. It is serviced at the next instruction boundary
    /// where the I flag is clear, and stays pending until then.
    pub fn trigger_irq(&mut self) {
        self.pending_irq = true;
    }

    /// Drops a latched IRQ that has not been serviced yet.
    pub fn clear_irq(&mut self) {
        self.pending_irq = false;
    }

    /// Latches an NMI. It is serviced at the next instruction boundary
    /// regardless of the I flag.
    pub fn trigger_nmi(&mut self) {
        self.pending_nmi = true;
    }

    pub fn pending_irq(&self) -> bool {
        self.pending_irq
    }

    pub fn pending_nmi(&self) -> bool {
        self.pending_nmi
    }

    fn service_interrupt(&mut self, vector: u16) {
        self.push_word(self.pc);
        // B clear, bit 5 set
        self.push(self.status() & !0b0001_0000);
        self.flag_i = true;
        self.pc = self.read_word(vector);
        self.cycles += INTERRUPT_CYCLES as u64;
    }

    // ========== Execution Hook ==========

    /// Installs the pre-instruction hook, replacing any previous one.
    pub fn set_execution_hook(&mut self, hook: ExecutionHook) {
        self.hook = Some(hook);
    }

    /// Removes the hook. Subsequent steps always execute.
    pub fn clear_execution_hook(&mut self) {
        self.hook = None;
    }

    pub fn has_execution_hook(&self) -> bool {
        self.hook.is_some()
    }

    /// Skips the hook for the next step only.
    pub fn bypass_hook_once(&mut self) {
        self.bypass_hook = true;
    }

    // ========== Profiling ==========

    /// Enables or disables per-opcode execution counting. Enabling resets
    /// the counters.
    pub fn set_profiling(&mut self, enabled: bool) {
        if enabled && !self.profiling {
            self.opcode_counts.fill(0);
        }
        self.profiling = enabled;
    }

    pub fn profiling(&self) -> bool {
        self.profiling
    }

    /// Opcodes executed since profiling was enabled, most frequent first.
    pub fn profile(&self) -> Vec<OpcodeCount> {
        let mut counts: Vec<OpcodeCount> = self
            .opcode_counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(opcode, &count)| OpcodeCount {
                opcode: opcode as u8,
                mnemonic: OPCODE_TABLE[opcode].mnemonic.to_string(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.opcode.cmp(&b.opcode)));
        counts
    }

    // ========== Snapshot ==========

    pub fn registers(&self) -> CpuRegisters {
        CpuRegisters {
            pc: self.pc,
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            flag_n: self.flag_n,
            flag_v: self.flag_v,
            flag_d: self.flag_d,
            flag_i: self.flag_i,
            flag_z: self.flag_z,
            flag_c: self.flag_c,
            cycles: self.cycles,
            pending_irq: self.pending_irq,
            pending_nmi: self.pending_nmi,
        }
    }

    /// Restores every register, flag, latch and the cycle counter. A
    /// pending hook bypass is dropped: it belonged to the old PC.
    pub fn restore_registers(&mut self, regs: &CpuRegisters) {
        self.bypass_hook = false;
        self.pc = regs.pc;
        self.a = regs.a;
        self.x = regs.x;
        self.y = regs.y;
        self.sp = regs.sp;
        self.flag_n = regs.flag_n;
        self.flag_v = regs.flag_v;
        self.flag_d = regs.flag_d;
        self.flag_i = regs.flag_i;
        self.flag_z = regs.flag_z;
        self.flag_c = regs.flag_c;
        self.cycles = regs.cycles;
        self.pending_irq = regs.pending_irq;
        self.pending_nmi = regs.pending_nmi;
    }

    /// Disassembles the instruction at `addr` without side effects.
    ///
    /// Returns the text and the instruction length in bytes.
    pub fn disassemble(&self, addr: u16) -> (String, u8) {
        let opcode = self.memory.peek(addr);
        let metadata = &OPCODE_TABLE[opcode as usize];
        let lo = self.memory.peek(addr.wrapping_add(1));
        let hi = self.memory.peek(addr.wrapping_add(2));
        let operand = metadata.addressing_mode.format_operand(addr, lo, hi);
        let text = if operand.is_empty() {
            metadata.mnemonic.to_string()
        } else {
            format!("{} {}", metadata.mnemonic, operand)
        };
        (text, metadata.size_bytes)
    }

    pub fn to_debug(&self) -> CpuDebug {
        CpuDebug {
            registers: self.registers(),
            status: self.status(),
            next_instruction: self.disassemble(self.pc).0,
            hook_installed: self.has_execution_hook(),
            profiling: self.profiling,
        }
    }

    // ========== Internal helpers for instructions ==========

    /// Adds `cycles` and moves PC past the current instruction.
    pub(crate) fn finish(&mut self, cycles: u8, size: u8) {
        self.cycles += cycles as u64;
        self.pc = self.pc.wrapping_add(size as u16);
    }

    pub(crate) fn set_nz(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = value & 0x80 != 0;
    }

    pub(crate) fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.memory.read(addr);
        let hi = self.memory.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn push(&mut self, value: u8) {
        self.memory.write(0x0100 | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pull(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(0x0100 | self.sp as u16)
    }

    pub(crate) fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(hi);
        self.push(lo);
    }

    pub(crate) fn pull_word(&mut self) -> u16 {
        let lo = self.pull();
        let hi = self.pull();
        u16::from_le_bytes([lo, hi])
    }

    /// Computes the effective address for a memory addressing mode.
    ///
    /// Operand bytes are read from PC+1 (and PC+2). The returned flag is
    /// `true` when indexing moved the address into another page.
    ///
    /// Zero-page indexed modes wrap inside page zero, and the indirect JMP
    /// reads its high byte from the start of the same page when the pointer
    /// sits at $xxFF.
    pub(crate) fn get_effective_address(&mut self, mode: AddressingMode) -> (u16, bool) {
        let operand_addr = self.pc.wrapping_add(1);
        match mode {
            AddressingMode::ZeroPage => (self.memory.read(operand_addr) as u16, false),
            AddressingMode::ZeroPageX => {
                let base = self.memory.read(operand_addr);
                (base.wrapping_add(self.x) as u16, false)
            }
            AddressingMode::ZeroPageY => {
                let base = self.memory.read(operand_addr);
                (base.wrapping_add(self.y) as u16, false)
            }
            AddressingMode::Absolute => (self.read_word(operand_addr), false),
            AddressingMode::AbsoluteX => {
                let base = self.read_word(operand_addr);
                let addr = base.wrapping_add(self.x as u16);
                (addr, page_crossed(base, addr))
            }
            AddressingMode::AbsoluteY => {
                let base = self.read_word(operand_addr);
                let addr = base.wrapping_add(self.y as u16);
                (addr, page_crossed(base, addr))
            }
            AddressingMode::Indirect => {
                let pointer = self.read_word(operand_addr);
                let lo = self.memory.read(pointer);
                let hi_addr = (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF);
                let hi = self.memory.read(hi_addr);
                (u16::from_le_bytes([lo, hi]), false)
            }
            AddressingMode::IndirectX => {
                let zp = self.memory.read(operand_addr).wrapping_add(self.x);
                (self.read_zero_page_word(zp), false)
            }
            AddressingMode::IndirectY => {
                let zp = self.memory.read(operand_addr);
                let base = self.read_zero_page_word(zp);
                let addr = base.wrapping_add(self.y as u16);
                (addr, page_crossed(base, addr))
            }
            AddressingMode::Immediate => (operand_addr, false),
            AddressingMode::Implicit | AddressingMode::Accumulator | AddressingMode::Relative => {
                (self.pc, false)
            }
        }
    }

    /// Fetches the operand value for a read instruction.
    pub(crate) fn get_operand_value(&mut self, mode: AddressingMode) -> (u8, bool) {
        match mode {
            AddressingMode::Accumulator => (self.a, false),
            _ => {
                let (addr, crossed) = self.get_effective_address(mode);
                (self.memory.read(addr), crossed)
            }
        }
    }

    /// Applies `op` to the accumulator or the memory operand and stores
    /// the result back where it came from.
    pub(crate) fn read_modify_write(
        &mut self,
        mode: AddressingMode,
        op: impl FnOnce(&mut Self, u8) -> u8,
    ) {
        if mode == AddressingMode::Accumulator {
            let value = self.a;
            self.a = op(self, value);
        } else {
            let (addr, _) = self.get_effective_address(mode);
            let value = self.memory.read(addr);
            let result = op(self, value);
            self.memory.write(addr, result);
        }
    }

    fn read_zero_page_word(&mut self, zp: u8) -> u16 {
        let lo = self.memory.read(zp as u16);
        let hi = self.memory.read(zp.wrapping_add(1) as u16);
        u16::from_le_bytes([lo, hi])
    }

    // ========== Memory Access ==========

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    ///
    /// Note: The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV-BDIZC). Bit 5 always reads 1 and B always reads 0
    /// here; B is only set in copies pushed by BRK and PHP.
    ///
    /// ```
    /// use mos6502_core::{CPU, FlatMemory, Logger};
    ///
    /// let cpu = CPU::new(FlatMemory::new(), Logger::detached("cpu"));
    /// assert_eq!(cpu.status(), 0b0010_0100);
    /// ```
    pub fn status(&self) -> u8 {
        let mut status: u8 = 0b0010_0000;

        if self.flag_n {
            status |= 0b1000_0000;
        }
        if self.flag_v {
            status |= 0b0100_0000;
        }
        if self.flag_d {
            status |= 0b0000_1000;
        }
        if self.flag_i {
            status |= 0b0000_0100;
        }
        if self.flag_z {
            status |= 0b0000_0010;
        }
        if self.flag_c {
            status |= 0b0000_0001;
        }

        status
    }

    /// Unpacks a status byte into the flags. Bits 4 and 5 are ignored.
    pub fn set_status(&mut self, value: u8) {
        self.flag_n = value & 0b1000_0000 != 0;
        self.flag_v = value & 0b0100_0000 != 0;
        self.flag_d = value & 0b0000_1000 != 0;
        self.flag_i = value & 0b0000_0100 != 0;
        self.flag_z = value & 0b0000_0010 != 0;
        self.flag_c = value & 0b0000_0001 != 0;
    }

    /// Returns the total number of CPU cycles executed since reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    // ========== Status Flag Getters ==========

    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    // ========== Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.flag_i = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }
}

fn page_crossed(base: u16, addr: u16) -> bool {
    base & 0xFF00 != addr & 0xFF00
}
