// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Bytecode definitions for the stack machine.
//!
//! A [`Bytecode`] is a linear list of labels, instructions and blank
//! separators. Its [`Display`](fmt::Display) implementation produces the
//! assembly listing:
//!
//! ```text
//! main:
//!   LDC 1
//!   STV x
//!   RTS
//!
//! ```

use std::fmt;

use rustc_hash::FxHashMap;

/// One entry of a bytecode listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A jump target
    Label(String),
    /// An instruction
    Instruction(Instruction),
    /// A blank line between functions
    Separator,
}

/// A compiled module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytecode {
    /// The listing in order
    pub items: Vec<Item>,
}

impl Bytecode {
    /// Creates a new empty bytecode chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over the instructions, skipping labels and separators.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.items.iter().filter_map(|item| match item {
            Item::Instruction(instruction) => Some(instruction),
            Item::Label(_) | Item::Separator => None,
        })
    }

    /// Maps every label to the index of the instruction that follows it.
    ///
    /// A label at the very end maps to the instruction count.
    pub fn labels(&self) -> FxHashMap<&str, usize> {
        let mut labels = FxHashMap::default();
        let mut index = 0;

        for item in &self.items {
            match item {
                Item::Label(name) => {
                    labels.insert(name.as_str(), index);
                }
                Item::Instruction(_) => index += 1,
                Item::Separator => {}
            }
        }

        labels
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                Item::Label(name) => writeln!(f, "{}:", name)?,
                Item::Instruction(instruction) => writeln!(f, "  {}", instruction)?,
                Item::Separator => writeln!(f)?,
            }
        }
        Ok(())
    }
}

/// A single bytecode instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation code
    pub opcode: OpCode,
    /// Optional operand
    pub operand: Option<Operand>,
}

impl Instruction {
    /// Creates a new instruction with no operand.
    pub fn simple(opcode: OpCode) -> Self {
        Self {
            opcode,
            operand: None,
        }
    }

    /// Creates a new instruction with an operand.
    pub fn with_operand(opcode: OpCode, operand: Operand) -> Self {
        Self {
            opcode,
            operand: Some(operand),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Some(operand) => write!(f, "{} {}", self.opcode, operand),
            None => write!(f, "{}", self.opcode),
        }
    }
}

/// Instruction operands. All of them are printed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Literal source text of a constant, quotes included
    Literal(String),
    /// Name of a variable, constant or parameter
    Name(String),
    /// Jump or call target
    Label(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(text) | Operand::Name(text) | Operand::Label(text) => {
                f.write_str(text)
            }
        }
    }
}

/// Operation codes for the stack machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // Control
    /// No operation
    Nop = 0x00,
    /// Breakpoint
    Brk = 0x01,
    /// Stop the machine
    Stp = 0x02,

    // Loads
    /// Push a constant
    Ldc = 0x10,
    /// Push a variable's value
    Ldv = 0x11,

    // Stores
    /// Pop into a variable
    Stv = 0x20,
    /// Discard the top of the stack
    Pop = 0x21,

    // Arithmetic and logic
    /// Bitwise and
    And = 0x40,
    /// Bitwise or
    Or = 0x41,
    /// Bitwise exclusive or
    Xor = 0x42,
    /// Logical/bitwise not
    Not = 0x43,
    /// Add
    Add = 0x44,
    /// Subtract
    Sub = 0x45,
    /// Multiply
    Mul = 0x46,
    /// Divide
    Div = 0x47,
    /// Remainder
    Mod = 0x48,
    /// Shift left
    Shl = 0x49,
    /// Shift right
    Shr = 0x4A,
    /// Negate
    Neg = 0x4B,
    /// Increment
    Inc = 0x4C,
    /// Decrement
    Dec = 0x4D,

    // Comparison
    /// Equal
    Equ = 0x50,
    /// Not equal
    Neq = 0x51,
    /// Greater than
    Gt = 0x52,
    /// Less than
    Lt = 0x53,
    /// Greater or equal
    Gte = 0x54,
    /// Less or equal
    Lte = 0x55,

    // Branches
    /// Unconditional branch
    Bra = 0xB0,
    /// Branch if the popped value is true
    Cbr = 0xB1,

    // Jumps
    /// Jump
    Jmp = 0xC0,
    /// Jump to subroutine
    Jsr = 0xC1,
    /// Return from subroutine
    Rts = 0xC2,
    /// System call
    Sys = 0xC3,
}

impl OpCode {
    /// Every opcode in numeric order.
    pub const ALL: [OpCode; 33] = [
        OpCode::Nop,
        OpCode::Brk,
        OpCode::Stp,
        OpCode::Ldc,
        OpCode::Ldv,
        OpCode::Stv,
        OpCode::Pop,
        OpCode::And,
        OpCode::Or,
        OpCode::Xor,
        OpCode::Not,
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mul,
        OpCode::Div,
        OpCode::Mod,
        OpCode::Shl,
        OpCode::Shr,
        OpCode::Neg,
        OpCode::Inc,
        OpCode::Dec,
        OpCode::Equ,
        OpCode::Neq,
        OpCode::Gt,
        OpCode::Lt,
        OpCode::Gte,
        OpCode::Lte,
        OpCode::Bra,
        OpCode::Cbr,
        OpCode::Jmp,
        OpCode::Jsr,
        OpCode::Rts,
        OpCode::Sys,
    ];

    /// The assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Nop => "NOP",
            OpCode::Brk => "BRK",
            OpCode::Stp => "STP",
            OpCode::Ldc => "LDC",
            OpCode::Ldv => "LDV",
            OpCode::Stv => "STV",
            OpCode::Pop => "POP",
            OpCode::And => "AND",
            OpCode::Or => "OR",
            OpCode::Xor => "XOR",
            OpCode::Not => "NOT",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Mod => "MOD",
            OpCode::Shl => "SHL",
            OpCode::Shr => "SHR",
            OpCode::Neg => "NEG",
            OpCode::Inc => "INC",
            OpCode::Dec => "DEC",
            OpCode::Equ => "EQU",
            OpCode::Neq => "NEQ",
            OpCode::Gt => "GT",
            OpCode::Lt => "LT",
            OpCode::Gte => "GTE",
            OpCode::Lte => "LTE",
            OpCode::Bra => "BRA",
            OpCode::Cbr => "CBR",
            OpCode::Jmp => "JMP",
            OpCode::Jsr => "JSR",
            OpCode::Rts => "RTS",
            OpCode::Sys => "SYS",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OpCode::ALL
            .into_iter()
            .find(|&opcode| opcode as u8 == byte)
            .ok_or(byte)
    }
}
