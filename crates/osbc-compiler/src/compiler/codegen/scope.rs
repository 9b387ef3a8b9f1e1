// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Code buffers for nested scopes.

use crate::compiler::bytecode::{Bytecode, Instruction, Item, OpCode, Operand};

/// Collects the code of one function or compound statement.
///
/// A finished scope is [written](CodeScope::write) into its parent, so
/// nested scopes compose by concatenation in source order.
#[derive(Debug, Default)]
pub struct CodeScope {
    items: Vec<Item>,
}

impl CodeScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction without an operand.
    pub fn emit(&mut self, opcode: OpCode) {
        self.items
            .push(Item::Instruction(Instruction::simple(opcode)));
    }

    /// Appends an instruction with an operand.
    pub fn emit_with(&mut self, opcode: OpCode, operand: Operand) {
        self.items
            .push(Item::Instruction(Instruction::with_operand(opcode, operand)));
    }

    /// Places a label before the next instruction.
    pub fn label(&mut self, name: impl Into<String>) {
        self.items.push(Item::Label(name.into()));
    }

    /// Appends a blank line to the listing.
    pub fn separator(&mut self) {
        self.items.push(Item::Separator);
    }

    /// Appends this scope's code to `parent`.
    pub fn write(self, parent: &mut CodeScope) {
        parent.items.extend(self.items);
    }

    /// Turns the outermost scope into the final bytecode.
    pub fn finish(self) -> Bytecode {
        Bytecode { items: self.items }
    }

    /// Number of items in the scope.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
