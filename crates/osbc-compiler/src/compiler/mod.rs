// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Bytecode compiler for Orange Soda.
//!
//! Transforms a resolved AST into stack-machine bytecode.
//!
//! # Module Structure
//!
//! - `bytecode`: Bytecode definitions and the assembly listing
//! - `codegen`: Code generation from the AST
//!   - `codegen::scope`: Per-scope code buffers

pub mod bytecode;
pub mod codegen;

pub use bytecode::{Bytecode, Instruction, Item, OpCode, Operand};
pub use codegen::{CodeGen, CodeScope};
