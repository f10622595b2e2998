//! LLVM-flavored textual rendering of a [`Module`].

use crate::{BlockId, Function, Instruction, Module, SlotId, Terminator, ValueDef, ValueId};
use std::collections::HashMap;
use std::fmt;

/// Per-function display names for labels, slots and instruction results.
struct Names {
    labels: HashMap<BlockId, String>,
    slots: HashMap<SlotId, String>,
    results: HashMap<ValueId, String>,
}

/// Returns `base` the first time it is seen, `base.1`, `base.2`, ... after.
fn unique(used: &mut HashMap<String, usize>, base: &str) -> String {
    let count = used.entry(base.to_string()).or_insert(0);
    *count += 1;
    if *count == 1 {
        base.to_string()
    } else {
        format!("{}.{}", base, *count - 1)
    }
}

impl Module {
    fn function_names(&self, function: &Function) -> Names {
        let mut labels = HashMap::new();
        let mut slots = HashMap::new();
        let mut results = HashMap::new();
        let mut used_labels = HashMap::new();
        let mut used_slots = HashMap::new();
        let mut next_result = 0;

        for &block_id in &function.blocks {
            let block = self.block(block_id);
            labels.insert(block_id, unique(&mut used_labels, &block.name));

            for instruction in &block.instructions {
                match instruction {
                    Instruction::Alloca { slot } => {
                        let name = unique(&mut used_slots, &self.slot(*slot).name);
                        slots.insert(*slot, format!("%{}", name));
                    }
                    Instruction::Load { dest, .. }
                    | Instruction::Cmp { dest, .. }
                    | Instruction::Call { dest, .. } => {
                        results.insert(*dest, format!("%{}", next_result));
                        next_result += 1;
                    }
                    Instruction::Store { .. } => {}
                }
            }
        }

        Names {
            labels,
            slots,
            results,
        }
    }

    fn label(&self, block: BlockId, names: &Names) -> String {
        names
            .labels
            .get(&block)
            .cloned()
            .unwrap_or_else(|| self.block(block).name.clone())
    }

    fn slot_name(&self, slot: SlotId, names: &Names) -> String {
        names
            .slots
            .get(&slot)
            .cloned()
            .unwrap_or_else(|| format!("%{}", self.slot(slot).name))
    }

    fn operand(&self, value: ValueId, names: &Names) -> String {
        match self.value(value) {
            ValueDef::ConstInt(v) => v.to_string(),
            ValueDef::GlobalString(index) => format!("@.str.{}", index),
            ValueDef::Inst => names
                .results
                .get(&value)
                .cloned()
                .unwrap_or_else(|| "%?".to_string()),
        }
    }

    fn typed_operand(&self, value: ValueId, names: &Names) -> String {
        match self.value(value) {
            ValueDef::GlobalString(index) => format!("i8* @.str.{}", index),
            _ => format!("i32 {}", self.operand(value, names)),
        }
    }

    fn fmt_instruction(
        &self,
        f: &mut fmt::Formatter<'_>,
        instruction: &Instruction,
        names: &Names,
    ) -> fmt::Result {
        match instruction {
            Instruction::Alloca { slot } => {
                writeln!(f, "  {} = alloca i32", self.slot_name(*slot, names))
            }
            Instruction::Load { dest, slot } => writeln!(
                f,
                "  {} = load i32, i32* {}",
                self.operand(*dest, names),
                self.slot_name(*slot, names)
            ),
            Instruction::Store { value, slot } => writeln!(
                f,
                "  store {}, i32* {}",
                self.typed_operand(*value, names),
                self.slot_name(*slot, names)
            ),
            Instruction::Cmp { dest, op, lhs, rhs } => writeln!(
                f,
                "  {} = icmp {} i32 {}, {}",
                self.operand(*dest, names),
                op.mnemonic(),
                self.operand(*lhs, names),
                self.operand(*rhs, names)
            ),
            Instruction::Call { dest, callee, args } => {
                let args = args
                    .iter()
                    .map(|&arg| self.typed_operand(arg, names))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(
                    f,
                    "  {} = call i32 @{}({})",
                    self.operand(*dest, names),
                    self.function(*callee).name,
                    args
                )
            }
        }
    }

    fn fmt_terminator(
        &self,
        f: &mut fmt::Formatter<'_>,
        terminator: &Terminator,
        names: &Names,
    ) -> fmt::Result {
        match terminator {
            Terminator::Br(target) => writeln!(f, "  br label %{}", self.label(*target, names)),
            Terminator::CondBr {
                cond,
                then_block,
                else_block,
            } => writeln!(
                f,
                "  br i1 {}, label %{}, label %{}",
                self.operand(*cond, names),
                self.label(*then_block, names),
                self.label(*else_block, names)
            ),
            Terminator::Ret(value) => writeln!(f, "  ret i32 {}", self.operand(*value, names)),
        }
    }

    fn fmt_function(&self, f: &mut fmt::Formatter<'_>, function: &Function) -> fmt::Result {
        let names = self.function_names(function);
        writeln!(f, "define i32 @{}() {{", function.name)?;
        for &block_id in &function.blocks {
            writeln!(f, "{}:", self.label(block_id, &names))?;
            let block = self.block(block_id);
            for instruction in &block.instructions {
                self.fmt_instruction(f, instruction, &names)?;
            }
            if let Some(terminator) = &block.terminator {
                self.fmt_terminator(f, terminator, &names)?;
            }
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        for (index, text) in self.strings.iter().enumerate() {
            writeln!(
                f,
                "@.str.{} = private constant c\"{}\"",
                index,
                text.escape_default()
            )?;
        }
        for function in &self.functions {
            if function.is_external {
                if function.is_variadic {
                    writeln!(f, "declare i32 @{}(i8*, ...)", function.name)?;
                } else {
                    writeln!(f, "declare i32 @{}()", function.name)?;
                }
            }
        }
        for function in self.functions.iter().filter(|f| !f.is_external) {
            writeln!(f)?;
            self.fmt_function(f, function)?;
        }
        Ok(())
    }
}
