//! Instruction builder over a [`Module`].

use crate::{
    BasicBlock, BlockId, CmpOp, Function, FunctionId, Instruction, Module, Slot, SlotId,
    Terminator, ValueDef, ValueId,
};

/// Name of the pre-declared variadic external used for formatted output.
pub const OUTPUT_SYMBOL: &str = "print";

/// Streams instructions into a [`Module`], one insertion point at a time.
pub struct IrBuilder {
    module: Module,
    insertion_point: Option<BlockId>,
}

impl IrBuilder {
    /// Create a builder over a fresh module. The module starts out with the
    /// single external declaration `i32 @print(i8*, ...)`.
    pub fn new(module_name: &str) -> Self {
        let mut module = Module::new(module_name);
        module.functions.push(Function {
            name: OUTPUT_SYMBOL.to_string(),
            blocks: Vec::new(),
            is_external: true,
            is_variadic: true,
        });
        Self {
            module,
            insertion_point: None,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Consumes `self` and returns the generated [`Module`].
    #[must_use]
    pub fn into_module(self) -> Module {
        self.module
    }

    pub fn lookup_function(&self, name: &str) -> Option<FunctionId> {
        self.module
            .functions
            .iter()
            .position(|function| function.name == name)
            .map(FunctionId)
    }

    /// Get-or-declare a function with the fixed zero-parameter integer
    /// signature. Redeclaring a name returns the existing function.
    pub fn declare_function(&mut self, name: &str) -> FunctionId {
        if let Some(id) = self.lookup_function(name) {
            return id;
        }
        self.module.functions.push(Function {
            name: name.to_string(),
            blocks: Vec::new(),
            is_external: false,
            is_variadic: false,
        });
        FunctionId(self.module.functions.len() - 1)
    }

    /// Creates a detached block. Use [`IrBuilder::attach_block`] to append it
    /// to a function; a block that is never attached never renders.
    pub fn create_block(&mut self, name: &str) -> BlockId {
        self.module.blocks.push(BasicBlock {
            name: name.to_string(),
            instructions: Vec::new(),
            terminator: None,
        });
        BlockId(self.module.blocks.len() - 1)
    }

    pub fn attach_block(&mut self, function: FunctionId, block: BlockId) {
        self.module.functions[function.0].blocks.push(block);
    }

    pub fn set_insertion_point(&mut self, block: BlockId) {
        self.insertion_point = Some(block);
    }

    pub fn current_block(&self) -> BlockId {
        self.insertion_point.expect("no insertion point set")
    }

    pub fn has_terminator(&self, block: BlockId) -> bool {
        self.module.blocks[block.0].terminator.is_some()
    }

    pub fn const_int(&mut self, value: i64) -> ValueId {
        self.push_value(ValueDef::ConstInt(value))
    }

    /// Interns `text` as a global string constant.
    pub fn global_string(&mut self, text: &str) -> ValueId {
        let index = match self.module.strings.iter().position(|s| s == text) {
            Some(index) => index,
            None => {
                self.module.strings.push(text.to_string());
                self.module.strings.len() - 1
            }
        };
        self.push_value(ValueDef::GlobalString(index))
    }

    /// Allocates an integer stack slot in the current block.
    pub fn alloca(&mut self, name: &str) -> SlotId {
        self.module.slots.push(Slot {
            name: name.to_string(),
        });
        let slot = SlotId(self.module.slots.len() - 1);
        self.push_instruction(Instruction::Alloca { slot });
        slot
    }

    pub fn load(&mut self, slot: SlotId) -> ValueId {
        let dest = self.push_value(ValueDef::Inst);
        self.push_instruction(Instruction::Load { dest, slot });
        dest
    }

    pub fn store(&mut self, value: ValueId, slot: SlotId) {
        self.push_instruction(Instruction::Store { value, slot });
    }

    pub fn cmp(&mut self, op: CmpOp, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dest = self.push_value(ValueDef::Inst);
        self.push_instruction(Instruction::Cmp { dest, op, lhs, rhs });
        dest
    }

    pub fn call(&mut self, callee: FunctionId, args: Vec<ValueId>) -> ValueId {
        let dest = self.push_value(ValueDef::Inst);
        self.push_instruction(Instruction::Call { dest, callee, args });
        dest
    }

    pub fn br(&mut self, target: BlockId) {
        self.terminate(Terminator::Br(target));
    }

    pub fn cond_br(&mut self, cond: ValueId, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::CondBr {
            cond,
            then_block,
            else_block,
        });
    }

    pub fn ret(&mut self, value: ValueId) {
        self.terminate(Terminator::Ret(value));
    }

    fn push_value(&mut self, def: ValueDef) -> ValueId {
        self.module.values.push(def);
        ValueId(self.module.values.len() - 1)
    }

    fn push_instruction(&mut self, instruction: Instruction) {
        let block = self.current_block();
        self.module.blocks[block.0].instructions.push(instruction);
    }

    fn terminate(&mut self, terminator: Terminator) {
        let block = self.current_block();
        let slot = &mut self.module.blocks[block.0].terminator;
        if slot.is_none() {
            *slot = Some(terminator);
        }
    }
}
