use cinder_primitives::Word;

use crate::error::{VmError, VmResult};

/// Hard cap on stack depth.
pub const MAX_STACK_SIZE: usize = 1024;

/// Operand stack of 256-bit words.
///
/// Binary operators pop their first operand and rewrite the new top in
/// place through [`Stack::peek_mut`], so a two-operand instruction costs
/// one pop and one write rather than two pops and a push.
#[derive(Debug, Default, Clone)]
pub struct Stack {
    items: Vec<Word>,
}

impl Stack {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, value: Word) -> VmResult<()> {
        if self.items.len() >= MAX_STACK_SIZE {
            return Err(VmError::StackOverflow);
        }
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> VmResult<Word> {
        self.items.pop().ok_or(VmError::StackUnderflow)
    }

    pub fn peek(&self) -> VmResult<&Word> {
        self.items.last().ok_or(VmError::StackUnderflow)
    }

    pub fn peek_mut(&mut self) -> VmResult<&mut Word> {
        self.items.last_mut().ok_or(VmError::StackUnderflow)
    }

    /// Pushes a copy of the `n`-th item from the top (1-based, so
    /// `dup(1)` duplicates the top).
    pub fn dup(&mut self, n: usize) -> VmResult<()> {
        let len = self.items.len();
        if n == 0 || n > len {
            return Err(VmError::StackUnderflow);
        }
        let value = self.items[len - n];
        self.push(value)
    }

    /// Swaps the top with the item `n` positions below it (1-based, so
    /// `swap(1)` exchanges the top two items).
    pub fn swap(&mut self, n: usize) -> VmResult<()> {
        let len = self.items.len();
        if n == 0 || n >= len {
            return Err(VmError::StackUnderflow);
        }
        self.items.swap(len - 1, len - 1 - n);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items from bottom to top.
    pub fn items(&self) -> &[Word] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = Stack::new();
        stack.push(Word::from(1u8)).unwrap();
        stack.push(Word::from(2u8)).unwrap();
        stack.push(Word::from(3u8)).unwrap();
        assert_eq!(stack.pop().unwrap(), Word::from(3u8));
        assert_eq!(stack.pop().unwrap(), Word::from(2u8));
        assert_eq!(stack.pop().unwrap(), Word::from(1u8));
        assert_eq!(stack.pop(), Err(VmError::StackUnderflow));
    }

    #[test]
    fn overflow_at_capacity() {
        let mut stack = Stack::new();
        for i in 0..MAX_STACK_SIZE {
            stack.push(Word::from(i as u64)).unwrap();
        }
        assert_eq!(stack.push(Word::zero()), Err(VmError::StackOverflow));
        assert_eq!(stack.len(), MAX_STACK_SIZE);
    }

    #[test]
    fn peek_mut_rewrites_top() {
        let mut stack = Stack::new();
        stack.push(Word::from(5u8)).unwrap();
        *stack.peek_mut().unwrap() = Word::from(9u8);
        assert_eq!(*stack.peek().unwrap(), Word::from(9u8));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn dup_reaches_sixteen_deep() {
        let mut stack = Stack::new();
        for i in 1..=16u64 {
            stack.push(Word::from(i)).unwrap();
        }
        stack.dup(16).unwrap();
        assert_eq!(*stack.peek().unwrap(), Word::from(1u8));
        assert_eq!(stack.dup(18), Err(VmError::StackUnderflow));
    }

    #[test]
    fn swap_exchanges_with_depth() {
        let mut stack = Stack::new();
        stack.push(Word::from(1u8)).unwrap();
        stack.push(Word::from(2u8)).unwrap();
        stack.push(Word::from(3u8)).unwrap();
        stack.swap(2).unwrap();
        assert_eq!(stack.items(), &[Word::from(3u8), Word::from(2u8), Word::from(1u8)]);
        assert_eq!(stack.swap(3), Err(VmError::StackUnderflow));
    }
}
