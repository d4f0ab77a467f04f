use crate::error::{VmError, VmResult};

/// Linear, byte-addressed memory.
///
/// Memory only ever grows, and new bytes are zeroed. There is no word
/// alignment: any byte offset is valid. Reads past the current length
/// return zeros without growing the backing store; writes must land
/// inside the current length.
#[derive(Debug, Default, Clone)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Grows memory to `new_len` bytes, zero-filling the extension.
    /// Shrinking is a no-op.
    pub fn resize(&mut self, new_len: u64) {
        let new_len = new_len as usize;
        if new_len > self.data.len() {
            self.data.resize(new_len, 0);
        }
    }

    /// Copies `data` into memory at `offset`. The whole write must fit
    /// inside the current length.
    pub fn store(&mut self, offset: u64, data: &[u8]) -> VmResult<()> {
        let len = data.len() as u64;
        let end = offset.checked_add(len).ok_or(VmError::MemoryBounds {
            offset,
            len,
            size: self.len(),
        })?;
        if end > self.len() {
            return Err(VmError::MemoryBounds {
                offset,
                len,
                size: self.len(),
            });
        }
        self.data[offset as usize..end as usize].copy_from_slice(data);
        Ok(())
    }

    /// Reads `len` bytes starting at `offset` into a fresh buffer.
    /// Bytes past the current length read as zero; the read never
    /// fails and never grows memory.
    pub fn load(&self, offset: u64, len: u64) -> Vec<u8> {
        let mut out = vec![0u8; len as usize];
        let size = self.data.len() as u64;
        if offset >= size {
            return out;
        }
        let end = size.min(offset.saturating_add(len));
        let available = (end - offset) as usize;
        out[..available].copy_from_slice(&self.data[offset as usize..end as usize]);
        out
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_zero_fills() {
        let mut mem = Memory::new();
        mem.resize(10);
        assert_eq!(mem.len(), 10);
        assert_eq!(mem.as_bytes(), &[0u8; 10]);
    }

    #[test]
    fn resize_never_shrinks() {
        let mut mem = Memory::new();
        mem.resize(10);
        mem.resize(4);
        assert_eq!(mem.len(), 10);
    }

    #[test]
    fn store_then_load_adjacent_regions() {
        let mut mem = Memory::new();
        mem.resize(10);
        mem.store(0, b"hello").unwrap();
        mem.store(5, b"world").unwrap();
        assert_eq!(mem.load(0, 10), b"helloworld");
    }

    #[test]
    fn store_past_length_is_an_error() {
        let mut mem = Memory::new();
        mem.resize(4);
        let err = mem.store(2, b"abc").unwrap_err();
        assert_eq!(
            err,
            VmError::MemoryBounds {
                offset: 2,
                len: 3,
                size: 4
            }
        );
    }

    #[test]
    fn load_past_length_reads_zeros() {
        let mut mem = Memory::new();
        mem.resize(3);
        mem.store(0, b"abc").unwrap();
        assert_eq!(mem.load(1, 5), b"bc\0\0\0");
        assert_eq!(mem.load(100, 4), &[0u8; 4]);
        assert_eq!(mem.len(), 3);
    }
}
