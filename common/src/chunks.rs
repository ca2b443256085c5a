/// A unit of recorded data delivered by the platform recorder
pub trait Chunk {
    fn byte_len(&self) -> u64;
}

impl Chunk for Vec<u8> {
    fn byte_len(&self) -> u64 {
        self.len() as u64
    }
}

/// Chunks of one recording session, in arrival order
#[derive(Debug, Clone)]
pub struct ChunkBuffer<C> {
    chunks: Vec<C>,
}

impl<C: Chunk> ChunkBuffer<C> {
    pub fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Append a chunk. Empty chunks are dropped; returns whether it was kept.
    pub fn push(&mut self, chunk: C) -> bool {
        if chunk.byte_len() == 0 {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    pub fn chunks(&self) -> &[C] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.chunks.iter().map(Chunk::byte_len).sum()
    }
}

impl<C: Chunk> Default for ChunkBuffer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkBuffer<Vec<u8>> {
    /// Concatenate all chunk payloads in arrival order
    pub fn concat(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}
