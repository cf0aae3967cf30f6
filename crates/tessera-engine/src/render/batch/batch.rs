use crate::render::resources::{SlotTexture, TextureId};
use crate::shapes::FillMode;

/// Pending data for one draw-call class between flushes.
///
/// `V` is the vertex record, `T` the texture handle stored in slots. The
/// backing vectors are reserved once and reused across flushes.
#[derive(Debug, Clone)]
pub struct Batch<V, T> {
    vertices: Vec<V>,
    indices: Vec<u32>,
    textures: Vec<T>,
    slot_capacity: usize,
    fill: FillMode,
}

impl<V: Copy, T: SlotTexture> Batch<V, T> {
    pub fn with_capacity(max_vertices: usize, slot_capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_vertices),
            indices: Vec::with_capacity(max_vertices * 3),
            textures: Vec::with_capacity(slot_capacity),
            slot_capacity,
            fill: FillMode::Filled,
        }
    }

    /// Appends one primitive. `indices` are relative to the primitive's own
    /// first vertex and are rebased onto the current vertex count.
    ///
    /// No capacity check: the caller flushes beforehand.
    pub fn append(&mut self, vertices: impl IntoIterator<Item = V>, indices: &[u32]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(vertices);
        debug_assert!(
            indices.iter().all(|&i| ((base + i) as usize) < self.vertices.len()),
            "index past the end of the batch"
        );
        self.indices.extend(indices.iter().map(|i| base + i));
    }

    /// Slot position of `id`, if it is bound in this batch.
    pub fn texture_index_of(&self, id: TextureId) -> Option<usize> {
        self.textures.iter().position(|t| t.texture_id() == id)
    }

    /// Appends `texture` to the slot list and returns its slot, or `None`
    /// when every slot is taken.
    pub fn add_texture_slot(&mut self, texture: T) -> Option<usize> {
        if self.slots_full() {
            return None;
        }
        self.textures.push(texture);
        Some(self.textures.len() - 1)
    }

    /// Empties vertices, indices and slots; keeps allocations and fill mode.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.textures.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn slots_full(&self) -> bool {
        self.textures.len() >= self.slot_capacity
    }

    #[inline]
    pub fn fill(&self) -> FillMode {
        self.fill
    }

    #[inline]
    pub fn set_fill(&mut self, fill: FillMode) {
        self.fill = fill;
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn textures(&self) -> &[T] {
        &self.textures
    }
}
