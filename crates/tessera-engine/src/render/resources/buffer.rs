use anyhow::{Result, ensure};
use wgpu::util::DeviceExt;

/// Fixed-capacity GPU buffer.
///
/// `update`/`stage` re-upload at most `capacity` bytes; the allocation is
/// never resized. Callers size the buffer for their largest payload at init.
/// Dropping the handle releases the allocation once in-flight work is done.
#[derive(Debug)]
pub struct GpuBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl GpuBuffer {
    /// Allocates `capacity` bytes. `COPY_DST` is always added to `usage`.
    pub fn init(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        capacity: u64,
    ) -> Self {
        let capacity = capacity.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self { label, buffer, capacity }
    }

    /// Allocates exactly `contents.len()` bytes and uploads `contents`.
    pub fn init_with(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        contents: &[u8],
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: usage | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            label,
            buffer,
            capacity: contents.len() as u64,
        }
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Slice covering the first `len` bytes (the live payload).
    #[inline]
    pub fn slice(&self, len: u64) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..len.min(self.capacity))
    }

    /// Queue-timeline upload, applied before the next submitted command
    /// buffer. Suitable for data written once per frame (uniforms).
    pub fn update(&self, queue: &wgpu::Queue, data: &[u8]) -> Result<()> {
        self.check_payload(data)?;
        queue.write_buffer(&self.buffer, 0, data);
        Ok(())
    }

    /// Encoder-timeline upload: `data` goes into a transient staging buffer
    /// that is copied into this buffer at the current point of `encoder`.
    /// Several uploads per frame each land before the pass that follows them.
    pub fn stage(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        data: &[u8],
    ) -> Result<()> {
        self.check_payload(data)?;
        if data.is_empty() {
            return Ok(());
        }

        let staging = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera staging"),
            contents: data,
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        encoder.copy_buffer_to_buffer(&staging, 0, &self.buffer, 0, data.len() as u64);
        Ok(())
    }

    fn check_payload(&self, data: &[u8]) -> Result<()> {
        check_payload(self.label, self.capacity, data.len() as u64)
    }
}

/// Rejects payloads a buffer of `capacity` bytes cannot take in one upload.
fn check_payload(label: &str, capacity: u64, len: u64) -> Result<()> {
    ensure!(
        len <= capacity,
        "{label}: payload of {len} bytes exceeds buffer capacity of {capacity} bytes"
    );
    ensure!(
        len % wgpu::COPY_BUFFER_ALIGNMENT == 0,
        "{label}: payload of {len} bytes is not {}-byte aligned",
        wgpu::COPY_BUFFER_ALIGNMENT
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_filling_the_buffer_is_accepted() {
        assert!(check_payload("vbo", 36_000, 36_000).is_ok());
    }

    #[test]
    fn empty_payload_is_accepted() {
        assert!(check_payload("vbo", 64, 0).is_ok());
    }

    #[test]
    fn payload_past_capacity_is_rejected() {
        let err = check_payload("quad ibo", 1024, 1028).unwrap_err();
        assert!(err.to_string().contains("exceeds buffer capacity of 1024 bytes"));
    }

    #[test]
    fn unaligned_payload_is_rejected() {
        let err = check_payload("quad ibo", 1024, 6).unwrap_err();
        assert!(err.to_string().contains("not 4-byte aligned"));
    }
}
