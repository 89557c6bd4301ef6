//! First-fit, coalescing range allocator over a growable byte buffer
//! (§3.9/§4.6). Backends use one instance per vertex-attribute bucket
//! and one for the shared index buffer; the byte storage here stands
//! in for the GPU buffer a concrete backend would own.

use crate::engine_bail;

/// Stride is fixed per pool; the buffer grows by [`CAPACITY_INCREMENT`]
/// elements (rounded up) whenever an allocation can't be satisfied from
/// the free list.
pub const CAPACITY_INCREMENT: usize = 16384;

/// A contiguous run of `number_of_elements` elements starting at
/// `base_element`, returned by [`DynamicGpuArray::allocate_range`] and
/// given back via [`DynamicGpuArray::release_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRange {
    pub base_element: usize,
    pub number_of_elements: usize,
}

/// A growable buffer plus an ordered free-range list. Allocation is
/// first-fit; release coalesces with both neighbors.
///
/// The backing buffer only ever grows. Releasing every range back to
/// the pool returns the elements to the free list but never shrinks
/// `current_capacity` or `data`; reclaiming unused tail capacity is
/// unimplemented.
pub struct DynamicGpuArray {
    byte_stride: usize,
    current_capacity: usize,
    free_ranges: Vec<BufferRange>,
    data: Vec<u8>,
}

impl DynamicGpuArray {
    pub fn new(byte_stride: usize) -> Self {
        let mut array = Self {
            byte_stride,
            current_capacity: 0,
            free_ranges: Vec::new(),
            data: Vec::new(),
        };
        array.resize_buffer(CAPACITY_INCREMENT);
        array
    }

    pub fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    pub fn current_capacity(&self) -> usize {
        self.current_capacity
    }

    pub fn free_ranges(&self) -> &[BufferRange] {
        &self.free_ranges
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Return the first free range that fits `number_of_elements`,
    /// splitting it (or, on a miss, growing the buffer by
    /// `ceil(needed / CAPACITY_INCREMENT) * CAPACITY_INCREMENT` first).
    pub fn allocate_range(&mut self, number_of_elements: usize) -> BufferRange {
        for i in 0..self.free_ranges.len() {
            if self.free_ranges[i].number_of_elements >= number_of_elements {
                let allocated = BufferRange { base_element: self.free_ranges[i].base_element, number_of_elements };
                if self.free_ranges[i].number_of_elements == number_of_elements {
                    self.free_ranges.remove(i);
                } else {
                    self.free_ranges[i].base_element += number_of_elements;
                    self.free_ranges[i].number_of_elements -= number_of_elements;
                }
                return allocated;
            }
        }

        let last_free = self.free_ranges.last().map_or(0, |r| r.number_of_elements);
        let required_capacity = self.current_capacity + number_of_elements - last_free;
        let rounded_capacity = required_capacity.div_ceil(CAPACITY_INCREMENT) * CAPACITY_INCREMENT;
        self.resize_buffer(rounded_capacity);

        let i = self.free_ranges.len() - 1;
        let allocated = BufferRange { base_element: self.free_ranges[i].base_element, number_of_elements };
        if self.free_ranges[i].number_of_elements == number_of_elements {
            self.free_ranges.pop();
        } else {
            self.free_ranges[i].base_element += number_of_elements;
            self.free_ranges[i].number_of_elements -= number_of_elements;
        }
        allocated
    }

    /// Insert `range` back into the free list in base-element order,
    /// coalescing with the right neighbor and then the left one.
    pub fn release_range(&mut self, range: BufferRange) {
        let insert_pos = self.free_ranges.iter()
            .position(|r| r.base_element > range.base_element)
            .unwrap_or(self.free_ranges.len());

        let merged_pos = if insert_pos < self.free_ranges.len()
            && self.free_ranges[insert_pos].base_element == range.base_element + range.number_of_elements
        {
            self.free_ranges[insert_pos].base_element = range.base_element;
            self.free_ranges[insert_pos].number_of_elements += range.number_of_elements;
            insert_pos
        } else {
            self.free_ranges.insert(insert_pos, range);
            insert_pos
        };

        if merged_pos > 0 {
            let left = self.free_ranges[merged_pos - 1];
            if self.free_ranges[merged_pos].base_element == left.base_element + left.number_of_elements {
                self.free_ranges[merged_pos - 1].number_of_elements += self.free_ranges[merged_pos].number_of_elements;
                self.free_ranges.remove(merged_pos);
            }
        }
    }

    /// Write `data` at `base_element * byte_stride + byte_offset`.
    /// Fatal (§7) if the write would land outside the current capacity.
    pub fn write(&mut self, data: &[u8], base_element: usize, byte_offset: usize) {
        let start = base_element * self.byte_stride + byte_offset;
        let end = start + data.len();
        let buffer_byte_size = self.current_capacity * self.byte_stride;

        if end < start || end > buffer_byte_size {
            engine_bail!("ember::gpu_array::DynamicGpuArray", "out-of-range dynamic GPU array write");
        }

        self.data[start..end].copy_from_slice(data);
    }

    fn resize_buffer(&mut self, new_capacity: usize) {
        if new_capacity == self.current_capacity {
            return;
        }

        let mut new_data = vec![0u8; new_capacity * self.byte_stride];
        let copy_elements = self.current_capacity.min(new_capacity);
        let copy_bytes = copy_elements * self.byte_stride;
        new_data[..copy_bytes].copy_from_slice(&self.data[..copy_bytes]);
        self.data = new_data;

        if new_capacity > self.current_capacity {
            let capacity_increment = new_capacity - self.current_capacity;
            match self.free_ranges.last_mut() {
                Some(last) => last.number_of_elements += capacity_increment,
                None => self.free_ranges.push(BufferRange { base_element: self.current_capacity, number_of_elements: capacity_increment }),
            }
        }

        self.current_capacity = new_capacity;
    }
}

#[cfg(test)]
#[path = "dynamic_gpu_array_tests.rs"]
mod tests;
