use super::*;

#[test]
fn test_new_array_has_one_capacity_increment_free() {
    let array = DynamicGpuArray::new(16);
    assert_eq!(array.current_capacity(), CAPACITY_INCREMENT);
    assert_eq!(array.free_ranges(), &[BufferRange { base_element: 0, number_of_elements: CAPACITY_INCREMENT }]);
}

#[test]
fn test_allocate_splits_free_range() {
    let mut array = DynamicGpuArray::new(16);
    let range = array.allocate_range(512);
    assert_eq!(range, BufferRange { base_element: 0, number_of_elements: 512 });
    assert_eq!(array.free_ranges(), &[BufferRange { base_element: 512, number_of_elements: CAPACITY_INCREMENT - 512 }]);
}

#[test]
fn test_allocate_beyond_capacity_grows_by_rounded_increment() {
    let mut array = DynamicGpuArray::new(16);
    let range = array.allocate_range(CAPACITY_INCREMENT + 1);
    assert_eq!(range.base_element, 0);
    assert_eq!(range.number_of_elements, CAPACITY_INCREMENT + 1);
    assert_eq!(array.current_capacity(), CAPACITY_INCREMENT * 2);
}

#[test]
fn test_allocate_exact_match_removes_free_range() {
    let mut array = DynamicGpuArray::new(16);
    let range = array.allocate_range(CAPACITY_INCREMENT);
    assert_eq!(range, BufferRange { base_element: 0, number_of_elements: CAPACITY_INCREMENT });
    assert!(array.free_ranges().is_empty());
}

#[test]
fn test_release_coalesces_with_right_neighbor() {
    let mut array = DynamicGpuArray::new(16);
    let a = array.allocate_range(100);
    let b = array.allocate_range(100);
    array.release_range(b);
    array.release_range(a);
    assert_eq!(array.free_ranges(), &[BufferRange { base_element: 0, number_of_elements: CAPACITY_INCREMENT }]);
}

#[test]
fn test_release_coalesces_with_left_and_right_neighbor() {
    let mut array = DynamicGpuArray::new(16);
    let a = array.allocate_range(100);
    let b = array.allocate_range(100);
    let c = array.allocate_range(100);
    array.release_range(a);
    array.release_range(c);
    array.release_range(b);
    assert_eq!(array.free_ranges(), &[BufferRange { base_element: 0, number_of_elements: CAPACITY_INCREMENT }]);
}

#[test]
fn test_write_within_bounds_updates_data() {
    let mut array = DynamicGpuArray::new(4);
    let range = array.allocate_range(2);
    array.write(&[1, 2, 3, 4], range.base_element, 0);
    assert_eq!(&array.data()[0..4], &[1, 2, 3, 4]);
}

#[test]
#[should_panic(expected = "out-of-range")]
fn test_write_past_capacity_panics() {
    let mut array = DynamicGpuArray::new(4);
    let buffer_byte_size = array.current_capacity() * array.byte_stride();
    array.write(&[1, 2, 3, 4], 0, buffer_byte_size - 2);
}
