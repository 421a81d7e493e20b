pub fn u8_as_i32(data: &[u8]) -> Vec<i32> {
    data.chunks_exact(std::mem::size_of::<i32>())
        .map(|chunk| i32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}
