/// Running two-byte checksum shared by the header and the data section.
pub fn calculate_checksum<'a>(bytes: impl IntoIterator<Item = &'a u8>) -> [u8; 2] {
    let mut a: u8 = 0xFF;
    let mut b: u8 = 0;
    for v in bytes.into_iter() {
        a = a.wrapping_add(*v);
        b = b.wrapping_add(a);
    }
    [a, b]
}
