#![no_main]

use libfuzzer_sys::fuzz_target;

use imsort_fuzz::u8_as_i32;

fuzz_target!(|data: &[u8]| {
    let mut v = u8_as_i32(data);
    let mut expected = v.clone();
    expected.sort();

    imsort::sort(&mut v);
    assert_eq!(v, expected);
});
