#![allow(clippy::all, clippy::no_mangle_with_rust_abi)]
#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let x = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);

    let claimed = primegen::is_prime_u32(x);
    let actual = naive_is_prime(x);

    assert_eq!(
        claimed, actual,
        "is_prime_u32({}) = {} but trial division says {}",
        x, claimed, actual
    );
});

fn naive_is_prime(x: u32) -> bool {
    if x < 2 {
        return false;
    }
    let x = u64::from(x);
    let mut d = 2u64;
    while d * d <= x {
        if x % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}
