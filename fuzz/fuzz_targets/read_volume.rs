#![no_main]
use libfuzzer_sys::fuzz_target;
use minc2_simple::MemVolume;

fuzz_target!(|data: &[u8]| {
    let _ = MemVolume::from_reader(data);
});
