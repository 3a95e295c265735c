#![no_main]
use libfuzzer_sys::fuzz_target;
use typefmt_core::{Arg, FormatConfig, ToArg, format_to};

/// Directive fields this large allocate the whole field up front.
const MAX_DIGIT_RUN: usize = 5;

fuzz_target!(|data: &[u8]| {
    // First byte picks the mode and argument list, the rest is the format.
    let Some((&selector, fmt)) = data.split_first() else {
        return;
    };
    if longest_digit_run(fmt) > MAX_DIGIT_RUN {
        return;
    }

    let text = "fuzz";
    let wide = [0x3c9_u32, 0x61, 0];
    let pool: [Arg<'_>; 8] = [
        (-7_i32).to_arg(),
        u64::MAX.to_arg(),
        2.5e-3_f64.to_arg(),
        b'z'.to_arg(),
        'é'.to_arg(),
        text.to_arg(),
        (&wide).to_arg(),
        std::ptr::null::<u8>().to_arg(),
    ];
    let count = usize::from(selector >> 3) % (pool.len() + 1);
    let config = match selector & 0b11 {
        0 => FormatConfig::lenient(),
        1 => FormatConfig::strict(),
        2 => FormatConfig::lenient().with_strict_sign(true),
        _ => FormatConfig::unchecked(),
    };

    // Errors are expected; panics are not.
    let mut narrow: Vec<u8> = Vec::new();
    let _ = format_to(&mut narrow, fmt, &pool[..count], config);

    let wide_fmt: Vec<u32> = fmt.iter().map(|&b| u32::from(b)).collect();
    let mut wide_out: Vec<u32> = Vec::new();
    let _ = format_to(&mut wide_out, &wide_fmt, &pool[..count], config);
});

fn longest_digit_run(fmt: &[u8]) -> usize {
    fmt.split(|b| !b.is_ascii_digit())
        .map(<[u8]>::len)
        .max()
        .unwrap_or(0)
}
