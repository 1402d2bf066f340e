#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonflat::{FlattenOptions, Flattener, InvalidSpanMode};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 1; // option flags

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];
static SEPARATORS: &[char] = &['.', '/', ':', '→'];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);

        let mut prefix = HEADER;
        prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        prefix += append_object(&mut data[prefix..], size.max(16), max_size - prefix);
        prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append up to 8 JSON whitespace bytes, never exceeding `limit`.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let n = rng.random_range(1..=limit.min(8));
        for slot in &mut buf[..n] {
            *slot = WS_TABLE[rng.random_range(0..WS_TABLE.len())][0];
        }
        n
    })
}

fn append_object(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(ArbitraryObject(value)) =
            ArbitraryObject::arbitrary(&mut arbitrary::Unstructured::new(&bytes))
        {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value).expect("Failed to serialize arbitrary value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// Objects are favoured over arrays so that most generated documents are
/// flattenable.
#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(20)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2..=3 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            4..=10 => Value::String(u.arbitrary()?),
            11 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => ArbitraryObject::arbitrary(u)?.0,
        };
        Ok(ArbitraryValue(value))
    }
}

#[derive(Debug)]
struct ArbitraryObject(Value);

impl<'a> Arbitrary<'a> for ArbitraryObject {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
        Ok(ArbitraryObject(Value::Object(Map::from_iter(
            m.into_iter().map(|(k, v)| (k, v.0)),
        ))))
    }
}

fn flatten(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let data = &data[HEADER..];

    let options = FlattenOptions {
        separator: SEPARATORS[usize::from(flags & 3)],
        invalid_span: match (flags >> 2) & 3 {
            0 => InvalidSpanMode::Null,
            1 => InvalidSpanMode::Empty,
            _ => InvalidSpanMode::Fail,
        },
        max_depth: if flags & 0x10 != 0 { 8 } else { 512 },
        ..Default::default()
    };

    let Ok(map) = Flattener::new(options).parse(data) else {
        return;
    };

    // Every successful parse of a non-empty object yields keys and values that
    // are exact slices of the input.
    let text = String::from_utf8_lossy(data);
    for (key, value) in &map {
        assert!(!key.is_empty());
        if let Some(value) = value {
            assert!(value.is_empty() || text.contains(value));
        } else {
            assert_eq!(options.invalid_span, InvalidSpanMode::Null);
        }
    }
}

fuzz_target!(|data: &[u8]| flatten(data));
