#![no_main]

use libfuzzer_sys::fuzz_target;
use shelflink::CallNumber;

fuzz_target!(|data: (&str, Option<&str>)| {
    let (class_part, item_part) = data;
    let cn = CallNumber::parse(class_part, item_part);
    // comparison must be reflexive for any parsed value
    assert_eq!(cn.cmp(&cn), std::cmp::Ordering::Equal);
});
