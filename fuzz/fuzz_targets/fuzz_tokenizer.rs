#![no_main]

use arbitrary::Arbitrary;
use hiscore::utils::{Tokenizer, WordSplit};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    whitespace: bool,
    text: String,
}

fuzz_target!(|input: Input| {
    let split = if input.whitespace {
        WordSplit::Whitespace
    } else {
        WordSplit::Spaces
    };
    let tokens = Tokenizer::new(split).tokenize(&input.text);

    let single: u64 = tokens.histograms.single.iter().map(|(_, c)| c).sum();
    let compound: u64 = tokens.histograms.compound.iter().map(|(_, c)| c).sum();
    assert_eq!(single, tokens.word_count);
    assert_eq!(compound, tokens.word_count.saturating_sub(1));
});
