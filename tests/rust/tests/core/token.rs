//! Random token tests

use vmu_core::token::TOKEN_ALPHABET;
use vmu_core::{random_string, TokenGenerator};

#[test]
fn test_tokens_have_exact_length_and_alphabet() {
    for length in 0..64 {
        let token = random_string(length);
        assert_eq!(token.chars().count(), length);
        assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }
}

#[test]
fn test_empty_token() {
    assert_eq!(random_string(0), "");
}

#[test]
fn test_owned_generators_are_independent() {
    let mut first = TokenGenerator::seeded(1);
    let mut second = TokenGenerator::seeded(1);

    assert_eq!(first.generate(24), second.generate(24));
    assert_eq!(first.generate(24), second.generate(24));
}

#[test]
fn test_shared_generator_from_many_threads() {
    let handles: Vec<_> = (0..16)
        .map(|i| std::thread::spawn(move || random_string(i)))
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap().len(), i);
    }
}
